//! Checkpoint storage for outline sessions

use crate::{Checkpoint, Result, SessionId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Checkpoint storage interface
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Insert or replace the checkpoint of a session
    async fn save(&self, checkpoint: Checkpoint) -> Result<()>;

    /// Get the checkpoint of a session
    async fn load(&self, id: SessionId) -> Result<Option<Checkpoint>>;

    /// Drop the checkpoint of a session
    ///
    /// Returns `true` when a checkpoint was removed.
    async fn remove(&self, id: SessionId) -> Result<bool>;

    /// List ids of all stored sessions
    async fn list(&self) -> Result<Vec<SessionId>>;
}

/// In-memory checkpoint storage
///
/// Checkpoints live only as long as the store; nothing is written to disk.
#[derive(Default)]
pub struct MemoryCheckpointStore {
    checkpoints: RwLock<HashMap<SessionId, Checkpoint>>,
}

impl MemoryCheckpointStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn save(&self, checkpoint: Checkpoint) -> Result<()> {
        debug!(
            "Saving checkpoint: {} (next: {}, rounds: {})",
            checkpoint.session_id, checkpoint.next, checkpoint.rounds
        );

        self.checkpoints
            .write()
            .await
            .insert(checkpoint.session_id, checkpoint);
        Ok(())
    }

    async fn load(&self, id: SessionId) -> Result<Option<Checkpoint>> {
        Ok(self.checkpoints.read().await.get(&id).cloned())
    }

    async fn remove(&self, id: SessionId) -> Result<bool> {
        debug!("Removing checkpoint: {}", id);
        Ok(self.checkpoints.write().await.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<SessionId>> {
        Ok(self.checkpoints.read().await.keys().copied().collect())
    }
}

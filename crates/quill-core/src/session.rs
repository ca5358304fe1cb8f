//! Session, checkpoint and step types for the outline workflow

use crate::{Error, PreferenceLog, SubtopicList};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier for one outline session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh random session id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| Error::Other(format!("Invalid session id '{}': {}", s, e)))
    }
}

/// Data owned by one outline session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Article topic
    pub topic: String,
    /// Every refinement request so far, oldest first
    pub preferences: PreferenceLog,
    /// Current outline proposal
    pub subtopics: SubtopicList,
}

impl Session {
    /// Create a new session with seed preferences
    ///
    /// Blank seed entries are dropped; exact duplicates collapse to one entry.
    /// Entries are recorded exactly as given.
    pub fn new<I, S>(topic: impl Into<String>, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let preferences = preferences
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| !p.trim().is_empty())
            .collect();

        Self {
            topic: topic.into(),
            preferences,
            subtopics: SubtopicList::default(),
        }
    }
}

/// Position of the outline workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Ask the model for a revised outline
    Generate,
    /// Show the current outline to the operator
    Display,
    /// Wait for `done` or more preferences
    AwaitFeedback,
    /// Wait for the positions of subtopics to drop
    AwaitSelection,
    /// Publish the finished outline
    Finalize,
    /// Finalized; no further transitions
    End,
}

impl Node {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Node::Generate => "generate",
            Node::Display => "display",
            Node::AwaitFeedback => "await_feedback",
            Node::AwaitSelection => "await_selection",
            Node::Finalize => "finalize",
            Node::End => "end",
        }
    }

    /// Whether the workflow halts here waiting for a resume value
    pub fn is_suspension(&self) -> bool {
        matches!(self, Node::AwaitFeedback | Node::AwaitSelection)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a session and the node that runs next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub session_id: SessionId,
    pub session: Session,
    pub next: Node,
    /// Completed generation rounds
    pub rounds: u32,
}

impl Checkpoint {
    /// Create the initial checkpoint of a session
    pub fn new(session_id: SessionId, session: Session) -> Self {
        Self {
            session_id,
            session,
            next: Node::Generate,
            rounds: 0,
        }
    }

    /// Whether the session has finalized
    pub fn is_terminal(&self) -> bool {
        self.next == Node::End
    }

    /// Convert to JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Outcome of driving a session forward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Step {
    /// Waiting for a resume value
    Suspended { prompt: String },
    /// Finalized with the outline as output
    Done { subtopics: SubtopicList },
}

impl Step {
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Subtopic;

    #[test]
    fn test_session_seed_preferences() {
        let session = Session::new(
            "Containers",
            ["more examples", "", "  ", "more examples", "more examples "],
        );
        assert_eq!(
            session.preferences.as_slice(),
            &["more examples".to_string(), "more examples ".to_string()]
        );
        assert!(session.subtopics.is_empty());
    }

    #[test]
    fn test_session_id_roundtrip() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_checkpoint_json_roundtrip() {
        let mut checkpoint = Checkpoint::new(SessionId::new(), Session::new("Rust", ["async"]));
        checkpoint.session.subtopics =
            SubtopicList::new(vec![Subtopic::new("Ownership", "Moves and borrows")]);
        checkpoint.next = Node::AwaitFeedback;
        checkpoint.rounds = 1;

        let json = checkpoint.to_json().unwrap();
        let parsed = Checkpoint::from_json(&json).unwrap();
        assert_eq!(parsed, checkpoint);
    }

    #[test]
    fn test_step_wire_format() {
        let step = Step::Suspended {
            prompt: "type done".to_string(),
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["status"], "suspended");
        assert_eq!(json["prompt"], "type done");

        let step = Step::Done {
            subtopics: SubtopicList::new(vec![Subtopic::new("A", "B")]),
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["status"], "done");
        assert_eq!(json["subtopics"][0]["title"], "A");
    }

    #[test]
    fn test_node_suspension_points() {
        assert!(Node::AwaitFeedback.is_suspension());
        assert!(Node::AwaitSelection.is_suspension());
        assert!(!Node::Generate.is_suspension());
        assert!(!Node::End.is_suspension());
    }
}

//! Command handlers

pub mod outline;
pub mod session;
pub mod write;

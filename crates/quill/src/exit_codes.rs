//! Exit code constants and error mapping for quill
//!
//! Each failure kind of the outline and drafting pipeline gets its own exit
//! code so scripts can tell them apart.

use quill_core::Error;

/// Exit code constants for quill
pub mod codes {
    /// Success - operation completed successfully
    pub const SUCCESS: i32 = 0;

    /// Generic failure not covered by a more specific code
    pub const GENERIC: i32 = 1;

    /// CLI arguments error - invalid or missing command-line arguments
    #[allow(dead_code)] // Emitted by clap itself on parse failure
    pub const CLI_ARGS: i32 = 2;

    /// Generation failure - provider error or schema-invalid response
    pub const GENERATION: i32 = 70;

    /// Search failure - research lookup failed under the propagate policy
    pub const SEARCH: i32 = 71;

    /// Session already terminal - resume on a finalized session
    pub const SESSION_TERMINAL: i32 = 72;

    /// Invalid resume input - the answer does not fit the pending prompt
    pub const INVALID_INPUT: i32 = 73;

    /// Session state - unknown session or session not at a suspension point
    pub const SESSION_STATE: i32 = 74;

    /// Round limit - the refinement round budget is exhausted
    pub const ROUND_LIMIT: i32 = 75;

    /// IO failure - terminal or output file error
    pub const IO: i32 = 76;
}

/// Convert a quill error to its exit code
pub fn error_to_exit_code(error: &Error) -> i32 {
    match error {
        Error::Generation(_) => codes::GENERATION,
        Error::Search { .. } => codes::SEARCH,
        Error::SessionAlreadyTerminal(_) => codes::SESSION_TERMINAL,
        Error::InvalidResumeInput { .. } => codes::INVALID_INPUT,
        Error::SessionNotFound(_) | Error::NotSuspended { .. } => codes::SESSION_STATE,
        Error::RoundLimitReached { .. } => codes::ROUND_LIMIT,
        Error::Io(_) => codes::IO,
        _ => codes::GENERIC,
    }
}

/// Find the exit code for an error raised anywhere in a command
///
/// The first quill or IO error in the context chain decides the code.
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(error) = cause.downcast_ref::<Error>() {
            return error_to_exit_code(error);
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return codes::IO;
        }
    }
    codes::GENERIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use quill_core::{Node, SessionId};

    #[test]
    fn test_exit_code_constants_are_distinct() {
        let all = [
            codes::SUCCESS,
            codes::GENERIC,
            codes::CLI_ARGS,
            codes::GENERATION,
            codes::SEARCH,
            codes::SESSION_TERMINAL,
            codes::INVALID_INPUT,
            codes::SESSION_STATE,
            codes::ROUND_LIMIT,
            codes::IO,
        ];
        let mut sorted = all.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), all.len());
    }

    #[test]
    fn test_error_mapping() {
        let id = SessionId::new();

        assert_eq!(
            error_to_exit_code(&Error::Generation("boom".into())),
            codes::GENERATION
        );
        assert_eq!(
            error_to_exit_code(&Error::search("Containers", "timeout")),
            codes::SEARCH
        );
        assert_eq!(
            error_to_exit_code(&Error::SessionAlreadyTerminal(id)),
            codes::SESSION_TERMINAL
        );
        assert_eq!(
            error_to_exit_code(&Error::InvalidResumeInput {
                session: id,
                reason: "empty".into()
            }),
            codes::INVALID_INPUT
        );
        assert_eq!(
            error_to_exit_code(&Error::NotSuspended {
                session: id,
                node: Node::Generate
            }),
            codes::SESSION_STATE
        );
        assert_eq!(
            error_to_exit_code(&Error::RoundLimitReached {
                session: id,
                limit: 3
            }),
            codes::ROUND_LIMIT
        );
        assert_eq!(error_to_exit_code(&Error::Other("x".into())), codes::GENERIC);
    }

    #[test]
    fn test_exit_code_through_context() {
        let error = anyhow::Error::from(Error::Generation("boom".into()))
            .context("Failed to draft sections");
        assert_eq!(exit_code_for(&error), codes::GENERATION);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = Err::<(), _>(io)
            .context("Failed to write article")
            .unwrap_err();
        assert_eq!(exit_code_for(&error), codes::IO);

        assert_eq!(exit_code_for(&anyhow::anyhow!("plain")), codes::GENERIC);
    }
}

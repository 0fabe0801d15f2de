//! Governance error types.

/// Result type for governance operations.
pub type GovernanceResult<T> = Result<T, GovernanceError>;

/// Governance engine errors.
///
/// All variants are local, synchronous, recoverable-by-caller conditions.
/// The engine's state is unchanged whenever one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum GovernanceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Proposal not found: {0}")]
    NotFound(u64),

    #[error("Proposal {0} has already been finalized")]
    AlreadyFinalized(u64),

    #[error("Already voted on proposal {0}")]
    DuplicateVote(u64),
}

//! Error type shared by the whole crate.

/// Errors surfaced by population construction and genetic operators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A run parameter or the point set is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An operator was asked to combine tours that do not share a point set.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

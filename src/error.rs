/// Failure reported by a [`NonceGenerator`](crate::NonceGenerator).
///
/// Issuance hands this back to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("nonce generation failed: {reason}")]
pub struct GenerationError {
    reason: String,
}

impl GenerationError {
    /// Wrap a generator-specific failure message.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The generator's failure message.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Reasons a submitted proof is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("can't verify with empty nonce signature")]
    EmptySignature,
    #[error("nonce signature is invalid: provided <{provided}>, expected <{expected}>")]
    SignatureMismatch { provided: String, expected: String },
    #[error("digest does not match data and nonce")]
    DigestMismatch,
    #[error("digest does not meet difficulty {difficulty}")]
    DifficultyNotMet { difficulty: u32 },
}

/// Configuration and solver failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("search exhausted after {attempts} attempts")]
    Exhausted { attempts: u64 },
    #[error("solver failed: {0}")]
    SolverFailed(String),
}

use thiserror::Error;

/// Failures surfaced by the faucet core.
#[derive(Debug, Error)]
pub enum FaucetError {
    /// Node unreachable, RPC error, or a call the node refused (e.g. a reverting estimate).
    #[error("transport error: {0}")]
    Transport(String),

    /// The node reports a chain other than the one we sign for.
    #[error("network mismatch: expected chain id {expected}, got {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },

    /// Malformed user input such as a private key or an address.
    #[error("validation error: {0}")]
    Validation(String),

    /// Submitted and mined, but reverted on-chain.
    #[error("{label} transaction failed on-chain")]
    TransactionFailed { label: String },
}

impl FaucetError {
    pub fn transport(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Transport(format!("{context}: {err}"))
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::TransactionFailed { .. })
    }
}

pub type FaucetResult<T> = Result<T, FaucetError>;

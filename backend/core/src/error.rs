use thiserror::Error;

/// Top-level error type for the Poseidon service.
#[derive(Debug, Error)]
pub enum PoseidonError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

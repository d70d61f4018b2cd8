use thiserror::Error;

/// Errors surfaced by the problem generator and config decoding.
///
/// The adaptation engine is total over its inputs and never fails.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown problem type: {0}")]
    UnknownProblemType(String),

    #[error("invalid generation config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

use thiserror::Error;

/// Errors the assistant can produce.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The request to the model provider failed at the transport level.
    #[error("assistant transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered with a non-success status.
    #[error("assistant upstream error: {0}")]
    Upstream(String),
    /// The model's answer could not be turned into a structured result.
    #[error("assistant returned malformed output: {0}")]
    Malformed(String),
}

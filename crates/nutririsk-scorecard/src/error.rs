use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScorecardError {
    #[error("malformed JSON payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("unsupported payload: {0}")]
    UnsupportedPayload(String),
}

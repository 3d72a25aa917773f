use nutririsk_scorecard::error::ScorecardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    /// The request body could not be read as questionnaire answers.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AssistantError {
    /// Whether the caller should answer with a 4xx status.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AssistantError::BadRequest(_))
    }
}

impl From<ScorecardError> for AssistantError {
    fn from(e: ScorecardError) -> Self {
        AssistantError::BadRequest(e.to_string())
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(e: serde_json::Error) -> Self {
        AssistantError::Internal(e.to_string())
    }
}

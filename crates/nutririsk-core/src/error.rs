use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown risk label: {0}")]
    UnknownLabel(String),

    #[error("unknown sex code: {0}")]
    UnknownSex(String),
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("source file not found: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("table '{table}' has no '{column}' column")]
    MissingSubjectColumn { table: String, column: String },

    #[error("row {row} of '{table}' has {found} fields, expected at most {expected}")]
    RowWidth {
        table: String,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

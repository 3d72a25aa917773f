//! nutririsk-features
//!
//! Batch feature engineering over merged NHANES-style survey tables:
//! source loading, declarative column resolution, subject records, the
//! dataset-dependent feature vector, questionnaire-item derivation, and
//! clinically labelled training rows.
//!
//! Runs single-threaded over an in-memory table. A missing source file
//! aborts the run; missing columns only shrink the feature schema.

pub mod columns;
pub mod config;
pub mod dataset;
pub mod engineer;
pub mod error;
pub mod feature_list;
pub mod items;
pub mod loader;
pub mod pipeline;
pub mod records;
pub mod table;

pub use columns::{ColumnMap, SemanticField, resolve_column};
pub use config::PipelineConfig;
pub use dataset::{LabelDistribution, LabeledRow, label_rows};
pub use engineer::{
    EngineeredDataset, FeatureSchema, FeatureVector, derive_features, engineer_features,
};
pub use error::FeatureError;
pub use feature_list::{align_features, read_feature_list, write_feature_list};
pub use items::{QuestionnaireRow, build_questionnaire_dataset};
pub use loader::{SourceTables, load_table, read_table};
pub use pipeline::{PipelineOutput, run_pipeline};
pub use table::SurveyTable;

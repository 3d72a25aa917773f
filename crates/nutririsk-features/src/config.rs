use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

pub const DATASET_DIR_ENV: &str = "NUTRIRISK_DATASET_DIR";
pub const ARTIFACTS_DIR_ENV: &str = "NUTRIRISK_ARTIFACTS_DIR";

/// Where the survey tables live and how to read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub dataset_dir: PathBuf,
    pub artifacts_dir: PathBuf,
    pub sources: SourceFiles,
    /// Column shared by every table that identifies a subject.
    pub subject_column: String,
    /// Raw survey code meaning "yes" in the smoking question.
    pub smoker_yes_code: f64,
}

/// File name of each source table inside `dataset_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub demographic: String,
    pub questionnaire: String,
    pub diet: String,
    pub examination: String,
    pub labs: String,
    pub medications: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            demographic: "demographic.csv".to_string(),
            questionnaire: "questionnaire.csv".to_string(),
            diet: "diet.csv".to_string(),
            examination: "examination.csv".to_string(),
            labs: "labs.csv".to_string(),
            medications: "medications.csv".to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("dataset"),
            artifacts_dir: PathBuf::from("model_artifacts"),
            sources: SourceFiles::default(),
            subject_column: "SEQN".to_string(),
            smoker_yes_code: 1.0,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config; absent fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, FeatureError> {
        let contents = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `NUTRIRISK_DATASET_DIR` / `NUTRIRISK_ARTIFACTS_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(DATASET_DIR_ENV) {
            config.dataset_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ARTIFACTS_DIR_ENV) {
            config.artifacts_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.subject_column.trim().is_empty() {
            return Err(FeatureError::InvalidConfig(
                "subject_column must not be empty".to_string(),
            ));
        }
        if !self.smoker_yes_code.is_finite() {
            return Err(FeatureError::InvalidConfig(
                "smoker_yes_code must be a finite number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn source_path(&self, file_name: &str) -> PathBuf {
        self.dataset_dir.join(file_name)
    }
}

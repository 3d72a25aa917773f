use std::path::PathBuf;

use jiff::Timestamp;

use nutririsk_scorecard::registry::question_ids;

use crate::config::PipelineConfig;
use crate::dataset::{LabelDistribution, LabeledRow, label_rows};
use crate::engineer::{EngineeredDataset, engineer_features};
use crate::error::FeatureError;
use crate::feature_list::{FEATURE_LIST_FILE, write_feature_list};
use crate::items::{QuestionnaireRow, build_questionnaire_dataset};
use crate::loader::SourceTables;

pub const LABEL_DISTRIBUTION_FILE: &str = "label_dist.json";
pub const CLINICAL_FEATURE_LIST_FILE: &str = "clinical_feature_list.txt";
pub const CLINICAL_LABEL_DISTRIBUTION_FILE: &str = "clinical_label_dist.json";

/// Everything one batch run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Questionnaire items per subject, labelled by the evaluator.
    pub questionnaire: Vec<QuestionnaireRow>,
    /// Biometric feature rows of the merged survey.
    pub engineered: EngineeredDataset,
    /// Biometric rows with a clinical label.
    pub labeled: Vec<LabeledRow>,
    pub artifacts: Vec<PathBuf>,
}

/// Load the sources, build both training datasets and write their feature
/// lists and label distributions under `artifacts_dir`.
///
/// Fails outright when a source file or a subject column is missing.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutput, FeatureError> {
    config.validate()?;
    let sources = SourceTables::load(config)?;

    let questionnaire = build_questionnaire_dataset(
        &sources.questionnaire,
        &sources.diet,
        &sources.medications,
        &config.subject_column,
    )?;

    let merged = sources.merge(&config.subject_column)?;
    let engineered = engineer_features(&merged, config)?;
    let labeled = label_rows(&engineered);

    let generated_at = Timestamp::now();
    let dir = &config.artifacts_dir;
    let item_list: Vec<String> = question_ids().map(str::to_string).collect();

    let artifacts = vec![
        dir.join(FEATURE_LIST_FILE),
        dir.join(LABEL_DISTRIBUTION_FILE),
        dir.join(CLINICAL_FEATURE_LIST_FILE),
        dir.join(CLINICAL_LABEL_DISTRIBUTION_FILE),
    ];
    write_feature_list(&artifacts[0], &item_list)?;
    LabelDistribution::from_samples(
        questionnaire
            .iter()
            .map(|row| (row.evaluation.label, row.evaluation.score_normalized)),
        generated_at,
    )
    .write(&artifacts[1])?;
    write_feature_list(&artifacts[2], &engineered.schema.names())?;
    LabelDistribution::from_samples(
        labeled.iter().map(|row| (row.label, row.score)),
        generated_at,
    )
    .write(&artifacts[3])?;

    tracing::info!(
        questionnaire_rows = questionnaire.len(),
        clinical_rows = labeled.len(),
        "pipeline run complete"
    );
    Ok(PipelineOutput {
        questionnaire,
        engineered,
        labeled,
        artifacts,
    })
}

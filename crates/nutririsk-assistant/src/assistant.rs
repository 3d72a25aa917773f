use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use ts_rs::TS;

use nutririsk_core::RiskLabel;
use nutririsk_core::models::evaluation::EvaluationResult;
use nutririsk_features::{FeatureVector, align_features};
use nutririsk_scorecard::{AnswerSet, evaluate, parse_answers};

use crate::classifier::{ClassifierError, RiskModel};
use crate::error::AssistantError;

/// Which scorer produced the reported label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PredictionSource {
    Model,
    Questionnaire,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct AssistantResponse {
    pub risk_label: RiskLabel,
    /// Normalized questionnaire score, 0–100.
    pub score: f64,
    pub evaluation: EvaluationResult,
    /// Class probabilities from the model; absent on fallback.
    #[ts(type = "Partial<Record<RiskLabel, number>> | null")]
    pub probabilities: Option<BTreeMap<RiskLabel, f64>>,
    pub source: PredictionSource,
    /// Feature vector the model was given, aligned to its feature list.
    /// Absent on fallback.
    #[ts(type = "Record<string, number | null> | null")]
    pub model_features: Option<FeatureVector>,
    pub interpretation: String,
}

/// Questionnaire evaluation with an optional model opinion on top.
#[derive(Clone, Default)]
pub struct NutritionAssistant {
    model: Option<Arc<dyn RiskModel>>,
}

impl NutritionAssistant {
    pub fn new(model: Arc<dyn RiskModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn questionnaire_only() -> Self {
        Self { model: None }
    }

    /// Parse a request body and assess it. Only an unreadable body fails.
    pub fn assess_json(&self, body: &str) -> Result<AssistantResponse, AssistantError> {
        let answers = parse_answers(body)?;
        Ok(self.assess(&answers))
    }

    /// Assess a request body and render the response as JSON.
    pub fn respond(&self, body: &str) -> Result<String, AssistantError> {
        let response = self.assess_json(body)?;
        Ok(serde_json::to_string(&response)?)
    }

    pub fn assess(&self, answers: &AnswerSet) -> AssistantResponse {
        let evaluation = evaluate(answers);

        let prediction = self
            .model
            .as_deref()
            .map(|model| predict(model, &item_features(&evaluation)));

        let (risk_label, probabilities, model_features, source) = match prediction {
            Some(Ok(prediction)) => (
                prediction.label,
                Some(prediction.probabilities),
                Some(prediction.features),
                PredictionSource::Model,
            ),
            Some(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    fallback = "questionnaire",
                    "risk model unavailable, using questionnaire label"
                );
                (evaluation.label, None, None, PredictionSource::Questionnaire)
            }
            None => (evaluation.label, None, None, PredictionSource::Questionnaire),
        };

        AssistantResponse {
            risk_label,
            score: evaluation.score_normalized,
            interpretation: risk_label.interpretation().to_string(),
            evaluation,
            probabilities,
            source,
            model_features,
        }
    }
}

impl std::fmt::Debug for NutritionAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NutritionAssistant")
            .field("has_model", &self.model.is_some())
            .finish()
    }
}

/// Clamped item points keyed by question id, the model's input vocabulary.
fn item_features(evaluation: &EvaluationResult) -> FeatureVector {
    evaluation
        .detail
        .iter()
        .map(|(id, item)| (id, Some(item.points)))
        .collect()
}

struct Prediction {
    label: RiskLabel,
    probabilities: BTreeMap<RiskLabel, f64>,
    features: FeatureVector,
}

fn predict(model: &dyn RiskModel, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
    let aligned = align_features(model.feature_list(), features);
    let label = model.predict(&aligned)?;
    let probabilities = model.predict_probabilities(&aligned)?;
    Ok(Prediction {
        label,
        probabilities,
        features: aligned,
    })
}

use std::collections::BTreeMap;
use std::path::Path;

use jiff::Timestamp;
use serde::Serialize;

use nutririsk_clinical::score_subject;
use nutririsk_core::RiskLabel;

use crate::engineer::{EngineeredDataset, FeatureVector};
use crate::error::FeatureError;
use crate::items::median;

/// A feature row with its clinical ground-truth label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledRow {
    pub subject_id: String,
    pub features: FeatureVector,
    pub label: RiskLabel,
    pub score: f64,
}

/// Join feature rows with clinical labels, dropping subjects whose label is
/// undefined for lack of data.
pub fn label_rows(dataset: &EngineeredDataset) -> Vec<LabeledRow> {
    let labeled: Vec<LabeledRow> = dataset
        .records
        .iter()
        .zip(&dataset.rows)
        .filter_map(|(record, row)| {
            let assessment = score_subject(record);
            Some(LabeledRow {
                subject_id: row.subject_id.clone(),
                features: row.features.clone(),
                label: assessment.label?,
                score: assessment.score?,
            })
        })
        .collect();

    let dropped = dataset.rows.len() - labeled.len();
    if dropped > 0 {
        tracing::info!(rows = dropped, "rows without a clinical label dropped");
    }
    labeled
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percentiles {
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreStats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` below two samples.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub percentiles: Percentiles,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelStats {
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Label balance and score spread of a labelled dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDistribution {
    pub sample_count: usize,
    pub label_counts: BTreeMap<RiskLabel, usize>,
    /// Share of samples per label, rounded to 3 decimals.
    pub label_proportions: BTreeMap<RiskLabel, f64>,
    pub score_stats: Option<ScoreStats>,
    pub per_label: BTreeMap<RiskLabel, LabelStats>,
    pub generated_at: Timestamp,
}

impl LabelDistribution {
    pub fn from_samples(
        samples: impl IntoIterator<Item = (RiskLabel, f64)>,
        generated_at: Timestamp,
    ) -> Self {
        let samples: Vec<(RiskLabel, f64)> = samples.into_iter().collect();
        let n = samples.len();

        let mut by_label: BTreeMap<RiskLabel, Vec<f64>> = BTreeMap::new();
        for (label, score) in &samples {
            by_label.entry(*label).or_default().push(*score);
        }

        let label_counts = by_label.iter().map(|(l, s)| (*l, s.len())).collect();
        let label_proportions = by_label
            .iter()
            .map(|(l, s)| (*l, round3(s.len() as f64 / n as f64)))
            .collect();
        let per_label = by_label
            .iter()
            .filter_map(|(l, scores)| {
                Some((
                    *l,
                    LabelStats {
                        mean: mean(scores)?,
                        std_dev: sample_std(scores),
                        min: scores.iter().copied().reduce(f64::min)?,
                        max: scores.iter().copied().reduce(f64::max)?,
                    },
                ))
            })
            .collect();

        let scores: Vec<f64> = samples.iter().map(|(_, s)| *s).collect();
        Self {
            sample_count: n,
            label_counts,
            label_proportions,
            score_stats: score_stats(&scores),
            per_label,
            generated_at,
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), FeatureError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!(path = %path.display(), samples = self.sample_count, "label distribution written");
        Ok(())
    }
}

fn score_stats(scores: &[f64]) -> Option<ScoreStats> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(ScoreStats {
        mean: mean(&sorted)?,
        median: median(&sorted)?,
        std_dev: sample_std(&sorted),
        min: *sorted.first()?,
        max: *sorted.last()?,
        percentiles: Percentiles {
            p25: quantile(&sorted, 0.25)?,
            p75: quantile(&sorted, 0.75)?,
            p90: quantile(&sorted, 0.90)?,
            p95: quantile(&sorted, 0.95)?,
        },
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Linear-interpolated quantile of sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

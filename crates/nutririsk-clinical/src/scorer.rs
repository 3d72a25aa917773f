use serde::{Deserialize, Serialize};
use ts_rs::TS;

use nutririsk_core::models::subject::SubjectRecord;
use nutririsk_core::{RiskLabel, classify};

use crate::domains::ClinicalDomain;

/// Points one domain contributed to a clinical score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DomainScore {
    pub domain: ClinicalDomain,
    pub weight: f64,
    pub points: f64,
}

/// Clinical risk for one subject.
///
/// `score` and `label` are both `None` when no domain had data; that means
/// insufficient data, not a healthy subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicalAssessment {
    pub subject_id: String,
    pub score: Option<f64>,
    pub label: Option<RiskLabel>,
    /// Sum of the weights of the domains that had data.
    pub weight_considered: f64,
    /// Only the domains that had data, in canonical order.
    pub domains: Vec<DomainScore>,
}

impl ClinicalAssessment {
    pub fn has_sufficient_data(&self) -> bool {
        self.label.is_some()
    }

    pub fn domain(&self, domain: ClinicalDomain) -> Option<&DomainScore> {
        self.domains.iter().find(|d| d.domain == domain)
    }
}

/// Score one subject across the five clinical domains.
///
/// The result is `earned / Σ weights of domains with data × 100`, capped at
/// 100, labelled with the questionnaire cutoffs.
pub fn score_subject(record: &SubjectRecord) -> ClinicalAssessment {
    let domains: Vec<DomainScore> = ClinicalDomain::ALL
        .iter()
        .filter_map(|domain| {
            domain.points(record).map(|points| DomainScore {
                domain: *domain,
                weight: domain.weight(),
                points,
            })
        })
        .collect();

    let weight_considered: f64 = domains.iter().map(|d| d.weight).sum();
    let earned: f64 = domains.iter().map(|d| d.points).sum();

    let score = (weight_considered > 0.0).then(|| (earned / weight_considered * 100.0).min(100.0));

    ClinicalAssessment {
        subject_id: record.subject_id.clone(),
        score,
        label: score.map(classify),
        weight_considered,
        domains,
    }
}

pub fn score_subjects(records: &[SubjectRecord]) -> Vec<ClinicalAssessment> {
    records.iter().map(score_subject).collect()
}

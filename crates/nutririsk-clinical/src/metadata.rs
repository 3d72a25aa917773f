//! Audit description of the clinical scoring scheme.
//!
//! Built from the same constants the scorer reads, so reports always match
//! the code that produced the labels.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use nutririsk_core::risk::{HEALTHY_MAX, MODERATE_MAX};

use crate::domains::ClinicalDomain;
use crate::energy::ACTIVITY_FACTOR;
use crate::thresholds::*;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringMetadata {
    pub scheme: String,
    pub saludable_max: f64,
    pub moderado_max: f64,
    pub domains: Vec<DomainMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DomainMetadata {
    pub domain: ClinicalDomain,
    pub weight: f64,
    pub factors: Vec<FactorRule>,
}

/// One scored factor: its share of the domain weight and its tier rules,
/// most severe first.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FactorRule {
    pub factor: String,
    pub sub_weight: f64,
    pub rules: Vec<String>,
}

impl ScoringMetadata {
    pub fn domain(&self, domain: ClinicalDomain) -> Option<&DomainMetadata> {
        self.domains.iter().find(|d| d.domain == domain)
    }

    pub fn total_weight(&self) -> f64 {
        self.domains.iter().map(|d| d.weight).sum()
    }
}

pub fn scoring_metadata() -> ScoringMetadata {
    ScoringMetadata {
        scheme: "weighted_five_domain".to_string(),
        saludable_max: HEALTHY_MAX,
        moderado_max: MODERATE_MAX,
        domains: ClinicalDomain::ALL
            .iter()
            .map(|domain| DomainMetadata {
                domain: *domain,
                weight: domain.weight(),
                factors: factors(*domain),
            })
            .collect(),
    }
}

fn factors(domain: ClinicalDomain) -> Vec<FactorRule> {
    match domain {
        ClinicalDomain::Anthropometric => vec![factor(
            "bmi",
            ANTHROPOMETRIC_WEIGHT,
            at_least_rules("BMI", &BMI_TIERS),
        )],
        ClinicalDomain::Hemodynamic => vec![factor(
            "blood_pressure",
            HEMODYNAMIC_WEIGHT,
            PRESSURE_TIERS
                .iter()
                .map(|(sbp, dbp, share)| match dbp {
                    Some(dbp) => format!("SBP >= {sbp} or DBP >= {dbp}: {}%", pct(*share)),
                    None => format!("SBP >= {sbp}: {}%", pct(*share)),
                })
                .collect(),
        )],
        ClinicalDomain::Metabolic => vec![
            factor(
                "glucose",
                METABOLIC_SUB_WEIGHT,
                at_least_rules("glucose", &GLUCOSE_TIERS),
            ),
            factor(
                "hdl",
                METABOLIC_SUB_WEIGHT,
                vec![format!(
                    "HDL < {HDL_MIN_MALE} (male) / {HDL_MIN_FEMALE} (female): {}%",
                    pct(LOW_HDL_SHARE)
                )],
            ),
            factor("ldl", METABOLIC_SUB_WEIGHT, at_least_rules("LDL", &LDL_TIERS)),
            factor(
                "triglycerides",
                METABOLIC_SUB_WEIGHT,
                at_least_rules("TG", &TRIGLYCERIDE_TIERS),
            ),
        ],
        ClinicalDomain::Nutritional => vec![
            factor(
                "caloric_excess",
                CALORIC_EXCESS_WEIGHT,
                CALORIC_EXCESS_TIERS
                    .iter()
                    .map(|(ratio, share)| {
                        format!(
                            "intake > {}% of BMR x {ACTIVITY_FACTOR}: {}%",
                            pct(*ratio),
                            pct(*share)
                        )
                    })
                    .collect(),
            ),
            factor(
                "macro_balance",
                MACRO_BALANCE_WEIGHT,
                vec![format!(
                    "each macro outside protein {}-{}%, carb {}-{}%, fat {}-{}%: 1/3",
                    PROTEIN_RANGE.0,
                    PROTEIN_RANGE.1,
                    CARB_RANGE.0,
                    CARB_RANGE.1,
                    FAT_RANGE.0,
                    FAT_RANGE.1
                )],
            ),
            factor(
                "sugar",
                SUGAR_WEIGHT,
                vec![format!(
                    "sugar > {SUGAR_LIMIT_PCT}% of calories: proportional, 100% at {SUGAR_CEILING_PCT}%"
                )],
            ),
            factor(
                "fiber",
                FIBER_WEIGHT,
                vec![
                    format!(
                        "fiber < {}% of minimum ({FIBER_MIN_MALE} g male / {FIBER_MIN_FEMALE} g female): 100%",
                        pct(FIBER_SEVERE_FRACTION)
                    ),
                    "fiber < minimum: 50%".to_string(),
                ],
            ),
        ],
        ClinicalDomain::Behavioral => vec![
            factor(
                "smoking",
                SMOKING_WEIGHT,
                vec!["current smoker: 100%".to_string()],
            ),
            factor(
                "physical_activity",
                ACTIVITY_WEIGHT,
                ACTIVITY_TIERS
                    .iter()
                    .map(|(days, share)| format!("active days < {days}: {}%", pct(*share)))
                    .collect(),
            ),
        ],
    }
}

fn factor(name: &str, sub_weight: f64, rules: Vec<String>) -> FactorRule {
    FactorRule {
        factor: name.to_string(),
        sub_weight,
        rules,
    }
}

fn at_least_rules(label: &str, tiers: &[Tier]) -> Vec<String> {
    tiers
        .iter()
        .map(|(threshold, share)| format!("{label} >= {threshold}: {}%", pct(*share)))
        .collect()
}

fn pct(share: f64) -> f64 {
    (share * 100.0).round()
}

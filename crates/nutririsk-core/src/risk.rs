use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Upper bound (inclusive) of the `saludable` band on the 0–100 scale.
pub const HEALTHY_MAX: f64 = 25.0;

/// Upper bound (inclusive) of the `moderado` band on the 0–100 scale.
pub const MODERATE_MAX: f64 = 55.0;

/// Ordinal risk label shared by the questionnaire and the clinical scorer.
///
/// Variants are declared from healthiest to riskiest, so `Ord` follows
/// clinical severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskLabel {
    Saludable,
    Moderado,
    Alto,
}

impl RiskLabel {
    pub const ALL: [RiskLabel; 3] = [RiskLabel::Saludable, RiskLabel::Moderado, RiskLabel::Alto];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Saludable => "saludable",
            RiskLabel::Moderado => "moderado",
            RiskLabel::Alto => "alto",
        }
    }

    /// Fixed advice sentence shown next to the label.
    pub fn interpretation(&self) -> &'static str {
        match self {
            RiskLabel::Saludable => {
                "Perfil de riesgo bajo. Mantén tus hábitos y monitoreo preventivo."
            }
            RiskLabel::Moderado => {
                "Riesgo intermedio. Ajusta hábitos nutricionales para revertir la tendencia."
            }
            RiskLabel::Alto => {
                "Riesgo alto. Busca acompañamiento profesional y realiza cambios inmediatos."
            }
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLabel {
    type Err = CoreError;

    /// Accepts the Spanish labels and the `low`/`medium`/`high` names some
    /// older model artifacts emit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saludable" | "low" | "bajo" => Ok(RiskLabel::Saludable),
            "moderado" | "medium" | "moderate" => Ok(RiskLabel::Moderado),
            "alto" | "high" => Ok(RiskLabel::Alto),
            _ => Err(CoreError::UnknownLabel(s.to_string())),
        }
    }
}

/// Map a normalized 0–100 score to its risk band.
///
/// Both cutoffs are inclusive to the healthier band: 25.0 is `saludable`
/// and 55.0 is `moderado`. A NaN score fails both comparisons and lands in
/// `alto`; callers only pass finite scores.
pub fn classify(score_normalized: f64) -> RiskLabel {
    if score_normalized <= HEALTHY_MAX {
        RiskLabel::Saludable
    } else if score_normalized <= MODERATE_MAX {
        RiskLabel::Moderado
    } else {
        RiskLabel::Alto
    }
}

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Atwater energy factors, kcal per gram.
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
pub const CARB_KCAL_PER_G: f64 = 4.0;
pub const FAT_KCAL_PER_G: f64 = 9.0;
pub const SUGAR_KCAL_PER_G: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// NHANES `RIAGENDR` coding: 1 = male, 2 = female.
    pub fn from_code(code: f64) -> Option<Sex> {
        if code == 1.0 {
            Some(Sex::Male)
        } else if code == 2.0 {
            Some(Sex::Female)
        } else {
            None
        }
    }

    pub fn code(&self) -> f64 {
        match self {
            Sex::Male => 1.0,
            Sex::Female => 2.0,
        }
    }
}

impl FromStr for Sex {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<f64>() {
            return Sex::from_code(code).ok_or_else(|| CoreError::UnknownSex(s.to_string()));
        }
        match trimmed.to_lowercase().as_str() {
            "m" | "male" | "hombre" | "masculino" => Ok(Sex::Male),
            "f" | "female" | "mujer" | "femenino" => Ok(Sex::Female),
            _ => Err(CoreError::UnknownSex(s.to_string())),
        }
    }
}

/// One surveyed individual. Every measurement is independently optional.
///
/// Height is always centimeters here; unit detection happens where the
/// record is built from raw survey columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubjectRecord {
    pub subject_id: String,

    // Demographic
    pub age_years: Option<f64>,
    pub sex: Option<Sex>,

    // Anthropometric
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    /// Native BMI when the survey ships one; preferred over the computed value.
    pub bmi: Option<f64>,

    // Hemodynamic
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,

    // Metabolic (mg/dL)
    pub glucose: Option<f64>,
    pub hdl: Option<f64>,
    pub ldl: Option<f64>,
    pub triglycerides: Option<f64>,

    // Dietary, 24h recall
    pub energy_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub carb_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub sodium_mg: Option<f64>,

    // Behavioral
    pub smoker: Option<bool>,
    pub alcohol_days: Option<f64>,
    pub activity_days: Option<f64>,
}

/// Share of total energy supplied by each macronutrient, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MacroShares {
    pub protein_pct: Option<f64>,
    pub carb_pct: Option<f64>,
    pub fat_pct: Option<f64>,
}

impl MacroShares {
    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> {
        [self.protein_pct, self.carb_pct, self.fat_pct].into_iter()
    }
}

impl SubjectRecord {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            ..Self::default()
        }
    }

    /// Native BMI if present, else `weight / height_m²`.
    pub fn effective_bmi(&self) -> Option<f64> {
        if let Some(bmi) = finite(self.bmi) {
            return Some(bmi);
        }
        let weight = finite(self.weight_kg)?;
        let height_m = finite(self.height_cm)? / 100.0;
        if height_m <= 0.0 {
            return None;
        }
        finite(Some(weight / (height_m * height_m)))
    }

    /// Percent of calories from protein, carbohydrate and fat.
    ///
    /// Missing or non-positive calories leave all three missing; a missing
    /// gram value only blanks its own share.
    pub fn macro_shares(&self) -> MacroShares {
        let Some(kcal) = positive(self.energy_kcal) else {
            return MacroShares::default();
        };
        MacroShares {
            protein_pct: energy_share(self.protein_g, PROTEIN_KCAL_PER_G, kcal),
            carb_pct: energy_share(self.carb_g, CARB_KCAL_PER_G, kcal),
            fat_pct: energy_share(self.fat_g, FAT_KCAL_PER_G, kcal),
        }
    }

    /// Percent of calories from total sugars.
    pub fn sugar_share(&self) -> Option<f64> {
        let kcal = positive(self.energy_kcal)?;
        energy_share(self.sugar_g, SUGAR_KCAL_PER_G, kcal)
    }
}

fn energy_share(grams: Option<f64>, kcal_per_g: f64, total_kcal: f64) -> Option<f64> {
    finite(grams).map(|g| g * kcal_per_g / total_kcal * 100.0)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn positive(value: Option<f64>) -> Option<f64> {
    finite(value).filter(|v| *v > 0.0)
}

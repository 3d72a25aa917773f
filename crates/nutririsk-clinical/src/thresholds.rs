//! Cut points and sub-weights of the clinical scorer.
//!
//! Tier tables are ordered from most to least severe; the first tier whose
//! threshold is met decides the share of the (sub-)weight earned.

use nutririsk_core::models::subject::Sex;

/// `(threshold, share)`: value ≥ threshold earns `share` of the weight.
pub type Tier = (f64, f64);

/// Blood-pressure tier: met when systolic ≥ first or diastolic ≥ second.
pub type PressureTier = (f64, Option<f64>, f64);

pub const ANTHROPOMETRIC_WEIGHT: f64 = 20.0;
pub const HEMODYNAMIC_WEIGHT: f64 = 25.0;
pub const METABOLIC_WEIGHT: f64 = 30.0;
pub const NUTRITIONAL_WEIGHT: f64 = 15.0;
pub const BEHAVIORAL_WEIGHT: f64 = 10.0;

pub const BMI_TIERS: [Tier; 4] = [(40.0, 1.0), (35.0, 0.8), (30.0, 0.6), (25.0, 0.3)];

pub const PRESSURE_TIERS: [PressureTier; 4] = [
    (180.0, Some(120.0), 1.0),
    (140.0, Some(90.0), 0.8),
    (130.0, Some(80.0), 0.5),
    (120.0, None, 0.2),
];

/// Each of glucose, HDL, LDL and triglycerides carries a quarter of the
/// metabolic weight.
pub const METABOLIC_SUB_WEIGHT: f64 = METABOLIC_WEIGHT / 4.0;

pub const GLUCOSE_TIERS: [Tier; 2] = [(126.0, 1.0), (100.0, 0.5)];
pub const LDL_TIERS: [Tier; 3] = [(190.0, 1.0), (160.0, 0.8), (130.0, 0.4)];
pub const TRIGLYCERIDE_TIERS: [Tier; 3] = [(500.0, 1.0), (200.0, 0.6), (150.0, 0.3)];

/// Share of the HDL sub-weight earned when HDL is below the sex threshold.
pub const LOW_HDL_SHARE: f64 = 0.8;
pub const HDL_MIN_MALE: f64 = 40.0;
pub const HDL_MIN_FEMALE: f64 = 50.0;

pub const CALORIC_EXCESS_WEIGHT: f64 = 5.0;
pub const MACRO_BALANCE_WEIGHT: f64 = 5.0;
pub const SUGAR_WEIGHT: f64 = 2.5;
pub const FIBER_WEIGHT: f64 = 2.5;

/// `(intake / estimated need, share)`: intake strictly above the ratio earns
/// `share` of the caloric-excess weight.
pub const CALORIC_EXCESS_TIERS: [Tier; 2] = [(1.3, 0.8), (1.1, 0.4)];

/// Acceptable macronutrient ranges, percent of calories (inclusive).
pub const PROTEIN_RANGE: (f64, f64) = (10.0, 35.0);
pub const CARB_RANGE: (f64, f64) = (45.0, 65.0);
pub const FAT_RANGE: (f64, f64) = (20.0, 35.0);

/// Sugar above this share of calories starts to be penalized.
pub const SUGAR_LIMIT_PCT: f64 = 10.0;
/// Sugar at or above this share earns the full sugar weight.
pub const SUGAR_CEILING_PCT: f64 = 20.0;

pub const FIBER_MIN_MALE: f64 = 38.0;
pub const FIBER_MIN_FEMALE: f64 = 25.0;
/// Intake below this fraction of the minimum earns the full fiber weight;
/// anything else under the minimum earns half.
pub const FIBER_SEVERE_FRACTION: f64 = 0.5;

pub const SMOKING_WEIGHT: f64 = 5.0;
pub const ACTIVITY_WEIGHT: f64 = 5.0;
/// `(days, share)`: fewer active days than `days` earns `share`.
pub const ACTIVITY_TIERS: [Tier; 2] = [(2.0, 0.8), (3.0, 0.4)];

/// HDL floor by sex. Unknown sex uses the male floor.
pub fn hdl_minimum(sex: Option<Sex>) -> f64 {
    match sex {
        Some(Sex::Female) => HDL_MIN_FEMALE,
        _ => HDL_MIN_MALE,
    }
}

/// Daily fiber minimum by sex. Unknown sex uses the female minimum.
pub fn fiber_minimum(sex: Option<Sex>) -> f64 {
    match sex {
        Some(Sex::Male) => FIBER_MIN_MALE,
        _ => FIBER_MIN_FEMALE,
    }
}

/// Share earned by `value` against a descending `value ≥ threshold` table.
pub fn tier_share(value: f64, tiers: &[Tier]) -> f64 {
    tiers
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(0.0, |(_, share)| *share)
}

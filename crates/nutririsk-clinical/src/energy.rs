use nutririsk_core::models::subject::{Sex, SubjectRecord};

/// Multiplier from basal to daily energy need (moderately active adult).
pub const ACTIVITY_FACTOR: f64 = 1.6;

/// Reference body used when the record lacks weight or height.
const REFERENCE_MALE: (f64, f64) = (70.0, 175.0);
const REFERENCE_FEMALE: (f64, f64) = (60.0, 162.0);

/// Basal metabolic rate in kcal/day (Mifflin–St Jeor).
///
/// Needs age and sex. Missing weight or height falls back to a reference
/// adult of the same sex.
pub fn basal_metabolic_rate(record: &SubjectRecord) -> Option<f64> {
    let sex = record.sex?;
    let age = record.age_years.filter(|a| a.is_finite() && *a >= 0.0)?;

    let ((ref_weight, ref_height), sex_constant) = match sex {
        Sex::Male => (REFERENCE_MALE, 5.0),
        Sex::Female => (REFERENCE_FEMALE, -161.0),
    };
    let weight = record
        .weight_kg
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(ref_weight);
    let height = record
        .height_cm
        .filter(|h| h.is_finite() && *h > 0.0)
        .unwrap_or(ref_height);

    let bmr = 10.0 * weight + 6.25 * height - 5.0 * age + sex_constant;
    (bmr > 0.0).then_some(bmr)
}

/// Estimated daily energy need in kcal.
pub fn estimated_energy_need(record: &SubjectRecord) -> Option<f64> {
    basal_metabolic_rate(record).map(|bmr| bmr * ACTIVITY_FACTOR)
}

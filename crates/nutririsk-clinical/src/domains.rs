use serde::{Deserialize, Serialize};
use ts_rs::TS;

use nutririsk_core::models::subject::SubjectRecord;

use crate::energy::estimated_energy_need;
use crate::thresholds::*;

/// The five weighted risk categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClinicalDomain {
    Anthropometric,
    Hemodynamic,
    Metabolic,
    Nutritional,
    Behavioral,
}

impl ClinicalDomain {
    pub const ALL: [ClinicalDomain; 5] = [
        ClinicalDomain::Anthropometric,
        ClinicalDomain::Hemodynamic,
        ClinicalDomain::Metabolic,
        ClinicalDomain::Nutritional,
        ClinicalDomain::Behavioral,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            ClinicalDomain::Anthropometric => ANTHROPOMETRIC_WEIGHT,
            ClinicalDomain::Hemodynamic => HEMODYNAMIC_WEIGHT,
            ClinicalDomain::Metabolic => METABOLIC_WEIGHT,
            ClinicalDomain::Nutritional => NUTRITIONAL_WEIGHT,
            ClinicalDomain::Behavioral => BEHAVIORAL_WEIGHT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClinicalDomain::Anthropometric => "anthropometric",
            ClinicalDomain::Hemodynamic => "hemodynamic",
            ClinicalDomain::Metabolic => "metabolic",
            ClinicalDomain::Nutritional => "nutritional",
            ClinicalDomain::Behavioral => "behavioral",
        }
    }

    /// Weighted points earned by `record` in this domain, or `None` when
    /// the record has no input for it.
    pub fn points(&self, record: &SubjectRecord) -> Option<f64> {
        match self {
            ClinicalDomain::Anthropometric => anthropometric(record),
            ClinicalDomain::Hemodynamic => hemodynamic(record),
            ClinicalDomain::Metabolic => metabolic(record),
            ClinicalDomain::Nutritional => nutritional(record),
            ClinicalDomain::Behavioral => behavioral(record),
        }
    }
}

fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn anthropometric(record: &SubjectRecord) -> Option<f64> {
    let bmi = record.effective_bmi()?;
    Some(ANTHROPOMETRIC_WEIGHT * tier_share(bmi, &BMI_TIERS))
}

fn hemodynamic(record: &SubjectRecord) -> Option<f64> {
    let systolic = known(record.systolic_bp);
    let diastolic = known(record.diastolic_bp);
    if systolic.is_none() && diastolic.is_none() {
        return None;
    }

    let share = PRESSURE_TIERS
        .iter()
        .find(|(sbp_min, dbp_min, _)| {
            systolic.is_some_and(|s| s >= *sbp_min)
                || matches!((diastolic, dbp_min), (Some(d), Some(min)) if d >= *min)
        })
        .map_or(0.0, |(_, _, share)| *share);

    Some(HEMODYNAMIC_WEIGHT * share)
}

fn metabolic(record: &SubjectRecord) -> Option<f64> {
    let glucose = known(record.glucose);
    let hdl = known(record.hdl);
    let ldl = known(record.ldl);
    let triglycerides = known(record.triglycerides);
    if glucose.is_none() && hdl.is_none() && ldl.is_none() && triglycerides.is_none() {
        return None;
    }

    let hdl_share = hdl
        .filter(|h| *h < hdl_minimum(record.sex))
        .map_or(0.0, |_| LOW_HDL_SHARE);

    let share = glucose.map_or(0.0, |g| tier_share(g, &GLUCOSE_TIERS))
        + hdl_share
        + ldl.map_or(0.0, |l| tier_share(l, &LDL_TIERS))
        + triglycerides.map_or(0.0, |t| tier_share(t, &TRIGLYCERIDE_TIERS));

    Some(METABOLIC_SUB_WEIGHT * share)
}

fn nutritional(record: &SubjectRecord) -> Option<f64> {
    let kcal = known(record.energy_kcal).filter(|k| *k > 0.0);
    let fiber = known(record.fiber_g);
    if kcal.is_none() && fiber.is_none() {
        return None;
    }

    let mut points = 0.0;

    if let (Some(kcal), Some(need)) = (kcal, estimated_energy_need(record)) {
        let ratio = kcal / need;
        let share = CALORIC_EXCESS_TIERS
            .iter()
            .find(|(limit, _)| ratio > *limit)
            .map_or(0.0, |(_, share)| *share);
        points += CALORIC_EXCESS_WEIGHT * share;
    }

    let out_of_band = record
        .macro_shares()
        .iter()
        .zip([PROTEIN_RANGE, CARB_RANGE, FAT_RANGE])
        .filter(|(pct, (lo, hi))| pct.is_some_and(|p| p < *lo || p > *hi))
        .count();
    points += MACRO_BALANCE_WEIGHT * out_of_band as f64 / 3.0;

    if let Some(sugar_pct) = record.sugar_share()
        && sugar_pct > SUGAR_LIMIT_PCT
    {
        let excess = (sugar_pct - SUGAR_LIMIT_PCT) / (SUGAR_CEILING_PCT - SUGAR_LIMIT_PCT);
        points += SUGAR_WEIGHT * excess.min(1.0);
    }

    if let Some(fiber) = fiber {
        let minimum = fiber_minimum(record.sex);
        if fiber < minimum * FIBER_SEVERE_FRACTION {
            points += FIBER_WEIGHT;
        } else if fiber < minimum {
            points += FIBER_WEIGHT * 0.5;
        }
    }

    Some(points)
}

fn behavioral(record: &SubjectRecord) -> Option<f64> {
    let activity = known(record.activity_days);
    if record.smoker.is_none() && activity.is_none() {
        return None;
    }

    let smoking = if record.smoker == Some(true) {
        SMOKING_WEIGHT
    } else {
        0.0
    };
    let inactivity = activity.map_or(0.0, |days| {
        ACTIVITY_TIERS
            .iter()
            .find(|(limit, _)| days < *limit)
            .map_or(0.0, |(_, share)| ACTIVITY_WEIGHT * share)
    });

    Some(smoking + inactivity)
}

//! Questionnaire items derived from raw NHANES questionnaire, dietary
//! recall and medication tables.
//!
//! Each item scorer returns points on the registry's scale, or `None` when
//! the survey gives nothing to score it from.

use std::collections::HashMap;

use serde::Serialize;

use nutririsk_core::models::evaluation::EvaluationResult;
use nutririsk_scorecard::{AnswerSet, evaluate};

use crate::error::FeatureError;
use crate::table::{RowRef, SurveyTable, subject_key};

/// Upper-cased fragments of medication names that count as supplements.
pub const SUPPLEMENT_KEYWORDS: [&str; 13] = [
    "VITAMIN",
    "VIT ",
    "OMEGA",
    "FISH OIL",
    "CALCIUM",
    "MAGNESIUM",
    "ZINC",
    "MULTI",
    "B12",
    "FOLIC",
    "SELENIUM",
    "IRON",
    "MINERAL",
];

pub const DRUG_NAME_COLUMN: &str = "RXDDRUG";

/// Items a row must score to be kept.
pub const CORE_ITEMS: [&str; 6] = [
    "alcohol",
    "frutas",
    "verduras",
    "bebidas_azucaradas",
    "comida_rapida",
    "sal_mesa",
];

/// Items imputed with the column median when missing.
pub const IMPUTED_ITEMS: [&str; 4] = ["agua", "granos_integrales", "suplementos", "desayuno"];

const WEEKS_PER_MONTH: f64 = 4.345;
const WEEKS_PER_YEAR: f64 = 52.0;

/// Raw survey answers and dietary totals used by the item scorers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemInputs {
    /// ALQ101: had at least 12 drinks in any year (1 yes, 2 no).
    pub drank_ever: Option<f64>,
    /// ALQ120Q / ALQ120U: drinking frequency and its unit.
    pub drink_frequency: Option<f64>,
    pub drink_frequency_unit: Option<f64>,
    /// DBQ197: daily fruit servings.
    pub fruit_servings: Option<f64>,
    /// DBD381: daily vegetable servings.
    pub vegetable_servings: Option<f64>,
    /// DBQ010: eats breakfast (1 yes, 2 no, 9 unknown).
    pub breakfast: Option<f64>,
    pub energy_kcal: Option<f64>,
    pub vitamin_c_mg: Option<f64>,
    pub fiber_g: Option<f64>,
    pub carb_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub saturated_fat_g: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub water_g: Option<f64>,
    pub alcohol_g: Option<f64>,
    pub takes_supplement: bool,
}

impl ItemInputs {
    pub fn from_row(row: &RowRef<'_>, takes_supplement: bool) -> Self {
        Self {
            drank_ever: row.number("ALQ101"),
            drink_frequency: row.number("ALQ120Q"),
            drink_frequency_unit: row.number("ALQ120U"),
            fruit_servings: row.number("DBQ197"),
            vegetable_servings: row.number("DBD381"),
            breakfast: row.number("DBQ010"),
            energy_kcal: row.number("DR1TKCAL"),
            vitamin_c_mg: row.number("DR1TVC"),
            fiber_g: row.number("DR1TFIBE"),
            carb_g: row.number("DR1TCARB"),
            sugar_g: row.number("DR1TSUGR"),
            saturated_fat_g: row.number("DR1TSFAT"),
            sodium_mg: row.number("DR1TSODI"),
            water_g: row.number("DR1TWS"),
            alcohol_g: row.number("DR1TALCO"),
            takes_supplement,
        }
    }
}

/// Points for the first threshold `value` reaches, scanning high to low.
fn at_least(value: f64, tiers: &[(f64, f64)], otherwise: f64) -> f64 {
    tiers
        .iter()
        .find(|(min, _)| value >= *min)
        .map_or(otherwise, |(_, points)| *points)
}

/// Points for the first limit `value` stays within, scanning low to high.
fn at_most(value: f64, tiers: &[(f64, f64)], otherwise: f64) -> f64 {
    tiers
        .iter()
        .find(|(max, _)| value <= *max)
        .map_or(otherwise, |(_, points)| *points)
}

pub fn alcohol_score(inputs: &ItemInputs) -> Option<f64> {
    if inputs.drank_ever == Some(2.0) {
        return Some(0.0);
    }
    let per_week = match inputs.drink_frequency {
        Some(value) => match inputs.drink_frequency_unit {
            Some(u) if u == 1.0 => value,
            Some(u) if u == 2.0 => value / WEEKS_PER_MONTH,
            _ => value / WEEKS_PER_YEAR,
        },
        None if inputs.alcohol_g.is_some_and(|g| g > 0.0) => 1.0,
        None => 0.0,
    };
    if per_week <= 0.0 {
        return Some(0.0);
    }
    Some(at_most(per_week, &[(0.75, 3.0), (3.5, 7.0)], 10.0))
}

const SERVING_TIERS: [(f64, f64); 3] = [(3.0, 0.0), (2.0, 3.0), (1.0, 7.0)];

pub fn fruit_score(inputs: &ItemInputs) -> Option<f64> {
    if let Some(servings) = inputs.fruit_servings {
        return Some(at_least(servings, &SERVING_TIERS, 10.0));
    }
    let vitamin_c = inputs.vitamin_c_mg?;
    Some(at_least(vitamin_c, &[(120.0, 0.0), (60.0, 3.0), (30.0, 7.0)], 10.0))
}

pub fn vegetable_score(inputs: &ItemInputs) -> Option<f64> {
    if let Some(servings) = inputs.vegetable_servings {
        return Some(at_least(servings, &SERVING_TIERS, 10.0));
    }
    let fiber = inputs.fiber_g?;
    Some(at_least(fiber, &[(25.0, 0.0), (18.0, 3.0), (12.0, 7.0)], 10.0))
}

pub fn sugary_drinks_score(inputs: &ItemInputs) -> Option<f64> {
    let sugar = inputs.sugar_g?;
    Some(at_most(sugar, &[(25.0, 0.0), (50.0, 3.0), (75.0, 7.0)], 10.0))
}

pub fn fast_food_score(inputs: &ItemInputs) -> Option<f64> {
    let saturated = inputs.saturated_fat_g?;
    Some(at_most(saturated, &[(15.0, 0.0), (25.0, 4.0), (35.0, 7.0)], 10.0))
}

pub fn water_score(inputs: &ItemInputs) -> Option<f64> {
    let liters = inputs.water_g? / 1000.0;
    Some(at_least(liters, &[(1.5, 0.0), (1.0, 3.0), (0.5, 7.0)], 10.0))
}

pub fn whole_grain_score(inputs: &ItemInputs) -> Option<f64> {
    let fiber = inputs.fiber_g?;
    let carbs = inputs.carb_g.filter(|c| *c > 0.0)?;
    Some(at_least(fiber / carbs, &[(0.15, 0.0), (0.10, 3.0), (0.05, 7.0)], 10.0))
}

pub fn salt_score(inputs: &ItemInputs) -> Option<f64> {
    let sodium = inputs.sodium_mg?;
    Some(at_most(sodium, &[(1500.0, 0.0), (2300.0, 3.0), (3000.0, 7.0)], 10.0))
}

pub fn supplement_score(inputs: &ItemInputs) -> Option<f64> {
    Some(if inputs.takes_supplement { 0.0 } else { 5.0 })
}

pub fn breakfast_score(inputs: &ItemInputs) -> Option<f64> {
    match inputs.breakfast {
        Some(b) if b == 1.0 => Some(if inputs.energy_kcal.is_some_and(|k| k < 1200.0) {
            4.0
        } else {
            0.0
        }),
        Some(b) if b == 2.0 => Some(10.0),
        Some(b) if b == 9.0 => Some(7.0),
        _ => None,
    }
}

type ItemScorer = fn(&ItemInputs) -> Option<f64>;

/// Item scorers keyed by questionnaire id, in registry order.
pub const ITEM_SCORERS: [(&str, ItemScorer); 10] = [
    ("alcohol", alcohol_score),
    ("frutas", fruit_score),
    ("verduras", vegetable_score),
    ("bebidas_azucaradas", sugary_drinks_score),
    ("comida_rapida", fast_food_score),
    ("agua", water_score),
    ("granos_integrales", whole_grain_score),
    ("sal_mesa", salt_score),
    ("suplementos", supplement_score),
    ("desayuno", breakfast_score),
];

/// Score every item for one subject.
pub fn score_items(inputs: &ItemInputs) -> Vec<(&'static str, Option<f64>)> {
    ITEM_SCORERS
        .iter()
        .map(|(id, scorer)| (*id, scorer(inputs)))
        .collect()
}

/// Whether each subject takes any supplement, by subject id.
///
/// A table without a drug-name column yields an empty map.
pub fn supplement_map(medications: &SurveyTable, subject_column: &str) -> HashMap<String, bool> {
    let mut map = HashMap::new();
    if medications.column_index(DRUG_NAME_COLUMN).is_none() {
        return map;
    }
    for row in medications.rows() {
        let Some(id) = row.text(subject_column) else {
            continue;
        };
        let is_supplement = row.text(DRUG_NAME_COLUMN).is_some_and(|drug| {
            let upper = drug.to_uppercase();
            SUPPLEMENT_KEYWORDS.iter().any(|k| upper.contains(k))
        });
        *map.entry(subject_key(id)).or_insert(false) |= is_supplement;
    }
    map
}

/// One labelled questionnaire row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionnaireRow {
    pub subject_id: String,
    /// Item points in registry order, after imputation.
    pub items: Vec<(String, f64)>,
    pub evaluation: EvaluationResult,
}

impl QuestionnaireRow {
    pub fn item(&self, id: &str) -> Option<f64> {
        self.items.iter().find(|(i, _)| i == id).map(|(_, v)| *v)
    }
}

/// Derive and label questionnaire items for every subject of the
/// questionnaire table.
///
/// Rows missing any core item are dropped. Missing optional items take the
/// column median, or a fixed default when nobody answered them.
pub fn build_questionnaire_dataset(
    questionnaire: &SurveyTable,
    diet: &SurveyTable,
    medications: &SurveyTable,
    subject_column: &str,
) -> Result<Vec<QuestionnaireRow>, FeatureError> {
    let base = questionnaire.left_join(diet, subject_column, "_die")?;
    let supplements = supplement_map(medications, subject_column);

    let mut scored: Vec<(String, Vec<(&'static str, Option<f64>)>)> = Vec::new();
    let mut dropped = 0usize;
    for row in base.rows() {
        let Some(id) = row.text(subject_column).map(subject_key) else {
            dropped += 1;
            continue;
        };
        let takes_supplement = supplements.get(&id).copied().unwrap_or(false);
        let items = score_items(&ItemInputs::from_row(&row, takes_supplement));
        let complete = items
            .iter()
            .filter(|(item, _)| CORE_ITEMS.contains(item))
            .all(|(_, value)| value.is_some());
        if complete {
            scored.push((id, items));
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::info!(rows = dropped, "questionnaire rows without core items dropped");
    }

    let fills: Vec<(&str, f64)> = IMPUTED_ITEMS
        .iter()
        .map(|item| {
            let observed: Vec<f64> = scored
                .iter()
                .filter_map(|(_, items)| item_value(items, item))
                .collect();
            let fill = median(&observed).unwrap_or_else(|| imputation_default(item));
            (*item, fill)
        })
        .collect();

    Ok(scored
        .into_iter()
        .map(|(subject_id, items)| {
            let items: Vec<(String, f64)> = items
                .into_iter()
                .map(|(item, value)| {
                    let filled = value.or_else(|| {
                        fills.iter().find(|(i, _)| *i == item).map(|(_, f)| *f)
                    });
                    (item.to_string(), filled.unwrap_or(0.0))
                })
                .collect();
            let answers: AnswerSet = items.iter().map(|(id, v)| (id.clone(), *v)).collect();
            QuestionnaireRow {
                subject_id,
                evaluation: evaluate(&answers),
                items,
            }
        })
        .collect())
}

fn item_value(items: &[(&str, Option<f64>)], id: &str) -> Option<f64> {
    items.iter().find(|(i, _)| *i == id).and_then(|(_, v)| *v)
}

fn imputation_default(item: &str) -> f64 {
    if item == "suplementos" { 5.0 } else { 7.0 }
}

/// Median with the two middle values averaged for even counts.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

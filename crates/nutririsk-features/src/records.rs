use nutririsk_core::models::subject::{Sex, SubjectRecord};

use crate::columns::{ColumnMap, SemanticField};
use crate::config::PipelineConfig;
use crate::error::FeatureError;
use crate::table::{RowRef, SurveyTable, subject_key};

/// Above this maximum observed height the column is taken to be centimeters.
pub const CENTIMETER_HEIGHT_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightUnit {
    Centimeters,
    Meters,
}

impl HeightUnit {
    /// Infer the unit of a height column from its largest value.
    pub fn detect(column_max: Option<f64>) -> HeightUnit {
        match column_max {
            Some(max) if max > CENTIMETER_HEIGHT_THRESHOLD => HeightUnit::Centimeters,
            _ => HeightUnit::Meters,
        }
    }

    pub fn to_centimeters(self, value: f64) -> f64 {
        match self {
            HeightUnit::Centimeters => value,
            HeightUnit::Meters => value * 100.0,
        }
    }
}

/// Build one [`SubjectRecord`] per table row that carries a subject id.
pub fn subject_records(
    table: &SurveyTable,
    columns: &ColumnMap,
    config: &PipelineConfig,
) -> Result<Vec<SubjectRecord>, FeatureError> {
    table.require_column(&config.subject_column)?;

    let height_unit = columns
        .get(SemanticField::Height)
        .map(|column| HeightUnit::detect(table.column_max(column)))
        .unwrap_or(HeightUnit::Centimeters);

    let mut records = Vec::with_capacity(table.len());
    let mut skipped = 0usize;
    for row in table.rows() {
        let Some(id) = row.text(&config.subject_column) else {
            skipped += 1;
            continue;
        };
        records.push(subject_record(
            subject_key(id),
            &row,
            columns,
            height_unit,
            config.smoker_yes_code,
        ));
    }
    if skipped > 0 {
        tracing::warn!(rows = skipped, "rows without a subject id skipped");
    }
    Ok(records)
}

fn subject_record(
    subject_id: String,
    row: &RowRef<'_>,
    columns: &ColumnMap,
    height_unit: HeightUnit,
    smoker_yes_code: f64,
) -> SubjectRecord {
    let number = |field: SemanticField| columns.get(field).and_then(|c| row.number(c));

    SubjectRecord {
        subject_id,
        age_years: number(SemanticField::Age),
        sex: columns
            .get(SemanticField::Sex)
            .and_then(|c| row.text(c))
            .and_then(|raw| raw.parse::<Sex>().ok()),
        height_cm: number(SemanticField::Height).map(|h| height_unit.to_centimeters(h)),
        weight_kg: number(SemanticField::Weight),
        bmi: number(SemanticField::Bmi),
        systolic_bp: number(SemanticField::SystolicBp),
        diastolic_bp: number(SemanticField::DiastolicBp),
        glucose: number(SemanticField::Glucose),
        hdl: number(SemanticField::Hdl),
        ldl: number(SemanticField::Ldl),
        triglycerides: number(SemanticField::Triglycerides),
        energy_kcal: number(SemanticField::EnergyKcal),
        protein_g: number(SemanticField::ProteinG),
        carb_g: number(SemanticField::CarbG),
        fat_g: number(SemanticField::FatG),
        sugar_g: number(SemanticField::SugarG),
        fiber_g: number(SemanticField::FiberG),
        sodium_mg: number(SemanticField::SodiumMg),
        smoker: columns
            .get(SemanticField::Smoker)
            .map(|c| row.number(c) == Some(smoker_yes_code)),
        alcohol_days: number(SemanticField::AlcoholDays),
        activity_days: number(SemanticField::ActivityDays),
    }
}

//! Derived feature vectors.
//!
//! The schema depends on which columns a dataset resolved: a feature with no
//! usable source is left out of the schema entirely rather than carried as
//! an always-missing column.

use serde::Serialize;
use serde::ser::SerializeMap;

use nutririsk_core::models::subject::SubjectRecord;

use crate::columns::{ColumnMap, SemanticField};
use crate::config::PipelineConfig;
use crate::error::FeatureError;
use crate::records::subject_records;
use crate::table::SurveyTable;

/// What a feature slot computes from a subject record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Age,
    Sex,
    Bmi,
    SystolicBp,
    DiastolicBp,
    EnergyKcal,
    PctProtein,
    PctCarb,
    PctFat,
    SugarG,
    FiberG,
    SodiumMg,
    IsSmoker,
    AlcoholDays,
    ActivityDays,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 15] = [
        FeatureKind::Age,
        FeatureKind::Sex,
        FeatureKind::Bmi,
        FeatureKind::SystolicBp,
        FeatureKind::DiastolicBp,
        FeatureKind::EnergyKcal,
        FeatureKind::PctProtein,
        FeatureKind::PctCarb,
        FeatureKind::PctFat,
        FeatureKind::SugarG,
        FeatureKind::FiberG,
        FeatureKind::SodiumMg,
        FeatureKind::IsSmoker,
        FeatureKind::AlcoholDays,
        FeatureKind::ActivityDays,
    ];

    /// Feature name for this slot, or `None` when its inputs did not resolve.
    ///
    /// Passthrough features keep their source column name; computed ones
    /// get a fixed name.
    fn name(self, columns: &ColumnMap) -> Option<String> {
        let passthrough = |field| columns.get(field).map(str::to_string);
        let computed = |name: &str, available: bool| available.then(|| name.to_string());
        let has = |field| columns.contains(field);

        match self {
            FeatureKind::Age => passthrough(SemanticField::Age),
            FeatureKind::Sex => passthrough(SemanticField::Sex),
            FeatureKind::Bmi => computed(
                "BMI",
                has(SemanticField::Bmi)
                    || (has(SemanticField::Height) && has(SemanticField::Weight)),
            ),
            FeatureKind::SystolicBp => computed("SBP", has(SemanticField::SystolicBp)),
            FeatureKind::DiastolicBp => computed("DBP", has(SemanticField::DiastolicBp)),
            FeatureKind::EnergyKcal => passthrough(SemanticField::EnergyKcal),
            FeatureKind::PctProtein => computed(
                "pct_protein",
                has(SemanticField::EnergyKcal) && has(SemanticField::ProteinG),
            ),
            FeatureKind::PctCarb => computed(
                "pct_carb",
                has(SemanticField::EnergyKcal) && has(SemanticField::CarbG),
            ),
            FeatureKind::PctFat => computed(
                "pct_fat",
                has(SemanticField::EnergyKcal) && has(SemanticField::FatG),
            ),
            FeatureKind::SugarG => passthrough(SemanticField::SugarG),
            FeatureKind::FiberG => passthrough(SemanticField::FiberG),
            FeatureKind::SodiumMg => passthrough(SemanticField::SodiumMg),
            FeatureKind::IsSmoker => computed("is_smoker", has(SemanticField::Smoker)),
            FeatureKind::AlcoholDays => computed("alcohol_days", has(SemanticField::AlcoholDays)),
            FeatureKind::ActivityDays => {
                computed("phys_act_days", has(SemanticField::ActivityDays))
            }
        }
    }

    fn value(self, record: &SubjectRecord) -> Option<f64> {
        let value = match self {
            FeatureKind::Age => record.age_years,
            FeatureKind::Sex => record.sex.map(|s| s.code()),
            FeatureKind::Bmi => record.effective_bmi(),
            FeatureKind::SystolicBp => record.systolic_bp,
            FeatureKind::DiastolicBp => record.diastolic_bp,
            FeatureKind::EnergyKcal => record.energy_kcal,
            FeatureKind::PctProtein => record.macro_shares().protein_pct,
            FeatureKind::PctCarb => record.macro_shares().carb_pct,
            FeatureKind::PctFat => record.macro_shares().fat_pct,
            FeatureKind::SugarG => record.sugar_g,
            FeatureKind::FiberG => record.fiber_g,
            FeatureKind::SodiumMg => record.sodium_mg,
            FeatureKind::IsSmoker => record.smoker.map(|s| if s { 1.0 } else { 0.0 }),
            FeatureKind::AlcoholDays => record.alcohol_days,
            FeatureKind::ActivityDays => record.activity_days,
        };
        value.filter(|v| v.is_finite())
    }
}

/// Ordered feature names for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSchema {
    slots: Vec<(FeatureKind, String)>,
}

impl FeatureSchema {
    pub fn from_columns(columns: &ColumnMap) -> Self {
        let slots = FeatureKind::ALL
            .into_iter()
            .filter_map(|kind| kind.name(columns).map(|name| (kind, name)))
            .collect();
        Self { slots }
    }

    pub fn names(&self) -> Vec<String> {
        self.slots.iter().map(|(_, name)| name.clone()).collect()
    }

    pub fn kinds(&self) -> impl Iterator<Item = FeatureKind> + '_ {
        self.slots.iter().map(|(kind, _)| *kind)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Named feature values in schema order. `None` is the missing sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, Option<f64>)>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<f64>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value of `name`; `None` both for unknown names and missing values.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| *v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<f64>)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, Option<f64>)>>(iter: I) -> Self {
        let mut vector = FeatureVector::new();
        for (name, value) in iter {
            vector.insert(name, value);
        }
        vector
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Build the feature vector of one subject. Pure: reads the record and the
/// schema only.
pub fn derive_features(record: &SubjectRecord, schema: &FeatureSchema) -> FeatureVector {
    FeatureVector {
        entries: schema
            .slots
            .iter()
            .map(|(kind, name)| (name.clone(), kind.value(record)))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub subject_id: String,
    pub features: FeatureVector,
}

/// Everything one engineering pass produced from a merged table.
#[derive(Debug, Clone)]
pub struct EngineeredDataset {
    pub columns: ColumnMap,
    pub schema: FeatureSchema,
    pub records: Vec<SubjectRecord>,
    pub rows: Vec<FeatureRow>,
}

/// Resolve columns, build subject records and derive every feature row.
///
/// Reads `table` without modifying it.
pub fn engineer_features(
    table: &SurveyTable,
    config: &PipelineConfig,
) -> Result<EngineeredDataset, FeatureError> {
    let columns = ColumnMap::resolve(table.columns());
    let schema = FeatureSchema::from_columns(&columns);
    let records = subject_records(table, &columns, config)?;
    let rows = records
        .iter()
        .map(|record| FeatureRow {
            subject_id: record.subject_id.clone(),
            features: derive_features(record, &schema),
        })
        .collect();

    tracing::info!(
        subjects = records.len(),
        features = schema.len(),
        "feature engineering complete"
    );
    Ok(EngineeredDataset {
        columns,
        schema,
        records,
        rows,
    })
}

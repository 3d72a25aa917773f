//! Declarative column resolution.
//!
//! Each semantic field owns a prioritized list of candidate column names.
//! Resolution is a pure function over the ordered list of available column
//! names: exact candidates first, then each available column is tried
//! against every candidate as a full-match regular expression.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

/// A survey field the pipeline knows how to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SemanticField {
    Age,
    Sex,
    Height,
    Weight,
    Bmi,
    SystolicBp,
    DiastolicBp,
    Glucose,
    Hdl,
    Ldl,
    Triglycerides,
    EnergyKcal,
    ProteinG,
    CarbG,
    FatG,
    SugarG,
    FiberG,
    SodiumMg,
    Smoker,
    AlcoholDays,
    ActivityDays,
}

impl SemanticField {
    pub const ALL: [SemanticField; 21] = [
        SemanticField::Age,
        SemanticField::Sex,
        SemanticField::Height,
        SemanticField::Weight,
        SemanticField::Bmi,
        SemanticField::SystolicBp,
        SemanticField::DiastolicBp,
        SemanticField::Glucose,
        SemanticField::Hdl,
        SemanticField::Ldl,
        SemanticField::Triglycerides,
        SemanticField::EnergyKcal,
        SemanticField::ProteinG,
        SemanticField::CarbG,
        SemanticField::FatG,
        SemanticField::SugarG,
        SemanticField::FiberG,
        SemanticField::SodiumMg,
        SemanticField::Smoker,
        SemanticField::AlcoholDays,
        SemanticField::ActivityDays,
    ];

    /// Candidate column names in priority order. Entries may be regular
    /// expressions.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            SemanticField::Age => &["RIDAGEYR", "age", "Age", "RIDAGEMN"],
            SemanticField::Sex => &["RIAGENDR", "gender", "sex", "Sex"],
            SemanticField::Height => &["BMXHT", "height", "Height"],
            SemanticField::Weight => &["BMXWT", "weight", "Weight"],
            SemanticField::Bmi => &["BMXBMI", "BMI", "BodyMassIndex"],
            SemanticField::SystolicBp => &[
                "BPXSY1", "BPXSY2", "BPXSY3", "SBP", "Systolic", "systolic",
            ],
            SemanticField::DiastolicBp => &[
                "BPXDI1", "BPXDI2", "BPXDI3", "DBP", "Diastolic", "diastolic",
            ],
            SemanticField::Glucose => &[
                "LBXGLU",
                "GLU",
                "Glucose",
                "FastingGlucose",
                r"LBXGLU\w*",
            ],
            SemanticField::Hdl => &["LBDHDD", "HDL", "HDLChol", r"LBXHDD\w*"],
            SemanticField::Ldl => &["LBDLDL", "LDL", "LDLChol", r"LBXLDL\w*"],
            SemanticField::Triglycerides => &["LBXTR", "Triglycerides", "TRIG", r"LBXTR\w*"],
            SemanticField::EnergyKcal => &["DR1TKCAL", "kcal", "Calories", "EnergyKcal"],
            SemanticField::ProteinG => &["DR1TPROT", "ProteinG", "protein_g"],
            SemanticField::CarbG => &["DR1TCARB", "CarbG", "carb_g"],
            SemanticField::FatG => &["DR1TTFAT", "FatG", "fat_g"],
            SemanticField::SugarG => &["DR1TSUGR", "SugarG", "sugar_g"],
            SemanticField::FiberG => &["DR1TFIBE", "FiberG", "fiber_g"],
            SemanticField::SodiumMg => &["DR1TSODI", "SodiumMg", "sodium_mg"],
            SemanticField::Smoker => &["SMQ020", "smoker", "SmokingStatus", r"SMQ020\w*"],
            SemanticField::AlcoholDays => &["ALQ120Q", "alcohol_days", "AlcoholDays"],
            SemanticField::ActivityDays => &["PAQ650", "phys_act_days", "PhysicalActivityDays"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticField::Age => "age",
            SemanticField::Sex => "sex",
            SemanticField::Height => "height",
            SemanticField::Weight => "weight",
            SemanticField::Bmi => "bmi",
            SemanticField::SystolicBp => "sbp",
            SemanticField::DiastolicBp => "dbp",
            SemanticField::Glucose => "glucose",
            SemanticField::Hdl => "hdl",
            SemanticField::Ldl => "ldl",
            SemanticField::Triglycerides => "tg",
            SemanticField::EnergyKcal => "kcal",
            SemanticField::ProteinG => "protein_g",
            SemanticField::CarbG => "carb_g",
            SemanticField::FatG => "fat_g",
            SemanticField::SugarG => "sugar_g",
            SemanticField::FiberG => "fiber_g",
            SemanticField::SodiumMg => "sodium_mg",
            SemanticField::Smoker => "smoker",
            SemanticField::AlcoholDays => "alcohol_days",
            SemanticField::ActivityDays => "phys_act_days",
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First available column matching `candidates`.
///
/// Candidates that are not valid regular expressions are skipped in the
/// pattern pass.
pub fn resolve_column(available: &[String], candidates: &[&str]) -> Option<String> {
    if let Some(exact) = candidates
        .iter()
        .find(|c| available.iter().any(|a| a.as_str() == **c))
    {
        return Some((*exact).to_string());
    }

    let patterns: Vec<Regex> = candidates
        .iter()
        .filter_map(|c| Regex::new(&format!("^(?:{c})$")).ok())
        .collect();
    available
        .iter()
        .find(|column| patterns.iter().any(|p| p.is_match(column)))
        .cloned()
}

/// Resolved source column per semantic field for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    resolved: BTreeMap<SemanticField, String>,
}

impl ColumnMap {
    pub fn resolve(available: &[String]) -> Self {
        let mut resolved = BTreeMap::new();
        for field in SemanticField::ALL {
            match resolve_column(available, field.candidates()) {
                Some(column) => {
                    tracing::debug!(field = %field, column = %column, "column resolved");
                    resolved.insert(field, column);
                }
                None => tracing::info!(field = %field, "no source column; field excluded"),
            }
        }
        Self { resolved }
    }

    pub fn get(&self, field: SemanticField) -> Option<&str> {
        self.resolved.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: SemanticField) -> bool {
        self.resolved.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SemanticField, &str)> {
        self.resolved.iter().map(|(f, c)| (*f, c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

impl FromIterator<(SemanticField, String)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (SemanticField, String)>>(iter: I) -> Self {
        Self {
            resolved: iter.into_iter().collect(),
        }
    }
}

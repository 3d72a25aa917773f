use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use crate::config::PipelineConfig;
use crate::error::FeatureError;
use crate::table::SurveyTable;

/// Load one CSV table. A missing file is fatal for the whole batch.
pub fn load_table(path: &Path, name: &str) -> Result<SurveyTable, FeatureError> {
    if !path.is_file() {
        return Err(FeatureError::MissingSource {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path)?;
    let table = read_table(file, name)?;
    tracing::info!(
        path = %path.display(),
        table = name,
        rows = table.len(),
        columns = table.columns().len(),
        "source table loaded"
    );
    Ok(table)
}

/// Parse CSV from any reader. Fields that are not valid UTF-8 are decoded
/// as latin-1; empty fields become missing cells.
pub fn read_table(reader: impl Read, name: &str) -> Result<SurveyTable, FeatureError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = csv
        .byte_headers()?
        .iter()
        .map(|field| decode_field(field).trim().to_string())
        .collect();
    let mut table = SurveyTable::new(name, columns);

    let mut record = ByteRecord::new();
    while csv.read_byte_record(&mut record)? {
        let cells = record
            .iter()
            .map(|field| {
                let text = decode_field(field);
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect();
        table.push_row(cells)?;
    }
    Ok(table)
}

fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// The six survey tables of one dataset.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub demographic: SurveyTable,
    pub questionnaire: SurveyTable,
    pub diet: SurveyTable,
    pub examination: SurveyTable,
    pub labs: SurveyTable,
    pub medications: SurveyTable,
}

impl SourceTables {
    /// Load every source named in `config`, requiring the subject column in
    /// each of them.
    pub fn load(config: &PipelineConfig) -> Result<Self, FeatureError> {
        let sources = &config.sources;
        let load = |name: &str, file: &str| -> Result<SurveyTable, FeatureError> {
            let table = load_table(&config.source_path(file), name)?;
            table.require_column(&config.subject_column)?;
            Ok(table)
        };
        Ok(Self {
            demographic: load("demographic", &sources.demographic)?,
            questionnaire: load("questionnaire", &sources.questionnaire)?,
            diet: load("diet", &sources.diet)?,
            examination: load("examination", &sources.examination)?,
            labs: load("labs", &sources.labs)?,
            medications: load("medications", &sources.medications)?,
        })
    }

    /// Left-join every table onto the demographic table by subject id.
    ///
    /// Colliding column names from a joined table get `_` plus the first
    /// three letters of that table's name.
    pub fn merge(&self, subject_column: &str) -> Result<SurveyTable, FeatureError> {
        let mut merged = self.demographic.clone();
        for table in [
            &self.questionnaire,
            &self.diet,
            &self.examination,
            &self.labs,
            &self.medications,
        ] {
            let suffix: String = std::iter::once('_')
                .chain(table.name().chars().take(3))
                .collect();
            merged = merged.left_join(table, subject_column, &suffix)?;
        }
        tracing::debug!(
            rows = merged.len(),
            columns = merged.columns().len(),
            "source tables merged"
        );
        Ok(merged)
    }
}

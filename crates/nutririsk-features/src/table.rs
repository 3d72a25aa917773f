use std::collections::HashMap;

use crate::error::FeatureError;

/// An in-memory survey table: named columns, rows of optional text cells.
///
/// Cells stay as text and are parsed on read, so one table can hold both
/// numeric measurements and free-text fields like medication names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyTable {
    name: String,
    columns: Vec<String>,
    /// Column name to position; a repeated header keeps its first position.
    positions: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl SurveyTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            positions.entry(column.clone()).or_insert(i);
        }
        Self {
            name: name.into(),
            columns,
            positions,
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with empty cells.
    pub fn push_row(&mut self, mut cells: Vec<Option<String>>) -> Result<(), FeatureError> {
        if cells.len() > self.columns.len() {
            return Err(FeatureError::RowWidth {
                table: self.name.clone(),
                row: self.rows.len(),
                found: cells.len(),
                expected: self.columns.len(),
            });
        }
        cells.resize(self.columns.len(), None);
        self.rows.push(cells);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        (index < self.rows.len()).then_some(RowRef { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        (0..self.rows.len()).filter_map(move |index| self.row(index))
    }

    /// Largest finite numeric value in `column`, if any.
    pub fn column_max(&self, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .filter_map(|row| parse_number(row[idx].as_deref()))
            .fold(None, |max, v| Some(max.map_or(v, |m: f64| m.max(v))))
    }

    /// Left join `other` on `key`.
    ///
    /// Every row of `self` is kept once. The first row of `other` with the
    /// same subject id supplies the added cells. Added columns whose name is
    /// already taken get `suffix` appended.
    pub fn left_join(
        &self,
        other: &SurveyTable,
        key: &str,
        suffix: &str,
    ) -> Result<SurveyTable, FeatureError> {
        let left_key = self.require_column(key)?;
        let right_key = other.require_column(key)?;

        let mut lookup: HashMap<String, usize> = HashMap::new();
        for (i, row) in other.rows.iter().enumerate() {
            if let Some(id) = row[right_key].as_deref().map(subject_key) {
                lookup.entry(id).or_insert(i);
            }
        }

        let added: Vec<usize> = (0..other.columns.len()).filter(|i| *i != right_key).collect();
        let mut columns = self.columns.clone();
        for &i in &added {
            let name = &other.columns[i];
            if columns.contains(name) {
                columns.push(format!("{name}{suffix}"));
            } else {
                columns.push(name.clone());
            }
        }

        let mut joined = SurveyTable::new(self.name.clone(), columns);
        for row in &self.rows {
            let matched = row[left_key]
                .as_deref()
                .map(subject_key)
                .and_then(|id| lookup.get(&id))
                .map(|&r| &other.rows[r]);
            let mut cells = row.clone();
            cells.extend(added.iter().map(|&i| matched.and_then(|m| m[i].clone())));
            joined.rows.push(cells);
        }
        Ok(joined)
    }

    pub(crate) fn require_column(&self, column: &str) -> Result<usize, FeatureError> {
        self.column_index(column)
            .ok_or_else(|| FeatureError::MissingSubjectColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a SurveyTable,
    index: usize,
}

impl<'a> RowRef<'a> {
    /// Raw cell text; `None` for empty cells and unknown columns.
    pub fn text(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        self.table.rows[self.index][idx].as_deref()
    }

    /// Cell parsed as a finite number; `None` when missing or non-numeric.
    pub fn number(&self, column: &str) -> Option<f64> {
        parse_number(self.text(column))
    }
}

pub(crate) fn parse_number(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Canonical subject id: integral numbers lose their ".0", other values are
/// trimmed.
pub fn subject_key(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        _ => trimmed.to_string(),
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::ScorecardError;
use crate::registry::get_question;

/// Keys accepted for the question id inside list-shaped payloads.
const ID_KEYS: [&str; 3] = ["id", "clave", "pregunta"];

/// Raw answers keyed by question id.
///
/// Values are kept as submitted; coercion to a number happens when the
/// answer is read, so malformed entries degrade to 0 instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerSet {
    answers: BTreeMap<String, Value>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<Value>) {
        self.answers.insert(id.into(), value.into());
    }

    pub fn raw(&self, id: &str) -> Option<&Value> {
        self.answers.get(id)
    }

    /// Numeric value for `id`: missing, null, and non-numeric answers read
    /// as 0.0. Numeric strings are parsed; booleans count as 1/0.
    pub fn value(&self, id: &str) -> f64 {
        self.answers.get(id).map(coerce).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for (id, value) in iter {
            set.insert(id, value);
        }
        set
    }
}

fn coerce(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    };
    if number.is_nan() { 0.0 } else { number }
}

/// Parse a request body into answers.
///
/// Accepted shapes:
/// - `{"scores": {"frutas": 3, ...}}`
/// - `{"respuestas": [{"id": "frutas", "respuesta": 3}, ...]}`
/// - `[{"clave": "frutas", "respuesta": 3}, ...]` (also `id` / `pregunta`)
/// - `{"frutas": 3, ...}`
///
/// Keys that are not questionnaire ids are dropped.
pub fn parse_answers(body: &str) -> Result<AnswerSet, ScorecardError> {
    let value: Value = serde_json::from_str(body)?;
    answers_from_value(&value)
}

pub fn answers_from_value(value: &Value) -> Result<AnswerSet, ScorecardError> {
    match value {
        Value::Object(map) => {
            if let Some(scores) = map.get("scores") {
                return answers_from_value(scores);
            }
            if let Some(list @ Value::Array(_)) = map.get("respuestas") {
                return answers_from_value(list);
            }
            Ok(map
                .iter()
                .filter(|(id, _)| get_question(id).is_some())
                .fold(AnswerSet::new(), |mut set, (id, v)| {
                    set.insert(id.clone(), v.clone());
                    set
                }))
        }
        Value::Array(items) => {
            let mut set = AnswerSet::new();
            for item in items {
                let Some(entry) = item.as_object() else {
                    continue;
                };
                let id = ID_KEYS
                    .iter()
                    .find_map(|key| entry.get(*key).and_then(Value::as_str));
                if let Some(id) = id
                    && get_question(id).is_some()
                {
                    let answer = entry.get("respuesta").cloned().unwrap_or(Value::Null);
                    set.insert(id, answer);
                }
            }
            Ok(set)
        }
        other => Err(ScorecardError::UnsupportedPayload(format!(
            "expected an object or a list of answers, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

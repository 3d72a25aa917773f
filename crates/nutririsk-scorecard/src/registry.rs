use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One scorable questionnaire item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    /// Short key used in answer payloads (e.g. "frutas").
    pub id: String,
    /// NHANES column the item was modelled on. Advisory only.
    pub source_code: String,
    pub description: String,
    /// Highest points the item can contribute.
    pub max_score: f64,
}

impl Question {
    /// `max_score` as a usable upper bound. Negative or NaN maxima read as 0.
    pub fn ceiling(&self) -> f64 {
        self.max_score.max(0.0)
    }
}

static QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(|| {
    let items = [
        (
            "alcohol",
            "ALQ120Q",
            "Frecuencia de bebidas alcohólicas en los últimos 12 meses",
            10.0,
        ),
        ("frutas", "DBQ223A", "Raciones diarias de fruta fresca", 10.0),
        ("verduras", "DBQ223B", "Raciones diarias de verduras", 10.0),
        (
            "bebidas_azucaradas",
            "DBQ223D",
            "Frecuencia semanal de bebidas azucaradas",
            10.0,
        ),
        (
            "comida_rapida",
            "DBQ330",
            "Comidas rápidas/ultraprocesadas por semana",
            10.0,
        ),
        ("agua", "DBQ223H", "Vasos de agua natural al día", 10.0),
        (
            "granos_integrales",
            "DBQ235C",
            "Consumo semanal de granos integrales",
            10.0,
        ),
        (
            "sal_mesa",
            "CSQ240",
            "Frecuencia con la que se añade sal en la mesa",
            10.0,
        ),
        (
            "suplementos",
            "DSQ010",
            "Uso habitual de suplementos vitamínicos/minerales",
            5.0,
        ),
        ("desayuno", "DBQ010", "Días por semana que se desayuna", 10.0),
    ];

    items
        .iter()
        .map(|(id, code, description, max_score)| Question {
            id: id.to_string(),
            source_code: code.to_string(),
            description: description.to_string(),
            max_score: *max_score,
        })
        .collect()
});

static SCORE_MAX: LazyLock<f64> = LazyLock::new(|| QUESTIONS.iter().map(|q| q.max_score).sum());

/// The questionnaire items in canonical order.
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

/// Sum of every item maximum (95.0).
pub fn score_max() -> f64 {
    *SCORE_MAX
}

/// Look up an item by id.
pub fn get_question(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Item ids in canonical order. This is also the feature order of the
/// questionnaire model.
pub fn question_ids() -> impl Iterator<Item = &'static str> {
    QUESTIONS.iter().map(|q| q.id.as_str())
}

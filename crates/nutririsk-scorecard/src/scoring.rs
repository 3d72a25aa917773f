use nutririsk_core::classify;
use nutririsk_core::models::evaluation::{EvaluationResult, ItemPoints, ScoreDetail};

use crate::answers::AnswerSet;
use crate::registry::{Question, questions};

/// Clamp every registry item into `[0, max_score]` and sum the points.
///
/// A negative or NaN `max_score` caps the item at 0.
///
/// Items absent from `answers` count as 0. The detail lists every item in
/// registry order.
pub fn normalize(answers: &AnswerSet) -> (f64, ScoreDetail) {
    normalize_with(questions(), answers)
}

/// [`normalize`] over an explicit item list.
pub fn normalize_with(items: &[Question], answers: &AnswerSet) -> (f64, ScoreDetail) {
    let mut detail = ScoreDetail::new();
    let mut total = 0.0;

    for question in items {
        let maximum = question.ceiling();
        let points = answers.value(&question.id).max(0.0).min(maximum);
        detail.insert(question.id.clone(), ItemPoints { points, maximum });
        total += points;
    }

    (total, detail)
}

/// Score a questionnaire submission against the fixed registry.
pub fn evaluate(answers: &AnswerSet) -> EvaluationResult {
    evaluate_with(questions(), answers)
}

/// [`evaluate`] over an explicit item list. An empty list yields a
/// normalized score of 0 rather than dividing by zero.
pub fn evaluate_with(items: &[Question], answers: &AnswerSet) -> EvaluationResult {
    let (score_raw, detail) = normalize_with(items, answers);
    let score_max: f64 = items.iter().map(Question::ceiling).sum();
    let score_normalized = if score_max > 0.0 {
        score_raw / score_max * 100.0
    } else {
        0.0
    };

    EvaluationResult {
        score_raw,
        score_max,
        score_normalized,
        label: classify(score_normalized),
        detail,
    }
}

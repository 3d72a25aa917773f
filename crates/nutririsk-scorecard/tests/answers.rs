use nutririsk_scorecard::error::ScorecardError;
use nutririsk_scorecard::{evaluate, parse_answers};

#[test]
fn nested_scores_object() {
    let answers = parse_answers(r#"{"scores": {"frutas": 3, "agua": "7"}}"#).unwrap();
    assert_eq!(answers.value("frutas"), 3.0);
    assert_eq!(answers.value("agua"), 7.0);
    assert_eq!(answers.value("desayuno"), 0.0);
}

#[test]
fn list_with_any_id_key() {
    let body = r#"[
        {"id": "alcohol", "respuesta": 10},
        {"clave": "frutas", "respuesta": 7},
        {"pregunta": "verduras", "respuesta": "3"},
        {"respuesta": 10},
        "ignored"
    ]"#;
    let answers = parse_answers(body).unwrap();
    assert_eq!(answers.len(), 3);
    assert_eq!(answers.value("alcohol"), 10.0);
    assert_eq!(answers.value("frutas"), 7.0);
    assert_eq!(answers.value("verduras"), 3.0);
}

#[test]
fn respuestas_wrapper_is_unwrapped() {
    let answers =
        parse_answers(r#"{"respuestas": [{"id": "sal_mesa", "respuesta": 7}]}"#).unwrap();
    assert_eq!(answers.value("sal_mesa"), 7.0);
}

#[test]
fn flat_object_ignores_unknown_keys() {
    let answers = parse_answers(r#"{"desayuno": 10, "usuario": "ana", "csrf": 1}"#).unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(evaluate(&answers).score_raw, 10.0);
}

#[test]
fn invalid_json_is_a_malformed_payload() {
    let err = parse_answers("{scores: ").unwrap_err();
    assert!(matches!(err, ScorecardError::MalformedPayload(_)));
}

#[test]
fn scalar_json_is_unsupported() {
    let err = parse_answers("42").unwrap_err();
    assert!(matches!(err, ScorecardError::UnsupportedPayload(_)));
}

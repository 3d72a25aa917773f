use std::fs;

use nutririsk_features::config::PipelineConfig;
use nutririsk_features::{FeatureError, SourceTables, SurveyTable, load_table, read_table};

fn write_sources(dir: &std::path::Path) {
    fs::write(dir.join("demographic.csv"), "SEQN,RIDAGEYR,RIAGENDR\n1,40,1\n2,35,2\n3,60,1\n").unwrap();
    fs::write(dir.join("questionnaire.csv"), "SEQN,SMQ020,RIDAGEYR\n1,1,41\n2,2,36\n").unwrap();
    fs::write(dir.join("diet.csv"), "SEQN,DR1TKCAL\n1,2000\n3,1800\n").unwrap();
    fs::write(dir.join("examination.csv"), "SEQN,BMXBMI\n1.0,31.2\n2.0,22.0\n").unwrap();
    fs::write(dir.join("labs.csv"), "SEQN,LBXGLU\n2,130\n").unwrap();
    fs::write(dir.join("medications.csv"), "SEQN,RXDDRUG\n1,ASPIRIN\n1,VITAMIN D\n").unwrap();
}

fn config_for(dir: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        dataset_dir: dir.to_path_buf(),
        ..PipelineConfig::default()
    }
}

#[test]
fn empty_cells_are_missing() {
    let table = read_table("SEQN,A,B\n1,,x\n2,3,\n".as_bytes(), "t").unwrap();
    let first = table.row(0).unwrap();
    assert_eq!(first.text("A"), None);
    assert_eq!(first.text("B"), Some("x"));
    assert_eq!(table.row(1).unwrap().number("A"), Some(3.0));
}

#[test]
fn non_numeric_cells_read_as_missing_numbers() {
    let table = read_table("SEQN,A\n1,abc\n2,NaN\n".as_bytes(), "t").unwrap();
    assert_eq!(table.row(0).unwrap().number("A"), None);
    assert_eq!(table.row(1).unwrap().number("A"), None);
}

#[test]
fn latin1_fields_are_decoded() {
    let mut bytes = b"SEQN,RXDDRUG\n1,CAF".to_vec();
    bytes.push(0xC9);
    bytes.push(b'\n');
    let table = read_table(bytes.as_slice(), "medications").unwrap();
    assert_eq!(table.row(0).unwrap().text("RXDDRUG"), Some("CAFÉ"));
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_table(&dir.path().join("absent.csv"), "absent").unwrap_err();
    assert!(matches!(err, FeatureError::MissingSource { .. }));
}

#[test]
fn missing_source_aborts_loading() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());
    fs::remove_file(dir.path().join("labs.csv")).unwrap();

    let err = SourceTables::load(&config_for(dir.path())).unwrap_err();
    match err {
        FeatureError::MissingSource { path } => assert!(path.ends_with("labs.csv")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn table_without_subject_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());
    fs::write(dir.path().join("diet.csv"), "ID,DR1TKCAL\n1,2000\n").unwrap();

    let err = SourceTables::load(&config_for(dir.path())).unwrap_err();
    assert!(matches!(
        err,
        FeatureError::MissingSubjectColumn { ref table, .. } if table == "diet"
    ));
}

#[test]
fn merge_left_joins_onto_demographic() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());
    let sources = SourceTables::load(&config_for(dir.path())).unwrap();
    let merged = sources.merge("SEQN").unwrap();

    assert_eq!(merged.len(), 3);
    assert!(merged.column_index("RIDAGEYR_que").is_some());

    let first = merged.row(0).unwrap();
    assert_eq!(first.number("RIDAGEYR"), Some(40.0));
    assert_eq!(first.number("RIDAGEYR_que"), Some(41.0));
    assert_eq!(first.number("BMXBMI"), Some(31.2));
    assert_eq!(first.text("RXDDRUG"), Some("ASPIRIN"));

    let third = merged.row(2).unwrap();
    assert_eq!(third.number("SMQ020"), None);
    assert_eq!(third.number("DR1TKCAL"), Some(1800.0));
    assert_eq!(third.number("LBXGLU"), None);
}

#[test]
fn overlong_rows_are_rejected() {
    let mut table = SurveyTable::new("t", vec!["SEQN".to_string()]);
    let err = table
        .push_row(vec![Some("1".to_string()), Some("2".to_string())])
        .unwrap_err();
    assert!(matches!(err, FeatureError::RowWidth { found: 2, expected: 1, .. }));
}

#[test]
fn column_max_ignores_missing_cells() {
    let table = read_table("SEQN,BMXHT\n1,170.5\n2,\n3,182\n".as_bytes(), "t").unwrap();
    assert_eq!(table.column_max("BMXHT"), Some(182.0));
    assert_eq!(table.column_max("absent"), None);
}

#[test]
fn repeated_header_reads_the_first_column() {
    let table = read_table("SEQN,A,B,A\n1,4,5,6\n".as_bytes(), "t").unwrap();
    assert_eq!(table.column_index("SEQN"), Some(0));
    assert_eq!(table.column_index("A"), Some(1));
    assert_eq!(table.column_index("B"), Some(2));
    assert_eq!(table.column_index("C"), None);
    assert_eq!(table.row(0).unwrap().number("A"), Some(4.0));
}

#[test]
fn joined_columns_are_indexed() {
    let left = read_table("SEQN,A\n1,4\n".as_bytes(), "left").unwrap();
    let right = read_table("SEQN,A,B\n1,7,8\n".as_bytes(), "right").unwrap();
    let joined = left.left_join(&right, "SEQN", "_rig").unwrap();
    let row = joined.row(0).unwrap();
    assert_eq!(row.number("A"), Some(4.0));
    assert_eq!(row.number("A_rig"), Some(7.0));
    assert_eq!(row.number("B"), Some(8.0));
}

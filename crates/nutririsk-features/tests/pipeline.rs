use std::fs;
use std::path::Path;

use nutririsk_features::config::{ARTIFACTS_DIR_ENV, DATASET_DIR_ENV, PipelineConfig};
use nutririsk_features::feature_list::FEATURE_LIST_FILE;
use nutririsk_features::pipeline::{CLINICAL_FEATURE_LIST_FILE, LABEL_DISTRIBUTION_FILE};
use nutririsk_features::{FeatureError, FeatureVector, align_features, read_feature_list, run_pipeline};

fn write_sources(dir: &Path) {
    fs::write(
        dir.join("demographic.csv"),
        "SEQN,RIDAGEYR,RIAGENDR\n1,45,1\n2,30,2\n3,70,1\n",
    )
    .unwrap();
    fs::write(
        dir.join("questionnaire.csv"),
        "SEQN,ALQ101,ALQ120Q,ALQ120U,DBQ197,DBD381,DBQ010,SMQ020,PAQ650\n\
         1,2,,,3,3,1,2,5\n\
         2,1,6,1,0,0,2,1,0\n",
    )
    .unwrap();
    fs::write(
        dir.join("diet.csv"),
        "SEQN,DR1TKCAL,DR1TPROT,DR1TCARB,DR1TTFAT,DR1TSUGR,DR1TSFAT,DR1TSODI,DR1TWS,DR1TFIBE\n\
         1,2000,100,250,60,20,10,1400,2000,40\n\
         2,2600,60,380,90,120,40,4000,300,8\n",
    )
    .unwrap();
    fs::write(
        dir.join("examination.csv"),
        "SEQN,BMXHT,BMXWT,BMXBMI,BPXSY1,BPXDI1\n1,180,75,23.1,115,75\n2,165,100,36.7,150,95\n",
    )
    .unwrap();
    fs::write(
        dir.join("labs.csv"),
        "SEQN,LBXGLU,LBDHDD,LBDLDL,LBXTR\n1,90,55,100,120\n2,130,35,170,250\n",
    )
    .unwrap();
    fs::write(dir.join("medications.csv"), "SEQN,RXDDRUG\n1,CALCIUM\n2,LISINOPRIL\n").unwrap();
}

#[test]
fn pipeline_writes_artifacts() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_sources(data.path());
    let config = PipelineConfig {
        dataset_dir: data.path().to_path_buf(),
        artifacts_dir: out.path().join("model_artifacts"),
        ..PipelineConfig::default()
    };

    let output = run_pipeline(&config).unwrap();

    assert_eq!(output.questionnaire.len(), 2);
    assert_eq!(output.engineered.rows.len(), 3);
    // Subject 3 has no questionnaire row, so the blank smoking answer
    // counts as a non-smoker and the behavioral domain still applies.
    assert_eq!(output.labeled.len(), 3);
    let third = output.labeled.iter().find(|r| r.subject_id == "3").unwrap();
    assert_eq!(third.score, 0.0);
    for artifact in &output.artifacts {
        assert!(artifact.is_file(), "{} missing", artifact.display());
    }

    let items = read_feature_list(&config.artifacts_dir.join(FEATURE_LIST_FILE)).unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0], "alcohol");

    let clinical =
        read_feature_list(&config.artifacts_dir.join(CLINICAL_FEATURE_LIST_FILE)).unwrap();
    assert_eq!(clinical, output.engineered.schema.names());
    assert!(clinical.contains(&"pct_fat".to_string()));

    let dist: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(config.artifacts_dir.join(LABEL_DISTRIBUTION_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(dist["sample_count"], 2);
}

#[test]
fn pipeline_fails_on_missing_source() {
    let data = tempfile::tempdir().unwrap();
    write_sources(data.path());
    fs::remove_file(data.path().join("medications.csv")).unwrap();
    let config = PipelineConfig {
        dataset_dir: data.path().to_path_buf(),
        artifacts_dir: data.path().join("out"),
        ..PipelineConfig::default()
    };

    let err = run_pipeline(&config).unwrap_err();
    assert!(matches!(err, FeatureError::MissingSource { .. }));
    assert!(!data.path().join("out").exists());
}

#[test]
fn feature_list_round_trips_and_aligns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(FEATURE_LIST_FILE);
    let names = vec!["BMI".to_string(), "SBP".to_string(), "pct_fat".to_string()];
    nutririsk_features::write_feature_list(&path, &names).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "BMI\nSBP\npct_fat\n");
    let list = read_feature_list(&path).unwrap();
    assert_eq!(list, names);

    let request: FeatureVector = [("SBP", Some(140.0)), ("extra", Some(1.0)), ("BMI", Some(31.0))]
        .into_iter()
        .collect();
    let aligned = align_features(&list, &request);
    let entries: Vec<(&str, Option<f64>)> = aligned.iter().collect();
    assert_eq!(
        entries,
        vec![("BMI", Some(31.0)), ("SBP", Some(140.0)), ("pct_fat", None)]
    );
}

#[test]
fn config_defaults_and_overrides() {
    let config = PipelineConfig::default();
    assert_eq!(config.subject_column, "SEQN");
    assert_eq!(config.sources.medications, "medications.csv");

    let config = PipelineConfig::from_lookup(|key| match key {
        DATASET_DIR_ENV => Some("/data/nhanes".to_string()),
        ARTIFACTS_DIR_ENV => None,
        _ => None,
    });
    assert_eq!(config.dataset_dir, Path::new("/data/nhanes"));
    assert_eq!(config.artifacts_dir, Path::new("model_artifacts"));
}

#[test]
fn config_file_fills_absent_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.json");
    fs::write(&path, r#"{"dataset_dir": "raw", "sources": {"labs": "labs_2018.csv"}}"#).unwrap();

    let config = PipelineConfig::load(&path).unwrap();
    assert_eq!(config.dataset_dir, Path::new("raw"));
    assert_eq!(config.sources.labs, "labs_2018.csv");
    assert_eq!(config.sources.diet, "diet.csv");
    assert_eq!(config.smoker_yes_code, 1.0);
}

#[test]
fn empty_subject_column_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.json");
    fs::write(&path, r#"{"subject_column": "  "}"#).unwrap();
    assert!(matches!(
        PipelineConfig::load(&path).unwrap_err(),
        FeatureError::InvalidConfig(_)
    ));
}

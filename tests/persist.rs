//! Artifact round trips through files.

mod common;

use std::fs;

use salary_forest::persist::ReadError;
use salary_forest::testing::synthetic_table;
use salary_forest::{EvaluationSplit, SalaryModel};

use common::trained;

#[test]
fn reloaded_model_predicts_identically() {
    let dir = tempfile::tempdir().unwrap();
    let (model, split) = trained(120, 12);
    let path = dir.path().join("model.json");
    model.save_json(&path).unwrap();

    let loaded = SalaryModel::load_json(&path).unwrap();
    assert_eq!(loaded, model);

    let records = synthetic_table(40, 77).into_parts().0;
    let before = model.predict(&records, 1).unwrap();
    let after = loaded.predict(&records, 1).unwrap();
    assert_eq!(before, after);

    for record in split.table.records() {
        assert_eq!(
            loaded.predict_record(record).unwrap(),
            model.predict_record(record).unwrap()
        );
    }
}

#[test]
fn split_file_keeps_rows_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let (_, split) = trained(90, 3);
    let path = dir.path().join("test_data.json");
    split.save_json(&path).unwrap();
    assert_eq!(EvaluationSplit::load_json(&path).unwrap(), split);
}

#[test]
fn corrupt_artifacts_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (model, split) = trained(60, 1);

    let truncated = dir.path().join("truncated.json");
    model.save_json(&truncated).unwrap();
    let bytes = fs::read(&truncated).unwrap();
    fs::write(&truncated, &bytes[..bytes.len() / 2]).unwrap();
    assert!(matches!(SalaryModel::load_json(&truncated), Err(ReadError::Json(_))));

    let split_path = dir.path().join("test_data.json");
    split.save_json(&split_path).unwrap();
    assert!(matches!(
        SalaryModel::load_json(&split_path),
        Err(ReadError::WrongKind { .. })
    ));
    assert!(matches!(
        EvaluationSplit::load_json(dir.path().join("missing.json")),
        Err(ReadError::Io(_))
    ));
}

#[test]
fn overwrites_existing_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    fs::write(&path, "stale").unwrap();

    let (model, _) = trained(50, 8);
    model.save_json(&path).unwrap();
    assert_eq!(SalaryModel::load_json(&path).unwrap(), model);
}

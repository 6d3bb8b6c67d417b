//! Prediction service behavior over loaded artifacts.

mod common;

use salary_forest::data::{CategoricalColumn, RecordError};
use salary_forest::evaluation::ERROR_HISTOGRAM_BINS;
use salary_forest::preprocess::TransformError;
use salary_forest::testing::sample_record;
use salary_forest::{PredictError, PredictionService, UnknownPolicy};

use common::{service, trained};

#[test]
fn evaluation_rows_satisfy_error_identities() {
    let service = service();
    let report = service.evaluation().unwrap();
    assert_eq!(report.rows.len(), service.split().table.len());
    for row in &report.rows {
        assert_eq!(row.predicted - row.actual, row.error);
        assert_eq!(row.error.abs() / row.actual * 100.0, row.error_pct);
    }
    assert_eq!(report.histogram.len(), ERROR_HISTOGRAM_BINS);
    assert_eq!(report.summary.n_rows, report.rows.len());
}

#[test]
fn evaluation_is_repeatable() {
    let service = service();
    assert_eq!(service.evaluation().unwrap(), service.evaluation().unwrap());
}

#[test]
fn options_come_from_split() {
    let service = service();
    let options = service.form_options();
    assert_eq!(options.job_title, service.split().table.vocabulary(CategoricalColumn::JobTitle));
    assert!((0.0..=50.0).contains(&options.experience.default));
    assert!((18.0..=80.0).contains(&options.age.default));
}

#[test]
fn unknown_category_under_error_policy() {
    let dir = tempfile::tempdir().unwrap();
    let (model, split) = trained(100, 9);
    let model_path = dir.path().join("model.json");
    let split_path = dir.path().join("test_data.json");
    model.save_json(&model_path).unwrap();
    split.save_json(&split_path).unwrap();

    let mut record = sample_record();
    record.job_title = "Unicorn Wrangler".into();

    let lenient = PredictionService::load(&model_path, &split_path, None).unwrap();
    assert!(lenient.predict(&record).is_ok());

    let strict = PredictionService::load(&model_path, &split_path, Some(UnknownPolicy::Error)).unwrap();
    assert!(matches!(
        strict.predict(&record),
        Err(PredictError::Transform(TransformError::UnknownCategory {
            column: CategoricalColumn::JobTitle,
            ..
        }))
    ));
    // Known records still work after a failure.
    assert!(strict.predict(&sample_record()).is_ok());
}

#[test]
fn padded_labels_match_training_vocabulary() {
    let (model, split) = trained(100, 9);
    let strict = PredictionService::from_parts(model.with_unknown_policy(UnknownPolicy::Error), split);

    let mut padded = sample_record();
    padded.job_title = format!(" {} ", padded.job_title);
    padded.education = format!("{}\t", padded.education);
    assert_eq!(strict.predict(&padded), strict.predict(&sample_record()));
    assert!(strict.predict(&padded).is_ok());
}

#[test]
fn out_of_range_input_is_rejected() {
    let service = service();
    let mut record = sample_record();
    record.experience = 51.0;
    assert!(matches!(
        service.predict(&record),
        Err(PredictError::Invalid(RecordError::OutOfRange { .. }))
    ));
}

//! End-to-end training behavior: splits, determinism and category handling.

mod common;

use std::fs;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use rstest::rstest;

use salary_forest::data::{holdout, load_csv, split::test_len};
use salary_forest::preprocess::{Preprocessor, TransformError};
use salary_forest::testing::{sample_record, scenario_table, synthetic_table};
use salary_forest::{SalaryModel, SalaryModelConfig, TrainingJob, UnknownPolicy};

use common::{dataset_file, quick_config, trained};

#[rstest]
#[case(50)]
#[case(64)]
#[case(123)]
fn scenario_split_size_is_rounded(#[case] rows: usize) {
    let dir = tempfile::tempdir().unwrap();
    let data = dataset_file(dir.path(), &scenario_table(rows, 3));
    let job = TrainingJob::new(
        data,
        dir.path().join("model.json"),
        dir.path().join("test_data.json"),
        quick_config(),
    );
    let outcome = job.run().unwrap();

    let expected = (0.2 * rows as f64).round() as usize;
    assert_eq!(outcome.test_rows, expected);
    assert_eq!(test_len(rows, 0.2), expected);
    assert_eq!(outcome.train_rows + outcome.test_rows, rows);

    let model = SalaryModel::load_json(&job.model_path).unwrap();
    let prediction = model.predict_record(&scenario_table(1, 99).records()[0]).unwrap();
    assert!((500_000.0..700_000.0).contains(&prediction), "{prediction}");
}

#[test]
fn same_seed_same_split_and_scaler() {
    let table = synthetic_table(150, 17);
    let (train_a, split_a) = holdout(&table, 0.2, 42);
    let (train_b, split_b) = holdout(&table, 0.2, 42);
    assert_eq!(split_a, split_b);

    let pre_a = Preprocessor::fit(train_a.records(), UnknownPolicy::Ignore).unwrap();
    let pre_b = Preprocessor::fit(train_b.records(), UnknownPolicy::Ignore).unwrap();
    assert_eq!(pre_a.scaler(), pre_b.scaler());
    assert_eq!(pre_a.feature_names(), pre_b.feature_names());
}

#[test]
fn forest_is_identical_across_thread_counts() {
    let (train, _) = holdout(&synthetic_table(200, 4), 0.2, 42);
    let base = SalaryModelConfig::builder().n_trees(12);
    let sequential = SalaryModel::train(&train, &base.clone().n_threads(1).build().unwrap()).unwrap();
    let parallel = SalaryModel::train(&train, &base.n_threads(4).build().unwrap()).unwrap();
    assert_eq!(sequential.forest(), parallel.forest());
}

#[test]
fn unseen_job_title_follows_policy() {
    let (model, _) = trained(100, 6);
    let mut record = sample_record();
    record.job_title = "Chief Astronaut".into();

    let lenient = model.predict_record(&record).unwrap();
    assert!(lenient.is_finite());

    let strict = model.with_unknown_policy(UnknownPolicy::Error);
    match strict.predict_record(&record) {
        Err(TransformError::UnknownCategory { value, .. }) => assert_eq!(value, "Chief Astronaut"),
        other => panic!("expected UnknownCategory, got {other:?}"),
    }
}

#[rstest]
#[case(18.0, 0.0)]
#[case(80.0, 0.0)]
#[case(18.0, 50.0)]
#[case(80.0, 50.0)]
fn boundary_inputs_predict(#[case] age: f64, #[case] experience: f64) {
    let (model, _) = trained(80, 2);
    let mut record = sample_record();
    record.age = age;
    record.experience = experience;
    assert!(record.validate().is_ok());
    let first = model.predict_record(&record).unwrap();
    assert!(first.is_finite());
    assert_eq!(model.predict_record(&record).unwrap(), first);
}

#[test]
fn loader_drops_incomplete_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(
        &path,
        "Education,Experience,Location,Job_Title,Age,Gender,Salary,Extra\n\
         Bachelor,5,Urban,Engineer,29,Male,600000,x\n\
         Master,,Urban,Engineer,31,Female,700000,y\n\
         PhD,10,  ,Manager,40,Male,900000,z\n\
         High School,2,Rural,Analyst,22,Female,300000,\n",
    )
    .unwrap();

    let loaded = load_csv(&path).unwrap();
    assert_eq!(loaded.table.len(), 2);
    assert_eq!(loaded.dropped_rows, 2);
    assert_abs_diff_eq!(loaded.table.salaries()[1], 300_000.0);
    assert_eq!(loaded.table.records()[1].education, "High School");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn transform_width_is_one_hot_plus_numeric(rows in 2usize..60, seed in any::<u64>()) {
        let table = synthetic_table(rows, seed);
        let pre = Preprocessor::fit(table.records(), UnknownPolicy::Ignore).unwrap();
        let one_hot: usize = pre.encoder().blocks().iter().map(|b| b.categories().len()).sum();
        prop_assert_eq!(pre.n_features(), one_hot + 2);

        let x = pre.transform(table.records()).unwrap();
        prop_assert_eq!(x.dim(), (rows, one_hot + 2));
        prop_assert_eq!(pre.transform(table.records()).unwrap(), x);
    }
}

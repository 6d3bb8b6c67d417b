//! Train the salary model and write the model and evaluation split artifacts.
//!
//! ```text
//! salary-train --data data/salary_prediction_data.csv --model-out model.json --test-out test_data.json
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use salary_forest::model::SalaryModelConfig;
use salary_forest::training::MaxFeatures;
use salary_forest::{TrainingJob, UnknownPolicy};

#[derive(Debug, Parser)]
#[command(name = "salary-train", version, about = "Train the salary random forest")]
struct Args {
    /// Source CSV with Education, Experience, Location, Job_Title, Age, Gender and Salary columns.
    #[arg(long, env = "SALARY_DATA_PATH", default_value = "data/salary_prediction_data.csv")]
    data: PathBuf,

    /// Where to write the trained model.
    #[arg(long, env = "SALARY_MODEL_PATH", default_value = "model.json")]
    model_out: PathBuf,

    /// Where to write the held-out evaluation split.
    #[arg(long, env = "SALARY_TEST_DATA_PATH", default_value = "test_data.json")]
    test_out: PathBuf,

    /// Seed for the split and the forest.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 100)]
    n_trees: u32,

    /// Maximum tree depth; unlimited when omitted.
    #[arg(long)]
    max_depth: Option<u32>,

    /// Features tried per split: all, sqrt or a fraction in (0, 1].
    #[arg(long, default_value = "all")]
    max_features: MaxFeatures,

    /// Fraction of rows held out for evaluation.
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,

    /// Worker threads: 0 = all cores, 1 = sequential.
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Handling of categories unseen during training: ignore or error.
    #[arg(long, default_value = "ignore")]
    unknown_categories: UnknownPolicy,
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();

    let config = SalaryModelConfig::builder()
        .n_trees(args.n_trees)
        .maybe_max_depth(args.max_depth)
        .max_features(args.max_features)
        .test_fraction(args.test_fraction)
        .seed(args.seed)
        .n_threads(args.threads)
        .unknown_policy(args.unknown_categories)
        .build()
        .context("invalid training configuration")?;

    let job = TrainingJob::new(args.data, args.model_out, args.test_out, config);
    let outcome = job.run().context("training failed")?;

    println!("Model and test data saved.");
    println!("{outcome}");
    Ok(())
}

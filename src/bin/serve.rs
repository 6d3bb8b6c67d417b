//! Serve the salary prediction form and API.
//!
//! Both artifacts are loaded before the socket is bound; a missing or corrupt
//! artifact exits non-zero without serving anything.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use salary_forest::server::{self, DEFAULT_EVAL_ROWS};
use salary_forest::{PredictionService, UnknownPolicy};

#[derive(Debug, Parser)]
#[command(name = "salary-serve", version, about = "Serve salary predictions over HTTP")]
struct Args {
    /// Trained model written by salary-train.
    #[arg(long, env = "SALARY_MODEL_PATH", default_value = "model.json")]
    model: PathBuf,

    /// Evaluation split written by salary-train.
    #[arg(long, env = "SALARY_TEST_DATA_PATH", default_value = "test_data.json")]
    test_data: PathBuf,

    #[arg(long, env = "SALARY_ADDR", default_value = "127.0.0.1:8501")]
    addr: SocketAddr,

    /// Override the model's unknown-category policy: ignore or error.
    #[arg(long)]
    unknown_categories: Option<UnknownPolicy>,

    /// Evaluation rows shown on the page.
    #[arg(long, default_value_t = DEFAULT_EVAL_ROWS)]
    rows: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();

    let service = match PredictionService::load(&args.model, &args.test_data, args.unknown_categories) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            log::error!("{e}");
            return Err(e).context("could not start the prediction service");
        }
    };

    server::serve(service, args.addr, args.rows)
        .await
        .with_context(|| format!("failed to serve on {}", args.addr))
}

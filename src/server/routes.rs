//! warp filters and handlers.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use super::render::{render_page, Outcome, Page};
use crate::data::{CategoricalColumn, FeatureRecord, NumericColumn};
use crate::service::PredictionService;

/// Maximum accepted request body.
const BODY_LIMIT: u64 = 16 * 1024;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    /// Evaluation rows shown on the page.
    pub eval_rows: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct EvaluationQuery {
    limit: Option<usize>,
}

/// All routes of the prediction UI and API.
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let with_state = warp::any().map(move || state.clone());

    let index = warp::path::end()
        .and(warp::get())
        .and(with_state.clone())
        .map(|state: AppState| warp::reply::html(page(&state, None, None)));

    let predict_form = warp::path!("predict")
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::form())
        .and(with_state.clone())
        .map(|form: HashMap<String, String>, state: AppState| {
            warp::reply::html(predict_page(&state, &form))
        });

    let options = warp::path!("api" / "options")
        .and(warp::get())
        .and(with_state.clone())
        .map(|state: AppState| warp::reply::json(state.service.form_options()));

    let predict_api = warp::path!("api" / "predict")
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_state.clone())
        .and_then(predict_json);

    let evaluation = warp::path!("api" / "evaluation")
        .and(warp::get())
        .and(warp::query::<EvaluationQuery>())
        .and(with_state)
        .and_then(evaluation_json);

    let health = warp::path!("health").and(warp::get()).map(|| "ok");

    index
        .or(predict_form)
        .or(options)
        .or(predict_api)
        .or(evaluation)
        .or(health)
        .with(warp::log("salary_forest::server"))
}

// =============================================================================
// HTML handlers
// =============================================================================

fn page(state: &AppState, input: Option<&FeatureRecord>, outcome: Option<Outcome<'_>>) -> String {
    let evaluation = state.service.evaluation().map(|r| r.truncated(state.eval_rows));
    if let Err(e) = &evaluation {
        log::warn!("evaluation failed: {e}");
    }
    render_page(&Page {
        options: state.service.form_options(),
        input,
        outcome,
        evaluation: evaluation.as_ref(),
    })
}

fn predict_page(state: &AppState, form: &HashMap<String, String>) -> String {
    let record = match parse_form(form) {
        Ok(record) => record,
        Err(msg) => return page(state, None, Some(Outcome::Error(&msg))),
    };
    match state.service.predict(&record) {
        Ok(prediction) => {
            log::debug!("predicted {} for {:?}", prediction.salary, record);
            page(state, Some(&record), Some(Outcome::Prediction(&prediction)))
        }
        Err(e) => {
            log::info!("prediction failed: {e}");
            page(state, Some(&record), Some(Outcome::Error(&e.to_string())))
        }
    }
}

/// Build a record from urlencoded form fields named after the CSV columns.
fn parse_form(form: &HashMap<String, String>) -> Result<FeatureRecord, String> {
    let text = |column: CategoricalColumn| -> Result<String, String> {
        form.get(column.name())
            .map(|v| v.trim().to_owned())
            .ok_or_else(|| format!("missing field {column}"))
    };
    let number = |column: NumericColumn| -> Result<f64, String> {
        let raw = form
            .get(column.name())
            .ok_or_else(|| format!("missing field {column}"))?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| format!("{column} must be a number, got '{raw}'"))
    };
    Ok(FeatureRecord {
        education: text(CategoricalColumn::Education)?,
        experience: number(NumericColumn::Experience)?,
        location: text(CategoricalColumn::Location)?,
        job_title: text(CategoricalColumn::JobTitle)?,
        age: number(NumericColumn::Age)?,
        gender: text(CategoricalColumn::Gender)?,
    })
}

// =============================================================================
// JSON handlers
// =============================================================================

fn error_reply(status: StatusCode, error: String) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody { error }), status).into_response()
}

async fn predict_json(record: FeatureRecord, state: AppState) -> Result<warp::reply::Response, Infallible> {
    Ok(match state.service.predict(&record) {
        Ok(prediction) => warp::reply::json(&prediction).into_response(),
        Err(e) => error_reply(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    })
}

async fn evaluation_json(query: EvaluationQuery, state: AppState) -> Result<warp::reply::Response, Infallible> {
    Ok(match state.service.evaluation() {
        Ok(report) => {
            let report = match query.limit {
                Some(limit) => report.truncated(limit),
                None => report,
            };
            warp::reply::json(&report).into_response()
        }
        Err(e) => {
            log::warn!("evaluation failed: {e}");
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|&(k, v)| (k.to_owned(), v.to_owned())).collect()
    }

    #[test]
    fn parses_complete_form() {
        let record = parse_form(&form(&[
            ("Education", "Master"),
            ("Experience", " 7 "),
            ("Location", "Urban"),
            ("Job_Title", "Analyst"),
            ("Age", "33"),
            ("Gender", "Female"),
        ]))
        .unwrap();
        assert_eq!(record.experience, 7.0);
        assert_eq!(record.job_title, "Analyst");
    }

    #[test]
    fn reports_bad_fields() {
        let err = parse_form(&form(&[("Education", "Master")])).unwrap_err();
        assert!(err.contains("missing field"));

        let err = parse_form(&form(&[
            ("Education", "Master"),
            ("Experience", "seven"),
            ("Location", "Urban"),
            ("Job_Title", "Analyst"),
            ("Age", "33"),
            ("Gender", "Female"),
        ]))
        .unwrap_err();
        assert!(err.contains("must be a number"));
    }
}

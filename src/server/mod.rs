//! HTTP front end for the [`PredictionService`].
//!
//! | Method | Path              | Response |
//! |--------|-------------------|----------|
//! | GET    | `/`               | form and evaluation panel |
//! | POST   | `/predict`        | page with the prediction or an inline error |
//! | GET    | `/api/options`    | form options as JSON |
//! | POST   | `/api/predict`    | `{ "salary", "formatted" }`, or 422 |
//! | GET    | `/api/evaluation` | evaluation report, `?limit=N` truncates rows |
//! | GET    | `/health`         | `ok` |

mod render;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

pub use render::{escape, histogram_svg, render_page, scatter_svg, Outcome, Page};
pub use routes::{routes, AppState};

use crate::service::PredictionService;

/// Evaluation rows shown on the page by default.
pub const DEFAULT_EVAL_ROWS: usize = 20;

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(
    service: Arc<PredictionService>,
    addr: SocketAddr,
    eval_rows: usize,
) -> Result<(), warp::Error> {
    let routes = routes(AppState { service, eval_rows });
    let (bound, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    })?;
    log::info!("serving on http://{bound}");
    server.await;
    log::info!("server stopped");
    Ok(())
}

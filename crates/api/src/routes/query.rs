//! Route definitions for the `/query` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::query;
use crate::state::AppState;

/// Routes mounted at `/query`.
///
/// ```text
/// POST /ask  -> ask (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/ask", post(query::ask))
}

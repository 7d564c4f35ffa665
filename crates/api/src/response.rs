//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })` to get compile-time
//! type safety and consistent serialization.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use seekr_core::bulk::BulkOutcome;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Render a [`BulkOutcome`] as `{ "data": [...], "errors": [...] }` with the
/// status reflecting how the batch fared:
///
/// - every item failed: 400 Bad Request
/// - some items failed: 207 Multi-Status
/// - otherwise: 200 OK
pub fn bulk_response<T: Serialize>(outcome: BulkOutcome<T>) -> Response {
    let status = if outcome.all_failed() {
        StatusCode::BAD_REQUEST
    } else if outcome.is_partial() {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::OK
    };

    let body = serde_json::json!({
        "data": outcome.items,
        "errors": outcome.errors,
    });

    (status, axum::Json(body)).into_response()
}

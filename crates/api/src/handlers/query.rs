//! Handler for the `/query` resource: the search-and-answer agent.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use seekr_agent::Answer;
use seekr_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /query/ask`.
#[derive(Debug, Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 1, max = 4096, message = "must be 1 to 4096 characters"))]
    pub query: String,
    /// Optional explicit key: bypasses the credential store and uses the
    /// system default LLM provider (the test/dev path).
    pub api_key: Option<String>,
}

/// POST /api/v1/query/ask
///
/// Search the web, scrape the best hits, optionally pull from the user's
/// vector store, and answer the query grounded in what was found.
pub async fn ask(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<AskRequest>,
) -> AppResult<Json<DataResponse<Answer>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    tracing::info!(user_id = auth_user.user_id, "query received");

    let answer = state
        .agent
        .answer(auth_user.user_id, &input.query, input.api_key.as_deref())
        .await?;

    Ok(Json(DataResponse { data: answer }))
}

//! Onboarding submission handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::{AppError, AppState};
use sprout_core::{profile, Error};

/// POST /api/onboarding - Store onboarding answers and recompute the
/// recommendation snapshot
///
/// Expects `{"answers": {"1": 1, "2": -1, ...}}`. A missing or non-object
/// `answers` field is a 400; a non-integer key or a value outside
/// {-1, 0, 1} is a 422.
pub async fn submit_onboarding(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let raw_answers = payload
        .get("answers")
        .ok_or_else(|| AppError::bad_request("Missing 'answers' in payload"))?
        .as_object()
        .ok_or_else(|| AppError::bad_request("'answers' must be an object"))?;

    let mut user = state.profile.write().await;
    profile::submit_onboarding(&mut user, &state.recommender, raw_answers).map_err(
        |err| match err {
            Error::Validation(msg) => AppError::unprocessable(&msg),
            other => crate::core_error(other),
        },
    )?;

    info!("Onboarding completed with {} answers", user.answers.len());

    Ok(Json(json!({
        "status": "success",
        "message": "Onboarding completed"
    })))
}

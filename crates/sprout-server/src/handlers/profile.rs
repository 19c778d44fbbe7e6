//! User profile handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;

use crate::{AppError, AppState};
use sprout_core::{profile, Error, UserProfile, UserStats};

/// GET /api/user/profile - The full user aggregate
pub async fn get_user_profile(State(state): State<Arc<AppState>>) -> Json<UserProfile> {
    let user = state.profile.read().await;
    Json(user.clone())
}

/// PUT /api/user/profile - Merge fields into the profile
///
/// Provided fields overwrite the stored ones; an update that produces an
/// invalid profile is rejected wholesale with a 400.
pub async fn update_user_profile(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<UserProfile>, AppError> {
    let updates = payload
        .as_object()
        .filter(|map| !map.is_empty())
        .ok_or_else(|| AppError::bad_request("Invalid or empty JSON payload"))?;

    let mut user = state.profile.write().await;
    profile::merge_profile_update(&mut user, updates).map_err(|err| match err {
        Error::Validation(msg) => AppError::bad_request(&msg),
        other => crate::core_error(other),
    })?;

    Ok(Json(user.clone()))
}

/// GET /api/user/stats - Streaks, completion counts, and badges
pub async fn get_user_stats(State(state): State<Arc<AppState>>) -> Json<UserStats> {
    let user = state.profile.read().await;
    Json(user.stats.clone())
}

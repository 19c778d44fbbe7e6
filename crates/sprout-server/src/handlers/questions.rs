//! Onboarding question handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::AppState;
use sprout_core::Question;

/// GET /api/questions - List the onboarding questions
pub async fn get_questions(State(state): State<Arc<AppState>>) -> Json<Vec<Question>> {
    Json(state.catalog.questions().to_vec())
}

//! Challenge handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::{AppError, AppState, MAX_REASONS};
use sprout_core::{profile, Challenge, UserProfile};

/// A challenge enriched with user-specific fields for API responses
#[derive(Serialize)]
pub struct ChallengeView {
    #[serde(flatten)]
    pub challenge: Challenge,
    /// 1-based challenge id as a string
    pub id: String,
    /// Absent from the JSON outside the personalized listing
    #[serde(
        rename = "recommendationReasons",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub recommendation_reasons: Vec<String>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "currentStreak")]
    pub current_streak: i64,
}

fn challenge_view(
    challenge: &Challenge,
    index: usize,
    reasons: Vec<String>,
    user: &UserProfile,
) -> ChallengeView {
    let id = (index + 1).to_string();
    let streak = user.active_habits.get(&id);
    ChallengeView {
        challenge: challenge.clone(),
        is_active: streak.is_some(),
        current_streak: streak.map(|s| s.current_streak).unwrap_or(0),
        recommendation_reasons: reasons,
        id,
    }
}

/// GET /api/challenges/personalized - All challenges with recommendation
/// reasons for the stored answers
///
/// Requires onboarding answers; without them this is a precondition failure
/// (409), not an internal error. Challenges are listed in catalog order with
/// the top reasons from each challenge's own weight row. A recommendation
/// failure degrades to an empty list.
pub async fn get_personalized_challenges(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ChallengeView>>, AppError> {
    let user = state.profile.read().await;
    let answers = profile::onboarded_answers(&user).map_err(crate::core_error)?;

    let recommendations = match state.recommender.recommend_labeled(answers) {
        Ok(recs) => recs,
        Err(e) => {
            warn!("Recommender failed; returning empty recommendations: {}", e);
            Vec::new()
        }
    };

    let views = recommendations
        .into_iter()
        .filter_map(|rec| {
            state.catalog.challenges().get(rec.challenge_index).map(|challenge| {
                let reasons = rec.reasons.into_iter().take(MAX_REASONS).collect();
                challenge_view(challenge, rec.challenge_index, reasons, &user)
            })
        })
        .collect();

    Ok(Json(views))
}

/// GET /api/challenges/:id - A single challenge with user-specific fields
pub async fn get_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeView>, AppError> {
    let (index, challenge) = state
        .catalog
        .resolve(&id)
        .ok_or_else(|| AppError::not_found("Challenge not found"))?;

    let user = state.profile.read().await;
    Ok(Json(challenge_view(challenge, index, Vec::new(), &user)))
}

/// POST /api/challenges/:id/start - Begin tracking a challenge
pub async fn start_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeView>, AppError> {
    let (index, _) = state
        .catalog
        .resolve(&id)
        .ok_or_else(|| AppError::not_found("Challenge not found"))?;

    let mut user = state.profile.write().await;
    let challenge =
        profile::start_challenge(&mut user, &state.catalog, &id).map_err(crate::core_error)?;
    Ok(Json(challenge_view(challenge, index, Vec::new(), &user)))
}

/// Response body for a challenge completion
#[derive(Serialize)]
pub struct CompletionResponse {
    pub challenge: Challenge,
    pub reward: i64,
    pub streak: i64,
}

/// POST /api/challenges/:id/complete - Record a completion
pub async fn complete_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CompletionResponse>, AppError> {
    let mut user = state.profile.write().await;
    let result = profile::complete_challenge(&mut user, &state.catalog, &id, Utc::now())
        .map_err(crate::core_error)?;

    Ok(Json(CompletionResponse {
        challenge: result.challenge,
        reward: result.reward,
        streak: result.streak,
    }))
}

//! Wallet and redemption handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::Value;

use crate::{AppError, AppState};
use sprout_core::{catalog, profile, Error, RedemptionOption, Transaction};

/// GET /api/wallet/transactions - The append-only ledger
pub async fn get_transactions(State(state): State<Arc<AppState>>) -> Json<Vec<Transaction>> {
    let user = state.profile.read().await;
    Json(user.transactions.clone())
}

/// POST /api/wallet/redeem - Spend reward points
///
/// Expects `{"amount": 100, "description": "..."}`. A missing or
/// non-integer amount, a negative amount, and an amount above the wallet
/// balance are all 400s; nothing is mutated on rejection.
pub async fn redeem_reward(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<Transaction>, AppError> {
    let amount = payload
        .get("amount")
        .and_then(Value::as_i64)
        .ok_or_else(|| AppError::bad_request("Missing or invalid 'amount' (must be an integer)"))?;
    let description = payload
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("");

    let mut user = state.profile.write().await;
    let transaction = profile::redeem_reward(&mut user, amount, description, Utc::now()).map_err(
        |err| match err {
            Error::Validation(msg) => AppError::bad_request(&msg),
            other => crate::core_error(other),
        },
    )?;

    Ok(Json(transaction))
}

/// GET /api/wallet/redemptions - Rewards the user can spend points on
///
/// Re-read from disk each time; a missing or unreadable file degrades to an
/// empty list.
pub async fn get_redemption_options(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<RedemptionOption>> {
    Json(catalog::load_redemptions(&state.data_dir))
}

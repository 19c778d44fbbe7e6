//! Integration tests for sprout-core
//!
//! These tests exercise the full onboarding → recommendation → challenge
//! lifecycle → redemption workflow against the shipped catalog files.

use std::path::Path;

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use sprout_core::{
    catalog::{self, Catalog},
    profile,
    recommend::{Recommender, WeightMatrix, NUM_CHALLENGES, NUM_QUESTIONS},
    Error, TransactionKind,
};

fn shipped_catalog() -> Catalog {
    Catalog::load(Path::new("../../data")).expect("workspace data directory should load")
}

#[test]
fn test_shipped_catalog_matches_weight_matrix() {
    let catalog = shipped_catalog();
    assert_eq!(catalog.questions().len(), NUM_QUESTIONS);
    assert_eq!(catalog.challenges().len(), NUM_CHALLENGES);

    // The recommender only constructs when the catalog and matrix agree.
    Recommender::new(WeightMatrix::builtin(), catalog.questions()).unwrap();

    // Row 5 of the matrix is the EV challenge.
    assert_eq!(catalog.challenges()[5].challenge, "Charge EV at night");
}

#[test]
fn test_full_user_journey() {
    let catalog = shipped_catalog();
    let recommender = Recommender::new(WeightMatrix::builtin(), catalog.questions()).unwrap();
    let mut user = catalog::load_seed_profile(Path::new("../../data")).unwrap();
    let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

    // Onboarding stores answers and a full recommendation snapshot.
    let answers = json!({"1": 1, "2": -1, "6": 1});
    profile::submit_onboarding(&mut user, &recommender, answers.as_object().unwrap()).unwrap();
    assert_eq!(user.answers.len(), 3);
    assert_eq!(user.recommended_challenges.len(), NUM_CHALLENGES);

    // The snapshot lists challenges in catalog order; the EV challenge's top
    // reason is the commute question (raw weight 0.85 on question 2).
    let ev = &user.recommended_challenges[5];
    assert_eq!(ev.challenge_index, 5);
    assert_eq!(ev.reasons[0], 1);

    let labeled = recommender.recommend_labeled(&user.answers).unwrap();
    assert_eq!(labeled[5].reasons[0], "Daily car commute");

    // Start and complete the cycling challenge across a week.
    profile::start_challenge(&mut user, &catalog, "2").unwrap();
    assert_eq!(user.active_habits["2"].current_streak, 0);
    assert_eq!(user.active_habits["2"].time_horizon, "daily");

    for day in 0..5 {
        profile::complete_challenge(&mut user, &catalog, "2", t0 + Duration::days(day)).unwrap();
    }
    let reward = catalog.challenges()[1].currency_reward_points;
    assert_eq!(user.active_habits["2"].current_streak, 5);
    assert_eq!(user.wallet_balance, 5 * reward);
    assert_eq!(user.total_impact, 5 * reward);
    assert_eq!(user.stats.total_challenges_completed, 5);
    assert_eq!(user.stats.longest_streak, 5);

    // Badges at streaks 1 and 5.
    assert_eq!(user.stats.badges.len(), 2);
    assert_eq!(
        user.stats.badges[1].title,
        "Cycle to work or university - 5 Streak"
    );
    assert_eq!(user.stats.badges[1].icon, "🚲");

    // Redeem part of the balance.
    let balance = user.wallet_balance;
    let txn =
        profile::redeem_reward(&mut user, 100, "Plant a tree", t0 + Duration::days(5)).unwrap();
    assert_eq!(user.wallet_balance, balance - 100);
    assert_eq!(txn.amount, -100);
    assert_eq!(txn.kind, TransactionKind::Redeemed);

    // Over-redeeming is rejected without touching the ledger.
    let over = user.wallet_balance + 1;
    let err =
        profile::redeem_reward(&mut user, over, "Too much", t0 + Duration::days(5)).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(user.transactions.len(), 1);
}

#[test]
fn test_profile_round_trips_through_json() {
    let catalog = shipped_catalog();
    let recommender = Recommender::new(WeightMatrix::builtin(), catalog.questions()).unwrap();
    let mut user = catalog::load_seed_profile(Path::new("../../data")).unwrap();
    let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

    let answers = json!({"3": 1});
    profile::submit_onboarding(&mut user, &recommender, answers.as_object().unwrap()).unwrap();
    profile::complete_challenge(&mut user, &catalog, "1", t0).unwrap();

    // The wire shape keeps the frontend contract's field names.
    let value = serde_json::to_value(&user).unwrap();
    assert!(value.get("walletBalance").is_some());
    assert!(value.get("activeHabits").is_some());
    assert_eq!(value["stats"]["totalChallengesCompleted"], 1);
    assert!(value["activeHabits"]["1"]["lastCompleted"].is_string());

    let restored: sprout_core::UserProfile = serde_json::from_value(value).unwrap();
    assert_eq!(restored.wallet_balance, user.wallet_balance);
    assert_eq!(restored.answers, user.answers);
    assert_eq!(restored.stats.badges.len(), user.stats.badges.len());
}

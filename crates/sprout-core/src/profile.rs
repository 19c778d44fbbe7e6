//! Profile state transitions
//!
//! The four operations that mutate the user aggregate: onboarding
//! submission, challenge start, challenge completion, and reward
//! redemption. Each validates its input first and either fully commits or
//! fully rejects; callers pass `now` explicitly so tests control the clock.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::info;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::models::{Badge, Challenge, StreakInfo, Transaction, TransactionKind, UserProfile};
use crate::recommend::Recommender;

/// Streak values that earn a badge
pub const STREAK_MILESTONES: [i64; 6] = [1, 5, 10, 25, 50, 100];

/// A completion gap of more than this many whole days breaks a streak
pub const STREAK_BREAK_DAYS: i64 = 7;

/// Result of completing a challenge
#[derive(Debug, Clone)]
pub struct CompletionResult {
    pub challenge: Challenge,
    pub reward: i64,
    pub streak: i64,
}

/// Emoji for a challenge's badge theme, with a trophy fallback for
/// unrecognized theme keys.
pub fn badge_icon(theme: &str) -> &'static str {
    match theme {
        "crafting_tools_icon" => "🛠️",
        "bicycle_silhouette" => "🚲",
        "footprints_pathway" => "👣",
        "leaf_plant_sprout" => "🌱",
        "bus_train_icon" => "🚌",
        "electric_plug_moon" => "🔌",
        "car_group_icon" => "🚗",
        "car_group_icon_children" => "🚗",
        "bike_icon" => "🚲",
        "leaf_plate_carrot" => "🥕",
        "recycling_bins" => "♻️",
        "power_button_icon" => "⚡",
        "solar_panel_sun_icon" => "☀️",
        "clean_riverside_icon" => "🌊",
        _ => "🏆",
    }
}

/// Replace the profile's onboarding answers and recompute the stored
/// recommendation snapshot.
///
/// Every key must parse as an integer question id and every value must be
/// one of -1, 0, 1; anything else rejects the whole submission without
/// mutating the profile. Answers are replaced wholesale, not merged.
pub fn submit_onboarding(
    profile: &mut UserProfile,
    recommender: &Recommender,
    raw_answers: &Map<String, Value>,
) -> Result<()> {
    let mut answers = BTreeMap::new();
    for (key, value) in raw_answers {
        let qid: u32 = key.parse().map_err(|_| {
            Error::Validation(format!(
                "Question ID must be an integer-like string, got {}",
                key
            ))
        })?;
        let answer = value.as_i64().filter(|v| (-1..=1).contains(v)).ok_or_else(|| {
            Error::Validation(format!(
                "Answer for question {} must be -1, 0, or 1, got {}",
                qid, value
            ))
        })?;
        answers.insert(qid, answer as i8);
    }

    info!("Received onboarding answers: {:?}", answers);

    profile.recommended_challenges = recommender.recommend(&answers);
    profile.answers = answers;
    Ok(())
}

/// The stored onboarding answers, required before personalization.
pub fn onboarded_answers(profile: &UserProfile) -> Result<&BTreeMap<u32, i8>> {
    if profile.answers.is_empty() {
        return Err(Error::Precondition(
            "Onboarding answers have not been submitted yet".to_string(),
        ));
    }
    Ok(&profile.answers)
}

/// Begin tracking a challenge.
///
/// Creates the streak entry only if absent; starting an already-started
/// challenge never resets an existing streak.
pub fn start_challenge<'a>(
    profile: &mut UserProfile,
    catalog: &'a Catalog,
    id: &str,
) -> Result<&'a Challenge> {
    let (idx, challenge) = catalog
        .resolve(id)
        .ok_or_else(|| Error::NotFound("Challenge not found".to_string()))?;
    let key = (idx + 1).to_string();

    profile
        .active_habits
        .entry(key.clone())
        .or_insert_with(|| StreakInfo {
            challenge_id: key.clone(),
            current_streak: 0,
            last_completed: None,
            time_horizon: challenge.time_variable.clone(),
        });

    info!("Started challenge {}", key);
    Ok(challenge)
}

/// Record a completion of a challenge.
///
/// First completion (or a gap of more than [`STREAK_BREAK_DAYS`] whole days)
/// sets the streak to 1; otherwise the streak increments. Reward points are
/// added to both the wallet balance and the total impact counter, stats are
/// updated, and a badge is appended at milestone streak values.
pub fn complete_challenge(
    profile: &mut UserProfile,
    catalog: &Catalog,
    id: &str,
    now: DateTime<Utc>,
) -> Result<CompletionResult> {
    let (idx, challenge) = catalog
        .resolve(id)
        .ok_or_else(|| Error::NotFound("Challenge not found".to_string()))?;
    let key = (idx + 1).to_string();

    let streak_info = profile
        .active_habits
        .entry(key.clone())
        .or_insert_with(|| StreakInfo {
            challenge_id: key.clone(),
            current_streak: 0,
            last_completed: None,
            time_horizon: challenge.time_variable.clone(),
        });

    streak_info.current_streak = match streak_info.last_completed {
        Some(last) if (now - last).num_days() > STREAK_BREAK_DAYS => 1,
        Some(_) => streak_info.current_streak + 1,
        None => 1,
    };
    streak_info.last_completed = Some(now);
    let streak = streak_info.current_streak;

    let reward = challenge.currency_reward_points;
    profile.wallet_balance += reward;
    profile.total_impact += reward;
    profile.stats.total_challenges_completed += 1;
    if streak > profile.stats.longest_streak {
        profile.stats.longest_streak = streak;
    }

    if STREAK_MILESTONES.contains(&streak) {
        let badge = Badge {
            id: format!("badge_{}", profile.stats.badges.len() + 1),
            title: format!("{} - {} Streak", challenge.challenge, streak),
            icon: badge_icon(&challenge.badge_image_theme).to_string(),
            earned_at: now,
            challenge_id: key.clone(),
        };
        profile.stats.badges.push(badge);
    }

    info!(
        "Completed challenge {} (streak={}). Reward={}",
        key, streak, reward
    );

    Ok(CompletionResult {
        challenge: challenge.clone(),
        reward,
        streak,
    })
}

/// Spend reward points.
///
/// The amount must be non-negative and covered by the wallet balance; on
/// success the balance decrements and a `redeemed` transaction with the
/// negated amount is appended to the ledger.
pub fn redeem_reward(
    profile: &mut UserProfile,
    amount: i64,
    description: &str,
    now: DateTime<Utc>,
) -> Result<Transaction> {
    if amount < 0 {
        return Err(Error::Validation(
            "Redemption amount must be non-negative".to_string(),
        ));
    }
    if profile.wallet_balance < amount {
        return Err(Error::Validation("Insufficient balance".to_string()));
    }

    profile.wallet_balance -= amount;
    let transaction = Transaction {
        id: format!("txn_{}", now.timestamp_millis()),
        kind: TransactionKind::Redeemed,
        amount: -amount,
        description: description.to_string(),
        date: now,
    };
    profile.transactions.push(transaction.clone());

    info!("Redeemed {} coins: {}", amount, description);
    Ok(transaction)
}

/// Merge a partial JSON update into the profile.
///
/// The update is applied field-by-field onto the profile's JSON form and
/// the result deserialized back; an update that produces an invalid profile
/// is rejected wholesale.
pub fn merge_profile_update(
    profile: &mut UserProfile,
    updates: &Map<String, Value>,
) -> Result<()> {
    let mut merged = match serde_json::to_value(&*profile)? {
        Value::Object(map) => map,
        _ => unreachable!("a profile always serializes to an object"),
    };
    for (field, value) in updates {
        merged.insert(field.clone(), value.clone());
    }
    *profile = serde_json::from_value(Value::Object(merged))
        .map_err(|e| Error::Validation(format!("Invalid profile update: {}", e)))?;

    info!("User profile updated: {:?}", updates.keys().collect::<Vec<_>>());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;
    use crate::recommend::WeightMatrix;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn test_catalog() -> Catalog {
        let questions = vec![
            Question {
                id: 1,
                question: "Do you cycle?".to_string(),
                short_form: "Cycling".to_string(),
            },
            Question {
                id: 2,
                question: "Do you drive?".to_string(),
                short_form: "Driving".to_string(),
            },
        ];
        let challenges = vec![
            Challenge {
                challenge: "Cycle to work".to_string(),
                description: "Swap the car for a bike.".to_string(),
                category: "Transport".to_string(),
                impact_score: 8,
                currency_reward_points: 50,
                time_variable: "daily".to_string(),
                badge_image_theme: "bicycle_silhouette".to_string(),
            },
            Challenge {
                challenge: "Walk to the supermarket".to_string(),
                description: "Leave the car at home.".to_string(),
                category: "Transport".to_string(),
                impact_score: 4,
                currency_reward_points: 20,
                time_variable: "daily".to_string(),
                badge_image_theme: "mystery_theme".to_string(),
            },
        ];
        Catalog::from_parts(questions, challenges)
    }

    fn test_recommender(catalog: &Catalog) -> Recommender {
        let weights = WeightMatrix::from_rows(vec![vec![0.9, -0.3], vec![0.5, 0.5]]).unwrap();
        Recommender::new(weights, catalog.questions()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn raw_answers(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_submit_onboarding_replaces_answers_and_snapshot() {
        let catalog = test_catalog();
        let recommender = test_recommender(&catalog);
        let mut profile = UserProfile::default();
        profile.answers.insert(2, -1);

        submit_onboarding(&mut profile, &recommender, &raw_answers(json!({"1": 1}))).unwrap();

        // Wholesale replacement: the old answer for question 2 is gone.
        assert_eq!(profile.answers.len(), 1);
        assert_eq!(profile.answers.get(&1), Some(&1));
        assert_eq!(profile.recommended_challenges.len(), 2);
        assert_eq!(profile.recommended_challenges[0].challenge_index, 0);
    }

    #[test]
    fn test_submit_onboarding_rejects_bad_key() {
        let catalog = test_catalog();
        let recommender = test_recommender(&catalog);
        let mut profile = UserProfile::default();
        profile.answers.insert(1, 1);

        let err = submit_onboarding(
            &mut profile,
            &recommender,
            &raw_answers(json!({"first": 1})),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // No mutation on rejection.
        assert_eq!(profile.answers.get(&1), Some(&1));
        assert!(profile.recommended_challenges.is_empty());
    }

    #[test]
    fn test_submit_onboarding_rejects_bad_value() {
        let catalog = test_catalog();
        let recommender = test_recommender(&catalog);
        let mut profile = UserProfile::default();

        for bad in [json!({"1": 2}), json!({"1": "1"}), json!({"1": 0.5})] {
            let err =
                submit_onboarding(&mut profile, &recommender, &raw_answers(bad)).unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
            assert!(profile.answers.is_empty());
        }
    }

    #[test]
    fn test_onboarded_answers_is_a_precondition() {
        let mut profile = UserProfile::default();
        let err = onboarded_answers(&profile).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));

        profile.answers.insert(1, 1);
        assert_eq!(onboarded_answers(&profile).unwrap().len(), 1);
    }

    #[test]
    fn test_start_challenge_is_idempotent() {
        let catalog = test_catalog();
        let mut profile = UserProfile::default();

        start_challenge(&mut profile, &catalog, "1").unwrap();
        complete_challenge(&mut profile, &catalog, "1", now()).unwrap();
        assert_eq!(profile.active_habits["1"].current_streak, 1);

        // Starting again must not reset the streak.
        start_challenge(&mut profile, &catalog, "1").unwrap();
        assert_eq!(profile.active_habits["1"].current_streak, 1);
        assert!(profile.active_habits["1"].last_completed.is_some());
    }

    #[test]
    fn test_start_challenge_unknown_id() {
        let catalog = test_catalog();
        let mut profile = UserProfile::default();
        for id in ["0", "3", "abc"] {
            let err = start_challenge(&mut profile, &catalog, id).unwrap_err();
            assert!(matches!(err, Error::NotFound(_)));
        }
        assert!(profile.active_habits.is_empty());
    }

    #[test]
    fn test_complete_challenge_first_time() {
        let catalog = test_catalog();
        let mut profile = UserProfile::default();

        let result = complete_challenge(&mut profile, &catalog, "1", now()).unwrap();
        assert_eq!(result.streak, 1);
        assert_eq!(result.reward, 50);
        assert_eq!(profile.wallet_balance, 50);
        assert_eq!(profile.total_impact, 50);
        assert_eq!(profile.stats.total_challenges_completed, 1);
        assert_eq!(profile.stats.longest_streak, 1);
        assert_eq!(profile.active_habits["1"].last_completed, Some(now()));
    }

    #[test]
    fn test_streak_increments_within_seven_days() {
        let catalog = test_catalog();
        let mut profile = UserProfile::default();

        let t0 = now();
        complete_challenge(&mut profile, &catalog, "1", t0).unwrap();
        for i in 1..4 {
            complete_challenge(&mut profile, &catalog, "1", t0 + Duration::days(i)).unwrap();
        }
        assert_eq!(profile.active_habits["1"].current_streak, 4);

        // A three-day gap is within the window: 4 -> 5.
        let result =
            complete_challenge(&mut profile, &catalog, "1", t0 + Duration::days(6)).unwrap();
        assert_eq!(result.streak, 5);

        // Exactly seven whole days still counts.
        let result =
            complete_challenge(&mut profile, &catalog, "1", t0 + Duration::days(13)).unwrap();
        assert_eq!(result.streak, 6);
    }

    #[test]
    fn test_streak_resets_after_seven_day_gap() {
        let catalog = test_catalog();
        let mut profile = UserProfile::default();

        let t0 = now();
        complete_challenge(&mut profile, &catalog, "1", t0).unwrap();
        complete_challenge(&mut profile, &catalog, "1", t0 + Duration::days(1)).unwrap();
        assert_eq!(profile.active_habits["1"].current_streak, 2);

        let result =
            complete_challenge(&mut profile, &catalog, "1", t0 + Duration::days(9)).unwrap();
        assert_eq!(result.streak, 1);
        // Wallet keeps earning through a broken streak.
        assert_eq!(profile.wallet_balance, 150);
    }

    #[test]
    fn test_badges_only_at_milestones() {
        let catalog = test_catalog();
        let mut profile = UserProfile::default();

        let t0 = now();
        for i in 0..11 {
            complete_challenge(&mut profile, &catalog, "1", t0 + Duration::days(i)).unwrap();
        }

        // Streaks 1..=11: badges at 1, 5, and 10 only.
        let titles: Vec<&str> = profile
            .stats
            .badges
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Cycle to work - 1 Streak",
                "Cycle to work - 5 Streak",
                "Cycle to work - 10 Streak"
            ]
        );
        assert_eq!(profile.stats.badges[0].id, "badge_1");
        assert_eq!(profile.stats.badges[0].icon, "🚲");
        assert_eq!(profile.stats.badges[2].id, "badge_3");
        assert_eq!(profile.stats.longest_streak, 11);
    }

    #[test]
    fn test_badge_icon_falls_back_to_trophy() {
        let catalog = test_catalog();
        let mut profile = UserProfile::default();

        complete_challenge(&mut profile, &catalog, "2", now()).unwrap();
        assert_eq!(profile.stats.badges[0].icon, "🏆");
    }

    #[test]
    fn test_redeem_reward_success() {
        let mut profile = UserProfile {
            wallet_balance: 100,
            ..Default::default()
        };

        let txn = redeem_reward(&mut profile, 60, "Plant a tree", now()).unwrap();
        assert_eq!(profile.wallet_balance, 40);
        assert_eq!(txn.amount, -60);
        assert_eq!(txn.kind, TransactionKind::Redeemed);
        assert_eq!(txn.date, now());
        assert_eq!(profile.transactions.len(), 1);
        assert_eq!(profile.transactions[0].id, txn.id);
    }

    #[test]
    fn test_redeem_reward_insufficient_balance() {
        let mut profile = UserProfile {
            wallet_balance: 30,
            ..Default::default()
        };

        let err = redeem_reward(&mut profile, 60, "Too much", now()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // Balance and ledger untouched on rejection.
        assert_eq!(profile.wallet_balance, 30);
        assert!(profile.transactions.is_empty());
    }

    #[test]
    fn test_redeem_reward_rejects_negative_amount() {
        let mut profile = UserProfile {
            wallet_balance: 30,
            ..Default::default()
        };

        let err = redeem_reward(&mut profile, -10, "Sneaky", now()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(profile.wallet_balance, 30);
    }

    #[test]
    fn test_merge_profile_update() {
        let mut profile = UserProfile::default();
        let updates = raw_answers(json!({"walletBalance": 75, "totalImpact": 120}));

        merge_profile_update(&mut profile, &updates).unwrap();
        assert_eq!(profile.wallet_balance, 75);
        assert_eq!(profile.total_impact, 120);
    }

    #[test]
    fn test_merge_profile_update_rejects_invalid_shape() {
        let mut profile = UserProfile {
            wallet_balance: 10,
            ..Default::default()
        };
        let updates = raw_answers(json!({"walletBalance": "lots"}));

        let err = merge_profile_update(&mut profile, &updates).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(profile.wallet_balance, 10);
    }
}

//! Domain models for Sprout

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An onboarding question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// 1-based question id
    pub id: u32,
    /// Full prompt shown during onboarding
    pub question: String,
    /// Short label used as a human-readable recommendation reason
    #[serde(rename = "shortForm")]
    pub short_form: String,
}

/// A pre-authored sustainability challenge
///
/// Challenges have no id of their own; the 1-based id is derived from the
/// position in the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    /// Challenge title
    pub challenge: String,
    pub description: String,
    pub category: String,
    pub impact_score: i64,
    /// Reward points added to the wallet (and total impact) per completion
    pub currency_reward_points: i64,
    /// Time-cost descriptor (daily, weekly, monthly)
    pub time_variable: String,
    /// Badge icon theme key, resolved to an emoji when a badge is earned
    pub badge_image_theme: String,
}

/// Per-challenge streak state for the user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakInfo {
    /// 1-based challenge id as a string (wire format)
    pub challenge_id: String,
    pub current_streak: i64,
    /// Unset until the challenge is completed for the first time
    pub last_completed: Option<DateTime<Utc>>,
    /// Copied from the challenge's time_variable at start time
    pub time_horizon: String,
}

/// A milestone badge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub earned_at: DateTime<Utc>,
    pub challenge_id: String,
}

/// Aggregate user statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub total_challenges_completed: i64,
    pub badges: Vec<Badge>,
}

/// Ledger transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Earned,
    Redeemed,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Earned => "earned",
            Self::Redeemed => "redeemed",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "earned" => Ok(Self::Earned),
            "redeemed" => Ok(Self::Redeemed),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An append-only wallet ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Signed amount: negative for redemptions
    pub amount: i64,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// One entry of a stored recommendation snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedChallenge {
    /// 0-based index into the challenge catalog
    pub challenge_index: usize,
    /// 0-based question indices ordered by descending signed weight
    /// within this challenge's row
    pub reasons: Vec<usize>,
}

/// The singleton mutable user aggregate
///
/// Field names keep the wire contract of the frontend (camelCase). Every
/// field defaults so a partial seed file still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Onboarding answers: question id -> value in {-1, 0, 1}
    #[serde(default)]
    pub answers: BTreeMap<u32, i8>,
    /// Recommendation snapshot recomputed on each onboarding submission
    #[serde(default)]
    pub recommended_challenges: Vec<RankedChallenge>,
    /// Active streaks keyed by 1-based challenge id (as a string)
    #[serde(default)]
    pub active_habits: BTreeMap<String, StreakInfo>,
    #[serde(default)]
    pub wallet_balance: i64,
    #[serde(default)]
    pub total_impact: i64,
    #[serde(default)]
    pub stats: UserStats,
    /// Append-only ledger
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// A reward the user can spend points on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionOption {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: i64,
    pub image: String,
}

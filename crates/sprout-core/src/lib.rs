//! Sprout Core Library
//!
//! Shared functionality for the Sprout sustainability challenge tracker:
//! - Catalog loading (questions, challenges, redemption options)
//! - The static weight-matrix challenge recommender
//! - Profile state transitions (onboarding, streaks, badges, wallet ledger)

pub mod catalog;
pub mod error;
pub mod models;
pub mod profile;
pub mod recommend;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use models::{
    Badge, Challenge, Question, RankedChallenge, RedemptionOption, StreakInfo, Transaction,
    TransactionKind, UserProfile, UserStats,
};
pub use profile::{CompletionResult, STREAK_BREAK_DAYS, STREAK_MILESTONES};
pub use recommend::{LabeledRecommendation, Recommender, WeightMatrix};

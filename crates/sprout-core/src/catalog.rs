//! Static catalog data: questions, challenges, redemption options, and the
//! seed user profile, loaded once from JSON files in a data directory.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{Challenge, Question, RedemptionOption, UserProfile};

/// Immutable question and challenge definitions
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
    challenges: Vec<Challenge>,
}

impl Catalog {
    /// Load `question.json` and `challenge.json` from a data directory
    pub fn load(data_dir: &Path) -> Result<Self> {
        let questions: Vec<Question> = load_json(&data_dir.join("question.json"))?;
        let challenges: Vec<Challenge> = load_json(&data_dir.join("challenge.json"))?;
        Ok(Self::from_parts(questions, challenges))
    }

    pub fn from_parts(questions: Vec<Question>, challenges: Vec<Challenge>) -> Self {
        Self {
            questions,
            challenges,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    /// Resolve an external challenge id (1-based decimal string) to its
    /// 0-based catalog index and definition.
    ///
    /// Anything that is not a digit string inside [1, len] resolves to None.
    pub fn resolve(&self, id: &str) -> Option<(usize, &Challenge)> {
        let n: usize = id.parse().ok()?;
        let idx = n.checked_sub(1)?;
        self.challenges.get(idx).map(|c| (idx, c))
    }
}

/// Load the seed user profile from `user.json`
pub fn load_seed_profile(data_dir: &Path) -> Result<UserProfile> {
    load_json(&data_dir.join("user.json"))
}

/// Load redemption options from `redemptions.json`.
///
/// A missing or unreadable file degrades to an empty list.
pub fn load_redemptions(data_dir: &Path) -> Vec<RedemptionOption> {
    match load_json(&data_dir.join("redemptions.json")) {
        Ok(options) => options,
        Err(e) => {
            warn!("Failed to load redemptions.json: {}", e);
            Vec::new()
        }
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "Data file not found: {}",
            path.display()
        )));
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

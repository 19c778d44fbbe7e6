//! Recommend command implementation

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use sprout_core::{Catalog, Recommender, WeightMatrix};

/// Parse "1=1,2=-1,6=1" into an answer map
fn parse_answers(input: &str) -> Result<BTreeMap<u32, i8>> {
    let mut answers = BTreeMap::new();
    for pair in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((id, value)) = pair.split_once('=') else {
            bail!("Invalid answer '{}' (expected id=value)", pair);
        };
        let id: u32 = id
            .trim()
            .parse()
            .with_context(|| format!("Invalid question id '{}'", id))?;
        let value: i8 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid answer value '{}'", value))?;
        if !(-1..=1).contains(&value) {
            bail!("Answer for question {} must be -1, 0, or 1, got {}", id, value);
        }
        answers.insert(id, value);
    }
    if answers.is_empty() {
        bail!("No answers provided (expected e.g. \"1=1,2=-1\")");
    }
    Ok(answers)
}

pub fn cmd_recommend(data_dir: &Path, answers: &str, reason_count: usize) -> Result<()> {
    let catalog = Catalog::load(data_dir).context("Failed to load catalog data")?;
    let recommender = Recommender::new(WeightMatrix::builtin(), catalog.questions())?;
    let answers = parse_answers(answers)?;

    let scores = recommender.scores(&answers);
    let labeled = recommender.recommend_labeled(&answers)?;

    println!("🌱 Challenge ranking for {} answer(s):\n", answers.len());
    for (rank, &idx) in recommender.ranking(&scores).iter().enumerate() {
        let challenge = &catalog.challenges()[idx];
        let reasons = labeled[idx]
            .reasons
            .iter()
            .take(reason_count)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:>3}. [{:+.3}] {} ({} pts)",
            rank + 1,
            scores[idx],
            challenge.challenge,
            challenge.currency_reward_points
        );
        println!("       reasons: {}", reasons);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answers() {
        let answers = parse_answers("1=1, 2=-1,6=0").unwrap();
        assert_eq!(answers.len(), 3);
        assert_eq!(answers[&1], 1);
        assert_eq!(answers[&2], -1);
        assert_eq!(answers[&6], 0);
    }

    #[test]
    fn test_parse_answers_rejects_bad_input() {
        assert!(parse_answers("").is_err());
        assert!(parse_answers("1").is_err());
        assert!(parse_answers("x=1").is_err());
        assert!(parse_answers("1=2").is_err());
    }
}

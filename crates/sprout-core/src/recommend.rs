//! Challenge recommendation engine
//!
//! A fixed weight matrix (challenges x questions) is multiplied against the
//! user's answer vector to score each challenge, and each challenge's row is
//! ranked on its own to surface the questions that drive it ("reasons").
//!
//! The emitted recommendation list follows catalog order, not score order;
//! the score ranking is exposed separately via [`Recommender::ranking`].
//! This matches the upstream product behavior (see DESIGN.md).

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::{Question, RankedChallenge};

pub const NUM_CHALLENGES: usize = 14;
pub const NUM_QUESTIONS: usize = 10;

/// Raw conservative correlation estimates (rows = challenges, cols = Q1..Q10).
/// Authored offline; rows are scaled at construction so the maximum absolute
/// value per row is 1.
const RAW_WEIGHTS: [[f64; NUM_QUESTIONS]; NUM_CHALLENGES] = [
    //  Q1     Q2     Q3     Q4     Q5     Q6     Q7     Q8     Q9     Q10
    [0.75, -0.20, 0.30, 0.25, 0.10, 0.05, 0.40, 0.10, 0.20, 0.05], // buy second-hand / DIY
    [0.60, -0.70, 0.70, 0.00, 0.60, -0.30, 0.20, 0.10, 0.50, 0.00], // cycle to work
    [0.40, -0.50, 0.50, 0.10, 0.20, -0.10, 0.00, 0.00, 0.10, 0.10], // walk to supermarket
    [0.50, -0.10, 0.20, 0.85, 0.00, 0.00, 0.00, 0.00, 0.00, 0.30], // plant / compost
    [0.20, -0.60, 0.70, 0.00, 0.75, -0.20, 0.10, 0.00, 0.20, 0.00], // public transport
    [0.00, 0.85, -0.40, 0.00, -0.10, 0.00, 0.30, 0.60, 0.40, 0.00], // charge EV at night
    [0.10, 0.40, -0.10, 0.00, 0.20, 0.00, 0.50, 0.10, 0.00, 0.00], // carpool to work
    [0.00, 0.40, -0.20, 0.00, 0.10, 0.00, 0.40, 0.30, 0.00, 0.00], // carpool children
    [0.40, -0.30, 0.60, 0.00, 0.20, 0.00, 0.30, 0.00, 0.70, 0.00], // rented bike
    [0.10, -0.10, 0.10, 0.20, 0.00, 0.00, 0.60, 0.00, 0.00, 0.95], // plant-based meals
    [0.20, -0.10, 0.10, 0.20, 0.00, 0.95, 0.50, 0.00, 0.00, 0.10], // separate waste
    [0.00, -0.10, 0.00, 0.00, 0.00, 0.20, 0.60, 0.20, 0.20, 0.00], // unused appliances
    [0.00, 0.20, 0.00, 0.20, 0.00, 0.00, 0.30, 0.70, 0.90, 0.00], // solar panels
    [0.30, -0.10, 0.10, 0.20, 0.10, 0.40, 0.60, 0.00, 0.00, 0.90], // riverside cleanup
];

/// Dense challenge-by-question weight matrix with entries in [-1, 1]
#[derive(Debug, Clone)]
pub struct WeightMatrix {
    rows: Vec<Vec<f64>>,
}

impl WeightMatrix {
    /// The built-in hand-authored matrix, row-normalized
    pub fn builtin() -> Self {
        let rows = RAW_WEIGHTS.iter().map(|row| row.to_vec()).collect();
        // from_rows cannot fail on the compile-time constant
        Self::from_rows(rows).expect("built-in weight matrix is rectangular")
    }

    /// Build a matrix from raw rows, scaling each row so its maximum absolute
    /// value is 1. Rows whose maximum is 0 are left unscaled.
    pub fn from_rows(raw: Vec<Vec<f64>>) -> Result<Self> {
        let Some(width) = raw.first().map(Vec::len) else {
            return Err(Error::InvalidData("weight matrix has no rows".into()));
        };
        if raw.iter().any(|row| row.len() != width) {
            return Err(Error::InvalidData(
                "weight matrix rows have unequal lengths".into(),
            ));
        }
        let rows = raw
            .into_iter()
            .map(|row| {
                let max = row.iter().fold(0.0f64, |m, w| m.max(w.abs()));
                if max == 0.0 {
                    row
                } else {
                    row.into_iter().map(|w| w / max).collect()
                }
            })
            .collect();
        Ok(Self { rows })
    }

    pub fn num_challenges(&self) -> usize {
        self.rows.len()
    }

    pub fn num_questions(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }
}

/// One recommendation with reasons resolved to question labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRecommendation {
    /// 0-based index into the challenge catalog
    pub challenge_index: usize,
    /// Question shortForm labels ordered by descending signed row weight
    pub reasons: Vec<String>,
}

/// Scores challenges against onboarding answers
#[derive(Debug, Clone)]
pub struct Recommender {
    weights: WeightMatrix,
    questions_by_id: BTreeMap<u32, Question>,
}

impl Recommender {
    /// The matrix must have exactly one column per catalog question.
    pub fn new(weights: WeightMatrix, questions: &[Question]) -> Result<Self> {
        if weights.num_questions() != questions.len() {
            return Err(Error::InvalidData(format!(
                "weight matrix has {} columns but the catalog has {} questions",
                weights.num_questions(),
                questions.len()
            )));
        }
        let questions_by_id = questions.iter().map(|q| (q.id, q.clone())).collect();
        Ok(Self {
            weights,
            questions_by_id,
        })
    }

    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    /// Expand sparse answers into a dense vector. Question ids are 1-based;
    /// ids outside [1, Q] are ignored.
    fn dense_vector(&self, answers: &BTreeMap<u32, i8>) -> Vec<f64> {
        let mut v = vec![0.0; self.weights.num_questions()];
        for (&qid, &value) in answers {
            if let Some(slot) = (qid as usize)
                .checked_sub(1)
                .and_then(|idx| v.get_mut(idx))
            {
                *slot = f64::from(value);
            }
        }
        v
    }

    /// Per-challenge alignment scores: `scores[i] = dot(W[i], v)`
    pub fn scores(&self, answers: &BTreeMap<u32, i8>) -> Vec<f64> {
        let v = self.dense_vector(answers);
        self.weights
            .rows
            .iter()
            .map(|row| row.iter().zip(&v).map(|(w, a)| w * a).sum())
            .collect()
    }

    /// Challenge indices ordered by descending score; equal scores keep
    /// original row order.
    pub fn ranking(&self, scores: &[f64]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..scores.len()).collect();
        indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        indices
    }

    /// Recommend challenges for an answer vector.
    ///
    /// The returned entries are in catalog order (index 0..C-1); each carries
    /// its row's question indices ordered by descending signed weight.
    pub fn recommend(&self, answers: &BTreeMap<u32, i8>) -> Vec<RankedChallenge> {
        let scores = self.scores(answers);
        // The score ranking deliberately does not reorder the output; the
        // product lists challenges in catalog order (see module docs).
        let _ranked = self.ranking(&scores);
        (0..self.weights.num_challenges())
            .map(|i| RankedChallenge {
                challenge_index: i,
                reasons: self.row_reasons(i),
            })
            .collect()
    }

    /// Question indices of one row ordered by descending signed weight,
    /// ties keeping original question order.
    fn row_reasons(&self, challenge_index: usize) -> Vec<usize> {
        let row = self.weights.row(challenge_index);
        let mut indices: Vec<usize> = (0..row.len()).collect();
        indices.sort_by(|&a, &b| row[b].total_cmp(&row[a]));
        indices
    }

    /// Like [`recommend`](Self::recommend), with reason indices resolved to
    /// question shortForm labels via their 1-based ids.
    pub fn recommend_labeled(
        &self,
        answers: &BTreeMap<u32, i8>,
    ) -> Result<Vec<LabeledRecommendation>> {
        self.recommend(answers)
            .into_iter()
            .map(|rec| {
                let reasons = rec
                    .reasons
                    .iter()
                    .map(|&q_idx| {
                        let qid = q_idx as u32 + 1;
                        self.questions_by_id
                            .get(&qid)
                            .map(|q| q.short_form.clone())
                            .ok_or_else(|| {
                                Error::InvalidData(format!("no question with id {}", qid))
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(LabeledRecommendation {
                    challenge_index: rec.challenge_index,
                    reasons,
                })
            })
            .collect()
    }
}

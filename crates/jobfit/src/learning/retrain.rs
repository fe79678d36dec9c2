//! Retrain Engine: recomputes boost weights from application outcomes and mines new
//! keywords from feedback.
//!
//! Planning is pure. `retrain` reads a store snapshot and returns a `RetrainPlan`;
//! `RetrainPlan::commit` applies it as one batch, refusing if the store moved on.
//!
//! Weight rule per boost keyword with any evidence:
//!   r      = positive_hits / (positive_hits + negative_hits)
//!   target = r * target_scale
//!   delta  = clamp(learning_rate * (target - w), -max_step, +max_step)
//!   new    = clamp(w + delta, min(weight_floor, w), max(weight_cap, w))
//! A weight already outside [floor, cap] is walked back one step at a time and is never
//! pushed further out.
//! Changes smaller than `min_delta` are dropped. Repeated passes over the same sample move
//! each weight monotonically towards its target with shrinking steps.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};
use crate::keywords::KeywordStore;
use crate::learning::evidence::count_job_hits;
use crate::learning::mining::mine_feedback_terms;
use crate::matching::KeywordMatcher;
use crate::models::application::{Application, ApplicationStatus, Feedback};
use crate::models::keyword::{Category, Keyword, KeywordSource};

// ────────────────────────────────────────────────────────────────────────────
// Tuning
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainConfig {
    /// Recorded score at or above which a not-interested job counts as negative evidence.
    pub score_threshold: f64,
    pub learning_rate: f64,
    pub target_scale: f64,
    pub max_step: f64,
    pub weight_floor: f64,
    pub weight_cap: f64,
    pub min_delta: f64,
    /// Starting weight for mined keywords.
    pub learned_weight: f64,
    pub min_feedback_frequency: usize,
    pub max_new_keywords: usize,
}

impl Default for RetrainConfig {
    fn default() -> Self {
        Self {
            score_threshold: 3.0,
            learning_rate: 0.5,
            target_scale: 2.0,
            max_step: 0.5,
            weight_floor: 0.1,
            weight_cap: 5.0,
            min_delta: 0.01,
            learned_weight: 0.5,
            min_feedback_frequency: 2,
            max_new_keywords: 10,
        }
    }
}

impl RetrainConfig {
    /// Rejects tunings that would break convergence or produce invalid weights.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.learning_rate > 0.0 && self.learning_rate <= 1.0,
            "learning rate must be in (0, 1], got {}",
            self.learning_rate
        );
        anyhow::ensure!(self.max_step > 0.0, "max step must be positive, got {}", self.max_step);
        anyhow::ensure!(
            self.weight_floor > 0.0 && self.weight_floor <= self.weight_cap,
            "weight floor {} must be positive and not above the cap {}",
            self.weight_floor,
            self.weight_cap
        );
        anyhow::ensure!(self.target_scale > 0.0, "target scale must be positive");
        anyhow::ensure!(self.min_delta >= 0.0, "min delta must not be negative");
        anyhow::ensure!(self.learned_weight > 0.0, "learned weight must be positive");
        anyhow::ensure!(
            self.learned_weight <= self.weight_cap,
            "learned weight {} must not exceed the cap {}",
            self.learned_weight,
            self.weight_cap
        );
        anyhow::ensure!(self.min_feedback_frequency >= 1, "min feedback frequency must be at least 1");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Plan
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightUpdate {
    pub keyword_id: Uuid,
    pub keyword: String,
    pub old_weight: f64,
    pub new_weight: f64,
    pub positive_hits: usize,
    pub negative_hits: usize,
}

impl WeightUpdate {
    pub fn delta(&self) -> f64 {
        self.new_weight - self.old_weight
    }
}

/// Proposed batch of changes plus the statistics it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainPlan {
    pub weight_updates: Vec<WeightUpdate>,
    pub new_keywords: Vec<String>,
    pub positive_jobs_count: usize,
    /// Not-interested jobs scored at or above the threshold: the ones used as negatives.
    pub ignored_jobs_count: usize,
    pub not_interested_count: usize,
    pub total_feedbacks_analyzed: usize,
    base_revision: u64,
    learned_weight: f64,
}

impl RetrainPlan {
    pub fn base_revision(&self) -> u64 {
        self.base_revision
    }

    pub fn is_empty(&self) -> bool {
        self.weight_updates.is_empty() && self.new_keywords.is_empty()
    }

    /// Applies every update and addition, or none of them.
    /// Fails with `StaleSnapshot` if the store changed after planning.
    pub fn commit(&self, store: &mut KeywordStore) -> EngineResult<()> {
        if store.revision() != self.base_revision {
            return Err(EngineError::StaleSnapshot {
                planned: self.base_revision,
                current: store.revision(),
            });
        }

        let mut staged = store.clone();
        for update in &self.weight_updates {
            staged.set_weight(update.keyword_id, update.new_weight)?;
        }
        for text in &self.new_keywords {
            staged.add(
                text,
                Category::Boost,
                Some(self.learned_weight),
                KeywordSource::Learned,
            )?;
        }
        *store = staged;

        tracing::info!(
            weight_updates = self.weight_updates.len(),
            new_keywords = self.new_keywords.len(),
            revision = store.revision(),
            "committed retrain plan"
        );
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Planning
// ────────────────────────────────────────────────────────────────────────────

pub fn retrain(
    applications: &[Application],
    feedbacks: &[Feedback],
    store: &KeywordStore,
    config: &RetrainConfig,
) -> RetrainPlan {
    let positives: Vec<&Application> = applications
        .iter()
        .filter(|a| a.status.is_positive())
        .collect();
    let not_interested: Vec<&Application> = applications
        .iter()
        .filter(|a| a.status == ApplicationStatus::NotInterested)
        .collect();
    let negatives: Vec<&Application> = not_interested
        .iter()
        .copied()
        .filter(|a| {
            a.recorded_score
                .is_some_and(|score| score >= config.score_threshold)
        })
        .collect();

    let boosts = store.list_by_category(Category::Boost);
    let matcher = KeywordMatcher::new(&boosts);
    let positive_hits = count_job_hits(&matcher, positives.iter().copied());
    let negative_hits = count_job_hits(&matcher, negatives.iter().copied());

    let weight_updates: Vec<WeightUpdate> = boosts
        .iter()
        .zip(positive_hits.iter().zip(negative_hits.iter()))
        .filter_map(|(kw, (&p, &n))| propose_weight(kw, p, n, config))
        .collect();

    let new_keywords = mine_feedback_terms(
        feedbacks,
        store,
        config.min_feedback_frequency,
        config.max_new_keywords,
    )
    .into_iter()
    .map(|t| t.text)
    .collect();

    RetrainPlan {
        weight_updates,
        new_keywords,
        positive_jobs_count: positives.len(),
        ignored_jobs_count: negatives.len(),
        not_interested_count: not_interested.len(),
        total_feedbacks_analyzed: feedbacks.len(),
        base_revision: store.revision(),
        learned_weight: config.learned_weight,
    }
}

fn propose_weight(
    keyword: &Keyword,
    positive_hits: usize,
    negative_hits: usize,
    config: &RetrainConfig,
) -> Option<WeightUpdate> {
    let total = positive_hits + negative_hits;
    if total == 0 {
        return None;
    }

    let ratio = positive_hits as f64 / total as f64;
    let target = ratio * config.target_scale;
    let delta = (config.learning_rate * (target - keyword.weight)).clamp(-config.max_step, config.max_step);
    let lower = config.weight_floor.min(keyword.weight);
    let upper = config.weight_cap.max(keyword.weight);
    let new_weight = (keyword.weight + delta).clamp(lower, upper);

    if (new_weight - keyword.weight).abs() < config.min_delta {
        return None;
    }

    Some(WeightUpdate {
        keyword_id: keyword.id,
        keyword: keyword.text.clone(),
        old_weight: keyword.weight,
        new_weight,
        positive_hits,
        negative_hits,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

use std::str::FromStr;

use anyhow::{Context, Result};

use crate::learning::retrain::RetrainConfig;

/// Engine configuration loaded from environment variables.
/// Every variable is optional; unset ones fall back to the built-in tuning.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub retrain: RetrainConfig,
    pub rust_log: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retrain: RetrainConfig::default(),
            rust_log: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RetrainConfig::default();
        let retrain = RetrainConfig {
            score_threshold: parse_or(&lookup, "JOBFIT_SCORE_THRESHOLD", defaults.score_threshold)?,
            learning_rate: parse_or(&lookup, "JOBFIT_LEARNING_RATE", defaults.learning_rate)?,
            target_scale: parse_or(&lookup, "JOBFIT_TARGET_SCALE", defaults.target_scale)?,
            max_step: parse_or(&lookup, "JOBFIT_MAX_STEP", defaults.max_step)?,
            weight_floor: parse_or(&lookup, "JOBFIT_WEIGHT_FLOOR", defaults.weight_floor)?,
            weight_cap: parse_or(&lookup, "JOBFIT_WEIGHT_CAP", defaults.weight_cap)?,
            min_delta: parse_or(&lookup, "JOBFIT_MIN_DELTA", defaults.min_delta)?,
            learned_weight: parse_or(&lookup, "JOBFIT_LEARNED_WEIGHT", defaults.learned_weight)?,
            min_feedback_frequency: parse_or(
                &lookup,
                "JOBFIT_MIN_FEEDBACK_FREQUENCY",
                defaults.min_feedback_frequency,
            )?,
            max_new_keywords: parse_or(&lookup, "JOBFIT_MAX_NEW_KEYWORDS", defaults.max_new_keywords)?,
        };
        retrain.validate().context("Invalid retrain tuning")?;

        Ok(EngineConfig {
            retrain,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Boost,
    Exclude,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Boost => "boost",
            Category::Exclude => "exclude",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a keyword came from. Provenance only, never read by scoring.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    #[default]
    Manual,
    Resume,
    Learned,
}

/// A tracked term. `text` is always stored normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Keyword {
    pub id: Uuid,
    pub text: String,
    pub category: Category,
    pub weight: f64,
    pub source: KeywordSource,
    pub created_at: DateTime<Utc>,
}

impl Keyword {
    pub fn is_boost(&self) -> bool {
        self.category == Category::Boost
    }
}

/// Lower-cases, trims and collapses internal whitespace.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

pub mod engine;
pub mod pipeline;

pub use engine::{JobScore, KeywordWeightScorer, RelevanceScorer};
pub use pipeline::{evaluate, evaluate_all, rank, RankedJob};

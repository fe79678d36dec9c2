//! jobfit: keyword-weighted job relevance scoring with adaptive weight learning.
//!
//! Jobs pass the hard filter gate first; admitted jobs are scored by summing the weights
//! of the user's boost keywords they mention. The analyzers and the retrain engine read
//! and write the same per-user keyword store.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod filtering;
pub mod keywords;
pub mod learning;
pub mod matching;
pub mod models;
pub mod scoring;
pub mod service;
pub mod telemetry;

pub use config::EngineConfig;
pub use errors::{EngineError, EngineResult};
pub use keywords::{KeywordChange, KeywordStore};
pub use models::filters::Filters;
pub use models::keyword::{Category, Keyword, KeywordSource};
pub use service::{InMemoryProfileRepository, ProfileRepository, ProfileSnapshot, RelevanceService};

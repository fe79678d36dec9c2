pub mod store;

pub use store::{KeywordChange, KeywordStore};

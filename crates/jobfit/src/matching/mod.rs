pub mod text_matcher;

pub use text_matcher::{contains_term, find_matches, first_match, CompiledTerm, KeywordMatcher};

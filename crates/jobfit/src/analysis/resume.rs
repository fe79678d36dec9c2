//! Resume keyword extraction. Turning the uploaded file into text happens upstream;
//! this only sees the extracted text.

use crate::analysis::jd_analyzer::find_skills;
use crate::analysis::lexicon::SkillLexicon;
use crate::errors::EngineResult;
use crate::keywords::KeywordStore;
use crate::models::keyword::{normalize_text, Category, Keyword, KeywordSource};

/// Lexicon terms present in the resume text that are not tracked in either category.
pub fn extract_resume_keywords(
    text: &str,
    store: &KeywordStore,
    lexicon: &dyn SkillLexicon,
) -> Vec<String> {
    find_skills(text, lexicon)
        .into_iter()
        .filter(|skill| !store.contains_text(skill))
        .collect()
}

/// Tracks the accepted terms as resume-sourced boosts. Terms already tracked in either
/// category are skipped, so running it again adds nothing.
pub fn apply_resume_keywords(store: &mut KeywordStore, terms: &[String]) -> EngineResult<Vec<Keyword>> {
    let mut added = Vec::new();
    for raw in terms {
        let term = normalize_text(raw);
        if term.is_empty() || store.contains_text(&term) {
            continue;
        }
        added.push(store.add(&term, Category::Boost, None, KeywordSource::Resume)?);
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::lexicon::StaticLexicon;

    const RESUME: &str = "Senior analyst. Built KPI dashboards in Power BI and Excel; \
                          automated reporting with Python and SQL. Agile delivery.";

    #[test]
    fn test_extracts_untracked_lexicon_terms() {
        let mut store = KeywordStore::new();
        store.add("sql", Category::Boost, None, KeywordSource::Manual).unwrap();
        store.add("excel", Category::Exclude, None, KeywordSource::Manual).unwrap();

        let found = extract_resume_keywords(RESUME, &store, &StaticLexicon::default());
        assert_eq!(found, vec!["agile", "kpi", "power bi", "python"]);
    }

    #[test]
    fn test_apply_marks_source_resume_and_is_idempotent() {
        let mut store = KeywordStore::new();
        let found = extract_resume_keywords(RESUME, &store, &StaticLexicon::default());

        let added = apply_resume_keywords(&mut store, &found).unwrap();
        assert_eq!(added.len(), found.len());
        assert!(added.iter().all(|k| k.source == KeywordSource::Resume && k.is_boost()));

        let again = apply_resume_keywords(&mut store, &found).unwrap();
        assert!(again.is_empty());
        assert!(extract_resume_keywords(RESUME, &store, &StaticLexicon::default()).is_empty());
    }

    #[test]
    fn test_empty_resume_extracts_nothing() {
        assert!(extract_resume_keywords("  ", &KeywordStore::new(), &StaticLexicon::default()).is_empty());
    }
}

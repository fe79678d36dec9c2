//! Keyword suggestions offered right after the user acts on a job. Nothing here mutates
//! the store; the user picks which suggestions to keep.

use crate::analysis::jd_analyzer::find_skills;
use crate::analysis::lexicon::SkillLexicon;
use crate::keywords::KeywordStore;
use crate::learning::mining::extract_phrases;
use crate::models::job::Job;

/// Boost candidates after an application: lexicon skills in the job that are untracked.
pub fn suggest_from_application(
    job: &Job,
    store: &KeywordStore,
    lexicon: &dyn SkillLexicon,
) -> Vec<String> {
    let suggestions: Vec<String> = find_skills(&job.searchable_text(), lexicon)
        .into_iter()
        .filter(|skill| !store.contains_text(skill))
        .collect();
    tracing::debug!(job_id = %job.id, count = suggestions.len(), "boost suggestions from application");
    suggestions
}

/// Exclude candidates after a dismissal: meaningful words and phrases from the notes.
pub fn suggest_from_dismissal(notes: &str, store: &KeywordStore) -> Vec<String> {
    extract_phrases(notes)
        .into_iter()
        .filter(|phrase| !store.contains_text(phrase))
        .collect()
}

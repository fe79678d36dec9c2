//! Keyword evidence drawn from a user's application history.

use crate::matching::KeywordMatcher;
use crate::models::application::Application;

/// Per compiled keyword, in matcher order: how many of `applications` have a job mentioning it.
pub fn count_job_hits<'a, I>(matcher: &KeywordMatcher, applications: I) -> Vec<usize>
where
    I: IntoIterator<Item = &'a Application>,
{
    matcher.hit_counts(applications.into_iter().map(|app| app.job.searchable_text()))
}

//! Keyword performance report for the analytics view.

use serde::{Deserialize, Serialize};

use crate::keywords::KeywordStore;
use crate::learning::evidence::count_job_hits;
use crate::matching::KeywordMatcher;
use crate::models::application::Application;
use crate::models::keyword::{Category, KeywordSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordInsight {
    pub keyword: String,
    pub weight: f64,
    pub source: KeywordSource,
    /// Applied/interview/offer jobs mentioning the keyword.
    pub applied_job_hits: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    /// Boost keywords, heaviest first.
    pub keyword_stats: Vec<KeywordInsight>,
    pub total_jobs: usize,
    pub total_applications: usize,
    pub total_feedbacks: usize,
    /// Applications per hundred jobs seen, one decimal.
    pub application_rate: f64,
}

pub fn keyword_insights(
    store: &KeywordStore,
    applications: &[Application],
    total_jobs: usize,
    total_feedbacks: usize,
) -> Insights {
    let boosts = store.list_by_category(Category::Boost);
    let hits = count_job_hits(
        &KeywordMatcher::new(&boosts),
        applications.iter().filter(|a| a.status.is_positive()),
    );

    let mut keyword_stats: Vec<KeywordInsight> = boosts
        .into_iter()
        .zip(hits)
        .map(|(kw, applied_job_hits)| KeywordInsight {
            keyword: kw.text,
            weight: kw.weight,
            source: kw.source,
            applied_job_hits,
        })
        .collect();
    keyword_stats.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });

    let application_rate = if total_jobs > 0 {
        (applications.len() as f64 / total_jobs as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    Insights {
        keyword_stats,
        total_jobs,
        total_applications: applications.len(),
        total_feedbacks,
        application_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;
    use crate::models::job::Job;

    #[test]
    fn test_insights_count_hits_in_positive_jobs_only() {
        let mut store = KeywordStore::new();
        store.add("python", Category::Boost, Some(2.0), KeywordSource::Manual).unwrap();
        store.add("sql", Category::Boost, Some(1.0), KeywordSource::Resume).unwrap();
        store.add("unpaid", Category::Exclude, None, KeywordSource::Manual).unwrap();

        let apps = vec![
            Application::new(Job::new("Analyst", "Python and SQL"), ApplicationStatus::Applied),
            Application::new(Job::new("Analyst", "Python"), ApplicationStatus::Interview),
            Application::new(Job::new("Analyst", "SQL"), ApplicationStatus::NotInterested),
        ];

        let insights = keyword_insights(&store, &apps, 7, 2);
        assert_eq!(insights.keyword_stats.len(), 2);
        assert_eq!(insights.keyword_stats[0].keyword, "python");
        assert_eq!(insights.keyword_stats[0].applied_job_hits, 2);
        assert_eq!(insights.keyword_stats[1].applied_job_hits, 1);
        assert_eq!(insights.keyword_stats[1].source, KeywordSource::Resume);
        assert_eq!(insights.total_applications, 3);
        assert_eq!(insights.total_feedbacks, 2);
        assert!((insights.application_rate - 42.9).abs() < 1e-9);
    }

    #[test]
    fn test_application_rate_without_jobs() {
        let insights = keyword_insights(&KeywordStore::new(), &[], 0, 0);
        assert_eq!(insights.application_rate, 0.0);
        assert!(insights.keyword_stats.is_empty());
    }
}

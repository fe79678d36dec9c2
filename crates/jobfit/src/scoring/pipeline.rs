//! Evaluation pipeline: filter gate first, then the scorer for admitted jobs only.

use serde::{Deserialize, Serialize};

use crate::filtering::{admit, GateVerdict};
use crate::keywords::KeywordStore;
use crate::models::filters::Filters;
use crate::models::job::{Job, JobEvaluation};
use crate::scoring::engine::{JobScore, RelevanceScorer};

/// An admitted job with its score, as shown in the default listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedJob {
    pub job: Job,
    pub score: JobScore,
}

/// Gates then scores one job. A rejected job is never scored.
pub fn evaluate(
    job: &Job,
    filters: &Filters,
    store: &KeywordStore,
    scorer: &dyn RelevanceScorer,
) -> JobEvaluation {
    let verdict = admit(job, filters);
    let score = verdict
        .admitted
        .then(|| scorer.score(job, store, verdict.experience_ok));

    JobEvaluation {
        job_id: job.id,
        verdict,
        score,
    }
}

/// Re-evaluates every job with the current weights, rejected ones included.
/// Admitted jobs are scored as one batch against `store`.
pub fn evaluate_all(
    jobs: &[Job],
    filters: &Filters,
    store: &KeywordStore,
    scorer: &dyn RelevanceScorer,
) -> Vec<JobEvaluation> {
    let verdicts: Vec<GateVerdict> = jobs.iter().map(|job| admit(job, filters)).collect();
    let admitted: Vec<(&Job, bool)> = jobs
        .iter()
        .zip(&verdicts)
        .filter(|(_, verdict)| verdict.admitted)
        .map(|(job, verdict)| (job, verdict.experience_ok))
        .collect();
    let mut scores = scorer.score_batch(&admitted, store).into_iter();

    jobs.iter()
        .zip(verdicts)
        .map(|(job, verdict)| {
            let score = if verdict.admitted { scores.next() } else { None };
            JobEvaluation {
                job_id: job.id,
                verdict,
                score,
            }
        })
        .collect()
}

/// The default result set: admitted jobs only, best score first, ties by title.
pub fn rank(
    jobs: &[Job],
    filters: &Filters,
    store: &KeywordStore,
    scorer: &dyn RelevanceScorer,
) -> Vec<RankedJob> {
    let mut ranked: Vec<RankedJob> = jobs
        .iter()
        .zip(evaluate_all(jobs, filters, store, scorer))
        .filter_map(|(job, evaluation)| {
            evaluation.score.map(|score| RankedJob {
                job: job.clone(),
                score,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .match_score
            .partial_cmp(&a.score.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.job.title.cmp(&b.job.title))
    });

    tracing::debug!(
        total = jobs.len(),
        admitted = ranked.len(),
        "ranked job batch"
    );
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::FilterReason;
    use crate::models::keyword::{Category, KeywordSource};
    use crate::scoring::engine::KeywordWeightScorer;
    use std::sync::Mutex;

    fn store() -> KeywordStore {
        let mut store = KeywordStore::new();
        store
            .add("python", Category::Boost, Some(1.0), KeywordSource::Manual)
            .unwrap();
        store
            .add("sql", Category::Boost, Some(0.5), KeywordSource::Manual)
            .unwrap();
        store
            .add("unpaid", Category::Exclude, None, KeywordSource::Manual)
            .unwrap();
        store
    }

    #[test]
    fn test_rejected_job_is_never_scored() {
        let filters = Filters {
            contract_keywords: vec!["internship".to_string()],
            ..Default::default()
        };
        let job = Job::new("Data Analyst", "Use Python and SQL daily. Unpaid internship.");
        let evaluation = evaluate(&job, &filters, &store(), &KeywordWeightScorer);
        assert!(!evaluation.is_admitted());
        assert!(evaluation.score.is_none());
        assert_eq!(evaluation.match_score(), 0.0);
        assert!(matches!(
            evaluation.verdict.reason,
            Some(FilterReason::ContractRole { .. })
        ));
    }

    #[test]
    fn test_admitted_job_with_empty_filters_is_scored() {
        let job = Job::new("Data Analyst", "Use Python and SQL daily. Unpaid internship.");
        let evaluation = evaluate(&job, &Filters::default(), &store(), &KeywordWeightScorer);
        assert!(evaluation.is_admitted());
        assert!((evaluation.match_score() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_experience_warning_flows_into_score() {
        let filters = Filters {
            max_experience_years: Some(3),
            ..Default::default()
        };
        let mut job = Job::new("Analyst", "Python");
        job.experience_years_required = Some(6);
        let evaluation = evaluate(&job, &filters, &store(), &KeywordWeightScorer);
        assert!(evaluation.is_admitted());
        assert!(!evaluation.score.unwrap().experience_ok);
    }

    #[test]
    fn test_rank_drops_rejected_and_sorts_by_score() {
        let filters = Filters {
            title_exclude_seniority: vec!["director".to_string()],
            ..Default::default()
        };
        let jobs = vec![
            Job::new("B Analyst", "SQL"),
            Job::new("Director of Data", "Python SQL"),
            Job::new("A Analyst", "Python and SQL"),
            Job::new("C Analyst", "SQL"),
        ];
        let ranked = rank(&jobs, &filters, &store(), &KeywordWeightScorer);
        let titles: Vec<&str> = ranked.iter().map(|r| r.job.title.as_str()).collect();
        assert_eq!(titles, vec!["A Analyst", "B Analyst", "C Analyst"]);
    }

    #[test]
    fn test_evaluate_all_keeps_rejected_jobs() {
        let filters = Filters {
            title_must_contain: vec!["analyst".to_string()],
            ..Default::default()
        };
        let jobs = vec![Job::new("Analyst", ""), Job::new("Engineer", "")];
        let all = evaluate_all(&jobs, &filters, &store(), &KeywordWeightScorer);
        assert_eq!(all.len(), 2);
        assert!(all[0].is_admitted());
        assert!(!all[1].is_admitted());
    }

    /// Records how it was called and delegates to the keyword scorer.
    #[derive(Default)]
    struct RecordingScorer {
        batches: Mutex<Vec<usize>>,
    }

    impl RelevanceScorer for RecordingScorer {
        fn score(&self, job: &Job, store: &KeywordStore, experience_ok: bool) -> JobScore {
            KeywordWeightScorer.score(job, store, experience_ok)
        }

        fn score_batch(&self, jobs: &[(&Job, bool)], store: &KeywordStore) -> Vec<JobScore> {
            self.batches.lock().unwrap().push(jobs.len());
            KeywordWeightScorer.score_batch(jobs, store)
        }
    }

    #[test]
    fn test_rank_scores_admitted_jobs_in_one_batch() {
        let filters = Filters {
            title_exclude_seniority: vec!["director".to_string()],
            ..Default::default()
        };
        let jobs = vec![
            Job::new("B Analyst", "SQL"),
            Job::new("Director of Data", "Python SQL"),
            Job::new("A Analyst", "Python and SQL"),
        ];
        let scorer = RecordingScorer::default();

        let ranked = rank(&jobs, &filters, &store(), &scorer);
        assert_eq!(ranked.len(), 2);
        assert_eq!(*scorer.batches.lock().unwrap(), vec![2]);
        assert!((ranked[0].score.match_score - 1.5).abs() < f64::EPSILON);
        assert_eq!(ranked[1].score.match_tags, vec!["sql"]);
    }
}

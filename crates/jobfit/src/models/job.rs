use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filtering::facts::{infer_experience_years, parse_salary};

/// A job listing as produced by an external fetcher. Read-only to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Annual salary, when known.
    pub salary: Option<f64>,
    pub experience_years_required: Option<u32>,
    pub source: String,
    pub company: Option<String>,
    pub location: Option<String>,
    /// Free-text salary as published by the source, e.g. "£40,000 - £50,000".
    pub salary_text: Option<String>,
}

impl Job {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Title and description joined the way every matcher sees them.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    /// Fills `salary` and `experience_years_required` from the raw text when the source
    /// left them unset. Fields that are already known are never overwritten.
    pub fn with_inferred_facts(mut self) -> Self {
        if self.salary.is_none() {
            let salary_source = match &self.salary_text {
                Some(raw) => format!("{raw} {}", self.description),
                None => self.description.clone(),
            };
            self.salary = parse_salary(&salary_source);
        }
        if self.experience_years_required.is_none() {
            self.experience_years_required = infer_experience_years(&self.searchable_text());
        }
        self
    }
}

/// Everything the engine derives for a job: verdict, score, tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEvaluation {
    pub job_id: Uuid,
    pub verdict: crate::filtering::gate::GateVerdict,
    /// `None` when the gate rejected the job; scoring never runs for rejected jobs.
    pub score: Option<crate::scoring::engine::JobScore>,
}

impl JobEvaluation {
    pub fn is_admitted(&self) -> bool {
        self.verdict.admitted
    }

    pub fn match_score(&self) -> f64 {
        self.score.as_ref().map(|s| s.match_score).unwrap_or(0.0)
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job::Job;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Interested,
    Applied,
    Interview,
    Offer,
    Rejected,
    NotInterested,
}

impl ApplicationStatus {
    /// The user acted on the job.
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Applied | ApplicationStatus::Interview | ApplicationStatus::Offer
        )
    }
}

/// A job moving through the user's pipeline, with the score it was last shown at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub job: Job,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub recorded_score: Option<f64>,
}

impl Application {
    pub fn new(job: Job, status: ApplicationStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            job,
            status,
            notes: None,
            recorded_score: None,
        }
    }

    pub fn with_recorded_score(mut self, score: f64) -> Self {
        self.recorded_score = Some(score);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    WhyApplied,
    InterviewNotes,
    #[default]
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub application_id: Uuid,
    pub feedback_type: FeedbackType,
    pub feedback_text: String,
    pub keywords_mentioned: Vec<String>,
}

impl Feedback {
    pub fn new(application_id: Uuid, feedback_type: FeedbackType, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            application_id,
            feedback_type,
            feedback_text: text.into(),
            keywords_mentioned: Vec::new(),
        }
    }

    pub fn mentioning(mut self, keywords: &[&str]) -> Self {
        self.keywords_mentioned = keywords.iter().map(|k| k.to_string()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_statuses() {
        assert!(ApplicationStatus::Applied.is_positive());
        assert!(ApplicationStatus::Interview.is_positive());
        assert!(ApplicationStatus::Offer.is_positive());
        assert!(!ApplicationStatus::Interested.is_positive());
        assert!(!ApplicationStatus::Rejected.is_positive());
        assert!(!ApplicationStatus::NotInterested.is_positive());
    }

    #[test]
    fn test_status_serde() {
        let status: ApplicationStatus = serde_json::from_str(r#""not_interested""#).unwrap();
        assert_eq!(status, ApplicationStatus::NotInterested);
        let fb: FeedbackType = serde_json::from_str(r#""interview_notes""#).unwrap();
        assert_eq!(fb, FeedbackType::InterviewNotes);
    }
}

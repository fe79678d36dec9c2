//! Filter Gate: hard admit/reject rules evaluated before any scoring.
//!
//! Rules run in a fixed order and the first failure is the reported reason:
//! 1. title must contain one of `title_must_contain`
//! 2. title must not contain any `title_exclude_*` term
//! 3. title/description must not look like a contract role
//! 4. description must not require an excluded language (English/Chinese override it)
//! 5. a known salary must reach `min_salary`
//! 6. a known experience requirement above `max_experience_years` only clears `experience_ok`

use serde::{Deserialize, Serialize};

use crate::filtering::facts::mentions_fixed_duration;
use crate::matching::{contains_term, first_match};
use crate::models::filters::Filters;
use crate::models::job::Job;

/// Languages whose presence forgives an excluded-language mention.
const ALLOWED_LANGUAGES: &[&str] = &["english", "chinese", "mandarin", "cantonese"];

/// Which `title_exclude_*` list rejected a title.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TitleExclusion {
    Roles,
    Seniority,
    Junior,
    AnalystPrefixes,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FilterReason {
    TitleMismatch,
    TitleExcluded { list: TitleExclusion, term: String },
    /// `term` is `None` when a fixed-duration phrasing, not a listed keyword, matched.
    ContractRole { term: Option<String> },
    LanguageRequirement { language: String },
    SalaryTooLow { salary: f64, min_salary: f64 },
}

impl FilterReason {
    /// Short human-readable label for the UI's rejected-job badge.
    pub fn label(&self) -> String {
        match self {
            FilterReason::TitleMismatch => "title does not match target roles".to_string(),
            FilterReason::TitleExcluded { term, .. } => format!("excluded title term '{term}'"),
            FilterReason::ContractRole { term: Some(term) } => format!("contract role ('{term}')"),
            FilterReason::ContractRole { term: None } => "contract role (fixed duration)".to_string(),
            FilterReason::LanguageRequirement { language } => {
                format!("requires {language}")
            }
            FilterReason::SalaryTooLow { min_salary, .. } => {
                format!("salary below {min_salary:.0}")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateVerdict {
    pub admitted: bool,
    pub reason: Option<FilterReason>,
    /// Soft warning: false when the job asks for more experience than the ceiling.
    pub experience_ok: bool,
}

impl GateVerdict {
    fn admit(experience_ok: bool) -> Self {
        Self {
            admitted: true,
            reason: None,
            experience_ok,
        }
    }

    fn reject(reason: FilterReason) -> Self {
        Self {
            admitted: false,
            reason: Some(reason),
            experience_ok: true,
        }
    }
}

/// Runs every rule against `job`. Never fails; an empty `Filters` admits everything.
pub fn admit(job: &Job, filters: &Filters) -> GateVerdict {
    let verdict = match first_rejection(job, filters) {
        Some(reason) => GateVerdict::reject(reason),
        None => GateVerdict::admit(experience_within_ceiling(job, filters)),
    };

    if let Some(reason) = &verdict.reason {
        tracing::debug!(job_id = %job.id, title = %job.title, ?reason, "job rejected by filter gate");
    }
    verdict
}

fn first_rejection(job: &Job, filters: &Filters) -> Option<FilterReason> {
    let title = job.title.as_str();

    if !filters.title_must_contain.is_empty()
        && first_match(title, &filters.title_must_contain).is_none()
    {
        return Some(FilterReason::TitleMismatch);
    }

    let exclusion_lists = [
        (TitleExclusion::Roles, &filters.title_exclude_roles),
        (TitleExclusion::Seniority, &filters.title_exclude_seniority),
        (TitleExclusion::Junior, &filters.title_exclude_junior),
        (TitleExclusion::AnalystPrefixes, &filters.title_exclude_analyst_prefixes),
        (TitleExclusion::Other, &filters.title_exclude_other),
    ];
    for (list, terms) in exclusion_lists {
        if let Some(term) = first_match(title, terms) {
            return Some(FilterReason::TitleExcluded {
                list,
                term: term.to_string(),
            });
        }
    }

    if let Some(reason) = contract_rejection(job, filters) {
        return Some(reason);
    }

    if let Some(language) = first_match(&job.description, &filters.language_exclude) {
        let forgiven = ALLOWED_LANGUAGES
            .iter()
            .any(|allowed| contains_term(&job.description, allowed));
        if !forgiven {
            return Some(FilterReason::LanguageRequirement {
                language: language.to_string(),
            });
        }
    }

    if let (Some(min_salary), Some(salary)) = (filters.min_salary, job.salary) {
        if salary < min_salary {
            return Some(FilterReason::SalaryTooLow { salary, min_salary });
        }
    }

    None
}

fn contract_rejection(job: &Job, filters: &Filters) -> Option<FilterReason> {
    if filters.contract_keywords.is_empty() {
        return None;
    }

    let term = first_match(&job.title, &filters.contract_keywords)
        .or_else(|| first_match(&job.description, &filters.contract_keywords));
    if let Some(term) = term {
        return Some(FilterReason::ContractRole {
            term: Some(term.to_string()),
        });
    }

    if mentions_fixed_duration(&job.title) || mentions_fixed_duration(&job.description) {
        return Some(FilterReason::ContractRole { term: None });
    }
    None
}

fn experience_within_ceiling(job: &Job, filters: &Filters) -> bool {
    match (filters.max_experience_years, job.experience_years_required) {
        (Some(ceiling), Some(required)) => required <= ceiling,
        _ => true,
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::keyword::normalize_text;

/// Per-user hard filter configuration. Every list entry is normalized; an empty list
/// disables its rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub min_salary: Option<f64>,
    pub max_experience_years: Option<u32>,
    pub title_must_contain: Vec<String>,
    pub title_exclude_roles: Vec<String>,
    pub title_exclude_seniority: Vec<String>,
    pub title_exclude_junior: Vec<String>,
    pub title_exclude_analyst_prefixes: Vec<String>,
    pub title_exclude_other: Vec<String>,
    pub contract_keywords: Vec<String>,
    pub language_exclude: Vec<String>,
}

impl Filters {
    /// The settings a new user starts from: analyst / product manager roles,
    /// no contract work, English or Chinese speaking, £45k floor, five years at most.
    pub fn recommended() -> Self {
        Self {
            min_salary: Some(45_000.0),
            max_experience_years: Some(5),
            title_must_contain: owned(&["analyst", "product manager"]),
            title_exclude_roles: owned(&[
                "scientist",
                "data scientist",
                "research scientist",
                "engineer",
                "software engineer",
                "backend engineer",
                "frontend engineer",
                "devops engineer",
                "qa engineer",
                "test engineer",
                "c++ developer",
                "java developer",
                "ios developer",
                "android developer",
                "accountant",
                "solicitor",
                "nurse",
                "warehouse",
                "driver",
            ]),
            title_exclude_seniority: owned(&[
                "director",
                "vp",
                "vice president",
                "head of",
                "chief",
                "principal",
                "staff",
                "distinguished",
                "partner",
            ]),
            title_exclude_junior: owned(&[
                "intern",
                "internship",
                "graduate programme",
                "graduate program",
                "graduate scheme",
                "entry level trainee",
                "apprentice",
                "apprenticeship",
                "placement year",
            ]),
            title_exclude_analyst_prefixes: owned(&[
                "associate analyst",
                "junior analyst",
                "intern analyst",
                "associate data analyst",
                "junior data analyst",
                "associate product analyst",
                "junior product analyst",
                "associate business analyst",
                "junior business analyst",
                "associate insight analyst",
                "junior insight analyst",
            ]),
            title_exclude_other: owned(&[
                "it analyst",
                "summer",
                "job guarantee",
                "bootcamp",
                "training programme",
                "course",
            ]),
            contract_keywords: owned(&[
                "contract",
                "contractor",
                "freelance",
                "freelancer",
                "fixed term",
                "fixed-term",
                "temporary",
                "ftc",
                "month ftc",
                "month contract",
                "maternity cover",
                "paternity cover",
                "interim",
                "inside ir35",
                "outside ir35",
                "day rate",
                "ir35",
            ]),
            language_exclude: owned(&[
                "french",
                "german",
                "spanish",
                "italian",
                "portuguese",
                "dutch",
                "japanese",
                "korean",
                "arabic",
                "russian",
                "turkish",
                "polish",
                "hindi",
                "swedish",
                "norwegian",
                "danish",
                "finnish",
                "greek",
                "hebrew",
                "czech",
                "hungarian",
                "romanian",
                "thai",
                "vietnamese",
            ]),
        }
    }

    /// Parses filter settings as persisted by the storage layer, normalizing every list.
    pub fn from_json(raw: &str) -> Result<Self> {
        let filters: Filters =
            serde_json::from_str(raw).context("filter settings are not valid JSON")?;
        Ok(filters.normalized())
    }

    /// Normalizes and de-duplicates every list, dropping blank entries.
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.title_must_contain,
            &mut self.title_exclude_roles,
            &mut self.title_exclude_seniority,
            &mut self.title_exclude_junior,
            &mut self.title_exclude_analyst_prefixes,
            &mut self.title_exclude_other,
            &mut self.contract_keywords,
            &mut self.language_exclude,
        ] {
            normalize_list(list);
        }
        self.min_salary = self.min_salary.filter(|s| s.is_finite() && *s > 0.0);
        self
    }
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

fn normalize_list(list: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    let normalized: Vec<String> = list
        .iter()
        .map(|t| normalize_text(t))
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect();
    *list = normalized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_disables_every_rule() {
        let f = Filters::default();
        assert!(f.min_salary.is_none());
        assert!(f.title_must_contain.is_empty());
        assert!(f.language_exclude.is_empty());
    }

    #[test]
    fn test_recommended_lists_are_already_normalized() {
        let f = Filters::recommended();
        assert_eq!(f.clone().normalized(), f);
    }

    #[test]
    fn test_from_json_normalizes_and_dedupes() {
        let raw = r#"{
            "min_salary": 40000,
            "contract_keywords": ["FTC", "ftc", "  Fixed   Term ", ""]
        }"#;
        let f = Filters::from_json(raw).unwrap();
        assert_eq!(f.min_salary, Some(40_000.0));
        assert_eq!(f.contract_keywords, vec!["ftc", "fixed term"]);
        assert!(f.title_exclude_roles.is_empty());
    }

    #[test]
    fn test_from_json_drops_non_positive_salary_floor() {
        let f = Filters::from_json(r#"{"min_salary": 0}"#).unwrap();
        assert!(f.min_salary.is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Filters::from_json("not json").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}

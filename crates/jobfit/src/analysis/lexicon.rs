//! Skill lexicon: the dictionary of terms the analyzer and resume extractor look for.

use crate::models::keyword::normalize_text;

/// Implement this to plug a different skill dictionary into the analyzers.
pub trait SkillLexicon: Send + Sync {
    /// Normalized, de-duplicated terms.
    fn terms(&self) -> &[String];
}

const TECH_SKILLS: &[&str] = &[
    "python",
    "sql",
    "r",
    "java",
    "javascript",
    "typescript",
    "c++",
    "scala",
    "tableau",
    "power bi",
    "excel",
    "alteryx",
    "looker",
    "qlik",
    "tensorflow",
    "pytorch",
    "scikit-learn",
    "pandas",
    "numpy",
    "spark",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "git",
    "jira",
    "confluence",
    "figma",
    "miro",
];

const DOMAIN_SKILLS: &[&str] = &[
    "product analytics",
    "data analysis",
    "machine learning",
    "deep learning",
    "natural language processing",
    "nlp",
    "computer vision",
    "a/b testing",
    "user research",
    "kpi",
    "okr",
    "agile",
    "scrum",
    "kanban",
    "data-driven",
    "cross-functional",
    "go-to-market",
    "stakeholder management",
    "product management",
    "product strategy",
    "roadmap",
    "backlog",
    "genai",
    "generative ai",
    "llm",
    "large language model",
    "agentic",
    "artificial intelligence",
    "ai",
    "gpt",
];

/// An in-memory lexicon. `Default` carries the built-in tech and domain skills.
#[derive(Debug, Clone)]
pub struct StaticLexicon {
    terms: Vec<String>,
}

impl StaticLexicon {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|t| normalize_text(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        terms.sort();
        terms.dedup();
        Self { terms }
    }

    /// Extends the lexicon with extra terms.
    pub fn with_terms<I, S>(self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let combined: Vec<String> = self
            .terms
            .into_iter()
            .chain(extra.into_iter().map(|t| t.as_ref().to_string()))
            .collect();
        Self::new(combined)
    }
}

impl Default for StaticLexicon {
    fn default() -> Self {
        Self::new(TECH_SKILLS.iter().chain(DOMAIN_SKILLS.iter()))
    }
}

impl SkillLexicon for StaticLexicon {
    fn terms(&self) -> &[String] {
        &self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_merges_both_dictionaries() {
        let lexicon = StaticLexicon::default();
        assert_eq!(lexicon.terms().len(), TECH_SKILLS.len() + DOMAIN_SKILLS.len());
        assert!(lexicon.terms().iter().any(|t| t == "power bi"));
        assert!(lexicon.terms().iter().any(|t| t == "stakeholder management"));
    }

    #[test]
    fn test_new_normalizes_and_dedupes() {
        let lexicon = StaticLexicon::new(["Go", " go ", "", "Power   BI"]);
        assert_eq!(lexicon.terms(), &["go".to_string(), "power bi".to_string()]);
    }

    #[test]
    fn test_with_terms_extends() {
        let lexicon = StaticLexicon::new(["sql"]).with_terms(["Rust", "sql"]);
        assert_eq!(lexicon.terms(), &["rust".to_string(), "sql".to_string()]);
    }
}

//! Fact inference: reads salary and experience requirements out of listing text when
//! the job source did not supply them as structured fields.

use std::sync::LazyLock;

use regex::Regex;

static SALARY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[£$€]\s*(\d[\d,]*(?:\.\d+)?)\s*([kK])?").expect("Valid salary regex")
});

static YEARS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:-\s*\d{1,2}\s*)?years?\b").expect("Valid years regex")
});

static DURATION_CONTRACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\d+[\s-]?months?\s*(?:contract|ftc|fixed)",
        r"(?i)duration[:\s]+\d+\s*months?",
        r"(?i)\d+[\s-]?months?\s*(?:role|position|assignment|placement|engagement)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Valid contract duration regex"))
    .collect()
});

/// Plausible annual salary range; amounts outside it are day rates or noise.
const MIN_ANNUAL: f64 = 15_000.0;
const MAX_ANNUAL: f64 = 500_000.0;

/// Experience figures above this are read as company age, not a requirement.
const MAX_PLAUSIBLE_YEARS: u32 = 40;

/// Highest plausible annual salary mentioned in `text`.
///
/// For ranges like "£24,000 - £35,000" this returns the top of the range, so a job is
/// only judged below a floor when even its ceiling is.
pub fn parse_salary(text: &str) -> Option<f64> {
    SALARY_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let mut value: f64 = caps.get(1)?.as_str().replace(',', "").parse().ok()?;
            if caps.get(2).is_some() {
                value *= 1_000.0;
            }
            (MIN_ANNUAL..=MAX_ANNUAL).contains(&value).then_some(value)
        })
        .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
}

/// Largest "N years" / "N+ years" / "N-M years" requirement in `text` (upper bound of a range).
pub fn infer_experience_years(text: &str) -> Option<u32> {
    YEARS_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?.as_str();
            // For "3-5 years" the requirement is the upper bound.
            let upper = whole
                .split(|c: char| !c.is_ascii_digit())
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse::<u32>().ok())
                .max()?;
            (upper <= MAX_PLAUSIBLE_YEARS).then_some(upper)
        })
        .max()
}

/// Fixed-duration phrasing that marks a contract role even without the word "contract".
pub fn mentions_fixed_duration(text: &str) -> bool {
    DURATION_CONTRACT_PATTERNS.iter().any(|p| p.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_range_takes_upper_bound() {
        assert_eq!(parse_salary("£24,000 - £35,000 per annum"), Some(35_000.0));
    }

    #[test]
    fn test_salary_k_suffix() {
        assert_eq!(parse_salary("Up to £55k + bonus"), Some(55_000.0));
        assert_eq!(parse_salary("$120K base"), Some(120_000.0));
    }

    #[test]
    fn test_salary_ignores_day_rates_and_missing_amounts() {
        assert_eq!(parse_salary("£450 per day"), None);
        assert_eq!(parse_salary("Competitive salary"), None);
    }

    #[test]
    fn test_experience_takes_largest_requirement() {
        assert_eq!(
            infer_experience_years("2+ years SQL, 6+ years stakeholder management"),
            Some(6)
        );
        assert_eq!(infer_experience_years("3-5 years in analytics"), Some(5));
        assert_eq!(infer_experience_years("1 year of Python"), Some(1));
    }

    #[test]
    fn test_experience_absent() {
        assert_eq!(infer_experience_years("No experience needed"), None);
        assert_eq!(infer_experience_years("Founded 120 years ago"), None);
    }

    #[test]
    fn test_fixed_duration_phrasings() {
        assert!(mentions_fixed_duration("This is a 6 month contract"));
        assert!(mentions_fixed_duration("Duration: 12 months"));
        assert!(mentions_fixed_duration("9-month assignment with our client"));
        assert!(!mentions_fixed_duration("Permanent role, 25 days holiday"));
    }
}

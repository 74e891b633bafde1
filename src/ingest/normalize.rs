//! Normalisation of scraped job listings into storable postings.
//!
//! Scraped cards carry free text only: a salary string, a description
//! snippet and a location. This module derives the structured salary bounds,
//! skill list and work arrangement from that text.

use crate::models::{NewJobPosting, HYBRID, ON_SITE, REMOTE};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Technical skills recognised in descriptions, in reporting order.
pub const TECH_SKILLS: &[&str] = &[
    "Python", "JavaScript", "Java", "C++", "C#", "React", "Angular", "Vue", "Node.js", "Django",
    "Flask", "FastAPI", "SQL", "PostgreSQL", "MySQL", "MongoDB", "Redis", "Docker", "Kubernetes",
    "AWS", "Azure", "GCP", "Git", "Linux", "REST API", "GraphQL", "HTML", "CSS", "TypeScript",
    "Machine Learning", "Data Science", "Pandas", "NumPy", "TensorFlow", "PyTorch",
    "Scikit-learn", "Agile", "Scrum", "CI/CD", "Jenkins",
];

const REMOTE_KEYWORDS: &[&str] = &["remote", "work from home", "wfh", "telecommute"];
const HYBRID_KEYWORDS: &[&str] = &["hybrid", "flexible", "part remote"];

const AMOUNT: &str = r"(\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\d+(?:\.\d{2})?)";

static SALARY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\${AMOUNT}[Kk]?\s*[-–]\s*\${AMOUNT}[Kk]?"))
        .expect("salary range pattern is valid")
});

static SALARY_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\${AMOUNT}[Kk]?")).expect("single salary pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// A listing as captured by a scraper, before normalisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Explicit work arrangement; derived from the text when absent.
    #[serde(default)]
    pub remote: Option<String>,
}

/// Salary bounds parsed from free text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSalary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Whitespace-collapsed original text.
    pub text: Option<String>,
}

/// Parse `"$60,000 - $80,000"`, `"$60K - $80K"` or `"$75,000"` style text.
///
/// A `k` anywhere in the text multiplies both bounds by 1000. A single amount
/// yields equal bounds; unparseable text keeps only the cleaned string.
pub fn parse_salary_text(text: Option<&str>) -> ParsedSalary {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return ParsedSalary {
            text: text.map(String::from),
            ..ParsedSalary::default()
        };
    };

    let cleaned = WHITESPACE.replace_all(text.trim(), " ").into_owned();
    let scale = if cleaned.to_lowercase().contains('k') {
        1000.0
    } else {
        1.0
    };
    let amount = |s: &str| s.replace(',', "").parse::<f64>().ok().map(|v| v * scale);

    let (min, max) = if let Some(caps) = SALARY_RANGE.captures(&cleaned) {
        (amount(&caps[1]), amount(&caps[2]))
    } else if let Some(caps) = SALARY_SINGLE.captures(&cleaned) {
        let value = amount(&caps[1]);
        (value, value)
    } else {
        (None, None)
    };

    ParsedSalary {
        min,
        max,
        text: Some(cleaned),
    }
}

/// Comma-separated list of known skills mentioned in `description`.
pub fn extract_skills(description: &str) -> String {
    let lowered = description.to_lowercase();
    TECH_SKILLS
        .iter()
        .filter(|skill| lowered.contains(&skill.to_lowercase()))
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classify the work arrangement from location and description keywords.
pub fn classify_remote(location: &str, description: &str) -> &'static str {
    let location = location.to_lowercase();
    let description = description.to_lowercase();
    let mentions = |keywords: &[&str]| {
        keywords
            .iter()
            .any(|k| location.contains(k) || description.contains(k))
    };

    if mentions(REMOTE_KEYWORDS) {
        REMOTE
    } else if mentions(HYBRID_KEYWORDS) {
        HYBRID
    } else {
        ON_SITE
    }
}

impl From<RawListing> for NewJobPosting {
    fn from(raw: RawListing) -> Self {
        let salary = parse_salary_text(raw.salary_text.as_deref());
        let location = raw.location.unwrap_or_else(|| "Unknown".to_string());
        let description = raw.description.unwrap_or_default();
        let remote = raw
            .remote
            .unwrap_or_else(|| classify_remote(&location, &description).to_string());
        let skills = extract_skills(&description);

        NewJobPosting {
            title: raw.title,
            company: raw.company.unwrap_or_else(|| "Unknown".to_string()),
            location,
            salary_min: salary.min,
            salary_max: salary.max,
            salary_text: salary.text,
            skills: Some(skills),
            description: Some(description),
            url: raw.url,
            remote: Some(remote),
            date_posted: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_salary_range() {
        let parsed = parse_salary_text(Some("$60,000 - $80,000 a year"));
        assert_eq!(parsed.min, Some(60000.0));
        assert_eq!(parsed.max, Some(80000.0));
        assert_eq!(parsed.text.as_deref(), Some("$60,000 - $80,000 a year"));
    }

    #[test]
    fn test_parse_salary_thousands_suffix() {
        let parsed = parse_salary_text(Some("  $60K –  $80K "));
        assert_eq!(parsed.min, Some(60000.0));
        assert_eq!(parsed.max, Some(80000.0));
        assert_eq!(parsed.text.as_deref(), Some("$60K – $80K"));
    }

    #[test]
    fn test_parse_single_salary() {
        let parsed = parse_salary_text(Some("From $75,000"));
        assert_eq!(parsed.min, Some(75000.0));
        assert_eq!(parsed.max, Some(75000.0));

        let parsed = parse_salary_text(Some("$95000"));
        assert_eq!(parsed.min, Some(95000.0));
    }

    #[test]
    fn test_parse_unrecognised_salary() {
        let parsed = parse_salary_text(Some("Competitive"));
        assert_eq!(parsed.min, None);
        assert_eq!(parsed.max, None);
        assert_eq!(parsed.text.as_deref(), Some("Competitive"));

        assert_eq!(parse_salary_text(None), ParsedSalary::default());
    }

    #[test]
    fn test_extract_skills_in_vocabulary_order() {
        let skills = extract_skills("We use docker, PYTHON and sql daily.");
        assert_eq!(skills, "Python, SQL, Docker");
        assert_eq!(extract_skills(""), "");
    }

    #[test]
    fn test_classify_remote() {
        assert_eq!(classify_remote("Remote", ""), REMOTE);
        assert_eq!(classify_remote("Boston, MA", "Work from home two days"), REMOTE);
        assert_eq!(classify_remote("Boston, MA", "Hybrid schedule"), HYBRID);
        assert_eq!(classify_remote("Boston, MA", "Office based"), ON_SITE);
    }

    #[test]
    fn test_raw_listing_into_posting() {
        let raw = RawListing {
            title: "Backend Developer".to_string(),
            company: None,
            location: Some("Austin, TX".to_string()),
            salary_text: Some("$90K - $110K".to_string()),
            description: Some("Flexible hours, Python and AWS.".to_string()),
            url: None,
            remote: None,
        };

        let posting = NewJobPosting::from(raw);

        assert_eq!(posting.company, "Unknown");
        assert_eq!(posting.salary_min, Some(90000.0));
        assert_eq!(posting.salary_max, Some(110000.0));
        assert_eq!(posting.skills.as_deref(), Some("Python, AWS"));
        assert_eq!(posting.remote.as_deref(), Some(HYBRID));
    }
}

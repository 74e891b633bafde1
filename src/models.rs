//! Data models for job postings and market analytics.
//!
//! This module contains the stored job record, the write-path shape used by
//! ingestion producers, and every structured result the analytics layer returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical `remote` label for fully remote jobs.
pub const REMOTE: &str = "Remote";
/// Canonical `remote` label for hybrid jobs.
pub const HYBRID: &str = "Hybrid";
/// Canonical `remote` label for on-site jobs.
pub const ON_SITE: &str = "On-site";

/// A job posting as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    /// Unique identifier assigned by the store.
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Lower salary bound.
    pub salary_min: Option<f64>,
    /// Upper salary bound.
    pub salary_max: Option<f64>,
    /// Original human-readable salary string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_text: Option<String>,
    /// Comma-separated skill tokens.
    pub skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// "Remote", "Hybrid", "On-site" by convention, but any string is accepted.
    pub remote: Option<String>,
    pub date_posted: DateTime<Utc>,
    pub date_scraped: DateTime<Utc>,
}

impl JobPosting {
    /// Returns the midpoint salary when both bounds are present.
    pub fn midpoint_salary(&self) -> Option<f64> {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some((min + max) / 2.0),
            _ => None,
        }
    }
}

/// A job posting produced by an ingestion producer, before the store assigns an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewJobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub salary_text: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub remote: Option<String>,
    /// Defaults to the insertion time when absent.
    #[serde(default)]
    pub date_posted: Option<DateTime<Utc>>,
}

/// Salary statistics over the midpoints of a filtered population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryInsights {
    /// Number of eligible jobs.
    pub count: usize,
    /// Mean midpoint, rounded to an integer.
    pub avg_salary: i64,
    pub min_salary: f64,
    pub max_salary: f64,
    /// Upper-middle element of the sorted midpoints.
    pub median_salary: f64,
}

/// Average salary for one exact location string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSalary {
    pub location: String,
    pub job_count: usize,
    pub avg_salary: i64,
}

/// Frequency and salary statistics for one skill token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillStat {
    pub skill: String,
    /// Number of occurrences across eligible jobs.
    pub job_count: usize,
    pub avg_salary: i64,
    /// Occurrences relative to the number of eligible jobs with skills, one decimal.
    pub percentage: f64,
}

/// Work-arrangement breakdown for one exact location string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInsight {
    pub location: String,
    pub total_jobs: usize,
    pub avg_salary: i64,
    pub remote_jobs: usize,
    pub hybrid_jobs: usize,
    pub remote_percentage: f64,
    pub hybrid_percentage: f64,
    /// Residual of 100 after remote and hybrid; not counted independently.
    pub onsite_percentage: f64,
}

/// Hiring volume and pay for one exact company string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInsight {
    pub company: String,
    pub job_count: usize,
    pub avg_salary: i64,
    /// `"$min - $max"` over midpoints, or `"N/A"`.
    pub salary_range: String,
}

/// Job share for one `remote` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTrend {
    /// Exact `remote` value; `None` groups jobs without one.
    #[serde(rename = "type")]
    pub remote_type: Option<String>,
    pub job_count: usize,
    /// Share of all stored jobs, eligible or not, one decimal.
    pub percentage: f64,
    pub avg_salary: i64,
}

/// Salary figures for one caller-supplied location filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryComparison {
    pub location: String,
    pub job_count: usize,
    pub avg_salary: i64,
    pub salary_range: String,
}

/// Pay of jobs mentioning a skill against jobs that don't.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillImpact {
    pub skill: String,
    pub average_salary: i64,
    pub market_average: i64,
    pub salary_difference: i64,
    pub percentage_increase: f64,
}

/// Cross-cutting snapshot of the whole market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub total_jobs: usize,
    pub avg_salary: i64,
    pub salary_range: String,
    pub top_skills: Vec<String>,
    pub highest_paying_location: String,
    pub remote_percentage: f64,
}

/// Everything the report generator renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketReport {
    pub metadata: ReportMetadata,
    pub summary: MarketSummary,
    pub top_skills: Vec<SkillStat>,
    pub salary_by_location: Vec<LocationSalary>,
    pub salary_comparison: Vec<SalaryComparison>,
    pub companies: Vec<CompanyInsight>,
    pub remote_trends: Vec<RemoteTrend>,
    pub location_insights: Vec<LocationInsight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_impact: Option<SkillImpact>,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Database the figures were computed from.
    pub database: String,
    pub generated_at: DateTime<Utc>,
    pub duration_seconds: f64,
}

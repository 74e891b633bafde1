//! Markdown and JSON market report generation.
//!
//! A report is computed from the store in a single read transaction and then
//! rendered from the resulting `MarketReport`, so both output formats always
//! describe the same snapshot.

use crate::analysis::stats::format_usd;
use crate::analysis::{
    company_insights, location_insights, market_summary, remote_work_trends, salary_by_location,
    salary_comparison, skill_salary_impact, top_skills,
};
use crate::config::ReportConfig;
use crate::models::{
    CompanyInsight, LocationInsight, LocationSalary, MarketReport, MarketSummary, RemoteTrend,
    ReportMetadata, SalaryComparison, SkillImpact, SkillStat,
};
use crate::store::JobStore;
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Compute every report section from one consistent snapshot of the store.
pub fn build_report(store: &JobStore, config: &ReportConfig) -> Result<MarketReport> {
    let start_time = Instant::now();

    let (
        summary,
        top_skills,
        mut salary_by_location,
        salary_comparison,
        companies,
        remote_trends,
        mut location_insights,
        skill_impact,
    ) = store
        .read(|jobs| {
            let skill_impact = match config.skill.as_deref() {
                Some(skill) => Some(skill_salary_impact(jobs, skill)?),
                None => None,
            };
            Ok((
                market_summary(jobs)?,
                top_skills(jobs, config.top_skills)?,
                salary_by_location(jobs)?,
                salary_comparison(jobs, config.comparison_locations.as_slice())?,
                company_insights(jobs, config.top_companies)?,
                remote_work_trends(jobs)?,
                location_insights(jobs)?,
                skill_impact,
            ))
        })
        .context("Failed to compute market report")?;

    salary_by_location.truncate(config.top_locations);
    location_insights.truncate(config.top_locations);

    let metadata = ReportMetadata {
        database: store.path().display().to_string(),
        generated_at: Utc::now(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    info!(
        "Built market report over {} jobs in {:.2}s",
        summary.total_jobs, metadata.duration_seconds
    );

    Ok(MarketReport {
        metadata,
        summary,
        top_skills,
        salary_by_location,
        salary_comparison,
        companies,
        remote_trends,
        location_insights,
        skill_impact,
    })
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &MarketReport) -> String {
    let mut output = String::new();

    output.push_str("# Job Market Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_overview_section(&report.summary));
    output.push_str(&generate_skills_section(&report.top_skills));
    output.push_str(&generate_location_salary_section(&report.salary_by_location));
    output.push_str(&generate_comparison_section(&report.salary_comparison));
    output.push_str(&generate_companies_section(&report.companies));
    output.push_str(&generate_remote_section(&report.remote_trends));
    output.push_str(&generate_location_insights_section(&report.location_insights));

    if let Some(ref impact) = report.skill_impact {
        output.push_str(&generate_skill_impact_section(impact));
    }

    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Database:** `{}`\n", metadata.database));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Computation Time:** {:.2}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_overview_section(summary: &MarketSummary) -> String {
    let mut section = String::new();

    section.push_str("## Market Overview\n\n");

    if summary.total_jobs == 0 {
        section.push_str("No job postings are stored yet. Run `jobscope generate` or `jobscope import` first.\n\n");
        return section;
    }

    section.push_str("| Metric | Value |\n");
    section.push_str("|:---|:---|\n");
    section.push_str(&format!("| Total Jobs | {} |\n", summary.total_jobs));
    section.push_str(&format!(
        "| Average Salary | {} |\n",
        format_usd(summary.avg_salary as f64)
    ));
    section.push_str(&format!("| Salary Range | {} |\n", summary.salary_range));
    section.push_str(&format!(
        "| Highest Paying Location | {} |\n",
        summary.highest_paying_location
    ));
    section.push_str(&format!(
        "| Remote Jobs | {:.1}% |\n",
        summary.remote_percentage
    ));
    section.push('\n');

    if !summary.top_skills.is_empty() {
        section.push_str(&format!(
            "**Most requested skills:** {}\n\n",
            summary.top_skills.join(", ")
        ));
    }

    section
}

fn generate_skills_section(skills: &[SkillStat]) -> String {
    if skills.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Top Skills\n\n");
    section.push_str("| # | Skill | Jobs | Share | Avg Salary |\n");
    section.push_str("|:---:|:---|:---:|:---:|---:|\n");

    for (i, stat) in skills.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} | {:.1}% | {} |\n",
            i + 1,
            stat.skill,
            stat.job_count,
            stat.percentage,
            format_usd(stat.avg_salary as f64)
        ));
    }
    section.push('\n');

    section
}

fn generate_location_salary_section(locations: &[LocationSalary]) -> String {
    if locations.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Salary by Location\n\n");
    section.push_str("| Location | Jobs | Avg Salary |\n");
    section.push_str("|:---|:---:|---:|\n");

    for entry in locations {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            entry.location,
            entry.job_count,
            format_usd(entry.avg_salary as f64)
        ));
    }
    section.push('\n');

    section
}

fn generate_comparison_section(comparison: &[SalaryComparison]) -> String {
    if comparison.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Salary Comparison\n\n");
    section.push_str("| Location | Jobs | Avg Salary | Range |\n");
    section.push_str("|:---|:---:|---:|:---|\n");

    for entry in comparison {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            entry.location,
            entry.job_count,
            format_usd(entry.avg_salary as f64),
            entry.salary_range
        ));
    }
    section.push('\n');

    section
}

fn generate_companies_section(companies: &[CompanyInsight]) -> String {
    if companies.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Top Hiring Companies\n\n");
    section.push_str("| Company | Jobs | Avg Salary | Range |\n");
    section.push_str("|:---|:---:|---:|:---|\n");

    for company in companies {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            company.company,
            company.job_count,
            format_usd(company.avg_salary as f64),
            company.salary_range
        ));
    }
    section.push('\n');

    section
}

fn generate_remote_section(trends: &[RemoteTrend]) -> String {
    if trends.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Remote Work\n\n");
    section.push_str("| Type | Jobs | Share | Avg Salary |\n");
    section.push_str("|:---|:---:|:---:|---:|\n");

    for trend in trends {
        section.push_str(&format!(
            "| {} | {} | {:.1}% | {} |\n",
            trend.remote_type.as_deref().unwrap_or("Unspecified"),
            trend.job_count,
            trend.percentage,
            format_usd(trend.avg_salary as f64)
        ));
    }
    section.push('\n');

    section
}

fn generate_location_insights_section(insights: &[LocationInsight]) -> String {
    if insights.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Location Breakdown\n\n");
    section.push_str("| Location | Jobs | Avg Salary | Remote | Hybrid | On-site |\n");
    section.push_str("|:---|:---:|---:|:---:|:---:|:---:|\n");

    for insight in insights {
        section.push_str(&format!(
            "| {} | {} | {} | {:.1}% | {:.1}% | {:.1}% |\n",
            insight.location,
            insight.total_jobs,
            format_usd(insight.avg_salary as f64),
            insight.remote_percentage,
            insight.hybrid_percentage,
            insight.onsite_percentage
        ));
    }
    section.push('\n');

    section
}

fn generate_skill_impact_section(impact: &SkillImpact) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Skill Impact: {}\n\n", impact.skill));
    section.push_str(&format!(
        "- **With {}:** {}\n",
        impact.skill,
        format_usd(impact.average_salary as f64)
    ));
    section.push_str(&format!(
        "- **Without {}:** {}\n",
        impact.skill,
        format_usd(impact.market_average as f64)
    ));
    section.push_str(&format!(
        "- **Difference:** {} ({:+.1}%)\n\n",
        format_usd(impact.salary_difference as f64),
        impact.percentage_increase
    ));

    section
}

fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by jobscope*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &MarketReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{job, seed, temp_store};

    fn seeded_report(config: &ReportConfig) -> MarketReport {
        let (_dir, store) = temp_store();
        let mut remote = job("Remote", Some("Python, AWS"), Some((110000.0, 130000.0)));
        remote.remote = Some("Remote".to_string());
        seed(
            &store,
            &[
                remote,
                job("Boston, MA", Some("Python, SQL"), Some((90000.0, 100000.0))),
                job("Portland, ME", Some("SQL"), Some((60000.0, 70000.0))),
            ],
        );
        build_report(&store, config).unwrap()
    }

    #[test]
    fn test_build_report() {
        let report = seeded_report(&ReportConfig::default());

        assert_eq!(report.summary.total_jobs, 3);
        assert_eq!(report.top_skills[0].skill, "Python");
        assert_eq!(report.salary_by_location[0].location, "Remote");
        assert_eq!(report.companies[0].company, "Acme");
        let compared: Vec<&str> = report
            .salary_comparison
            .iter()
            .map(|entry| entry.location.as_str())
            .collect();
        assert_eq!(compared, vec!["Remote", "Boston, MA", "Portland, ME"]);
        let impact = report.skill_impact.unwrap();
        assert_eq!(impact.skill, "Python");
        assert_eq!(impact.average_salary, 107500);
        assert_eq!(impact.market_average, 65000);
    }

    #[test]
    fn test_build_report_truncates_locations() {
        let config = ReportConfig {
            top_locations: 1,
            skill: None,
            ..ReportConfig::default()
        };

        let report = seeded_report(&config);

        assert_eq!(report.salary_by_location.len(), 1);
        assert_eq!(report.location_insights.len(), 1);
        assert!(report.skill_impact.is_none());
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = seeded_report(&ReportConfig::default());
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Job Market Report"));
        assert!(markdown.contains("## Market Overview"));
        assert!(markdown.contains("## Top Skills"));
        assert!(markdown.contains("## Salary by Location"));
        assert!(markdown.contains("## Remote Work"));
        assert!(markdown.contains("## Skill Impact: Python"));
        assert!(markdown.contains("| Total Jobs | 3 |"));
        assert!(markdown.contains("$107,500"));
    }

    #[test]
    fn test_markdown_report_for_empty_store() {
        let (_dir, store) = temp_store();
        let report = build_report(&store, &ReportConfig::default()).unwrap();

        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("No job postings are stored yet"));
        assert!(!markdown.contains("## Top Skills"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = seeded_report(&ReportConfig::default());
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"remote_trends\""));
        assert!(json.contains("\"type\": \"Remote\""));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");

        write_report("# Report\n", &path).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Report\n");
    }
}

//! Cross-cutting market snapshot composed from the aggregation functions.

use crate::analysis::aggregator::{
    remote_work_trends, salary_by_location, salary_insights, top_skills, total_jobs,
};
use crate::analysis::stats::format_salary_range;
use crate::models::{MarketSummary, REMOTE};
use crate::store::{JobSelector, StoreError};

/// Number of skill names carried in the summary.
pub const SUMMARY_SKILLS: usize = 5;

/// Build the market summary inside a single read transaction.
pub fn market_summary(jobs: &JobSelector<'_>) -> Result<MarketSummary, StoreError> {
    let overall = salary_insights(jobs, None, None)?;

    let highest_paying_location = salary_by_location(jobs)?
        .into_iter()
        .next()
        .map(|entry| entry.location)
        .unwrap_or_else(|| "N/A".to_string());

    let remote_percentage = remote_work_trends(jobs)?
        .into_iter()
        .find(|trend| trend.remote_type.as_deref() == Some(REMOTE))
        .map(|trend| trend.percentage)
        .unwrap_or(0.0);

    Ok(MarketSummary {
        total_jobs: total_jobs(jobs)?,
        avg_salary: overall.avg_salary,
        salary_range: format_salary_range(overall.min_salary, overall.max_salary),
        top_skills: top_skills(jobs, SUMMARY_SKILLS)?
            .into_iter()
            .map(|stat| stat.skill)
            .collect(),
        highest_paying_location,
        remote_percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{job, seed, temp_store};

    #[test]
    fn test_market_summary_of_empty_store() {
        let (_dir, store) = temp_store();

        let summary = store.read(market_summary).unwrap();

        assert_eq!(summary.total_jobs, 0);
        assert_eq!(summary.avg_salary, 0);
        assert_eq!(summary.salary_range, "$0 - $0");
        assert!(summary.top_skills.is_empty());
        assert_eq!(summary.highest_paying_location, "N/A");
        assert_eq!(summary.remote_percentage, 0.0);
    }

    #[test]
    fn test_market_summary_composes_operations() {
        let (_dir, store) = temp_store();
        let mut remote = job("Remote", Some("Rust, SQL"), Some((120000.0, 140000.0)));
        remote.remote = Some("Remote".to_string());
        seed(
            &store,
            &[
                remote,
                job("Boston, MA", Some("SQL, Excel, Git, Jira, Docker, AWS"), Some((70000.0, 90000.0))),
                job("Boston, MA", Some("SQL"), None),
                job("Austin, TX", None, Some((50000.0, 70000.0))),
            ],
        );

        let summary = store.read(market_summary).unwrap();

        assert_eq!(summary.total_jobs, 4);
        assert_eq!(summary.avg_salary, 90000);
        assert_eq!(summary.salary_range, "$60,000 - $130,000");
        assert_eq!(summary.top_skills.len(), SUMMARY_SKILLS);
        assert_eq!(summary.top_skills[0], "SQL");
        assert_eq!(summary.top_skills[1], "Rust");
        assert_eq!(summary.highest_paying_location, "Remote");
        assert_eq!(summary.remote_percentage, 25.0);
    }
}

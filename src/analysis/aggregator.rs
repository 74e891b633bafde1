//! Market aggregation over job records.
//!
//! Every function is a pure read against a [`JobSelector`]; the caller decides
//! the transaction scope. Only records with both salary bounds ("eligible"
//! records) contribute to salary figures, and empty populations produce
//! zero-valued results rather than errors.

use crate::analysis::stats::{
    format_salary_range, mean, percentage, round_int, round_one_decimal, upper_median,
};
use crate::models::{
    CompanyInsight, JobPosting, LocationInsight, LocationSalary, RemoteTrend, SalaryComparison,
    SalaryInsights, SkillImpact, SkillStat, HYBRID, REMOTE,
};
use crate::store::{GroupField, GroupStats, JobFilter, JobSelector, StoreError};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Split a comma-separated skill list into trimmed, non-empty tokens.
pub fn split_skills(skills: &str) -> impl Iterator<Item = &str> {
    skills.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Total number of stored jobs, eligible or not.
pub fn total_jobs(jobs: &JobSelector<'_>) -> Result<usize, StoreError> {
    jobs.count_all()
}

/// Salary statistics over eligible jobs, optionally filtered by case-insensitive
/// substrings of `location` and `skills`.
pub fn salary_insights(
    jobs: &JobSelector<'_>,
    location: Option<&str>,
    skill: Option<&str>,
) -> Result<SalaryInsights, StoreError> {
    let filter = JobFilter::eligible()
        .location_contains(location)
        .skills_contains(skill);
    let midpoints = midpoints(&jobs.fetch(&filter)?);

    debug!(
        "Salary insights over {} jobs (location={:?}, skill={:?})",
        midpoints.len(),
        location,
        skill
    );
    Ok(insights_from_midpoints(&midpoints))
}

fn midpoints(postings: &[JobPosting]) -> Vec<f64> {
    postings
        .iter()
        .filter_map(JobPosting::midpoint_salary)
        .collect()
}

fn insights_from_midpoints(midpoints: &[f64]) -> SalaryInsights {
    let (Some(avg), Some(median)) = (mean(midpoints), upper_median(midpoints)) else {
        return SalaryInsights::default();
    };

    SalaryInsights {
        count: midpoints.len(),
        avg_salary: round_int(avg),
        min_salary: midpoints.iter().copied().fold(f64::INFINITY, f64::min),
        max_salary: midpoints.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        median_salary: median,
    }
}

fn rounded_avg(group: &GroupStats) -> i64 {
    group.avg.map(round_int).unwrap_or(0)
}

/// Average salary per exact location, highest paying first.
pub fn salary_by_location(jobs: &JobSelector<'_>) -> Result<Vec<LocationSalary>, StoreError> {
    let mut groups = jobs.grouped_aggregate(GroupField::Location, &JobFilter::eligible())?;
    groups.sort_by(|a, b| b.avg.unwrap_or(0.0).total_cmp(&a.avg.unwrap_or(0.0)));

    Ok(groups
        .into_iter()
        .map(|group| LocationSalary {
            avg_salary: rounded_avg(&group),
            job_count: group.count,
            location: group.key.unwrap_or_default(),
        })
        .collect())
}

/// Occurrence count and salary sample for one skill.
struct SkillTally<'a> {
    skill: &'a str,
    salaries: Vec<f64>,
}

/// Most frequently mentioned skills among eligible jobs that list skills.
///
/// Every occurrence counts, including a skill repeated within one job, and
/// contributes that job's midpoint to the skill's salary sample. Skills with
/// equal frequency keep the order in which they were first seen.
pub fn top_skills(jobs: &JobSelector<'_>, limit: usize) -> Result<Vec<SkillStat>, StoreError> {
    let postings = jobs.fetch(&JobFilter::eligible().with_skills())?;

    let mut tallies: Vec<SkillTally<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for posting in &postings {
        let (Some(skills), Some(midpoint)) = (posting.skills.as_deref(), posting.midpoint_salary())
        else {
            continue;
        };

        for skill in split_skills(skills) {
            let slot = *index.entry(skill).or_insert_with(|| {
                tallies.push(SkillTally {
                    skill,
                    salaries: Vec::new(),
                });
                tallies.len() - 1
            });
            tallies[slot].salaries.push(midpoint);
        }
    }

    debug!(
        "Counted {} distinct skills across {} jobs",
        tallies.len(),
        postings.len()
    );

    // Stable sort keeps first-seen order among equal counts
    tallies.sort_by_key(|tally| Reverse(tally.salaries.len()));
    tallies.truncate(limit);

    Ok(tallies
        .into_iter()
        .map(|tally| SkillStat {
            skill: tally.skill.to_string(),
            job_count: tally.salaries.len(),
            avg_salary: mean(&tally.salaries).map(round_int).unwrap_or(0),
            percentage: percentage(tally.salaries.len(), postings.len()),
        })
        .collect())
}

#[derive(Default)]
struct LocationTally {
    salaries: Vec<f64>,
    remote: usize,
    hybrid: usize,
}

/// Work-arrangement breakdown per exact location, busiest first.
///
/// Only the exact labels `"Remote"` and `"Hybrid"` are counted; the on-site
/// share is whatever remains of 100%.
pub fn location_insights(jobs: &JobSelector<'_>) -> Result<Vec<LocationInsight>, StoreError> {
    let postings = jobs.fetch(&JobFilter::eligible())?;

    let mut by_location: BTreeMap<&str, LocationTally> = BTreeMap::new();
    for posting in &postings {
        let Some(midpoint) = posting.midpoint_salary() else {
            continue;
        };
        let tally = by_location.entry(posting.location.as_str()).or_default();
        tally.salaries.push(midpoint);
        match posting.remote.as_deref() {
            Some(REMOTE) => tally.remote += 1,
            Some(HYBRID) => tally.hybrid += 1,
            _ => {}
        }
    }

    let mut insights: Vec<LocationInsight> = by_location
        .into_iter()
        .map(|(location, tally)| {
            let total = tally.salaries.len();
            let remote_percentage = percentage(tally.remote, total);
            let hybrid_percentage = percentage(tally.hybrid, total);
            LocationInsight {
                location: location.to_string(),
                total_jobs: total,
                avg_salary: mean(&tally.salaries).map(round_int).unwrap_or(0),
                remote_jobs: tally.remote,
                hybrid_jobs: tally.hybrid,
                remote_percentage,
                hybrid_percentage,
                onsite_percentage: round_one_decimal(
                    100.0 - remote_percentage - hybrid_percentage,
                ),
            }
        })
        .collect();

    insights.sort_by_key(|insight| Reverse(insight.total_jobs));
    Ok(insights)
}

/// Companies with the most eligible postings.
pub fn company_insights(
    jobs: &JobSelector<'_>,
    limit: usize,
) -> Result<Vec<CompanyInsight>, StoreError> {
    let mut groups = jobs.grouped_aggregate(GroupField::Company, &JobFilter::eligible())?;
    groups.sort_by_key(|group| Reverse(group.count));
    groups.truncate(limit);

    Ok(groups
        .into_iter()
        .map(|group| CompanyInsight {
            avg_salary: rounded_avg(&group),
            salary_range: match (group.min, group.max) {
                (Some(min), Some(max)) => format_salary_range(min, max),
                _ => "N/A".to_string(),
            },
            job_count: group.count,
            company: group.key.unwrap_or_default(),
        })
        .collect())
}

/// Eligible job counts per exact `remote` value.
///
/// Percentages are taken against every stored job, including those without
/// salary data, so they need not sum to 100.
pub fn remote_work_trends(jobs: &JobSelector<'_>) -> Result<Vec<RemoteTrend>, StoreError> {
    let total = jobs.count_all()?;
    let groups = jobs.grouped_aggregate(GroupField::Remote, &JobFilter::eligible())?;

    let mut trends: Vec<RemoteTrend> = groups
        .into_iter()
        .map(|group| RemoteTrend {
            avg_salary: rounded_avg(&group),
            percentage: percentage(group.count, total),
            job_count: group.count,
            remote_type: group.key,
        })
        .collect();

    trends.sort_by_key(|trend| Reverse(trend.job_count));
    Ok(trends)
}

/// Salary figures for each requested location filter, highest paying first.
///
/// Locations without eligible jobs are left out.
pub fn salary_comparison<S: AsRef<str>>(
    jobs: &JobSelector<'_>,
    locations: &[S],
) -> Result<Vec<SalaryComparison>, StoreError> {
    let mut comparison = Vec::with_capacity(locations.len());

    for location in locations {
        let location = location.as_ref();
        let insights = salary_insights(jobs, Some(location), None)?;
        if insights.count == 0 {
            debug!("No eligible jobs for location {:?}", location);
            continue;
        }
        comparison.push(SalaryComparison {
            location: location.to_string(),
            job_count: insights.count,
            avg_salary: insights.avg_salary,
            salary_range: format_salary_range(insights.min_salary, insights.max_salary),
        });
    }

    comparison.sort_by_key(|entry| Reverse(entry.avg_salary));
    Ok(comparison)
}

/// Average pay of jobs mentioning `skill` against eligible jobs whose skill
/// list does not mention it.
///
/// When the baseline is empty the difference and percentage are zero while
/// `average_salary` is still reported.
pub fn skill_salary_impact(
    jobs: &JobSelector<'_>,
    skill: &str,
) -> Result<SkillImpact, StoreError> {
    let with_skill = salary_insights(jobs, None, Some(skill))?;

    let baseline = midpoints(&jobs.fetch(&JobFilter::eligible().skills_not_contains(skill))?);
    let market_average = mean(&baseline).map(round_int).unwrap_or(0);

    let (salary_difference, percentage_increase) = if market_average == 0 {
        (0, 0.0)
    } else {
        let difference = with_skill.avg_salary - market_average;
        (
            difference,
            round_one_decimal(difference as f64 / market_average as f64 * 100.0),
        )
    };

    debug!(
        "Skill {:?}: {} jobs with, {} without",
        skill,
        with_skill.count,
        baseline.len()
    );

    Ok(SkillImpact {
        skill: skill.to_string(),
        average_salary: with_skill.avg_salary,
        market_average,
        salary_difference,
        percentage_increase,
    })
}

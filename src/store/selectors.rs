//! Read side of the job store: filtered retrieval and grouped aggregates.

use super::StoreError;
use crate::models::JobPosting;
use rusqlite::{params_from_iter, Connection, Row};

const JOB_COLUMNS: &str = "id, title, company, location, salary_min, salary_max, salary_text, \
     skills, description, url, remote, date_posted, date_scraped";

const MIDPOINT: &str = "(salary_min + salary_max) / 2.0";

/// Conjunction of optional predicates over job records.
///
/// Substring predicates are case-insensitive. An empty `location_contains` or
/// `skills_contains` applies no predicate at all, while an empty
/// `skills_not_contains` matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub location_contains: Option<String>,
    pub skills_contains: Option<String>,
    /// Records with a null `skills` field never satisfy this predicate.
    pub skills_not_contains: Option<String>,
    /// Both salary bounds present.
    pub require_salary: bool,
    pub require_skills: bool,
}

impl JobFilter {
    /// Records with both salary bounds present.
    pub fn eligible() -> Self {
        Self {
            require_salary: true,
            ..Self::default()
        }
    }

    pub fn location_contains(mut self, location: Option<&str>) -> Self {
        self.location_contains = location.map(String::from);
        self
    }

    pub fn skills_contains(mut self, skill: Option<&str>) -> Self {
        self.skills_contains = skill.map(String::from);
        self
    }

    pub fn skills_not_contains(mut self, skill: &str) -> Self {
        self.skills_not_contains = Some(skill.to_string());
        self
    }

    pub fn with_skills(mut self) -> Self {
        self.require_skills = true;
        self
    }

    /// Build the `WHERE` clause and its positional parameters.
    fn to_sql(&self) -> (String, Vec<String>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if self.require_salary {
            clauses.push("salary_min IS NOT NULL AND salary_max IS NOT NULL".to_string());
        }
        if self.require_skills {
            clauses.push("skills IS NOT NULL".to_string());
        }

        // An empty needle is contained in everything, so only the
        // containment predicates may be dropped for it.
        let substring_predicates = [
            ("location LIKE", &self.location_contains, true),
            ("skills LIKE", &self.skills_contains, true),
            ("skills NOT LIKE", &self.skills_not_contains, false),
        ];
        for (predicate, needle, skip_empty) in substring_predicates {
            if let Some(needle) = needle.as_deref().filter(|n| !(skip_empty && n.is_empty())) {
                params.push(like_pattern(needle));
                clauses.push(format!("{} ?{} ESCAPE '\\'", predicate, params.len()));
            }
        }

        if clauses.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), params)
        }
    }
}

/// `%needle%` with LIKE metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Field used to partition records for grouped aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Location,
    Company,
    Remote,
}

impl GroupField {
    fn column(self) -> &'static str {
        match self {
            GroupField::Location => "location",
            GroupField::Company => "company",
            GroupField::Remote => "remote",
        }
    }
}

/// Count and midpoint-salary statistics for one group key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    /// Raw, unnormalised field value.
    pub key: Option<String>,
    pub count: usize,
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub struct JobSelector<'a> {
    conn: &'a Connection,
}

impl<'a> JobSelector<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        JobSelector { conn }
    }

    /// Total number of stored records, unfiltered.
    pub fn count_all(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Records matching `filter`, in insertion order.
    pub fn fetch(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, StoreError> {
        let (clause, params) = filter.to_sql();
        let sql = format!("SELECT {} FROM jobs{} ORDER BY id", JOB_COLUMNS, clause);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), job_from_row)?;
        let jobs = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    /// Count and midpoint statistics per exact value of `field`, ordered by key.
    ///
    /// Keys are compared exactly: `"Boston, MA"` and `"boston, ma"` are two groups.
    pub fn grouped_aggregate(
        &self,
        field: GroupField,
        filter: &JobFilter,
    ) -> Result<Vec<GroupStats>, StoreError> {
        let column = field.column();
        let (clause, params) = filter.to_sql();
        let sql = format!(
            "SELECT {column}, COUNT(id), AVG({MIDPOINT}), MIN({MIDPOINT}), MAX({MIDPOINT}) \
             FROM jobs{clause} GROUP BY {column} ORDER BY {column}"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            Ok(GroupStats {
                key: row.get(0)?,
                count: row.get::<_, i64>(1)? as usize,
                avg: row.get(2)?,
                min: row.get(3)?,
                max: row.get(4)?,
            })
        })?;
        let groups = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(groups)
    }
}

fn job_from_row(row: &Row<'_>) -> rusqlite::Result<JobPosting> {
    Ok(JobPosting {
        id: row.get(0)?,
        title: row.get(1)?,
        company: row.get(2)?,
        location: row.get(3)?,
        salary_min: row.get(4)?,
        salary_max: row.get(5)?,
        salary_text: row.get(6)?,
        skills: row.get(7)?,
        description: row.get(8)?,
        url: row.get(9)?,
        remote: row.get(10)?,
        date_posted: row.get(11)?,
        date_scraped: row.get(12)?,
    })
}

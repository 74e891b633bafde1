//! Write side of the job store, used only by ingestion producers.

use super::StoreError;
use crate::models::NewJobPosting;
use chrono::Utc;
use rusqlite::{params, Connection};

pub struct JobMutator<'a> {
    conn: &'a Connection,
}

impl<'a> JobMutator<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        JobMutator { conn }
    }

    /// Insert one posting and return its id. `date_scraped` is set to now.
    pub fn insert(&self, job: &NewJobPosting) -> Result<i64, StoreError> {
        let now = Utc::now();
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO jobs (title, company, location, salary_min, salary_max, salary_text, \
             skills, description, url, remote, date_posted, date_scraped) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )?;
        stmt.execute(params![
            job.title,
            job.company,
            job.location,
            job.salary_min,
            job.salary_max,
            job.salary_text,
            job.skills,
            job.description,
            job.url,
            job.remote,
            job.date_posted.unwrap_or(now),
            now,
        ])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a batch of postings, returning how many were written.
    pub fn insert_many(&self, jobs: &[NewJobPosting]) -> Result<usize, StoreError> {
        for job in jobs {
            self.insert(job)?;
        }
        Ok(jobs.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::NewJobPosting;
    use crate::store::test_support::{job, temp_store};
    use crate::store::JobFilter;
    use chrono::{Duration, Utc};

    #[test]
    fn test_insert_assigns_ids_and_round_trips_fields() {
        let (_dir, store) = temp_store();
        let posted = Utc::now() - Duration::days(3);
        let posting = NewJobPosting {
            title: "DevOps Engineer".to_string(),
            company: "Wayfair".to_string(),
            location: "Boston, MA".to_string(),
            salary_min: Some(95000.0),
            salary_max: Some(115000.0),
            salary_text: Some("$95,000 - $115,000".to_string()),
            skills: Some("Docker, AWS".to_string()),
            description: Some("Build pipelines.".to_string()),
            url: Some("https://example-jobs.com/job/123456".to_string()),
            remote: Some("Hybrid".to_string()),
            date_posted: Some(posted),
        };

        let (first, second) = store
            .write(|m| Ok((m.insert(&posting)?, m.insert(&job("Austin, TX", None, None))?)))
            .unwrap();
        assert!(second > first);

        let jobs = store.read(|s| s.fetch(&JobFilter::default())).unwrap();
        let stored = &jobs[0];
        assert_eq!(stored.id, first);
        assert_eq!(stored.company, "Wayfair");
        assert_eq!(stored.salary_text.as_deref(), Some("$95,000 - $115,000"));
        assert_eq!(stored.remote.as_deref(), Some("Hybrid"));
        assert_eq!(stored.date_posted, posted);
        assert!(stored.date_scraped >= posted);
    }

    #[test]
    fn test_insert_many_counts_rows() {
        let (_dir, store) = temp_store();
        let batch = vec![job("Boston, MA", None, None); 25];

        let written = store.write(|m| m.insert_many(&batch)).unwrap();

        assert_eq!(written, 25);
        assert_eq!(store.read(|s| s.count_all()).unwrap(), 25);
    }
}

//! SQLite-backed job record store.
//!
//! The store owns nothing but the database path. Every call opens its own
//! connection and transaction, so concurrent readers never share connection
//! state and no aggregation call observes a half-written batch.

pub mod mutators;
pub mod selectors;

pub use mutators::JobMutator;
pub use selectors::{GroupField, GroupStats, JobFilter, JobSelector};

use rusqlite::{Connection, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    company TEXT NOT NULL,
    location TEXT NOT NULL,
    salary_min REAL,
    salary_max REAL,
    salary_text TEXT,
    skills TEXT,
    description TEXT,
    url TEXT,
    remote TEXT,
    date_posted TEXT NOT NULL,
    date_scraped TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_jobs_location ON jobs (location);
CREATE INDEX IF NOT EXISTS idx_jobs_company ON jobs (company);
";

/// Errors raised by the job store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to initialise schema: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("database query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Handle to the job database.
#[derive(Debug, Clone)]
pub struct JobStore {
    path: PathBuf,
}

impl JobStore {
    /// Open (creating if needed) the database at `path` and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let store = Self { path };
        let conn = store.connect()?;

        // WAL lets readers proceed while an ingestion batch is being written
        let journal_mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(StoreError::Schema)?;
        debug!("SQLite journal mode: {}", journal_mode);
        conn.execute_batch(SCHEMA).map_err(StoreError::Schema)?;

        info!("Opened job store at {}", store.path.display());
        Ok(store)
    }

    /// Path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` inside a read transaction.
    pub fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&JobSelector<'_>) -> Result<T, StoreError>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let selector = JobSelector::new(&tx);
        let output = f(&selector)?;
        tx.finish()?;
        Ok(output)
    }

    /// Run `f` inside a write transaction, committing when it returns `Ok`.
    pub fn write<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&JobMutator<'_>) -> Result<T, StoreError>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mutator = JobMutator::new(&tx);
        let output = f(&mutator)?;
        tx.commit()?;
        debug!("Committed write transaction");
        Ok(output)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::NewJobPosting;
    use tempfile::TempDir;

    /// A store in a temporary directory; keep the `TempDir` alive for the test.
    pub fn temp_store() -> (TempDir, JobStore) {
        let dir = TempDir::new().unwrap();
        let store = JobStore::open(dir.path().join("jobs.db")).unwrap();
        (dir, store)
    }

    pub fn job(location: &str, skills: Option<&str>, salary: Option<(f64, f64)>) -> NewJobPosting {
        NewJobPosting {
            title: "Software Developer".to_string(),
            company: "Acme".to_string(),
            location: location.to_string(),
            salary_min: salary.map(|(min, _)| min),
            salary_max: salary.map(|(_, max)| max),
            skills: skills.map(String::from),
            remote: Some("On-site".to_string()),
            ..Default::default()
        }
    }

    pub fn seed(store: &JobStore, jobs: &[NewJobPosting]) {
        store.write(|m| m.insert_many(jobs)).unwrap();
    }
}

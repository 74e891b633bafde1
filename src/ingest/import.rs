//! Import of scraped listings from JSON files.

use crate::ingest::normalize::RawListing;
use crate::models::NewJobPosting;
use crate::store::JobStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Read a JSON array of raw listings.
pub fn load_raw_listings(path: &Path) -> Result<Vec<RawListing>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read listings file: {}", path.display()))?;

    let listings: Vec<RawListing> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse listings file: {}", path.display()))?;

    debug!("Loaded {} raw listings from {}", listings.len(), path.display());
    Ok(listings)
}

/// Normalise every listing in `path` and store them in one transaction.
///
/// Nothing is written when the file cannot be read or parsed.
pub fn import_file(store: &JobStore, path: &Path) -> Result<usize> {
    let postings: Vec<NewJobPosting> = load_raw_listings(path)?
        .into_iter()
        .map(NewJobPosting::from)
        .collect();

    let written = store
        .write(|m| m.insert_many(&postings))
        .with_context(|| format!("Failed to save listings from {}", path.display()))?;

    info!("Imported {} job postings from {}", written, path.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::temp_store;
    use crate::store::JobFilter;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn listings_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_import_file() {
        let (_dir, store) = temp_store();
        let file = listings_file(
            r#"[
                {"title": "Python Developer", "company": "WEX", "location": "Portland, ME",
                 "salary_text": "$70,000 - $90,000", "description": "Python and SQL"},
                {"title": "Remote Engineer", "description": "Fully remote, Docker"}
            ]"#,
        );

        let written = import_file(&store, file.path()).unwrap();
        assert_eq!(written, 2);

        let jobs = store.read(|s| s.fetch(&JobFilter::default())).unwrap();
        assert_eq!(jobs[0].salary_min, Some(70000.0));
        assert_eq!(jobs[0].skills.as_deref(), Some("Python, SQL"));
        assert_eq!(jobs[1].company, "Unknown");
        assert_eq!(jobs[1].location, "Unknown");
        assert_eq!(jobs[1].remote.as_deref(), Some("Remote"));
        assert_eq!(jobs[1].salary_min, None);
    }

    #[test]
    fn test_import_rejects_malformed_file() {
        let (_dir, store) = temp_store();
        let file = listings_file(r#"{"title": "not an array"}"#);

        assert!(import_file(&store, file.path()).is_err());
        assert_eq!(store.read(|s| s.count_all()).unwrap(), 0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_raw_listings(Path::new("/nonexistent/listings.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read listings file"));
    }
}

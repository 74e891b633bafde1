//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.jobscope.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".jobscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Synthetic data settings.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// HTTP API settings.
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("jobs.db")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of postings `generate` creates.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Fixed seed for reproducible datasets.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            seed: None,
        }
    }
}

fn default_count() -> usize {
    500
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Skills listed in the top skills table.
    #[serde(default = "default_top_skills")]
    pub top_skills: usize,

    /// Rows in the location tables.
    #[serde(default = "default_top_entries")]
    pub top_locations: usize,

    /// Rows in the company table.
    #[serde(default = "default_top_entries")]
    pub top_companies: usize,

    /// Location filters compared side by side.
    #[serde(default = "default_comparison_locations")]
    pub comparison_locations: Vec<String>,

    /// Skill whose salary impact is reported, if any.
    #[serde(default = "default_skill")]
    pub skill: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            top_skills: default_top_skills(),
            top_locations: default_top_entries(),
            top_companies: default_top_entries(),
            comparison_locations: default_comparison_locations(),
            skill: default_skill(),
        }
    }
}

fn default_output() -> String {
    "market_report.md".to_string()
}

fn default_top_skills() -> usize {
    10
}

fn default_top_entries() -> usize {
    8
}

fn default_comparison_locations() -> Vec<String> {
    vec![
        "Boston, MA",
        "San Francisco, CA",
        "New York, NY",
        "Portland, ME",
        "Remote",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_skill() -> Option<String> {
    Some("Python".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref database) = args.database {
            self.database.path = database.clone();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Args, Command};
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, PathBuf::from("jobs.db"));
        assert_eq!(config.generator.count, 500);
        assert_eq!(config.report.top_skills, 10);
        assert_eq!(config.report.skill.as_deref(), Some("Python"));
        assert!(config
            .report
            .comparison_locations
            .contains(&"Portland, ME".to_string()));
        assert_eq!(config.server.address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[database]
path = "data/maine.db"

[generator]
count = 50
seed = 42

[report]
top_skills = 5
comparison_locations = ["Bangor, ME", "Remote"]

[server]
port = 9000
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.database.path, PathBuf::from("data/maine.db"));
        assert_eq!(config.generator.count, 50);
        assert_eq!(config.generator.seed, Some(42));
        assert_eq!(config.report.top_skills, 5);
        assert_eq!(config.report.top_locations, 8);
        assert_eq!(config.report.comparison_locations, vec!["Bangor, ME", "Remote"]);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[generator]\ncount = 12\n").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.generator.count, 12);

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"[generator\n").unwrap();
        assert!(Config::load(broken.path()).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = Args {
            config: None,
            database: None,
            verbose: false,
            quiet: false,
            command: Command::InitDb,
        };

        config.merge_with_args(&args);
        assert_eq!(config.database.path, PathBuf::from("jobs.db"));

        args.database = Some(PathBuf::from("other.db"));
        config.merge_with_args(&args);
        assert_eq!(config.database.path, PathBuf::from("other.db"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[server]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.report.top_companies, 8);
    }
}

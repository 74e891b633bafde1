//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// jobscope - job market analytics over a local SQLite store
///
/// Collect job postings (synthetic or imported from scraped listings) and
/// analyse salaries, skills, locations, companies and remote work.
///
/// Examples:
///   jobscope generate --count 500 --seed 42
///   jobscope import listings.json
///   jobscope salary --location Boston --skill Python
///   jobscope report --output market_report.md
///   jobscope serve --port 8000
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .jobscope.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path (overrides the config file)
    #[arg(short, long, value_name = "FILE", env = "JOBSCOPE_DATABASE", global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Generate a default .jobscope.toml configuration file
    InitConfig,

    /// Create the database and its schema
    InitDb,

    /// Generate synthetic job postings
    Generate {
        /// Number of postings (defaults to the config value)
        #[arg(short = 'n', long, value_name = "COUNT")]
        count: Option<usize>,

        /// Seed for a reproducible dataset
        #[arg(long)]
        seed: Option<u64>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Import scraped listings from a JSON file
    Import {
        /// JSON array of listings
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Write a full market report
    Report {
        /// Output file path (defaults to the config value)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (markdown, json)
        #[arg(long, default_value = "markdown", value_name = "FORMAT")]
        format: OutputFormat,

        /// Skill whose salary impact is included
        #[arg(long)]
        skill: Option<String>,
    },

    /// Print the market summary
    Summary,

    /// Salary statistics, optionally filtered
    Salary {
        /// Case-insensitive location substring
        #[arg(short, long)]
        location: Option<String>,

        /// Case-insensitive skill substring
        #[arg(short, long)]
        skill: Option<String>,
    },

    /// Average salary per location
    Locations,

    /// Most requested skills
    Skills {
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Remote and hybrid share per location
    LocationInsights,

    /// Companies with the most postings
    Companies {
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Job share per work arrangement
    Remote,

    /// Compare salaries across locations (defaults to the config list)
    Compare {
        #[arg(value_name = "LOCATION")]
        locations: Vec<String>,
    },

    /// Salary impact of a single skill
    Impact {
        #[arg(value_name = "SKILL")]
        skill: String,
    },

    /// Serve the analytics as a JSON API
    Serve {
        /// Bind host (defaults to the config value)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (defaults to the config value)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Command::Generate { count: Some(0), .. } => {
                return Err("Count must be at least 1".to_string());
            }
            Command::Import { file } => {
                if !file.is_file() {
                    return Err(format!("Listings file does not exist: {}", file.display()));
                }
            }
            Command::Impact { skill } if skill.trim().is_empty() => {
                return Err("Skill must not be empty".to_string());
            }
            Command::Serve { port: Some(0), .. } => {
                return Err("Port must be at least 1".to_string());
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(command: Command) -> Args {
        Args {
            config: None,
            database: None,
            verbose: false,
            quiet: false,
            command,
        }
    }

    #[test]
    fn test_parse_subcommands() {
        let args = Args::try_parse_from(["jobscope", "-d", "x.db", "skills", "-n", "5"]).unwrap();
        assert_eq!(args.database, Some(PathBuf::from("x.db")));
        assert_eq!(args.command, Command::Skills { limit: 5 });

        let args =
            Args::try_parse_from(["jobscope", "compare", "Boston, MA", "Remote", "-v"]).unwrap();
        assert!(args.verbose);
        assert_eq!(
            args.command,
            Command::Compare {
                locations: vec!["Boston, MA".to_string(), "Remote".to_string()]
            }
        );

        let args = Args::try_parse_from(["jobscope", "report", "--format", "json"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Report {
                format: OutputFormat::Json,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_requires_subcommand() {
        assert!(Args::try_parse_from(["jobscope"]).is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(Command::Summary);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_of_subcommands() {
        let args = make_args(Command::Generate {
            count: Some(0),
            seed: None,
            no_progress: false,
        });
        assert!(args.validate().is_err());

        let args = make_args(Command::Import {
            file: PathBuf::from("/nonexistent/listings.json"),
        });
        assert!(args.validate().is_err());

        let args = make_args(Command::Impact {
            skill: "  ".to_string(),
        });
        assert!(args.validate().is_err());

        let args = make_args(Command::Generate {
            count: Some(10),
            seed: Some(1),
            no_progress: true,
        });
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::Summary);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}

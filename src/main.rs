//! jobscope - job market analytics over a local SQLite store
//!
//! A CLI that ingests job postings (synthetic or imported from scraped
//! listings), answers salary, skill, location, company and remote-work
//! questions over them, writes market reports, and serves the same analytics
//! as a JSON API.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, database, I/O)

mod analysis;
mod cli;
mod config;
mod ingest;
mod models;
mod report;
mod server;
mod store;

use anyhow::{Context, Result};
use cli::{Args, Command, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use ingest::{generate_and_save, import_file, JobGenerator};
use serde::Serialize;
use server::state::AppState;
use std::path::PathBuf;
use store::{JobSelector, JobStore, StoreError};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if args.command == Command::InitConfig {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("jobscope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Command failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle init-config: generate a default .jobscope.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize the database path, report sections, and server address.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Dispatch the parsed subcommand.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let store = JobStore::open(&config.database.path)
        .with_context(|| format!("Failed to open database {}", config.database.path.display()))?;

    match args.command {
        Command::InitConfig => handle_init_config()?,
        Command::InitDb => {
            let total = store.read(|jobs| jobs.count_all())?;
            println!("✅ Database ready at {}", store.path().display());
            println!("   Stored jobs: {}", total);
        }
        Command::Generate {
            count,
            seed,
            no_progress,
        } => {
            let count = count.unwrap_or(config.generator.count);
            let mut generator = match seed.or(config.generator.seed) {
                Some(seed) => JobGenerator::with_seed(seed),
                None => JobGenerator::new(),
            };
            let show_progress = !no_progress && !args.quiet;

            println!("🎲 Generating {} job postings...", count);
            let written = generate_and_save(&store, &mut generator, count, show_progress)?;
            let total = store.read(|jobs| jobs.count_all())?;
            println!("✅ Saved {} postings ({} stored in total)", written, total);
        }
        Command::Import { file } => {
            println!("📥 Importing listings from {}", file.display());
            let written = import_file(&store, &file)?;
            println!("✅ Imported {} postings", written);
        }
        Command::Report {
            output,
            format,
            skill,
        } => {
            if skill.is_some() {
                config.report.skill = skill;
            }
            let report = report::build_report(&store, &config.report)?;

            let content = match format {
                OutputFormat::Markdown => report::generate_markdown_report(&report),
                OutputFormat::Json => report::generate_json_report(&report)?,
            };
            let output = output.unwrap_or_else(|| default_report_path(&config, format));
            report::write_report(&content, &output)?;

            println!("\n📊 Market Summary:");
            println!("   Total jobs: {}", report.summary.total_jobs);
            println!(
                "   Average salary: {}",
                analysis::stats::format_usd(report.summary.avg_salary as f64)
            );
            println!("   Salary range: {}", report.summary.salary_range);
            println!(
                "   Highest paying location: {}",
                report.summary.highest_paying_location
            );
            println!("   Remote: {:.1}%", report.summary.remote_percentage);
            println!("\n✅ Report saved to: {}", output.display());
        }
        Command::Summary => print_query(&store, analysis::market_summary)?,
        Command::Salary { location, skill } => print_query(&store, |jobs| {
            analysis::salary_insights(jobs, location.as_deref(), skill.as_deref())
        })?,
        Command::Locations => print_query(&store, analysis::salary_by_location)?,
        Command::Skills { limit } => print_query(&store, |jobs| analysis::top_skills(jobs, limit))?,
        Command::LocationInsights => print_query(&store, analysis::location_insights)?,
        Command::Companies { limit } => {
            print_query(&store, |jobs| analysis::company_insights(jobs, limit))?
        }
        Command::Remote => print_query(&store, analysis::remote_work_trends)?,
        Command::Compare { locations } => {
            let locations = if locations.is_empty() {
                config.report.comparison_locations.clone()
            } else {
                locations
            };
            print_query(&store, |jobs| {
                analysis::salary_comparison(jobs, locations.as_slice())
            })?
        }
        Command::Impact { skill } => {
            print_query(&store, |jobs| analysis::skill_salary_impact(jobs, &skill))?
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = AppState::new(store, config.report.comparison_locations.clone());
            server::listen(state, &config.server.address()).await?;
        }
    }

    Ok(())
}

/// Run one read-only query and print its result as pretty JSON.
fn print_query<T, F>(store: &JobStore, f: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&JobSelector<'_>) -> Result<T, StoreError>,
{
    let value = store.read(f).context("Query failed")?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Configured report path, with the extension matching `format`.
fn default_report_path(config: &Config, format: OutputFormat) -> PathBuf {
    let path = PathBuf::from(&config.report.output);
    match format {
        OutputFormat::Markdown => path,
        OutputFormat::Json => path.with_extension("json"),
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

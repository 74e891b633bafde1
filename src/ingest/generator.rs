//! Synthetic job posting generator.
//!
//! Produces realistic-looking postings for New England and major tech hubs so
//! the dashboard and reports have data without scraping anything.

use crate::analysis::stats::format_usd;
use crate::models::{NewJobPosting, HYBRID, ON_SITE, REMOTE};
use crate::store::JobStore;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Locations with their salary multipliers.
const LOCATIONS: &[(&str, f64)] = &[
    ("Portland, ME", 0.85),
    ("Bangor, ME", 0.80),
    ("Augusta, ME", 0.82),
    ("Boston, MA", 1.15),
    ("Cambridge, MA", 1.20),
    ("Worcester, MA", 0.95),
    ("Manchester, NH", 0.90),
    ("Burlington, VT", 0.88),
    ("Hartford, CT", 1.00),
    ("Providence, RI", 0.95),
    ("New York, NY", 1.25),
    ("San Francisco, CA", 1.40),
    ("Austin, TX", 1.05),
    ("Seattle, WA", 1.20),
    ("Remote", 1.10),
];

/// Job titles with their base salaries.
const TITLES: &[(&str, f64)] = &[
    ("Software Engineer Intern", 75000.0),
    ("Python Developer", 85000.0),
    ("Full Stack Developer", 90000.0),
    ("Frontend Developer", 80000.0),
    ("Backend Developer", 88000.0),
    ("Data Analyst", 75000.0),
    ("Software Developer", 85000.0),
    ("React Developer", 82000.0),
    ("JavaScript Developer", 83000.0),
    ("Junior Software Engineer", 70000.0),
    ("Web Developer", 75000.0),
    ("DevOps Engineer", 95000.0),
    ("Machine Learning Engineer", 105000.0),
    ("Data Scientist", 100000.0),
];

const COMPANIES: &[&str] = &[
    // New England
    "Liberty Mutual", "Fidelity Investments", "Raytheon", "TripAdvisor", "Wayfair", "HubSpot",
    "CarGurus", "Toast", "DataRobot", "PTC", "Akamai", "iRobot", "LogMeIn", "Carbonite",
    "Brightcove",
    // Maine and regional
    "IDEXX", "WEX", "Tilson", "Kepware", "Critical Insights", "Tyler Technologies",
    "Machias Savings Bank", "ImmuCell",
    // Major tech with remote or satellite offices
    "Google", "Microsoft", "Amazon", "Apple", "Meta", "Netflix", "Spotify", "Slack", "Zoom",
    "Salesforce", "Adobe", "Oracle",
    // Startups
    "TechCorp", "DataFlow Solutions", "CloudTech Inc", "WebSolutions", "InnovateLabs",
    "CodeCraft", "DevStream", "TechNova", "ByteWorks", "StackFlow", "AppForge", "DataVault",
];

/// Skills with the probability that a posting lists them.
const SKILLS: &[(&str, f64)] = &[
    ("Python", 0.7),
    ("JavaScript", 0.8),
    ("React", 0.6),
    ("Java", 0.5),
    ("SQL", 0.8),
    ("Git", 0.9),
    ("HTML", 0.7),
    ("CSS", 0.7),
    ("Node.js", 0.5),
    ("PostgreSQL", 0.4),
    ("AWS", 0.6),
    ("Docker", 0.4),
    ("TypeScript", 0.4),
    ("Django", 0.3),
    ("Flask", 0.3),
    ("FastAPI", 0.2),
    ("Vue.js", 0.3),
    ("Angular", 0.4),
    ("MongoDB", 0.3),
    ("Redis", 0.2),
    ("Linux", 0.4),
    ("REST API", 0.6),
    ("GraphQL", 0.2),
    ("Kubernetes", 0.2),
    ("Azure", 0.3),
    ("GCP", 0.2),
    ("Jenkins", 0.2),
    ("Pandas", 0.3),
    ("NumPy", 0.2),
    ("Machine Learning", 0.3),
    ("TensorFlow", 0.1),
    ("Agile", 0.5),
    ("Scrum", 0.4),
    ("CI/CD", 0.3),
];

const MIN_SKILLS: usize = 3;

const DESCRIPTIONS: &[&str] = &[
    "Join our team to develop innovative software solutions using modern technologies. Work on exciting projects that impact millions of users.",
    "We're seeking a talented developer to build scalable web applications and contribute to our growing platform.",
    "Exciting opportunity to work with cutting-edge technology in a collaborative environment. Build the future of digital solutions.",
    "Join a fast-growing company where you'll design and implement robust software systems that drive business growth.",
    "Work on challenging problems with a team of experienced engineers. Opportunity to learn and grow your technical skills.",
    "Build high-performance applications that serve thousands of users daily. Work with modern tech stack and best practices.",
    "Contribute to an innovative platform that's transforming the industry. Great opportunity for career development.",
    "Join our engineering team to create solutions that make a real difference. Work with latest frameworks and tools.",
];

/// Random source of synthetic postings.
pub struct JobGenerator {
    rng: StdRng,
}

impl JobGenerator {
    /// Generator seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible datasets.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick skills by their probabilities, topping up to at least three.
    fn generate_skills(&mut self) -> String {
        let mut selected: Vec<&str> = SKILLS
            .iter()
            .filter(|(_, probability)| self.rng.gen::<f64>() < *probability)
            .map(|(skill, _)| *skill)
            .collect();

        if selected.len() < MIN_SKILLS {
            let remaining: Vec<&str> = SKILLS
                .iter()
                .map(|(skill, _)| *skill)
                .filter(|skill| !selected.contains(skill))
                .collect();
            let missing = MIN_SKILLS - selected.len();
            selected.extend(remaining.choose_multiple(&mut self.rng, missing).copied());
        }

        selected.join(", ")
    }

    /// Base salary scaled by location and a +/-15% variation, to the nearest 1000.
    fn calculate_salary(&mut self, base: f64, multiplier: f64) -> f64 {
        let variation = self.rng.gen_range(0.85..=1.15);
        let salary = (base * multiplier * variation).trunc();
        (salary / 1000.0).round_ties_even() * 1000.0
    }

    fn determine_remote_type(&mut self, location: &str) -> &'static str {
        if location == REMOTE {
            REMOTE
        } else if self.rng.gen_bool(0.15) {
            HYBRID
        } else if self.rng.gen_bool(0.05) {
            REMOTE
        } else {
            ON_SITE
        }
    }

    /// Generate a single posting.
    pub fn generate_job(&mut self) -> NewJobPosting {
        let (title, base) = *TITLES.choose(&mut self.rng).unwrap_or(&TITLES[0]);
        let company = *COMPANIES.choose(&mut self.rng).unwrap_or(&COMPANIES[0]);
        let (location, multiplier) = *LOCATIONS.choose(&mut self.rng).unwrap_or(&LOCATIONS[0]);

        let salary = self.calculate_salary(base, multiplier);
        let salary_min = salary - f64::from(self.rng.gen_range(5000..=10000u32));
        let salary_max = salary + f64::from(self.rng.gen_range(5000..=15000u32));

        let skills = self.generate_skills();
        let description = *DESCRIPTIONS.choose(&mut self.rng).unwrap_or(&DESCRIPTIONS[0]);
        let remote = self.determine_remote_type(location);
        let days_ago: i64 = self.rng.gen_range(1..=30);
        let job_number: u32 = self.rng.gen_range(100000..=999999);

        NewJobPosting {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            salary_min: Some(salary_min),
            salary_max: Some(salary_max),
            salary_text: Some(format!(
                "{} - {}",
                format_usd(salary_min),
                format_usd(salary_max)
            )),
            skills: Some(skills),
            description: Some(description.to_string()),
            url: Some(format!("https://example-jobs.com/job/{}", job_number)),
            remote: Some(remote.to_string()),
            date_posted: Some(Utc::now() - Duration::days(days_ago)),
        }
    }

    /// Generate `count` postings.
    pub fn generate(&mut self, count: usize) -> Vec<NewJobPosting> {
        (0..count).map(|_| self.generate_job()).collect()
    }
}

impl Default for JobGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate `count` postings and write them to the store in one transaction.
pub fn generate_and_save(
    store: &JobStore,
    generator: &mut JobGenerator,
    count: usize,
    show_progress: bool,
) -> Result<usize> {
    info!("Generating {} synthetic job postings", count);
    let jobs = generator.generate(count);

    let progress = if show_progress {
        let pb = ProgressBar::new(count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} jobs")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let written = store
        .write(|m| {
            for job in &jobs {
                m.insert(job)?;
                if let Some(ref pb) = progress {
                    pb.inc(1);
                }
            }
            Ok(jobs.len())
        })
        .context("Failed to save generated jobs")?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!("Saved {} generated job postings", written);
    Ok(written)
}

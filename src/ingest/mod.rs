//! Producers of job postings: synthetic generation and scraped-listing import.

pub mod generator;
pub mod import;
pub mod normalize;

pub use generator::{generate_and_save, JobGenerator};
pub use import::import_file;

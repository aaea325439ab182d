use anyhow::{Context, Result};
use log::debug;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::models::Job;

const BUNDLED_CATALOG: &str = include_str!("../data/jobs.json");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("job at position {0} has an empty id")]
    EmptyId(usize),

    #[error("duplicate job id '{0}'")]
    DuplicateId(String),

    #[error("job '{id}' has an inverted salary range ({min} > {max})")]
    InvertedSalary { id: String, min: u32, max: u32 },
}

/// The catalog shipped with the binary.
pub fn bundled() -> Result<Vec<Job>> {
    parse(BUNDLED_CATALOG).context("Bundled catalog is invalid")
}

/// Loads a JSON array of jobs from `path`.
pub fn load(path: &Path) -> Result<Vec<Job>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid catalog: {}", path.display()))
}

/// Loads `path` when given, otherwise the bundled catalog.
pub fn open(path: Option<&Path>) -> Result<Vec<Job>> {
    let jobs = match path {
        Some(path) => load(path)?,
        None => bundled()?,
    };
    debug!(
        "loaded {} jobs from {}",
        jobs.len(),
        path.map_or_else(|| "bundled catalog".to_string(), |p| p.display().to_string())
    );
    Ok(jobs)
}

pub fn parse(content: &str) -> Result<Vec<Job>> {
    let jobs: Vec<Job> = serde_json::from_str(content).context("Failed to parse job list")?;
    validate(&jobs)?;
    Ok(jobs)
}

fn validate(jobs: &[Job]) -> Result<(), CatalogError> {
    let mut ids = HashSet::new();
    for (position, job) in jobs.iter().enumerate() {
        if job.id.trim().is_empty() {
            return Err(CatalogError::EmptyId(position));
        }
        if !ids.insert(job.id.as_str()) {
            return Err(CatalogError::DuplicateId(job.id.clone()));
        }
        if job.salary_range.min > job.salary_range.max {
            return Err(CatalogError::InvertedSalary {
                id: job.id.clone(),
                min: job.salary_range.min,
                max: job.salary_range.max,
            });
        }
    }
    Ok(())
}

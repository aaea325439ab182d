use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::models::{ExperienceLevel, Job};

/// Choices offered by the filter controls. Always computed from the full
/// catalog so the user can broaden a search back out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AvailableOptions {
    pub tags: Vec<String>,
    pub locations: Vec<String>,
}

impl AvailableOptions {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut seen_tags = HashSet::new();
        let mut seen_locations = HashSet::new();
        let mut options = Self::default();

        for job in jobs {
            for tag in &job.tags {
                if seen_tags.insert(tag.as_str()) {
                    options.tags.push(tag.clone());
                }
            }
            if seen_locations.insert(job.location.as_str()) {
                options.locations.push(job.location.clone());
            }
        }

        options
    }
}

/// Count of jobs per experience level. Levels with no job are absent.
pub fn experience_histogram(jobs: &[&Job]) -> BTreeMap<ExperienceLevel, usize> {
    let mut counts = BTreeMap::new();
    for job in jobs {
        *counts.entry(job.experience).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SalaryWindow {
    pub min: u32,
    pub max: u32,
}

/// Lowest salary floor and highest salary ceiling across `jobs`; `(0, 0)`
/// when there are none.
pub fn salary_window(jobs: &[&Job]) -> SalaryWindow {
    let min = jobs.iter().map(|j| j.salary_range.min).min();
    let max = jobs.iter().map(|j| j.salary_range.max).max();
    match (min, max) {
        (Some(min), Some(max)) => SalaryWindow { min, max },
        _ => SalaryWindow::default(),
    }
}

const SENIORITY_FALLBACK: &str = "Responsable & Manager";

/// Derived figures shown above the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub histogram: BTreeMap<ExperienceLevel, usize>,
    pub window: SalaryWindow,
}

impl Summary {
    pub fn of(jobs: &[&Job]) -> Self {
        Self {
            count: jobs.len(),
            histogram: experience_histogram(jobs),
            window: salary_window(jobs),
        }
    }

    /// `Senior (2) • Manager (1)`, or a generic target when nothing matched.
    pub fn seniority_line(&self) -> String {
        if self.histogram.is_empty() {
            return SENIORITY_FALLBACK.to_string();
        }
        self.histogram
            .iter()
            .map(|(level, n)| format!("{} ({})", level, n))
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

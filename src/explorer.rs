use log::debug;

use crate::filter::matching_indices;
use crate::models::{FilterCriteria, Job};
use crate::stats::{AvailableOptions, Summary};

/// Outcome of one pipeline run. Holds catalog indices so it stays valid
/// for as long as the explorer that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Results {
    indices: Vec<usize>,
    pub summary: Summary,
}

impl Results {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A browsing session over a fixed catalog. The criteria is the only
/// mutable state and is replaced as a whole on every change.
pub struct Explorer {
    jobs: Vec<Job>,
    options: AvailableOptions,
    criteria: FilterCriteria,
    results: Option<Results>,
}

impl Explorer {
    pub fn new(jobs: Vec<Job>, criteria: FilterCriteria) -> Self {
        let options = AvailableOptions::from_jobs(&jobs);
        let mut explorer = Self {
            jobs,
            options,
            criteria,
            results: None,
        };
        explorer.recompute();
        explorer
    }

    pub fn options(&self) -> &AvailableOptions {
        &self.options
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Latest pipeline output; `None` only before the first run.
    pub fn results(&self) -> Option<&Results> {
        self.results.as_ref()
    }

    pub fn filtered(&self) -> Vec<&Job> {
        match &self.results {
            Some(results) => results.indices.iter().map(|&i| &self.jobs[i]).collect(),
            None => Vec::new(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    /// Builds the next criteria from the current one and installs it.
    pub fn update(&mut self, next: impl FnOnce(&FilterCriteria) -> FilterCriteria) {
        let criteria = next(&self.criteria);
        self.set_criteria(criteria);
    }

    fn recompute(&mut self) {
        let indices = matching_indices(&self.jobs, &self.criteria);
        let filtered: Vec<&Job> = indices.iter().map(|&i| &self.jobs[i]).collect();
        let summary = Summary::of(&filtered);
        debug!(
            "recomputed results: {} of {} jobs match {:?}",
            summary.count,
            self.jobs.len(),
            self.criteria
        );
        self.results = Some(Results { indices, summary });
    }
}

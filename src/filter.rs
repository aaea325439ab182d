use crate::models::{FilterCriteria, Job};

/// Returns the jobs admitted by `criteria`, in catalog order.
#[allow(dead_code)]
pub fn apply_filters<'a>(jobs: &'a [Job], criteria: &FilterCriteria) -> Vec<&'a Job> {
    matching_indices(jobs, criteria)
        .into_iter()
        .map(|i| &jobs[i])
        .collect()
}

/// Catalog positions of the jobs admitted by `criteria`, ascending.
pub fn matching_indices(jobs: &[Job], criteria: &FilterCriteria) -> Vec<usize> {
    // Normalize the query once rather than per job.
    let query = criteria.query.trim().to_lowercase();
    jobs.iter()
        .enumerate()
        .filter(|(_, job)| admits(job, criteria, &query))
        .map(|(i, _)| i)
        .collect()
}

fn admits(job: &Job, criteria: &FilterCriteria, query: &str) -> bool {
    if !criteria.location.admits(&job.location) {
        return false;
    }

    if !criteria.contract_type.admits(&job.contract_type) {
        return false;
    }

    if !criteria.remote.admits(&job.remote) {
        return false;
    }

    // Only the lower bound counts; a high ceiling does not rescue a low floor.
    if u64::from(job.salary_range.min) < u64::from(criteria.min_salary) * 1000 {
        return false;
    }

    if !query.is_empty() && !haystack(job).contains(query) {
        return false;
    }

    criteria
        .tags
        .iter()
        .all(|tag| job.tags.iter().any(|t| t == tag))
}

/// Searchable text of a job: title, company, location, description, then
/// tags, missions and competences, space-joined and lower-cased.
fn haystack(job: &Job) -> String {
    [
        job.title.as_str(),
        job.company.as_str(),
        job.location.as_str(),
        job.description.as_str(),
    ]
    .into_iter()
    .chain(job.tags.iter().map(String::as_str))
    .chain(job.missions.iter().map(String::as_str))
    .chain(job.competences.iter().map(String::as_str))
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{
        AnalyticsHighlights, Choice, ContractType, ExperienceLevel, Extras, LocationFilter,
        RemoteMode, SalaryRange,
    };
    use chrono::NaiveDate;
    use proptest::prelude::*;

    pub(crate) fn job(id: &str) -> Job {
        Job {
            id: id.to_string(),
            title: format!("Contrôleur de gestion {}", id),
            company: "Acme Finance".to_string(),
            location: "Paris".to_string(),
            contract_type: ContractType::Cdi,
            experience: ExperienceLevel::Senior,
            salary_range: SalaryRange { min: 70000, max: 95000 },
            publish_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            remote: RemoteMode::Hybride,
            tags: vec![],
            missions: vec!["Piloter le budget".to_string()],
            competences: vec!["Excel avancé".to_string()],
            description: "Rattaché au DAF.".to_string(),
            tools: vec!["SAP".to_string()],
            analytics_highlights: AnalyticsHighlights {
                budget_responsibility: "5 M€".to_string(),
                team_size: "3".to_string(),
                reporting_to: "DAF".to_string(),
            },
            extras: Extras::default(),
        }
    }

    fn tagged(id: &str, tags: &[&str]) -> Job {
        Job {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..job(id)
        }
    }

    fn ids(jobs: &[&Job]) -> Vec<String> {
        jobs.iter().map(|j| j.id.clone()).collect()
    }

    #[test]
    fn test_unconstrained_returns_everything_in_order() {
        let jobs = vec![job("a"), job("b"), job("c")];
        let filtered = apply_filters(&jobs, &FilterCriteria::unconstrained());
        assert_eq!(ids(&filtered), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_location_exact_match() {
        let jobs = vec![
            job("a"),
            Job {
                location: "Lyon".to_string(),
                ..job("b")
            },
            Job {
                location: "Paris La Défense".to_string(),
                ..job("c")
            },
        ];
        let criteria = FilterCriteria::unconstrained()
            .with_location(LocationFilter::Only("Paris".to_string()));
        assert_eq!(ids(&apply_filters(&jobs, &criteria)), vec!["a"]);
    }

    #[test]
    fn test_contract_and_remote_filters() {
        let jobs = vec![
            job("a"),
            Job {
                contract_type: ContractType::Freelance,
                ..job("b")
            },
            Job {
                contract_type: ContractType::Freelance,
                remote: RemoteMode::Teletravail,
                ..job("c")
            },
        ];
        let criteria = FilterCriteria::unconstrained()
            .with_contract_type(Choice::Only(ContractType::Freelance));
        assert_eq!(ids(&apply_filters(&jobs, &criteria)), vec!["b", "c"]);

        let criteria = criteria.with_remote(Choice::Only(RemoteMode::Teletravail));
        assert_eq!(ids(&apply_filters(&jobs, &criteria)), vec!["c"]);
    }

    #[test]
    fn test_salary_uses_lower_bound_only() {
        let jobs = vec![Job {
            salary_range: SalaryRange { min: 55000, max: 90000 },
            ..job("a")
        }];
        let criteria = FilterCriteria::unconstrained().with_min_salary(60);
        assert!(apply_filters(&jobs, &criteria).is_empty());

        let criteria = criteria.with_min_salary(55);
        assert_eq!(apply_filters(&jobs, &criteria).len(), 1);
    }

    #[test]
    fn test_tags_require_all() {
        let jobs = vec![
            tagged("only-ifrs", &["IFRS"]),
            tagged("all", &["IFRS", "Budget", "Audit"]),
        ];
        let criteria = FilterCriteria::unconstrained().with_tags(["IFRS", "Budget"]);
        assert_eq!(ids(&apply_filters(&jobs, &criteria)), vec!["all"]);
    }

    #[test]
    fn test_tags_match_exactly() {
        let jobs = vec![tagged("a", &["IFRS 16"])];
        let criteria = FilterCriteria::unconstrained().with_tags(["IFRS"]);
        assert!(apply_filters(&jobs, &criteria).is_empty());
    }

    #[test]
    fn test_query_is_case_insensitive_across_fields() {
        let jobs = vec![tagged("a", &["IFRS"]), job("b")];
        let criteria = FilterCriteria::unconstrained().with_query("ifrs");
        assert_eq!(ids(&apply_filters(&jobs, &criteria)), vec!["a"]);

        let criteria = FilterCriteria::unconstrained().with_query("  EXCEL AVANCÉ ");
        assert_eq!(apply_filters(&jobs, &criteria).len(), 2);
    }

    #[test]
    fn test_query_spans_joined_fields() {
        // Adjacent fields are joined by a single space.
        let jobs = vec![job("a")];
        let criteria = FilterCriteria::unconstrained().with_query("acme finance paris");
        assert_eq!(apply_filters(&jobs, &criteria).len(), 1);
    }

    #[test]
    fn test_query_ignores_tools() {
        let jobs = vec![job("a")];
        let criteria = FilterCriteria::unconstrained().with_query("sap");
        assert!(apply_filters(&jobs, &criteria).is_empty());
    }

    #[test]
    fn test_blank_query_is_no_constraint() {
        let jobs = vec![job("a")];
        let criteria = FilterCriteria::unconstrained().with_query("   ");
        assert_eq!(apply_filters(&jobs, &criteria).len(), 1);
    }

    proptest! {
        #[test]
        fn prop_filter_is_ordered_subset(
            mins in proptest::collection::vec(40u32..130, 0..20),
            min_salary in 0u32..130,
        ) {
            let jobs: Vec<Job> = mins
                .iter()
                .enumerate()
                .map(|(i, m)| Job {
                    salary_range: SalaryRange { min: m * 1000, max: m * 1000 + 10000 },
                    ..job(&i.to_string())
                })
                .collect();
            let criteria = FilterCriteria::unconstrained().with_min_salary(min_salary);
            let filtered = apply_filters(&jobs, &criteria);

            let positions: Vec<usize> = filtered
                .iter()
                .map(|f| jobs.iter().position(|j| std::ptr::eq(j, *f)).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(
                filtered.len(),
                mins.iter().filter(|m| **m >= min_salary).count()
            );
        }
    }
}

mod catalog;
mod config;
mod explorer;
mod filter;
mod format;
mod models;
mod stats;
mod tags;
mod tui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::ConfigResult;
use explorer::Explorer;
use format::{format_date, format_salary, format_window, indented, truncate};
use log::{debug, warn};
use models::{Choice, ContractType, FilterCriteria, Job, LocationFilter, RemoteMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Explore finance & accounting job openings - search, filter, compare packages")]
struct Cli {
    /// JSON catalog to explore instead of the bundled one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Config file (defaults to the per-user scout/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs matching the filters
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print matching jobs as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show job details
    Show {
        /// Job ID
        id: String,
    },

    /// Show salary window and seniority mix of matching jobs
    Stats {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available tags (grouped) and locations
    Tags,

    /// Browse jobs interactively
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Keywords, matched case-insensitively against title, company, description, tags...
    #[arg(short, long)]
    query: Option<String>,

    /// Exact location ("Toutes" for any)
    #[arg(short, long)]
    location: Option<String>,

    /// Contract type (CDI, CDD, Intérim, Freelance, Stage, Tous)
    #[arg(short, long)]
    contract: Option<String>,

    /// Work mode (Hybride, Présentiel, Télétravail, Tous)
    #[arg(short, long)]
    remote: Option<String>,

    /// Minimum salary floor, in k€
    #[arg(short = 's', long)]
    min_salary: Option<u32>,

    /// Required tag; repeat to require several
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    /// Start from no constraints instead of the configured defaults
    #[arg(long)]
    all: bool,
}

impl FilterArgs {
    /// Overlays the flags given on the command line onto `base`.
    fn criteria(&self, base: &FilterCriteria) -> Result<FilterCriteria> {
        let mut criteria = if self.all {
            FilterCriteria::unconstrained()
        } else {
            base.clone()
        };

        if let Some(query) = &self.query {
            criteria = criteria.with_query(query.as_str());
        }
        if let Some(location) = &self.location {
            criteria = criteria.with_location(LocationFilter::from(location.as_str()));
        }
        if let Some(contract) = &self.contract {
            let contract: Choice<ContractType> = contract.parse()?;
            criteria = criteria.with_contract_type(contract);
        }
        if let Some(remote) = &self.remote {
            let remote: Choice<RemoteMode> = remote.parse()?;
            criteria = criteria.with_remote(remote);
        }
        if let Some(min_salary) = self.min_salary {
            criteria = criteria.with_min_salary(min_salary);
        }
        if !self.tags.is_empty() {
            criteria = criteria.with_tags(self.tags.iter().cloned());
        }

        Ok(criteria)
    }
}

/// Warns when a location filter names no known location, suggesting the closest one.
fn check_location(explorer: &Explorer) {
    let LocationFilter::Only(wanted) = &explorer.criteria().location else {
        return;
    };
    let known = &explorer.options().locations;
    if known.contains(wanted) {
        return;
    }

    let closest = known
        .iter()
        .map(|l| (l, strsim::jaro_winkler(&l.to_lowercase(), &wanted.to_lowercase())))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    warn!("Unknown location filter '{}'", wanted);
    match closest {
        Some((location, _)) => eprintln!(
            "Warning: no job in '{}'. Did you mean '{}'?",
            wanted, location
        ),
        None => eprintln!(
            "Warning: no job in '{}'. Known locations: {}",
            wanted,
            known.join(", ")
        ),
    }
}

fn print_summary(explorer: &Explorer) {
    let Some(results) = explorer.results() else {
        return;
    };
    let summary = &results.summary;
    println!();
    println!("Offres correspondant à vos critères: {}", summary.count);
    println!("Fourchette salariale constatée:      {}", format_window(&summary.window));
    println!("Seniorité ciblée:                    {}", summary.seniority_line());
}

fn print_job(job: &Job) {
    println!("{} ({})", job.title, job.id);
    println!("{}", job.company);
    println!(
        "{} • {} • {} • {}",
        job.location, job.contract_type, job.remote, job.experience
    );
    println!("Publié le {}", format_date(&job.publish_date));
    println!("Rémunération : {}", format_salary(&job.salary_range));
    println!();
    for line in indented(&job.description, 80, "") {
        println!("{}", line);
    }
    if !job.tags.is_empty() {
        println!("\nTags: {}", job.tags.join(", "));
    }

    let sections = [
        ("Missions clés", &job.missions),
        ("Compétences recherchées", &job.competences),
        ("Outils", &job.tools),
    ];
    for (label, items) in sections {
        if items.is_empty() {
            continue;
        }
        println!("\n{}:", label);
        for item in items.iter() {
            for line in indented(&format!("• {}", item), 80, "  ") {
                println!("{}", line);
            }
        }
    }

    let highlights = &job.analytics_highlights;
    println!("\nPilotage budgétaire: {}", highlights.budget_responsibility);
    println!("Taille d'équipe:     {}", highlights.team_size);
    println!("Rattachement:        {}", highlights.reporting_to);

    if !job.extras.languages.is_empty() {
        println!("\nLangues:    {}", job.extras.languages.join(", "));
    }
    if !job.extras.perks.is_empty() {
        println!("Avantages:  {}", job.extras.perks.join(", "));
    }
    if !job.extras.benefits.is_empty() {
        println!("Protection: {}", job.extras.benefits.join(", "));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let ConfigResult { config, warning } = config::load_config(cli.config.as_deref());
    if let Some(warning) = warning {
        eprintln!("Warning: {}", warning);
    }

    let catalog_path = cli.catalog.clone().or_else(|| config.catalog_path.clone());
    let jobs = catalog::open(catalog_path.as_deref())?;
    let defaults = config.initial_criteria();
    debug!("initial criteria: {:?}", defaults);

    match cli.command {
        Commands::List { filters, json } => {
            let explorer = Explorer::new(jobs, filters.criteria(&defaults)?);
            check_location(&explorer);
            let filtered = explorer.filtered();

            if json {
                let out = serde_json::to_string_pretty(&filtered)
                    .context("Failed to serialize jobs")?;
                println!("{}", out);
                return Ok(());
            }

            if filtered.is_empty() {
                println!("Aucun résultat pour ces filtres.");
                println!("Ajustez le salaire ou élargissez vos tags pour révéler davantage d'opportunités.");
            } else {
                println!(
                    "{:<26} {:<30} {:<20} {:<12} {:<10} {:>16}",
                    "ID", "TITLE", "COMPANY", "LOCATION", "CONTRACT", "SALARY"
                );
                println!("{}", "-".repeat(119));
                for job in &filtered {
                    println!(
                        "{:<26} {:<30} {:<20} {:<12} {:<10} {:>16}",
                        truncate(&job.id, 24),
                        truncate(&job.title, 28),
                        truncate(&job.company, 18),
                        truncate(&job.location, 12),
                        job.contract_type,
                        format_salary(&job.salary_range)
                    );
                }
            }
            print_summary(&explorer);
        }

        Commands::Show { id } => {
            let explorer = Explorer::new(jobs, FilterCriteria::unconstrained());
            match explorer.find(&id) {
                Some(job) => print_job(job),
                None => println!("Job '{}' not found.", id),
            }
        }

        Commands::Stats { filters, json } => {
            let explorer = Explorer::new(jobs, filters.criteria(&defaults)?);
            check_location(&explorer);
            let Some(results) = explorer.results() else {
                return Ok(());
            };

            if json {
                let out = serde_json::to_string_pretty(&results.summary)
                    .context("Failed to serialize summary")?;
                println!("{}", out);
                return Ok(());
            }

            print_summary(&explorer);
            if !results.summary.histogram.is_empty() {
                println!();
                for (level, count) in &results.summary.histogram {
                    println!("  {:<12} {:>3} {}", level.label(), count, "#".repeat(*count));
                }
            }
        }

        Commands::Tags => {
            let explorer = Explorer::new(jobs, defaults);
            let options = explorer.options();
            println!("Expertises:");
            for (group, tags) in tags::group_tags(&options.tags) {
                println!("  {}", group);
                println!("    {}", tags.join(", "));
            }
            println!("\nLocalisations:");
            for location in &options.locations {
                println!("  {}", location);
            }
        }

        Commands::Browse { filters } => {
            let explorer = Explorer::new(jobs, filters.criteria(&defaults)?);
            tui::run_browse(explorer)?;
        }
    }

    Ok(())
}

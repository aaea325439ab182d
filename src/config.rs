use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::{Choice, ContractType, FilterCriteria, LocationFilter, RemoteMode};

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON catalog to load instead of the bundled one.
    pub catalog_path: Option<PathBuf>,
    pub defaults: Defaults,
}

/// Startup filter values. Unset keys fall back to `FilterCriteria::default()`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub query: Option<String>,
    pub location: Option<LocationFilter>,
    pub contract_type: Option<Choice<ContractType>>,
    pub remote: Option<Choice<RemoteMode>>,
    pub min_salary: Option<u32>,
    pub tags: Option<Vec<String>>,
}

impl Config {
    pub fn initial_criteria(&self) -> FilterCriteria {
        let base = FilterCriteria::default();
        let d = &self.defaults;
        FilterCriteria {
            query: d.query.clone().unwrap_or(base.query),
            location: d.location.clone().unwrap_or(base.location),
            contract_type: d.contract_type.unwrap_or(base.contract_type),
            remote: d.remote.unwrap_or(base.remote),
            min_salary: d.min_salary.unwrap_or(base.min_salary),
            tags: Vec::new(),
        }
        .with_tags(d.tags.clone().unwrap_or(base.tags))
    }
}

pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

/// Loads the config from `path`, or from the per-user location when `None`.
/// A missing file gives defaults silently; a broken one gives defaults and a warning.
pub fn load_config(path: Option<&Path>) -> ConfigResult {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_path() {
            Some(p) => p,
            None => {
                debug!("No config directory available, using defaults");
                return ConfigResult {
                    config: Config::default(),
                    warning: None,
                };
            }
        },
    };

    debug!("Loading config from {}", path.display());

    if !path.exists() {
        debug!("Config file does not exist, using defaults");
        return ConfigResult {
            config: Config::default(),
            warning: None,
        };
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return ConfigResult {
                config: Config::default(),
                warning: Some(format!("Failed to read config: {}", e)),
            };
        }
    };

    match toml::from_str::<Config>(&contents) {
        Ok(config) => ConfigResult {
            config,
            warning: None,
        },
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            ConfigResult {
                config: Config::default(),
                warning: Some(format!("Invalid config: {}", e)),
            }
        }
    }
}

fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "scout").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_gives_defaults_without_warning() {
        let result = load_config(Some(Path::new("/definitely/not/here.toml")));
        assert_eq!(result.config, Config::default());
        assert!(result.warning.is_none());
        assert_eq!(result.config.initial_criteria(), FilterCriteria::default());
    }

    #[test]
    fn test_full_config() {
        let file = write_config(
            r#"
catalog_path = "/srv/jobs.json"

[defaults]
query = "ifrs"
location = "Lyon"
contract_type = "CDI"
remote = "teletravail"
min_salary = 80
tags = ["Consolidation IFRS", "Trésorerie", "Trésorerie"]
"#,
        );
        let result = load_config(Some(file.path()));
        assert!(result.warning.is_none());
        assert_eq!(result.config.catalog_path, Some(PathBuf::from("/srv/jobs.json")));

        let criteria = result.config.initial_criteria();
        assert_eq!(criteria.query, "ifrs");
        assert_eq!(criteria.location, LocationFilter::Only("Lyon".into()));
        assert_eq!(criteria.contract_type, Choice::Only(ContractType::Cdi));
        assert_eq!(criteria.remote, Choice::Only(RemoteMode::Teletravail));
        assert_eq!(criteria.min_salary, 80);
        assert_eq!(criteria.tags, vec!["Consolidation IFRS", "Trésorerie"]);
    }

    #[test]
    fn test_partial_defaults_keep_the_rest() {
        let file = write_config("[defaults]\nmin_salary = 0\n");
        let criteria = load_config(Some(file.path())).config.initial_criteria();
        assert_eq!(criteria, FilterCriteria::unconstrained());
    }

    #[test]
    fn test_sentinels_in_config() {
        let file = write_config("[defaults]\nlocation = \"Toutes\"\ncontract_type = \"Tous\"\n");
        let criteria = load_config(Some(file.path())).config.initial_criteria();
        assert_eq!(criteria.location, LocationFilter::Toutes);
        assert_eq!(criteria.contract_type, Choice::Tous);
    }

    #[test]
    fn test_invalid_config_warns_and_falls_back() {
        let file = write_config("[defaults]\ncontract_type = \"CDX\"\n");
        let result = load_config(Some(file.path()));
        assert_eq!(result.config, Config::default());
        let warning = result.warning.unwrap();
        assert!(warning.starts_with("Invalid config"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let file = write_config("colour = \"green\"\n");
        assert!(load_config(Some(file.path())).warning.is_some());
    }
}

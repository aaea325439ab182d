use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "CDI")]
    Cdi,
    #[serde(rename = "CDD")]
    Cdd,
    #[serde(rename = "Intérim")]
    Interim,
    Freelance,
    Stage,
}

impl ContractType {
    pub const ALL: [ContractType; 5] = [
        ContractType::Cdi,
        ContractType::Cdd,
        ContractType::Interim,
        ContractType::Freelance,
        ContractType::Stage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContractType::Cdi => "CDI",
            ContractType::Cdd => "CDD",
            ContractType::Interim => "Intérim",
            ContractType::Freelance => "Freelance",
            ContractType::Stage => "Stage",
        }
    }
}

// Declaration order is the display order of the seniority histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Responsable,
    Senior,
    Manager,
    Directeur,
    Expert,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 5] = [
        ExperienceLevel::Responsable,
        ExperienceLevel::Senior,
        ExperienceLevel::Manager,
        ExperienceLevel::Directeur,
        ExperienceLevel::Expert,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Responsable => "Responsable",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Manager => "Manager",
            ExperienceLevel::Directeur => "Directeur",
            ExperienceLevel::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteMode {
    Hybride,
    #[serde(rename = "Présentiel")]
    Presentiel,
    #[serde(rename = "Télétravail")]
    Teletravail,
}

impl RemoteMode {
    pub const ALL: [RemoteMode; 3] = [
        RemoteMode::Hybride,
        RemoteMode::Presentiel,
        RemoteMode::Teletravail,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RemoteMode::Hybride => "Hybride",
            RemoteMode::Presentiel => "Présentiel",
            RemoteMode::Teletravail => "Télétravail",
        }
    }
}

/// Lower-cases and strips the French accents used by the enumeration labels,
/// so `interim`, `Intérim` and `INTERIM` all compare equal.
fn fold_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'É' | 'È' | 'Ê' => 'e',
            'à' | 'â' | 'À' | 'Â' => 'a',
            'î' | 'Î' => 'i',
            'ô' | 'Ô' => 'o',
            'û' | 'ù' | 'Û' | 'Ù' => 'u',
            'ç' | 'Ç' => 'c',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

macro_rules! labelled_enum {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                let folded = fold_label(s);
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| fold_label(v.label()) == folded)
                    .ok_or_else(|| {
                        let known: Vec<&str> = $ty::ALL.iter().map(|v| v.label()).collect();
                        anyhow!("Unknown {} '{}'. Available: {}", $what, s, known.join(", "))
                    })
            }
        }
    };
}

labelled_enum!(ContractType, "contract type");
labelled_enum!(ExperienceLevel, "experience level");
labelled_enum!(RemoteMode, "remote mode");

/// Annual compensation bounds in currency units. Stored on disk as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
}

impl From<(u32, u32)> for SalaryRange {
    fn from((min, max): (u32, u32)) -> Self {
        Self { min, max }
    }
}

impl From<SalaryRange> for (u32, u32) {
    fn from(range: SalaryRange) -> Self {
        (range.min, range.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsHighlights {
    pub budget_responsibility: String,
    pub team_size: String,
    pub reporting_to: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Extras {
    pub languages: Vec<String>,
    pub perks: Vec<String>,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub contract_type: ContractType,
    pub experience: ExperienceLevel,
    pub salary_range: SalaryRange,
    pub publish_date: NaiveDate,
    pub remote: RemoteMode,
    pub tags: Vec<String>,
    pub missions: Vec<String>,
    pub competences: Vec<String>,
    pub description: String,
    pub tools: Vec<String>,
    // The catalog format spells it this way.
    #[serde(rename = "analysticsHighlights")]
    pub analytics_highlights: AnalyticsHighlights,
    pub extras: Extras,
}

/// An enumeration filter: either `Tous` (no constraint) or one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Choice<T> {
    #[default]
    Tous,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::Tous => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl<T: Copy + PartialEq> Choice<T> {
    /// Next option in `Tous, ALL[0], ALL[1], ..., Tous` order.
    pub fn cycle(&self, all: &[T]) -> Self {
        match self {
            Choice::Tous => all.first().copied().map_or(Choice::Tous, Choice::Only),
            Choice::Only(current) => {
                let pos = all.iter().position(|v| v == current);
                match pos.and_then(|i| all.get(i + 1)) {
                    Some(next) => Choice::Only(*next),
                    None => Choice::Tous,
                }
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Tous => f.write_str("Tous"),
            Choice::Only(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl<T> FromStr for Choice<T>
where
    T: FromStr<Err = anyhow::Error>,
{
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if fold_label(s) == "tous" {
            Ok(Choice::Tous)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

impl<T: fmt::Display> Serialize for Choice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Choice<T>
where
    T: FromStr<Err = anyhow::Error>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Location filter: `Toutes` (no constraint) or an exact location string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationFilter {
    #[default]
    Toutes,
    Only(String),
}

impl LocationFilter {
    pub fn admits(&self, location: &str) -> bool {
        match self {
            LocationFilter::Toutes => true,
            LocationFilter::Only(wanted) => wanted == location,
        }
    }

    /// Next location in `Toutes, available[0], ..., Toutes` order.
    pub fn cycle(&self, available: &[String]) -> Self {
        let next = match self {
            LocationFilter::Toutes => available.first(),
            LocationFilter::Only(current) => available
                .iter()
                .position(|l| l == current)
                .and_then(|i| available.get(i + 1)),
        };
        next.map_or(LocationFilter::Toutes, |l| LocationFilter::Only(l.clone()))
    }
}

impl fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationFilter::Toutes => f.write_str("Toutes"),
            LocationFilter::Only(l) => f.write_str(l),
        }
    }
}

impl From<&str> for LocationFilter {
    fn from(s: &str) -> Self {
        if s.trim() == "Toutes" || s.trim().is_empty() {
            LocationFilter::Toutes
        } else {
            LocationFilter::Only(s.to_string())
        }
    }
}

impl Serialize for LocationFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocationFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(LocationFilter::from(raw.as_str()))
    }
}

pub const DEFAULT_MIN_SALARY: u32 = 60;

/// The user's current constraints. Treated as a value: every `with_*`
/// method returns a new criteria instead of mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub query: String,
    pub location: LocationFilter,
    pub contract_type: Choice<ContractType>,
    pub remote: Choice<RemoteMode>,
    /// In thousands of currency units.
    pub min_salary: u32,
    pub tags: Vec<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_salary: DEFAULT_MIN_SALARY,
            ..Self::unconstrained()
        }
    }
}

impl FilterCriteria {
    /// Every dimension at its sentinel: admits the whole catalog.
    pub fn unconstrained() -> Self {
        Self {
            query: String::new(),
            location: LocationFilter::Toutes,
            contract_type: Choice::Tous,
            remote: Choice::Tous,
            min_salary: 0,
            tags: Vec::new(),
        }
    }

    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self.clone()
        }
    }

    pub fn with_location(&self, location: LocationFilter) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }

    pub fn with_contract_type(&self, contract_type: Choice<ContractType>) -> Self {
        Self {
            contract_type,
            ..self.clone()
        }
    }

    pub fn with_remote(&self, remote: Choice<RemoteMode>) -> Self {
        Self {
            remote,
            ..self.clone()
        }
    }

    pub fn with_min_salary(&self, min_salary: u32) -> Self {
        Self {
            min_salary,
            ..self.clone()
        }
    }

    pub fn with_tags<I, S>(&self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = Self {
            tags: Vec::new(),
            ..self.clone()
        };
        for tag in tags {
            let tag = tag.into();
            if !next.tags.contains(&tag) {
                next.tags.push(tag);
            }
        }
        next
    }

    /// Adds `tag` if absent, removes it if present.
    pub fn toggle_tag(&self, tag: &str) -> Self {
        let mut tags = self.tags.clone();
        if let Some(pos) = tags.iter().position(|t| t == tag) {
            tags.remove(pos);
        } else {
            tags.push(tag.to_string());
        }
        Self {
            tags,
            ..self.clone()
        }
    }
}

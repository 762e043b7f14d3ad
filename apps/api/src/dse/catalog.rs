//! University program catalog: the static dataset the matcher scores against.
//!
//! Loaded once at startup from the bundled `data/programs.json` (or a file
//! named by `CATALOG_PATH`) and shared read-only as `Arc<Catalog>`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dse::scores::{is_core_subject, is_elective_subject};

const BUNDLED_CATALOG: &str = include_str!("../../data/programs.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// A set of electives that share one weight entry, keyed by `key` in a
/// program's `weighted_subjects` (e.g. `"M1/M2"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterchangeableGroup {
    pub key: String,
    pub members: Vec<String>,
}

impl InterchangeableGroup {
    pub fn contains(&self, subject: &str) -> bool {
        self.members.iter().any(|m| m == subject)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub code: String,
    pub min_score: f64,
    #[serde(default)]
    pub weighted_subjects: BTreeMap<String, f64>,
    /// Core subject to minimum grade points.
    #[serde(default)]
    pub core_requirements: BTreeMap<String, u8>,
    /// Accepted electives; empty means any.
    #[serde(default)]
    pub elective_requirements: Vec<String>,
}

impl Program {
    /// Weight applied to an elective's points. Explicit subject weight first,
    /// then the shared weight of the subject's interchangeable group, else 1.
    pub fn weight_for(&self, subject: &str, groups: &[InterchangeableGroup]) -> f64 {
        if let Some(weight) = self.weighted_subjects.get(subject) {
            return *weight;
        }
        groups
            .iter()
            .find(|g| g.contains(subject))
            .and_then(|g| self.weighted_subjects.get(&g.key).copied())
            .unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct University {
    pub university: String,
    pub abbreviation: String,
    pub programs: Vec<Program>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub interchangeable_groups: Vec<InterchangeableGroup>,
    pub universities: Vec<University>,
}

impl Catalog {
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.check()?;
        Ok(catalog)
    }

    /// Every program in catalog order, paired with its university.
    pub fn programs(&self) -> impl Iterator<Item = (&University, &Program)> {
        self.universities
            .iter()
            .flat_map(|u| u.programs.iter().map(move |p| (u, p)))
    }

    pub fn program_count(&self) -> usize {
        self.universities.iter().map(|u| u.programs.len()).sum()
    }

    fn check(&self) -> Result<(), CatalogError> {
        for group in &self.interchangeable_groups {
            if let Some(bad) = group.members.iter().find(|m| !is_elective_subject(m)) {
                return Err(CatalogError::Invalid(format!(
                    "group {} lists unknown elective {bad}",
                    group.key
                )));
            }
        }

        for (uni, program) in self.programs() {
            let label = format!("{} {}", uni.abbreviation, program.code);
            if let Some(bad) = program
                .core_requirements
                .keys()
                .find(|s| !is_core_subject(s))
            {
                return Err(CatalogError::Invalid(format!(
                    "{label}: core requirement on non-core subject {bad}"
                )));
            }
            if let Some(bad) = program
                .elective_requirements
                .iter()
                .find(|s| !is_elective_subject(s))
            {
                return Err(CatalogError::Invalid(format!(
                    "{label}: unknown accepted elective {bad}"
                )));
            }
            if let Some((subject, weight)) = program
                .weighted_subjects
                .iter()
                .find(|(_, w)| !w.is_finite() || **w < 0.0)
            {
                return Err(CatalogError::Invalid(format!(
                    "{label}: weight {weight} for {subject} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    constraint::CompactnessMetric,
    objective::{Constraint, Objective},
};

/// Constraint names accepted in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintName {
    Population,
    Compactness,
    Segregation,
    Similarity,
    CountySplit,
}

fn default_weight() -> f64 { 1.0 }

/// One weighted constraint entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintConfig {
    pub constraint: ConstraintName,
    /// Required for `compactness`, rejected otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<CompactnessMetric>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// Serializable description of an [`Objective`].
///
/// ```json
/// { "constraints": [
///     { "constraint": "population", "weight": 10.0 },
///     { "constraint": "compactness", "metric": "polsby-popper", "weight": 0.5 },
///     { "constraint": "county-split" }
/// ] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectiveConfig {
    pub constraints: Vec<ConstraintConfig>,
}

impl ObjectiveConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse objective configuration")
    }

    /// Read a configuration from a JSON file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to read objective configuration: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse objective configuration: {}", path.display()))
    }

    /// Serialize the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the objective described by this configuration.
    pub fn into_objective(self) -> Result<Objective> {
        let mut constraints = Vec::with_capacity(self.constraints.len());
        let mut weights = Vec::with_capacity(self.constraints.len());

        for (i, entry) in self.constraints.into_iter().enumerate() {
            ensure!(entry.weight.is_finite() && entry.weight >= 0.0,
                "[ObjectiveConfig] constraint {i} has invalid weight {}", entry.weight);

            let constraint = match (entry.constraint, entry.metric) {
                (ConstraintName::Compactness, Some(metric)) => Constraint::Compactness(metric),
                (ConstraintName::Compactness, None) =>
                    bail!("[ObjectiveConfig] constraint {i} (compactness) requires a metric"),
                (name, Some(metric)) =>
                    bail!("[ObjectiveConfig] constraint {i} ({name:?}) does not take a metric, got '{metric}'"),
                (ConstraintName::Population, None) => Constraint::Population,
                (ConstraintName::Segregation, None) => Constraint::Segregation,
                (ConstraintName::Similarity, None) => Constraint::Similarity,
                (ConstraintName::CountySplit, None) => Constraint::CountySplit,
            };

            constraints.push(constraint);
            weights.push(entry.weight);
        }

        Objective::new(constraints, Some(weights))
    }
}

use std::fmt;

use anyhow::{Context, Result};

use crate::{
    constraint::{Compactness, CompactnessMetric, Psi},
    objective::UnitData,
    plan::Proposal,
};

/// A single constraint term used in an [`Objective`](crate::Objective).
/// This does *not* carry a weight; weights live in `Objective`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Population balance against parity.
    Population,
    /// District compactness under the given metric.
    Compactness(CompactnessMetric),
    /// Dissimilarity of a subgroup across districts.
    Segregation,
    /// Disagreement with the reference plan.
    Similarity,
    /// Two-way fragmentation between counties and districts.
    CountySplit,
}

impl Constraint {
    /// Get a short name for this constraint (for display purposes).
    pub fn short_name(&self) -> &'static str {
        match self {
            Constraint::Population => "Population",
            Constraint::Compactness(CompactnessMetric::FryerHolden) => "CompactnessFryerHolden",
            Constraint::Compactness(CompactnessMetric::PolsbyPopper) => "CompactnessPolsbyPopper",
            Constraint::Segregation => "Segregation",
            Constraint::Similarity => "Similarity",
            Constraint::CountySplit => "CountySplit",
        }
    }

    /// Evaluate this constraint for a proposal, reading whatever unit data it needs.
    pub fn compute(&self, units: &UnitData, proposal: &Proposal) -> Result<Psi> {
        let missing = |what: &str| format!("[Constraint.{}] unit data has no {what}", self.short_name());

        match self {
            Constraint::Population => proposal.population_psi(units.populations()),
            Constraint::Compactness(CompactnessMetric::FryerHolden) => {
                let (ssd, denominator) = units.distances().with_context(|| missing("distance matrix"))?;
                proposal.compactness_psi(&Compactness::FryerHolden {
                    ssd: ssd.view(),
                    populations: units.populations(),
                    denominator,
                })
            }
            Constraint::Compactness(CompactnessMetric::PolsbyPopper) => {
                let areas = units.areas().with_context(|| missing("areas"))?;
                proposal.compactness_psi(&Compactness::PolsbyPopper { graph: units.graph(), areas })
            }
            Constraint::Segregation => {
                let group = units.group_populations().with_context(|| missing("group populations"))?;
                proposal.segregation_psi(units.populations(), group)
            }
            Constraint::Similarity => {
                let reference = units.reference().with_context(|| missing("reference plan"))?;
                proposal.similarity_psi(reference)
            }
            Constraint::CountySplit => {
                let counties = units.counties().with_context(|| missing("counties"))?;
                proposal.county_split_psi(counties, units.populations())
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Compactness(metric) => write!(f, "Compactness(metric='{metric}')"),
            _ => f.write_str(self.short_name()),
        }
    }
}

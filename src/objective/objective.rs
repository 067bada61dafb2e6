//! Weighted combination of constraint penalties.
//!
//! This is the energy a sampler feeds into its acceptance ratio or importance
//! weight: each constraint's psi is scaled by its strength and the results are
//! summed, separately for the plan before and after the move.

use anyhow::{ensure, Result};
use tracing::debug;

use crate::{
    constraint::Psi,
    objective::{Constraint, UnitData},
    plan::Proposal,
};

/// A set of constraints and their strengths.
///
/// In the simplest form, this represents:
///
/// ```text
/// psi(plan) = sum_i weights[i] * constraint_i(plan)
/// ```
///
/// evaluated on both sides of a proposal.
#[derive(Clone)]
pub struct Objective {
    constraints: Vec<Constraint>,
    weights: Vec<f64>,
}

impl Objective {
    /// Construct a new Objective from a list of constraints and an optional
    /// list of weights.
    ///
    /// If `weights` is `None`, all constraints default to weight 1.0.
    /// If `Some`, the length must match `constraints.len()`.
    pub fn new(constraints: Vec<Constraint>, weights: Option<Vec<f64>>) -> Result<Self> {
        let weights = weights.unwrap_or_else(|| vec![1.0; constraints.len()]);
        ensure!(weights.len() == constraints.len(),
            "[Objective.new] weights length ({}) must match constraints length ({})",
            weights.len(), constraints.len());

        Ok(Self { constraints, weights })
    }

    /// Number of constraint terms in this objective.
    #[inline] pub fn num_constraints(&self) -> usize { self.constraints.len() }

    /// Accessor for constraints.
    #[inline] pub fn constraints(&self) -> &[Constraint] { &self.constraints }

    /// Accessor for weights vector.
    #[inline] pub fn weights(&self) -> &[f64] { &self.weights }

    /// Replace the current weights with a new vector (length must match num_constraints).
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        ensure!(weights.len() == self.constraints.len(),
            "[Objective.set_weights] weights length ({}) must match constraints length ({})",
            weights.len(), self.constraints.len());

        self.weights = weights;
        Ok(())
    }

    /// Unweighted psi of every constraint, in order.
    pub fn breakdown(&self, units: &UnitData, proposal: &Proposal) -> Result<Vec<Psi>> {
        ensure!(proposal.num_units() == units.num_units(),
            "[Objective] proposal covers {} units but unit data has {}",
            proposal.num_units(), units.num_units());

        self.constraints.iter()
            .map(|constraint| constraint.compute(units, proposal))
            .collect()
    }

    /// Weighted sum of constraint penalties for both sides of the proposal.
    pub fn compute(&self, units: &UnitData, proposal: &Proposal) -> Result<Psi> {
        let values = self.breakdown(units, proposal)?;

        let mut total = Psi::default();
        for ((constraint, &weight), psi) in self.constraints.iter().zip(&self.weights).zip(values) {
            debug!(constraint = constraint.short_name(), new = psi.new, old = psi.old, weight, "constraint psi");
            total += psi * weight;
        }

        Ok(total)
    }
}

use std::fmt;

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Objective {{")?;
        for (i, (constraint, weight)) in self.constraints.iter().zip(&self.weights).enumerate() {
            writeln!(f, "  {:2}: {} * weight={}", i, constraint, weight)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use crate::{constraint::CompactnessMetric, graph::Graph};

    use super::*;

    fn units() -> UnitData {
        // 0 - 1
        // |   |
        // 2 - 3
        let graph = Graph::new(&[
            vec![(1, 1.0), (2, 1.0)],
            vec![(0, 1.0), (3, 1.0)],
            vec![(0, 1.0), (3, 1.0)],
            vec![(1, 1.0), (2, 1.0)],
        ]).unwrap();

        UnitData::new(graph, vec![100, 100, 100, 100]).unwrap()
            .with_group_populations(vec![50, 50, 20, 80]).unwrap()
            .with_reference(vec![0, 0, 1, 1]).unwrap()
            .with_counties(vec![0, 0, 1, 1]).unwrap()
            .with_distances(array![
                [0.0, 1.0, 1.0, 2.0],
                [1.0, 0.0, 2.0, 1.0],
                [1.0, 2.0, 0.0, 1.0],
                [2.0, 1.0, 1.0, 0.0],
            ], 1e4).unwrap()
    }

    #[test]
    fn weighted_sum_of_breakdown() {
        let units = units();
        let current = [0, 0, 1, 1];
        let new = [0, 1, 0, 1];
        let proposal = Proposal::new(&current, &new, &[0, 1]).unwrap();

        let objective = Objective::new(
            vec![
                Constraint::Population,
                Constraint::Segregation,
                Constraint::Similarity,
                Constraint::CountySplit,
                Constraint::Compactness(CompactnessMetric::FryerHolden),
            ],
            Some(vec![1.0, 2.0, 0.5, 0.0, 3.0]),
        ).unwrap();

        let parts = objective.breakdown(&units, &proposal).unwrap();
        assert_eq!(parts.len(), 5);

        let expect = parts.iter().zip(objective.weights())
            .fold(Psi::default(), |acc, (&psi, &w)| acc + psi * w);
        let total = objective.compute(&units, &proposal).unwrap();
        assert!((total.new - expect.new).abs() < 1e-12);
        assert!((total.old - expect.old).abs() < 1e-12);
    }

    #[test]
    fn default_weights_are_one() {
        let objective = Objective::new(vec![Constraint::Population, Constraint::Similarity], None).unwrap();
        assert_eq!(objective.weights(), &[1.0, 1.0]);
        assert_eq!(objective.num_constraints(), 2);
    }

    #[test]
    fn weight_length_must_match() {
        assert!(Objective::new(vec![Constraint::Population], Some(vec![1.0, 2.0])).is_err());

        let mut objective = Objective::new(vec![Constraint::Population], None).unwrap();
        assert!(objective.set_weights(vec![]).is_err());
        objective.set_weights(vec![4.0]).unwrap();
        assert_eq!(objective.weights(), &[4.0]);
    }

    #[test]
    fn rejects_proposal_of_other_size() {
        let objective = Objective::new(vec![Constraint::Population], None).unwrap();
        let proposal = Proposal::new(&[0, 1], &[1, 1], &[0, 1]).unwrap();
        assert!(objective.compute(&units(), &proposal).is_err());
    }

    #[test]
    fn display_lists_terms() {
        let objective = Objective::new(
            vec![Constraint::Population, Constraint::Compactness(CompactnessMetric::PolsbyPopper)],
            Some(vec![1.0, 0.5]),
        ).unwrap();
        let text = objective.to_string();
        assert!(text.contains("Population * weight=1"));
        assert!(text.contains("Compactness(metric='polsby-popper') * weight=0.5"));
    }
}

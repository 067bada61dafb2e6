use anyhow::{ensure, Result};
use ndarray::Array2;

use crate::graph::Graph;

/// Fixed per-unit inputs a chain is scored against.
///
/// Only the adjacency graph and populations are required; the remaining
/// fields are needed by specific constraints and can be attached with the
/// `with_*` builders.
#[derive(Clone, Debug)]
pub struct UnitData {
    graph: Graph,
    populations: Vec<u32>,
    areas: Option<Vec<f64>>,
    group_populations: Option<Vec<u32>>,
    counties: Option<Vec<u32>>,
    reference: Option<Vec<u32>>,
    distances: Option<(Array2<f64>, f64)>,
}

impl UnitData {
    /// Create unit data from the adjacency graph and unit populations.
    pub fn new(graph: Graph, populations: Vec<u32>) -> Result<Self> {
        ensure!(populations.len() == graph.node_count(),
            "[UnitData.new] populations length ({}) must match node count ({})",
            populations.len(), graph.node_count());

        Ok(Self {
            graph,
            populations,
            areas: None,
            group_populations: None,
            counties: None,
            reference: None,
            distances: None,
        })
    }

    #[inline]
    fn check_len(&self, what: &str, len: usize) -> Result<()> {
        ensure!(len == self.num_units(),
            "[UnitData] {what} length ({len}) must match number of units ({})", self.num_units());
        Ok(())
    }

    /// Attach unit land areas (for Polsby-Popper compactness).
    pub fn with_areas(mut self, areas: Vec<f64>) -> Result<Self> {
        self.check_len("areas", areas.len())?;
        ensure!(areas.iter().all(|a| a.is_finite() && *a >= 0.0),
            "[UnitData] areas must be finite and non-negative");
        self.areas = Some(areas);
        Ok(self)
    }

    /// Attach subgroup populations (for segregation).
    pub fn with_group_populations(mut self, group_populations: Vec<u32>) -> Result<Self> {
        self.check_len("group populations", group_populations.len())?;
        ensure!(group_populations.iter().zip(&self.populations).all(|(group, pop)| group <= pop),
            "[UnitData] subgroup population must not exceed unit population");
        self.group_populations = Some(group_populations);
        Ok(self)
    }

    /// Attach county labels (for county splits).
    pub fn with_counties(mut self, counties: Vec<u32>) -> Result<Self> {
        self.check_len("counties", counties.len())?;
        self.counties = Some(counties);
        Ok(self)
    }

    /// Attach the reference plan (for similarity).
    pub fn with_reference(mut self, reference: Vec<u32>) -> Result<Self> {
        self.check_len("reference plan", reference.len())?;
        self.reference = Some(reference);
        Ok(self)
    }

    /// Attach the squared-distance matrix and its normalizing constant (for
    /// Fryer-Holden compactness).
    pub fn with_distances(mut self, ssd: Array2<f64>, denominator: f64) -> Result<Self> {
        let n = self.num_units();
        ensure!(ssd.dim() == (n, n), "[UnitData] distance matrix shape {:?} must be ({n}, {n})", ssd.dim());
        ensure!(denominator.is_finite() && denominator != 0.0,
            "[UnitData] distance denominator must be finite and non-zero, got {denominator}");
        self.distances = Some((ssd, denominator));
        Ok(self)
    }

    /// Attach the squared-distance matrix with the default normalizing constant of 1.
    pub fn with_distances_unnormalized(self, ssd: Array2<f64>) -> Result<Self> {
        self.with_distances(ssd, 1.0)
    }

    #[inline] pub fn num_units(&self) -> usize { self.populations.len() }
    #[inline] pub fn graph(&self) -> &Graph { &self.graph }
    #[inline] pub fn populations(&self) -> &[u32] { &self.populations }
    #[inline] pub fn areas(&self) -> Option<&[f64]> { self.areas.as_deref() }
    #[inline] pub fn group_populations(&self) -> Option<&[u32]> { self.group_populations.as_deref() }
    #[inline] pub fn counties(&self) -> Option<&[u32]> { self.counties.as_deref() }
    #[inline] pub fn reference(&self) -> Option<&[u32]> { self.reference.as_deref() }
    #[inline] pub fn distances(&self) -> Option<(&Array2<f64>, f64)> { self.distances.as_ref().map(|(ssd, d)| (ssd, *d)) }
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;

    fn path3() -> Graph {
        Graph::unweighted(&[vec![1], vec![0, 2], vec![1]]).unwrap()
    }

    #[test]
    fn builders_attach_optional_data() {
        let units = UnitData::new(path3(), vec![1, 2, 3]).unwrap()
            .with_areas(vec![1.0, 1.0, 2.0]).unwrap()
            .with_group_populations(vec![0, 2, 1]).unwrap()
            .with_counties(vec![5, 5, 6]).unwrap()
            .with_reference(vec![0, 0, 1]).unwrap()
            .with_distances(Array2::zeros((3, 3)), 2.0).unwrap();

        assert_eq!(units.num_units(), 3);
        assert_eq!(units.areas(), Some(&[1.0, 1.0, 2.0][..]));
        assert_eq!(units.counties(), Some(&[5, 5, 6][..]));
        assert_eq!(units.distances().map(|(_, d)| d), Some(2.0));
    }

    #[test]
    fn builders_validate_lengths() {
        assert!(UnitData::new(path3(), vec![1, 2]).is_err());

        let units = UnitData::new(path3(), vec![1, 2, 3]).unwrap();
        assert!(units.clone().with_areas(vec![1.0]).is_err());
        assert!(units.clone().with_areas(vec![1.0, -1.0, 0.0]).is_err());
        assert!(units.clone().with_group_populations(vec![2, 0, 0]).is_err());
        assert!(units.clone().with_counties(vec![0; 4]).is_err());
        assert!(units.clone().with_distances(Array2::zeros((2, 2)), 1.0).is_err());
        assert!(units.clone().with_distances(Array2::zeros((3, 3)), 0.0).is_err());
        assert!(units.with_distances_unnormalized(Array2::zeros((2, 2))).is_err());
    }

    #[test]
    fn unnormalized_distances_default_to_one() {
        let units = UnitData::new(path3(), vec![1, 2, 3]).unwrap()
            .with_distances_unnormalized(Array2::zeros((3, 3))).unwrap();
        assert_eq!(units.distances().map(|(_, d)| d), Some(1.0));
    }
}

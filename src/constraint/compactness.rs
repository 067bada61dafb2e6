use std::{f64::consts::PI, fmt, str::FromStr};

use anyhow::{bail, ensure, Result};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::{constraint::Psi, graph::Graph, plan::{Proposal, Side}};

/// Name of a compactness metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompactnessMetric {
    /// Population-weighted sum of squared pairwise distances (Fryer & Holden).
    FryerHolden,
    /// Negated area / perimeter ratio `-4πA / P²` (Polsby & Popper).
    PolsbyPopper,
}

impl CompactnessMetric {
    /// Get the metric's name as accepted by `from_str`.
    pub fn name(&self) -> &'static str {
        match self {
            CompactnessMetric::FryerHolden => "fryer-holden",
            CompactnessMetric::PolsbyPopper => "polsby-popper",
        }
    }
}

impl FromStr for CompactnessMetric {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "fryer-holden" => Ok(CompactnessMetric::FryerHolden),
            "polsby-popper" => Ok(CompactnessMetric::PolsbyPopper),
            _ => bail!("[CompactnessMetric] unknown metric '{name}' (expected 'fryer-holden' or 'polsby-popper')"),
        }
    }
}

impl fmt::Display for CompactnessMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// A compactness metric together with the per-unit data it reads.
#[derive(Clone, Copy, Debug)]
pub enum Compactness<'a> {
    FryerHolden {
        /// Symmetric `n x n` matrix of squared distances between units.
        ssd: ArrayView2<'a, f64>,
        populations: &'a [u32],
        /// Normalizing constant the summed moments are divided by.
        denominator: f64,
    },
    PolsbyPopper {
        /// Full adjacency, with border lengths.
        graph: &'a Graph,
        areas: &'a [f64],
    },
}

impl<'a> Compactness<'a> {
    /// Fryer-Holden data with the default normalizing constant of 1.
    pub fn fryer_holden(ssd: ArrayView2<'a, f64>, populations: &'a [u32]) -> Self {
        Compactness::FryerHolden { ssd, populations, denominator: 1.0 }
    }

    #[inline]
    pub fn metric(&self) -> CompactnessMetric {
        match self {
            Compactness::FryerHolden { .. } => CompactnessMetric::FryerHolden,
            Compactness::PolsbyPopper { .. } => CompactnessMetric::PolsbyPopper,
        }
    }
}

/// Sum of `ssd(j, k) * pop(j) * pop(k)` over unordered pairs of `units`.
fn moment(units: &[usize], ssd: &ArrayView2<f64>, populations: &[u32]) -> f64 {
    let mut sum = 0.0;
    for (i, &j) in units.iter().enumerate() {
        for &k in &units[i + 1..] {
            sum += ssd[[j, k]] * populations[j] as f64 * populations[k] as f64;
        }
    }
    sum
}

/// Sum of negated Polsby-Popper scores of the touched districts on one side.
///
/// The perimeter of a district sums the border lengths between pairs of its
/// boundary units, each pair counted once (from the lower index).
fn polsby_popper(proposal: &Proposal, side: Side, graph: &Graph, areas: &[f64]) -> f64 {
    let plan = proposal.plan(side);
    let boundary = &graph.boundary_of(&graph.restrict_by(plan));

    proposal.members(side).iter().zip(proposal.touched())
        .map(|(units, &label)| {
            let area = units.iter().map(|&unit| areas[unit]).sum::<f64>();
            let perimeter = units.iter()
                .filter(|&&unit| boundary[unit])
                .flat_map(|&unit| graph.edges_with_weights(unit)
                    .filter(move |&(other, _)| other > unit && boundary[other] && plan[other] == label)
                    .map(|(_, length)| length))
                .sum::<f64>();
            -4.0 * PI * area / (perimeter * perimeter)
        })
        .sum()
}

impl Proposal<'_> {
    /// Compactness penalty over the touched districts. Lower is more compact for
    /// both metrics.
    ///
    /// Polsby-Popper divides by the squared perimeter, so a touched district with
    /// no internal boundary edges scores `-inf`; reject such moves upstream.
    pub fn compactness_psi(&self, compactness: &Compactness) -> Result<Psi> {
        let op = format!("Proposal.compactness_psi({})", compactness.metric());
        match *compactness {
            Compactness::FryerHolden { ssd, populations, denominator } => {
                self.check_len(&op, "populations", populations.len())?;
                ensure!(ssd.dim() == (self.num_units(), self.num_units()),
                    "[{op}] distance matrix shape {:?} must be ({n}, {n})", ssd.dim(), n = self.num_units());
                ensure!(denominator.is_finite() && denominator != 0.0,
                    "[{op}] denominator must be finite and non-zero, got {denominator}");

                let score = |side| -> f64 {
                    self.members(side).iter()
                        .map(|units| moment(units, &ssd, populations) / denominator)
                        .sum()
                };

                Ok(Psi::new(score(Side::New), score(Side::Current)))
            }
            Compactness::PolsbyPopper { graph, areas } => {
                self.check_len(&op, "graph", graph.node_count())?;
                self.check_len(&op, "areas", areas.len())?;

                Ok(Psi::new(
                    polsby_popper(self, Side::New, graph, areas),
                    polsby_popper(self, Side::Current, graph, areas),
                ))
            }
        }
    }
}

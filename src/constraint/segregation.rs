use anyhow::{ensure, Result};

use crate::{constraint::{Psi, population::total}, plan::{Proposal, Side}};

impl Proposal<'_> {
    /// Dissimilarity-index penalty for a subgroup over the touched districts.
    ///
    /// With map totals `T` (population) and `p = G / T` (subgroup share), each
    /// district adds `pop * |share - p|`; the sum is divided by `2 T p (1 - p)`.
    /// A map-wide share of exactly 0 or 1, or an empty district, yields a
    /// non-finite result.
    pub fn segregation_psi(&self, populations: &[u32], group_populations: &[u32]) -> Result<Psi> {
        const OP: &str = "Proposal.segregation_psi";
        self.check_len(OP, "populations", populations.len())?;
        self.check_len(OP, "group_populations", group_populations.len())?;
        ensure!(populations.iter().zip(group_populations).all(|(pop, group)| group <= pop),
            "[{OP}] subgroup population must not exceed unit population");

        let total_pop = populations.iter().map(|&p| p as f64).sum::<f64>();
        let share = group_populations.iter().map(|&g| g as f64).sum::<f64>() / total_pop;
        let denominator = 2.0 * total_pop * share * (1.0 - share);

        let dissimilarity = |side| -> f64 {
            self.members(side).iter()
                .map(|units| {
                    let pop = total(units, populations) as f64;
                    let group = total(units, group_populations) as f64;
                    pop * (group / pop - share).abs()
                })
                .sum::<f64>() / denominator
        };

        Ok(Psi::new(dissimilarity(Side::New), dissimilarity(Side::Current)))
    }
}

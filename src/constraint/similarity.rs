use anyhow::Result;

use crate::{constraint::Psi, plan::{Proposal, Side}};

impl Proposal<'_> {
    /// Disagreement with a reference plan over the touched districts.
    ///
    /// For each touched label, the share of the reference district's units that
    /// carry the label is compared against 1; the shortfalls are averaged over the
    /// touched labels. A touched label absent from the reference plan yields NaN.
    pub fn similarity_psi(&self, reference: &[u32]) -> Result<Psi> {
        self.check_len("Proposal.similarity_psi", "reference plan", reference.len())?;

        let reference_sizes = self.touched().iter()
            .map(|&label| reference.iter().filter(|&&r| r == label).count() as f64)
            .collect::<Vec<_>>();

        let disagreement = |side| -> f64 {
            self.members(side).iter().zip(self.touched()).zip(&reference_sizes)
                .map(|((units, &label), &size)| {
                    let matched = units.iter().filter(|&&unit| reference[unit] == label).count();
                    (matched as f64 / size - 1.0).abs()
                })
                .sum::<f64>() / self.touched().len() as f64
        };

        Ok(Psi::new(disagreement(Side::New), disagreement(Side::Current)))
    }
}

use anyhow::Result;

use crate::{constraint::Psi, plan::{Proposal, Side}};

/// Sum of unit populations over a set of units.
#[inline]
pub(super) fn total(units: &[usize], populations: &[u32]) -> u64 {
    units.iter().map(|&unit| populations[unit] as u64).sum()
}

impl Proposal<'_> {
    /// Population balance penalty: the root of the summed squared relative
    /// deviations `(pop / parity - 1)^2` of each touched district.
    ///
    /// Parity is the map's total population over the number of districts the
    /// proposal spans: the largest label in either plan plus one. When the new
    /// plan introduces a label above every current label, this is larger than
    /// the current plan's district count.
    pub fn population_psi(&self, populations: &[u32]) -> Result<Psi> {
        self.check_len("Proposal.population_psi", "populations", populations.len())?;

        let parity = populations.iter().map(|&p| p as f64).sum::<f64>() / self.num_districts() as f64;
        let deviation = |side| -> f64 {
            self.members(side).iter()
                .map(|units| (total(units, populations) as f64 / parity - 1.0).powi(2))
                .sum::<f64>()
                .sqrt()
        };

        Ok(Psi::new(deviation(Side::New), deviation(Side::Current)))
    }
}

#[cfg(test)]
mod tests {
    use crate::plan::Proposal;

    #[test]
    fn two_unit_split_reaches_parity() {
        // Both units start in district 0; unit 1 moves to district 1.
        let populations = [100, 100];
        let current = [0, 0];
        let new = [0, 1];

        let proposal = Proposal::new(&current, &new, &[0, 1]).unwrap();
        let psi = proposal.population_psi(&populations).unwrap();

        // Parity is 100. Before: district 0 holds 200, district 1 holds 0.
        assert!((psi.old - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(psi.new, 0.0);
    }

    #[test]
    fn equal_districts_score_zero() {
        let populations = [10, 20, 30, 30, 20, 10];
        let current = [0, 0, 0, 1, 1, 1];
        let new = [0, 1, 0, 0, 1, 1];
        let proposal = Proposal::new(&current, &new, &[0, 1]).unwrap();
        let psi = proposal.population_psi(&populations).unwrap();

        assert_eq!(psi.old, 0.0);
        assert!(psi.new > 0.0);
    }

    #[test]
    fn only_touched_districts_are_scored() {
        let populations = [50, 50, 100, 300];
        let current = [0, 0, 1, 2];
        let new = [0, 1, 1, 2];

        let proposal = Proposal::new(&current, &new, &[0, 1]).unwrap();
        let psi = proposal.population_psi(&populations).unwrap();

        // parity = 500 / 3; district 2 is far off parity but untouched.
        let parity = 500.0 / 3.0;
        let expect_new = ((50.0 / parity - 1.0f64).powi(2) + (150.0 / parity - 1.0f64).powi(2)).sqrt();
        let expect_old = ((100.0 / parity - 1.0f64).powi(2) + (100.0 / parity - 1.0f64).powi(2)).sqrt();
        assert!((psi.new - expect_new).abs() < 1e-12);
        assert!((psi.old - expect_old).abs() < 1e-12);
    }

    #[test]
    fn squared_psi_is_additive_across_labels() {
        let populations = [5, 7, 11, 13, 17, 19];
        let current = [0, 0, 1, 1, 2, 2];
        let new = [0, 1, 1, 2, 2, 0];

        let whole = Proposal::new(&current, &new, &[0, 1, 2]).unwrap().population_psi(&populations).unwrap();
        let parts = [0, 1, 2].iter()
            .map(|&label| Proposal::new(&current, &new, &[label]).unwrap().population_psi(&populations).unwrap())
            .fold((0.0, 0.0), |(n, o), psi| (n + psi.new.powi(2), o + psi.old.powi(2)));

        assert!((whole.new.powi(2) - parts.0).abs() < 1e-12);
        assert!((whole.old.powi(2) - parts.1).abs() < 1e-12);
    }

    #[test]
    fn rejects_wrong_population_length() {
        let proposal = Proposal::new(&[0, 1], &[1, 1], &[0, 1]).unwrap();
        assert!(proposal.population_psi(&[1, 2, 3]).is_err());
    }
}

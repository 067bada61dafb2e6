use anyhow::{bail, ensure, Result};
use smallvec::SmallVec;

/// Which plan of a proposal to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The plan after the proposed move (`new_dists`).
    New,
    /// The plan before the proposed move (`current_dists`).
    Current,
}

/// A proposed move: the plan before it, the plan after it, and the district
/// labels whose member sets differ between the two.
///
/// Scorers only visit the touched labels, so a proposal with two touched
/// districts costs the same to score on a 4-district map as on a 400-district map.
#[derive(Clone, Debug)]
pub struct Proposal<'a> {
    current: &'a [u32],
    new: &'a [u32],
    touched: SmallVec<[u32; 4]>,
    num_districts: u32,
}

impl<'a> Proposal<'a> {
    /// Create a proposal from both plans and the labels touched by the move.
    ///
    /// Duplicate labels in `touched` are dropped (first occurrence wins).
    pub fn new(current: &'a [u32], new: &'a [u32], touched: &[u32]) -> Result<Self> {
        ensure!(!current.is_empty(), "[Proposal.new] plans must assign at least one unit");
        ensure!(new.len() == current.len(),
            "[Proposal.new] new_dists length ({}) must match current_dists length ({})",
            new.len(), current.len());
        ensure!(!touched.is_empty(), "[Proposal.new] touched label set must not be empty");

        let max_label = current.iter().chain(new).copied().max().unwrap_or(0);
        let mut labels = SmallVec::<[u32; 4]>::new();
        for &label in touched {
            ensure!(label <= max_label,
                "[Proposal.new] touched label {label} is not used by either plan (max label {max_label})");
            if !labels.contains(&label) { labels.push(label) }
        }

        Ok(Self { current, new, touched: labels, num_districts: max_label + 1 })
    }

    /// Create a proposal whose touched set is every label a moved unit leaves or joins.
    pub fn from_diff(current: &'a [u32], new: &'a [u32]) -> Result<Self> {
        ensure!(new.len() == current.len(),
            "[Proposal.from_diff] new_dists length ({}) must match current_dists length ({})",
            new.len(), current.len());

        let mut touched = SmallVec::<[u32; 4]>::new();
        for (&before, &after) in current.iter().zip(new) {
            if before == after { continue }
            if !touched.contains(&before) { touched.push(before) }
            if !touched.contains(&after) { touched.push(after) }
        }
        if touched.is_empty() { bail!("[Proposal.from_diff] plans are identical; nothing was moved") }

        Self::new(current, new, &touched)
    }

    /// Number of units in each plan.
    #[inline] pub fn num_units(&self) -> usize { self.current.len() }

    /// Number of districts spanned by the two plans (largest label in either + 1).
    #[inline] pub fn num_districts(&self) -> u32 { self.num_districts }

    /// The labels touched by the move.
    #[inline] pub fn touched(&self) -> &[u32] { &self.touched }

    /// The plan before the move.
    #[inline] pub fn current(&self) -> &'a [u32] { self.current }

    /// The plan after the move.
    #[inline] pub fn new_plan(&self) -> &'a [u32] { self.new }

    /// Get the assignment vector for one side of the proposal.
    #[inline]
    pub fn plan(&self, side: Side) -> &'a [u32] {
        match side {
            Side::New => self.new,
            Side::Current => self.current,
        }
    }

    /// Units assigned to each touched label on one side, aligned with `touched()`.
    /// Built in a single pass over the plan.
    pub(crate) fn members(&self, side: Side) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.touched.len()];
        for (unit, label) in self.plan(side).iter().enumerate() {
            if let Some(i) = self.touched.iter().position(|t| t == label) {
                members[i].push(unit);
            }
        }
        members
    }

    /// Check that a per-unit input has one entry per unit.
    pub(crate) fn check_len(&self, op: &str, what: &str, len: usize) -> Result<()> {
        ensure!(len == self.num_units(),
            "[{op}] {what} length ({len}) must match number of units ({})", self.num_units());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_dedups_touched_labels() {
        let current = [0, 0, 1, 1];
        let new = [0, 1, 1, 1];
        let proposal = Proposal::new(&current, &new, &[1, 0, 1]).unwrap();

        assert_eq!(proposal.touched(), &[1, 0]);
        assert_eq!(proposal.num_units(), 4);
        assert_eq!(proposal.num_districts(), 2);
    }

    #[test]
    fn num_districts_spans_both_plans() {
        let current = [0, 0, 0];
        let new = [0, 2, 1];
        let proposal = Proposal::new(&current, &new, &[0, 1, 2]).unwrap();
        assert_eq!(proposal.num_districts(), 3);
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let err = Proposal::new(&[0, 1], &[0], &[0]).unwrap_err();
        assert!(err.to_string().contains("must match current_dists length"));
    }

    #[test]
    fn new_rejects_unknown_label() {
        assert!(Proposal::new(&[0, 1], &[1, 1], &[5]).is_err());
    }

    #[test]
    fn new_rejects_empty_inputs() {
        assert!(Proposal::new(&[], &[], &[0]).is_err());
        assert!(Proposal::new(&[0], &[0], &[]).is_err());
    }

    #[test]
    fn from_diff_collects_source_and_destination() {
        let current = [0, 0, 1, 2, 2];
        let new = [0, 1, 1, 2, 0];
        let proposal = Proposal::from_diff(&current, &new).unwrap();
        assert_eq!(proposal.touched(), &[0, 1, 2]);
    }

    #[test]
    fn from_diff_rejects_identical_plans() {
        assert!(Proposal::from_diff(&[0, 1], &[0, 1]).is_err());
    }

    #[test]
    fn members_are_aligned_with_touched() {
        let current = [0, 0, 1, 1, 2];
        let new = [0, 1, 1, 1, 2];
        let proposal = Proposal::new(&current, &new, &[1, 0]).unwrap();

        assert_eq!(proposal.members(Side::New), vec![vec![1, 2, 3], vec![0]]);
        assert_eq!(proposal.members(Side::Current), vec![vec![2, 3], vec![0, 1]]);
    }
}

use ahash::{AHashMap, AHashSet};
use anyhow::{ensure, Result};

use crate::{constraint::Psi, plan::{Proposal, Side}};

/// Population of each `(county, district)` fragment among `units`, sorted by key
/// so that sums over fragments are reproducible.
fn fragments(units: impl Iterator<Item = usize>, plan: &[u32], counties: &[u32], populations: &[u32]) -> Vec<((u32, u32), u64)> {
    let mut overlap = AHashMap::<(u32, u32), u64>::new();
    for unit in units {
        *overlap.entry((counties[unit], plan[unit])).or_default() += populations[unit] as u64;
    }
    let mut fragments = overlap.into_iter().collect::<Vec<_>>();
    fragments.sort_unstable_by_key(|&(key, _)| key);
    fragments
}

/// Total population per label.
fn totals(units: impl Iterator<Item = usize>, labels: &[u32], populations: &[u32]) -> AHashMap<u32, u64> {
    let mut totals = AHashMap::<u32, u64>::new();
    for unit in units {
        *totals.entry(labels[unit]).or_default() += populations[unit] as u64;
    }
    totals
}

/// `total * sqrt(part / total)`, with an empty total contributing nothing.
#[inline]
fn weighted_root_share(part: u64, total: u64) -> f64 {
    if total == 0 { return 0.0 }
    total as f64 * (part as f64 / total as f64).sqrt()
}

/// Two-way split index of one plan over the given scope.
///
/// `county_scope` must hold every unit of each county it touches, and
/// `district_scope` every unit of each district it touches; county totals are
/// always map-wide.
fn split_index(
    plan: &[u32],
    counties: &[u32],
    populations: &[u32],
    county_totals: &AHashMap<u32, u64>,
    county_scope: &[usize],
    district_scope: &[usize],
) -> f64 {
    // County -> district: share of each county held by each district fragment.
    let over_counties = fragments(county_scope.iter().copied(), plan, counties, populations).into_iter()
        .map(|((county, _), pop)| weighted_root_share(pop, county_totals[&county]))
        .sum::<f64>();

    // District -> county: share of each district held by each county fragment.
    let district_totals = totals(district_scope.iter().copied(), plan, populations);
    let over_districts = fragments(district_scope.iter().copied(), plan, counties, populations).into_iter()
        .map(|((_, district), pop)| weighted_root_share(pop, district_totals[&district]))
        .sum::<f64>();

    over_counties + over_districts
}

/// County-split penalty of both plans over the whole map.
///
/// Each county contributes its population times the sum over the districts it
/// overlaps of `sqrt(fragment / county)`, and each district symmetrically
/// contributes its population times `sum sqrt(fragment / district)` over the
/// counties it overlaps. Plans whose districts nest cleanly in counties score lower.
pub fn county_split_psi(current: &[u32], new: &[u32], counties: &[u32], populations: &[u32]) -> Result<Psi> {
    const OP: &str = "county_split_psi";
    let n = current.len();
    ensure!(new.len() == n, "[{OP}] new_dists length ({}) must match current_dists length ({n})", new.len());
    ensure!(counties.len() == n, "[{OP}] counties length ({}) must match number of units ({n})", counties.len());
    ensure!(populations.len() == n, "[{OP}] populations length ({}) must match number of units ({n})", populations.len());

    let county_totals = totals(0..n, counties, populations);
    let scope = (0..n).collect::<Vec<_>>();

    Ok(Psi::new(
        split_index(new, counties, populations, &county_totals, &scope, &scope),
        split_index(current, counties, populations, &county_totals, &scope, &scope),
    ))
}

impl Proposal<'_> {
    /// County-split penalty restricted to the touched districts and to every
    /// county any of them overlaps under either plan.
    ///
    /// Terms for the rest of the map are identical on both sides, so `delta()`
    /// matches [`county_split_psi`] whenever the touched set covers every label
    /// whose membership changed.
    pub fn county_split_psi(&self, counties: &[u32], populations: &[u32]) -> Result<Psi> {
        const OP: &str = "Proposal.county_split_psi";
        self.check_len(OP, "counties", counties.len())?;
        self.check_len(OP, "populations", populations.len())?;

        let county_totals = totals(0..self.num_units(), counties, populations);
        let new_members = self.members(Side::New).concat();
        let current_members = self.members(Side::Current).concat();

        let overlapped = new_members.iter().chain(&current_members)
            .map(|&unit| counties[unit])
            .collect::<AHashSet<_>>();
        let county_scope = (0..self.num_units())
            .filter(|&unit| overlapped.contains(&counties[unit]))
            .collect::<Vec<_>>();

        Ok(Psi::new(
            split_index(self.new_plan(), counties, populations, &county_totals, &county_scope, &new_members),
            split_index(self.current(), counties, populations, &county_totals, &county_scope, &current_members),
        ))
    }
}

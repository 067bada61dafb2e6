//! Randomized order-statistic selection (quickselect) over real values.

use anyhow::{ensure, Result};
use rand::Rng;

/// Partition `values[left..=right]` (and `idxs` in lockstep) around the value at
/// `pivot`. Returns the pivot's final position: everything left of it is strictly
/// smaller, everything right of it is greater or equal.
fn partition(values: &mut [f64], idxs: &mut [usize], left: usize, right: usize, pivot: usize) -> usize {
    let pivot_value = values[pivot];
    values.swap(pivot, right);
    idxs.swap(pivot, right);

    let mut store = left;
    for i in left..right {
        if values[i] < pivot_value {
            values.swap(store, i);
            idxs.swap(store, i);
            store += 1;
        }
    }
    values.swap(right, store);
    idxs.swap(right, store);
    store
}

/// Find the original index of the `k`-th smallest value (1-indexed), drawing
/// pivots from `rng`. Runs in expected linear time and leaves `values` untouched.
pub fn select_kth_with<R: Rng + ?Sized>(values: &[f64], k: usize, rng: &mut R) -> Result<usize> {
    ensure!(!values.is_empty(), "[select_kth] values must not be empty");
    ensure!((1..=values.len()).contains(&k),
        "[select_kth] rank k={k} must lie in [1, {}]", values.len());
    ensure!(!values.iter().any(|v| v.is_nan()), "[select_kth] values must not contain NaN");

    let mut values = values.to_vec();
    let mut idxs = (0..values.len()).collect::<Vec<_>>();
    let target = k - 1;
    let (mut left, mut right) = (0, values.len() - 1);

    loop {
        if left == right { return Ok(idxs[left]) }

        let pivot = rng.random_range(left..=right);
        let pivot = partition(&mut values, &mut idxs, left, right, pivot);
        tracing::trace!(left, right, pivot, "select_kth partition");

        match target.cmp(&pivot) {
            std::cmp::Ordering::Equal => return Ok(idxs[pivot]),
            std::cmp::Ordering::Less => right = pivot - 1,
            std::cmp::Ordering::Greater => left = pivot + 1,
        }
    }
}

/// Find the original index of the `k`-th smallest value (1-indexed), using the
/// thread-local random source for pivots.
#[inline]
pub fn select_kth(values: &[f64], k: usize) -> Result<usize> {
    select_kth_with(values, k, &mut rand::rng())
}

/// Find the original index of the value at quantile `q` in `[0, 1]`: the
/// `max(1, ceil(q * n))`-th smallest value.
pub fn quantile_index_with<R: Rng + ?Sized>(values: &[f64], q: f64, rng: &mut R) -> Result<usize> {
    ensure!((0.0..=1.0).contains(&q), "[quantile_index] quantile {q} must lie in [0, 1]");
    let k = ((q * values.len() as f64).ceil() as usize).max(1);
    select_kth_with(values, k, rng)
}

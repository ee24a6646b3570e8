//! Cross-sectional percentile ranks.
//!
//! Every entry gets `average_rank / n`, ranks running 1..=n from smallest to
//! largest. Equal values form a tie group and all members receive the
//! group's mid-rank, so ties never depend on input order or sort stability.
//!
//! For a value taken from the column this matches the "rank" flavour of
//! percentile-of-score: with distinct values the largest entry maps to 1.0
//! and the smallest to `1/n`.

use std::cmp::Ordering;

/// Percentile rank of every entry in `values`.
///
/// `values` must not contain NaN; infinities are allowed and rank at the
/// ends. Callers sanitize missing data first, see [`fill_invalid`].
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut ranks = vec![0.0; n];
    if n == 0 {
        return ranks;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));

    let total = n as f64;
    let mut start = 0;
    while start < n {
        let value = values[order[start]];
        let mut end = start + 1;
        while end < n && values[order[end]].partial_cmp(&value) == Some(Ordering::Equal) {
            end += 1;
        }

        // Positions start..end hold ranks start+1..=end.
        let mid_rank = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = mid_rank / total;
        }
        start = end;
    }

    ranks
}

/// Replace entries that are absent or fail `is_valid` with `fill`.
pub fn fill_invalid<F>(values: &[Option<f64>], is_valid: F, fill: f64) -> Vec<f64>
where
    F: Fn(f64) -> bool,
{
    values
        .iter()
        .map(|v| v.filter(|x| !x.is_nan() && is_valid(*x)).unwrap_or(fill))
        .collect()
}

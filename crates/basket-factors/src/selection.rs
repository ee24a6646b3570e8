//! Cohort selection by composite score.

use crate::traits::RankOrder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Configuration for cohort selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Cohort size (default: 50)
    pub cohort_size: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { cohort_size: 50 }
    }
}

/// Something with a ticker and a composite score.
pub trait Ranked {
    /// Ticker symbol, used to break score ties.
    fn ticker(&self) -> &str;

    /// Composite score.
    fn score(&self) -> f64;
}

/// Sort `items` best-first under `order`.
///
/// Equal scores are ordered by ticker so the result never depends on the
/// input order. NaN scores sort last in either direction.
pub fn rank<T: Ranked>(items: &mut [T], order: RankOrder) {
    items.sort_by(|a, b| compare(a, b, order));
}

/// The best `n` items under `order`, best first.
///
/// Returns every item when fewer than `n` are available.
pub fn select_top<T: Ranked + Clone>(items: &[T], n: usize, order: RankOrder) -> Vec<T> {
    let mut ranked = items.to_vec();
    rank(&mut ranked, order);
    ranked.truncate(n);
    ranked
}

fn compare<T: Ranked>(a: &T, b: &T, order: RankOrder) -> Ordering {
    let (sa, sb) = (a.score(), b.score());
    let by_score = match (sa.is_nan(), sb.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match order {
            RankOrder::HigherIsBetter => sb.total_cmp(&sa),
            RankOrder::LowerIsBetter => sa.total_cmp(&sb),
        },
    };
    by_score.then_with(|| a.ticker().cmp(b.ticker()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str, f64);

    impl Ranked for Item {
        fn ticker(&self) -> &str {
            self.0
        }

        fn score(&self) -> f64 {
            self.1
        }
    }

    fn tickers(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.0).collect()
    }

    fn universe() -> Vec<Item> {
        vec![Item("A", 0.9), Item("B", 0.7), Item("C", 0.95)]
    }

    #[test]
    fn test_higher_is_better() {
        let top = select_top(&universe(), 2, RankOrder::HigherIsBetter);
        assert_eq!(tickers(&top), ["C", "A"]);
    }

    #[test]
    fn test_lower_is_better() {
        let top = select_top(&universe(), 2, RankOrder::LowerIsBetter);
        assert_eq!(tickers(&top), ["B", "A"]);
    }

    #[test]
    fn test_small_universe_returns_everything() {
        let top = select_top(&universe(), 50, RankOrder::HigherIsBetter);
        assert_eq!(tickers(&top), ["C", "A", "B"]);
        assert!(select_top::<Item>(&[], 50, RankOrder::HigherIsBetter).is_empty());
    }

    #[test]
    fn test_ties_break_by_ticker() {
        let items = vec![Item("Z", 0.5), Item("M", 0.5), Item("A", 0.5), Item("Q", 0.9)];
        let top = select_top(&items, 3, RankOrder::HigherIsBetter);
        assert_eq!(tickers(&top), ["Q", "A", "M"]);

        let mut reversed: Vec<Item> = items.into_iter().rev().collect();
        rank(&mut reversed, RankOrder::HigherIsBetter);
        assert_eq!(tickers(&reversed), ["Q", "A", "M", "Z"]);
    }

    #[test]
    fn test_nan_sorts_last() {
        let items = vec![Item("N", f64::NAN), Item("A", 0.1), Item("B", 0.2)];
        assert_eq!(tickers(&select_top(&items, 3, RankOrder::LowerIsBetter)), ["A", "B", "N"]);
        assert_eq!(tickers(&select_top(&items, 3, RankOrder::HigherIsBetter)), ["B", "A", "N"]);
    }

    #[test]
    fn test_default_cohort_size() {
        assert_eq!(SelectionConfig::default().cohort_size, 50);
    }
}

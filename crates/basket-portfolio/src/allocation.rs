//! Equal-weight share allocation.
//!
//! Every security in a cohort of K receives `budget / K` dollars, converted
//! to whole shares by flooring. Arithmetic is done in exact decimals so a
//! position that buys exactly N shares never rounds down to N - 1.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort an allocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// There is nothing to allocate to.
    #[error("Cannot allocate across an empty cohort")]
    EmptyCohort,

    /// An input violates a precondition.
    #[error("Invalid {field} {value}: {reason}")]
    InvalidInput {
        /// Which input, e.g. `"budget"` or `"price of AAPL"`
        field: String,
        /// Offending value
        value: String,
        /// Violated precondition
        reason: &'static str,
    },
}

/// Share count for one security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    /// Ticker symbol
    pub ticker: String,
    /// Price used for sizing
    pub price: Decimal,
    /// Whole shares to buy
    pub shares: u64,
    /// `shares * price`
    pub cost: Decimal,
}

/// Result of an equal-weight allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Total budget
    pub budget: Decimal,
    /// Dollars per security
    pub position_size: Decimal,
    /// One line per security, in input order
    pub lines: Vec<AllocationLine>,
    /// Sum of line costs
    pub invested: Decimal,
    /// Budget not spent because of whole-share rounding
    pub cash_left: Decimal,
}

impl Allocation {
    /// Share count for `ticker`, if it is part of the allocation.
    pub fn shares_for(&self, ticker: &str) -> Option<u64> {
        self.lines.iter().find(|l| l.ticker == ticker).map(|l| l.shares)
    }
}

/// Splits a budget equally across a cohort.
#[derive(Debug, Clone, Copy)]
pub struct EqualWeightAllocator {
    budget: Decimal,
}

impl EqualWeightAllocator {
    /// Create an allocator for a strictly positive budget.
    pub fn new(budget: Decimal) -> Result<Self, AllocationError> {
        if budget <= Decimal::ZERO {
            return Err(AllocationError::InvalidInput {
                field: "budget".to_string(),
                value: budget.to_string(),
                reason: "must be greater than zero",
            });
        }
        Ok(Self { budget })
    }

    /// Budget being allocated.
    pub const fn budget(&self) -> Decimal {
        self.budget
    }

    /// Dollars per security for a cohort of `cohort_len`.
    pub fn position_size(&self, cohort_len: usize) -> Result<Decimal, AllocationError> {
        if cohort_len == 0 {
            return Err(AllocationError::EmptyCohort);
        }
        let divisor = Decimal::from_usize(cohort_len).ok_or_else(|| AllocationError::InvalidInput {
            field: "cohort size".to_string(),
            value: cohort_len.to_string(),
            reason: "too large",
        })?;
        self.budget
            .checked_div(divisor)
            .ok_or_else(|| AllocationError::InvalidInput {
                field: "position size".to_string(),
                value: format!("{} / {cohort_len}", self.budget),
                reason: "overflows a decimal",
            })
    }

    /// Allocate across `(ticker, price)` pairs.
    ///
    /// Fails on an empty cohort or any price that is not a positive finite
    /// number; nothing is returned partially.
    pub fn allocate<'a, I>(&self, holdings: I) -> Result<Allocation, AllocationError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let holdings: Vec<(&str, Decimal)> = holdings
            .into_iter()
            .map(|(ticker, price)| Ok((ticker, decimal_price(ticker, price)?)))
            .collect::<Result<_, AllocationError>>()?;

        let position_size = self.position_size(holdings.len())?;

        let mut lines = Vec::with_capacity(holdings.len());
        let mut invested = Decimal::ZERO;
        for (ticker, price) in holdings {
            let shares = whole_shares(ticker, position_size, price)?;
            let cost = price
                .checked_mul(Decimal::from(shares))
                .ok_or_else(|| share_overflow(ticker, shares.to_string()))?;
            invested = invested
                .checked_add(cost)
                .ok_or_else(|| share_overflow(ticker, cost.to_string()))?;
            lines.push(AllocationLine {
                ticker: ticker.to_string(),
                price,
                shares,
                cost,
            });
        }

        Ok(Allocation {
            budget: self.budget,
            position_size,
            lines,
            invested,
            cash_left: self.budget - invested,
        })
    }
}

fn decimal_price(ticker: &str, price: f64) -> Result<Decimal, AllocationError> {
    let invalid = |reason| AllocationError::InvalidInput {
        field: format!("price of {ticker}"),
        value: price.to_string(),
        reason,
    };

    if !price.is_finite() {
        return Err(invalid("must be a finite number"));
    }
    let price = Decimal::from_f64(price).ok_or_else(|| invalid("out of range"))?;
    if price <= Decimal::ZERO {
        return Err(invalid("must be greater than zero"));
    }
    Ok(price)
}

fn whole_shares(ticker: &str, position_size: Decimal, price: Decimal) -> Result<u64, AllocationError> {
    let ratio = position_size
        .checked_div(price)
        .ok_or_else(|| share_overflow(ticker, format!("{position_size} / {price}")))?;
    ratio
        .floor()
        .to_u64()
        .ok_or_else(|| share_overflow(ticker, ratio.to_string()))
}

fn share_overflow(ticker: &str, value: String) -> AllocationError {
    AllocationError::InvalidInput {
        field: format!("share count for {ticker}"),
        value,
        reason: "does not fit a share count",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_two_security_cohort() {
        let allocator = EqualWeightAllocator::new(dec!(10000)).unwrap();
        let allocation = allocator.allocate([("AAA", 45.00), ("BBB", 230.00)]).unwrap();

        assert_eq!(allocation.position_size, dec!(5000));
        assert_eq!(allocation.shares_for("AAA"), Some(111));
        assert_eq!(allocation.shares_for("BBB"), Some(21));
        assert_eq!(allocation.invested, dec!(4995) + dec!(4830));
        assert_eq!(allocation.cash_left, dec!(175));
    }

    #[test]
    fn test_exact_multiples_are_not_rounded_down() {
        let allocator = EqualWeightAllocator::new(dec!(300)).unwrap();
        let allocation = allocator.allocate([("A", 0.1), ("B", 0.2), ("C", 0.5)]).unwrap();

        assert_eq!(allocation.shares_for("A"), Some(1000));
        assert_eq!(allocation.shares_for("B"), Some(500));
        assert_eq!(allocation.shares_for("C"), Some(200));
        assert_eq!(allocation.cash_left, Decimal::ZERO);
    }

    #[test]
    fn test_expensive_share_gets_zero() {
        let allocator = EqualWeightAllocator::new(dec!(1000)).unwrap();
        let allocation = allocator.allocate([("CHEAP", 10.0), ("PRICEY", 600.0)]).unwrap();
        assert_eq!(allocation.shares_for("PRICEY"), Some(0));
        assert_eq!(allocation.shares_for("CHEAP"), Some(50));
    }

    #[test]
    fn test_empty_cohort() {
        let allocator = EqualWeightAllocator::new(dec!(10000)).unwrap();
        let err = allocator.allocate(std::iter::empty()).unwrap_err();
        assert_eq!(err, AllocationError::EmptyCohort);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-12.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_price(#[case] price: f64) {
        let allocator = EqualWeightAllocator::new(dec!(10000)).unwrap();
        let err = allocator.allocate([("OK", 10.0), ("BAD", price)]).unwrap_err();
        match err {
            AllocationError::InvalidInput { field, .. } => assert_eq!(field, "price of BAD"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    #[case::decimal_overflow("1e27", 0.001)]
    #[case::share_count_overflow("1e25", 1.0)]
    fn test_share_count_overflow(#[case] budget: &str, #[case] price: f64) {
        let budget = crate::parse_budget(budget).unwrap();
        let allocator = EqualWeightAllocator::new(budget).unwrap();
        let err = allocator.allocate([("PENNY", price)]).unwrap_err();
        match err {
            AllocationError::InvalidInput { field, .. } => {
                assert_eq!(field, "share count for PENNY");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-100))]
    fn test_invalid_budget(#[case] budget: Decimal) {
        assert!(matches!(
            EqualWeightAllocator::new(budget),
            Err(AllocationError::InvalidInput { .. })
        ));
    }
}

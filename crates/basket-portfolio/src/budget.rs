//! Portfolio budget parsing.
//!
//! [`parse_budget`] is pure: it never prompts and never falls back to a
//! default. Interactive callers loop on it until it succeeds.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Why a budget string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BudgetRejection {
    /// Nothing was entered.
    #[error("no value entered")]
    Empty,
    /// The text is not a number.
    #[error("not a number")]
    NotANumber,
    /// The number is zero or negative.
    #[error("must be greater than zero")]
    NotPositive,
}

/// A portfolio budget that could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid portfolio size {input:?}: {reason}")]
pub struct InvalidBudgetInput {
    /// Text as entered
    pub input: String,
    /// Why it was rejected
    pub reason: BudgetRejection,
}

/// Parse a strictly positive portfolio budget.
///
/// Accepts plain and scientific notation, an optional leading `$`, and `,`
/// or `_` digit separators: `"10000"`, `"$10,000.50"`, `"1e6"`.
pub fn parse_budget(input: &str) -> Result<Decimal, InvalidBudgetInput> {
    let reject = |reason| InvalidBudgetInput {
        input: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
    if trimmed.is_empty() {
        return Err(reject(BudgetRejection::Empty));
    }

    let cleaned: String = trimmed.chars().filter(|c| !matches!(c, ',' | '_')).collect();
    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| reject(BudgetRejection::NotANumber))?;

    if value <= Decimal::ZERO {
        return Err(reject(BudgetRejection::NotPositive));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("10000", dec!(10000))]
    #[case("  2500.75\n", dec!(2500.75))]
    #[case("$10,000", dec!(10000))]
    #[case("1_000_000", dec!(1000000))]
    #[case("1e6", dec!(1000000))]
    fn test_accepts(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_budget(input).unwrap(), expected);
    }

    #[rstest]
    #[case("", BudgetRejection::Empty)]
    #[case("   ", BudgetRejection::Empty)]
    #[case("$", BudgetRejection::Empty)]
    #[case("ten thousand", BudgetRejection::NotANumber)]
    #[case("12abc", BudgetRejection::NotANumber)]
    #[case("NaN", BudgetRejection::NotANumber)]
    #[case("0", BudgetRejection::NotPositive)]
    #[case("-500", BudgetRejection::NotPositive)]
    fn test_rejects(#[case] input: &str, #[case] reason: BudgetRejection) {
        let err = parse_budget(input).unwrap_err();
        assert_eq!(err.reason, reason);
        assert_eq!(err.input, input);
    }
}

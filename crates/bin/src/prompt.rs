//! Interactive budget entry.

use basket_portfolio::{InvalidBudgetInput, parse_budget};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};

/// Ask for a budget until a valid one is entered.
///
/// Fails only when input ends or the terminal cannot be read.
pub(crate) fn read_budget<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> io::Result<Decimal> {
    loop {
        write!(output, "Enter the value of your portfolio: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no portfolio value entered",
            ));
        }

        match parse_budget(&line) {
            Ok(budget) => return Ok(budget),
            Err(InvalidBudgetInput { reason, .. }) => {
                writeln!(output, "That's not a valid amount ({reason}). Please try again.")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10000\n", "10000")]
    #[case("abc\n-5\n$2,500.50\n", "2500.50")]
    #[case("\n0\n1e6\n", "1000000")]
    fn test_reprompts_until_valid(#[case] typed: &str, #[case] expected: &str) {
        let mut shown = Vec::new();
        let budget = read_budget(typed.as_bytes(), &mut shown).unwrap();
        assert_eq!(budget, expected.parse::<Decimal>().unwrap());

        let attempts = typed.lines().count();
        let prompts = String::from_utf8(shown).unwrap().matches("Enter the value").count();
        assert_eq!(prompts, attempts);
    }

    #[test]
    fn test_end_of_input() {
        let err = read_budget("oops\n".as_bytes(), Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}

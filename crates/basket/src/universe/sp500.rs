//! Built-in S&P 500 constituent list.
//!
//! A large-cap subset covering every GICS sector, in the index's published
//! symbol order. Symbols are kept exactly as the index lists them (class
//! shares use a dot); [`Universe`](super::Universe) normalizes them.

use super::{Constituent, UniverseSource};
use crate::error::Result;

/// The built-in S&P 500 list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SP500Universe;

impl SP500Universe {
    /// Create the built-in universe.
    pub const fn new() -> Self {
        Self
    }

    /// Raw `(symbol, security)` pairs.
    pub const fn pairs() -> &'static [(&'static str, &'static str)] {
        CONSTITUENTS
    }
}

impl UniverseSource for SP500Universe {
    fn constituents(&self) -> Result<Vec<Constituent>> {
        Ok(CONSTITUENTS
            .iter()
            .map(|(symbol, name)| Constituent::new(*symbol, *name))
            .collect())
    }

    fn describe(&self) -> String {
        "built-in S&P 500".to_string()
    }
}

const CONSTITUENTS: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("ABBV", "AbbVie"),
    ("ABT", "Abbott Laboratories"),
    ("ACN", "Accenture"),
    ("ADBE", "Adobe Inc."),
    ("AEP", "American Electric Power"),
    ("AMD", "Advanced Micro Devices"),
    ("AMGN", "Amgen"),
    ("AMT", "American Tower"),
    ("AMZN", "Amazon"),
    ("APD", "Air Products"),
    ("AVGO", "Broadcom"),
    ("AXP", "American Express"),
    ("BA", "Boeing"),
    ("BAC", "Bank of America"),
    ("BKNG", "Booking Holdings"),
    ("BLK", "BlackRock"),
    ("BMY", "Bristol Myers Squibb"),
    ("BRK.B", "Berkshire Hathaway"),
    ("C", "Citigroup"),
    ("CAT", "Caterpillar Inc."),
    ("CCI", "Crown Castle"),
    ("CEG", "Constellation Energy"),
    ("CL", "Colgate-Palmolive"),
    ("CMCSA", "Comcast"),
    ("CMG", "Chipotle Mexican Grill"),
    ("COP", "ConocoPhillips"),
    ("COST", "Costco"),
    ("CRM", "Salesforce"),
    ("CSCO", "Cisco"),
    ("CVX", "Chevron Corporation"),
    ("D", "Dominion Energy"),
    ("DD", "DuPont"),
    ("DE", "Deere & Company"),
    ("DHR", "Danaher Corporation"),
    ("DIS", "Walt Disney Company (The)"),
    ("DOW", "Dow Inc."),
    ("DUK", "Duke Energy"),
    ("EA", "Electronic Arts"),
    ("ECL", "Ecolab"),
    ("EOG", "EOG Resources"),
    ("EQIX", "Equinix"),
    ("EXC", "Exelon"),
    ("F", "Ford Motor Company"),
    ("FCX", "Freeport-McMoRan"),
    ("FDX", "FedEx"),
    ("GE", "GE Aerospace"),
    ("GILD", "Gilead Sciences"),
    ("GM", "General Motors"),
    ("GOOG", "Alphabet Inc. (Class C)"),
    ("GOOGL", "Alphabet Inc. (Class A)"),
    ("GS", "Goldman Sachs"),
    ("HAL", "Halliburton"),
    ("HD", "Home Depot (The)"),
    ("HON", "Honeywell"),
    ("IBM", "IBM"),
    ("INTC", "Intel"),
    ("JNJ", "Johnson & Johnson"),
    ("JPM", "JPMorgan Chase"),
    ("KHC", "Kraft Heinz"),
    ("KO", "Coca-Cola Company (The)"),
    ("LIN", "Linde plc"),
    ("LLY", "Lilly (Eli)"),
    ("LMT", "Lockheed Martin"),
    ("LOW", "Lowe's"),
    ("MA", "Mastercard"),
    ("MCD", "McDonald's"),
    ("MDLZ", "Mondelez International"),
    ("META", "Meta Platforms"),
    ("MMM", "3M"),
    ("MO", "Altria"),
    ("MPC", "Marathon Petroleum"),
    ("MRK", "Merck & Co."),
    ("MS", "Morgan Stanley"),
    ("MSFT", "Microsoft"),
    ("NEE", "NextEra Energy"),
    ("NEM", "Newmont"),
    ("NFLX", "Netflix"),
    ("NKE", "Nike, Inc."),
    ("NOW", "ServiceNow"),
    ("NSC", "Norfolk Southern"),
    ("NUE", "Nucor"),
    ("NVDA", "Nvidia"),
    ("O", "Realty Income"),
    ("ORCL", "Oracle Corporation"),
    ("OXY", "Occidental Petroleum"),
    ("PEP", "PepsiCo"),
    ("PFE", "Pfizer"),
    ("PG", "Procter & Gamble"),
    ("PLD", "Prologis"),
    ("PM", "Philip Morris International"),
    ("PPG", "PPG Industries"),
    ("PSA", "Public Storage"),
    ("PSX", "Phillips 66"),
    ("QCOM", "Qualcomm"),
    ("RTX", "RTX Corporation"),
    ("SBUX", "Starbucks"),
    ("SCHW", "Charles Schwab Corporation"),
    ("SHW", "Sherwin-Williams"),
    ("SLB", "Schlumberger"),
    ("SO", "Southern Company"),
    ("SPG", "Simon Property Group"),
    ("T", "AT&T"),
    ("TJX", "TJX Companies"),
    ("TMO", "Thermo Fisher Scientific"),
    ("TMUS", "T-Mobile US"),
    ("TSLA", "Tesla, Inc."),
    ("TXN", "Texas Instruments"),
    ("UNH", "UnitedHealth Group"),
    ("UNP", "Union Pacific Corporation"),
    ("UPS", "United Parcel Service"),
    ("V", "Visa Inc."),
    ("VLO", "Valero Energy"),
    ("VZ", "Verizon"),
    ("WELL", "Welltower"),
    ("WFC", "Wells Fargo"),
    ("WMT", "Walmart"),
    ("XEL", "Xcel Energy"),
    ("XOM", "ExxonMobil"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::Universe;

    #[test]
    fn test_builtin_list() {
        let universe = Universe::load(&SP500Universe::new()).unwrap();
        assert!(universe.len() >= 100);
        assert_eq!(universe.len(), SP500Universe::pairs().len());
        assert!(universe.contains("AAPL"));
        assert!(universe.contains("BRK-B"));
        assert!(!universe.contains("BRK.B"));
        assert_eq!(universe.company_name("XOM"), Some("ExxonMobil"));
    }

    #[test]
    fn test_symbols_are_sorted_and_unique() {
        let symbols: Vec<&str> = SP500Universe::pairs().iter().map(|(s, _)| *s).collect();
        assert!(symbols.windows(2).all(|w| w[0] < w[1]));
    }
}

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;

/// Best-effort extraction of a single monetary amount from free text under
/// European formatting conventions: `.` as thousands separator, `,` as
/// decimal separator, optional `€`/`EUR` marker. Not a general money
/// parser.
pub struct PriceExtractor {
    rules: Vec<Regex>,
}

impl PriceExtractor {
    pub fn new() -> Self {
        // Tried in order; the first rule with a match wins.
        let rules = vec![
            // Grouped amount with a two-digit fraction: 1.234,56 €, 123,45 EUR
            Regex::new(r"([0-9]{1,3}(?:[.,][0-9]{3})*(?:[.,][0-9]{2}))\s*(?:€|EUR)?").unwrap(),
            // Fallback: any digits with exactly two fractional digits
            Regex::new(r"(\d+[.,]\d{2})").unwrap(),
        ];
        Self { rules }
    }

    /// Returns the first amount any rule locates, or `None` when the text
    /// carries nothing price-shaped. Never fails.
    pub fn extract(&self, text: &str) -> Option<Decimal> {
        self.rules.iter().find_map(|rule| {
            let captures = rule.captures(text)?;
            parse_european(captures.get(1)?.as_str())
        })
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// "1.234,56" → "1234.56": dots are thousands separators, the comma is the
// decimal mark.
fn parse_european(raw: &str) -> Option<Decimal> {
    let normalized = raw.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

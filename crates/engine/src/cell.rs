//! Parsing of free-form cell input.
//!
//! Cells accept whatever the user types. Thousands separators (`,`) are
//! dropped and the longest leading decimal number is taken, so `"1,000"` is
//! 1000 and `"12abc"` is 12. Input with no leading number, negative input and
//! amounts above [`MoneyCents::MAX_CELL`] are 0.
//!
//! The coerced amount is always returned together with a
//! [`ParseDiagnostic`] describing what was coerced, so callers can warn about
//! or refuse suspicious input (see [`InvalidCellPolicy`]).
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::MoneyCents;

/// What happened to a raw cell value while it was turned into an amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseDiagnostic {
    /// Blank input, the cell is cleared.
    Empty,
    /// No number could be read, the cell is set to 0.
    Invalid,
    /// A number was read but text followed it; the text was ignored.
    TrailingGarbage(String),
    /// The number was negative; the cell is set to 0.
    Negative,
    /// More than two decimals; the amount was rounded to the cent.
    Rounded,
    /// Above [`MoneyCents::MAX_CELL`]; the cell is set to 0.
    TooLarge,
}

impl ParseDiagnostic {
    /// Returns `true` when the input most likely was a typo.
    #[must_use]
    pub fn is_suspicious(&self) -> bool {
        matches!(
            self,
            Self::Invalid | Self::TrailingGarbage(_) | Self::Negative | Self::TooLarge
        )
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty value, cell cleared"),
            Self::Invalid => f.write_str("not a number, treated as 0"),
            Self::TrailingGarbage(rest) => write!(f, "ignored trailing text {rest:?}"),
            Self::Negative => f.write_str("negative amount, treated as 0"),
            Self::Rounded => f.write_str("rounded to 2 decimals"),
            Self::TooLarge => {
                write!(f, "above the cell limit of {}, treated as 0", MoneyCents::MAX_CELL)
            }
        }
    }
}

/// What to do with suspicious cell input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidCellPolicy {
    /// Apply the coerced amount and report the diagnostic.
    #[default]
    Coerce,
    /// Refuse suspicious input and leave the cell untouched.
    Reject,
}

/// Result of parsing a raw cell value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellParse {
    pub raw: String,
    pub amount: MoneyCents,
    pub diagnostic: Option<ParseDiagnostic>,
}

impl CellParse {
    fn coerced(raw: &str, diagnostic: ParseDiagnostic) -> Self {
        Self {
            raw: raw.to_string(),
            amount: MoneyCents::ZERO,
            diagnostic: Some(diagnostic),
        }
    }

    #[must_use]
    pub fn is_suspicious(&self) -> bool {
        self.diagnostic
            .as_ref()
            .is_some_and(ParseDiagnostic::is_suspicious)
    }
}

/// Parses a raw cell value. Never fails: see the module docs.
pub fn parse_cell(raw: &str) -> CellParse {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return CellParse::coerced(raw, ParseDiagnostic::Empty);
    }

    let Some(number) = leading_number(cleaned) else {
        return CellParse::coerced(raw, ParseDiagnostic::Invalid);
    };

    let Ok(value) = number.text.parse::<f64>() else {
        return CellParse::coerced(raw, ParseDiagnostic::Invalid);
    };
    let Some(amount) = MoneyCents::from_major(value) else {
        return CellParse::coerced(raw, ParseDiagnostic::Invalid);
    };

    if amount.is_negative() {
        return CellParse::coerced(raw, ParseDiagnostic::Negative);
    }
    if amount > MoneyCents::MAX_CELL {
        return CellParse::coerced(raw, ParseDiagnostic::TooLarge);
    }

    let rest = &cleaned[number.text.len()..];
    let diagnostic = if !rest.is_empty() {
        Some(ParseDiagnostic::TrailingGarbage(rest.to_string()))
    } else if number.significant_decimals > 2 {
        Some(ParseDiagnostic::Rounded)
    } else {
        None
    };

    CellParse {
        raw: raw.to_string(),
        amount,
        diagnostic,
    }
}

struct LeadingNumber<'a> {
    text: &'a str,
    significant_decimals: usize,
}

/// Finds the longest prefix of `input` that reads as a decimal number:
/// optional sign, digits with an optional fraction, optional exponent.
fn leading_number(input: &str) -> Option<LeadingNumber<'_>> {
    let bytes = input.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    let mut significant_decimals = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut cursor = frac_start;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        frac_digits = cursor - frac_start;
        if int_digits > 0 || frac_digits > 0 {
            end = cursor;
            significant_decimals = input[frac_start..cursor].trim_end_matches('0').len();
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exp_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exp_start {
            end = cursor;
            // Decimals are not meaningful once scaled by an exponent.
            significant_decimals = 0;
        }
    }

    Some(LeadingNumber {
        text: &input[..end],
        significant_decimals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(raw: &str) -> i64 {
        parse_cell(raw).amount.cents()
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(cents("1,000"), 100_000);
        assert_eq!(cents("1,234,567.5"), 123_456_750);
        assert_eq!(parse_cell("1,000").diagnostic, None);
    }

    #[test]
    fn empty_and_garbage_are_zero() {
        let empty = parse_cell("");
        assert_eq!(empty.amount, MoneyCents::ZERO);
        assert_eq!(empty.diagnostic, Some(ParseDiagnostic::Empty));
        assert!(!empty.is_suspicious());

        let blank = parse_cell("   ");
        assert_eq!(blank.diagnostic, Some(ParseDiagnostic::Empty));

        let abc = parse_cell("abc");
        assert_eq!(abc.amount, MoneyCents::ZERO);
        assert_eq!(abc.diagnostic, Some(ParseDiagnostic::Invalid));
        assert!(abc.is_suspicious());
    }

    #[test]
    fn reads_leading_number_like_parse_float() {
        let parsed = parse_cell("12abc");
        assert_eq!(parsed.amount.cents(), 1200);
        assert_eq!(
            parsed.diagnostic,
            Some(ParseDiagnostic::TrailingGarbage("abc".to_string()))
        );

        assert_eq!(cents(".5"), 50);
        assert_eq!(cents("5."), 500);
        assert_eq!(cents("+7"), 700);
        assert_eq!(cents("1e3"), 100_000);
        assert_eq!(cents("  42  "), 4200);
    }

    #[test]
    fn exponent_without_digits_is_trailing_text() {
        let parsed = parse_cell("3e");
        assert_eq!(parsed.amount.cents(), 300);
        assert_eq!(
            parsed.diagnostic,
            Some(ParseDiagnostic::TrailingGarbage("e".to_string()))
        );
    }

    #[test]
    fn lone_sign_or_dot_is_invalid() {
        assert_eq!(parse_cell("-").diagnostic, Some(ParseDiagnostic::Invalid));
        assert_eq!(parse_cell(".").diagnostic, Some(ParseDiagnostic::Invalid));
        assert_eq!(parse_cell("Infinity").diagnostic, Some(ParseDiagnostic::Invalid));
    }

    #[test]
    fn negative_amounts_are_clamped() {
        let parsed = parse_cell("-250");
        assert_eq!(parsed.amount, MoneyCents::ZERO);
        assert_eq!(parsed.diagnostic, Some(ParseDiagnostic::Negative));
        assert_eq!(parse_cell("-0").diagnostic, None);
    }

    #[test]
    fn extra_decimals_are_rounded() {
        let parsed = parse_cell("10.125");
        assert_eq!(parsed.amount.cents(), 1013);
        assert_eq!(parsed.diagnostic, Some(ParseDiagnostic::Rounded));

        assert_eq!(parse_cell("10.500").diagnostic, None);
    }

    #[test]
    fn amounts_above_the_cell_limit_are_zero() {
        let parsed = parse_cell("90,000,000,000,000,000");
        assert_eq!(parsed.amount, MoneyCents::ZERO);
        assert_eq!(parsed.diagnostic, Some(ParseDiagnostic::TooLarge));
        assert!(parsed.is_suspicious());

        let limit = parse_cell("100,000,000,000");
        assert_eq!(limit.amount, MoneyCents::MAX_CELL);
        assert_eq!(limit.diagnostic, None);
    }

    #[test]
    fn policy_reads_snake_case() {
        let policy: InvalidCellPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(policy, InvalidCellPolicy::Reject);
        assert_eq!(InvalidCellPolicy::default(), InvalidCellPolicy::Coerce);
    }

    #[test]
    fn overflow_is_invalid() {
        let parsed = parse_cell("1e300");
        assert_eq!(parsed.amount, MoneyCents::ZERO);
        assert_eq!(parsed.diagnostic, Some(ParseDiagnostic::Invalid));
    }
}

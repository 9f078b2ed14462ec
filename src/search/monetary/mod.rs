//! Monetary query interpretation
//!
//! Turns query text into a structured monetary intent: an explicit `$` flag,
//! an inclusive amount range, or a list of discrete amounts with the words
//! that did not parse as money. The string-level permissiveness ladder lives
//! in [`rules`]; the tokenizer lives in [`lexer`].

pub mod lexer;
pub mod rules;

use lexer::{lex, lex_amount, Lexeme};
use serde::{Deserialize, Serialize};

pub use rules::matches_monetary_string;

/// Tolerance used for "close" numeric matches, in dollars
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Wider tolerance used only for the lowest scoring tier
pub const LOOSE_TOLERANCE: f64 = 1.00;

/// Result of the leading-`$` check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryQuery {
    /// Query text with the leading `$` removed when explicit
    pub text: String,
    pub is_explicit: bool,
}

/// Inclusive amount range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

impl AmountRange {
    /// Build a range, swapping reversed bounds
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn half_width(&self) -> f64 {
        (self.max - self.min) / 2.0
    }
}

/// A discrete amount found in the query, with the digits as typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountToken {
    pub value: f64,
    /// Token text without `$`; separators kept so the comma rule can see them
    pub raw: String,
}

/// Structured monetary view of a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryTokens {
    pub amounts: Vec<AmountToken>,
    /// Lower-cased tokens that did not parse as amounts
    pub text_tokens: Vec<String>,
    pub range: Option<AmountRange>,
}

impl MonetaryTokens {
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty() && self.text_tokens.is_empty() && self.range.is_none()
    }
}

/// Detect an explicit monetary query (`$` after trimming) and strip the `$`
pub fn parse_monetary_query(query: &str) -> MonetaryQuery {
    let trimmed = query.trim();
    match trimmed.strip_prefix('$') {
        Some(rest) => MonetaryQuery {
            text: rest.trim().to_string(),
            is_explicit: true,
        },
        None => MonetaryQuery {
            text: query.to_string(),
            is_explicit: false,
        },
    }
}

/// Whether any whitespace-delimited token contains a digit
pub fn has_monetary_potential(query: &str) -> bool {
    query
        .split_whitespace()
        .any(|token| token.chars().any(|c| c.is_ascii_digit()))
}

/// Extract a range, or else discrete amounts plus residual text tokens.
///
/// A recognised range is returned alone; no discrete amounts accompany it.
pub fn extract_monetary_tokens(query: &str) -> MonetaryTokens {
    if let Some(range) = parse_range(query) {
        return MonetaryTokens {
            range: Some(range),
            ..MonetaryTokens::default()
        };
    }

    let mut tokens = MonetaryTokens::default();
    for token in query.split_whitespace() {
        if token.chars().all(|c| c == '$' || c == ',') {
            continue;
        }
        match lex_amount(token) {
            Some(number) => tokens.amounts.push(AmountToken {
                value: number.value,
                raw: number.raw,
            }),
            None => tokens.text_tokens.push(token.to_lowercase()),
        }
    }
    tokens
}

/// `N-M` or `N to M`, each bound optionally `$`-prefixed
fn parse_range(query: &str) -> Option<AmountRange> {
    let lexemes = lex(query);
    let (low, rest) = take_amount(&lexemes)?;
    let rest = match rest {
        [Lexeme::Dash, rest @ ..] | [Lexeme::To, rest @ ..] => rest,
        _ => return None,
    };
    match take_amount(rest)? {
        (high, []) => Some(AmountRange::new(low, high)),
        _ => None,
    }
}

fn take_amount(lexemes: &[Lexeme]) -> Option<(f64, &[Lexeme])> {
    match lexemes {
        [Lexeme::Dollar, Lexeme::Number(n), rest @ ..] | [Lexeme::Number(n), rest @ ..] => {
            Some((n.value, rest))
        }
        _ => None,
    }
}

/// Tolerance equality for floating amounts
pub fn is_close_match(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance + 1e-9
}

/// Inclusive bounds check
pub fn is_in_range(value: f64, range: &AmountRange) -> bool {
    value >= range.min && value <= range.max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explicit_query() {
        let parsed = parse_monetary_query("  $1,530 ");
        assert!(parsed.is_explicit);
        assert_eq!(parsed.text, "1,530");

        let plain = parse_monetary_query("invoice 1530");
        assert!(!plain.is_explicit);
        assert_eq!(plain.text, "invoice 1530");
    }

    #[test]
    fn test_monetary_potential() {
        assert!(has_monetary_potential("concrete 12"));
        assert!(has_monetary_potential("$1,200.50"));
        assert!(has_monetary_potential("INV-204"));
        assert!(!has_monetary_potential("foundation report"));
        assert!(!has_monetary_potential(""));
    }

    #[test]
    fn test_extract_range_variants() {
        for query in ["100-200", "100 - 200", "$100-$200", "100 to 200", "$100 TO 200"] {
            let tokens = extract_monetary_tokens(query);
            assert_eq!(
                tokens.range,
                Some(AmountRange { min: 100.0, max: 200.0 }),
                "query {query}"
            );
            assert!(tokens.amounts.is_empty());
            assert!(tokens.text_tokens.is_empty());
        }
    }

    #[test]
    fn test_reversed_range_is_normalized() {
        let tokens = extract_monetary_tokens("500-200");
        assert_eq!(tokens.range, Some(AmountRange { min: 200.0, max: 500.0 }));
    }

    #[test]
    fn test_extract_amounts_and_text() {
        let tokens = extract_monetary_tokens("Rebar $1,200 grade 60 abc1");
        assert!(tokens.range.is_none());
        let values: Vec<f64> = tokens.amounts.iter().map(|a| a.value).collect();
        assert_eq!(values, vec![1200.0, 60.0]);
        assert_eq!(tokens.amounts[0].raw, "1,200");
        assert_eq!(tokens.text_tokens, vec!["rebar", "grade", "abc1"]);
    }

    #[test]
    fn test_trailing_words_defeat_range() {
        let tokens = extract_monetary_tokens("100-200 concrete");
        assert!(tokens.range.is_none());
        assert_eq!(tokens.text_tokens, vec!["100-200", "concrete"]);
    }

    #[test]
    fn test_close_match_and_range() {
        assert!(is_close_match(100.0, 100.01, DEFAULT_TOLERANCE));
        assert!(!is_close_match(100.0, 100.02, DEFAULT_TOLERANCE));
        let range = AmountRange::new(100.0, 200.0);
        assert!(is_in_range(100.0, &range));
        assert!(is_in_range(200.0, &range));
        assert!(!is_in_range(200.01, &range));
        assert_eq!(range.midpoint(), 150.0);
    }
}

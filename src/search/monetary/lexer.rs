//! Tokenizer for monetary query text

/// A numeric literal as typed, with its parsed value
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLexeme {
    /// Digits, commas and at most one decimal point, exactly as typed
    pub raw: String,
    pub value: f64,
}

/// Lexical unit of a monetary query
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Dollar,
    Number(NumberLexeme),
    Dash,
    /// The range keyword `to`, any casing
    To,
    Word(String),
}

/// Split query text into lexemes.
///
/// Whitespace separates lexemes but is otherwise dropped. A run of digits,
/// commas and dots becomes a `Number` when it parses as a float once commas
/// are removed; otherwise it degrades to a `Word`.
pub fn lex(input: &str) -> Vec<Lexeme> {
    let chars: Vec<char> = input.chars().collect();
    let mut lexemes = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
        } else if c == '$' {
            lexemes.push(Lexeme::Dollar);
            i += 1;
        } else if c == '-' {
            lexemes.push(Lexeme::Dash);
            i += 1;
        } else if starts_number(&chars, i) {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == ',' || chars[i] == '.')
            {
                i += 1;
            }
            let raw: String = chars[start..i].iter().collect();
            lexemes.push(number_or_word(raw));
        } else {
            let start = i;
            while i < chars.len() && !is_word_boundary(&chars, i) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if word.eq_ignore_ascii_case("to") {
                lexemes.push(Lexeme::To);
            } else {
                lexemes.push(Lexeme::Word(word));
            }
        }
    }

    lexemes
}

/// Parse a single whitespace-free token as a currency amount.
///
/// Accepts an optional leading `$` followed by one number; anything else is
/// not an amount.
pub fn lex_amount(token: &str) -> Option<NumberLexeme> {
    match lex(token).as_slice() {
        [Lexeme::Number(n)] | [Lexeme::Dollar, Lexeme::Number(n)] => Some(n.clone()),
        _ => None,
    }
}

fn starts_number(chars: &[char], i: usize) -> bool {
    chars[i].is_ascii_digit()
        || (chars[i] == '.' && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()))
}

fn is_word_boundary(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    c.is_whitespace() || c == '$' || c == '-' || c.is_ascii_digit()
}

fn number_or_word(raw: String) -> Lexeme {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    let well_formed = !raw.starts_with(',')
        && !raw.ends_with(',')
        && digits.matches('.').count() <= 1
        && digits.chars().any(|c| c.is_ascii_digit());

    match digits.parse::<f64>() {
        Ok(value) if well_formed && value.is_finite() => Lexeme::Number(NumberLexeme { raw, value }),
        _ => Lexeme::Word(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(raw: &str, value: f64) -> Lexeme {
        Lexeme::Number(NumberLexeme {
            raw: raw.to_string(),
            value,
        })
    }

    #[test]
    fn test_lex_dollar_range() {
        assert_eq!(
            lex("$1,500 - $2,000"),
            vec![
                Lexeme::Dollar,
                number("1,500", 1500.0),
                Lexeme::Dash,
                Lexeme::Dollar,
                number("2,000", 2000.0),
            ]
        );
    }

    #[test]
    fn test_lex_to_keyword_any_case() {
        assert_eq!(
            lex("100 TO 200"),
            vec![number("100", 100.0), Lexeme::To, number("200", 200.0)]
        );
        assert_eq!(lex("toe"), vec![Lexeme::Word("toe".to_string())]);
    }

    #[test]
    fn test_lex_mixed_word_and_number() {
        assert_eq!(
            lex("INV-1234"),
            vec![
                Lexeme::Word("INV".to_string()),
                Lexeme::Dash,
                number("1234", 1234.0)
            ]
        );
    }

    #[test]
    fn test_malformed_number_degrades_to_word() {
        assert_eq!(lex("1.2.3"), vec![Lexeme::Word("1.2.3".to_string())]);
        assert_eq!(lex("5,"), vec![Lexeme::Word("5,".to_string())]);
    }

    #[test]
    fn test_leading_decimal_point() {
        assert_eq!(lex(".75"), vec![number(".75", 0.75)]);
    }

    #[test]
    fn test_lex_amount_requires_single_number() {
        assert_eq!(lex_amount("$15,309").map(|n| n.value), Some(15309.0));
        assert_eq!(lex_amount("800.00").map(|n| n.value), Some(800.0));
        assert!(lex_amount("12abc").is_none());
        assert!(lex_amount("$").is_none());
        assert!(lex_amount("1e5").is_none());
    }
}

//! Reader and writer for the bracketed choice-list files.
//!
//! The vocabulary files were exported as printable Python list literals,
//! e.g. `['Black', "Race Blue", 'Don\'t Know']`. This module parses that
//! shape directly instead of evaluating it: single or double quotes,
//! backslash escapes, optional trailing comma, arbitrary whitespace.
//! Anything else is rejected with the byte offset of the problem.

use thiserror::Error;

/// Errors raised while parsing a choice-list file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListParseError {
    /// The input does not start with `[`.
    #[error("expected '[' at byte {0}")]
    MissingOpenBracket(usize),

    /// An element began with something other than a quote.
    #[error("expected a quoted string at byte {0}")]
    ExpectedString(usize),

    /// A string ran to end of input without its closing quote.
    #[error("unterminated string starting at byte {0}")]
    UnterminatedString(usize),

    /// An element was not followed by `,` or `]`.
    #[error("expected ',' or ']' at byte {0}")]
    ExpectedCommaOrClose(usize),

    /// Non-whitespace input after the closing `]`.
    #[error("unexpected content after ']' at byte {0}")]
    TrailingContent(usize),

    /// The input ended before the list was closed.
    #[error("input ended before the closing ']'")]
    UnexpectedEnd,
}

/// Parses a bracketed, quoted, comma-separated list of strings.
pub fn parse_string_list(input: &str) -> Result<Vec<String>, ListParseError> {
    let mut cur = Cursor::new(input);
    cur.skip_whitespace();
    if cur.bump() != Some('[') {
        return Err(ListParseError::MissingOpenBracket(cur.last_pos));
    }

    let mut values = Vec::new();
    loop {
        cur.skip_whitespace();
        match cur.peek() {
            None => return Err(ListParseError::UnexpectedEnd),
            Some(']') => {
                cur.bump();
                break;
            }
            Some('\'') | Some('"') => {
                values.push(cur.parse_quoted()?);
                cur.skip_whitespace();
                match cur.peek() {
                    Some(',') => {
                        cur.bump();
                    }
                    Some(']') => {
                        cur.bump();
                        break;
                    }
                    Some(_) => return Err(ListParseError::ExpectedCommaOrClose(cur.pos)),
                    None => return Err(ListParseError::UnexpectedEnd),
                }
            }
            Some(_) => return Err(ListParseError::ExpectedString(cur.pos)),
        }
    }

    cur.skip_whitespace();
    if cur.peek().is_some() {
        return Err(ListParseError::TrailingContent(cur.pos));
    }
    Ok(values)
}

/// Renders values as a single-quoted list literal that
/// [`parse_string_list`] accepts.
pub fn format_string_list(values: &[String]) -> String {
    let mut out = String::from("[");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('\'');
        for ch in value.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
    }
    out.push(']');
    out
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    last_pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor {
            input,
            pos: 0,
            last_pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.last_pos = self.pos;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    /// Consumes one quoted string. The cursor sits on the opening quote.
    fn parse_quoted(&mut self) -> Result<String, ListParseError> {
        let start = self.pos;
        let quote = match self.bump() {
            Some(ch) => ch,
            None => return Err(ListParseError::UnterminatedString(start)),
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(ListParseError::UnterminatedString(start)),
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(ListParseError::UnterminatedString(start)),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('\\') => out.push('\\'),
                    Some('\'') => out.push('\''),
                    Some('"') => out.push('"'),
                    // Python leaves unrecognized escapes alone.
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(ch) => out.push(ch),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_single_quoted_list() {
        assert_eq!(
            parse_string_list("['Audi', 'BMW', 'Toyota']").unwrap(),
            vec!["Audi", "BMW", "Toyota"]
        );
    }

    #[test]
    fn test_parses_mixed_quotes() {
        assert_eq!(
            parse_string_list(r#"['Black', "Race Blue"]"#).unwrap(),
            vec!["Black", "Race Blue"]
        );
    }

    #[test]
    fn test_parses_empty_list() {
        assert_eq!(parse_string_list("[]").unwrap(), Vec::<String>::new());
        assert_eq!(parse_string_list("  [ ]  ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_accepts_trailing_comma_and_newlines() {
        let input = "[\n  'Beige',\n  'Black',\n]\n";
        assert_eq!(parse_string_list(input).unwrap(), vec!["Beige", "Black"]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            parse_string_list(r"['Don\'t Know']").unwrap(),
            vec!["Don't Know"]
        );
        assert_eq!(
            parse_string_list(r#"["a\"b", 'c\\d', 'e\nf']"#).unwrap(),
            vec!["a\"b", "c\\d", "e\nf"]
        );
    }

    #[test]
    fn test_unknown_escape_keeps_backslash() {
        assert_eq!(parse_string_list(r"['a\qb']").unwrap(), vec![r"a\qb"]);
    }

    #[test]
    fn test_embedded_other_quote_needs_no_escape() {
        assert_eq!(
            parse_string_list(r#"["Don't Know"]"#).unwrap(),
            vec!["Don't Know"]
        );
    }

    #[test]
    fn test_rejects_missing_bracket() {
        assert_eq!(
            parse_string_list("'a', 'b'"),
            Err(ListParseError::MissingOpenBracket(0))
        );
    }

    #[test]
    fn test_rejects_unquoted_element() {
        assert_eq!(
            parse_string_list("[abc]"),
            Err(ListParseError::ExpectedString(1))
        );
    }

    #[test]
    fn test_rejects_unterminated_string() {
        assert_eq!(
            parse_string_list("['abc"),
            Err(ListParseError::UnterminatedString(1))
        );
    }

    #[test]
    fn test_rejects_missing_comma() {
        assert_eq!(
            parse_string_list("['a' 'b']"),
            Err(ListParseError::ExpectedCommaOrClose(5))
        );
    }

    #[test]
    fn test_rejects_trailing_content() {
        assert_eq!(
            parse_string_list("['a'] extra"),
            Err(ListParseError::TrailingContent(6))
        );
    }

    #[test]
    fn test_rejects_unclosed_list() {
        assert_eq!(
            parse_string_list("['a',"),
            Err(ListParseError::UnexpectedEnd)
        );
    }

    #[test]
    fn test_format_round_trips() {
        let values = vec![
            "Audi".to_string(),
            "Don't Know".to_string(),
            "Back\\slash".to_string(),
        ];
        let rendered = format_string_list(&values);
        assert_eq!(parse_string_list(&rendered).unwrap(), values);
    }

    #[test]
    fn test_non_ascii_values() {
        assert_eq!(
            parse_string_list("['Škoda', 'Citroën']").unwrap(),
            vec!["Škoda", "Citroën"]
        );
    }
}

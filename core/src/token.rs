//! Command-line tokenization.
//!
//! Splits a raw input line into tokens on whitespace, with double-quoted
//! regions in which whitespace is literal. Pure and schema-independent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokenization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A quoted region was opened but never closed.
    #[error("unterminated quote starting at column {0}")]
    UnterminatedQuote(usize),
}

/// Options controlling [`tokenize`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizeOptions {
    /// Accept an unterminated trailing quote instead of failing. Used by
    /// completion, where the line under the cursor is routinely half-typed.
    pub lenient: bool,
}

/// One token of input.
///
/// The `quoted` flag records whether any part of the token came from a
/// quoted region, so formatting can reproduce the quoting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub quoted: bool,
}

impl Token {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            quoted: false,
        }
    }

    /// Renders the token back into command-line form, restoring quotes when
    /// the text needs them or originally had them.
    pub fn render(&self) -> String {
        if self.quoted || needs_quoting(&self.text) {
            format!("\"{}\"", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Whether a bare token would survive re-tokenization unchanged.
pub fn needs_quoting(text: &str) -> bool {
    text.is_empty() || text.chars().any(|c| c.is_whitespace() || c == '"')
}

/// Splits a line into tokens.
///
/// Whitespace separates tokens outside quotes; a double quote toggles a
/// region in which whitespace is literal. Quotes themselves are stripped.
/// An empty or whitespace-only line yields no tokens.
///
/// # Examples
///
/// ```
/// use argline_core::{tokenize, TokenizeOptions};
///
/// let tokens = tokenize(r#"copy "my file.txt" /force"#, &TokenizeOptions::default()).unwrap();
/// let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, ["copy", "my file.txt", "/force"]);
/// assert!(tokens[1].quoted);
///
/// assert!(tokenize("\"open", &TokenizeOptions::default()).is_err());
/// ```
pub fn tokenize(line: &str, options: &TokenizeOptions) -> Result<Vec<Token>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut was_quoted = false;
    let mut quote_start: Option<usize> = None;

    for (column, ch) in line.chars().enumerate() {
        match ch {
            '"' => {
                if quote_start.is_some() {
                    quote_start = None;
                } else {
                    quote_start = Some(column);
                    was_quoted = true;
                    // `""` is a legal empty token.
                    in_token = true;
                }
            }
            c if c.is_whitespace() && quote_start.is_none() => {
                if in_token {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        quoted: was_quoted,
                    });
                    in_token = false;
                    was_quoted = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(column) = quote_start {
        if !options.lenient {
            return Err(TokenizeError::UnterminatedQuote(column));
        }
    }

    if in_token {
        tokens.push(Token {
            text: current,
            quoted: was_quoted,
        });
    }

    Ok(tokens)
}

/// Joins tokens back into a single line, quoting where required.
pub fn render_line(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::render)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_simple_split() {
        let tokens = tokenize("one two\tthree", &TokenizeOptions::default()).unwrap();
        assert_eq!(texts(&tokens), ["one", "two", "three"]);
        assert!(tokens.iter().all(|t| !t.quoted));
    }

    #[test]
    fn test_tokenize_empty_line() {
        assert!(tokenize("", &TokenizeOptions::default()).unwrap().is_empty());
        assert!(tokenize("   \t ", &TokenizeOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_quoted_whitespace() {
        let tokens = tokenize(r#"say "hello world" now"#, &TokenizeOptions::default()).unwrap();
        assert_eq!(texts(&tokens), ["say", "hello world", "now"]);
        assert!(tokens[1].quoted);
    }

    #[test]
    fn test_tokenize_quote_adjacent_to_text() {
        // A quoted region glued to bare text is one token.
        let tokens = tokenize(r#"pre"fix more"post"#, &TokenizeOptions::default()).unwrap();
        assert_eq!(texts(&tokens), ["prefix morepost"]);
        assert!(tokens[0].quoted);
    }

    #[test]
    fn test_tokenize_empty_quoted_token() {
        let tokens = tokenize(r#"a "" b"#, &TokenizeOptions::default()).unwrap();
        assert_eq!(texts(&tokens), ["a", "", "b"]);
        assert!(tokens[1].quoted);
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        let err = tokenize(r#"go "half"#, &TokenizeOptions::default()).unwrap_err();
        assert_eq!(err, TokenizeError::UnterminatedQuote(3));
    }

    #[test]
    fn test_tokenize_unterminated_quote_lenient() {
        let options = TokenizeOptions { lenient: true };
        let tokens = tokenize(r#"go "half done"#, &options).unwrap();
        assert_eq!(texts(&tokens), ["go", "half done"]);
    }

    #[test]
    fn test_render_line_round_trip() {
        let line = r#"copy "my file.txt" /force"#;
        let tokens = tokenize(line, &TokenizeOptions::default()).unwrap();
        assert_eq!(render_line(&tokens), line);
    }

    #[test]
    fn test_needs_quoting() {
        assert!(needs_quoting(""));
        assert!(needs_quoting("two words"));
        assert!(!needs_quoting("/name=value"));
    }
}

use crate::error::TokenizationError;
use crate::token::{Token, TokenStream};
use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_DELIMITER: &str = r"\s+";

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(DEFAULT_DELIMITER).expect("valid regex");
}

/// Splits raw field values into a [`TokenStream`] on a delimiter pattern.
///
/// Only splitting happens here: no trimming, case folding or filtering. That is
/// left to the analyzers.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    delim: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self { Self { delim: (*WHITESPACE).clone() } }
}

impl Tokenizer {
    pub fn new(pattern: &str) -> Result<Self, TokenizationError> {
        Ok(Self { delim: Regex::new(pattern)? })
    }

    /// Split `text` on every maximal delimiter match.
    ///
    /// A leading delimiter produces a leading empty token and trailing empty
    /// segments are dropped, so a value made only of delimiters yields an empty
    /// stream. Fails on empty input.
    pub fn consume(&self, text: &str) -> Result<TokenStream, TokenizationError> {
        if text.is_empty() {
            return Err(TokenizationError::EmptyInput);
        }
        let mut parts: Vec<&str> = self.delim.split(text).collect();
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }
        Ok(parts.into_iter().map(Token::from).collect())
    }
}

use std::fmt;

/// A single normalized fragment of a field value. Equality and ordering follow the text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(text: impl Into<String>) -> Self { Token(text.into()) }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn into_string(self) -> String { self.0 }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self { Token(s.to_string()) }
}

impl From<String> for Token {
    fn from(s: String) -> Self { Token(s) }
}

/// Ordered, finite and rewindable sequence of tokens produced by one tokenization call.
///
/// Reading advances an internal cursor; [`TokenStream::reset`] rewinds it so the
/// same stream can be walked again from the start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self { Self { tokens, cursor: 0 } }

    pub fn len(&self) -> usize { self.tokens.len() }

    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    pub fn reset(&mut self) { self.cursor = 0; }

    pub fn has_next(&self) -> bool { self.cursor < self.tokens.len() }

    /// Token at `index`, independent of the cursor.
    pub fn get(&self, index: usize) -> Option<&Token> { self.tokens.get(index) }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.tokens.len() - self.cursor;
        (left, Some(left))
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self { TokenStream::new(iter.into_iter().collect()) }
}

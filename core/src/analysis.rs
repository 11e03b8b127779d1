//! Field-specific normalization of token streams.
//!
//! An [`Analyzer`] takes a whole [`TokenStream`] and returns a new one. The
//! builder asks an [`AnalyzerFactory`] for the analyzer of each field; a field
//! with no analyzer is indexed exactly as the tokenizer split it.

use crate::config::AnalysisConfig;
use crate::document::FieldName;
use crate::token::{Token, TokenStream};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref EDGE_PUNCT: Regex = Regex::new(r"^[^\p{L}\p{N}]+|[^\p{L}\p{N}]+$").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Field-appropriate transformation of a token stream.
///
/// Takes the stream by value: the input is fully consumed and a stream with the
/// same relative order of surviving tokens comes back.
pub trait Analyzer: Send + Sync {
    fn process(&self, stream: TokenStream) -> TokenStream;
}

/// Per-token step of a [`FilterChain`]. Returning `None` drops the token.
pub trait TokenFilter: Send + Sync {
    fn apply(&self, token: Token) -> Option<Token>;
}

/// Selects the analyzer for a field, if it has one.
pub trait AnalyzerFactory {
    fn analyzer_for(&self, field: FieldName) -> Option<&dyn Analyzer>;
}

/// Runs every token through the filters in order.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn TokenFilter>>,
}

impl FilterChain {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, filter: impl TokenFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl Analyzer for FilterChain {
    fn process(&self, mut stream: TokenStream) -> TokenStream {
        stream.reset();
        stream
            .filter_map(|token| self.filters.iter().try_fold(token, |t, f| f.apply(t)))
            .collect()
    }
}

/// NFKC normalization, optionally followed by lowercasing.
pub struct Normalize {
    pub lowercase: bool,
}

impl TokenFilter for Normalize {
    fn apply(&self, token: Token) -> Option<Token> {
        let normalized: String = token.as_str().nfkc().collect();
        Some(Token::new(if self.lowercase { normalized.to_lowercase() } else { normalized }))
    }
}

/// Strips non-alphanumeric characters from both ends; drops tokens left empty.
pub struct TrimPunctuation;

impl TokenFilter for TrimPunctuation {
    fn apply(&self, token: Token) -> Option<Token> {
        let trimmed = EDGE_PUNCT.replace_all(token.as_str(), "");
        if trimmed.is_empty() {
            None
        } else {
            Some(Token::new(trimmed.into_owned()))
        }
    }
}

/// Drops English stopwords. Expects lowercase input.
pub struct StopWords;

impl TokenFilter for StopWords {
    fn apply(&self, token: Token) -> Option<Token> {
        if STOPWORDS.contains(token.as_str()) { None } else { Some(token) }
    }
}

/// English Snowball stemming.
pub struct Stem {
    stemmer: Stemmer,
}

impl Default for Stem {
    fn default() -> Self { Self { stemmer: Stemmer::create(Algorithm::English) } }
}

impl TokenFilter for Stem {
    fn apply(&self, token: Token) -> Option<Token> {
        Some(Token::new(self.stemmer.stem(token.as_str()).into_owned()))
    }
}

/// Analyzers used unless the caller supplies its own factory.
///
/// Title and content get the full term chain; author and place are normalized
/// and trimmed; category is only normalized; date is indexed verbatim.
pub struct DefaultAnalyzerFactory {
    analyzers: HashMap<FieldName, FilterChain>,
}

impl Default for DefaultAnalyzerFactory {
    fn default() -> Self { Self::new(&AnalysisConfig::default()) }
}

impl DefaultAnalyzerFactory {
    pub fn new(config: &AnalysisConfig) -> Self {
        let normalize = || Normalize { lowercase: config.lowercase };
        let term_chain = || {
            let mut chain = FilterChain::new().with(normalize()).with(TrimPunctuation);
            if config.remove_stopwords {
                chain = chain.with(StopWords);
            }
            if config.stem {
                chain = chain.with(Stem::default());
            }
            chain
        };

        let mut analyzers = HashMap::new();
        analyzers.insert(FieldName::Title, term_chain());
        analyzers.insert(FieldName::Content, term_chain());
        analyzers.insert(FieldName::Author, FilterChain::new().with(normalize()).with(TrimPunctuation));
        analyzers.insert(FieldName::Place, FilterChain::new().with(normalize()).with(TrimPunctuation));
        analyzers.insert(FieldName::Category, FilterChain::new().with(normalize()));
        Self { analyzers }
    }
}

impl AnalyzerFactory for DefaultAnalyzerFactory {
    fn analyzer_for(&self, field: FieldName) -> Option<&dyn Analyzer> {
        self.analyzers.get(&field).map(|a| a as &dyn Analyzer)
    }
}

/// Factory with no analyzers: every field is indexed as tokenized.
#[derive(Debug, Default, Clone, Copy)]
pub struct Verbatim;

impl AnalyzerFactory for Verbatim {
    fn analyzer_for(&self, _field: FieldName) -> Option<&dyn Analyzer> { None }
}

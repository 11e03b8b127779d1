use std::path::PathBuf;
use thiserror::Error;

/// Raised when a raw field value cannot be turned into a token stream.
#[derive(Error, Debug)]
pub enum TokenizationError {
    #[error("string is empty")]
    EmptyInput,

    #[error("invalid delimiter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Errors surfaced while ingesting documents or writing the index files.
#[derive(Error, Debug)]
pub enum IndexBuildError {
    #[error("document has no FILE_ID value")]
    MissingFileId,

    #[error("FILE_ID {0:?} is not an integer")]
    InvalidFileId(String),

    #[error("invalid builder configuration: {0}")]
    InvalidConfig(String),

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexBuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexBuildError::Io { path: path.into(), source }
    }
}

/// Errors raised when reading a written index back.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("malformed record: {0:?}")]
    MalformedRecord(String),

    #[error("malformed posting: {0:?}")]
    MalformedPosting(String),

    #[error("record {key:?} declares {declared} postings but lists {actual}")]
    CountMismatch { key: String, declared: usize, actual: usize },

    #[error("malformed properties line: {0:?}")]
    MalformedProps(String),

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

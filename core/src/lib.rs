pub mod analysis;
pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod persist;
pub mod token;
pub mod tokenizer;

pub use builder::{IndexBuilder, IndexSummary, IngestMode, IngestOutcome};
pub use config::{AnalysisConfig, BuilderConfig};
pub use document::{Document, FieldName};
pub use error::{FormatError, IndexBuildError, TokenizationError};
pub use index::{FileId, IndexKind, InvertedIndex, Posting};

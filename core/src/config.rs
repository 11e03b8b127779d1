use crate::error::IndexBuildError;
use crate::tokenizer::DEFAULT_DELIMITER;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Settings for one index build session.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Directory the five output files are written into.
    pub index_dir: PathBuf,
    /// Regex the tokenizer splits field values on.
    pub delimiter: String,
    /// Records per output line; each line is flushed before the next is built.
    pub batch_size: usize,
    pub analysis: AnalysisConfig,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            index_dir: PathBuf::from("./index"),
            delimiter: DEFAULT_DELIMITER.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl BuilderConfig {
    pub fn validate(&self) -> Result<(), IndexBuildError> {
        if self.batch_size == 0 {
            return Err(IndexBuildError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.delimiter.is_empty() {
            return Err(IndexBuildError::InvalidConfig("delimiter must not be empty".into()));
        }
        Ok(())
    }
}

/// Switches for the default analyzer chains.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: true,
            stem: true,
        }
    }
}

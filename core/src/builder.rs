use crate::analysis::{AnalyzerFactory, DefaultAnalyzerFactory};
use crate::config::BuilderConfig;
use crate::document::{Document, FieldName};
use crate::error::{IndexBuildError, TokenizationError};
use crate::index::{FileId, IndexKind, InvertedIndex, Posting};
use crate::persist::{save_document_count, save_index, IndexPaths};
use crate::token::TokenStream;
use crate::tokenizer::Tokenizer;
use std::collections::{HashMap, HashSet};
use std::fs;

/// How a call to [`IndexBuilder::add_document`] treated the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// First time this file id was seen: every field was indexed.
    Full,
    /// File id already seen: only CATEGORY values were indexed.
    CategoryOnly,
}

/// Result of ingesting one document. Field values that failed to tokenize are
/// listed here and skipped; the rest of the document is still indexed.
#[derive(Debug)]
pub struct IngestOutcome {
    pub file_id: FileId,
    pub mode: IngestMode,
    pub skipped: Vec<(FieldName, TokenizationError)>,
}

/// What [`IndexBuilder::close`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    pub num_docs: usize,
    pub records: Vec<(IndexKind, usize)>,
}

impl IndexSummary {
    pub fn records_for(&self, kind: IndexKind) -> usize {
        self.records.iter().find(|(k, _)| *k == kind).map_or(0, |(_, n)| *n)
    }
}

#[derive(Default)]
struct Indices {
    term: InvertedIndex,
    author: InvertedIndex,
    category: InvertedIndex,
    place: InvertedIndex,
}

impl Indices {
    fn new() -> Self {
        Self {
            term: InvertedIndex::with_capacity(50_000),
            author: InvertedIndex::with_capacity(1_000),
            category: InvertedIndex::with_capacity(100),
            place: InvertedIndex::with_capacity(1_000),
        }
    }

    fn get(&self, kind: IndexKind) -> &InvertedIndex {
        match kind {
            IndexKind::Term => &self.term,
            IndexKind::Author => &self.author,
            IndexKind::Category => &self.category,
            IndexKind::Place => &self.place,
        }
    }

    fn get_mut(&mut self, kind: IndexKind) -> &mut InvertedIndex {
        match kind {
            IndexKind::Term => &mut self.term,
            IndexKind::Author => &mut self.author,
            IndexKind::Category => &mut self.category,
            IndexKind::Place => &mut self.place,
        }
    }
}

/// Single-writer build session producing the term, author, category and place
/// indices plus the document count.
///
/// Tokenizer and analyzer factory are owned by the builder; nothing is shared
/// between sessions.
pub struct IndexBuilder<F: AnalyzerFactory = DefaultAnalyzerFactory> {
    paths: IndexPaths,
    tokenizer: Tokenizer,
    analyzers: F,
    batch_size: usize,
    indices: Indices,
    seen: HashSet<FileId>,
}

impl IndexBuilder<DefaultAnalyzerFactory> {
    /// Builder with the default analyzers, configured from `config`.
    pub fn from_config(config: &BuilderConfig) -> Result<Self, IndexBuildError> {
        config.validate()?;
        let tokenizer =
            Tokenizer::new(&config.delimiter).map_err(|e| IndexBuildError::InvalidConfig(e.to_string()))?;
        let analyzers = DefaultAnalyzerFactory::new(&config.analysis);
        Ok(Self::new(IndexPaths::new(&config.index_dir), tokenizer, analyzers, config.batch_size))
    }
}

impl<F: AnalyzerFactory> IndexBuilder<F> {
    /// Builder from explicit parts. Unlike [`IndexBuilder::from_config`] nothing
    /// is validated here; a `batch_size` of 0 writes one record per line.
    pub fn new(paths: IndexPaths, tokenizer: Tokenizer, analyzers: F, batch_size: usize) -> Self {
        Self {
            paths,
            tokenizer,
            analyzers,
            batch_size,
            indices: Indices::new(),
            seen: HashSet::new(),
        }
    }

    /// Index one document.
    ///
    /// The first call for a file id indexes every field. Later calls for the same
    /// id only add the document's CATEGORY values, which is how documents with
    /// several categories arrive.
    pub fn add_document(&mut self, doc: &Document) -> Result<IngestOutcome, IndexBuildError> {
        let raw_id = doc.first_value(FieldName::FileId).ok_or(IndexBuildError::MissingFileId)?;
        let file_id: FileId = raw_id.parse().map_err(|_| IndexBuildError::InvalidFileId(raw_id.to_string()))?;
        let mut skipped = Vec::new();

        if self.seen.contains(&file_id) {
            match doc.get_field(FieldName::Category) {
                Some(values) => self.index_values(FieldName::Category, values, file_id, None, &mut skipped),
                None => tracing::warn!(file_id, "repeated document carries no category"),
            }
            tracing::debug!(file_id, "reprocessed categories");
            return Ok(IngestOutcome { file_id, mode: IngestMode::CategoryOnly, skipped });
        }

        let author_org = doc.first_value(FieldName::AuthorOrg);
        for field in FieldName::ALL {
            if matches!(field, FieldName::FileId | FieldName::AuthorOrg) {
                continue;
            }
            if let Some(values) = doc.get_field(field) {
                self.index_values(field, values, file_id, author_org, &mut skipped);
            }
        }
        self.seen.insert(file_id);
        tracing::debug!(file_id, skipped = skipped.len(), "indexed document");
        Ok(IngestOutcome { file_id, mode: IngestMode::Full, skipped })
    }

    fn index_values(
        &mut self,
        field: FieldName,
        values: &[String],
        file_id: FileId,
        author_org: Option<&str>,
        skipped: &mut Vec<(FieldName, TokenizationError)>,
    ) {
        for value in values {
            let stream = match self.tokenizer.consume(value) {
                Ok(stream) => stream,
                Err(err) => {
                    tracing::warn!(file_id, %field, error = %err, "skipping field value");
                    skipped.push((field, err));
                    continue;
                }
            };
            let stream = match self.analyzers.analyzer_for(field) {
                Some(analyzer) => analyzer.process(stream),
                None => stream,
            };
            self.accumulate(stream, field, file_id, author_org);
        }
    }

    /// Count each term of `stream` and append one posting per distinct term to
    /// the index `field` routes to. AUTHOR keys are qualified as `name|org` when
    /// an organization is given. Fields with no index are ignored.
    pub fn accumulate(&mut self, mut stream: TokenStream, field: FieldName, file_id: FileId, author_org: Option<&str>) {
        let Some(kind) = IndexKind::for_field(field) else { return };
        let org = author_org.filter(|_| field == FieldName::Author);

        stream.reset();
        let mut counts: HashMap<String, u32> = HashMap::with_capacity(stream.len());
        for token in stream {
            if token.is_empty() {
                continue;
            }
            *counts.entry(token.into_string()).or_insert(0) += 1;
        }

        let index = self.indices.get_mut(kind);
        for (term, count) in counts {
            let key = match org {
                Some(org) => format!("{term}|{org}"),
                None => term,
            };
            index.add_posting(key, Posting::new(file_id, count));
        }
    }

    pub fn index(&self, kind: IndexKind) -> &InvertedIndex { self.indices.get(kind) }

    pub fn postings(&self, kind: IndexKind, key: &str) -> Option<&[Posting]> { self.indices.get(kind).postings(key) }

    pub fn has_seen(&self, file_id: FileId) -> bool { self.seen.contains(&file_id) }

    /// Number of distinct documents fully processed so far.
    pub fn num_docs(&self) -> usize { self.seen.len() }

    /// Sort and write all four indices and the document count, then release the
    /// session. Files written before a failure are left in place.
    pub fn close(mut self) -> Result<IndexSummary, IndexBuildError> { self.flush_all() }

    fn flush_all(&mut self) -> Result<IndexSummary, IndexBuildError> {
        fs::create_dir_all(&self.paths.root).map_err(|e| IndexBuildError::io(&self.paths.root, e))?;

        let mut records = Vec::with_capacity(IndexKind::ALL.len());
        for kind in IndexKind::ALL {
            let index = std::mem::take(self.indices.get_mut(kind));
            let written = save_index(&self.paths, kind, index, self.batch_size)?;
            tracing::info!(%kind, records = written, path = %self.paths.index_file(kind).display(), "wrote index");
            records.push((kind, written));
        }

        let num_docs = self.seen.len();
        save_document_count(&self.paths, num_docs)?;
        self.seen.clear();
        self.seen.shrink_to_fit();
        tracing::info!(num_docs, "index build complete");
        Ok(IndexSummary { num_docs, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Verbatim;
    use crate::token::Token;

    fn verbatim(dir: &std::path::Path) -> IndexBuilder<Verbatim> {
        IndexBuilder::new(IndexPaths::new(dir), Tokenizer::default(), Verbatim, 1000)
    }

    fn stream(words: &[&str]) -> TokenStream { words.iter().map(|w| Token::from(*w)).collect() }

    #[test]
    fn counts_term_frequency_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = verbatim(dir.path());
        b.accumulate(stream(&["a", "b", "a"]), FieldName::Content, 7, None);
        assert_eq!(b.postings(IndexKind::Term, "a").unwrap(), &[Posting::new(7, 2)]);
        assert_eq!(b.postings(IndexKind::Term, "b").unwrap(), &[Posting::new(7, 1)]);
    }

    #[test]
    fn accumulate_rewinds_and_ignores_unrouted_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = verbatim(dir.path());
        let mut s = stream(&["x", "x"]);
        s.next();
        b.accumulate(s, FieldName::Place, 1, None);
        assert_eq!(b.postings(IndexKind::Place, "x").unwrap(), &[Posting::new(1, 2)]);

        b.accumulate(stream(&["meta"]), FieldName::AuthorOrg, 1, None);
        assert!(IndexKind::ALL.iter().all(|k| b.postings(*k, "meta").is_none()));
    }

    #[test]
    fn org_only_qualifies_authors() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = verbatim(dir.path());
        b.accumulate(stream(&["smith"]), FieldName::Author, 3, Some("reuters"));
        b.accumulate(stream(&["smith"]), FieldName::Title, 3, Some("reuters"));
        assert!(b.postings(IndexKind::Author, "smith|reuters").is_some());
        assert!(b.postings(IndexKind::Author, "smith").is_none());
        assert!(b.postings(IndexKind::Term, "smith").is_some());
    }

    #[test]
    fn flush_releases_indices_and_seen_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = verbatim(dir.path());
        let mut doc = Document::with_file_id(1);
        doc.set_field(FieldName::Content, ["hello world"]);
        doc.set_field(FieldName::Category, ["grain"]);
        b.add_document(&doc).unwrap();

        let summary = b.flush_all().unwrap();
        assert_eq!(summary.num_docs, 1);
        assert_eq!(summary.records_for(IndexKind::Term), 2);
        assert!(IndexKind::ALL.iter().all(|k| b.index(*k).is_empty()));
        assert_eq!(b.num_docs(), 0);
    }

    #[test]
    fn missing_or_bad_file_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = verbatim(dir.path());
        assert!(matches!(b.add_document(&Document::new()), Err(IndexBuildError::MissingFileId)));
        assert!(matches!(
            b.add_document(&Document::with_file_id("x1")),
            Err(IndexBuildError::InvalidFileId(id)) if id == "x1"
        ));
        assert_eq!(b.num_docs(), 0);
    }
}

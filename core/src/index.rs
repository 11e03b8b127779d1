use crate::document::FieldName;
use std::collections::HashMap;
use std::fmt;

/// Signed, like the document ids it is parsed from.
pub type FileId = i32;

/// The four posting-list structures written by one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Term,
    Author,
    Category,
    Place,
}

/// Which index each indexable field feeds. Fields absent here are never indexed.
const FIELD_ROUTES: &[(FieldName, IndexKind)] = &[
    (FieldName::Title, IndexKind::Term),
    (FieldName::Content, IndexKind::Term),
    (FieldName::Date, IndexKind::Term),
    (FieldName::Author, IndexKind::Author),
    (FieldName::Category, IndexKind::Category),
    (FieldName::Place, IndexKind::Place),
];

impl IndexKind {
    pub const ALL: [IndexKind; 4] = [IndexKind::Term, IndexKind::Author, IndexKind::Category, IndexKind::Place];

    pub fn for_field(field: FieldName) -> Option<IndexKind> {
        FIELD_ROUTES.iter().find(|(f, _)| *f == field).map(|(_, kind)| *kind)
    }

    pub fn file_name(self) -> &'static str {
        match self {
            IndexKind::Term => "term.idx",
            IndexKind::Author => "author.idx",
            IndexKind::Category => "category.idx",
            IndexKind::Place => "place.idx",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexKind::Term => "term",
            IndexKind::Author => "author",
            IndexKind::Category => "category",
            IndexKind::Place => "place",
        };
        f.write_str(name)
    }
}

/// One document's contribution to a key: `file_id/frequency` on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Posting {
    pub file_id: FileId,
    pub frequency: u32,
}

impl Posting {
    pub fn new(file_id: FileId, frequency: u32) -> Self { Self { file_id, frequency } }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}/{}", self.file_id, self.frequency) }
}

/// Key -> postings, in insertion order until [`InvertedIndex::into_sorted`].
///
/// The same `(key, file_id)` pair may appear more than once when a document
/// contributes a key in separate calls; entries are never merged.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(capacity: usize) -> Self { Self { postings: HashMap::with_capacity(capacity) } }

    pub fn add_posting(&mut self, key: String, posting: Posting) { self.postings.entry(key).or_default().push(posting); }

    pub fn postings(&self, key: &str) -> Option<&[Posting]> { self.postings.get(key).map(Vec::as_slice) }

    /// Number of distinct keys.
    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    /// Drain into `(key, postings)` pairs with keys sorted lexicographically and
    /// each list sorted by the string form of its postings.
    pub fn into_sorted(self) -> Vec<(String, Vec<Posting>)> {
        let mut entries: Vec<(String, Vec<Posting>)> = self.postings.into_iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        for (_, list) in entries.iter_mut() {
            list.sort_by_cached_key(|p| p.to_string());
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_fields_to_indices() {
        assert_eq!(IndexKind::for_field(FieldName::Title), Some(IndexKind::Term));
        assert_eq!(IndexKind::for_field(FieldName::Content), Some(IndexKind::Term));
        assert_eq!(IndexKind::for_field(FieldName::Date), Some(IndexKind::Term));
        assert_eq!(IndexKind::for_field(FieldName::Author), Some(IndexKind::Author));
        assert_eq!(IndexKind::for_field(FieldName::Category), Some(IndexKind::Category));
        assert_eq!(IndexKind::for_field(FieldName::Place), Some(IndexKind::Place));
        assert_eq!(IndexKind::for_field(FieldName::FileId), None);
        assert_eq!(IndexKind::for_field(FieldName::AuthorOrg), None);
    }

    #[test]
    fn keeps_duplicate_postings() {
        let mut idx = InvertedIndex::new();
        idx.add_posting("grain".into(), Posting::new(4, 1));
        idx.add_posting("grain".into(), Posting::new(4, 1));
        assert_eq!(idx.postings("grain").unwrap().len(), 2);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn sorts_postings_by_string_form() {
        let mut idx = InvertedIndex::new();
        idx.add_posting("b".into(), Posting::new(2, 1));
        idx.add_posting("b".into(), Posting::new(10, 3));
        idx.add_posting("a".into(), Posting::new(7, 1));
        let sorted = idx.into_sorted();
        assert_eq!(sorted[0].0, "a");
        assert_eq!(sorted[1].0, "b");
        // "10/3" < "2/1" as strings
        assert_eq!(sorted[1].1, vec![Posting::new(10, 3), Posting::new(2, 1)]);
    }
}

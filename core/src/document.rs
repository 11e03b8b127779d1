use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The closed set of document fields understood by the index builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    FileId,
    Title,
    Content,
    Author,
    AuthorOrg,
    Category,
    Place,
    Date,
}

impl FieldName {
    pub const ALL: [FieldName; 8] = [
        FieldName::FileId,
        FieldName::Title,
        FieldName::Content,
        FieldName::Author,
        FieldName::AuthorOrg,
        FieldName::Category,
        FieldName::Place,
        FieldName::Date,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::FileId => "file_id",
            FieldName::Title => "title",
            FieldName::Content => "content",
            FieldName::Author => "author",
            FieldName::AuthorOrg => "author_org",
            FieldName::Category => "category",
            FieldName::Place => "place",
            FieldName::Date => "date",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A parsed document: every field holds zero or more string values, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fields: HashMap<FieldName, Vec<String>>,
}

impl Document {
    pub fn new() -> Self { Self::default() }

    /// Shorthand for a document carrying only its FILE_ID.
    pub fn with_file_id(file_id: impl fmt::Display) -> Self {
        let mut doc = Self::new();
        doc.set_field(FieldName::FileId, [file_id.to_string()]);
        doc
    }

    /// Replace all values of `field`.
    pub fn set_field<I, S>(&mut self, field: FieldName, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.insert(field, values.into_iter().map(Into::into).collect());
    }

    /// Append one value to `field`.
    pub fn add_value(&mut self, field: FieldName, value: impl Into<String>) {
        self.fields.entry(field).or_default().push(value.into());
    }

    /// Values of `field`, or `None` when the document never set it.
    pub fn get_field(&self, field: FieldName) -> Option<&[String]> { self.fields.get(&field).map(Vec::as_slice) }

    pub fn first_value(&self, field: FieldName) -> Option<&str> {
        self.get_field(field).and_then(|v| v.first()).map(String::as_str)
    }
}

//! On-disk layout of a built index.
//!
//! Each `.idx` file holds `#`-terminated records of the form
//! `key/count:[file/freq, file/freq, ...]`, grouped onto lines of at most
//! `batch_size` records. `idx.props` holds the single line `N=<documents>`.

use crate::error::{FormatError, IndexBuildError};
use crate::index::{IndexKind, InvertedIndex, Posting};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const RECORD_END: char = '#';
const PROPS_FILE: &str = "idx.props";

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn index_file(&self, kind: IndexKind) -> PathBuf { self.root.join(kind.file_name()) }
    pub fn props(&self) -> PathBuf { self.root.join(PROPS_FILE) }
}

/// One decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub postings: Vec<Posting>,
}

/// Append `key/count:[p1, p2, ...]#` to `out`.
pub fn format_record(out: &mut String, key: &str, postings: &[Posting]) {
    // Writing into a String cannot fail.
    let _ = write!(out, "{key}/{}:[", postings.len());
    for (i, p) in postings.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{p}");
    }
    out.push(']');
    out.push(RECORD_END);
}

/// Write records, `batch_size` per line, flushing after every line.
///
/// The last line holds the remainder and is always written, even when empty.
/// Returns the number of records written.
pub fn write_records<W, I>(writer: &mut W, records: I, batch_size: usize) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (String, Vec<Posting>)>,
{
    let batch_size = batch_size.max(1);
    let mut buf = String::new();
    let mut count = 0usize;
    for (key, postings) in records {
        format_record(&mut buf, &key, &postings);
        count += 1;
        if count % batch_size == 0 {
            writer.write_all(buf.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            buf.clear();
        }
    }
    writer.write_all(buf.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(count)
}

/// Sort and write one index to its file. The file handle is closed before returning.
pub fn save_index(paths: &IndexPaths, kind: IndexKind, index: InvertedIndex, batch_size: usize) -> Result<usize, IndexBuildError> {
    let path = paths.index_file(kind);
    let file = File::create(&path).map_err(|e| IndexBuildError::io(&path, e))?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, index.into_sorted(), batch_size).map_err(|e| IndexBuildError::io(&path, e))
}

pub fn save_document_count(paths: &IndexPaths, num_docs: usize) -> Result<(), IndexBuildError> {
    let path = paths.props();
    fs::write(&path, format!("N={num_docs}")).map_err(|e| IndexBuildError::io(&path, e))
}

pub fn parse_posting(s: &str) -> Result<Posting, FormatError> {
    let bad = || FormatError::MalformedPosting(s.to_string());
    let (file_id, frequency) = s.split_once('/').ok_or_else(bad)?;
    Ok(Posting {
        file_id: file_id.parse().map_err(|_| bad())?,
        frequency: frequency.parse().map_err(|_| bad())?,
    })
}

/// Decode one record, with or without its trailing `#`.
///
/// Keys may themselves contain `/` or `:`; the posting list is located from the
/// right, since postings never contain `:[`.
pub fn parse_record(s: &str) -> Result<Record, FormatError> {
    let bad = || FormatError::MalformedRecord(s.to_string());
    let s = s.strip_suffix(RECORD_END).unwrap_or(s);
    let body = s.strip_suffix(']').ok_or_else(bad)?;
    let open = body.rfind(":[").ok_or_else(bad)?;
    let (head, list) = (&body[..open], &body[open + 2..]);
    let (key, declared) = head.rsplit_once('/').ok_or_else(bad)?;
    let declared: usize = declared.parse().map_err(|_| bad())?;

    let postings = if list.is_empty() {
        Vec::new()
    } else {
        list.split(", ").map(parse_posting).collect::<Result<Vec<_>, _>>()?
    };
    if postings.len() != declared {
        return Err(FormatError::CountMismatch { key: key.to_string(), declared, actual: postings.len() });
    }
    Ok(Record { key: key.to_string(), postings })
}

/// Decode every record of a `.idx` body.
///
/// Keys may contain newlines, so the body is split on `#` only. A batch break
/// is a single `\n` right after a `#`; it is stripped from the next piece, and a
/// tail holding nothing but batch breaks is ignored. A key that itself starts
/// with `\n` is indistinguishable from a batch break and loses that newline.
pub fn parse_records(text: &str) -> Result<Vec<Record>, FormatError> {
    let mut pieces: Vec<&str> = text.split(RECORD_END).collect();
    if pieces.last().is_some_and(|tail| tail.chars().all(|c| c == '\n')) {
        pieces.pop();
    }
    pieces
        .into_iter()
        .map(|piece| piece.strip_prefix('\n').unwrap_or(piece))
        .map(parse_record)
        .collect()
}

pub fn load_index(paths: &IndexPaths, kind: IndexKind) -> Result<Vec<Record>, FormatError> {
    let path = paths.index_file(kind);
    let text = fs::read_to_string(&path).map_err(|source| FormatError::Io { path, source })?;
    parse_records(&text)
}

pub fn load_document_count(paths: &IndexPaths) -> Result<u32, FormatError> {
    let path = paths.props();
    let text = fs::read_to_string(&path).map_err(|source| FormatError::Io { path, source })?;
    let line = text.trim();
    line.strip_prefix("N=")
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| FormatError::MalformedProps(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<(String, Vec<Posting>)> {
        (0..n).map(|i| (format!("k{i:04}"), vec![Posting::new(i as i32, 1)])).collect()
    }

    #[test]
    fn formats_record_like_a_list() {
        let mut out = String::new();
        format_record(&mut out, "grain", &[Posting::new(10, 1), Posting::new(2, 3)]);
        assert_eq!(out, "grain/2:[10/1, 2/3]#");
    }

    #[test]
    fn batches_records_per_line() {
        let mut out = Vec::new();
        let written = write_records(&mut out, entries(5), 2).unwrap();
        assert_eq!(written, 5);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "k0000/1:[0/1]#k0001/1:[1/1]#");
        assert_eq!(lines[2], "k0004/1:[4/1]#");
    }

    #[test]
    fn full_last_batch_leaves_empty_line() {
        let mut out = Vec::new();
        write_records(&mut out, entries(4), 2).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('\n').count(), 3);
        assert!(text.ends_with("#\n\n"));
    }

    #[test]
    fn parses_keys_with_separators() {
        let rec = parse_record("03/26/1987/2:[1/1, 9/2]#").unwrap();
        assert_eq!(rec.key, "03/26/1987");
        assert_eq!(rec.postings, vec![Posting::new(1, 1), Posting::new(9, 2)]);

        let rec = parse_record("smith|reuters/1:[4/1]").unwrap();
        assert_eq!(rec.key, "smith|reuters");
    }

    #[test]
    fn rejects_count_mismatch_and_garbage() {
        assert!(matches!(parse_record("a/3:[1/1]"), Err(FormatError::CountMismatch { declared: 3, actual: 1, .. })));
        assert!(matches!(parse_record("a/1:[x/1]"), Err(FormatError::MalformedPosting(_))));
        assert!(matches!(parse_record("no list here"), Err(FormatError::MalformedRecord(_))));
    }

    #[test]
    fn parse_records_spans_lines() {
        let recs = parse_records("a/1:[1/1]#b/1:[2/1]#\nc/1:[3/2]#\n\n").unwrap();
        let keys: Vec<&str> = recs.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert!(parse_records("\n").unwrap().is_empty());
        assert!(parse_records("").unwrap().is_empty());
    }

    #[test]
    fn keys_with_newlines_survive_batch_breaks() {
        let mut out = Vec::new();
        let records = vec![
            ("a\nb".to_string(), vec![Posting::new(1, 1)]),
            ("c".to_string(), vec![Posting::new(2, 1)]),
            ("d\n".to_string(), vec![Posting::new(3, 1)]),
        ];
        write_records(&mut out, records, 2).unwrap();
        let text = String::from_utf8(out).unwrap();
        let keys: Vec<String> = parse_records(&text).unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["a\nb", "c", "d\n"]);
    }
}

//! CSV parser for translation tables
//!
//! The header row names the languages: its first cell labels the identifier
//! column and is ignored, every other cell is a language code. Each data row
//! holds an identifier followed by one translation per language.

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::dialect::{sniff_sample, Dialect, SAMPLE_SIZE};
use crate::error::{Error, Result};
use crate::language::LanguageSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Rows whose identifier starts with this and that have no other content are skipped
pub const COMMENT_MARKER: char = '#';

/// Parse a CSV file into a LanguageSet
///
/// Without a dialect, one is sniffed from the first [`SAMPLE_SIZE`] bytes.
/// Every key is stored as `prefix + identifier`.
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    dialect: Option<&Dialect>,
    prefix: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<LanguageSet> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_str(&content, &path.display().to_string(), dialect, prefix, sink)
}

/// Parse CSV from a string, `source_name` identifies it in diagnostics
pub fn parse_str(
    content: &str,
    source_name: &str,
    dialect: Option<&Dialect>,
    prefix: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<LanguageSet> {
    let dialect = match dialect {
        Some(dialect) => *dialect,
        None => {
            let (sample, truncated) = sample_of(content);
            detect_dialect(sample, truncated, source_name, sink)
        }
    };

    parse_table(content, source_name, &dialect, prefix, sink)
}

/// Parse a whole table from a reader with a known dialect
pub fn parse_reader<R: Read>(
    mut reader: R,
    source_name: &str,
    dialect: &Dialect,
    prefix: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<LanguageSet> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| Error::FileRead {
            path: PathBuf::from(source_name),
            source: e,
        })?;

    parse_table(&content, source_name, dialect, prefix, sink)
}

fn parse_table(
    content: &str,
    source_name: &str,
    dialect: &Dialect,
    prefix: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<LanguageSet> {
    let csv_err = |e| Error::Csv {
        path: PathBuf::from(source_name),
        source: e,
    };

    let lines = LineIndex::new(content);
    let mut csv_reader = dialect.reader_builder().from_reader(content.as_bytes());
    let mut records = csv_reader.records();

    let mut languages = LanguageSet::new();

    // A table without a header is empty, not broken
    let header = match records.next() {
        Some(header) => header.map_err(csv_err)?,
        None => return Ok(languages),
    };

    let mut columns: Vec<(usize, String)> = Vec::new();
    for (index, code) in header.iter().enumerate().skip(1) {
        if code.is_empty() {
            sink.report(Diagnostic::new(
                source_name,
                header.position().map(|p| lines.line_of(p.byte())),
                DiagnosticKind::BlankLanguageColumn { column: index },
            ));
            continue;
        }
        languages.language_mut(code);
        columns.push((index, code.to_string()));
    }

    for result in records {
        let record = result.map_err(csv_err)?;
        let line = record.position().map(|p| lines.line_of(p.byte()));

        let identifier = record.get(0).unwrap_or_default();
        let rest_empty = record.iter().skip(1).all(str::is_empty);

        if identifier.is_empty() {
            if !rest_empty {
                sink.report(Diagnostic::new(
                    source_name,
                    line,
                    DiagnosticKind::MissingIdentifier,
                ));
            }
            continue;
        }

        if rest_empty && identifier.starts_with(COMMENT_MARKER) {
            continue;
        }

        let surplus = record.iter().skip(header.len()).any(|c| !c.is_empty());
        if surplus {
            sink.report(Diagnostic::new(
                source_name,
                line,
                DiagnosticKind::ExtraCells {
                    expected: header.len(),
                    found: record.len(),
                },
            ));
        }

        let key = format!("{}{}", prefix, identifier);
        for (index, code) in &columns {
            // Short rows count as empty cells
            let translation = record.get(*index).unwrap_or_default();
            if translation.is_empty() {
                sink.report(Diagnostic::new(
                    source_name,
                    line,
                    DiagnosticKind::MissingTranslation {
                        language: code.clone(),
                        key: key.clone(),
                    },
                ));
            }
            languages.insert(code, key.clone(), translation);
        }
    }

    Ok(languages)
}

/// Sniffing sample of a table and whether it was cut short
fn sample_of(content: &str) -> (&str, bool) {
    let mut end = content.len().min(SAMPLE_SIZE);
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    (&content[..end], end < content.len())
}

/// Maps byte offsets of records to 1-based line numbers
struct LineIndex<'a> {
    content: &'a [u8],
    newlines: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(content: &'a str) -> Self {
        let content = content.as_bytes();
        let newlines = content
            .iter()
            .enumerate()
            .filter(|(_, &b)| b == b'\n')
            .map(|(i, _)| i)
            .collect();
        Self { content, newlines }
    }

    /// Line of the record starting at `byte`
    ///
    /// csv reports a record as starting where the previous one ended, so
    /// blank lines and the `\n` of a CRLF terminator are skipped first.
    fn line_of(&self, byte: u64) -> u64 {
        let len = self.content.len();
        let mut start = usize::try_from(byte).map_or(len, |b| b.min(len));
        while start < len && matches!(self.content[start], b'\r' | b'\n') {
            start += 1;
        }
        1 + self.newlines.partition_point(|&n| n < start) as u64
    }
}

fn detect_dialect(
    sample: &str,
    truncated: bool,
    source_name: &str,
    sink: &mut dyn DiagnosticSink,
) -> Dialect {
    match sniff_sample(sample, truncated) {
        Some(dialect) => {
            tracing::debug!("Sniffed dialect for {}: {}", source_name, dialect);
            dialect
        }
        None => {
            sink.report(Diagnostic::new(
                source_name,
                None,
                DiagnosticKind::DialectFallback,
            ));
            Dialect::default()
        }
    }
}

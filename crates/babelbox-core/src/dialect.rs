//! CSV dialects and dialect sniffing

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bytes read from the start of a table for sniffing
pub const SAMPLE_SIZE: usize = 1024;

/// Delimiters tried by [`sniff`], in order of preference on ties
pub const CANDIDATE_DELIMITERS: &[u8] = b",;\t|";

/// Share of sample records that must agree on the field count
const MIN_CONSISTENCY: f64 = 0.5;

/// How records end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineTerminator {
    /// `\r\n`, `\r` or `\n`
    CrLf,
    /// `\n` only
    Lf,
}

/// When fields are quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStyle {
    Minimal,
    All,
    NonNumeric,
    /// Quote characters have no special meaning
    None,
}

/// Lexical conventions for splitting table text into fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    pub escape: Option<u8>,
    /// Two quote characters inside a quoted field stand for one
    pub double_quote: bool,
    pub terminator: LineTerminator,
    pub quoting: QuoteStyle,
}

impl Dialect {
    /// Comma separated, double quotes, minimal quoting
    pub const EXCEL: Dialect = Dialect {
        delimiter: b',',
        quote: b'"',
        escape: None,
        double_quote: true,
        terminator: LineTerminator::CrLf,
        quoting: QuoteStyle::Minimal,
    };

    /// Like [`Dialect::EXCEL`] but tab separated
    pub const EXCEL_TAB: Dialect = Dialect {
        delimiter: b'\t',
        ..Dialect::EXCEL
    };

    /// Comma separated, `\n` terminated, every field quoted
    pub const UNIX: Dialect = Dialect {
        delimiter: b',',
        quote: b'"',
        escape: None,
        double_quote: true,
        terminator: LineTerminator::Lf,
        quoting: QuoteStyle::All,
    };

    pub fn with_delimiter(self, delimiter: u8) -> Self {
        Self { delimiter, ..self }
    }

    pub fn with_quote(self, quote: u8) -> Self {
        Self { quote, ..self }
    }

    /// Build a csv reader configured for this dialect
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .escape(self.escape)
            .double_quote(self.double_quote)
            .quoting(self.quoting != QuoteStyle::None)
            .terminator(match self.terminator {
                LineTerminator::CrLf => csv::Terminator::CRLF,
                LineTerminator::Lf => csv::Terminator::Any(b'\n'),
            });
        builder
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::EXCEL
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delimiter={:?} quote={:?} escape={:?} double_quote={} terminator={:?} quoting={:?}",
            self.delimiter as char,
            self.quote as char,
            self.escape.map(char::from),
            self.double_quote,
            self.terminator,
            self.quoting
        )
    }
}

/// Dialects that can be selected by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamedDialect {
    Excel,
    ExcelTab,
    Unix,
}

impl NamedDialect {
    pub fn dialect(self) -> Dialect {
        match self {
            NamedDialect::Excel => Dialect::EXCEL,
            NamedDialect::ExcelTab => Dialect::EXCEL_TAB,
            NamedDialect::Unix => Dialect::UNIX,
        }
    }
}

impl FromStr for NamedDialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "excel" => Ok(NamedDialect::Excel),
            "excel-tab" => Ok(NamedDialect::ExcelTab),
            "unix" => Ok(NamedDialect::Unix),
            other => Err(Error::InvalidDialect(format!(
                "unknown dialect '{}', expected excel, excel-tab or unix",
                other
            ))),
        }
    }
}

/// Explicit dialect choices made by the user
///
/// When any field is set, sniffing is skipped entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialectOptions {
    pub named: Option<NamedDialect>,
    pub delimiter: Option<char>,
    pub quote: Option<char>,
}

impl DialectOptions {
    /// The dialect to parse with, or `None` if it should be sniffed
    pub fn resolve(&self) -> Result<Option<Dialect>> {
        if self.named.is_none() && self.delimiter.is_none() && self.quote.is_none() {
            return Ok(None);
        }

        let mut dialect = self.named.map(NamedDialect::dialect).unwrap_or_default();
        if let Some(delimiter) = self.delimiter {
            dialect = dialect.with_delimiter(ascii_byte(delimiter, "delimiter")?);
        }
        if let Some(quote) = self.quote {
            dialect = dialect.with_quote(ascii_byte(quote, "quote character")?);
        }
        if dialect.delimiter == dialect.quote {
            return Err(Error::InvalidDialect(
                "delimiter and quote character must differ".to_string(),
            ));
        }

        Ok(Some(dialect))
    }
}

fn ascii_byte(c: char, what: &str) -> Result<u8> {
    if c.is_ascii() && c != '\n' && c != '\r' {
        Ok(c as u8)
    } else {
        Err(Error::InvalidDialect(format!(
            "{} {:?} must be a single ASCII character",
            what, c
        )))
    }
}

/// Guess the dialect of a table sample, falling back to [`Dialect::EXCEL`]
pub fn sniff(sample: &str) -> Dialect {
    try_sniff(sample).unwrap_or_default()
}

/// Guess the dialect of a table sample
///
/// Every candidate delimiter is scored by how many sample records share the
/// most common field count. Candidates that never split a record, or that
/// agree on fewer than half the records, are rejected. Returns `None` when
/// no candidate is left.
pub fn try_sniff(sample: &str) -> Option<Dialect> {
    sniff_sample(sample, sample.len() >= SAMPLE_SIZE)
}

/// Like [`try_sniff`], but the caller says whether the sample was cut off
/// before the end of the table
pub fn sniff_sample(sample: &str, truncated: bool) -> Option<Dialect> {
    let sample = sample.strip_prefix('\u{feff}').unwrap_or(sample);
    let quote = detect_quote(sample);

    let mut best: Option<(f64, usize, u8)> = None;
    for &delimiter in CANDIDATE_DELIMITERS {
        let counts = field_counts(sample, delimiter, quote, truncated);
        let Some((fields, consistency)) = uniformity(&counts) else {
            continue;
        };
        if fields < 2 || consistency < MIN_CONSISTENCY {
            continue;
        }

        let better = match best {
            None => true,
            Some((best_consistency, best_fields, _)) => {
                consistency > best_consistency
                    || (consistency == best_consistency && fields > best_fields)
            }
        };
        if better {
            best = Some((consistency, fields, delimiter));
        }
    }

    best.map(|(_, _, delimiter)| Dialect {
        delimiter,
        quote,
        ..Dialect::EXCEL
    })
}

/// Field count of every non-blank record in the sample
///
/// Delimiters and line breaks inside quotes do not count. When the sample was
/// cut off, the last record is dropped unless it is the only one.
fn field_counts(sample: &str, delimiter: u8, quote: u8, truncated: bool) -> Vec<usize> {
    let delimiter = delimiter as char;
    let quote = quote as char;

    let mut counts = Vec::new();
    let mut in_quotes = false;
    let mut fields = 1;
    let mut blank = true;

    for c in sample.chars() {
        if c == quote {
            in_quotes = !in_quotes;
            blank = false;
        } else if in_quotes {
            continue;
        } else if c == delimiter {
            fields += 1;
            blank = false;
        } else if c == '\n' {
            if !blank {
                counts.push(fields);
            }
            fields = 1;
            blank = true;
        } else if !c.is_whitespace() {
            blank = false;
        }
    }

    if !blank && (!truncated || counts.is_empty()) {
        counts.push(fields);
    }
    counts
}

/// Most common field count and the share of records having it
fn uniformity(counts: &[usize]) -> Option<(usize, f64)> {
    if counts.is_empty() {
        return None;
    }

    let mut tally: Vec<(usize, usize)> = Vec::new();
    for &count in counts {
        match tally.iter_mut().find(|(fields, _)| *fields == count) {
            Some((_, n)) => *n += 1,
            None => tally.push((count, 1)),
        }
    }

    // Ties go to the wider layout
    let (fields, n) = tally
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))?;

    Some((fields, n as f64 / counts.len() as f64))
}

fn is_candidate_delimiter(c: char) -> bool {
    c.is_ascii() && CANDIDATE_DELIMITERS.contains(&(c as u8))
}

/// Pick `'` over `"` only when the sample clearly quotes fields with it
fn detect_quote(sample: &str) -> u8 {
    let quoted_with = |q: char| {
        sample
            .lines()
            .flat_map(|line| line.split(is_candidate_delimiter))
            .map(str::trim)
            .filter(|field| field.len() >= 2 && field.starts_with(q) && field.ends_with(q))
            .count()
    };

    if quoted_with('\'') > quoted_with('"') {
        b'\''
    } else {
        b'"'
    }
}

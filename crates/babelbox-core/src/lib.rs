//! babelbox-core: Core library for turning CSV translation tables into language files
//!
//! This library provides functionality to:
//! - Detect the CSV dialect of a table from a short sample
//! - Parse tables into per-language translation mappings
//! - Resolve files and directories into ordered lists of tables
//! - Merge tables with last-source-wins semantics
//! - Write one JSON file per language

pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod dialect;
pub mod error;
pub mod language;
pub mod merger;
pub mod parser;
pub mod scanner;
pub mod writer;

pub use config::{ConvertOptions, ProjectConfig, SourceErrorPolicy};
pub use convert::{convert, load_all, load_languages, resolve_output_dir, ConvertReport};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, LogSink, Severity};
pub use dialect::{sniff, sniff_sample, try_sniff, Dialect, DialectOptions, NamedDialect};
pub use error::{Error, Result};
pub use language::{LanguageMapping, LanguageSet};
pub use merger::{merge_into, merge_languages};
pub use parser::{parse_file, parse_reader, parse_str};
pub use scanner::{resolve_source, resolve_sources, SourceFile};
pub use writer::{render_language, write_language_files};

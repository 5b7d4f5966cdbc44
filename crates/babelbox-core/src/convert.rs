//! The conversion pipeline: resolve sources, parse, merge, write

use crate::config::{ConvertOptions, SourceErrorPolicy};
use crate::diagnostics::DiagnosticSink;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::language::LanguageSet;
use crate::merger::merge_into;
use crate::parser::parse_file;
use crate::scanner::resolve_source;
use crate::writer::write_language_files;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a conversion run
#[derive(Debug, Clone, Default)]
pub struct ConvertReport {
    /// Directory the files were (or, on a dry run, would be) written to
    pub output_dir: PathBuf,
    /// Number of keys per language code
    pub languages: Vec<(String, usize)>,
    /// Keys summed over all languages
    pub key_count: usize,
    /// Files written, empty on a dry run
    pub files_written: Vec<PathBuf>,
    /// Sources skipped because they could not be read
    pub skipped_sources: Vec<PathBuf>,
}

/// Load and merge every table of a single source
pub fn load_languages<P: AsRef<Path>>(
    source: P,
    options: &ConvertOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<LanguageSet> {
    let dialect = options.dialect.resolve()?;
    load_source(source.as_ref(), options.prefix_identifiers, dialect.as_ref(), sink)
}

/// Load and merge all sources in the given order
///
/// Later sources override earlier ones on key collisions. A source that
/// cannot be read aborts the load unless the options say to skip it.
pub fn load_all<P: AsRef<Path>>(
    sources: &[P],
    options: &ConvertOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<LanguageSet> {
    load_all_reporting(sources, options, sink).map(|(languages, _)| languages)
}

/// Pick the output directory for a run
///
/// An explicit directory always wins. Otherwise a single directory source
/// is its own output directory and a single file source writes next to
/// itself. With several sources there is no sensible guess.
pub fn resolve_output_dir<P: AsRef<Path>>(sources: &[P], out: Option<&Path>) -> Result<PathBuf> {
    if let Some(out) = out {
        return Ok(out.to_path_buf());
    }

    match sources {
        [source] => {
            let source = source.as_ref();
            if source.is_dir() {
                Ok(source.to_path_buf())
            } else {
                Ok(source
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default())
            }
        }
        _ => Err(Error::AmbiguousOutput {
            sources: sources.len(),
        }),
    }
}

/// Convert all sources into one JSON file per language
///
/// The output directory is created if needed. On a dry run everything is
/// computed but nothing is written.
pub fn convert<P: AsRef<Path>>(
    sources: &[P],
    options: &ConvertOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<ConvertReport> {
    let output_dir = resolve_output_dir(sources, options.out.as_deref())?;
    let (languages, skipped_sources) = load_all_reporting(sources, options, sink)?;

    let mut report = ConvertReport {
        output_dir,
        languages: languages
            .iter()
            .map(|(code, translations)| (code.clone(), translations.len()))
            .collect(),
        key_count: languages.key_count(),
        files_written: Vec::new(),
        skipped_sources,
    };

    if options.dry_run {
        tracing::info!(
            "Dry run, skipping {} language file(s) for {}",
            languages.len(),
            report.output_dir.display()
        );
        return Ok(report);
    }

    // `Path::new("")` is the working directory and needs no creating
    if !report.output_dir.as_os_str().is_empty() {
        fs::create_dir_all(&report.output_dir).map_err(|e| Error::FileWrite {
            path: report.output_dir.clone(),
            source: e,
        })?;
    }

    report.files_written =
        write_language_files(&report.output_dir, &languages, options.indent.as_deref())?;
    tracing::info!(
        "Wrote {} language file(s) to {}",
        report.files_written.len(),
        report.output_dir.display()
    );

    Ok(report)
}

fn load_all_reporting<P: AsRef<Path>>(
    sources: &[P],
    options: &ConvertOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<(LanguageSet, Vec<PathBuf>)> {
    let dialect = options.dialect.resolve()?;

    let mut languages = LanguageSet::new();
    let mut skipped = Vec::new();

    for source in sources {
        let source = source.as_ref();
        match load_source(source, options.prefix_identifiers, dialect.as_ref(), sink) {
            Ok(loaded) => merge_into(&mut languages, loaded),
            Err(e) if options.on_source_error == SourceErrorPolicy::Skip => {
                tracing::error!("Skipping source {}: {}", source.display(), e);
                skipped.push(source.to_path_buf());
            }
            Err(e) => return Err(e),
        }
    }

    Ok((languages, skipped))
}

/// A source contributes nothing unless all of its tables load
fn load_source(
    source: &Path,
    prefix_identifiers: bool,
    dialect: Option<&Dialect>,
    sink: &mut dyn DiagnosticSink,
) -> Result<LanguageSet> {
    let mut languages = LanguageSet::new();
    for file in resolve_source(source, prefix_identifiers)? {
        tracing::info!("Loading {}", file.path.display());
        let loaded = parse_file(&file.path, dialect, &file.prefix, sink)?;
        merge_into(&mut languages, loaded);
    }
    Ok(languages)
}

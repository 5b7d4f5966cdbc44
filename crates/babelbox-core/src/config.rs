//! Conversion options and the optional JSON project file

use crate::dialect::{DialectOptions, NamedDialect};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name of a project file
pub const PROJECT_FILE_NAME: &str = "babelbox.json";

/// Indentation used when none is configured
pub const DEFAULT_INDENT: &str = "\t";

/// What to do when a source cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceErrorPolicy {
    /// Fail the whole run
    #[default]
    Abort,
    /// Log the error and continue with the remaining sources
    Skip,
}

/// Everything that controls a conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Prefix identifiers with their path relative to their source directory
    pub prefix_identifiers: bool,
    pub dialect: DialectOptions,
    /// JSON indentation, `None` writes compact files
    pub indent: Option<String>,
    /// Compute everything but write no files
    pub dry_run: bool,
    /// Output directory, derived from the sources if not set
    pub out: Option<PathBuf>,
    pub on_source_error: SourceErrorPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            prefix_identifiers: false,
            dialect: DialectOptions::default(),
            indent: Some(DEFAULT_INDENT.to_string()),
            dry_run: false,
            out: None,
            on_source_error: SourceErrorPolicy::default(),
        }
    }
}

/// Project file stored as JSON, e.g. `babelbox.json`
///
/// All fields are optional. Relative paths are taken as they are, so they
/// resolve against the working directory of the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub sources: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,
    pub prefix_identifiers: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<NamedDialect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotechar: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<String>,
    pub minify: bool,
    pub skip_bad_sources: bool,
}

impl ProjectConfig {
    /// Load a project file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the project file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(|e| Error::FileWrite {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Conversion options described by this file
    pub fn to_options(&self) -> ConvertOptions {
        let indent = if self.minify {
            None
        } else {
            Some(
                self.indent
                    .clone()
                    .unwrap_or_else(|| DEFAULT_INDENT.to_string()),
            )
        };

        ConvertOptions {
            prefix_identifiers: self.prefix_identifiers,
            dialect: DialectOptions {
                named: self.dialect,
                delimiter: self.delimiter,
                quote: self.quotechar,
            },
            indent,
            dry_run: false,
            out: self.out.clone(),
            on_source_error: if self.skip_bad_sources {
                SourceErrorPolicy::Skip
            } else {
                SourceErrorPolicy::Abort
            },
        }
    }
}

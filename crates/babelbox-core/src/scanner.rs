//! Source resolution: expanding files and directories into CSV tables

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// File extension of translation tables
pub const TABLE_EXTENSION: &str = "csv";

/// Joins path segments of a key prefix
pub const KEY_SEPARATOR: &str = ".";

/// A table file to parse and the prefix for its keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Prepended to every identifier, empty unless prefixing is enabled
    pub prefix: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            prefix: prefix.into(),
        }
    }
}

/// Expand a source into the table files it contains
///
/// A file yields itself without a prefix. A directory is walked recursively
/// in path order and yields every `.csv` file below it. With
/// `prefix_identifiers`, each file's prefix is its path relative to the
/// directory with the extension stripped, e.g. `sub/file.csv` -> `sub.file.`.
pub fn resolve_source<P: AsRef<Path>>(
    source: P,
    prefix_identifiers: bool,
) -> Result<Vec<SourceFile>> {
    let root = source.as_ref();

    if !root.exists() {
        return Err(Error::SourceNotFound(root.to_path_buf()));
    }

    if !root.is_dir() {
        return Ok(vec![SourceFile::new(root, "")]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type().is_file() || !is_table(path) {
            continue;
        }

        let prefix = if prefix_identifiers {
            key_prefix(root, path)
        } else {
            String::new()
        };
        files.push(SourceFile::new(path, prefix));
    }

    tracing::debug!("Resolved {} table(s) in {}", files.len(), root.display());
    Ok(files)
}

/// Resolve several sources, keeping the caller's order
pub fn resolve_sources<P: AsRef<Path>>(
    sources: &[P],
    prefix_identifiers: bool,
) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for source in sources {
        files.extend(resolve_source(source, prefix_identifiers)?);
    }
    Ok(files)
}

fn is_table(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TABLE_EXTENSION))
}

/// Key prefix derived from a file's path below `root`
fn key_prefix(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");

    let mut prefix = String::new();
    for component in relative.components() {
        if let Component::Normal(segment) = component {
            prefix.push_str(&segment.to_string_lossy());
            prefix.push_str(KEY_SEPARATOR);
        }
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "Ident,en\n").unwrap();
    }

    #[test]
    fn test_key_prefix_nested() {
        let prefix = key_prefix(Path::new("lang"), Path::new("lang/sub/file.csv"));
        assert_eq!(prefix, "sub.file.");
    }

    #[test]
    fn test_key_prefix_top_level() {
        let prefix = key_prefix(Path::new("lang"), Path::new("lang/items.csv"));
        assert_eq!(prefix, "items.");
    }

    #[test]
    fn test_resolve_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.csv");
        touch(&file);

        let files = resolve_source(&file, true).unwrap();
        assert_eq!(files, vec![SourceFile::new(&file, "")]);
    }

    #[test]
    fn test_resolve_directory_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.csv"));
        touch(&dir.path().join("a.csv"));
        touch(&dir.path().join("sub/c.csv"));
        touch(&dir.path().join("notes.txt"));

        let files = resolve_source(dir.path(), false).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();

        assert_eq!(
            paths,
            vec![
                dir.path().join("a.csv"),
                dir.path().join("b.csv"),
                dir.path().join("sub/c.csv"),
            ]
        );
        assert!(files.iter().all(|f| f.prefix.is_empty()));
    }

    #[test]
    fn test_resolve_extension_any_case() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Strings.CSV"));
        touch(&dir.path().join("menu.Csv"));

        let files = resolve_source(dir.path(), true).unwrap();
        let prefixes: Vec<_> = files.iter().map(|f| f.prefix.as_str()).collect();

        assert_eq!(prefixes, vec!["Strings.", "menu."]);
    }

    #[test]
    fn test_resolve_directory_with_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("sub/file.csv"));
        touch(&dir.path().join("sub/deeper/more.csv"));
        touch(&dir.path().join("top.csv"));

        let files = resolve_source(dir.path(), true).unwrap();
        let prefixes: Vec<_> = files.iter().map(|f| f.prefix.as_str()).collect();

        assert_eq!(prefixes, vec!["sub.deeper.more.", "sub.file.", "top."]);
    }

    #[test]
    fn test_resolve_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_source(dir.path().join("missing"), false);

        assert!(matches!(result, Err(Error::SourceNotFound(_))));
    }

    #[test]
    fn test_resolve_sources_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("z.csv");
        let second = dir.path().join("a.csv");
        touch(&first);
        touch(&second);

        let files = resolve_sources(&[&first, &second], false).unwrap();
        assert_eq!(files[0].path, first);
        assert_eq!(files[1].path, second);
    }
}

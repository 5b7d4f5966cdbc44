//! Writing of per-language JSON files

use crate::error::{Error, Result};
use crate::language::{LanguageMapping, LanguageSet};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File extension of generated language files
pub const OUTPUT_EXTENSION: &str = "json";

/// Write one `<code>.json` file per language into `out_dir`
///
/// `out_dir` must already exist. With an indent the JSON is pretty printed
/// using that string per level, otherwise it is written compactly.
/// Non-ASCII text is written as is.
pub fn write_language_files<P: AsRef<Path>>(
    out_dir: P,
    languages: &LanguageSet,
    indent: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();

    // Every code is checked before the first file is touched
    let targets = languages
        .iter()
        .map(|(code, translations)| Ok((language_file_path(out_dir, code)?, translations)))
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::with_capacity(targets.len());
    for (path, translations) in targets {
        let write_err = |e| Error::FileWrite {
            path: path.clone(),
            source: e,
        };

        let file = File::create(&path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        write_mapping(&mut writer, translations, indent)?;
        writer.flush().map_err(write_err)?;

        tracing::debug!("Wrote {} keys to {}", translations.len(), path.display());
        written.push(path);
    }

    Ok(written)
}

/// Render one language as a JSON document
pub fn render_language(translations: &LanguageMapping, indent: Option<&str>) -> Result<String> {
    let mut buf = Vec::new();
    write_mapping(&mut buf, translations, indent)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_mapping<W: Write>(
    writer: W,
    translations: &LanguageMapping,
    indent: Option<&str>,
) -> Result<()> {
    match indent {
        Some(indent) => {
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = Serializer::with_formatter(writer, formatter);
            translations.serialize(&mut serializer)?;
        }
        None => serde_json::to_writer(writer, translations)?,
    }
    Ok(())
}

/// Output path for a language, refusing codes that would leave `out_dir`
fn language_file_path(out_dir: &Path, code: &str) -> Result<PathBuf> {
    if code.is_empty() || code == "." || code == ".." || code.contains(['/', '\\']) {
        return Err(Error::InvalidLanguageCode(code.to_string()));
    }
    Ok(out_dir.join(format!("{}.{}", code, OUTPUT_EXTENSION)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample() -> LanguageSet {
        let mut languages = LanguageSet::new();
        languages.insert("en_us", "x", "1");
        languages.insert("en_us", "y", "");
        languages.insert("de_de", "x", "Löffel");
        languages
    }

    #[test]
    fn test_render_compact() {
        let languages = sample();
        let json = render_language(languages.get("en_us").unwrap(), None).unwrap();
        assert_eq!(json, r#"{"x":"1","y":""}"#);
    }

    #[test]
    fn test_render_indented() {
        let languages = sample();
        let json = render_language(languages.get("en_us").unwrap(), Some("\t")).unwrap();
        assert_eq!(json, "{\n\t\"x\": \"1\",\n\t\"y\": \"\"\n}");
    }

    #[test]
    fn test_render_keeps_non_ascii() {
        let languages = sample();
        let json = render_language(languages.get("de_de").unwrap(), Some("  ")).unwrap();
        assert!(json.contains("Löffel"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_write_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let languages = sample();

        let written = write_language_files(dir.path(), &languages, Some("    ")).unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("en_us.json"), dir.path().join("de_de.json")]
        );

        for (code, expected) in &languages {
            let content = fs::read_to_string(dir.path().join(format!("{}.json", code))).unwrap();
            let parsed: LanguageMapping = serde_json::from_str(&content).unwrap();
            assert_eq!(&parsed, expected);
        }
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en_us.json"), "stale content that is longer").unwrap();

        let mut languages = LanguageSet::new();
        languages.insert("en_us", "k", "v");
        write_language_files(dir.path(), &languages, None).unwrap();

        let content = fs::read_to_string(dir.path().join("en_us.json")).unwrap();
        assert_eq!(content, r#"{"k":"v"}"#);
    }

    #[test]
    fn test_write_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_language_files(dir.path().join("missing"), &sample(), None);
        assert!(matches!(result, Err(Error::FileWrite { .. })));
    }

    #[test]
    fn test_invalid_code_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut languages = LanguageSet::new();
        languages.insert("en", "k", "v");
        languages.insert("../evil", "k", "v");

        let result = write_language_files(dir.path(), &languages, None);

        assert!(matches!(result, Err(Error::InvalidLanguageCode(_))));
        assert!(!dir.path().join("en.json").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_reject_path_like_codes() {
        let dir = tempfile::tempdir().unwrap();
        let mut languages = LanguageSet::new();
        languages.insert("../evil", "k", "v");

        let result = write_language_files(dir.path(), &languages, None);
        assert!(matches!(result, Err(Error::InvalidLanguageCode(_))));
    }
}

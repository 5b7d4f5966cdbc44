//! Merging of language sets from several tables
//!
//! Sets are applied in order. For each language the key mappings are united,
//! and on a key collision the set applied last wins.

use crate::language::LanguageSet;

/// Merge language sets in order, later sets overriding earlier ones
pub fn merge_languages<I>(sets: I) -> LanguageSet
where
    I: IntoIterator<Item = LanguageSet>,
{
    let mut merged = LanguageSet::new();
    for set in sets {
        merge_into(&mut merged, set);
    }
    merged
}

/// Apply `overlay` on top of `base`
pub fn merge_into(base: &mut LanguageSet, overlay: LanguageSet) {
    for (code, translations) in overlay {
        let target = base.language_mut(&code);
        for (key, translation) in translations {
            target.insert(key, translation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;
    use crate::parser::parse_str;

    fn table(csv: &str) -> LanguageSet {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        parse_str(csv, "test.csv", None, "", &mut diagnostics).unwrap()
    }

    #[test]
    fn test_merge_single_set() {
        let set = table("Ident,en,de\nx,1,2\ny,3,4\n");
        assert_eq!(merge_languages(vec![set.clone()]), set);
    }

    #[test]
    fn test_merge_nothing() {
        assert!(merge_languages(Vec::new()).is_empty());
    }

    #[test]
    fn test_merge_unites_keys() {
        let a = table("Ident,en\nhello,Hi\n");
        let b = table("Ident,en\ngoodbye,Bye\n");

        let merged = merge_languages(vec![a, b]);

        let en = merged.get("en").unwrap();
        assert_eq!(en.len(), 2);
        assert_eq!(en.keys().collect::<Vec<_>>(), vec!["hello", "goodbye"]);
    }

    #[test]
    fn test_merge_last_wins() {
        let a = table("Ident,en\nx,A\ny,A\nz,A\n");
        let b = table("Ident,en\nx,B\ny,B\n");
        let c = table("Ident,en\nx,C\n");

        let merged = merge_languages(vec![a.clone(), b.clone(), c.clone()]);
        assert_eq!(merged.translation("en", "x"), Some("C"));
        assert_eq!(merged.translation("en", "y"), Some("B"));
        assert_eq!(merged.translation("en", "z"), Some("A"));

        let swapped = merge_languages(vec![a, c, b]);
        assert_eq!(swapped.translation("en", "x"), Some("B"));
    }

    #[test]
    fn test_merge_is_associative() {
        let a = table("Ident,en,de\nx,a,a\n");
        let b = table("Ident,en,fr\nx,b,b\ny,b,b\n");
        let c = table("Ident,de\ny,c\n");

        let flat = merge_languages(vec![a.clone(), b.clone(), c.clone()]);
        let nested = merge_languages(vec![merge_languages(vec![a, b]), c]);
        assert_eq!(flat, nested);
    }

    #[test]
    fn test_merge_keeps_languages_missing_elsewhere() {
        let a = table("Ident,en,de\nx,1,2\n");
        let b = table("Ident,en\ny,3\n");

        let merged = merge_languages(vec![a, b]);

        assert_eq!(merged.codes().collect::<Vec<_>>(), vec!["en", "de"]);
        assert_eq!(merged.translation("de", "x"), Some("2"));
        assert_eq!(merged.translation("de", "y"), None);
        assert_eq!(merged.translation("en", "y"), Some("3"));
    }

    #[test]
    fn test_later_empty_translation_overrides() {
        let a = table("Ident,en\nx,1\n");
        let b = table("Ident,en\nx,\n");

        let merged = merge_languages(vec![a, b]);
        assert_eq!(merged.translation("en", "x"), Some(""));
    }
}

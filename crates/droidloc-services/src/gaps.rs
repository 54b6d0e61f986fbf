use std::collections::BTreeMap;
use std::path::PathBuf;

use color_eyre::eyre::bail;
use droidloc_core::{ConsolidationTable, LocaleId, Result, TranslationGap};

/// Every (key, locale) cell missing against the default baseline, ordered by
/// key then locale so confirmation listings and tests see a stable sequence.
///
/// Target locales are the ones the scan actually found documents for; a
/// locale whose qualifier yields no language code is excluded here, before
/// anything reaches the translation step.
pub fn find_gaps(
    table: &ConsolidationTable,
    documents: &BTreeMap<LocaleId, PathBuf>,
) -> Result<Vec<TranslationGap>> {
    if table.default_entries().next().is_none() {
        bail!("no strings in the default values directory; nothing to use as a translation baseline");
    }

    let targets: Vec<(&LocaleId, &str, &PathBuf)> = table
        .locales()
        .filter(|locale| !locale.is_default())
        .filter_map(|locale| {
            let Some(language) = locale.language_code() else {
                tracing::debug!(locale = %locale, "no language code in qualifier, locale excluded");
                return None;
            };
            let document = documents.get(locale)?;
            Some((locale, language, document))
        })
        .collect();

    let mut gaps = Vec::new();
    for (key, source) in table.default_entries() {
        for (locale, language, document) in &targets {
            if table.value(key, locale).is_some() {
                continue;
            }
            gaps.push(TranslationGap {
                key: key.to_string(),
                source: source.to_string(),
                locale: (*locale).clone(),
                language: (*language).to_string(),
                document: (*document).clone(),
            });
        }
    }

    Ok(gaps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_path(locale: &LocaleId) -> PathBuf {
        PathBuf::from(format!("res/{locale}/strings.xml"))
    }

    fn documents_for(table: &ConsolidationTable) -> BTreeMap<LocaleId, PathBuf> {
        table
            .locales()
            .map(|l| (l.clone(), doc_path(l)))
            .collect()
    }

    #[test]
    fn emits_exactly_the_missing_cells() {
        let mut table = ConsolidationTable::new();
        let default = LocaleId::default_locale();
        let fr = LocaleId::from_dir_name("values-fr").unwrap();
        table.insert("a", default.clone(), "Hello");
        table.insert("b", default, "World");
        table.insert("a", fr.clone(), "Bonjour");

        let gaps = find_gaps(&table, &documents_for(&table)).unwrap();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].key, "b");
        assert_eq!(gaps[0].source, "World");
        assert_eq!(gaps[0].locale, fr);
        assert_eq!(gaps[0].language, "fr");
        assert_eq!(gaps[0].document, doc_path(&fr));
    }

    #[test]
    fn order_is_key_then_locale() {
        let mut table = ConsolidationTable::new();
        let default = LocaleId::default_locale();
        table.insert("b", default.clone(), "B");
        table.insert("a", default, "A");
        table.register_locale(LocaleId::from_dir_name("values-fr").unwrap());
        table.register_locale(LocaleId::from_dir_name("values-de").unwrap());

        let gaps = find_gaps(&table, &documents_for(&table)).unwrap();
        let seq: Vec<(&str, &str)> = gaps
            .iter()
            .map(|g| (g.key.as_str(), g.locale.as_str()))
            .collect();
        assert_eq!(
            seq,
            [
                ("a", "values-de"),
                ("a", "values-fr"),
                ("b", "values-de"),
                ("b", "values-fr"),
            ]
        );
    }

    #[test]
    fn missing_baseline_is_a_hard_error() {
        let mut table = ConsolidationTable::new();
        table.insert("a", LocaleId::from_dir_name("values-fr").unwrap(), "Bonjour");
        let err = find_gaps(&table, &documents_for(&table)).unwrap_err();
        assert!(err.to_string().contains("baseline"), "{err}");
    }

    #[test]
    fn locales_without_language_code_are_not_targets() {
        let mut table = ConsolidationTable::new();
        table.insert("a", LocaleId::default_locale(), "Hello");
        table.register_locale(LocaleId::from_dir_name("values-b+").unwrap());

        let gaps = find_gaps(&table, &documents_for(&table)).unwrap();
        assert!(gaps.is_empty());
    }

    #[test]
    fn locale_without_a_document_is_tolerated() {
        let mut table = ConsolidationTable::new();
        table.insert("a", LocaleId::default_locale(), "Hello");
        table.register_locale(LocaleId::from_dir_name("values-fr").unwrap());

        let gaps = find_gaps(&table, &BTreeMap::new()).unwrap();
        assert!(gaps.is_empty());
    }

    #[test]
    fn present_empty_string_is_not_a_gap() {
        let mut table = ConsolidationTable::new();
        let fr = LocaleId::from_dir_name("values-fr").unwrap();
        table.insert("a", LocaleId::default_locale(), "Hello");
        table.insert("a", fr, "");

        let gaps = find_gaps(&table, &documents_for(&table)).unwrap();
        assert!(gaps.is_empty());
    }
}

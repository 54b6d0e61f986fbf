use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use droidloc_core::{Result, StringResourceAdapter, TranslationGap};
use droidloc_domain::{TranslateFileStat, TranslateSummary, SCHEMA_VERSION};
use droidloc_translate::Translator;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Copy each target document to `<name>.xml.bak` before its first write.
    pub backup: bool,
}

/// Translate and write every gap, in order, one blocking call at a time.
///
/// A failure on one gap is logged and counted; the batch keeps going and
/// already-applied writes stay. The accept/decline decision happened before
/// this function was called.
pub fn apply_gaps(
    gaps: &[TranslationGap],
    translator: &dyn Translator,
    adapter: &dyn StringResourceAdapter,
    opts: ApplyOptions,
) -> Result<TranslateSummary> {
    let mut translated = 0usize;
    let mut failed = 0usize;
    let mut per_file: BTreeMap<PathBuf, usize> = BTreeMap::new();
    let mut backed_up: HashSet<PathBuf> = HashSet::new();

    for gap in gaps {
        if opts.backup && !backed_up.contains(&gap.document) && gap.document.exists() {
            let bak = gap.document.with_extension("xml.bak");
            std::fs::copy(&gap.document, &bak)?;
            tracing::warn!("backup: {} -> {}", gap.document.display(), bak.display());
            backed_up.insert(gap.document.clone());
        }
        match apply_one(gap, translator, adapter) {
            Ok(()) => {
                translated += 1;
                *per_file.entry(gap.document.clone()).or_default() += 1;
            }
            Err(err) => {
                failed += 1;
                tracing::warn!(key = %gap.key, locale = %gap.locale, error = %err, "gap left untranslated");
            }
        }
    }

    Ok(TranslateSummary {
        schema_version: SCHEMA_VERSION,
        mode: "apply".to_string(),
        translated,
        failed,
        files: file_stats(per_file, "updated"),
    })
}

fn apply_one(
    gap: &TranslationGap,
    translator: &dyn Translator,
    adapter: &dyn StringResourceAdapter,
) -> Result<()> {
    let text = translator.translate(&gap.source, &gap.language)?;
    adapter.upsert_entry(&gap.document, &gap.key, &text)
}

/// What a run would touch, without translating or writing anything.
pub fn dry_run_summary(gaps: &[TranslationGap]) -> TranslateSummary {
    let mut per_file: BTreeMap<PathBuf, usize> = BTreeMap::new();
    for gap in gaps {
        *per_file.entry(gap.document.clone()).or_default() += 1;
    }
    TranslateSummary {
        schema_version: SCHEMA_VERSION,
        mode: "dry_run".to_string(),
        translated: 0,
        failed: 0,
        files: file_stats(per_file, "planned"),
    }
}

fn file_stats(per_file: BTreeMap<PathBuf, usize>, status: &str) -> Vec<TranslateFileStat> {
    per_file
        .into_iter()
        .map(|(path, keys)| TranslateFileStat {
            path: path.display().to_string(),
            keys,
            status: status.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::eyre;
    use droidloc_core::LocaleId;
    use droidloc_parsers_xml::{read_entries, XmlResourceAdapter, STRINGS_DOC};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    struct Tagging;

    impl Translator for Tagging {
        fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
            Ok(format!("{target_lang}:{text}"))
        }
        fn label(&self) -> String {
            "tagging stub".to_string()
        }
    }

    struct FailingOn(&'static str);

    impl Translator for FailingOn {
        fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
            if text == self.0 {
                return Err(eyre!("service unavailable"));
            }
            Ok(format!("{target_lang}:{text}"))
        }
        fn label(&self) -> String {
            "failing stub".to_string()
        }
    }

    fn seed_doc(dir: &Path, locale: &str, body: &str) -> PathBuf {
        let values = dir.join(locale);
        fs::create_dir_all(&values).unwrap();
        let doc = values.join(STRINGS_DOC);
        fs::write(&doc, format!("<resources>\n{body}</resources>\n")).unwrap();
        doc
    }

    fn gap(key: &str, source: &str, locale: &str, doc: &Path) -> TranslationGap {
        let locale = LocaleId::from_dir_name(locale).unwrap();
        let language = locale.language_code().unwrap().to_string();
        TranslationGap {
            key: key.to_string(),
            source: source.to_string(),
            locale,
            language,
            document: doc.to_path_buf(),
        }
    }

    #[test]
    fn applies_every_gap_through_the_adapter() {
        let dir = tempdir().unwrap();
        let doc = seed_doc(dir.path(), "values-fr", "");
        let gaps = vec![
            gap("a", "Hello", "values-fr", &doc),
            gap("b", "World", "values-fr", &doc),
        ];

        let summary =
            apply_gaps(&gaps, &Tagging, &XmlResourceAdapter, ApplyOptions::default()).unwrap();
        assert_eq!(summary.translated, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.files.len(), 1);
        assert_eq!(summary.files[0].keys, 2);

        let entries = read_entries(&doc).unwrap();
        assert!(entries.contains(&("a".to_string(), "fr:Hello".to_string())));
        assert!(entries.contains(&("b".to_string(), "fr:World".to_string())));
    }

    #[test]
    fn one_failing_gap_does_not_stop_the_batch() {
        let dir = tempdir().unwrap();
        let doc = seed_doc(dir.path(), "values-de", "");
        let gaps = vec![
            gap("a", "Hello", "values-de", &doc),
            gap("b", "World", "values-de", &doc),
        ];

        let summary = apply_gaps(
            &gaps,
            &FailingOn("Hello"),
            &XmlResourceAdapter,
            ApplyOptions::default(),
        )
        .unwrap();
        assert_eq!(summary.translated, 1);
        assert_eq!(summary.failed, 1);

        let entries = read_entries(&doc).unwrap();
        assert!(!entries.iter().any(|(k, _)| k == "a"));
        assert!(entries.contains(&("b".to_string(), "de:World".to_string())));
    }

    #[test]
    fn backup_copies_each_document_once() {
        let dir = tempdir().unwrap();
        let doc = seed_doc(dir.path(), "values-fr", "    <string name=\"old\">Keep</string>\n");
        let before = fs::read_to_string(&doc).unwrap();
        let gaps = vec![
            gap("a", "Hello", "values-fr", &doc),
            gap("b", "World", "values-fr", &doc),
        ];

        apply_gaps(&gaps, &Tagging, &XmlResourceAdapter, ApplyOptions { backup: true }).unwrap();

        let bak = doc.with_extension("xml.bak");
        assert_eq!(fs::read_to_string(&bak).unwrap(), before);
        assert_ne!(fs::read_to_string(&doc).unwrap(), before);
    }

    #[test]
    fn dry_run_summary_counts_without_touching_anything() {
        let dir = tempdir().unwrap();
        let doc = seed_doc(dir.path(), "values-fr", "");
        let before = fs::read_to_string(&doc).unwrap();
        let gaps = vec![
            gap("a", "Hello", "values-fr", &doc),
            gap("b", "World", "values-fr", &doc),
        ];

        let summary = dry_run_summary(&gaps);
        assert_eq!(summary.mode, "dry_run");
        assert_eq!(summary.translated, 0);
        assert_eq!(summary.files.len(), 1);
        assert_eq!(summary.files[0].keys, 2);
        assert_eq!(summary.files[0].status, "planned");
        assert_eq!(fs::read_to_string(&doc).unwrap(), before);
    }
}

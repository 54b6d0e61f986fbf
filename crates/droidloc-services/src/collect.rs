use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use color_eyre::eyre::bail;
use droidloc_core::{ConsolidationTable, LocaleId, Result, StringResourceAdapter};
use droidloc_parsers_xml::STRINGS_DOC;
use walkdir::WalkDir;

/// Conventional resource roots relative to a module, probed in order.
pub const RES_ROOT_CANDIDATES: &[&str] =
    &["res", "src/main/res", "src/debug/res", "src/release/res"];

/// Everything one collection pass produces: the consolidated table plus the
/// document each locale came from, needed later as the write-back target.
#[derive(Debug)]
pub struct ResourceScan {
    pub table: ConsolidationTable,
    pub documents: BTreeMap<LocaleId, PathBuf>,
}

/// First candidate under `module_root` that exists as a directory. None
/// resolving usually means a wrong module path, so that is a hard error
/// naming every path that was tried.
pub fn resolve_res_root(module_root: &Path) -> Result<PathBuf> {
    if !module_root.is_dir() {
        bail!("module root {} is not a directory", module_root.display());
    }
    for candidate in RES_ROOT_CANDIDATES {
        let path = module_root.join(candidate);
        if path.is_dir() {
            return Ok(path);
        }
    }
    bail!(
        "no resource directory found under {} (tried: {})",
        module_root.display(),
        RES_ROOT_CANDIDATES.join(", ")
    )
}

/// Walk `res_root` for `values*` directories holding a strings document and
/// fold their entries into one table. Invalid locale tokens and unreadable
/// documents are skipped; a scan that admits nothing at all is an error, not
/// an empty success.
pub fn collect_resources(
    res_root: &Path,
    adapter: &dyn StringResourceAdapter,
) -> Result<ResourceScan> {
    let mut table = ConsolidationTable::new();
    let mut documents: BTreeMap<LocaleId, PathBuf> = BTreeMap::new();

    for entry in WalkDir::new(res_root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(dir_name) = entry.file_name().to_str() else {
            continue;
        };
        if !dir_name.starts_with("values") {
            continue;
        }
        let Some(locale) = LocaleId::from_dir_name(dir_name) else {
            tracing::debug!(dir = dir_name, "not a locale qualifier, skipped");
            continue;
        };
        let doc = entry.path().join(STRINGS_DOC);
        if !doc.is_file() {
            continue;
        }
        match adapter.read_entries(&doc) {
            Ok(entries) => {
                table.register_locale(locale.clone());
                for (key, value) in entries {
                    table.insert(key, locale.clone(), value);
                }
                documents.insert(locale, doc);
            }
            Err(err) => {
                tracing::warn!(path = %doc.display(), error = %err, "skipping unreadable strings document");
            }
        }
    }

    if table.is_empty() {
        bail!(
            "no values directories with a {STRINGS_DOC} document under {}",
            res_root.display()
        );
    }

    Ok(ResourceScan { table, documents })
}

/// Resolve the resource root and collect in one step.
pub fn scan_module(module_root: &Path, adapter: &dyn StringResourceAdapter) -> Result<ResourceScan> {
    let res_root = resolve_res_root(module_root)?;
    tracing::debug!(res_root = %res_root.display(), "resource root resolved");
    collect_resources(&res_root, adapter)
}

/// Group label for exports, defaulting to the module directory's name.
pub fn module_label(module_root: &Path) -> String {
    let resolved = module_root
        .canonicalize()
        .unwrap_or_else(|_| module_root.to_path_buf());
    resolved
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "module".to_string())
}

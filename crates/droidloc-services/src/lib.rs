//! High-level orchestration layer over the format, translation, and export
//! crates. Intentionally thin: exposes stable functions used by the CLI.

pub mod apply;
pub mod collect;
pub mod export;
pub mod gaps;

pub use droidloc_core::{ConsolidationTable, LocaleId, Result, TranslationGap};

pub use apply::{apply_gaps, dry_run_summary, ApplyOptions};
pub use collect::{
    collect_resources, module_label, resolve_res_root, scan_module, ResourceScan,
    RES_ROOT_CANDIDATES,
};
pub use export::{export_table, ExportFormat};
pub use gaps::find_gaps;

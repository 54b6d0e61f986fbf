use std::path::PathBuf;

use color_eyre::eyre::{bail, Result};
use droidloc_parsers_xml::XmlResourceAdapter;
use droidloc_services::{export_table, module_label, scan_module, ExportFormat};

pub fn run_export(
    root: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    format: Option<String>,
    module_name: Option<String>,
) -> Result<()> {
    tracing::debug!(
        event = "export_args",
        root = ?root,
        out_dir = ?out_dir,
        format = ?format,
        module_name = ?module_name,
    );

    let cfg = super::load_config()?;
    let root = super::resolve_module_root(root, &cfg)?;
    let export_cfg = cfg.export.unwrap_or_default();

    let out_dir = out_dir
        .or_else(|| export_cfg.out_dir.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let format_name = format
        .or(export_cfg.format)
        .unwrap_or_else(|| "csv".to_string());
    let Some(format) = ExportFormat::from_name(&format_name) else {
        bail!("unknown export format {format_name:?}, expected csv or xlsx");
    };

    let scan = scan_module(&root, &XmlResourceAdapter)?;
    let module = module_name.unwrap_or_else(|| module_label(&root));
    let out = export_table(&scan.table, &module, &out_dir, format)?;

    ui_ok!(
        "Exported {} keys across {} locales to {}",
        scan.table.key_count(),
        scan.table.locale_count(),
        out.display()
    );
    Ok(())
}

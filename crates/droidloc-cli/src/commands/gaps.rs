use std::path::PathBuf;

use color_eyre::eyre::{bail, Result};
use droidloc_core::TranslationGap;
use droidloc_domain::{GapRecord, SCHEMA_VERSION};
use droidloc_parsers_xml::XmlResourceAdapter;
use droidloc_services::{find_gaps, scan_module};
use owo_colors::OwoColorize;

pub fn run_gaps(
    root: Option<PathBuf>,
    format: &str,
    out_json: Option<PathBuf>,
    use_color: bool,
) -> Result<()> {
    tracing::debug!(event = "gaps_args", root = ?root, format, out_json = ?out_json);

    let cfg = super::load_config()?;
    let root = super::resolve_module_root(root, &cfg)?;

    let scan = scan_module(&root, &XmlResourceAdapter)?;
    let gaps = find_gaps(&scan.table, &scan.documents)?;

    match format {
        "text" => print_text(&gaps, use_color),
        "json" => {
            let records: Vec<GapRecord> = gaps.iter().map(to_record).collect();
            match out_json {
                Some(path) => {
                    let file = std::fs::File::create(&path)?;
                    serde_json::to_writer_pretty(file, &records)?;
                    ui_ok!("Saved {} gap records to {}", records.len(), path.display());
                }
                None => ui_out!("{}", serde_json::to_string_pretty(&records)?),
            }
        }
        other => bail!("unknown output format {other:?}, expected text or json"),
    }
    Ok(())
}

fn print_text(gaps: &[TranslationGap], use_color: bool) {
    if gaps.is_empty() {
        ui_ok!("Every locale has all default strings");
        return;
    }
    for gap in gaps {
        if use_color {
            ui_out!(
                "{}  {} ({})  {:?}",
                gap.key.green(),
                gap.locale.to_string().cyan(),
                gap.language,
                gap.source
            );
        } else {
            ui_out!("{}  {} ({})  {:?}", gap.key, gap.locale, gap.language, gap.source);
        }
    }
    ui_info!("{} missing translation(s)", gaps.len());
}

fn to_record(gap: &TranslationGap) -> GapRecord {
    GapRecord {
        schema_version: SCHEMA_VERSION,
        key: gap.key.clone(),
        source: gap.source.clone(),
        locale: gap.locale.to_string(),
        language: gap.language.clone(),
        path: gap.document.display().to_string(),
    }
}

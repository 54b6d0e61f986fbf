use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use color_eyre::eyre::bail;
use droidloc_core::{ConsolidationTable, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "csv" => Some(ExportFormat::Csv),
            "xlsx" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Timestamp at second granularity keeps successive runs from overwriting
/// each other.
fn export_file_name(module: &str, format: ExportFormat, at: &DateTime<Local>) -> String {
    format!(
        "{module}_exported_strings_{}.{}",
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Serialize the table into `out_dir` under the timestamped name, in the
/// requested format. The directory must already exist.
pub fn export_table(
    table: &ConsolidationTable,
    module: &str,
    out_dir: &Path,
    format: ExportFormat,
) -> Result<PathBuf> {
    if !out_dir.is_dir() {
        bail!("export directory {} does not exist", out_dir.display());
    }
    let out = out_dir.join(export_file_name(module, format, &Local::now()));
    match format {
        ExportFormat::Csv => {
            let file = std::fs::File::create(&out)?;
            droidloc_export_csv::write_csv(file, module, table)?;
        }
        ExportFormat::Xlsx => {
            droidloc_export_xlsx::write_xlsx(&out, module, table)?;
        }
    }
    Ok(out)
}

use std::path::Path;

use color_eyre::eyre::Result;
use droidloc_core::ConsolidationTable;
use rust_xlsxwriter::Workbook;

const SHEET_NAME: &str = "Strings";

/// Write the consolidated table to an XLSX workbook with a single `Strings`
/// sheet. Same column schema as the CSV export so the two formats stay
/// interchangeable downstream.
pub fn write_xlsx(out: &Path, module: &str, table: &ConsolidationTable) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    sheet.write_string(0, 0, "Module")?;
    sheet.write_string(0, 1, "Key")?;
    for (idx, locale) in table.locales().enumerate() {
        sheet.write_string(0, 2 + idx as u16, locale.as_str())?;
    }

    for (row, key) in table.keys().enumerate() {
        let row = row as u32 + 1;
        sheet.write_string(row, 0, module)?;
        sheet.write_string(row, 1, key)?;
        for (idx, locale) in table.locales().enumerate() {
            let value = table.value(key, locale).unwrap_or("");
            sheet.write_string(row, 2 + idx as u16, value)?;
        }
    }

    workbook.save(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidloc_core::LocaleId;
    use tempfile::tempdir;

    #[test]
    fn writes_a_nonempty_workbook() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("strings.xlsx");
        let mut table = ConsolidationTable::new();
        table.insert("a", LocaleId::default_locale(), "Hello");
        table.insert("a", LocaleId::from_dir_name("values-fr").unwrap(), "Bonjour");
        write_xlsx(&out, "Module", &table).unwrap();
        let meta = std::fs::metadata(&out).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn empty_table_still_produces_a_header_workbook() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("empty.xlsx");
        write_xlsx(&out, "Module", &ConsolidationTable::new()).unwrap();
        assert!(out.is_file());
    }
}

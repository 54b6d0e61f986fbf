use droidloc_core::ConsolidationTable;
use std::io::Write;

use color_eyre::eyre::Result;

/// Write the consolidated table as CSV: fixed `Module`/`Key` columns, then
/// one column per locale in table order. Missing cells become empty fields,
/// and the csv crate quotes anything containing commas, quotes, or newlines.
pub fn write_csv<W: Write>(writer: W, module: &str, table: &ConsolidationTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Module".to_string(), "Key".to_string()];
    header.extend(table.locales().map(|l| l.as_str().to_string()));
    wtr.write_record(&header)?;

    for key in table.keys() {
        let mut record = vec![module.to_string(), key.to_string()];
        for locale in table.locales() {
            record.push(table.value(key, locale).unwrap_or("").to_string());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

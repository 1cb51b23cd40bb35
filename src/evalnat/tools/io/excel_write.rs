use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::evalnat::tools::error::Result;
use crate::evalnat::tools::registry::SchoolRegistry;

/// Name of the sheet holding the exported registry.
pub const RESULTS_SHEET: &str = "Resultats";

/// Writes the registry as one row per school and one column per competency.
pub fn write_registry(path: &Path, registry: &SchoolRegistry) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(RESULTS_SHEET)?;

    let header = Format::new().set_bold();
    let keys: Vec<_> = registry.keys().into_iter().collect();

    worksheet.write_string_with_format(0, 0, "id", &header)?;
    worksheet.write_string_with_format(0, 1, "name", &header)?;
    for (col_idx, key) in keys.iter().enumerate() {
        worksheet.write_string_with_format(0, (col_idx + 2) as u16, key.to_string(), &header)?;
    }

    for (row_idx, school) in registry.all().iter().enumerate() {
        let row = (row_idx + 1) as u32;
        worksheet.write_string(row, 0, &school.id)?;
        worksheet.write_string(row, 1, &school.name)?;
        for (col_idx, key) in keys.iter().enumerate() {
            if let Some(value) = school.get(key) {
                worksheet.write_number(row, (col_idx + 2) as u16, value)?;
            }
        }
    }

    worksheet.set_freeze_panes(1, 2)?;
    workbook.save(path)?;
    Ok(())
}

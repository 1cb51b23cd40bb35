use std::collections::BTreeSet;
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::evalnat::tools::error::{ExtractError, Result, UnitError};
use crate::evalnat::tools::extract::{SourceUnit, UnitLoad};
use crate::evalnat::tools::model::{Grid, MergeSpan, UnitId};

/// Loads every result sheet of a workbook as a unit, in sheet order.
///
/// The first sheet holds metadata and is skipped. Sheets whose name does not
/// encode a level and a subject become [`UnitError::SourceUnreadable`] entries,
/// followed by one entry per unit that no sheet provides.
pub fn load_units(path: &Path) -> Result<Vec<UnitLoad>> {
    if !path.is_file() {
        return Err(ExtractError::MissingInput(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    workbook.load_merged_regions()?;

    let sheet_names = workbook.sheet_names();
    if sheet_names.len() < 2 {
        return Err(ExtractError::InvalidWorkbook(format!(
            "expected a metadata sheet followed by result sheets, found {} sheet(s)",
            sheet_names.len()
        )));
    }

    let mut units = Vec::with_capacity(sheet_names.len() - 1);
    let mut seen = BTreeSet::new();
    for name in sheet_names.iter().skip(1) {
        let Some(unit) = UnitId::from_sheet_name(name) else {
            units.push(Err(UnitError::unidentified(
                name,
                "sheet name does not encode a level and a subject",
            )));
            continue;
        };
        seen.insert(unit);
        debug!(%unit, sheet = name.as_str(), "reading sheet");
        let load = read_sheet(&mut workbook, name)
            .map(|grid| SourceUnit::sheet(unit, grid))
            .map_err(|error| UnitError::unreadable(unit, error));
        units.push(load);
    }

    units.extend(
        UnitId::all()
            .into_iter()
            .filter(|unit| !seen.contains(unit))
            .map(|unit| Err(UnitError::unreadable(unit, "no sheet for unit"))),
    );

    Ok(units)
}

/// Reads a sheet into a grid carrying its merged regions.
///
/// Merged regions must already be loaded on the workbook.
pub fn read_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Grid> {
    let range = workbook.worksheet_range(name)?;
    let merges = workbook
        .merged_regions_by_sheet(name)
        .into_iter()
        .map(|(_, _, dimensions)| {
            MergeSpan::new(
                dimensions.start.0 as usize,
                dimensions.end.0 as usize,
                dimensions.start.1 as usize,
                dimensions.end.1 as usize,
            )
        })
        .collect();
    Ok(Grid::with_merges(range_to_rows(&range), merges))
}

/// Lays the range out on absolute sheet coordinates so that row and column
/// indices agree with merge regions.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (row_offset, col_offset) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let mut rows = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset];
        cells.extend(row.iter().map(|cell| cell_to_string(Some(cell))));
        rows.push(cells);
    }
    rows
}

fn cell_to_string(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(value)) => value.clone(),
        Some(Data::Float(value)) => value.to_string(),
        Some(Data::Int(value)) => value.to_string(),
        Some(Data::Bool(value)) => value.to_string(),
        Some(Data::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

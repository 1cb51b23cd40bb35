use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use tracing::debug;

use crate::evalnat::tools::error::{ExtractError, Result, UnitError};
use crate::evalnat::tools::extract::{SourceUnit, UnitLoad};
use crate::evalnat::tools::model::{Grid, UnitId};

/// Field separator of the flat-file exports.
pub const DELIMITER: u8 = b';';

const BOM: char = '\u{feff}';

/// Loads one flat file per unit from `dir`, in the fixed unit order.
///
/// A missing or unreadable file becomes a [`UnitError::SourceUnreadable`]
/// entry; only an unreadable directory fails the call.
pub fn load_units(dir: &Path) -> Result<Vec<UnitLoad>> {
    if !dir.is_dir() {
        return Err(ExtractError::MissingInput(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    Ok(UnitId::all()
        .into_iter()
        .map(|unit| -> UnitLoad {
            let path = find_unit_file(&files, unit).ok_or_else(|| {
                UnitError::unreadable(unit, format!("no file ending in '{}.csv'", unit.token()))
            })?;
            debug!(%unit, path = %path.display(), "reading flat file");
            read_grid(path)
                .map(|grid| SourceUnit::flat_file(unit, grid))
                .map_err(|error| UnitError::unreadable(unit, error))
        })
        .collect())
}

/// Picks the first `.csv` file whose stem ends with the unit token.
pub fn find_unit_file(files: &[PathBuf], unit: UnitId) -> Option<&PathBuf> {
    let token = unit.token();
    files.iter().find(|path| {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        is_csv && stem.ends_with(&token)
    })
}

/// Reads a `;`-separated file into a grid without merge metadata.
pub fn read_grid(path: &Path) -> Result<Grid> {
    let bytes = fs::read(path)?;
    parse_grid(&decode(bytes))
}

/// Splits delimited text into rows. Rows may have different widths.
pub fn parse_grid(text: &str) -> Result<Grid> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Grid::new(rows))
}

/// Decodes UTF-8, dropping a byte order mark, and falls back to Windows-1252
/// for legacy spreadsheet exports.
pub fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) if text.starts_with(BOM) => text[BOM.len_utf8()..].to_string(),
        Ok(text) => text,
        Err(error) => {
            let bytes = error.into_bytes();
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
            text.into_owned()
        }
    }
}

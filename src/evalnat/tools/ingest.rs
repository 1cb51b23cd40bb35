use std::path::Path;

use tracing::{info, instrument};

use crate::evalnat::tools::config::LayoutConfig;
use crate::evalnat::tools::error::Result;
use crate::evalnat::tools::extract::{self, Extraction};
use crate::evalnat::tools::io::{csv_read, excel_read, excel_write, json};
use crate::evalnat::tools::registry::SchoolRegistry;

/// Extracts every flat-file unit found in a directory.
#[instrument(level = "info", skip_all, fields(input = %input.display(), parallel = parallel))]
pub fn extract_flat_files(
    input: &Path,
    config: &LayoutConfig,
    parallel: bool,
) -> Result<Extraction> {
    let units = csv_read::load_units(input)?;
    info!(units = units.len(), "flat-file units loaded");
    extract::extract_all(units, config, parallel)
}

/// Extracts every result sheet of a workbook.
#[instrument(level = "info", skip_all, fields(input = %input.display(), parallel = parallel))]
pub fn extract_workbook(input: &Path, config: &LayoutConfig, parallel: bool) -> Result<Extraction> {
    let units = excel_read::load_units(input)?;
    info!(units = units.len(), "workbook units loaded");
    extract::extract_all(units, config, parallel)
}

/// Writes the registry next to the downstream tools: `.xlsx` outputs get a
/// workbook, anything else JSON.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
pub fn write_registry(output: &Path, registry: &SchoolRegistry) -> Result<()> {
    let is_xlsx = output
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if is_xlsx {
        excel_write::write_registry(output, registry)?;
    } else {
        json::write_registry(output, registry)?;
    }
    info!(schools = registry.len(), "registry written");
    Ok(())
}

use std::fs;
use std::path::Path;

use crate::evalnat::tools::error::Result;
use crate::evalnat::tools::registry::SchoolRegistry;

/// Serialises the registry as pretty-printed JSON.
pub fn write_registry(path: &Path, registry: &SchoolRegistry) -> Result<()> {
    let json_string = serde_json::to_string_pretty(registry)?;
    fs::write(path, json_string)?;
    Ok(())
}

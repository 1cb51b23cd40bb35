use crate::evalnat::tools::config::LayoutConfig;
use crate::evalnat::tools::extract::numeric::parse_percentage;
use crate::evalnat::tools::extract::text::{contains_any, normalize_competency_name};
use crate::evalnat::tools::model::{
    CompetencyKey, CompetencySpan, Grid, PartialRecord, ResultsMap, UnitId,
};

/// Returns the index of the first school row after `after_row`, or the
/// configured default when no row qualifies.
pub fn locate_first_data_row(grid: &Grid, after_row: usize, config: &LayoutConfig) -> usize {
    (after_row + 1..grid.height())
        .find(|&index| looks_like_school_row(grid.row(index), config))
        .unwrap_or(config.default_data_row)
}

/// A school row has a long enough identifier that is not a header or
/// summary label, followed by a non-empty name.
pub fn looks_like_school_row(row: &[String], config: &LayoutConfig) -> bool {
    let id = row.first().map(|cell| cell.trim()).unwrap_or("");
    let name = row.get(1).map(|cell| cell.trim()).unwrap_or("");
    id.chars().count() >= config.min_id_len
        && !contains_any(id, &config.header_id_markers)
        && !name.is_empty()
}

/// Outcome of mapping one data row.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub record: PartialRecord,
    /// Keys whose cell held text that is not a number.
    pub unparsable: Vec<CompetencyKey>,
}

/// Reads the value of every competency from `row`.
///
/// Returns `None` for rows without an identifier and for trailer rows.
/// Unparsable cells are left out of the results.
pub fn map_row(
    row: &[String],
    spans: &[CompetencySpan],
    unit: UnitId,
    config: &LayoutConfig,
) -> Option<MappedRow> {
    let id = row.first().map(|cell| cell.trim()).unwrap_or("");
    if id.is_empty() || contains_any(id, &config.excluded_ids) {
        return None;
    }
    let name = row.get(1).map(|cell| cell.trim()).unwrap_or("");

    let mut results = ResultsMap::new();
    let mut unparsable = Vec::new();
    for span in spans {
        let key = competency_key(span, unit, config);
        let raw = row.get(span.value_column).map(String::as_str);
        match parse_percentage(raw) {
            Some(value) => {
                results.insert(key, value);
            }
            None if raw.is_some_and(|cell| !cell.trim().is_empty()) => unparsable.push(key),
            None => {}
        }
    }

    Some(MappedRow {
        record: PartialRecord {
            id: id.to_string(),
            name: name.to_string(),
            results,
        },
        unparsable,
    })
}

/// Registry key of a span within `unit`.
pub fn competency_key(span: &CompetencySpan, unit: UnitId, config: &LayoutConfig) -> CompetencyKey {
    CompetencyKey::new(
        unit.level,
        unit.subject,
        normalize_competency_name(&span.name, config.max_key_len),
    )
}

//! Structural extraction of competency results from raw grids.
//!
//! Each source unit goes through identity validation, header anchoring, span
//! resolution, data row location and row mapping. Units never share state;
//! their partial records are reduced into a [`SchoolRegistry`] at the end.

pub mod anchors;
pub mod identity;
pub mod numeric;
pub mod rows;
pub mod spans;
pub mod text;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::evalnat::tools::config::LayoutConfig;
use crate::evalnat::tools::error::{ExtractError, Result, StructureGap, UnitError};
use crate::evalnat::tools::model::{CompetencyKey, CompetencySpan, Grid, PartialRecord, UnitId};
use crate::evalnat::tools::registry::SchoolRegistry;

use self::spans::{HeaderRows, Strategy};

/// Maximum number of offending keys kept in the report.
pub const UNPARSABLE_SAMPLE_LIMIT: usize = 10;

/// Container a grid was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    /// Delimited text file; must carry the identity token in its first row.
    FlatFile,
    /// Workbook sheet, identified by its name.
    Sheet,
}

/// A grid ready to be processed for one (level, subject) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    pub unit: UnitId,
    pub kind: SourceKind,
    pub grid: Grid,
}

impl SourceUnit {
    pub fn flat_file(unit: UnitId, grid: Grid) -> Self {
        Self {
            unit,
            kind: SourceKind::FlatFile,
            grid,
        }
    }

    pub fn sheet(unit: UnitId, grid: Grid) -> Self {
        Self {
            unit,
            kind: SourceKind::Sheet,
            grid,
        }
    }
}

/// Result of loading one unit from disk.
pub type UnitLoad = std::result::Result<SourceUnit, UnitError>;

/// Everything one unit contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitExtraction {
    pub unit: UnitId,
    pub strategy: Strategy,
    pub spans: Vec<CompetencySpan>,
    pub uniform_offsets: bool,
    pub first_data_row: usize,
    pub records: Vec<PartialRecord>,
    pub unparsable: Vec<CompetencyKey>,
}

/// Runs the extraction pipeline over a single unit.
#[instrument(level = "debug", skip_all, fields(unit = %source.unit))]
pub fn extract_unit(
    source: &SourceUnit,
    config: &LayoutConfig,
) -> std::result::Result<UnitExtraction, UnitError> {
    let unit = source.unit;
    let grid = &source.grid;

    if source.kind == SourceKind::FlatFile && !identity::validate_identity(grid.row(0), unit) {
        return Err(UnitError::IdentityMismatch {
            unit,
            expected: identity::identity_token(unit),
        });
    }

    let structure = |gap| UnitError::StructureUndetectable { unit, gap };
    let group = anchors::find_group_row(grid, config).ok_or(structure(StructureGap::GroupRow))?;
    let percentage = anchors::find_percentage_row(grid, group, config)
        .ok_or(structure(StructureGap::PercentageRow))?;
    let header = HeaderRows {
        title: config.title_row,
        group,
        percentage,
    };
    debug!(group, percentage, "header rows located");

    let resolution = spans::resolve_spans(grid, &header, config);
    if resolution.spans.is_empty() {
        return Err(structure(StructureGap::CompetencySpans));
    }

    let first_data_row = rows::locate_first_data_row(grid, percentage, config);
    let mut records = Vec::new();
    let mut unparsable = Vec::new();
    for row in grid.rows().iter().skip(first_data_row) {
        if let Some(mapped) = rows::map_row(row, &resolution.spans, unit, config) {
            records.push(mapped.record);
            unparsable.extend(mapped.unparsable);
        }
    }
    debug!(
        strategy = ?resolution.strategy,
        spans = resolution.spans.len(),
        first_data_row,
        rows = records.len(),
        "unit extracted"
    );

    Ok(UnitExtraction {
        unit,
        strategy: resolution.strategy,
        spans: resolution.spans,
        uniform_offsets: resolution.uniform_offsets,
        first_data_row,
        records,
        unparsable,
    })
}

/// Diagnostic summary of an accepted unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSummary {
    pub unit: UnitId,
    pub strategy: Strategy,
    pub spans: usize,
    pub heuristic_spans: usize,
    pub uniform_offsets: bool,
    pub rows: usize,
    pub rows_with_results: usize,
}

impl From<&UnitExtraction> for UnitSummary {
    fn from(extraction: &UnitExtraction) -> Self {
        Self {
            unit: extraction.unit,
            strategy: extraction.strategy,
            spans: extraction.spans.len(),
            heuristic_spans: extraction
                .spans
                .iter()
                .filter(|span| span.is_heuristic())
                .count(),
            uniform_offsets: extraction.uniform_offsets,
            rows: extraction.records.len(),
            rows_with_results: extraction
                .records
                .iter()
                .filter(|record| !record.is_empty())
                .count(),
        }
    }
}

/// Outcome of one unit within a run.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome {
    Accepted(UnitSummary),
    Rejected(UnitError),
}

/// Per-unit and per-value failures recovered during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    pub outcomes: Vec<UnitOutcome>,
    pub unparsable_values: usize,
    pub unparsable_samples: Vec<String>,
}

impl ExtractionReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn accepted(&self) -> impl Iterator<Item = &UnitSummary> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            UnitOutcome::Accepted(summary) => Some(summary),
            UnitOutcome::Rejected(_) => None,
        })
    }

    pub fn rejected(&self) -> impl Iterator<Item = &UnitError> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            UnitOutcome::Rejected(error) => Some(error),
            UnitOutcome::Accepted(_) => None,
        })
    }

    fn record_unparsable(&mut self, keys: &[CompetencyKey]) {
        self.unparsable_values += keys.len();
        for key in keys {
            if self.unparsable_samples.len() >= UNPARSABLE_SAMPLE_LIMIT {
                break;
            }
            let sample = key.to_string();
            if !self.unparsable_samples.contains(&sample) {
                self.unparsable_samples.push(sample);
            }
        }
    }
}

/// Registry built by a run together with its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub registry: SchoolRegistry,
    pub report: ExtractionReport,
}

/// Processes `sources` in list order and reduces their records into a registry.
///
/// Unit failures are logged and reported but never abort the run. With
/// `parallel` set, unit pipelines run on the rayon pool; the reduction stays
/// sequential so the output does not depend on scheduling. An empty registry
/// is an error.
#[instrument(level = "info", skip_all, fields(units = sources.len(), parallel = parallel))]
pub fn extract_all(
    sources: Vec<UnitLoad>,
    config: &LayoutConfig,
    parallel: bool,
) -> Result<Extraction> {
    let run = |load: &UnitLoad| -> std::result::Result<UnitExtraction, UnitError> {
        match load {
            Ok(source) => extract_unit(source, config),
            Err(error) => Err(error.clone()),
        }
    };
    let results: Vec<_> = if parallel {
        sources.par_iter().map(run).collect()
    } else {
        sources.iter().map(run).collect()
    };

    let mut registry = SchoolRegistry::new();
    let mut report = ExtractionReport::default();
    for result in results {
        match result {
            Ok(extraction) => {
                report.record_unparsable(&extraction.unparsable);
                report
                    .outcomes
                    .push(UnitOutcome::Accepted(UnitSummary::from(&extraction)));
                registry = registry.merge(extraction.records);
            }
            Err(error) => {
                warn!(%error, "source unit rejected");
                report.outcomes.push(UnitOutcome::Rejected(error));
            }
        }
    }

    if report.unparsable_values > 0 {
        warn!(
            count = report.unparsable_values,
            samples = ?report.unparsable_samples,
            "cells could not be parsed as percentages"
        );
    }

    if registry.is_empty() {
        return Err(ExtractError::EmptyResult {
            units: report.attempted(),
            rejections: report.rejected().cloned().collect(),
        });
    }

    info!(
        schools = registry.len(),
        accepted = report.accepted().count(),
        rejected = report.rejected().count(),
        "extraction finished"
    );
    Ok(Extraction { registry, report })
}

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::evalnat::tools::config::LayoutConfig;
use crate::evalnat::tools::extract::text::{contains_any, contains_folded};
use crate::evalnat::tools::model::{CompetencySpan, Grid, ValueColumnSource};

/// Header rows located for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRows {
    pub title: usize,
    pub group: usize,
    pub percentage: usize,
}

/// Strategy that produced the spans of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    MergeAware,
    AnchorScan,
}

/// Derives competency spans from the header block of a grid.
pub trait SpanResolver {
    fn strategy(&self) -> Strategy;

    fn resolve(
        &self,
        grid: &Grid,
        rows: &HeaderRows,
        config: &LayoutConfig,
    ) -> Vec<CompetencySpan>;
}

/// Uses the horizontal merges anchored on the title row.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeAwareResolver;

impl SpanResolver for MergeAwareResolver {
    fn strategy(&self) -> Strategy {
        Strategy::MergeAware
    }

    fn resolve(
        &self,
        grid: &Grid,
        rows: &HeaderRows,
        config: &LayoutConfig,
    ) -> Vec<CompetencySpan> {
        let Some(merges) = grid.merges() else {
            return Vec::new();
        };

        // Keyed by first column: sorted output, one span per anchor cell.
        let mut candidates = BTreeMap::new();
        for merge in merges {
            if merge.row_start == rows.title && merge.is_horizontal() {
                candidates.insert(merge.col_start, merge.col_end);
            }
        }

        candidates
            .into_iter()
            .filter_map(|(start, end)| {
                let name = grid.cell(rows.title, start).trim();
                is_competency_title(name, config)
                    .then(|| build_span(grid, rows, name, start, end, config))
            })
            .collect()
    }
}

/// Delimits spans by the title cells themselves, for grids without merges.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorScanResolver;

impl SpanResolver for AnchorScanResolver {
    fn strategy(&self) -> Strategy {
        Strategy::AnchorScan
    }

    fn resolve(
        &self,
        grid: &Grid,
        rows: &HeaderRows,
        config: &LayoutConfig,
    ) -> Vec<CompetencySpan> {
        let anchors: Vec<usize> = grid
            .row(rows.title)
            .iter()
            .enumerate()
            .filter(|(_, cell)| is_competency_title(cell.trim(), config))
            .map(|(col, _)| col)
            .collect();
        let last_column = grid.width().saturating_sub(1);

        anchors
            .iter()
            .enumerate()
            .map(|(index, &start)| {
                let end = anchors
                    .get(index + 1)
                    .map(|next| next - 1)
                    .unwrap_or(last_column)
                    .max(start);
                let name = grid.cell(rows.title, start).trim();
                build_span(grid, rows, name, start, end, config)
            })
            .collect()
    }
}

/// Spans of one unit together with the strategy that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanResolution {
    pub strategy: Strategy,
    pub spans: Vec<CompetencySpan>,
    pub uniform_offsets: bool,
}

/// Resolves spans with the merge-aware strategy when the grid carries merge
/// metadata, falling back to the anchor scan when it yields nothing.
pub fn resolve_spans(grid: &Grid, rows: &HeaderRows, config: &LayoutConfig) -> SpanResolution {
    let mut resolvers: Vec<&dyn SpanResolver> = Vec::with_capacity(2);
    if grid.merges().is_some() {
        resolvers.push(&MergeAwareResolver);
    }
    resolvers.push(&AnchorScanResolver);

    let mut strategy = Strategy::AnchorScan;
    let mut spans = Vec::new();
    for resolver in resolvers {
        strategy = resolver.strategy();
        spans = resolver.resolve(grid, rows, config);
        if !spans.is_empty() {
            break;
        }
        debug!(?strategy, "strategy produced no competency span");
    }

    let uniform_offsets = offsets_are_uniform(&spans);
    if !uniform_offsets {
        let offsets: Vec<usize> = spans.iter().map(CompetencySpan::offset).collect();
        warn!(?strategy, ?offsets, "competency spans have irregular value offsets");
    }

    SpanResolution {
        strategy,
        spans,
        uniform_offsets,
    }
}

/// True when every span places its value column at the same offset.
pub fn offsets_are_uniform(spans: &[CompetencySpan]) -> bool {
    spans
        .windows(2)
        .all(|pair| pair[0].offset() == pair[1].offset())
}

/// Distinguishes competency titles from column-category headers.
pub fn is_competency_title(text: &str, config: &LayoutConfig) -> bool {
    text.chars().count() >= config.min_title_len && !contains_any(text, &config.structural_markers)
}

/// Finds the satisfactory-group percentage column inside `[start, end]`.
///
/// Falls back to `end` when either the group label or the percentage marker
/// is missing; the result then reports [`ValueColumnSource::Heuristic`].
pub fn resolve_value_column(
    grid: &Grid,
    rows: &HeaderRows,
    start: usize,
    end: usize,
    config: &LayoutConfig,
) -> (usize, ValueColumnSource) {
    let group_column = (start..=end)
        .find(|&col| contains_folded(grid.cell(rows.group, col), &config.group_keyword));

    let marker_column = group_column.and_then(|group| {
        let last = (group + config.marker_lookahead).min(end);
        (group..=last).find(|&col| {
            contains_any(grid.cell(rows.percentage, col), &config.percentage_markers)
        })
    });

    match marker_column {
        Some(col) => (col, ValueColumnSource::Marker),
        None => (end, ValueColumnSource::Heuristic),
    }
}

fn build_span(
    grid: &Grid,
    rows: &HeaderRows,
    name: &str,
    start: usize,
    end: usize,
    config: &LayoutConfig,
) -> CompetencySpan {
    let (value_column, source) = resolve_value_column(grid, rows, start, end, config);
    if source == ValueColumnSource::Heuristic {
        debug!(competency = name, column = value_column, "value column guessed");
    }
    CompetencySpan {
        name: name.to_string(),
        column_start: start,
        column_end: end,
        value_column,
        source,
    }
}

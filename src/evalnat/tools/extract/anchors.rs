use crate::evalnat::tools::config::LayoutConfig;
use crate::evalnat::tools::extract::text::{contains_any, contains_folded};
use crate::evalnat::tools::model::Grid;

/// Finds the row labelling the satisfactory group inside the group window.
pub fn find_group_row(grid: &Grid, config: &LayoutConfig) -> Option<usize> {
    config
        .group_window
        .indices(grid.height())
        .find(|&index| {
            grid.row(index)
                .iter()
                .any(|cell| contains_folded(cell, &config.group_keyword))
        })
}

/// Finds the row of percentage or respondent labels following the group row.
pub fn find_percentage_row(grid: &Grid, group_row: usize, config: &LayoutConfig) -> Option<usize> {
    let last = (group_row + config.percentage_lookahead).min(grid.height().saturating_sub(1));
    (group_row + 1..=last).find(|&index| {
        grid.row(index)
            .iter()
            .any(|cell| contains_any(cell, &config.percentage_markers))
    })
}

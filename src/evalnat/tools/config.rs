use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::evalnat::tools::error::{ExtractError, Result};

/// Inclusive range of row indices searched for an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWindow {
    pub start: usize,
    pub end: usize,
}

impl RowWindow {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Row indices covered by the window, clipped to `height`.
    pub fn indices(&self, height: usize) -> std::ops::Range<usize> {
        let end = (self.end + 1).min(height);
        self.start.min(end)..end
    }
}

/// Describes the document template the extraction heuristics expect.
///
/// Every row index and keyword the engine relies on lives here so that the
/// tolerance of each search is an explicit parameter. [`LayoutConfig::default`]
/// matches the layout of the national evaluation exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Row holding competency titles.
    pub title_row: usize,
    /// Rows searched for the satisfactory-group label.
    pub group_window: RowWindow,
    /// Number of rows after the group row searched for percentage labels.
    pub percentage_lookahead: usize,
    /// Number of columns after the group label searched for a percentage marker.
    pub marker_lookahead: usize,
    /// First data row used when no row looks like a school record.
    pub default_data_row: usize,
    /// Minimum character count of a competency title.
    pub min_title_len: usize,
    /// Minimum character count of a school identifier.
    pub min_id_len: usize,
    /// Maximum character count of a normalised competency name.
    pub max_key_len: usize,
    /// Label of the satisfactory group.
    pub group_keyword: String,
    /// Labels marking the percentage column.
    pub percentage_markers: Vec<String>,
    /// Words that identify column-category headers rather than competencies.
    pub structural_markers: Vec<String>,
    /// Substrings disqualifying a row during data row detection.
    pub header_id_markers: Vec<String>,
    /// Substrings identifying trailer or summary rows.
    pub excluded_ids: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title_row: 2,
            group_window: RowWindow::new(2, 9),
            percentage_lookahead: 3,
            marker_lookahead: 2,
            default_data_row: 10,
            min_title_len: 10,
            min_id_len: 7,
            max_key_len: 50,
            group_keyword: "satisfaisant".into(),
            percentage_markers: strings(&["%", "répondants"]),
            structural_markers: strings(&["compétence", "exercice", "participation", "scores"]),
            header_id_markers: strings(&["uai", "total", "circonscription"]),
            excluded_ids: strings(&["total", "circonscription"]),
        }
    }
}

impl LayoutConfig {
    /// Reads a layout from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: LayoutConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects layouts whose windows cannot describe a header block.
    pub fn validate(&self) -> Result<()> {
        if self.group_window.start > self.group_window.end {
            return Err(ExtractError::InvalidLayout(format!(
                "group window starts after it ends ({}..={})",
                self.group_window.start, self.group_window.end
            )));
        }
        if self.percentage_lookahead == 0 {
            return Err(ExtractError::InvalidLayout(
                "percentage lookahead must cover at least one row".into(),
            ));
        }
        if self.group_keyword.trim().is_empty() {
            return Err(ExtractError::InvalidLayout("group keyword is empty".into()));
        }
        if self.percentage_markers.iter().all(|marker| marker.trim().is_empty()) {
            return Err(ExtractError::InvalidLayout(
                "at least one percentage marker is required".into(),
            ));
        }
        if self.max_key_len == 0 {
            return Err(ExtractError::InvalidLayout("max key length is zero".into()));
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

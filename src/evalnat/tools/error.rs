use std::path::PathBuf;

use thiserror::Error;

use crate::evalnat::tools::model::UnitId;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Error type covering the failures that abort an extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a flat file cannot be tokenised.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a layout file holds inconsistent search windows.
    #[error("invalid layout configuration: {0}")]
    InvalidLayout(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when no school could be extracted from any unit. Carries the
    /// rejection of every unit that failed.
    #[error(
        "no school records extracted from {units} source unit(s){}",
        list_rejections(.rejections)
    )]
    EmptyResult {
        units: usize,
        rejections: Vec<UnitError>,
    },

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Header structure that could not be located in a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureGap {
    GroupRow,
    PercentageRow,
    CompetencySpans,
}

impl std::fmt::Display for StructureGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureGap::GroupRow => write!(f, "no satisfactory-group row"),
            StructureGap::PercentageRow => write!(f, "no percentage row"),
            StructureGap::CompetencySpans => write!(f, "no competency span"),
        }
    }
}

/// Failure confined to a single source unit. The unit is skipped and the run
/// carries on with its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// The file or sheet is missing or could not be read. `unit` is `None`
    /// when the source could not be tied to a level and a subject; `origin`
    /// names the unit or the offending sheet.
    #[error("{origin}: source unreadable: {reason}")]
    SourceUnreadable {
        unit: Option<UnitId>,
        origin: String,
        reason: String,
    },

    /// The first row does not carry the expected identity token.
    #[error("{unit}: identity token '{expected}' not found in first row")]
    IdentityMismatch { unit: UnitId, expected: String },

    /// The header block could not be interpreted.
    #[error("{unit}: structure undetectable: {gap}")]
    StructureUndetectable { unit: UnitId, gap: StructureGap },
}

impl UnitError {
    pub fn unreadable(unit: UnitId, reason: impl ToString) -> Self {
        UnitError::SourceUnreadable {
            unit: Some(unit),
            origin: unit.to_string(),
            reason: reason.to_string(),
        }
    }

    /// A source that does not map onto any unit, such as a stray sheet.
    pub fn unidentified(origin: impl ToString, reason: impl ToString) -> Self {
        UnitError::SourceUnreadable {
            unit: None,
            origin: origin.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The unit the failure belongs to, when known.
    pub fn unit(&self) -> Option<UnitId> {
        match self {
            UnitError::SourceUnreadable { unit, .. } => *unit,
            UnitError::IdentityMismatch { unit, .. }
            | UnitError::StructureUndetectable { unit, .. } => Some(*unit),
        }
    }
}

fn list_rejections(rejections: &[UnitError]) -> String {
    rejections
        .iter()
        .map(|rejection| format!("\n  {rejection}"))
        .collect()
}

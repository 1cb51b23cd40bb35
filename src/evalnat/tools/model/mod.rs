use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable external identifier of a school. It is kept as the plain string read
/// from the first column of the source so that exports stay byte-compatible
/// with the original files.
pub type SchoolId = String;

/// Grade year indexing a source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Cp,
    Ce1,
    Ce2,
    Cm1,
    Cm2,
}

impl Level {
    /// Every recognised level, in processing order.
    pub const ALL: [Level; 5] = [Level::Cp, Level::Ce1, Level::Ce2, Level::Cm1, Level::Cm2];

    /// Upper-case code as it appears in sheet names (`CP`, `CE1`, ...).
    pub fn code(self) -> &'static str {
        match self {
            Level::Cp => "CP",
            Level::Ce1 => "CE1",
            Level::Ce2 => "CE2",
            Level::Cm1 => "CM1",
            Level::Cm2 => "CM2",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Academic subject indexing a source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subject {
    French,
    Maths,
}

impl Subject {
    /// Every recognised subject, in processing order.
    pub const ALL: [Subject; 2] = [Subject::French, Subject::Maths];

    /// Two-letter lower-case code used in file names and identity tokens.
    pub fn code(self) -> &'static str {
        match self {
            Subject::French => "fr",
            Subject::Maths => "ma",
        }
    }

    /// Single letter used to abbreviate the subject in sheet names.
    pub fn sheet_letter(self) -> char {
        match self {
            Subject::French => 'F',
            Subject::Maths => 'M',
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code().to_uppercase())
    }
}

/// One (level, subject) pair's worth of raw data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId {
    pub level: Level,
    pub subject: Subject,
}

impl UnitId {
    pub fn new(level: Level, subject: Subject) -> Self {
        Self { level, subject }
    }

    /// All units in the fixed processing order: levels first, subjects second.
    pub fn all() -> Vec<UnitId> {
        Level::ALL
            .iter()
            .flat_map(|level| Subject::ALL.iter().map(|subject| UnitId::new(*level, *subject)))
            .collect()
    }

    /// Lower-case `<level><subject code>` token, e.g. `ce1fr`.
    pub fn token(&self) -> String {
        format!("{}{}", self.level.code().to_lowercase(), self.subject.code())
    }

    /// Parses a sheet name such as `CPFR`, `CE1M` or `cm2 fr`.
    pub fn from_sheet_name(name: &str) -> Option<UnitId> {
        let compact: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();

        let (level, rest) = Level::ALL
            .iter()
            .find_map(|level| compact.strip_prefix(level.code()).map(|rest| (*level, rest)))?;

        let letter = rest.chars().next()?;
        let subject = Subject::ALL
            .iter()
            .copied()
            .find(|subject| subject.sheet_letter() == letter)?;
        Some(UnitId::new(level, subject))
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.level, self.subject)
    }
}

/// Rectangular region of merged cells, zero-based and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MergeSpan {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl MergeSpan {
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    /// True when the merge covers more than one column.
    pub fn is_horizontal(&self) -> bool {
        self.col_end > self.col_start
    }
}

/// Table of raw cell text. Missing cells read as empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
    merges: Option<Vec<MergeSpan>>,
}

impl Grid {
    /// Builds a grid without merge metadata, as produced by flat files.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows, merges: None }
    }

    /// Builds a grid carrying the merge regions of its source sheet.
    pub fn with_merges(rows: Vec<Vec<String>>, merges: Vec<MergeSpan>) -> Self {
        Self {
            rows,
            merges: Some(merges),
        }
    }

    /// Convenience constructor used by fixtures.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Returns a copy of the grid with merge metadata attached.
    pub fn merged(mut self, merges: Vec<MergeSpan>) -> Self {
        self.merges = Some(merges);
        self
    }

    /// Returns a copy of the grid with merge metadata dropped.
    pub fn without_merges(&self) -> Self {
        Self::new(self.rows.clone())
    }

    pub fn merges(&self) -> Option<&[MergeSpan]> {
        self.merges.as_deref()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length in the grid.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row(&self, index: usize) -> &[String] {
        self.rows.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.row(row).get(col).map(String::as_str).unwrap_or("")
    }
}

/// How the value column of a competency was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueColumnSource {
    /// Found through the group label and a percentage marker.
    Marker,
    /// No marker was found; the last column of the span was substituted.
    Heuristic,
}

/// Column range occupied by one competency in the header block.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetencySpan {
    pub name: String,
    pub column_start: usize,
    pub column_end: usize,
    pub value_column: usize,
    pub source: ValueColumnSource,
}

impl CompetencySpan {
    /// Offset of the value column from the start of the span.
    pub fn offset(&self) -> usize {
        self.value_column - self.column_start
    }

    pub fn is_heuristic(&self) -> bool {
        self.source == ValueColumnSource::Heuristic
    }
}

/// Registry key of one competency result.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompetencyKey {
    pub level: Level,
    pub subject: Subject,
    pub name: String,
}

impl CompetencyKey {
    pub fn new(level: Level, subject: Subject, name: impl Into<String>) -> Self {
        Self {
            level,
            subject,
            name: name.into(),
        }
    }

    pub fn unit(&self) -> UnitId {
        UnitId::new(self.level, self.subject)
    }
}

impl fmt::Display for CompetencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.level, self.subject, self.name)
    }
}

/// Competency results of one school, keyed by [`CompetencyKey`].
pub type ResultsMap = BTreeMap<CompetencyKey, f64>;

/// Identity and values read from one data row of one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialRecord {
    pub id: SchoolId,
    pub name: String,
    pub results: ResultsMap,
}

impl PartialRecord {
    /// True when the row produced no parseable value at all.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A school accumulated across every processed unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolRecord {
    pub id: SchoolId,
    pub name: String,
    #[serde(serialize_with = "serialize_results")]
    pub results: ResultsMap,
}

impl SchoolRecord {
    pub fn new(id: impl Into<SchoolId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            results: ResultsMap::new(),
        }
    }

    pub fn get(&self, key: &CompetencyKey) -> Option<f64> {
        self.results.get(key).copied()
    }
}

fn serialize_results<S>(results: &ResultsMap, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(results.len()))?;
    for (key, value) in results {
        map.serialize_entry(&key.to_string(), value)?;
    }
    map.end()
}

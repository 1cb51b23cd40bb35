#![allow(dead_code)]

use evalnat_tools::model::{Grid, MergeSpan, UnitId};

/// Width of one competency block: counts and percentages for two groups.
pub const BLOCK_WIDTH: usize = 4;
/// First column of the first competency block.
pub const FIRST_BLOCK: usize = 2;
pub const GROUP_ROW: usize = 6;
pub const PERCENTAGE_ROW: usize = 7;
pub const FIRST_DATA_ROW: usize = 8;

/// The twelve-row layout of a single competency spanning columns 2 to 5.
pub fn single_competency_rows(identity: &str) -> Vec<Vec<String>> {
    let mut rows = vec![vec![String::new(); 6]; 12];
    rows[0][0] = identity.to_string();
    rows[2][2] = "Lecture de mots (10 points)".to_string();
    rows[6][4] = "Groupe satisfaisant".to_string();
    rows[7][5] = "%".to_string();
    rows[11] = ["0070116N", "Ecole Test", "12", "3", "5,5", "62,5"]
        .iter()
        .map(|cell| cell.to_string())
        .collect();
    rows
}

/// A regular layout: one block of `BLOCK_WIDTH` columns per competency, the
/// satisfactory percentage in the last column of each block.
pub fn regular_rows(
    identity: &str,
    competencies: &[&str],
    schools: &[(&str, &str, Vec<&str>)],
) -> Vec<Vec<String>> {
    let width = FIRST_BLOCK + competencies.len() * BLOCK_WIDTH;
    let mut rows = vec![vec![String::new(); width]; FIRST_DATA_ROW];
    rows[0][0] = identity.to_string();
    rows[2][0] = "UAI".to_string();
    rows[2][1] = "Nom".to_string();

    for (index, title) in competencies.iter().enumerate() {
        let start = FIRST_BLOCK + index * BLOCK_WIDTH;
        rows[2][start] = title.to_string();
        rows[GROUP_ROW][start] = "Groupe à besoins".to_string();
        rows[GROUP_ROW][start + 2] = "Groupe satisfaisant".to_string();
        rows[PERCENTAGE_ROW][start] = "Nb".to_string();
        rows[PERCENTAGE_ROW][start + 1] = "%".to_string();
        rows[PERCENTAGE_ROW][start + 2] = "Nb".to_string();
        rows[PERCENTAGE_ROW][start + 3] = "%".to_string();
    }

    for (id, name, values) in schools {
        let mut row = vec![String::new(); width];
        row[0] = id.to_string();
        row[1] = name.to_string();
        for (index, value) in values.iter().enumerate() {
            let start = FIRST_BLOCK + index * BLOCK_WIDTH;
            row[start] = "10".to_string();
            row[start + 1] = "20".to_string();
            row[start + 2] = "30".to_string();
            row[start + 3] = value.to_string();
        }
        rows.push(row);
    }
    rows
}

/// Merge regions a spreadsheet would carry for [`regular_rows`].
pub fn regular_merges(competencies: usize) -> Vec<MergeSpan> {
    (0..competencies)
        .map(|index| {
            let start = FIRST_BLOCK + index * BLOCK_WIDTH;
            MergeSpan::new(2, 2, start, start + BLOCK_WIDTH - 1)
        })
        .collect()
}

pub fn identity_of(unit: UnitId) -> String {
    format!("Evaluation {}", unit.token().to_uppercase())
}

pub fn regular_grid(
    unit: UnitId,
    competencies: &[&str],
    schools: &[(&str, &str, Vec<&str>)],
) -> Grid {
    Grid::new(regular_rows(&identity_of(unit), competencies, schools))
}

/// Renders rows the way the flat-file exports do.
pub fn to_delimited(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join(";"))
        .collect::<Vec<_>>()
        .join("\n")
}

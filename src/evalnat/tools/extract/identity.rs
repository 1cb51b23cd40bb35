use crate::evalnat::tools::extract::text::contains_folded;
use crate::evalnat::tools::model::UnitId;

/// Token a flat file for `unit` carries in its first row, e.g. `evaluation ce1fr`.
pub fn identity_token(unit: UnitId) -> String {
    format!("evaluation {}", unit.token())
}

/// Checks that one cell of `first_row` names the expected unit.
pub fn validate_identity(first_row: &[String], unit: UnitId) -> bool {
    let token = identity_token(unit);
    first_row.iter().any(|cell| contains_folded(cell, &token))
}

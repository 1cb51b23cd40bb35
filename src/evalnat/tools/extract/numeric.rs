/// Parses locale-formatted cell content into a percentage.
///
/// Accepts `"50%"`, `"50,5 %"` or `"0.5"`. Values strictly between 0 and 1
/// are read as fractions and scaled to percent. Anything that is not a finite
/// number yields `None`; no rounding is applied.
pub fn parse_percentage<'a>(raw: impl Into<Option<&'a str>>) -> Option<f64> {
    let raw = raw.into()?.trim();
    let raw = raw.strip_suffix('%').unwrap_or(raw).trim();
    if raw.is_empty() {
        return None;
    }

    let value: f64 = raw.replace(',', ".").parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    if value > 0.0 && value < 1.0 {
        Some(value * 100.0)
    } else {
        Some(value)
    }
}

//! Text folding shared by every keyword search of the extraction engine.

/// Replaces accented Latin letters by their unaccented base, keeping case.
pub fn strip_accents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match base_letter(c) {
            Some(base) => out.push_str(base),
            None => out.push(c),
        }
    }
    out
}

/// Lower-cases and strips accents so that `Compétence` matches `competence`.
pub fn fold(text: &str) -> String {
    strip_accents(&text.to_lowercase())
}

/// Case and accent insensitive substring test.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = fold(needle.trim());
    !needle.is_empty() && fold(haystack).contains(&needle)
}

/// True when `haystack` contains any of the `needles`.
pub fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| contains_folded(haystack, needle))
}

/// Turns a raw competency title into the name part of a registry key.
///
/// Accents are stripped, punctuation removed, whitespace runs collapsed into a
/// single underscore and the result cut to `max_len` characters.
/// `"Lecture de mots (10 points)"` becomes `"Lecture_de_mots_10_points"`.
pub fn normalize_competency_name(raw: &str, max_len: usize) -> String {
    let cleaned: String = strip_accents(raw)
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    let truncated: String = joined.chars().take(max_len).collect();
    truncated.trim_end_matches('_').to_string()
}

fn base_letter(c: char) -> Option<&'static str> {
    Some(match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
        'ç' => "c",
        'Ç' => "C",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'È' | 'É' | 'Ê' | 'Ë' => "E",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'ñ' => "n",
        'Ñ' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => "O",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' | 'Ÿ' => "Y",
        'œ' => "oe",
        'Œ' => "OE",
        'æ' => "ae",
        'Æ' => "AE",
        _ => return None,
    })
}

use crate::model::{Axis, Fields, Hemisphere};

/// Hemisphere fields in priority order: leading cue, in-place letter, sign.
const HEMISPHERE_FIELDS: [&str; 3] = ["hemi_pre", "hemi", "hemi_sign"];

const SYMBOL_CHARS: [char; 5] = ['°', 'º', '\'', '"', ':'];
const SYMBOL_WORDS: [&str; 5] = ["lat", "lon", "geo", "coord", "deg"];

/// Polarity of a hemisphere symbol: N/E/+ are positive, S/W/- negative.
pub fn polarity(symbol: &str) -> Option<i8> {
    match symbol.trim().to_ascii_uppercase().as_str() {
        "N" | "E" | "+" => Some(1),
        "S" | "W" | "-" => Some(-1),
        _ => None,
    }
}

/// Hemisphere from the first cue present for the ordinate. An unmappable
/// first cue yields `None`; later fields are not consulted.
pub fn resolve(fields: &Fields, axis: Axis) -> Option<Hemisphere> {
    let field = HEMISPHERE_FIELDS.iter().find_map(|base| fields.ordinate(base, axis))?;
    let symbol = field.text.trim();
    Some(Hemisphere { symbol: symbol.to_string(), polarity: polarity(symbol)?, offset: field.offset })
}

/// True if the text carries a degree mark, quote, colon or a word such as
/// "lat" or "deg" that corroborates a coordinate reading.
pub fn has_symbol(text: &str) -> bool {
    if text.contains(&SYMBOL_CHARS[..]) {
        return true;
    }
    let lower = text.to_lowercase();
    SYMBOL_WORDS.iter().any(|w| lower.contains(w))
}

use std::sync::LazyLock;

use regex::Regex;

/// Leading decimal number, optionally signed, with optional exponent.
static RE_LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap()
});

/// Parse the numeric prefix of `text`, ignoring leading whitespace and any
/// trailing non-numeric characters (`"5.5 H"` -> 5.5, `"  4"` -> 4).
/// Returns `None` when there is no prefix or it is not finite.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let found = RE_LEADING_NUMBER.find(text.trim_start())?;
    found
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Remove comparator characters (`<`, `>`) from an OBX-5 value.
pub fn strip_comparators(raw: &str) -> String {
    raw.replace(['<', '>'], "")
}

//! Numeric input handling for grid cells.
//!
//! Cells only ever hold a finite number or nothing. Everything typed into a
//! cell goes through [`parse_cell_input`], which never fails: text that is not
//! a number simply produces an empty cell.

/// Parses raw cell text into a stored cell value.
///
/// Surrounding whitespace is ignored. The whole remaining text must be a
/// number; partial prefixes such as `"12abc"` are not accepted.
///
/// # Returns
///
/// `Some(value)` for a finite number, `None` for empty, non-numeric,
/// NaN or infinite input.
///
/// # Examples
///
/// ```
/// use tcalc::domain::parse_cell_input;
///
/// assert_eq!(parse_cell_input("-3.5"), Some(-3.5));
/// assert_eq!(parse_cell_input(""), None);
/// assert_eq!(parse_cell_input("abc"), None);
/// ```
pub fn parse_cell_input(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    normalize_value(trimmed.parse::<f64>().ok())
}

/// Drops values a cell must never hold (NaN and infinities).
pub fn normalize_value(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Renders a cell value as text; empty cells render as an empty string.
///
/// Integral values print without a fractional part, so a value parsed from
/// `"1000"` renders back as `"1000"`.
pub fn format_cell_value(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

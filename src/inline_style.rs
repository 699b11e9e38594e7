//! Inline `style` attribute helpers
//!
//! Inline styles are treated as text: fragments are appended in order and
//! the result is normalized so that empty or doubled `;` separators never
//! reach the output.

use regex::Regex;
use std::sync::OnceLock;

/// Horizontal float intent found in an element's inline style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatDirection {
    Left,
    Right,
}

impl FloatDirection {
    /// Keyword used in CSS and the `align` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            FloatDirection::Left => "left",
            FloatDirection::Right => "right",
        }
    }

    /// Margin keeping surrounding text away from the floated table
    pub fn gutter_margin(self) -> &'static str {
        match self {
            FloatDirection::Left => "margin: 0 1em 1em 0",
            FloatDirection::Right => "margin: 0 0 1em 1em",
        }
    }
}

/// Join style fragments with `"; "`, dropping empty fragments and separators
///
/// ```rust
/// use email_safe_markup::inline_style::merge_styles;
///
/// assert_eq!(merge_styles(&["color: red;", "", " font-weight: bold"]), "color: red; font-weight: bold");
/// assert_eq!(merge_styles(&["", ";"]), "");
/// ```
pub fn merge_styles(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .map(|part| part.trim().trim_matches(|c: char| c == ';' || c.is_whitespace()))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("; ");

    match empty_separator_regex() {
        Some(re) => re.replace_all(&joined, "; ").into_owned(),
        None => joined,
    }
}

/// Like [`merge_styles`], terminated with `;` for table cells
pub fn cell_style(parts: &[&str]) -> String {
    let merged = merge_styles(parts);
    if merged.is_empty() {
        merged
    } else {
        format!("{};", merged)
    }
}

/// Detect a `float: left|right` declaration
///
/// Whitespace around the colon is optional. `left` wins if both appear.
pub fn float_direction(style: &str) -> Option<FloatDirection> {
    let re = float_regex()?;
    let mut found = None;
    for caps in re.captures_iter(style) {
        if caps[1].eq_ignore_ascii_case("left") {
            return Some(FloatDirection::Left);
        }
        found = Some(FloatDirection::Right);
    }
    found
}

/// Remove every `float: left|right` declaration from a style
pub fn strip_float(style: &str) -> String {
    match float_regex() {
        Some(re) => merge_styles(&[re.replace_all(style, "").as_ref()]),
        None => merge_styles(&[style]),
    }
}

fn empty_separator_regex() -> Option<&'static Regex> {
    static EMPTY_SEPARATOR_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    EMPTY_SEPARATOR_REGEX
        .get_or_init(|| Regex::new(r";(\s*;)+\s*").ok())
        .as_ref()
}

fn float_regex() -> Option<&'static Regex> {
    static FLOAT_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    FLOAT_REGEX
        .get_or_init(|| Regex::new(r"(?i)float\s*:\s*(left|right)\s*;?\s*").ok())
        .as_ref()
}

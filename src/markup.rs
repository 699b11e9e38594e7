//! Markup fragments for the generated presentation tables
//!
//! Everything interpolated into these templates must already be escaped:
//! text through [`escape_text`], attribute values through [`escape_attr`].
//! Serialized subtrees from [`ElementNode`](crate::dom::ElementNode) are
//! markup already and are inserted as-is.

/// Opening of every generated table, without the closing `>`
pub const TABLE_OPEN: &str =
    r#"<table role="presentation" cellspacing="0" cellpadding="0" border="0""#;

/// Escape `&`, `<` and `>` for use in text content
pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text and `"` for use inside a double-quoted attribute
pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// ` style="..."`, or nothing when the style is empty
pub fn style_attr(style: &str) -> String {
    if style.trim().is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, escape_attr(style))
    }
}

/// Full-width, single-row, single-cell table
///
/// `cell_attrs` is inserted verbatim into the `<td>` tag and should start
/// with a space (see [`style_attr`]).
pub fn single_cell_table(cell_attrs: &str, content: &str) -> String {
    format!(
        r#"{} width="100%"><tr><td{}>{}</td></tr></table>"#,
        TABLE_OPEN, cell_attrs, content
    )
}

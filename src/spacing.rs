//! Margin/padding relocation
//!
//! Email clients handle margins on block elements inconsistently, so spacing
//! declared on an element is moved onto the padding of the table cell that
//! wraps it. Spacing extraction turns a selector's declarations into:
//!
//! - a single cell padding value, and
//! - the remaining declarations with every margin/padding variant removed.
//!
//! # Resolution Order
//!
//! 1. A `<selector> td { padding }` rule wins outright (hand-authored
//!    table-targeted CSS); only `margin` and `padding` are stripped from the
//!    element style in that case
//! 2. Otherwise `margin` (then `margin-top`, `margin-bottom`) and `padding`
//!    (then `padding-top`, `padding-bottom`) are read from the selector
//! 3. When both are present the margin value is used and padding is dropped
//! 4. With neither, the caller's default applies
//!
//! # Examples
//!
//! ```rust
//! use email_safe_markup::spacing::extract_spacing;
//! use email_safe_markup::stylesheet::StyleSheet;
//!
//! let styles = StyleSheet::parse("h1 { color: red; margin: 10px; padding: 5px; }");
//! let spacing = extract_spacing(&styles, "h1", "0 0 20px 0");
//! assert_eq!(spacing.cell_padding, "10px");
//! assert_eq!(spacing.filtered_style.to_inline_style(), "color: red");
//! ```

use crate::stylesheet::{Declarations, StyleSheet};

/// Every margin/padding variant removed from an element's own style
pub const SPACING_PROPERTIES: &[&str] = &[
    "margin",
    "padding",
    "margin-top",
    "margin-bottom",
    "margin-left",
    "margin-right",
    "padding-top",
    "padding-bottom",
    "padding-left",
    "padding-right",
];

/// Properties stripped when a `<selector> td` rule supplies the padding
const TD_RULE_STRIPPED: &[&str] = &["margin", "padding"];

/// Cell padding plus the spacing-free residual style for one selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpacing {
    /// Value for the wrapping cell's `padding`
    pub cell_padding: String,
    /// Selector style without margin/padding declarations
    pub filtered_style: Declarations,
}

/// Resolve the wrapping-cell padding and residual style for a selector
pub fn extract_spacing(styles: &StyleSheet, selector: &str, default_padding: &str) -> ResolvedSpacing {
    let element_style = styles.get_style(selector);

    let td_style = styles.get_style(&format!("{} td", selector));
    if let Some(padding) = td_style.get("padding") {
        return ResolvedSpacing {
            cell_padding: padding.to_string(),
            filtered_style: element_style.without(TD_RULE_STRIPPED),
        };
    }

    let margin = element_style
        .get("margin")
        .or_else(|| element_style.get("margin-top"))
        .or_else(|| element_style.get("margin-bottom"));
    let padding = element_style
        .get("padding")
        .or_else(|| element_style.get("padding-top"))
        .or_else(|| element_style.get("padding-bottom"));

    ResolvedSpacing {
        cell_padding: combine_spacing(margin, padding)
            .unwrap_or(default_padding)
            .to_string(),
        filtered_style: element_style.without(SPACING_PROPERTIES),
    }
}

/// Margin overrides padding entirely; the two are not added together.
fn combine_spacing<'a>(margin: Option<&'a str>, padding: Option<&'a str>) -> Option<&'a str> {
    margin.or(padding)
}

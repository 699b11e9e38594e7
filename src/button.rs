//! Button link classification and variant selector resolution
//!
//! A link becomes a button when its class list contains `button` or `btn`.
//! Optional markers pick a variant: `tertiary`/`alt2` and `secondary`/`alt`.
//! Each variant maps to an ordered chain of candidate selectors; the first
//! candidate with a non-empty style in the stylesheet is used, and
//! `a.button` is the final fallback.
//!
//! | Variant   | Candidates (in order)                            |
//! |-----------|--------------------------------------------------|
//! | Tertiary  | `a.button.tertiary`, `a.btn.alt2`, `a.button`    |
//! | Secondary | `a.button.secondary`, `a.btn.alt`, `a.button`    |
//! | Btn       | `a.btn`, `a.button`                              |
//! | Primary   | `a.button`                                       |

use tracing::trace;

use crate::stylesheet::StyleSheet;

/// Selector used when no candidate in a chain has a style
pub const DEFAULT_BUTTON_SELECTOR: &str = "a.button";

/// Classes that turn a link into a button
const BUTTON_CLASSES: &[&str] = &["button", "btn"];

/// Any of these keeps a link out of plain-link styling
const BUTTON_MARKER_CLASSES: &[&str] = &["button", "btn", "secondary", "alt", "tertiary", "alt2"];

const TERTIARY_MARKERS: &[&str] = &["tertiary", "alt2"];
const SECONDARY_MARKERS: &[&str] = &["secondary", "alt"];

/// Button styling variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonVariant {
    /// `button` class only
    Primary,
    /// `btn` class without a variant marker
    Btn,
    /// `secondary` or `alt` marker
    Secondary,
    /// `tertiary` or `alt2` marker
    Tertiary,
}

impl ButtonVariant {
    /// Classify a link by its classes; `None` if it is not a button
    pub fn classify<S: AsRef<str>>(classes: &[S]) -> Option<Self> {
        let has = |names: &[&str]| classes.iter().any(|c| names.contains(&c.as_ref()));

        if !has(BUTTON_CLASSES) {
            return None;
        }

        let variant = if has(TERTIARY_MARKERS) {
            ButtonVariant::Tertiary
        } else if has(SECONDARY_MARKERS) {
            ButtonVariant::Secondary
        } else if has(&["btn"]) {
            ButtonVariant::Btn
        } else {
            ButtonVariant::Primary
        };
        Some(variant)
    }

    /// Candidate selectors in preference order
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            ButtonVariant::Tertiary => &["a.button.tertiary", "a.btn.alt2", "a.button"],
            ButtonVariant::Secondary => &["a.button.secondary", "a.btn.alt", "a.button"],
            ButtonVariant::Btn => &["a.btn", "a.button"],
            ButtonVariant::Primary => &["a.button"],
        }
    }

    /// First candidate with a non-empty style, else `a.button`
    pub fn resolve(self, styles: &StyleSheet) -> &'static str {
        let selector = first_styled(self.candidates(), styles).unwrap_or(DEFAULT_BUTTON_SELECTOR);
        trace!(
            target: "email_safe_markup::button",
            variant = ?self,
            selector,
            "resolved button selector"
        );
        selector
    }
}

/// Returns `true` if any class is a button class or variant marker
pub fn has_button_marker<S: AsRef<str>>(classes: &[S]) -> bool {
    classes
        .iter()
        .any(|c| BUTTON_MARKER_CLASSES.contains(&c.as_ref()))
}

fn first_styled(candidates: &[&'static str], styles: &StyleSheet) -> Option<&'static str> {
    candidates
        .iter()
        .copied()
        .find(|selector| !styles.get_style(selector).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_requires_button_class() {
        assert_eq!(ButtonVariant::classify(&["secondary"]), None);
        assert_eq!(ButtonVariant::classify::<&str>(&[]), None);
        assert_eq!(ButtonVariant::classify(&["link", "alt2"]), None);
    }

    #[test]
    fn test_classify_variants() {
        assert_eq!(ButtonVariant::classify(&["button"]), Some(ButtonVariant::Primary));
        assert_eq!(ButtonVariant::classify(&["btn"]), Some(ButtonVariant::Btn));
        assert_eq!(
            ButtonVariant::classify(&["button", "secondary"]),
            Some(ButtonVariant::Secondary)
        );
        assert_eq!(ButtonVariant::classify(&["btn", "alt"]), Some(ButtonVariant::Secondary));
        assert_eq!(
            ButtonVariant::classify(&["button", "tertiary"]),
            Some(ButtonVariant::Tertiary)
        );
        assert_eq!(ButtonVariant::classify(&["alt2", "btn"]), Some(ButtonVariant::Tertiary));
    }

    #[test]
    fn test_tertiary_beats_secondary() {
        assert_eq!(
            ButtonVariant::classify(&["button", "secondary", "tertiary"]),
            Some(ButtonVariant::Tertiary)
        );
    }

    #[test]
    fn test_resolve_first_non_empty() {
        let styles = StyleSheet::parse("a.btn.alt { color: red } a.button { color: blue }");
        assert_eq!(ButtonVariant::Secondary.resolve(&styles), "a.btn.alt");
        assert_eq!(ButtonVariant::Tertiary.resolve(&styles), "a.button");
        assert_eq!(ButtonVariant::Btn.resolve(&styles), "a.button");
    }

    #[test]
    fn test_resolve_prefers_button_variant_selector() {
        let styles = StyleSheet::parse(
            "a.button.secondary { color: green } a.btn.alt { color: red } a.btn { color: gray }",
        );
        assert_eq!(ButtonVariant::Secondary.resolve(&styles), "a.button.secondary");
        assert_eq!(ButtonVariant::Btn.resolve(&styles), "a.btn");
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let styles = StyleSheet::parse("");
        for variant in [
            ButtonVariant::Primary,
            ButtonVariant::Btn,
            ButtonVariant::Secondary,
            ButtonVariant::Tertiary,
        ] {
            assert_eq!(variant.resolve(&styles), DEFAULT_BUTTON_SELECTOR);
        }
    }

    #[test]
    fn test_has_button_marker() {
        assert!(has_button_marker(&["alt"]));
        assert!(has_button_marker(&["x", "btn"]));
        assert!(!has_button_marker(&["external", "nav"]));
        assert!(!has_button_marker::<String>(&[]));
    }
}

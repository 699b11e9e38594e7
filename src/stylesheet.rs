//! Flat CSS rule resolver
//!
//! This module turns an author-supplied stylesheet into a lookup table from
//! selector strings to ordered property/value declarations. It is deliberately
//! not a CSS engine: selectors are opaque strings compared by exact equality,
//! and there is no cascade, inheritance or specificity.
//!
//! # Parsing Rules
//!
//! 1. `/* ... */` comments are removed first (they may span lines)
//! 2. Every `<selectors> { <declarations> }` block is extracted
//! 3. The selector list is split on `,` and each selector is trimmed
//! 4. Declarations are split on `;`, then on the first `:` of each pair
//! 5. Blocks naming the same selector merge; a later value for a property
//!    overwrites the earlier one in place
//!
//! Anything that does not fit this shape (unbalanced braces, declarations
//! without a colon, empty names or values) is skipped silently.
//!
//! # Examples
//!
//! ```rust
//! use email_safe_markup::stylesheet::StyleSheet;
//!
//! let styles = StyleSheet::parse("h1, h2 { color: red; margin: 0 0 10px 0; }");
//! assert_eq!(styles.get_style("h1").get("color"), Some("red"));
//! assert_eq!(styles.style_string("h2"), "color: red; margin: 0 0 10px 0");
//! assert_eq!(styles.style_string("h3"), "");
//! ```

use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Shared empty declaration set returned for unknown selectors
static EMPTY_DECLARATIONS: Declarations = Declarations {
    entries: Vec::new(),
};

/// Ordered property → value mapping for one selector or inline style
///
/// Property names are unique. Inserting an existing property replaces its
/// value but keeps its original position, so serialization order always
/// follows first declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    entries: Vec<(String, String)>,
}

impl Declarations {
    /// Create an empty declaration set
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property value by exact name
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if the property is declared
    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    /// Insert or overwrite a property
    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Remove a property, returning its value if it was declared
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self.entries.iter().position(|(name, _)| name == property)?;
        Some(self.entries.remove(index).1)
    }

    /// Copy of these declarations without the named properties
    ///
    /// Property names are compared case-insensitively.
    pub fn without(&self, properties: &[&str]) -> Declarations {
        self.entries
            .iter()
            .filter(|(name, _)| {
                !properties
                    .iter()
                    .any(|excluded| name.eq_ignore_ascii_case(excluded))
            })
            .cloned()
            .collect()
    }

    /// Iterate `(property, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as an inline style: `"prop: value; prop: value"`
    ///
    /// Returns an empty string when there are no declarations.
    pub fn to_inline_style(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl FromIterator<(String, String)> for Declarations {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut declarations = Declarations::new();
        for (property, value) in iter {
            declarations.insert(property, value);
        }
        declarations
    }
}

/// Parsed stylesheet: selector → ordered declarations
///
/// Built once from CSS text and immutable afterwards. Queries for selectors
/// that were never declared return an empty result, never an error.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: Vec<(String, Declarations)>,
    index: HashMap<String, usize>,
}

impl StyleSheet {
    /// Parse CSS text into a stylesheet
    ///
    /// This never fails. Malformed blocks and declarations are dropped and
    /// the affected selectors simply end up with fewer (or no) properties.
    pub fn parse(css: &str) -> Self {
        let mut sheet = StyleSheet::default();

        let css: Cow<'_, str> = match comment_regex() {
            Some(re) => re.replace_all(css, ""),
            None => Cow::Borrowed(css),
        };

        let Some(block_re) = block_regex() else {
            return sheet;
        };

        for caps in block_re.captures_iter(&css) {
            let declarations = parse_declarations(&caps[2]);
            if declarations.is_empty() {
                continue;
            }

            for selector in caps[1].split(',').map(str::trim) {
                if selector.is_empty() {
                    continue;
                }
                let rule = sheet.rule_mut(selector);
                for (property, value) in declarations.iter() {
                    rule.insert(property, value);
                }
            }
        }

        debug!(
            target: "email_safe_markup::stylesheet",
            selectors = sheet.len(),
            "parsed stylesheet"
        );

        sheet
    }

    /// Declarations for an exact selector string (empty if absent)
    pub fn get_style(&self, selector: &str) -> &Declarations {
        self.index
            .get(selector)
            .map(|&i| &self.rules[i].1)
            .unwrap_or(&EMPTY_DECLARATIONS)
    }

    /// Declarations for a selector serialized as an inline style string
    ///
    /// Returns `""` when the selector has no properties.
    pub fn style_string(&self, selector: &str) -> String {
        self.get_style(selector).to_inline_style()
    }

    /// Selectors in the order they were first declared
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(selector, _)| selector.as_str())
    }

    /// Number of selectors with at least one declaration
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn rule_mut(&mut self, selector: &str) -> &mut Declarations {
        let index = match self.index.get(selector).copied() {
            Some(i) => i,
            None => {
                self.rules.push((selector.to_string(), Declarations::new()));
                let i = self.rules.len() - 1;
                self.index.insert(selector.to_string(), i);
                i
            }
        };
        &mut self.rules[index].1
    }
}

/// Parse the body of one rule block into declarations
fn parse_declarations(body: &str) -> Declarations {
    let mut declarations = Declarations::new();
    for pair in body.split(';') {
        let Some((property, value)) = pair.split_once(':') else {
            continue;
        };
        let (property, value) = (property.trim(), value.trim());
        if property.is_empty() || value.is_empty() {
            continue;
        }
        declarations.insert(property, value);
    }
    declarations
}

fn comment_regex() -> Option<&'static Regex> {
    static COMMENT_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    COMMENT_REGEX
        .get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").ok())
        .as_ref()
}

fn block_regex() -> Option<&'static Regex> {
    static BLOCK_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    BLOCK_REGEX
        .get_or_init(|| Regex::new(r"([^{]+)\{([^}]+)\}").ok())
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_stylesheet() {
        let styles = StyleSheet::parse("");
        assert!(styles.is_empty());
        assert!(styles.get_style("h1").is_empty());
        assert_eq!(styles.style_string("h1"), "");
    }

    #[test]
    fn test_selector_list_shares_declarations() {
        let styles = StyleSheet::parse("h1, h2 { color: red; }");
        assert_eq!(styles.get_style("h1").get("color"), Some("red"));
        assert_eq!(styles.get_style("h1"), styles.get_style("h2"));
    }

    #[test]
    fn test_later_block_overwrites_property() {
        let styles = StyleSheet::parse("p { color: red; font-size: 14px; } p { color: blue; }");
        assert_eq!(styles.style_string("p"), "color: blue; font-size: 14px");
    }

    #[test]
    fn test_multiline_comments_removed() {
        let css = "/* header\n h1 { color: red; }\n*/ p { color: blue; } /* tail */";
        let styles = StyleSheet::parse(css);
        assert!(styles.get_style("h1").is_empty());
        assert_eq!(styles.style_string("p"), "color: blue");
        assert_eq!(styles.len(), 1);
    }

    #[test]
    fn test_value_keeps_colons() {
        let styles = StyleSheet::parse("div { background: url(http://example.com/a.png) }");
        assert_eq!(
            styles.get_style("div").get("background"),
            Some("url(http://example.com/a.png)")
        );
    }

    #[test]
    fn test_compound_selectors_are_opaque_keys() {
        let styles = StyleSheet::parse("a.button.secondary td { padding: 10px } .footer p { color: #999 }");
        assert_eq!(styles.style_string("a.button.secondary td"), "padding: 10px");
        assert_eq!(styles.style_string(".footer p"), "color: #999");
        assert!(styles.get_style("a.button").is_empty());
    }

    #[test]
    fn test_malformed_declarations_skipped() {
        let styles = StyleSheet::parse("h1 { color; : red; margin: ; font-weight: bold }");
        assert_eq!(styles.style_string("h1"), "font-weight: bold");
    }

    #[test]
    fn test_unclosed_block_skipped() {
        let styles = StyleSheet::parse("p { color: blue } h1 { color: red");
        assert_eq!(styles.style_string("p"), "color: blue");
        assert!(styles.get_style("h1").is_empty());
    }

    #[test]
    fn test_empty_selectors_discarded() {
        let styles = StyleSheet::parse(", h1 , { color: red }");
        assert_eq!(styles.selectors().collect::<Vec<_>>(), vec!["h1"]);
    }

    #[test]
    fn test_block_without_declarations_creates_no_selector() {
        let styles = StyleSheet::parse("h1 { } h2 { nothing here }");
        assert!(styles.is_empty());
    }

    #[test]
    fn test_selectors_in_declaration_order() {
        let styles = StyleSheet::parse("p { a: 1 } h1 { b: 2 } p { c: 3 }");
        assert_eq!(styles.selectors().collect::<Vec<_>>(), vec!["p", "h1"]);
    }

    #[test]
    fn test_declarations_insert_keeps_position() {
        let mut declarations = Declarations::new();
        declarations.insert("color", "red");
        declarations.insert("margin", "0");
        declarations.insert("color", "blue");
        assert_eq!(declarations.to_inline_style(), "color: blue; margin: 0");
    }

    #[test]
    fn test_declarations_without_is_case_insensitive() {
        let declarations: Declarations = vec![
            ("Margin".to_string(), "0".to_string()),
            ("color".to_string(), "red".to_string()),
        ]
        .into_iter()
        .collect();
        let filtered = declarations.without(&["margin"]);
        assert_eq!(filtered.to_inline_style(), "color: red");
    }

    #[test]
    fn test_declarations_remove() {
        let mut declarations = Declarations::new();
        declarations.insert("float", "left");
        assert_eq!(declarations.remove("float"), Some("left".to_string()));
        assert_eq!(declarations.remove("float"), None);
        assert!(declarations.is_empty());
    }

    proptest! {
        #[test]
        fn prop_css_without_blocks_has_no_rules(text in "[^{}]{0,200}") {
            let styles = StyleSheet::parse(&text);
            prop_assert!(styles.is_empty());
            prop_assert_eq!(styles.style_string("p"), "");
        }

        #[test]
        fn prop_last_value_wins(
            first in "[a-z]{1,10}",
            second in "[a-z]{1,10}",
        ) {
            let css = format!("p {{ color: {} }}\np {{ color: {} }}", first, second);
            let styles = StyleSheet::parse(&css);
            prop_assert_eq!(styles.get_style("p").get("color"), Some(second.as_str()));
        }

        #[test]
        fn prop_parse_never_panics(css in "\\PC{0,300}") {
            let _ = StyleSheet::parse(&css);
        }
    }
}

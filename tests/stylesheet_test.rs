//! Stylesheet resolution tests
//!
//! Exercises CSS parsing, lookup and spacing extraction through the public
//! API only.

use email_safe_markup::stylesheet::StyleSheet;
use email_safe_markup::{StyleValidator, extract_spacing};

/// A stylesheet without rule blocks resolves nothing
#[test]
fn test_no_blocks_resolves_nothing() {
    for css in ["", "   \n", "/* only a comment */", "color: red;", "h1 color: red"] {
        let styles = StyleSheet::parse(css);
        assert!(styles.is_empty(), "css {:?} produced rules", css);
        for selector in ["h1", "p", "a.button", ""] {
            assert!(styles.get_style(selector).is_empty());
            assert_eq!(styles.style_string(selector), "");
        }
    }
}

/// Comma-separated selectors share one declaration block
#[test]
fn test_selector_list_shares_declarations() {
    let styles = StyleSheet::parse("h1, h2 { color: red; }");
    assert_eq!(styles.get_style("h1"), styles.get_style("h2"));
    assert_eq!(styles.get_style("h1").get("color"), Some("red"));
    assert_eq!(styles.get_style("h1").len(), 1);
    assert_eq!(styles.style_string("h2"), "color: red");
}

/// Later blocks override earlier ones for the same property
#[test]
fn test_later_block_wins() {
    let styles = StyleSheet::parse("p { color: red; margin: 0 } p { color: blue }");
    assert_eq!(styles.get_style("p").get("color"), Some("blue"));
    assert_eq!(styles.style_string("p"), "color: blue; margin: 0");
}

/// Comments are removed before rule extraction, even across lines
#[test]
fn test_comments_contribute_nothing() {
    let css = "/* header\n h1 { color: red } \n*/ p { /* inline */ color: blue; }\n/* a { color: green } */";
    let styles = StyleSheet::parse(css);
    assert!(styles.get_style("h1").is_empty());
    assert!(styles.get_style("a").is_empty());
    assert_eq!(styles.style_string("p"), "color: blue");
    assert_eq!(styles.selectors().collect::<Vec<_>>(), vec!["p"]);
}

/// Compound and descendant selectors are matched by exact string
#[test]
fn test_selectors_are_opaque_strings() {
    let styles = StyleSheet::parse(".footer p { font-size: 11px } a.button.secondary { color: #000 }");
    assert_eq!(styles.style_string(".footer p"), "font-size: 11px");
    assert_eq!(styles.style_string("a.button.secondary"), "color: #000");
    assert!(styles.get_style("p").is_empty());
    assert!(styles.get_style("a.secondary.button").is_empty());
}

/// Values keep their raw text, including colons and commas
#[test]
fn test_values_pass_through() {
    let styles = StyleSheet::parse(
        "body { font-family: 'Helvetica Neue', Arial, sans-serif; background: url(http://x/y.png) }",
    );
    let body = styles.get_style("body");
    assert_eq!(body.get("font-family"), Some("'Helvetica Neue', Arial, sans-serif"));
    assert_eq!(body.get("background"), Some("url(http://x/y.png)"));
}

/// Margin wins over padding and both are removed from the residual style
#[test]
fn test_spacing_margin_wins() {
    let styles = StyleSheet::parse("h1 { margin: 10px; padding: 5px; color: red }");
    let spacing = extract_spacing(&styles, "h1", "0 0 20px 0");
    assert_eq!(spacing.cell_padding, "10px");
    assert!(!spacing.filtered_style.contains("margin"));
    assert!(!spacing.filtered_style.contains("padding"));
    assert_eq!(spacing.filtered_style.to_inline_style(), "color: red");
}

/// Without margin or padding the caller's default is used verbatim
#[test]
fn test_spacing_default() {
    let styles = StyleSheet::parse("h1 { color: red }");
    let spacing = extract_spacing(&styles, "h1", "0 0 20px 0");
    assert_eq!(spacing.cell_padding, "0 0 20px 0");
    assert_eq!(extract_spacing(&styles, "p", "0 0 20px 0").cell_padding, "0 0 20px 0");
}

/// A `<selector> td` padding rule takes precedence
#[test]
fn test_spacing_td_rule() {
    let styles = StyleSheet::parse("p td { padding: 3px } p { margin: 9px; color: #111 }");
    let spacing = extract_spacing(&styles, "p", "0");
    assert_eq!(spacing.cell_padding, "3px");
    assert_eq!(spacing.filtered_style.to_inline_style(), "color: #111");
}

/// A complete stylesheet passes validation without warnings
#[test]
fn test_validation_of_full_stylesheet() {
    let css = "
        body { background: #fff }
        h1, h2, h3 { color: #111 }
        p { margin: 0 0 16px 0 }
        a { color: #06c }
        a.btn { background: #06c }
        a.btn.alt { background: #eee }
        a.button.tertiary { background: none }
    ";
    let report = StyleValidator::new().validate(&StyleSheet::parse(css));
    assert!(report.is_ok());
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
}

//! Email markup rewriter - inlines styles and wraps blocks in tables
//!
//! This module transforms semantic HTML (typically the output of a Markdown
//! converter) into markup that renders consistently in email clients with
//! poor CSS support. Every visual property is inlined, and block spacing is
//! moved from margins onto the padding of wrapping presentation tables.
//!
//! # Pass Order
//!
//! The rewrite runs as a fixed sequence of passes over the fragment. Each pass
//! selects its elements afresh and processes them in **reverse document
//! order**, so replacing a later element never disturbs an earlier one that
//! is still waiting to be processed.
//!
//! 1. **Headings** (`h1`-`h3`): wrapped in a spacing table, own style inlined
//! 2. **Paragraphs** (`p`): replaced by a spacing table cell holding their content
//! 3. **Lists** (`ul`, `ol`): rebuilt as bullet/content table rows
//! 4. **Button links** (`a.button`, `a.btn` and variants): button table plus
//!    a plain-text fallback row
//! 5. **Plain links**: `a` style appended to the existing inline style
//! 6. **Images**: floated or full-width wrapping tables
//! 7. **Strong/emphasis** (`strong`, `b`, `em`, `i`): style appended
//!
//! Between passes 5 and 6 the fragment is serialized and parsed again, so the
//! image pass works on a tree that reflects all earlier replacements.
//!
//! # Ancestor Guard
//!
//! Paragraphs and lists are skipped when any ancestor is a `<td>` whose style
//! contains `padding`. Every cell produced by the rewriter carries padding, so
//! content already inside a generated cell is never wrapped twice.
//!
//! # Examples
//!
//! ```rust
//! use email_safe_markup::rewriter::EmailMarkupRewriter;
//! use email_safe_markup::stylesheet::StyleSheet;
//!
//! let styles = StyleSheet::parse("h1 { color: red; margin: 10px; }");
//! let html = EmailMarkupRewriter::new()
//!     .rewrite("<h1>Title</h1>", &styles)
//!     .expect("rewrite");
//! assert!(html.contains(r#"<td style="padding: 10px;"><h1 style="color: red">Title</h1></td>"#));
//! ```

use tracing::{debug, trace};

use crate::button::{ButtonVariant, has_button_marker};
use crate::dom::ElementNode;
use crate::error::RewriteError;
use crate::inline_style::{cell_style, float_direction, merge_styles, strip_float};
use crate::markup::{TABLE_OPEN, escape_attr, escape_text, single_cell_table, style_attr};
use crate::parser::Fragment;
use crate::spacing::extract_spacing;
use crate::stylesheet::StyleSheet;

/// Glyph placed in the bullet cell of unordered list rows
const BULLET: &str = "•";

/// Width of the bullet cell in list rows
const BULLET_CELL_WIDTH: &str = "20px";

/// Rewrite options
///
/// All spacing values are raw CSS strings and are passed through unchanged.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Cell padding for `h1` when the stylesheet declares no spacing
    pub h1_padding: String,
    /// Cell padding for `h2` when the stylesheet declares no spacing
    pub h2_padding: String,
    /// Cell padding for `h3` when the stylesheet declares no spacing
    pub h3_padding: String,
    /// Cell padding for `p` when the stylesheet declares no spacing
    pub paragraph_padding: String,
    /// Cell padding for `ul`/`ol` when the stylesheet declares no spacing
    pub list_padding: String,
    /// Padding of each list row's cells
    pub list_item_padding: String,
    /// Color of the bullet glyph or item number
    pub bullet_color: String,
    /// Padding around a button unless `a.button-wrapper` sets one
    pub button_wrapper_padding: String,
    /// Text preceding the URL in the button fallback row
    pub fallback_prompt: String,
    /// Images at least this wide (px) are wrapped as full-width
    pub full_width_threshold: i64,
    /// Reject inputs larger than this many bytes
    pub max_input_size: Option<usize>,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            h1_padding: "0 0 20px 0".to_string(),
            h2_padding: "0 0 20px 0".to_string(),
            h3_padding: "0 0 15px 0".to_string(),
            paragraph_padding: "0 0 20px 0".to_string(),
            list_padding: "0 0 10px 0".to_string(),
            list_item_padding: "0 0 8px 0".to_string(),
            bullet_color: "#333333".to_string(),
            button_wrapper_padding: "0 0 20px 0".to_string(),
            fallback_prompt: "Or paste this link into your browser:".to_string(),
            full_width_threshold: 500,
            max_input_size: None,
        }
    }
}

/// Rewrites HTML fragments into email-safe markup
///
/// The rewriter holds only configuration; it can be reused for any number
/// of fragments and stylesheets.
///
/// # Examples
///
/// ```rust
/// use email_safe_markup::rewriter::{EmailMarkupRewriter, RewriteOptions};
/// use email_safe_markup::stylesheet::StyleSheet;
///
/// let rewriter = EmailMarkupRewriter::with_options(RewriteOptions {
///     paragraph_padding: "0 0 12px 0".to_string(),
///     ..Default::default()
/// });
/// let html = rewriter
///     .rewrite("<p>Hello</p>", &StyleSheet::parse(""))
///     .expect("rewrite");
/// assert!(html.contains(r#"<td style="padding: 0 0 12px 0;">Hello</td>"#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmailMarkupRewriter {
    options: RewriteOptions,
}

impl EmailMarkupRewriter {
    /// Create a rewriter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a rewriter with custom options
    pub fn with_options(options: RewriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Rewrite an HTML fragment against a stylesheet
    ///
    /// Missing selectors never cause an error; they contribute empty styles
    /// and the spacing defaults from [`RewriteOptions`].
    ///
    /// # Errors
    ///
    /// - `RewriteError::InputTooLarge` if `max_input_size` is set and exceeded
    /// - `RewriteError::Serialize` / `RewriteError::Encoding` if html5ever
    ///   fails to serialize an intermediate tree
    pub fn rewrite(&self, html: &str, styles: &StyleSheet) -> Result<String, RewriteError> {
        if let Some(limit) = self.options.max_input_size {
            if html.len() > limit {
                return Err(RewriteError::InputTooLarge {
                    size: html.len(),
                    limit,
                });
            }
        }

        let fragment = Fragment::parse(html)?;

        self.style_headings(&fragment, styles)?;
        self.style_paragraphs(&fragment, styles)?;
        self.style_lists(&fragment, styles)?;
        self.style_buttons(&fragment, styles)?;
        self.style_links(&fragment, styles);

        // Table replacements above changed node identity and ancestry
        let fragment = fragment.reparse()?;

        self.style_images(&fragment, styles)?;
        self.style_inline_pair(&fragment, styles, "strong", "b");
        self.style_inline_pair(&fragment, styles, "em", "i");

        fragment.to_html()
    }

    /// Pass 1: headings keep their element, gain a spacing table
    fn style_headings(&self, fragment: &Fragment, styles: &StyleSheet) -> Result<(), RewriteError> {
        let headings = fragment.select(&["h1", "h2", "h3"]);
        let count = headings.len();

        for heading in headings.into_iter().rev() {
            let tag = heading.tag_name().to_string();
            let default_padding = match tag.as_str() {
                "h1" => &self.options.h1_padding,
                "h2" => &self.options.h2_padding,
                _ => &self.options.h3_padding,
            };

            let spacing = extract_spacing(styles, &tag, default_padding);
            heading.set_style(&spacing.filtered_style.to_inline_style());

            let cell = cell_style(&[&padding_declaration(&spacing.cell_padding)]);
            let table = single_cell_table(&style_attr(&cell), &heading.outer_html()?);
            heading.replace_with_html(&table)?;
        }

        debug!(target: "email_safe_markup::rewriter", count, "styled headings");
        Ok(())
    }

    /// Pass 2: paragraphs dissolve into a styled spacing cell
    fn style_paragraphs(&self, fragment: &Fragment, styles: &StyleSheet) -> Result<(), RewriteError> {
        let paragraphs = fragment.select(&["p"]);
        let (mut styled, mut skipped) = (0usize, 0usize);

        for paragraph in paragraphs.into_iter().rev() {
            if inside_padded_cell(&paragraph) {
                trace!(target: "email_safe_markup::rewriter", "paragraph already inside padded cell");
                skipped += 1;
                continue;
            }

            let spacing = extract_spacing(styles, "p", &self.options.paragraph_padding);
            let cell = cell_style(&[
                &padding_declaration(&spacing.cell_padding),
                &spacing.filtered_style.to_inline_style(),
            ]);
            let table = single_cell_table(&style_attr(&cell), &paragraph.inner_html()?);
            paragraph.replace_with_html(&table)?;
            styled += 1;
        }

        debug!(target: "email_safe_markup::rewriter", styled, skipped, "styled paragraphs");
        Ok(())
    }

    /// Pass 3: lists become bullet/content rows inside a spacing table
    fn style_lists(&self, fragment: &Fragment, styles: &StyleSheet) -> Result<(), RewriteError> {
        let lists = fragment.select(&["ul", "ol"]);
        let (mut styled, mut skipped) = (0usize, 0usize);

        let bullet_style = styles.style_string("li.bullet");
        let content_style = styles.style_string("li.content");
        let item_padding = padding_declaration(&self.options.list_item_padding);
        let bullet_cell = cell_style(&[
            &item_padding,
            "vertical-align: top",
            &format!("width: {}", BULLET_CELL_WIDTH),
            &bullet_style,
        ]);
        let content_cell = cell_style(&[&item_padding, &content_style]);
        let glyph_style = format!("color: {};", self.options.bullet_color);

        for list in lists.into_iter().rev() {
            if inside_padded_cell(&list) {
                trace!(target: "email_safe_markup::rewriter", "list already inside padded cell");
                skipped += 1;
                continue;
            }

            let tag = list.tag_name().to_string();
            let ordered = tag == "ol";
            let spacing = extract_spacing(styles, &tag, &self.options.list_padding);

            let mut rows = String::new();
            for (index, item) in list.child_elements("li").iter().enumerate() {
                let marker = if ordered {
                    format!("{}.", index + 1)
                } else {
                    BULLET.to_string()
                };
                rows.push_str(&format!(
                    "<tr><td{}><span{}>{}</span></td><td{}>{}</td></tr>",
                    style_attr(&bullet_cell),
                    style_attr(&glyph_style),
                    marker,
                    style_attr(&content_cell),
                    item.inner_html()?
                ));
            }

            let items_table = format!(r#"{} width="100%">{}</table>"#, TABLE_OPEN, rows);
            let cell = cell_style(&[
                &padding_declaration(&spacing.cell_padding),
                &spacing.filtered_style.to_inline_style(),
            ]);
            list.replace_with_html(&single_cell_table(&style_attr(&cell), &items_table))?;
            styled += 1;
        }

        debug!(target: "email_safe_markup::rewriter", styled, skipped, "styled lists");
        Ok(())
    }

    /// Pass 4: button links become a button table with a fallback row
    fn style_buttons(&self, fragment: &Fragment, styles: &StyleSheet) -> Result<(), RewriteError> {
        let links = fragment.select(&["a"]);
        let mut count = 0usize;

        let wrapper_padding = styles
            .get_style("a.button-wrapper")
            .get("padding")
            .unwrap_or(self.options.button_wrapper_padding.as_str())
            .to_string();
        let fallback_style = styles.get_style("a.button-fallback");
        // The fallback <p> must stay behind the ancestor guard
        let fallback_cell = if fallback_style.contains("padding") {
            cell_style(&[&fallback_style.to_inline_style()])
        } else {
            cell_style(&["padding: 0", &fallback_style.to_inline_style()])
        };
        let fallback_link_style = styles.style_string("a.button-fallback a");

        for link in links.into_iter().rev() {
            let Some(variant) = ButtonVariant::classify(&link.classes()) else {
                continue;
            };
            let selector = variant.resolve(styles);

            let href = link.attr("href").unwrap_or_else(|| "#".to_string());
            let escaped_href = escape_attr(&href);
            let escaped_text = escape_text(&link.text_content());

            let button_cell = cell_style(&[&styles.style_string(&format!("{} td", selector))]);
            let button_style = styles.style_string(selector);
            let span_style = styles.style_string(&format!("{} span", selector));

            let table = format!(
                concat!(
                    r#"{open} width="100%">"#,
                    r#"<tr><td align="center"{wrapper}>"#,
                    r#"{open}><tr><td align="center"{button_cell}>"#,
                    r#"<a href="{href}"{button_style}><span{span_style}>{text}</span></a>"#,
                    r#"</td></tr></table>"#,
                    r#"</td></tr>"#,
                    r#"<tr><td align="center"{fallback_cell}>"#,
                    r#"<p style="margin: 0; padding: 0;">{prompt} "#,
                    r#"<a href="{href}"{fallback_link}>{href}</a></p>"#,
                    r#"</td></tr></table>"#
                ),
                open = TABLE_OPEN,
                wrapper = style_attr(&cell_style(&[&padding_declaration(&wrapper_padding)])),
                button_cell = style_attr(&button_cell),
                button_style = style_attr(&button_style),
                span_style = style_attr(&span_style),
                href = escaped_href,
                text = escaped_text,
                fallback_cell = style_attr(&fallback_cell),
                prompt = escape_text(&self.options.fallback_prompt),
                fallback_link = style_attr(&fallback_link_style),
            );

            link.replace_with_html(&table)?;
            count += 1;
        }

        debug!(target: "email_safe_markup::rewriter", count, "styled button links");
        Ok(())
    }

    /// Pass 5: remaining non-button links get the `a` style appended
    fn style_links(&self, fragment: &Fragment, styles: &StyleSheet) {
        let link_style = styles.style_string("a");
        let mut count = 0usize;

        for link in fragment.select(&["a"]) {
            if has_button_marker(&link.classes()) {
                continue;
            }
            link.set_style(&merge_styles(&[&link.style(), &link_style]));
            count += 1;
        }

        debug!(target: "email_safe_markup::rewriter", count, "styled links");
    }

    /// Pass 6: floated and full-width images get wrapping tables
    fn style_images(&self, fragment: &Fragment, styles: &StyleSheet) -> Result<(), RewriteError> {
        let images = fragment.select(&["img"]);
        let (mut floated, mut wrapped) = (0usize, 0usize);

        let base_style = styles.style_string("img");
        let full_width_style = styles.style_string("img.full-width");

        for image in images.into_iter().rev() {
            let existing = image.style();

            if let Some(direction) = float_direction(&existing) {
                let float_style = styles.style_string(&format!("img.float-{}", direction.as_str()));
                image.set_style(&merge_styles(&[&strip_float(&existing), &base_style, &float_style]));

                let table_style = cell_style(&[
                    &format!("float: {}", direction.as_str()),
                    "max-width: 30%",
                    direction.gutter_margin(),
                ]);
                let table = format!(
                    r#"{} align="{}"{}><tr><td>{}</td></tr></table>"#,
                    TABLE_OPEN,
                    direction.as_str(),
                    style_attr(&table_style),
                    image.outer_html()?
                );
                image.replace_with_html(&table)?;
                floated += 1;
                continue;
            }

            image.set_style(&merge_styles(&[&existing, &base_style, &full_width_style]));

            if is_full_width(image.attr("width").as_deref(), self.options.full_width_threshold) {
                let table = single_cell_table(
                    &format!(r#" align="center"{}"#, style_attr("padding: 0;")),
                    &image.outer_html()?,
                );
                image.replace_with_html(&table)?;
                wrapped += 1;
            }
        }

        debug!(target: "email_safe_markup::rewriter", floated, wrapped, "styled images");
        Ok(())
    }

    /// Pass 7: synonym tag pairs share a style, own tag first
    fn style_inline_pair(&self, fragment: &Fragment, styles: &StyleSheet, first: &str, second: &str) {
        let first_style = styles.style_string(first);
        let second_style = styles.style_string(second);

        let elements = fragment.select(&[first, second]);
        for element in &elements {
            let (own, synonym) = if element.tag_name() == first {
                (&first_style, &second_style)
            } else {
                (&second_style, &first_style)
            };
            let resolved = if own.is_empty() { synonym } else { own };
            element.set_style(&merge_styles(&[&element.style(), resolved]));
        }

        debug!(
            target: "email_safe_markup::rewriter",
            tags = %format!("{}/{}", first, second),
            count = elements.len(),
            "styled inline elements"
        );
    }
}

/// Rewrite with default options
///
/// ```rust
/// use email_safe_markup::{StyleSheet, rewrite};
///
/// let html = rewrite("<ul><li>A</li></ul>", &StyleSheet::parse("")).expect("rewrite");
/// assert!(html.contains("•"));
/// ```
pub fn rewrite(html: &str, styles: &StyleSheet) -> Result<String, RewriteError> {
    EmailMarkupRewriter::new().rewrite(html, styles)
}

/// Any ancestor is a table cell whose style already carries padding
fn inside_padded_cell(element: &ElementNode) -> bool {
    element
        .ancestors()
        .any(|ancestor| ancestor.tag_name() == "td" && ancestor.style().contains("padding"))
}

fn padding_declaration(value: &str) -> String {
    format!("padding: {}", value)
}

/// Missing widths count as full width; otherwise the leading integer is used
fn is_full_width(width: Option<&str>, threshold: i64) -> bool {
    match width {
        None => true,
        Some(value) => leading_integer(value) >= threshold,
    }
}

/// Integer prefix of a string (`"600px"` → 600); non-numeric yields 0
fn leading_integer(value: &str) -> i64 {
    let value = value.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

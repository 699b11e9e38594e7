//! Email Safe Markup - inline CSS and table layout for email HTML
//!
//! This library turns semantic HTML (usually produced from Markdown) into
//! markup that survives email clients with poor CSS support: styles from an
//! author stylesheet are inlined on every element, and block spacing is moved
//! into the padding of nested presentation tables.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `stylesheet`: flat CSS parsing into selector → declarations
//! - `spacing`: margin/padding extraction into table-cell padding
//! - `rewriter`: the ordered element passes producing email-safe markup
//! - `button`: button link classification and selector fallback chains
//! - `parser`: HTML fragment parsing/serialization using html5ever
//! - `dom`: element handles with ancestor traversal and replacement
//! - `inline_style`: inline `style` attribute merging and float handling
//! - `markup`: escaping and table templates
//! - `validation`: stylesheet lint for recommended selectors
//!
//! # Examples
//!
//! ```rust
//! use email_safe_markup::{EmailMarkupRewriter, StyleSheet};
//!
//! let styles = StyleSheet::parse("p { color: #333; margin: 0 0 16px 0; }");
//! let html = EmailMarkupRewriter::new()
//!     .rewrite("<p>Hello</p>", &styles)
//!     .expect("rewrite");
//! assert!(html.contains(r#"<td style="padding: 0 0 16px 0; color: #333;">Hello</td>"#));
//! ```

// Module declarations
pub mod button;
pub mod dom;
pub mod error;
pub mod inline_style;
pub mod markup;
pub mod parser;
pub mod rewriter;
pub mod spacing;
pub mod stylesheet;
pub mod validation;

// Re-export main types for convenience
pub use error::RewriteError;
pub use rewriter::{EmailMarkupRewriter, RewriteOptions, rewrite};
pub use spacing::{ResolvedSpacing, extract_spacing};
pub use stylesheet::{Declarations, StyleSheet};
pub use validation::{StyleValidator, ValidationReport};

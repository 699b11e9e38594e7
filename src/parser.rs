//! HTML fragment parsing and serialization using html5ever
//!
//! The rewriter works on fragments (the output of a Markdown converter), not
//! full documents. A fragment is parsed by hosting it inside a minimal
//! document skeleton and treating the resulting `<body>` as the fragment root,
//! so the WHATWG tree-construction rules apply exactly as they would in a
//! browser rendering the email.
//!
//! # Examples
//!
//! ```rust
//! use email_safe_markup::parser::Fragment;
//!
//! let fragment = Fragment::parse("<h1>Hello</h1><p>World").expect("parse");
//! assert_eq!(fragment.to_html().expect("serialize"), "<h1>Hello</h1><p>World</p>");
//! ```
//!
//! # Re-parse Boundary
//!
//! Node handles are only meaningful within the tree that produced them.
//! [`Fragment::reparse`] materializes the tree to text and builds a fresh one;
//! any handle taken before that point must be considered stale.

use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::dom::ElementNode;
use crate::error::RewriteError;

/// A parsed HTML fragment rooted at a `<body>` element
#[derive(Debug)]
pub struct Fragment {
    // Keeps the whole tree alive so parent links above `body` stay valid
    _document: Handle,
    body: Handle,
}

impl Fragment {
    /// Parse an HTML fragment
    ///
    /// html5ever is permissive: unclosed and misnested tags are repaired the
    /// way a browser would repair them. An empty string yields an empty
    /// fragment.
    ///
    /// # Errors
    ///
    /// Returns `RewriteError::MissingBody` if the parser did not produce a
    /// body element, which does not happen for any input in practice.
    pub fn parse(html: &str) -> Result<Self, RewriteError> {
        let document = parse_hosted(html);
        let body = find_body(&document).ok_or(RewriteError::MissingBody)?;
        Ok(Self {
            _document: document,
            body,
        })
    }

    /// The fragment root (the hosting `<body>` element)
    pub fn root(&self) -> &Handle {
        &self.body
    }

    /// All elements with one of the given tag names, in document order
    pub fn select(&self, tags: &[&str]) -> Vec<ElementNode> {
        let mut found = Vec::new();
        let mut stack: Vec<Handle> = self.body.children.borrow().iter().rev().cloned().collect();

        while let Some(node) = stack.pop() {
            if let NodeData::Element { ref name, .. } = node.data {
                if tags.contains(&name.local.as_ref()) {
                    if let Some(element) = ElementNode::from_handle(node.clone()) {
                        found.push(element);
                    }
                }
            }
            stack.extend(node.children.borrow().iter().rev().cloned());
        }

        found
    }

    /// Serialize the fragment (children of the root) back to HTML text
    pub fn to_html(&self) -> Result<String, RewriteError> {
        serialize_node(&self.body, TraversalScope::ChildrenOnly(None))
    }

    /// Materialize to text and build a fresh tree from it
    pub fn reparse(self) -> Result<Self, RewriteError> {
        let html = self.to_html()?;
        Self::parse(&html)
    }
}

/// Parse markup into detached top-level nodes ready to be spliced elsewhere
pub fn parse_nodes(html: &str) -> Result<Vec<Handle>, RewriteError> {
    let document = parse_hosted(html);
    let body = find_body(&document).ok_or(RewriteError::MissingBody)?;
    let nodes = std::mem::take(&mut *body.children.borrow_mut());
    for node in &nodes {
        node.parent.set(None);
    }
    Ok(nodes)
}

/// Serialize a node with html5ever's serializer
///
/// `TraversalScope::IncludeNode` yields the outer HTML,
/// `TraversalScope::ChildrenOnly(None)` the inner HTML.
pub fn serialize_node(handle: &Handle, scope: TraversalScope) -> Result<String, RewriteError> {
    let mut buf = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    serialize(&mut buf, &SerializableHandle::from(handle.clone()), opts)?;
    Ok(String::from_utf8(buf)?)
}

fn parse_hosted(html: &str) -> Handle {
    let hosted = format!(
        "<!DOCTYPE html><html><head></head><body>{}</body></html>",
        html
    );
    let dom = parse_document(RcDom::default(), Default::default()).one(hosted.as_str());
    dom.document
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = find_child_element(document, "html")?;
    find_child_element(&html, "body")
}

fn find_child_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { ref name, .. } if name.local.as_ref() == tag))
        .cloned()
}

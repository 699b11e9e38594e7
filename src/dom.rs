//! Element handles over the rcdom tree
//!
//! `ElementNode` is a thin, cloneable view of an element node in a
//! [`Fragment`](crate::parser::Fragment). It exposes what the rewriter needs:
//! tag name, attributes, class list, ancestor traversal and in-place subtree
//! replacement. A handle is only valid for the tree it was taken from; after
//! a re-parse, select elements again.

use html5ever::serialize::TraversalScope;
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData};
use std::rc::{Rc, Weak};
use tracing::trace;

use crate::error::RewriteError;
use crate::parser::{parse_nodes, serialize_node};

/// A handle to an element node
#[derive(Debug, Clone)]
pub struct ElementNode {
    handle: Handle,
}

impl ElementNode {
    /// Wrap a node handle, returning `None` for non-element nodes
    pub fn from_handle(handle: Handle) -> Option<Self> {
        match handle.data {
            NodeData::Element { .. } => Some(Self { handle }),
            _ => None,
        }
    }

    /// The underlying rcdom handle
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Lowercase local tag name, e.g. `"h1"`
    pub fn tag_name(&self) -> &str {
        match self.handle.data {
            NodeData::Element { ref name, .. } => name.local.as_ref(),
            _ => "",
        }
    }

    /// Value of an attribute, if present
    pub fn attr(&self, name: &str) -> Option<String> {
        match self.handle.data {
            NodeData::Element { ref attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|attr| attr.name.local.as_ref() == name)
                .map(|attr| attr.value.to_string()),
            _ => None,
        }
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attr(&self, name: &str, value: &str) {
        if let NodeData::Element { ref attrs, .. } = self.handle.data {
            let mut attrs = attrs.borrow_mut();
            match attrs.iter_mut().find(|attr| attr.name.local.as_ref() == name) {
                Some(attr) => attr.value = StrTendril::from_slice(value),
                None => attrs.push(Attribute {
                    name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
                    value: StrTendril::from_slice(value),
                }),
            }
        }
    }

    /// Remove an attribute if present
    pub fn remove_attr(&self, name: &str) {
        if let NodeData::Element { ref attrs, .. } = self.handle.data {
            attrs
                .borrow_mut()
                .retain(|attr| attr.name.local.as_ref() != name);
        }
    }

    /// Current inline `style` attribute, or `""`
    pub fn style(&self) -> String {
        self.attr("style").unwrap_or_default()
    }

    /// Replace the inline style; an empty style removes the attribute
    pub fn set_style(&self, style: &str) {
        if style.trim().is_empty() {
            self.remove_attr("style");
        } else {
            self.set_attr("style", style);
        }
    }

    /// Whitespace-separated entries of the `class` attribute
    pub fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Element ancestors, nearest first (the document node is skipped)
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: parent_of(&self.handle),
        }
    }

    /// Returns `true` while the element is still linked into a tree
    pub fn is_attached(&self) -> bool {
        parent_of(&self.handle).is_some()
    }

    /// Direct child elements with the given tag name
    pub fn child_elements(&self, tag: &str) -> Vec<ElementNode> {
        self.handle
            .children
            .borrow()
            .iter()
            .filter_map(|child| ElementNode::from_handle(child.clone()))
            .filter(|child| child.tag_name() == tag)
            .collect()
    }

    /// Serialized markup of the element itself
    pub fn outer_html(&self) -> Result<String, RewriteError> {
        serialize_node(&self.handle, TraversalScope::IncludeNode)
    }

    /// Serialized markup of the element's children
    pub fn inner_html(&self) -> Result<String, RewriteError> {
        serialize_node(&self.handle, TraversalScope::ChildrenOnly(None))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        let mut stack = vec![self.handle.clone()];
        while let Some(node) = stack.pop() {
            if let NodeData::Text { ref contents } = node.data {
                text.push_str(&contents.borrow());
            }
            stack.extend(node.children.borrow().iter().rev().cloned());
        }
        text
    }

    /// Replace this element with the nodes parsed from `html`
    ///
    /// Returns `Ok(false)` without touching the tree if the element has
    /// already been detached. This handle is detached afterwards.
    pub fn replace_with_html(&self, html: &str) -> Result<bool, RewriteError> {
        let Some(parent) = parent_of(&self.handle) else {
            trace!(target: "email_safe_markup::dom", tag = self.tag_name(), "replace on detached element");
            return Ok(false);
        };

        let replacements = parse_nodes(html)?;
        for node in &replacements {
            node.parent.set(Some(Rc::downgrade(&parent)));
        }

        let mut children = parent.children.borrow_mut();
        let Some(index) = children.iter().position(|child| Rc::ptr_eq(child, &self.handle)) else {
            return Ok(false);
        };
        children.splice(index..=index, replacements);
        self.handle.parent.set(None);

        Ok(true)
    }
}

/// Iterator over an element's ancestors, see [`ElementNode::ancestors`]
pub struct Ancestors {
    next: Option<Handle>,
}

impl Iterator for Ancestors {
    type Item = ElementNode;

    fn next(&mut self) -> Option<ElementNode> {
        loop {
            let current = self.next.take()?;
            self.next = parent_of(&current);
            if let Some(element) = ElementNode::from_handle(current) {
                return Some(element);
            }
        }
    }
}

fn parent_of(handle: &Handle) -> Option<Handle> {
    let weak = handle.parent.take();
    let parent = weak.as_ref().and_then(Weak::upgrade);
    handle.parent.set(weak);
    parent
}

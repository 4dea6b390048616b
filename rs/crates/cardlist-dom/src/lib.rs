//! cardlist-dom — DOM adapter and DomNode types for cardlist
//!
//! [`Dom`] is the capability set the application is written against. Two
//! backends implement it: [`MemoryDom`] here, and the `web-sys` binding in
//! `cardlist-web`. [`DomNode`] is the serializable snapshot of a subtree,
//! consumed by the HTML renderer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod adapter;
pub mod builder;
pub mod error;
pub mod memory;

pub use adapter::{once, Dom, DomEvent, Handler, Subscription};
pub use builder::ElementBuilder;
pub use error::{DomError, Result};
pub use memory::{DispatchOutcome, MemoryDom, NodeId};

/// Tag used for text nodes in a [`DomNode`] tree.
pub const TEXT_TAG: &str = "#text";

/// A single node in a DOM snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomNode {
    /// HTML tag name (e.g. "div", "button", "input"), or `#text`
    pub tag: String,

    /// HTML attributes (class, id, data-*, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<BTreeMap<String, String>>,

    /// Text content for text nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Child nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DomNode>>,
}

impl DomNode {
    /// An element with no attributes and no children
    pub fn element(tag: &str) -> Self {
        DomNode { tag: tag.to_string(), attrs: None, text: None, children: None }
    }

    /// A bare text node
    pub fn text_node(content: &str) -> Self {
        DomNode {
            tag: TEXT_TAG.to_string(),
            attrs: None,
            text: Some(content.to_string()),
            children: None,
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Get a class attribute if present
    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(name).map(|s| s.as_str())
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    /// Iterate over children (empty slice if none)
    pub fn children_iter(&self) -> &[DomNode] {
        match &self.children {
            Some(c) => c,
            None => &[],
        }
    }
}

//! In-memory DOM used on the host, where there is no browser.
//!
//! Nodes live in an arena and are never freed; a cleared subtree just becomes
//! unreachable from the document body. Events are delivered to the target
//! node only (no capture or bubbling phase).

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::adapter::{Dom, DomEvent, Handler, Subscription};
use crate::error::{DomError, Result};
use crate::{DomNode, TEXT_TAG};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

enum NodeKind {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
        value: String,
    },
    Text(String),
}

struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct Listener {
    id: u64,
    node: NodeId,
    event: String,
    callback: Rc<RefCell<Handler>>,
}

struct Arena {
    nodes: Vec<NodeData>,
    body: NodeId,
    listeners: Vec<Listener>,
    next_listener: u64,
}

impl Arena {
    fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes.get(id.0).ok_or(DomError::StaleNode)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes.get_mut(id.0).ok_or(DomError::StaleNode)
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData { kind, parent: None, children: Vec::new() });
        id
    }

    fn attrs_mut(&mut self, id: NodeId, op: &'static str) -> Result<&mut BTreeMap<String, String>> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element { attrs, .. } => Ok(attrs),
            NodeKind::Text(_) => Err(DomError::NotAnElement { op }),
        }
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut cursor = Some(of);
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, child: NodeId) {
        let parent = self.nodes.get(child.0).and_then(|n| n.parent);
        if let Some(parent) = parent {
            self.nodes[parent.0].children.retain(|c| *c != child);
            self.nodes[child.0].parent = None;
        }
    }

    fn find_by_id(&self, from: NodeId, id: &str) -> Option<NodeId> {
        let data = self.nodes.get(from.0)?;
        if let NodeKind::Element { attrs, .. } = &data.kind {
            if attrs.get("id").map(String::as_str) == Some(id) {
                return Some(from);
            }
        }
        data.children.iter().find_map(|c| self.find_by_id(*c, id))
    }

    fn remove_listener(&mut self, id: u64) {
        self.listeners.retain(|l| l.id != id);
    }
}

/// Result of [`MemoryDom::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    pub invoked: usize,
    pub default_prevented: bool,
}

struct MemoryEvent {
    kind: String,
    prevented: Cell<bool>,
}

impl DomEvent for MemoryEvent {
    fn event_type(&self) -> String {
        self.kind.clone()
    }

    fn prevent_default(&self) {
        self.prevented.set(true);
    }

    fn default_prevented(&self) -> bool {
        self.prevented.get()
    }
}

/// Shared handle to an in-memory document. Clones refer to the same tree.
#[derive(Clone)]
pub struct MemoryDom {
    inner: Rc<RefCell<Arena>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty document with a `body` element and nothing else.
    pub fn new() -> Self {
        let mut arena = Arena {
            nodes: Vec::new(),
            body: NodeId(0),
            listeners: Vec::new(),
            next_listener: 0,
        };
        arena.body = arena.push(NodeKind::Element {
            tag: "body".to_string(),
            attrs: BTreeMap::new(),
            value: String::new(),
        });
        Self { inner: Rc::new(RefCell::new(arena)) }
    }

    pub fn body(&self) -> NodeId {
        self.inner.borrow().body
    }

    /// Create an element with the given id and attach it to the body.
    pub fn mount_element(&self, tag: &str, id: &str) -> Result<NodeId> {
        let el = self.create_element(tag)?;
        self.set_attribute(&el, "id", id)?;
        self.append_child(&self.body(), &el)?;
        Ok(el)
    }

    /// Deliver an event of `event_type` to every listener registered on `node`.
    ///
    /// Listeners are snapshotted first; one removed by an earlier listener in
    /// the same dispatch is skipped.
    pub fn dispatch(&self, node: NodeId, event_type: &str) -> DispatchOutcome {
        let snapshot: Vec<(u64, Rc<RefCell<Handler>>)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.node == node && l.event == event_type)
            .map(|l| (l.id, Rc::clone(&l.callback)))
            .collect();

        let event = MemoryEvent { kind: event_type.to_string(), prevented: Cell::new(false) };
        let mut invoked = 0;
        for (id, callback) in snapshot {
            let live = self.inner.borrow().listeners.iter().any(|l| l.id == id);
            if !live {
                continue;
            }
            // A listener that re-dispatches to itself is not re-entered.
            let Ok(mut callback) = callback.try_borrow_mut() else {
                continue;
            };
            (&mut **callback)(&event);
            invoked += 1;
        }
        DispatchOutcome { invoked, default_prevented: event.prevented.get() }
    }

    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.node == node && l.event == event_type)
            .count()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .borrow()
            .nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        match &self.inner.borrow().nodes.get(node.0)?.kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) => Some(TEXT_TAG.to_string()),
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        match &self.inner.borrow().nodes.get(node.0)?.kind {
            NodeKind::Element { attrs, .. } => attrs.get(name).cloned(),
            NodeKind::Text(_) => None,
        }
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.attribute(node, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Concatenated text of every text node under `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        fn walk(arena: &Arena, id: NodeId, out: &mut String) {
            let Some(data) = arena.nodes.get(id.0) else { return };
            if let NodeKind::Text(t) = &data.kind {
                out.push_str(t);
            }
            for child in &data.children {
                walk(arena, *child, out);
            }
        }
        let mut out = String::new();
        walk(&self.inner.borrow(), node, &mut out);
        out
    }

    /// Raw (untrimmed) value of an input, as the user typed it.
    pub fn raw_input_value(&self, input: NodeId) -> Result<String> {
        match &self.inner.borrow().node(input)?.kind {
            NodeKind::Element { tag, value, .. } if tag == "input" => Ok(value.clone()),
            _ => Err(DomError::NotAnInput),
        }
    }

    /// Serializable copy of the subtree rooted at `node`.
    pub fn to_dom_node(&self, node: NodeId) -> Result<DomNode> {
        fn build(arena: &Arena, id: NodeId) -> Result<DomNode> {
            let data = arena.node(id)?;
            match &data.kind {
                NodeKind::Text(t) => Ok(DomNode::text_node(t)),
                NodeKind::Element { tag, attrs, .. } => {
                    let children = data
                        .children
                        .iter()
                        .map(|c| build(arena, *c))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(DomNode {
                        tag: tag.clone(),
                        attrs: (!attrs.is_empty()).then(|| attrs.clone()),
                        text: None,
                        children: (!children.is_empty()).then_some(children),
                    })
                }
            }
        }
        build(&self.inner.borrow(), node)
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        Ok(self.inner.borrow_mut().push(NodeKind::Element {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            value: String::new(),
        }))
    }

    fn create_text(&self, content: &str) -> Result<NodeId> {
        Ok(self.inner.borrow_mut().push(NodeKind::Text(content.to_string())))
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let arena = self.inner.borrow();
        arena.find_by_id(arena.body, id)
    }

    fn input_value(&self, input: &NodeId) -> Result<String> {
        Ok(self.raw_input_value(*input)?.trim().to_string())
    }

    fn set_input_value(&self, input: &NodeId, new_value: &str) -> Result<()> {
        match &mut self.inner.borrow_mut().node_mut(*input)?.kind {
            NodeKind::Element { tag, value, .. } if *tag == "input" => {
                *value = new_value.to_string();
                Ok(())
            }
            _ => Err(DomError::NotAnInput),
        }
    }

    fn add_class(&self, element: &NodeId, class: &str) -> Result<NodeId> {
        // DOMTokenList.add throws on these, so the host DOM must too.
        if class.is_empty() {
            return Err(DomError::Host("SyntaxError: empty class token".to_string()));
        }
        if class.chars().any(char::is_whitespace) {
            return Err(DomError::Host(format!("InvalidCharacterError: class token `{}`", class)));
        }
        let mut arena = self.inner.borrow_mut();
        let attrs = arena.attrs_mut(*element, "add_class")?;
        let current = attrs.entry("class".to_string()).or_default();
        if !current.split_whitespace().any(|c| c == class) {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(class);
        }
        Ok(*element)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<NodeId> {
        let mut arena = self.inner.borrow_mut();
        if let NodeKind::Text(_) = arena.node(*parent)?.kind {
            return Err(DomError::NotAnElement { op: "append_child" });
        }
        arena.node(*child)?;
        if arena.is_ancestor(*child, *parent) {
            return Err(DomError::Host("HierarchyRequestError".to_string()));
        }
        arena.detach(*child);
        arena.nodes[child.0].parent = Some(*parent);
        arena.nodes[parent.0].children.push(*child);
        Ok(*parent)
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<NodeId> {
        let mut arena = self.inner.borrow_mut();
        arena
            .attrs_mut(*element, "set_attribute")?
            .insert(name.to_string(), value.to_string());
        Ok(*element)
    }

    fn clear(&self, element: &NodeId) -> Result<NodeId> {
        let mut arena = self.inner.borrow_mut();
        let data = arena.node_mut(*element)?;
        if let NodeKind::Text(_) = data.kind {
            return Err(DomError::NotAnElement { op: "clear" });
        }
        let children = std::mem::take(&mut data.children);
        for child in children {
            arena.nodes[child.0].parent = None;
        }
        Ok(*element)
    }

    fn on(&self, element: &NodeId, event: &str, handler: Handler) -> Result<Subscription> {
        let id = {
            let mut arena = self.inner.borrow_mut();
            arena.node(*element)?;
            let id = arena.next_listener;
            arena.next_listener += 1;
            arena.listeners.push(Listener {
                id,
                node: *element,
                event: event.to_string(),
                callback: Rc::new(RefCell::new(handler)),
            });
            id
        };
        tracing::trace!(listener = id, event, "listener attached");

        // Weak so a listener that owns its own subscription does not keep the arena alive.
        let arena: Weak<RefCell<Arena>> = Rc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            if let Some(arena) = arena.upgrade() {
                arena.borrow_mut().remove_listener(id);
                tracing::trace!(listener = id, "listener detached");
            }
        }))
    }
}

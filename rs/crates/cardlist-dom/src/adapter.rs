//! The capability set every DOM backend provides.
//!
//! Operations that mutate a node hand the node back so calls can be chained,
//! the same way the builder in [`crate::builder`] threads an element through
//! a series of steps.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{DomError, Result};

/// An event delivered to a [`Handler`].
pub trait DomEvent {
    fn event_type(&self) -> String;
    fn prevent_default(&self);
    fn default_prevented(&self) -> bool;
}

/// Callback attached with [`Dom::on`].
pub type Handler = Box<dyn FnMut(&dyn DomEvent)>;

/// Handle to an attached listener.
///
/// Dropping the handle detaches the listener. Call [`Subscription::forget`]
/// to keep it attached for the lifetime of the page.
#[must_use = "dropping a Subscription detaches its listener"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self { detach: Some(Box::new(detach)) }
    }

    /// Detach exactly the callback this subscription was created for.
    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }

    /// Leave the listener attached permanently.
    pub fn forget(mut self) {
        if let Some(detach) = self.detach.take() {
            std::mem::forget(detach);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// A mutable DOM tree reachable through cheap, clonable handles.
pub trait Dom: Clone + 'static {
    type Node: Clone + 'static;

    fn create_element(&self, tag: &str) -> Result<Self::Node>;

    fn create_text(&self, content: &str) -> Result<Self::Node>;

    /// Look up an element by id. Absence is `None`, matching the host DOM.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Current value of an input element, trimmed.
    fn input_value(&self, input: &Self::Node) -> Result<String>;

    fn set_input_value(&self, input: &Self::Node, value: &str) -> Result<()>;

    /// Add `class` to the element's class list. Adding a present class is a no-op.
    fn add_class(&self, element: &Self::Node, class: &str) -> Result<Self::Node>;

    /// Append `child` to `parent` and return `parent`.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<Self::Node>;

    fn set_attribute(&self, element: &Self::Node, name: &str, value: &str) -> Result<Self::Node>;

    /// Remove every child of `element` and return it.
    fn clear(&self, element: &Self::Node) -> Result<Self::Node>;

    /// Attach `handler` for `event` on `element`.
    fn on(&self, element: &Self::Node, event: &str, handler: Handler) -> Result<Subscription>;

    fn require_by_id(&self, id: &str) -> Result<Self::Node> {
        self.element_by_id(id)
            .ok_or_else(|| DomError::NotFound { id: id.to_string() })
    }
}

/// Attach a handler that detaches itself before it runs, so it fires at most once.
pub fn once<D, F>(dom: &D, element: &D::Node, event: &str, handler: F) -> Result<()>
where
    D: Dom,
    F: FnOnce(&dyn DomEvent) + 'static,
{
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let mut handler = Some(handler);

    let inner = Rc::clone(&slot);
    let subscription = dom.on(
        element,
        event,
        Box::new(move |ev: &dyn DomEvent| {
            let stop = inner.borrow_mut().take();
            if let Some(stop) = stop {
                stop.unsubscribe();
            }
            if let Some(handler) = handler.take() {
                handler(ev);
            }
        }),
    )?;
    *slot.borrow_mut() = Some(subscription);
    Ok(())
}

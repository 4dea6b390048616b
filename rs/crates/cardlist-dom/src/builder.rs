use crate::adapter::Dom;
use crate::error::Result;

/// Threads a freshly created element through a series of mutations.
///
/// The first failing step short-circuits the rest; [`ElementBuilder::build`]
/// returns that error.
///
/// ```
/// use cardlist_dom::{ElementBuilder, MemoryDom};
///
/// let dom = MemoryDom::new();
/// let card = ElementBuilder::new(&dom, "div")
///     .class("rounded")
///     .attr("data-message", "0")
///     .text("hello")
///     .build()
///     .unwrap();
/// assert_eq!(dom.text_content(card), "hello");
/// ```
pub struct ElementBuilder<'d, D: Dom> {
    dom: &'d D,
    node: Result<D::Node>,
}

impl<'d, D: Dom> ElementBuilder<'d, D> {
    pub fn new(dom: &'d D, tag: &str) -> Self {
        Self { dom, node: dom.create_element(tag) }
    }

    fn step(self, f: impl FnOnce(&D, &D::Node) -> Result<D::Node>) -> Self {
        let node = self.node.and_then(|n| f(self.dom, &n));
        Self { dom: self.dom, node }
    }

    pub fn class(self, class: &str) -> Self {
        self.step(|dom, n| dom.add_class(n, class))
    }

    pub fn classes<S: AsRef<str>>(self, classes: &[S]) -> Self {
        classes.iter().fold(self, |b, c| b.class(c.as_ref()))
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.step(|dom, n| dom.set_attribute(n, name, value))
    }

    pub fn child(self, child: &D::Node) -> Self {
        self.step(|dom, n| dom.append_child(n, child))
    }

    /// Append a text node holding `content`.
    pub fn text(self, content: &str) -> Self {
        self.step(|dom, n| {
            let text = dom.create_text(content)?;
            dom.append_child(n, &text)
        })
    }

    pub fn build(self) -> Result<D::Node> {
        self.node
    }
}

//! [`Dom`] over the browser document.

use cardlist_dom::{Dom, DomError, DomEvent, Handler, Result, Subscription};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, EventTarget, HtmlInputElement, Node};

fn host(err: JsValue) -> DomError {
    DomError::Host(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

fn element<'n>(node: &'n Node, op: &'static str) -> Result<&'n Element> {
    node.dyn_ref::<Element>().ok_or(DomError::NotAnElement { op })
}

fn input(node: &Node) -> Result<&HtmlInputElement> {
    node.dyn_ref::<HtmlInputElement>().ok_or(DomError::NotAnInput)
}

struct WebEvent(web_sys::Event);

impl DomEvent for WebEvent {
    fn event_type(&self) -> String {
        self.0.type_()
    }

    fn prevent_default(&self) {
        self.0.prevent_default();
    }

    fn default_prevented(&self) -> bool {
        self.0.default_prevented()
    }
}

#[derive(Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The document of the global `window`.
    pub fn from_window() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| DomError::Host("no window.document".to_string()))?;
        Ok(Self::new(document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for WebDom {
    type Node = Node;

    fn create_element(&self, tag: &str) -> Result<Node> {
        let el = self.document.create_element(tag).map_err(host)?;
        Ok(el.into())
    }

    fn create_text(&self, content: &str) -> Result<Node> {
        Ok(self.document.create_text_node(content).into())
    }

    fn element_by_id(&self, id: &str) -> Option<Node> {
        self.document.get_element_by_id(id).map(Node::from)
    }

    fn input_value(&self, node: &Node) -> Result<String> {
        Ok(input(node)?.value().trim().to_string())
    }

    fn set_input_value(&self, node: &Node, value: &str) -> Result<()> {
        input(node)?.set_value(value);
        Ok(())
    }

    fn add_class(&self, node: &Node, class: &str) -> Result<Node> {
        element(node, "add_class")?
            .class_list()
            .add_1(class)
            .map_err(host)?;
        Ok(node.clone())
    }

    fn append_child(&self, parent: &Node, child: &Node) -> Result<Node> {
        parent.append_child(child).map_err(host)?;
        Ok(parent.clone())
    }

    fn set_attribute(&self, node: &Node, name: &str, value: &str) -> Result<Node> {
        element(node, "set_attribute")?
            .set_attribute(name, value)
            .map_err(host)?;
        Ok(node.clone())
    }

    fn clear(&self, node: &Node) -> Result<Node> {
        element(node, "clear")?.set_inner_html("");
        Ok(node.clone())
    }

    fn on(&self, node: &Node, event: &str, mut handler: Handler) -> Result<Subscription> {
        let target: EventTarget = node.clone().into();
        let closure = Closure::wrap(Box::new(move |ev: web_sys::Event| {
            handler(&WebEvent(ev));
        }) as Box<dyn FnMut(web_sys::Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(host)?;

        let event = event.to_string();
        // The closure must outlive the listener; it is dropped only after removal.
        Ok(Subscription::new(move || {
            if let Err(e) =
                target.remove_event_listener_with_callback(&event, closure.as_ref().unchecked_ref())
            {
                tracing::warn!(error = ?e, event = %event, "remove_event_listener failed");
            }
            drop(closure);
        }))
    }
}

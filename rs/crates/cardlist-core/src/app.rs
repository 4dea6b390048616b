//! The update loop: one state container, one persistent listener.
//!
//! Each submit event reads the trimmed input, reduces it into the next state,
//! clears the input field and replaces the output container's content with a
//! freshly built view. Blank submissions still clear the input and still
//! re-render.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use cardlist_dom::{Dom, DomError, DomEvent, Subscription};
use thiserror::Error;

use crate::config::{CardStyle, Config, ConfigError};
use crate::state::State;
use crate::view::render_list;
use crate::{reduce, Action};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("required element `#{id}` is missing from the page")]
    Missing { id: String },

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

struct Elements<N> {
    input: N,
    button: N,
    output: N,
}

struct Inner<D: Dom> {
    dom: D,
    elements: Elements<D::Node>,
    style: CardStyle,
    state: RefCell<State>,
}

impl<D: Dom> Inner<D> {
    fn render(&self, state: &State) -> Result<(), DomError> {
        let view = render_list(&self.dom, &self.style, state)?;
        self.dom.clear(&self.elements.output)?;
        self.dom.append_child(&self.elements.output, &view)?;
        Ok(())
    }

    fn apply(&self, text: String) -> Result<(), DomError> {
        let next = reduce(&self.state.borrow(), Action::Submit(text));
        self.dom.set_input_value(&self.elements.input, "")?;
        self.render(&next)?;
        tracing::debug!(messages = next.len(), "state updated");
        *self.state.borrow_mut() = next;
        Ok(())
    }

    fn on_submit(&self, event: &dyn DomEvent) {
        event.prevent_default();
        let result = self
            .dom
            .input_value(&self.elements.input)
            .and_then(|text| self.apply(text));
        if let Err(e) = result {
            tracing::error!(error = %e, "submit failed, state unchanged");
        }
    }
}

/// A mounted message list.
///
/// Dropping the `App` detaches its listener; use [`App::forget`] to keep it
/// running for the lifetime of the page.
pub struct App<D: Dom> {
    inner: Rc<Inner<D>>,
    subscription: Subscription,
}

impl<D: Dom> App<D> {
    /// Resolve the page elements, render the empty list and start listening.
    pub fn mount(dom: D, config: Config) -> Result<Self, AppError> {
        config.validate()?;
        let find = |id: &str| {
            dom.element_by_id(id)
                .ok_or_else(|| AppError::Missing { id: id.to_string() })
        };
        let elements = Elements {
            input: find(&config.input_id)?,
            button: find(&config.button_id)?,
            output: find(&config.output_id)?,
        };

        let inner = Rc::new(Inner {
            dom,
            elements,
            style: config.card,
            state: RefCell::new(State::new()),
        });
        inner.render(&State::new())?;

        let weak: Weak<Inner<D>> = Rc::downgrade(&inner);
        let subscription = inner.dom.on(
            &inner.elements.button,
            &config.submit_event,
            Box::new(move |event: &dyn DomEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_submit(event);
                }
            }),
        )?;

        tracing::info!(
            input = %config.input_id,
            button = %config.button_id,
            output = %config.output_id,
            event = %config.submit_event,
            "message list mounted"
        );
        Ok(App { inner, subscription })
    }

    pub fn state(&self) -> State {
        self.inner.state.borrow().clone()
    }

    /// Re-render the current state into the output container.
    pub fn render(&self) -> Result<(), AppError> {
        let state = self.state();
        self.inner.render(&state)?;
        Ok(())
    }

    /// Run one transition as if `text` had been typed and submitted.
    pub fn submit(&self, text: &str) -> Result<(), AppError> {
        self.inner.apply(text.to_string())?;
        Ok(())
    }

    /// Keep the listener and state alive until the page goes away.
    pub fn forget(self) {
        let App { inner, subscription } = self;
        subscription.forget();
        std::mem::forget(inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardlist_dom::{MemoryDom, NodeId};
    use proptest::prelude::*;

    struct Page {
        dom: MemoryDom,
        input: NodeId,
        button: NodeId,
        output: NodeId,
    }

    impl Page {
        fn new() -> Self {
            let dom = MemoryDom::new();
            let input = dom.mount_element("input", "input").unwrap();
            let button = dom.mount_element("button", "button").unwrap();
            let output = dom.mount_element("div", "messages").unwrap();
            Page { dom, input, button, output }
        }

        fn type_and_click(&self, text: &str) -> bool {
            self.dom.set_input_value(&self.input, text).unwrap();
            self.dom.dispatch(self.button, "click").default_prevented
        }

        fn list(&self) -> NodeId {
            let children = self.dom.children(self.output);
            assert_eq!(children.len(), 1, "output holds exactly one rendered list");
            children[0]
        }

        fn card_texts(&self) -> Vec<String> {
            self.dom
                .children(self.list())
                .into_iter()
                .map(|card| self.dom.text_content(card))
                .collect()
        }
    }

    #[test]
    fn test_mount_renders_empty_list() {
        let page = Page::new();
        let app = App::mount(page.dom.clone(), Config::default()).unwrap();
        assert!(app.state().is_empty());
        assert!(page.card_texts().is_empty());
        assert_eq!(page.dom.listener_count(page.button, "click"), 1);
    }

    #[test]
    fn test_click_appends_card_and_clears_input() {
        let page = Page::new();
        let _app = App::mount(page.dom.clone(), Config::default()).unwrap();

        assert!(page.type_and_click("  hello  "));
        assert!(page.type_and_click("world"));

        assert_eq!(page.card_texts(), vec!["hello", "world"]);
        assert_eq!(page.dom.raw_input_value(page.input).unwrap(), "");
        let cards = page.dom.children(page.list());
        assert_eq!(page.dom.attribute(cards[1], "data-message").as_deref(), Some("1"));
    }

    #[test]
    fn test_blank_submit_clears_input_and_rerenders() {
        let page = Page::new();
        let app = App::mount(page.dom.clone(), Config::default()).unwrap();
        page.type_and_click("a");
        let before = page.list();

        page.type_and_click("   ");

        assert_eq!(app.state().len(), 1);
        assert_eq!(page.card_texts(), vec!["a"]);
        assert_eq!(page.dom.raw_input_value(page.input).unwrap(), "");
        assert_ne!(page.list(), before);
    }

    #[test]
    fn test_single_listener_across_submissions() {
        let page = Page::new();
        let _app = App::mount(page.dom.clone(), Config::default()).unwrap();
        for text in ["a", "b", "c"] {
            page.type_and_click(text);
            assert_eq!(page.dom.listener_count(page.button, "click"), 1);
        }
        assert_eq!(page.card_texts().len(), 3);
    }

    #[test]
    fn test_render_is_idempotent() {
        let page = Page::new();
        let app = App::mount(page.dom.clone(), Config::default()).unwrap();
        app.submit("x").unwrap();
        let first = page.dom.to_dom_node(page.output).unwrap();
        let first_list = page.list();

        app.render().unwrap();

        assert_eq!(page.dom.to_dom_node(page.output).unwrap(), first);
        assert_ne!(page.list(), first_list);
    }

    #[test]
    fn test_missing_element_is_fatal() {
        let dom = MemoryDom::new();
        dom.mount_element("input", "input").unwrap();
        dom.mount_element("div", "messages").unwrap();
        match App::mount(dom, Config::default()) {
            Err(AppError::Missing { id }) => assert_eq!(id, "button"),
            other => panic!("expected missing button, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_invalid_card_class_is_rejected_at_mount() {
        let page = Page::new();
        let mut config = Config::default();
        config.card.classes.push("a b".to_string());
        assert!(matches!(
            App::mount(page.dom.clone(), config),
            Err(AppError::Config(ConfigError::InvalidClass(_)))
        ));
        assert_eq!(page.dom.listener_count(page.button, "click"), 0);
    }

    #[test]
    fn test_submit_event_is_configurable() {
        let page = Page::new();
        let config = Config { submit_event: "submit".to_string(), ..Config::default() };
        let _app = App::mount(page.dom.clone(), config).unwrap();

        page.type_and_click("ignored");
        assert!(page.card_texts().is_empty());

        page.dom.set_input_value(&page.input, "sent").unwrap();
        page.dom.dispatch(page.button, "submit");
        assert_eq!(page.card_texts(), vec!["sent"]);
    }

    #[test]
    fn test_non_input_element_leaves_state_unchanged() {
        let dom = MemoryDom::new();
        dom.mount_element("div", "input").unwrap();
        let button = dom.mount_element("button", "button").unwrap();
        dom.mount_element("div", "messages").unwrap();
        let app = App::mount(dom.clone(), Config::default()).unwrap();

        assert!(dom.dispatch(button, "click").default_prevented);
        assert!(app.state().is_empty());
    }

    #[test]
    fn test_drop_detaches_and_forget_keeps_listening() {
        let page = Page::new();
        drop(App::mount(page.dom.clone(), Config::default()).unwrap());
        assert_eq!(page.dom.listener_count(page.button, "click"), 0);

        App::mount(page.dom.clone(), Config::default()).unwrap().forget();
        page.type_and_click("kept");
        assert_eq!(page.card_texts(), vec!["kept"]);
    }

    proptest! {
        #[test]
        fn prop_cards_are_the_non_blank_submissions(
            texts in proptest::collection::vec("[ a-z\t]{0,6}", 0..12)
        ) {
            let page = Page::new();
            let _app = App::mount(page.dom.clone(), Config::default()).unwrap();
            for text in &texts {
                page.type_and_click(text);
                prop_assert_eq!(page.dom.raw_input_value(page.input).unwrap(), "");
            }

            let expected: Vec<String> = texts
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
            prop_assert_eq!(page.card_texts(), expected);
        }
    }
}

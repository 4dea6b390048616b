//! Pure state → view mapping.
//!
//! Every call builds brand new nodes, so a caller may throw away the previous
//! output without worrying about references into it.

use cardlist_dom::{Dom, DomNode, ElementBuilder, Result};

use crate::config::CardStyle;
use crate::state::State;

/// Build one card: styled container, index attribute, single text child.
pub fn render_message<D: Dom>(dom: &D, style: &CardStyle, text: &str, index: usize) -> Result<D::Node> {
    ElementBuilder::new(dom, &style.tag)
        .classes(&style.classes)
        .attr(&style.index_attribute, &index.to_string())
        .text(text)
        .build()
}

/// Build a fresh container holding one card per message, in state order.
pub fn render_list<D: Dom>(dom: &D, style: &CardStyle, state: &State) -> Result<D::Node> {
    let list = dom.create_element("div")?;
    for (index, message) in state.iter() {
        let card = render_message(dom, style, message.text(), index)?;
        dom.append_child(&list, &card)?;
    }
    Ok(list)
}

/// The same view as [`render_list`], as a serializable tree.
pub fn snapshot(style: &CardStyle, state: &State) -> DomNode {
    state.iter().fold(DomNode::element("div"), |list, (index, message)| {
        let mut card = DomNode::element(&style.tag);
        let mut classes: Vec<&str> = Vec::new();
        for class in &style.classes {
            if !classes.contains(&class.as_str()) {
                classes.push(class);
            }
        }
        if !classes.is_empty() {
            card = card.with_attr("class", &classes.join(" "));
        }
        card = card
            .with_attr(&style.index_attribute, &index.to_string())
            .with_child(DomNode::text_node(message.text()));
        list.with_child(card)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardlist_dom::MemoryDom;

    fn state(texts: &[&str]) -> State {
        texts.iter().copied().collect()
    }

    #[test]
    fn test_empty_state_renders_empty_container() {
        let dom = MemoryDom::new();
        let list = render_list(&dom, &CardStyle::default(), &State::new()).unwrap();
        assert_eq!(dom.tag(list).as_deref(), Some("div"));
        assert!(dom.children(list).is_empty());
    }

    #[test]
    fn test_cards_carry_index_and_text() {
        let dom = MemoryDom::new();
        let list = render_list(&dom, &CardStyle::default(), &state(&["a", "b"])).unwrap();
        let cards = dom.children(list);
        assert_eq!(cards.len(), 2);

        for (i, (card, text)) in cards.iter().zip(["a", "b"]).enumerate() {
            assert_eq!(dom.attribute(*card, "data-message"), Some(i.to_string()));
            assert_eq!(dom.text_content(*card), text);
            assert_eq!(dom.children(*card).len(), 1);
            assert_eq!(
                dom.classes(*card),
                vec!["text-bg-primary", "p-3", "mb-3", "rounded", "w-75"]
            );
        }
    }

    #[test]
    fn test_render_does_not_reuse_nodes() {
        let dom = MemoryDom::new();
        let s = state(&["a"]);
        let first = render_list(&dom, &CardStyle::default(), &s).unwrap();
        let second = render_list(&dom, &CardStyle::default(), &s).unwrap();
        assert_ne!(first, second);
        assert_ne!(dom.children(first), dom.children(second));
        assert_eq!(dom.to_dom_node(first).unwrap(), dom.to_dom_node(second).unwrap());
        assert_eq!(s, state(&["a"]));
    }

    #[test]
    fn test_snapshot_matches_live_render() {
        let dom = MemoryDom::new();
        let mut style = CardStyle::default();
        style.classes.push("p-3".to_string());
        let s = state(&["x", "<y>", "z"]);
        let live = render_list(&dom, &style, &s).unwrap();
        assert_eq!(dom.to_dom_node(live).unwrap(), snapshot(&style, &s));
    }

    #[test]
    fn test_card_html_matches_page_contract() {
        let dom = MemoryDom::new();
        let card = render_message(&dom, &CardStyle::default(), "hello", 3).unwrap();
        let html = cardlist_render_html::render_to_html(&dom.to_dom_node(card).unwrap());
        assert_eq!(
            html,
            r#"<div class="text-bg-primary p-3 mb-3 rounded w-75" data-message="3">hello</div>"#
        );
    }

    #[test]
    fn test_invalid_class_token_fails_live_render() {
        let dom = MemoryDom::new();
        let style = CardStyle {
            classes: vec!["p-3".into(), "".into(), "a b".into()],
            ..CardStyle::default()
        };
        assert!(matches!(
            render_list(&dom, &style, &state(&["x"])),
            Err(cardlist_dom::DomError::Host(_))
        ));
    }

    #[test]
    fn test_snapshot_without_classes_has_no_class_attr() {
        let style = CardStyle { classes: Vec::new(), ..CardStyle::default() };
        let node = snapshot(&style, &state(&["a"]));
        assert_eq!(node.children_iter()[0].class(), None);
    }
}

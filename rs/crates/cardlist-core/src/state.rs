use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// One submitted text snippet. Its position in [`State`] is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(String);

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Ordered, append-only sequence of messages.
///
/// Values are immutable: [`State::append`] returns a new state and leaves the
/// receiver untouched. Clones share storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Message>", into = "Vec<Message>")]
pub struct State {
    messages: Rc<[Message]>,
}

impl Default for State {
    fn default() -> Self {
        State { messages: Rc::from(Vec::new()) }
    }
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Message)> {
        self.messages.iter().enumerate()
    }

    pub fn append(&self, message: Message) -> State {
        let mut next = Vec::with_capacity(self.messages.len() + 1);
        next.extend_from_slice(&self.messages);
        next.push(message);
        State { messages: next.into() }
    }
}

impl From<Vec<Message>> for State {
    fn from(messages: Vec<Message>) -> Self {
        State { messages: messages.into() }
    }
}

impl From<State> for Vec<Message> {
    fn from(state: State) -> Self {
        state.messages.to_vec()
    }
}

impl<M: Into<Message>> FromIterator<M> for State {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        iter.into_iter().map(Into::into).collect::<Vec<Message>>().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_leaves_original_untouched() {
        let empty = State::new();
        let one = empty.append("a".into());
        let two = one.append("b".into());

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(
            two.messages().iter().map(Message::text).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_state_serializes_as_plain_array() {
        let state: State = ["a", "b"].into_iter().collect();
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let back: State = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}

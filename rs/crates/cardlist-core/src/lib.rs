//! cardlist-core — state, view and update loop of the cardlist message list.
//!
//! Everything here is written against [`cardlist_dom::Dom`], so the same loop
//! drives the browser through `cardlist-web` and the in-memory DOM in tests.

pub mod app;
pub mod config;
pub mod state;
pub mod view;

pub use app::{App, AppError};
pub use config::{CardStyle, Config, ConfigError};
pub use state::{Message, State};
pub use view::{render_list, render_message, snapshot};

/// Supported actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The user submitted whatever is in the input field.
    Submit(String),
}

/// Pure reducer: compute the next state for `action`.
///
/// Submissions are trimmed; an empty result leaves the state unchanged.
pub fn reduce(state: &State, action: Action) -> State {
    match action {
        Action::Submit(text) => {
            let text = text.trim();
            if text.is_empty() {
                state.clone()
            } else {
                state.append(Message::new(text))
            }
        }
    }
}

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("no element with id `{id}`")]
    NotFound { id: String },

    #[error("{op}: node is not an element")]
    NotAnElement { op: &'static str },

    #[error("node is not an input element")]
    NotAnInput,

    /// The node handle no longer refers to a live node.
    #[error("stale node handle")]
    StaleNode,

    /// The host DOM raised an exception.
    #[error("host dom: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, DomError>;

//! Error types shared by the engine and its hosts.

use thiserror::Error;

/// Everything that can go wrong while attaching, dragging or committing.
#[derive(Debug, Error)]
pub enum ReorderError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The sensing library could not be attached to a region.
    #[error("sensing library unavailable: {0}")]
    SensorUnavailable(String),

    #[error("container has no reorderable items")]
    EmptyContainer,

    #[error("clone rendering failed: {0}")]
    Clone(#[from] CloneError),

    #[error("order persistence failed: {0}")]
    Persist(#[from] PersistError),
}

/// Measurement or rendering failure while building the floating clone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CloneError(pub String);

impl CloneError {
    pub fn new(message: impl Into<String>) -> Self {
        CloneError(message.into())
    }
}

/// Returned by an [`OrderStore`](crate::OrderStore) that failed to save.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PersistError(pub String);

impl PersistError {
    pub fn new(message: impl Into<String>) -> Self {
        PersistError(message.into())
    }
}

/// Returned by a [`ReorderFlag`](crate::ReorderFlag) listener.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        ListenerError(message.into())
    }
}

pub type Result<T, E = ReorderError> = std::result::Result<T, E>;

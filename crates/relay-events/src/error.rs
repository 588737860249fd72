//! Event system error types

use thiserror::Error;

/// Event system error types
#[derive(Error, Debug)]
pub enum EventError {
    /// Namespace string reduced to zero usable segments
    #[error("Invalid namespace {raw:?}: {reason}")]
    InvalidNamespace {
        /// The raw namespace string as the caller supplied it
        raw: String,
        /// What made it unusable
        reason: String,
    },

    /// A handler raised a fault during emission
    ///
    /// One faulting handler aborts the entire emission; no later handler
    /// in the chain runs.
    #[error("Handler failed while emitting {namespace:?}: {source}")]
    HandlerFailed {
        /// The namespace being emitted when the handler faulted
        namespace: String,
        /// The fault the handler returned
        #[source]
        source: anyhow::Error,
    },
}

impl EventError {
    /// Create an invalid-namespace error
    pub fn invalid_namespace(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNamespace {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Create a handler-failure error
    pub fn handler_failed(namespace: impl Into<String>, source: anyhow::Error) -> Self {
        Self::HandlerFailed {
            namespace: namespace.into(),
            source,
        }
    }
}

/// Event result type
pub type EventResult<T> = Result<T, EventError>;

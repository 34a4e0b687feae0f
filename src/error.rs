//! Error types for dynstyle operations.

use thiserror::Error;

use crate::manager::ManagerId;

/// Boxed error returned by computed style producers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while generating or injecting styles.
#[derive(Error, Debug)]
pub enum Error {
    #[error("style producer failed: {0}")]
    Producer(#[source] BoxError),

    #[error("property `{0}` has no selector; unscoped styles need a selector block")]
    RootProperty(String),

    #[error("`scoped` must be a boolean, found {0}")]
    InvalidScopedFlag(String),

    #[error("style manager {0} has been destroyed")]
    Destroyed(ManagerId),

    #[error("host error: {0}")]
    Host(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

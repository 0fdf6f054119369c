use thiserror::Error;

use crate::node_ref::ElementId;

/// Misuse of a hook's own API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HookError {
    #[error("index {index} is out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A platform facility refused or failed a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("element {0:?} is not mounted")]
    NotMounted(ElementId),
    #[error("fullscreen request rejected: {0}")]
    Fullscreen(String),
    #[error("notification failed: {0}")]
    Notification(String),
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

/// Why a GET did not produce a JSON body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server answered with status {status}")]
    Status { status: u16 },
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

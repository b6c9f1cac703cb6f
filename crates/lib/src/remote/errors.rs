//! Transport-level error type owned by the remote collaborator.

use thiserror::Error;

/// A failed transport request against a named resource.
///
/// The core never produces this error; transports raise it, and the
/// lifecycle verbs in [`Remote`](super::Remote) catch it and degrade to
/// their documented defaults.
#[derive(Debug, Error)]
#[error("transport request for '{resource}' failed: {message}")]
pub struct TransportError {
    /// The resource the failing request was addressed to
    pub resource: String,
    /// Human-readable failure description
    pub message: String,
    /// Protocol status code, when the transport has one
    pub status: Option<u16>,
}

impl TransportError {
    /// Creates a new transport error for a resource
    pub fn new(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Attaches a protocol status code
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl From<TransportError> for crate::Error {
    fn from(err: TransportError) -> Self {
        crate::Error::Transport(err)
    }
}

//! Error taxonomy for the inspection client

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the inspection client.
///
/// Nothing is retried internally; every error reaches the immediate caller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed request or endpoint
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The endpoint did not become ready before the deadline
    #[error("timed out after {timeout:?} waiting for {endpoint} to become ready")]
    ConnectionTimeout {
        /// Endpoint that was being opened
        endpoint: String,
        /// Readiness deadline that elapsed
        timeout: Duration,
    },
    /// Operation attempted while the client is not ready
    #[error("client is not connected")]
    NotConnected,
    /// Connection lost, closed, or silent during a call
    #[error("transport error: {0}")]
    Transport(String),
    /// Application-level failure reported by the service, passed through as received
    #[error("remote error: {0}")]
    Remote(Box<tonic::Status>),
    /// Another call is already in flight on this client
    #[error("client is busy with another call")]
    ClientBusy,
}

impl ClientError {
    /// Classify a status returned by a call.
    ///
    /// Statuses decoded from the peer never carry a local error source, so a
    /// source means the failure happened in our own transport stack.
    pub(crate) fn from_status(status: tonic::Status) -> Self {
        if std::error::Error::source(&status).is_some() {
            ClientError::Transport(status.message().to_string())
        } else {
            ClientError::Remote(Box::new(status))
        }
    }
}

//! Transport connection with a bounded readiness wait.

use std::time::Duration;

use tokio::time::Instant;
use tonic::transport::{Channel, Endpoint};

use crate::error::ClientError;

const INITIAL_BACKOFF: Duration = Duration::from_millis(50);
const MAX_BACKOFF: Duration = Duration::from_secs(1);
// Stand-in deadline for timeouts too large to add to the current instant
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// A ready transport link to one inspection endpoint.
///
/// Dropping the connection releases the transport, as does [`Connection::close`].
#[derive(Debug)]
pub struct Connection {
    endpoint: String,
    channel: Option<Channel>,
}

impl Connection {
    /// Connect to `host:port`, waiting at most `timeout` for it to become ready.
    ///
    /// Refused or failed attempts are repeated with backoff until the deadline;
    /// after that the open fails with [`ClientError::ConnectionTimeout`]. The
    /// caller decides whether to try again.
    pub async fn open(host: &str, port: u16, timeout: Duration) -> Result<Self, ClientError> {
        let uri = endpoint_uri(host, port);
        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| ClientError::InvalidArgument(format!("invalid endpoint {uri}: {e}")))?;

        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0u32;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!("{} not ready after {:?}", uri, timeout);
                return Err(ClientError::ConnectionTimeout {
                    endpoint: uri,
                    timeout,
                });
            }

            attempt += 1;
            tracing::debug!("Connecting to {} (attempt {})", uri, attempt);
            let bounded = endpoint.clone().connect_timeout(remaining);
            match tokio::time::timeout(remaining, bounded.connect()).await {
                Ok(Ok(channel)) => {
                    tracing::info!("Connected to {}", uri);
                    return Ok(Self {
                        endpoint: uri,
                        channel: Some(channel),
                    });
                }
                Ok(Err(e)) => {
                    tracing::debug!("Connection attempt to {} failed: {}", uri, e);
                }
                Err(_) => continue,
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            tokio::time::sleep(backoff.min(remaining)).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    /// The `http://host:port` URI this connection targets.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether the transport is still held.
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// A handle for issuing calls, if the connection is open.
    pub(crate) fn channel(&self) -> Option<Channel> {
        self.channel.clone()
    }

    /// Release the transport. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.channel.take().is_some() {
            tracing::info!("Closed connection to {}", self.endpoint);
        }
    }
}

fn endpoint_uri(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{host}]:{port}")
    } else {
        format!("http://{host}:{port}")
    }
}

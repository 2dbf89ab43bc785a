//! The inspection client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::ClientError;
use crate::model::{Code, InspectionResult};
use crate::proto::{self, code_inspection_service_client::CodeInspectionServiceClient};

/// Observable lifecycle state of a constructed client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Connected and accepting calls
    Ready,
    /// Closed; every further call fails with [`ClientError::NotConnected`]
    Closed,
}

/// Client for the remote `inspect` procedure.
///
/// Owns exactly one connection, opened on construction. Calls are strictly
/// sequential: a second [`inspect`](Self::inspect) while one is in flight
/// fails with [`ClientError::ClientBusy`]. The client can be shared through an
/// `Arc` so another task may [`close`](Self::close) it mid-call.
#[derive(Debug)]
pub struct InspectionClient {
    endpoint: String,
    request_timeout: Option<Duration>,
    connection: Mutex<Connection>,
    in_flight: AtomicBool,
    closed: watch::Sender<bool>,
}

impl InspectionClient {
    /// Connect to the service described by `config`.
    ///
    /// Fails with [`ClientError::ConnectionTimeout`] if the endpoint is not
    /// ready within `config.connect_timeout`; no client exists in that case.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let connection =
            Connection::open(&config.host, config.port, config.connect_timeout).await?;
        let (closed, _) = watch::channel(false);

        Ok(Self {
            endpoint: connection.endpoint().to_string(),
            request_timeout: config.request_timeout,
            connection: Mutex::new(connection),
            in_flight: AtomicBool::new(false),
            closed,
        })
    }

    /// The URI of the service this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClientState {
        if self.lock_connection().is_open() {
            ClientState::Ready
        } else {
            ClientState::Closed
        }
    }

    /// Submit `code` for inspection and wait for the service's diagnostics.
    pub async fn inspect(&self, code: Code) -> Result<InspectionResult, ClientError> {
        // Subscribe before checking the state so a concurrent close is never missed.
        let mut closed = self.closed.subscribe();
        let channel = self
            .lock_connection()
            .channel()
            .ok_or(ClientError::NotConnected)?;
        let _call = CallGuard::acquire(&self.in_flight)?;

        tracing::debug!(
            "Inspecting {} bytes of {} code on {}",
            code.text().len(),
            code.language_id(),
            self.endpoint
        );

        let request = proto::Code::from(code);
        let mut stub = CodeInspectionServiceClient::new(channel);
        let call = async {
            let rpc = stub.inspect(request);
            let response = match self.request_timeout {
                Some(limit) => tokio::time::timeout(limit, rpc).await.map_err(|_| {
                    ClientError::Transport(format!("no response within {limit:?}"))
                })?,
                None => rpc.await,
            };
            response.map_err(ClientError::from_status)
        };

        let response = tokio::select! {
            res = call => res?,
            _ = closed.wait_for(|closed| *closed) => {
                return Err(ClientError::Transport(
                    "connection closed during call".to_string(),
                ));
            }
        };

        let result = InspectionResult::from(response.into_inner());
        tracing::debug!("Received {} problems", result.problems.len());
        Ok(result)
    }

    /// Close the connection, failing any in-flight call. Idempotent.
    pub fn close(&self) {
        self.lock_connection().close();
        self.closed.send_replace(true);
    }

    fn lock_connection(&self) -> MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks a call as in flight until dropped.
struct CallGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> CallGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ClientError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::ClientBusy)?;
        Ok(Self { flag })
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

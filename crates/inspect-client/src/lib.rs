//! Code Inspection Client
//!
//! A gRPC client for a remote code inspection service. Callers build a
//! [`Code`] value (source text plus a [`LanguageId`]), hand it to an
//! [`InspectionClient`], and get back the service's [`InspectionResult`].
//!
//! # Lifecycle
//!
//! ```text
//! connect(config) ──> Connecting ──ready──> Ready ──close()──> Closed
//!                          │                  │
//!                       deadline           inspect(code)
//!                          v                  │
//!                  ConnectionTimeout          v
//!                                     InspectionResult | ClientError
//! ```
//!
//! The client never retries: a connection that is not ready within the
//! configured deadline fails construction with
//! [`ClientError::ConnectionTimeout`], and call failures are returned to the
//! caller as they happen.
//!
//! # Example
//!
//! ```no_run
//! use inspect_client::{ClientConfig, Code, InspectionClient, LanguageId};
//!
//! # async fn run() -> Result<(), inspect_client::ClientError> {
//! let client = InspectionClient::connect(ClientConfig::new("localhost", 8080)).await?;
//! let result = client
//!     .inspect(Code::new("print(1, 2, 3)", LanguageId::Python))
//!     .await?;
//! for problem in &result.problems {
//!     println!("{}: {}", problem.line_number, problem.name);
//! }
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod proto {
    #![allow(missing_docs)]
    #![allow(clippy::doc_markdown)]
    tonic::include_proto!("org.jetbrains.research.ij.headless.server");
}

mod client;
mod config;
mod connection;
mod error;
mod model;

pub use client::{ClientState, InspectionClient};
pub use config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT};
pub use connection::Connection;
pub use error::ClientError;
pub use model::{Code, InspectionResult, LanguageId, Problem};

// Re-export proto service types for hosting stub services
pub use proto::code_inspection_service_server::{
    CodeInspectionService, CodeInspectionServiceServer,
};

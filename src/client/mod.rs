// Copyright (c) 2025 - Cowboy AI, Inc.
//! Fabric Client
//!
//! Read-only access to an APIC. The [`FabricClient`] trait is the seam the
//! collector works against:
//!
//! ```text
//! FabricClient ──get(class query)──> JSON ──decode──> RawSnapshot
//! ```
//!
//! [`ApicClient`] is the REST implementation (feature `apic`). Tests drive
//! the collector with an in-memory client instead.

use async_trait::async_trait;
use thiserror::Error;

pub mod collect;

#[cfg(feature = "apic")]
pub mod apic;

#[cfg(feature = "apic")]
pub use apic::ApicClient;
pub use collect::{collect_snapshot, CollectError, CollectResult, ManagedObject};

/// Transport-level failures talking to a controller
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Authentication rejected (status {0})")]
    Authentication(u16),

    #[error("Request {path} returned status {status}")]
    Status { status: u16, path: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Client configuration error: {0}")]
    Configuration(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Read-only session against one fabric controller
#[async_trait]
pub trait FabricClient: Send + Sync {
    /// Open a session; must succeed before any `get`
    async fn login(&mut self) -> ClientResult<()>;

    /// GET an API path (relative to `/api`) and return the JSON body
    async fn get(&self, path: &str) -> ClientResult<serde_json::Value>;

    /// Client name for logs
    fn name(&self) -> &str;
}

// Network Config - Network Service
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! The network service consumed by edit sessions.
//!
//! Sessions receive the service as an injected collaborator:
//! - [`DbusNetworkService`]: talks to the system network daemon over D-Bus
//! - [`MemoryNetworkService`]: in-process service for offline use and tests

pub mod dbus;
pub mod memory;

use async_trait::async_trait;

use crate::models::{
    CertificateLists, ConfigProperties, GlobalPolicy, ManagedProperties, Result, StartConnectResult,
};

pub use dbus::DbusNetworkService;
pub use memory::MemoryNetworkService;

/// Response to a create request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateResponse {
    /// Identifier of the new network; `None` when creation failed.
    pub guid: Option<String>,
    pub error_message: String,
}

/// Response to an update request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateResponse {
    pub success: bool,
    pub error_message: String,
}

/// Response to a connect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectResponse {
    pub result: StartConnectResult,
    pub message: String,
}

impl ConnectResponse {
    pub fn new(result: StartConnectResult, message: impl Into<String>) -> Self {
        Self {
            result,
            message: message.into(),
        }
    }
}

/// Request/response network service.
///
/// `Err` is reserved for transport failures; service-level failures are
/// reported inside the response values.
#[async_trait]
pub trait NetworkService: Send + Sync {
    /// Managed properties of a configured network; `None` if it does not exist.
    async fn fetch_managed_properties(&self, guid: &str) -> Result<Option<ManagedProperties>>;

    /// Installed server CA and user certificates.
    async fn fetch_certificates(&self) -> Result<CertificateLists>;

    async fn fetch_global_policy(&self) -> Result<GlobalPolicy>;

    /// Create a network, shared with all users when `shared` is set.
    async fn create_network(&self, config: &ConfigProperties, shared: bool) -> Result<CreateResponse>;

    async fn update_network(&self, guid: &str, config: &ConfigProperties) -> Result<UpdateResponse>;

    async fn start_connect(&self, guid: &str) -> Result<ConnectResponse>;
}

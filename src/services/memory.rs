// Network Config - In-Memory Network Service
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! In-process network service.
//!
//! Serves snapshots and certificates loaded up front and records every
//! submission, so sessions can run without a network daemon. Failures and
//! connect results can be scripted.
//!
//! State lives behind a Mutex. Lock poisoning is recovered the same way the
//! settings store does it.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ConnectResponse, CreateResponse, NetworkService, UpdateResponse};
use crate::models::{
    CertificateLists, ConfigProperties, ConnectionState, GlobalPolicy, ManagedProperties, Result,
    Source, StartConnectResult,
};

/// A recorded create request.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedNetwork {
    pub guid: String,
    pub config: ConfigProperties,
    pub shared: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    networks: HashMap<String, ManagedProperties>,
    certificates: CertificateLists,
    policy: GlobalPolicy,
    created: Vec<CreatedNetwork>,
    updated: Vec<(String, ConfigProperties)>,
    connect_requests: Vec<String>,
    connect_results: VecDeque<ConnectResponse>,
    create_failure: Option<String>,
    update_failure: Option<String>,
}

/// Network service backed by in-memory state.
#[derive(Debug, Default)]
pub struct MemoryNetworkService {
    state: Mutex<MemoryState>,
}

impl MemoryNetworkService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configured network. Ignored when the snapshot has no GUID.
    pub fn with_network(self, properties: ManagedProperties) -> Self {
        match properties.guid().map(str::to_string) {
            Some(guid) => {
                self.lock().networks.insert(guid, properties);
            }
            None => warn!("Ignoring managed properties without a GUID"),
        }
        self
    }

    pub fn with_certificates(self, certificates: CertificateLists) -> Self {
        self.lock().certificates = certificates;
        self
    }

    pub fn with_policy(self, policy: GlobalPolicy) -> Self {
        self.lock().policy = policy;
        self
    }

    /// Make the next create request fail with `message`.
    pub fn fail_next_create(&self, message: impl Into<String>) {
        self.lock().create_failure = Some(message.into());
    }

    /// Make the next update request fail with `message`.
    pub fn fail_next_update(&self, message: impl Into<String>) {
        self.lock().update_failure = Some(message.into());
    }

    /// Queue the response to a future connect request.
    pub fn push_connect_result(&self, result: StartConnectResult, message: impl Into<String>) {
        self.lock()
            .connect_results
            .push_back(ConnectResponse::new(result, message));
    }

    pub fn created(&self) -> Vec<CreatedNetwork> {
        self.lock().created.clone()
    }

    pub fn updated(&self) -> Vec<(String, ConfigProperties)> {
        self.lock().updated.clone()
    }

    pub fn connect_requests(&self) -> Vec<String> {
        self.lock().connect_requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Mutex poisoned in memory network service, recovering");
                poisoned.into_inner()
            }
        }
    }
}

#[async_trait]
impl NetworkService for MemoryNetworkService {
    async fn fetch_managed_properties(&self, guid: &str) -> Result<Option<ManagedProperties>> {
        Ok(self.lock().networks.get(guid).cloned())
    }

    async fn fetch_certificates(&self) -> Result<CertificateLists> {
        Ok(self.lock().certificates.clone())
    }

    async fn fetch_global_policy(&self) -> Result<GlobalPolicy> {
        Ok(self.lock().policy)
    }

    async fn create_network(&self, config: &ConfigProperties, shared: bool) -> Result<CreateResponse> {
        let mut state = self.lock();
        if let Some(error_message) = state.create_failure.take() {
            debug!("Scripted create failure: {}", error_message);
            return Ok(CreateResponse {
                guid: None,
                error_message,
            });
        }

        let guid = Uuid::new_v4().to_string();
        info!("Created {} network {}", config.network_type(), guid);

        let mut snapshot = ManagedProperties::new_network(config.network_type());
        snapshot.guid = Some(guid.clone());
        snapshot.source = if shared { Source::Device } else { Source::User };
        snapshot.connection_state = Some(ConnectionState::NotConnected);
        state.networks.insert(guid.clone(), snapshot);
        state.created.push(CreatedNetwork {
            guid: guid.clone(),
            config: config.clone(),
            shared,
        });

        Ok(CreateResponse {
            guid: Some(guid),
            error_message: String::new(),
        })
    }

    async fn update_network(&self, guid: &str, config: &ConfigProperties) -> Result<UpdateResponse> {
        let mut state = self.lock();
        if let Some(error_message) = state.update_failure.take() {
            debug!("Scripted update failure: {}", error_message);
            return Ok(UpdateResponse {
                success: false,
                error_message,
            });
        }
        if !state.networks.contains_key(guid) {
            return Ok(UpdateResponse {
                success: false,
                error_message: "Error.InvalidNetworkGuid".to_string(),
            });
        }
        state.updated.push((guid.to_string(), config.clone()));
        Ok(UpdateResponse {
            success: true,
            error_message: String::new(),
        })
    }

    async fn start_connect(&self, guid: &str) -> Result<ConnectResponse> {
        let mut state = self.lock();
        state.connect_requests.push(guid.to_string());
        if let Some(response) = state.connect_results.pop_front() {
            return Ok(response);
        }
        let response = if state.networks.contains_key(guid) {
            ConnectResponse::new(StartConnectResult::Success, "")
        } else {
            ConnectResponse::new(StartConnectResult::InvalidGuid, "")
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NetworkType, TypeConfig, WifiConfig};

    fn wifi_config() -> ConfigProperties {
        ConfigProperties::new("Home", TypeConfig::WiFi(WifiConfig::default()))
    }

    #[tokio::test]
    async fn test_create_registers_network() {
        let service = MemoryNetworkService::new();
        let response = service.create_network(&wifi_config(), true).await.unwrap();
        let guid = response.guid.unwrap();

        let snapshot = service.fetch_managed_properties(&guid).await.unwrap().unwrap();
        assert_eq!(snapshot.network_type, NetworkType::WiFi);
        assert_eq!(snapshot.source, Source::Device);
        assert_eq!(service.created().len(), 1);
        assert!(service.created()[0].shared);
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let service = MemoryNetworkService::new();
        service.fail_next_create("Error.AlreadyExists");
        let response = service.create_network(&wifi_config(), false).await.unwrap();
        assert_eq!(response.guid, None);
        assert_eq!(response.error_message, "Error.AlreadyExists");

        let response = service.update_network("missing", &wifi_config()).await.unwrap();
        assert!(!response.success);
    }

    #[tokio::test]
    async fn test_connect_results() {
        let service = MemoryNetworkService::new();
        let response = service.start_connect("missing").await.unwrap();
        assert_eq!(response.result, StartConnectResult::InvalidGuid);

        service.push_connect_result(StartConnectResult::OtherFailure, "connect-failed");
        let response = service.start_connect("missing").await.unwrap();
        assert_eq!(response.result, StartConnectResult::OtherFailure);
        assert_eq!(response.message, "connect-failed");
        assert_eq!(service.connect_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_network_is_none() {
        let service = MemoryNetworkService::new();
        assert!(service.fetch_managed_properties("nope").await.unwrap().is_none());
    }
}

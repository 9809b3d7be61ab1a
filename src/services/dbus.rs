// Network Config - D-Bus Network Service
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Async D-Bus client for the system network daemon.
//!
//! Structured values cross the bus as ONC JSON strings.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};
use zbus::Connection;

use super::{ConnectResponse, CreateResponse, NetworkService, UpdateResponse};
use crate::models::{
    AppConfig, CertificateLists, ConfigProperties, Error, GlobalPolicy, ManagedProperties, Result,
    StartConnectResult,
};

const NETWORKS_INTERFACE: &str = "com.chrisdaggas.NetworkConfig.Networks";
const CERTIFICATES_INTERFACE: &str = "com.chrisdaggas.NetworkConfig.Certificates";

/// D-Bus client for the network daemon.
#[derive(Clone)]
pub struct DbusNetworkService {
    connection: Arc<Connection>,
    service_name: String,
    object_path: String,
}

impl DbusNetworkService {
    /// Connect to the system bus using the configured service address.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        match Connection::system().await {
            Ok(conn) => {
                debug!("Connected to system D-Bus");
                Ok(Self {
                    connection: Arc::new(conn),
                    service_name: config.dbus_service_name.clone(),
                    object_path: config.dbus_object_path.clone(),
                })
            }
            Err(e) => {
                error!("Failed to connect to system D-Bus: {}", e);
                Err(Error::DbusConnectionFailed(e.to_string()))
            }
        }
    }

    async fn call<B, R>(&self, interface: &str, method: &str, body: &B) -> Result<R>
    where
        B: serde::Serialize + zbus::zvariant::DynamicType,
        R: for<'d> zbus::zvariant::DynamicDeserialize<'d>,
    {
        let reply = self
            .connection
            .call_method(
                Some(self.service_name.as_str()),
                self.object_path.as_str(),
                Some(interface),
                method,
                body,
            )
            .await?;
        let value = reply.body().deserialize()?;
        Ok(value)
    }
}

#[async_trait]
impl NetworkService for DbusNetworkService {
    async fn fetch_managed_properties(&self, guid: &str) -> Result<Option<ManagedProperties>> {
        let json: String = self
            .call(NETWORKS_INTERFACE, "GetManagedProperties", &(guid,))
            .await?;
        if json.is_empty() {
            debug!("No managed properties for {}", guid);
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&json)?))
    }

    async fn fetch_certificates(&self) -> Result<CertificateLists> {
        let json: String = self
            .call(CERTIFICATES_INTERFACE, "GetCertificateLists", &())
            .await?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn fetch_global_policy(&self) -> Result<GlobalPolicy> {
        let json: String = self.call(NETWORKS_INTERFACE, "GetGlobalPolicy", &()).await?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn create_network(&self, config: &ConfigProperties, shared: bool) -> Result<CreateResponse> {
        info!("Requesting creation of {} network (shared: {})", config.network_type(), shared);
        let json = serde_json::to_string(config)?;
        let (guid, error_message): (String, String) = self
            .call(NETWORKS_INTERFACE, "CreateNetwork", &(shared, json))
            .await?;
        Ok(CreateResponse {
            guid: Some(guid).filter(|g| !g.is_empty()),
            error_message,
        })
    }

    async fn update_network(&self, guid: &str, config: &ConfigProperties) -> Result<UpdateResponse> {
        info!("Requesting update of network {}", guid);
        let json = serde_json::to_string(config)?;
        let (success, error_message): (bool, String) = self
            .call(NETWORKS_INTERFACE, "SetProperties", &(guid, json))
            .await?;
        Ok(UpdateResponse {
            success,
            error_message,
        })
    }

    async fn start_connect(&self, guid: &str) -> Result<ConnectResponse> {
        info!("Requesting connection to {}", guid);
        let (result, message): (String, String) = self
            .call(NETWORKS_INTERFACE, "StartConnect", &(guid,))
            .await?;
        Ok(ConnectResponse {
            result: parse_connect_result(&result),
            message,
        })
    }
}

/// Map the daemon's result string; unknown values count as failures.
fn parse_connect_result(value: &str) -> StartConnectResult {
    match value {
        "success" => StartConnectResult::Success,
        "invalid-guid" => StartConnectResult::InvalidGuid,
        "invalid-state" => StartConnectResult::InvalidState,
        "canceled" => StartConnectResult::Canceled,
        _ => StartConnectResult::OtherFailure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connect_result() {
        assert_eq!(parse_connect_result("success"), StartConnectResult::Success);
        assert_eq!(parse_connect_result("invalid-state"), StartConnectResult::InvalidState);
        assert_eq!(parse_connect_result("bogus"), StartConnectResult::OtherFailure);
        for result in [
            StartConnectResult::Success,
            StartConnectResult::InvalidGuid,
            StartConnectResult::InvalidState,
            StartConnectResult::Canceled,
            StartConnectResult::OtherFailure,
        ] {
            assert_eq!(parse_connect_result(result.as_str()), result);
        }
    }
}

// Network Config - Managed Snapshot
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Read-only snapshot of a network's managed properties.
//!
//! Every field is wrapped in a [`ManagedValue`] carrying the active value
//! and the source that set it. A snapshot is created once per edit session:
//! synthesized for a new network, fetched from the network service for an
//! existing one.

use serde::{Deserialize, Serialize};

use super::network::{
    Authentication, ClientCertType, ConnectionState, EapInner, EapOuter,
    IpsecAuthenticationType, NetworkType, SecurityType, Source, UserAuthenticationType, VpnType,
};

/// Who set the effective value of a managed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicySource {
    UserSetting,
    SharedSetting,
    UserPolicy,
    DevicePolicy,
    ActiveExtension,
}

impl PolicySource {
    /// Policy-set values cannot be edited by the user.
    pub fn is_policy(&self) -> bool {
        matches!(self, Self::UserPolicy | Self::DevicePolicy | Self::ActiveExtension)
    }
}

/// An active value paired with the source that set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagedValue<T> {
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub active: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective: Option<PolicySource>,
}

impl<T> ManagedValue<T> {
    /// A user-set value.
    pub fn user(value: T) -> Self {
        Self {
            active: Some(value),
            effective: Some(PolicySource::UserSetting),
        }
    }

    /// A value enforced by device policy.
    pub fn device_policy(value: T) -> Self {
        Self {
            active: Some(value),
            effective: Some(PolicySource::DevicePolicy),
        }
    }

    /// Whether the value is enforced by policy.
    pub fn is_enforced(&self) -> bool {
        self.effective.map(|s| s.is_policy()).unwrap_or(false)
    }
}

/// Active value of an optional managed field.
pub fn active<T: Clone>(value: &Option<ManagedValue<T>>) -> Option<T> {
    value.as_ref().and_then(|v| v.active.clone())
}

/// Whether an optional managed field is enforced by policy.
pub fn is_enforced<T>(value: &Option<ManagedValue<T>>) -> bool {
    value.as_ref().map(|v| v.is_enforced()).unwrap_or(false)
}

/// Managed EAP block (WiFi, Ethernet, WiMAX).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManagedEap {
    pub outer: Option<ManagedValue<EapOuter>>,
    pub inner: Option<ManagedValue<EapInner>>,
    pub identity: Option<ManagedValue<String>>,
    pub password: Option<ManagedValue<String>>,
    pub anonymous_identity: Option<ManagedValue<String>>,
    pub subject_match: Option<ManagedValue<String>>,
    #[serde(rename = "ServerCAPEMs")]
    pub server_ca_pems: Option<ManagedValue<Vec<String>>>,
    pub client_cert_type: Option<ManagedValue<ClientCertType>>,
    #[serde(rename = "ClientCertPKCS11Id")]
    pub client_cert_pkcs11_id: Option<ManagedValue<String>>,
    pub save_credentials: Option<ManagedValue<bool>>,
    #[serde(rename = "UseSystemCAs")]
    pub use_system_cas: Option<ManagedValue<bool>>,
}

/// Managed WiFi properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManagedWifi {
    pub auto_connect: Option<ManagedValue<bool>>,
    pub passphrase: Option<ManagedValue<String>>,
    #[serde(rename = "SSID")]
    pub ssid: Option<ManagedValue<String>>,
    pub security: Option<ManagedValue<SecurityType>>,
    #[serde(rename = "EAP")]
    pub eap: Option<ManagedEap>,
}

/// Managed Ethernet properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManagedEthernet {
    pub auto_connect: Option<ManagedValue<bool>>,
    pub authentication: Option<ManagedValue<Authentication>>,
    #[serde(rename = "EAP")]
    pub eap: Option<ManagedEap>,
}

/// Managed WiMAX properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManagedWimax {
    pub auto_connect: Option<ManagedValue<bool>>,
    #[serde(rename = "EAP")]
    pub eap: Option<ManagedEap>,
}

/// Managed IPsec properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManagedIpsec {
    pub authentication_type: Option<ManagedValue<IpsecAuthenticationType>>,
    #[serde(rename = "IKEVersion")]
    pub ike_version: Option<ManagedValue<u32>>,
    #[serde(rename = "PSK")]
    pub psk: Option<ManagedValue<String>>,
    #[serde(rename = "ServerCAPEMs")]
    pub server_ca_pems: Option<ManagedValue<Vec<String>>>,
    #[serde(rename = "ServerCARefs")]
    pub server_ca_refs: Option<ManagedValue<Vec<String>>>,
    pub client_cert_type: Option<ManagedValue<ClientCertType>>,
    #[serde(rename = "ClientCertPKCS11Id")]
    pub client_cert_pkcs11_id: Option<ManagedValue<String>>,
    pub save_credentials: Option<ManagedValue<bool>>,
}

/// Managed L2TP properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManagedL2tp {
    pub username: Option<ManagedValue<String>>,
    pub password: Option<ManagedValue<String>>,
    pub save_credentials: Option<ManagedValue<bool>>,
}

/// Managed OpenVPN properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManagedOpenVpn {
    pub username: Option<ManagedValue<String>>,
    pub password: Option<ManagedValue<String>>,
    #[serde(rename = "OTP")]
    pub otp: Option<ManagedValue<String>>,
    #[serde(rename = "ServerCAPEMs")]
    pub server_ca_pems: Option<ManagedValue<Vec<String>>>,
    #[serde(rename = "ServerCARefs")]
    pub server_ca_refs: Option<ManagedValue<Vec<String>>>,
    pub client_cert_type: Option<ManagedValue<ClientCertType>>,
    #[serde(rename = "ClientCertPKCS11Id")]
    pub client_cert_pkcs11_id: Option<ManagedValue<String>>,
    pub user_authentication_type: Option<ManagedValue<UserAuthenticationType>>,
    pub save_credentials: Option<ManagedValue<bool>>,
}

/// Managed VPN properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManagedVpn {
    pub host: Option<ManagedValue<String>>,
    #[serde(rename = "Type")]
    pub vpn_type: Option<ManagedValue<VpnType>>,
    #[serde(rename = "IPsec")]
    pub ipsec: Option<ManagedIpsec>,
    #[serde(rename = "L2TP")]
    pub l2tp: Option<ManagedL2tp>,
    #[serde(rename = "OpenVPN")]
    pub openvpn: Option<ManagedOpenVpn>,
}

impl ManagedVpn {
    /// The single "save credentials" flag shown for every VPN type.
    pub fn save_credentials(&self) -> bool {
        let openvpn = self.openvpn.as_ref().and_then(|o| active(&o.save_credentials));
        let ipsec = self.ipsec.as_ref().and_then(|i| active(&i.save_credentials));
        let l2tp = self.l2tp.as_ref().and_then(|l| active(&l.save_credentials));
        openvpn.unwrap_or(false) || ipsec.unwrap_or(false) || l2tp.unwrap_or(false)
    }

    /// Policy-enforced server CA references, from whichever VPN block has them.
    pub fn server_ca_refs(&self) -> Option<&ManagedValue<Vec<String>>> {
        self.openvpn
            .as_ref()
            .and_then(|o| o.server_ca_refs.as_ref())
            .or_else(|| self.ipsec.as_ref().and_then(|i| i.server_ca_refs.as_ref()))
    }
}

/// Snapshot of a network's managed properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagedProperties {
    /// Network identifier; empty or absent for a network not yet configured.
    #[serde(rename = "GUID", default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(rename = "Type")]
    pub network_type: NetworkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<ManagedValue<String>>,
    #[serde(default)]
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_state: Option<ConnectionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_state: Option<String>,
    #[serde(rename = "WiFi", default, skip_serializing_if = "Option::is_none")]
    pub wifi: Option<ManagedWifi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet: Option<ManagedEthernet>,
    #[serde(rename = "WiMAX", default, skip_serializing_if = "Option::is_none")]
    pub wimax: Option<ManagedWimax>,
    #[serde(rename = "VPN", default, skip_serializing_if = "Option::is_none")]
    pub vpn: Option<ManagedVpn>,
}

impl ManagedProperties {
    /// Synthesized snapshot for a network that does not exist yet.
    pub fn new_network(network_type: NetworkType) -> Self {
        Self {
            guid: None,
            network_type,
            name: None,
            source: Source::None,
            connection_state: None,
            error_state: None,
            wifi: None,
            ethernet: None,
            wimax: None,
            vpn: None,
        }
    }

    /// Non-empty network identifier, if any.
    pub fn guid(&self) -> Option<&str> {
        self.guid.as_deref().filter(|g| !g.is_empty())
    }

    /// The managed EAP block for the snapshot's type.
    pub fn eap(&self) -> Option<&ManagedEap> {
        match self.network_type {
            NetworkType::WiFi => self.wifi.as_ref().and_then(|w| w.eap.as_ref()),
            NetworkType::Ethernet => self.ethernet.as_ref().and_then(|e| e.eap.as_ref()),
            NetworkType::WiMax => self.wimax.as_ref().and_then(|w| w.eap.as_ref()),
            NetworkType::Vpn => None,
        }
    }

    /// Whether the security selection is locked by policy.
    pub fn security_is_enforced(&self) -> bool {
        match self.network_type {
            NetworkType::WiFi => self.wifi.as_ref().map(|w| is_enforced(&w.security)).unwrap_or(false),
            NetworkType::Ethernet => self
                .ethernet
                .as_ref()
                .map(|e| is_enforced(&e.authentication))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Whether the VPN "save credentials" flag is locked by policy.
    pub fn vpn_save_credentials_is_enforced(&self) -> bool {
        let Some(vpn) = self.vpn.as_ref() else {
            return false;
        };
        vpn.openvpn.as_ref().map(|o| is_enforced(&o.save_credentials)).unwrap_or(false)
            || vpn.ipsec.as_ref().map(|i| is_enforced(&i.save_credentials)).unwrap_or(false)
            || vpn.l2tp.as_ref().map(|l| is_enforced(&l.save_credentials)).unwrap_or(false)
    }
}

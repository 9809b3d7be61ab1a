// Network Config - Network Types
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Enumerations shared by managed snapshots, working configuration and
//! submission payloads.
//!
//! Wire names follow ONC (Open Network Configuration) spelling so that the
//! serialized payload can be handed to the network service unchanged.

use serde::{Deserialize, Serialize};

/// Kind of network being configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkType {
    Ethernet,
    #[serde(rename = "VPN")]
    Vpn,
    #[serde(rename = "WiFi")]
    WiFi,
    #[serde(rename = "WiMAX")]
    WiMax,
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethernet => "Ethernet",
            Self::Vpn => "VPN",
            Self::WiFi => "WiFi",
            Self::WiMax => "WiMAX",
        }
    }

    /// Whether EAP settings can apply to this type.
    pub fn supports_eap(&self) -> bool {
        !matches!(self, Self::Vpn)
    }
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Security selection for WiFi and Ethernet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SecurityType {
    #[default]
    None,
    #[serde(rename = "WEP-PSK")]
    WepPsk,
    #[serde(rename = "WPA-PSK")]
    WpaPsk,
    #[serde(rename = "WPA-EAP")]
    WpaEap,
}

impl SecurityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::WepPsk => "WEP-PSK",
            Self::WpaPsk => "WPA-PSK",
            Self::WpaEap => "WPA-EAP",
        }
    }

    /// Pre-shared key types carry a WiFi passphrase.
    pub fn requires_passphrase(&self) -> bool {
        matches!(self, Self::WepPsk | Self::WpaPsk)
    }
}

/// Ethernet `Authentication` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Authentication {
    #[default]
    None,
    #[serde(rename = "8021X")]
    Ieee8021X,
}

impl Authentication {
    /// Ethernet authentication is a pure function of the security selection.
    pub fn for_security(security: SecurityType) -> Self {
        if security == SecurityType::WpaEap {
            Self::Ieee8021X
        } else {
            Self::None
        }
    }
}

/// Wire value of `VPN.Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VpnType {
    #[default]
    #[serde(rename = "L2TP-IPsec")]
    L2tpIpsec,
    #[serde(rename = "OpenVPN")]
    OpenVpn,
}

/// Wire value of `VPN.IPsec.AuthenticationType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IpsecAuthenticationType {
    #[default]
    #[serde(rename = "PSK")]
    Psk,
    Cert,
}

/// Composite VPN selection: `VPN.Type` combined with the IPsec
/// authentication type. Never sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VpnConfigType {
    #[serde(rename = "L2TP_IPsec_PSK")]
    L2tpIpsecPsk,
    #[serde(rename = "L2TP_IPsec_Cert")]
    L2tpIpsecCert,
    #[serde(rename = "OpenVPN")]
    OpenVpn,
}

impl VpnConfigType {
    /// All selectable VPN types, in display order.
    pub const ALL: [VpnConfigType; 3] = [Self::L2tpIpsecPsk, Self::L2tpIpsecCert, Self::OpenVpn];

    pub fn vpn_type(&self) -> VpnType {
        match self {
            Self::L2tpIpsecPsk | Self::L2tpIpsecCert => VpnType::L2tpIpsec,
            Self::OpenVpn => VpnType::OpenVpn,
        }
    }

    pub fn is_open_vpn(&self) -> bool {
        matches!(self, Self::OpenVpn)
    }
}

/// EAP outer method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EapOuter {
    #[serde(rename = "LEAP")]
    Leap,
    #[serde(rename = "PEAP")]
    Peap,
    #[serde(rename = "EAP-TLS")]
    EapTls,
    #[serde(rename = "EAP-TTLS")]
    EapTtls,
}

impl EapOuter {
    /// Outer methods offered for selection.
    pub const ALL: [EapOuter; 4] = [Self::Leap, Self::Peap, Self::EapTls, Self::EapTtls];

    /// Valid inner (phase 2) methods; the first entry is the default.
    pub fn inner_items(&self) -> &'static [EapInner] {
        match self {
            Self::Peap => &[EapInner::Automatic, EapInner::Md5, EapInner::MschapV2],
            Self::EapTtls => &[
                EapInner::Automatic,
                EapInner::Md5,
                EapInner::Mschap,
                EapInner::MschapV2,
                EapInner::Pap,
                EapInner::Chap,
                EapInner::Gtc,
            ],
            Self::Leap | Self::EapTls => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leap => "LEAP",
            Self::Peap => "PEAP",
            Self::EapTls => "EAP-TLS",
            Self::EapTtls => "EAP-TTLS",
        }
    }
}

/// EAP inner (phase 2) method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EapInner {
    Automatic,
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "MSCHAP")]
    Mschap,
    #[serde(rename = "MSCHAPv2")]
    MschapV2,
    #[serde(rename = "PAP")]
    Pap,
    #[serde(rename = "CHAP")]
    Chap,
    #[serde(rename = "GTC")]
    Gtc,
}

/// How a client certificate is referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClientCertType {
    #[default]
    None,
    #[serde(rename = "PKCS11Id")]
    Pkcs11Id,
    Ref,
    Pattern,
}

/// OpenVPN user authentication, derived from the credentials present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserAuthenticationType {
    #[default]
    None,
    Password,
    #[serde(rename = "OTP")]
    Otp,
    #[serde(rename = "PasswordAndOTP")]
    PasswordAndOtp,
}

impl UserAuthenticationType {
    pub fn from_credentials(has_password: bool, has_otp: bool) -> Self {
        match (has_password, has_otp) {
            (true, true) => Self::PasswordAndOtp,
            (true, false) => Self::Password,
            (false, true) => Self::Otp,
            (false, false) => Self::None,
        }
    }
}

/// Where a configured network comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Source {
    /// Not configured yet (new network).
    #[default]
    None,
    User,
    Device,
    UserPolicy,
    DevicePolicy,
}

impl Source {
    /// Device-level configurations are visible to every user.
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Device | Self::DevicePolicy)
    }
}

/// Connection state reported with a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConnectionState {
    Connected,
    Connecting,
    #[default]
    NotConnected,
}

/// Result of a `startConnect` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartConnectResult {
    Success,
    InvalidGuid,
    InvalidState,
    Canceled,
    OtherFailure,
}

impl StartConnectResult {
    /// Results after which the session is finished: the connection is
    /// in progress, already established, or was canceled by the user.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::InvalidState | Self::Canceled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InvalidGuid => "invalid-guid",
            Self::InvalidState => "invalid-state",
            Self::Canceled => "canceled",
            Self::OtherFailure => "other-failure",
        }
    }
}

impl std::fmt::Display for StartConnectResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

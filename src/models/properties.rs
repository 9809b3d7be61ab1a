// Network Config - Configuration Properties
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Mutable working configuration for a network.
//!
//! Exactly one type-specific block is populated, selected by the network
//! type. VPN settings are a tagged union: an L2TP/IPsec configuration owns
//! its `IPsec` and `L2TP` blocks, an OpenVPN configuration owns its
//! `OpenVPN` block, and the two never coexist.
//!
//! Serialization produces ONC-shaped JSON (`{"Type": "WiFi", "WiFi": {..}}`)
//! which is what the network service consumes.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use zeroize::Zeroize;

use super::network::{
    Authentication, ClientCertType, EapInner, EapOuter, IpsecAuthenticationType, NetworkType,
    SecurityType, UserAuthenticationType, VpnConfigType, VpnType,
};

/// IKE version forced for L2TP/IPsec submissions.
pub const IKE_VERSION_L2TP: u32 = 1;

/// EAP settings for WiFi, Ethernet and WiMAX.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EapConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer: Option<EapOuter>,
    /// Only meaningful for PEAP and EAP-TTLS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner: Option<EapInner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_match: Option<String>,
    #[serde(rename = "ServerCAPEMs")]
    pub server_ca_pems: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_cert_type: Option<ClientCertType>,
    #[serde(rename = "ClientCertPKCS11Id", skip_serializing_if = "Option::is_none")]
    pub client_cert_pkcs11_id: Option<String>,
    pub save_credentials: bool,
    #[serde(rename = "UseSystemCAs", skip_serializing_if = "Option::is_none")]
    pub use_system_cas: Option<bool>,
}

impl EapConfig {
    /// First stored server CA PEM, if any.
    pub fn server_ca_pem(&self) -> Option<&str> {
        self.server_ca_pems.first().map(String::as_str).filter(|p| !p.is_empty())
    }

    /// Stored PKCS#11 id when the client certificate is referenced by id.
    pub fn pkcs11_id(&self) -> Option<&str> {
        pkcs11_reference(self.client_cert_type, self.client_cert_pkcs11_id.as_deref())
    }

    fn zeroize_credentials(&mut self) {
        if let Some(password) = self.password.as_mut() {
            password.zeroize();
        }
    }
}

/// WiFi settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WifiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_connect: Option<bool>,
    #[serde(rename = "SSID")]
    pub ssid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    pub security: SecurityType,
    #[serde(rename = "EAP", skip_serializing_if = "Option::is_none")]
    pub eap: Option<EapConfig>,
}

/// Ethernet settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EthernetConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_connect: Option<bool>,
    pub authentication: Authentication,
    #[serde(rename = "EAP", skip_serializing_if = "Option::is_none")]
    pub eap: Option<EapConfig>,
}

/// WiMAX settings. EAP carries identity and password only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WimaxConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_connect: Option<bool>,
    #[serde(rename = "EAP", skip_serializing_if = "Option::is_none")]
    pub eap: Option<EapConfig>,
}

/// IPsec settings of an L2TP/IPsec VPN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IpsecConfig {
    pub authentication_type: IpsecAuthenticationType,
    #[serde(rename = "IKEVersion")]
    pub ike_version: u32,
    #[serde(rename = "PSK", skip_serializing_if = "Option::is_none")]
    pub psk: Option<String>,
    #[serde(rename = "ServerCAPEMs", skip_serializing_if = "Vec::is_empty")]
    pub server_ca_pems: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_cert_type: Option<ClientCertType>,
    #[serde(rename = "ClientCertPKCS11Id", skip_serializing_if = "Option::is_none")]
    pub client_cert_pkcs11_id: Option<String>,
    pub save_credentials: bool,
}

impl Default for IpsecConfig {
    fn default() -> Self {
        Self::with_authentication(IpsecAuthenticationType::Psk)
    }
}

impl IpsecConfig {
    pub fn with_authentication(authentication_type: IpsecAuthenticationType) -> Self {
        Self {
            authentication_type,
            ike_version: IKE_VERSION_L2TP,
            psk: None,
            server_ca_pems: Vec::new(),
            client_cert_type: None,
            client_cert_pkcs11_id: None,
            save_credentials: false,
        }
    }
}

/// L2TP settings of an L2TP/IPsec VPN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct L2tpConfig {
    pub username: String,
    pub password: String,
    pub save_credentials: bool,
}

/// OpenVPN settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OpenVpnConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "OTP", skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    #[serde(rename = "ServerCAPEMs", skip_serializing_if = "Vec::is_empty")]
    pub server_ca_pems: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_cert_type: Option<ClientCertType>,
    #[serde(rename = "ClientCertPKCS11Id", skip_serializing_if = "Option::is_none")]
    pub client_cert_pkcs11_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_authentication_type: Option<UserAuthenticationType>,
    pub save_credentials: bool,
}

/// Provider-specific VPN settings, one variant per `VPN.Type`.
#[derive(Debug, Clone, PartialEq)]
pub enum VpnProvider {
    L2tpIpsec { ipsec: IpsecConfig, l2tp: L2tpConfig },
    OpenVpn(OpenVpnConfig),
}

impl Default for VpnProvider {
    fn default() -> Self {
        Self::L2tpIpsec {
            ipsec: IpsecConfig::default(),
            l2tp: L2tpConfig::default(),
        }
    }
}

/// VPN settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VpnConfig {
    pub host: String,
    pub auto_connect: Option<bool>,
    pub provider: VpnProvider,
}

impl VpnConfig {
    pub fn vpn_type(&self) -> VpnType {
        match self.provider {
            VpnProvider::L2tpIpsec { .. } => VpnType::L2tpIpsec,
            VpnProvider::OpenVpn(_) => VpnType::OpenVpn,
        }
    }

    /// The composite type shown to the user.
    pub fn config_type(&self) -> VpnConfigType {
        match &self.provider {
            VpnProvider::L2tpIpsec { ipsec, .. } => match ipsec.authentication_type {
                IpsecAuthenticationType::Cert => VpnConfigType::L2tpIpsecCert,
                IpsecAuthenticationType::Psk => VpnConfigType::L2tpIpsecPsk,
            },
            VpnProvider::OpenVpn(_) => VpnConfigType::OpenVpn,
        }
    }

    pub fn ipsec(&self) -> Option<&IpsecConfig> {
        match &self.provider {
            VpnProvider::L2tpIpsec { ipsec, .. } => Some(ipsec),
            VpnProvider::OpenVpn(_) => None,
        }
    }

    pub fn ipsec_mut(&mut self) -> Option<&mut IpsecConfig> {
        match &mut self.provider {
            VpnProvider::L2tpIpsec { ipsec, .. } => Some(ipsec),
            VpnProvider::OpenVpn(_) => None,
        }
    }

    pub fn l2tp(&self) -> Option<&L2tpConfig> {
        match &self.provider {
            VpnProvider::L2tpIpsec { l2tp, .. } => Some(l2tp),
            VpnProvider::OpenVpn(_) => None,
        }
    }

    pub fn l2tp_mut(&mut self) -> Option<&mut L2tpConfig> {
        match &mut self.provider {
            VpnProvider::L2tpIpsec { l2tp, .. } => Some(l2tp),
            VpnProvider::OpenVpn(_) => None,
        }
    }

    pub fn openvpn(&self) -> Option<&OpenVpnConfig> {
        match &self.provider {
            VpnProvider::OpenVpn(openvpn) => Some(openvpn),
            VpnProvider::L2tpIpsec { .. } => None,
        }
    }

    pub fn openvpn_mut(&mut self) -> Option<&mut OpenVpnConfig> {
        match &mut self.provider {
            VpnProvider::OpenVpn(openvpn) => Some(openvpn),
            VpnProvider::L2tpIpsec { .. } => None,
        }
    }

    /// Stored server CA PEM for the certificate-bearing VPN types.
    pub fn server_ca_pem(&self) -> Option<&str> {
        let pems = match &self.provider {
            VpnProvider::L2tpIpsec { ipsec, .. } => &ipsec.server_ca_pems,
            VpnProvider::OpenVpn(openvpn) => &openvpn.server_ca_pems,
        };
        pems.first().map(String::as_str).filter(|p| !p.is_empty())
    }

    /// Stored PKCS#11 id of the client certificate, if referenced by id.
    pub fn pkcs11_id(&self) -> Option<&str> {
        match &self.provider {
            VpnProvider::L2tpIpsec { ipsec, .. } => {
                pkcs11_reference(ipsec.client_cert_type, ipsec.client_cert_pkcs11_id.as_deref())
            }
            VpnProvider::OpenVpn(openvpn) => {
                pkcs11_reference(openvpn.client_cert_type, openvpn.client_cert_pkcs11_id.as_deref())
            }
        }
    }

    fn zeroize_credentials(&mut self) {
        match &mut self.provider {
            VpnProvider::L2tpIpsec { ipsec, l2tp } => {
                if let Some(psk) = ipsec.psk.as_mut() {
                    psk.zeroize();
                }
                l2tp.password.zeroize();
            }
            VpnProvider::OpenVpn(openvpn) => {
                if let Some(password) = openvpn.password.as_mut() {
                    password.zeroize();
                }
                if let Some(otp) = openvpn.otp.as_mut() {
                    otp.zeroize();
                }
            }
        }
    }
}

impl Serialize for VpnConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(auto_connect) = self.auto_connect {
            map.serialize_entry("AutoConnect", &auto_connect)?;
        }
        map.serialize_entry("Host", &self.host)?;
        map.serialize_entry("Type", &self.vpn_type())?;
        match &self.provider {
            VpnProvider::L2tpIpsec { ipsec, l2tp } => {
                map.serialize_entry("IPsec", ipsec)?;
                map.serialize_entry("L2TP", l2tp)?;
            }
            VpnProvider::OpenVpn(openvpn) => {
                map.serialize_entry("OpenVPN", openvpn)?;
            }
        }
        map.end()
    }
}

/// Type-specific settings block.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeConfig {
    WiFi(WifiConfig),
    Ethernet(EthernetConfig),
    WiMax(WimaxConfig),
    Vpn(VpnConfig),
}

impl TypeConfig {
    pub fn network_type(&self) -> NetworkType {
        match self {
            Self::WiFi(_) => NetworkType::WiFi,
            Self::Ethernet(_) => NetworkType::Ethernet,
            Self::WiMax(_) => NetworkType::WiMax,
            Self::Vpn(_) => NetworkType::Vpn,
        }
    }
}

/// The working configuration of one network.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigProperties {
    /// Set on submission payloads for existing networks.
    pub guid: Option<String>,
    pub name: String,
    pub type_config: TypeConfig,
}

impl ConfigProperties {
    pub fn new(name: impl Into<String>, type_config: TypeConfig) -> Self {
        Self {
            guid: None,
            name: name.into(),
            type_config,
        }
    }

    pub fn network_type(&self) -> NetworkType {
        self.type_config.network_type()
    }

    pub fn wifi(&self) -> Option<&WifiConfig> {
        match &self.type_config {
            TypeConfig::WiFi(wifi) => Some(wifi),
            _ => None,
        }
    }

    pub fn wifi_mut(&mut self) -> Option<&mut WifiConfig> {
        match &mut self.type_config {
            TypeConfig::WiFi(wifi) => Some(wifi),
            _ => None,
        }
    }

    pub fn ethernet(&self) -> Option<&EthernetConfig> {
        match &self.type_config {
            TypeConfig::Ethernet(ethernet) => Some(ethernet),
            _ => None,
        }
    }

    pub fn ethernet_mut(&mut self) -> Option<&mut EthernetConfig> {
        match &mut self.type_config {
            TypeConfig::Ethernet(ethernet) => Some(ethernet),
            _ => None,
        }
    }

    pub fn vpn(&self) -> Option<&VpnConfig> {
        match &self.type_config {
            TypeConfig::Vpn(vpn) => Some(vpn),
            _ => None,
        }
    }

    pub fn vpn_mut(&mut self) -> Option<&mut VpnConfig> {
        match &mut self.type_config {
            TypeConfig::Vpn(vpn) => Some(vpn),
            _ => None,
        }
    }

    /// The EAP block of the active type, if populated.
    pub fn eap(&self) -> Option<&EapConfig> {
        match &self.type_config {
            TypeConfig::WiFi(wifi) => wifi.eap.as_ref(),
            TypeConfig::Ethernet(ethernet) => ethernet.eap.as_ref(),
            TypeConfig::WiMax(wimax) => wimax.eap.as_ref(),
            TypeConfig::Vpn(_) => None,
        }
    }

    pub fn eap_mut(&mut self) -> Option<&mut EapConfig> {
        match &mut self.type_config {
            TypeConfig::WiFi(wifi) => wifi.eap.as_mut(),
            TypeConfig::Ethernet(ethernet) => ethernet.eap.as_mut(),
            TypeConfig::WiMax(wimax) => wimax.eap.as_mut(),
            TypeConfig::Vpn(_) => None,
        }
    }

    /// Slot holding the EAP block; `None` for VPN.
    pub fn eap_slot(&mut self) -> Option<&mut Option<EapConfig>> {
        match &mut self.type_config {
            TypeConfig::WiFi(wifi) => Some(&mut wifi.eap),
            TypeConfig::Ethernet(ethernet) => Some(&mut ethernet.eap),
            TypeConfig::WiMax(wimax) => Some(&mut wimax.eap),
            TypeConfig::Vpn(_) => None,
        }
    }

    pub fn auto_connect(&self) -> Option<bool> {
        match &self.type_config {
            TypeConfig::WiFi(wifi) => wifi.auto_connect,
            TypeConfig::Ethernet(ethernet) => ethernet.auto_connect,
            TypeConfig::WiMax(wimax) => wimax.auto_connect,
            TypeConfig::Vpn(vpn) => vpn.auto_connect,
        }
    }

    pub fn set_auto_connect(&mut self, value: Option<bool>) {
        match &mut self.type_config {
            TypeConfig::WiFi(wifi) => wifi.auto_connect = value,
            TypeConfig::Ethernet(ethernet) => ethernet.auto_connect = value,
            TypeConfig::WiMax(wimax) => wimax.auto_connect = value,
            TypeConfig::Vpn(vpn) => vpn.auto_connect = value,
        }
    }

    /// Overwrite every secret held by this configuration.
    pub fn zeroize_credentials(&mut self) {
        match &mut self.type_config {
            TypeConfig::WiFi(wifi) => {
                if let Some(passphrase) = wifi.passphrase.as_mut() {
                    passphrase.zeroize();
                }
            }
            TypeConfig::Vpn(vpn) => vpn.zeroize_credentials(),
            TypeConfig::Ethernet(_) | TypeConfig::WiMax(_) => {}
        }
        if let Some(eap) = self.eap_mut() {
            eap.zeroize_credentials();
        }
    }
}

impl Serialize for ConfigProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(guid) = &self.guid {
            map.serialize_entry("GUID", guid)?;
        }
        map.serialize_entry("Name", &self.name)?;
        map.serialize_entry("Type", &self.network_type())?;
        match &self.type_config {
            TypeConfig::WiFi(wifi) => map.serialize_entry("WiFi", wifi)?,
            TypeConfig::Ethernet(ethernet) => map.serialize_entry("Ethernet", ethernet)?,
            TypeConfig::WiMax(wimax) => map.serialize_entry("WiMAX", wimax)?,
            TypeConfig::Vpn(vpn) => map.serialize_entry("VPN", vpn)?,
        }
        map.end()
    }
}

fn pkcs11_reference(cert_type: Option<ClientCertType>, id: Option<&str>) -> Option<&str> {
    if cert_type == Some(ClientCertType::Pkcs11Id) {
        id.filter(|id| !id.is_empty())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wifi_serializes_as_onc() {
        let config = ConfigProperties::new(
            "Home",
            TypeConfig::WiFi(WifiConfig {
                ssid: "home".to_string(),
                passphrase: Some("secret".to_string()),
                security: SecurityType::WpaPsk,
                ..Default::default()
            }),
        );
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["Type"], json!("WiFi"));
        assert_eq!(value["WiFi"]["SSID"], json!("home"));
        assert_eq!(value["WiFi"]["Security"], json!("WPA-PSK"));
        assert!(value.get("GUID").is_none());
        assert!(value["WiFi"].get("EAP").is_none());
    }

    #[test]
    fn test_vpn_variant_blocks_are_exclusive() {
        let mut vpn = VpnConfig {
            host: "vpn.example.com".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&vpn).unwrap();
        assert_eq!(value["Type"], json!("L2TP-IPsec"));
        assert!(value.get("IPsec").is_some());
        assert!(value.get("L2TP").is_some());
        assert!(value.get("OpenVPN").is_none());

        vpn.provider = VpnProvider::OpenVpn(OpenVpnConfig::default());
        let value = serde_json::to_value(&vpn).unwrap();
        assert_eq!(value["Type"], json!("OpenVPN"));
        assert!(value.get("IPsec").is_none());
        assert!(value.get("L2TP").is_none());
        assert_eq!(vpn.config_type(), VpnConfigType::OpenVpn);
    }

    #[test]
    fn test_pkcs11_id_requires_type() {
        let mut eap = EapConfig {
            client_cert_pkcs11_id: Some("1:abcd".to_string()),
            ..Default::default()
        };
        assert_eq!(eap.pkcs11_id(), None);
        eap.client_cert_type = Some(ClientCertType::Pkcs11Id);
        assert_eq!(eap.pkcs11_id(), Some("1:abcd"));
    }

    #[test]
    fn test_zeroize_credentials() {
        let mut config = ConfigProperties::new(
            "Home",
            TypeConfig::WiFi(WifiConfig {
                passphrase: Some("secret".to_string()),
                eap: Some(EapConfig {
                    password: Some("hunter2".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        );
        config.zeroize_credentials();
        let wifi = config.wifi().unwrap();
        assert_eq!(wifi.passphrase.as_deref(), Some(""));
        assert_eq!(wifi.eap.as_ref().unwrap().password.as_deref(), Some(""));
    }
}

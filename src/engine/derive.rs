// Network Config - Configuration Derivation
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Builds the working configuration from a managed snapshot.
//!
//! Derivation is a pure function of the snapshot: the same snapshot always
//! yields the same configuration, security selection and VPN type.

use crate::models::managed::{
    active, ManagedEap, ManagedIpsec, ManagedL2tp, ManagedOpenVpn, ManagedProperties, ManagedVpn,
};
use crate::models::{
    Authentication, ConfigProperties, EapConfig, EapOuter, EthernetConfig, IpsecAuthenticationType,
    IpsecConfig, L2tpConfig, NetworkType, OpenVpnConfig, SecurityType, TypeConfig, VpnConfig,
    VpnConfigType, VpnProvider, VpnType, WifiConfig, WimaxConfig,
};
use crate::models::properties::IKE_VERSION_L2TP;

/// Output of a derivation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub config: ConfigProperties,
    pub security: SecurityType,
    /// Set for VPN networks only.
    pub vpn_type: Option<VpnConfigType>,
    /// Shared VPN "save credentials" flag.
    pub vpn_save_credentials: bool,
}

/// Derive the working configuration for the snapshot's network type.
pub fn derive(snapshot: &ManagedProperties) -> Derived {
    let name = active(&snapshot.name).unwrap_or_default();

    let (type_config, security) = match snapshot.network_type {
        NetworkType::WiFi => derive_wifi(snapshot),
        NetworkType::Ethernet => derive_ethernet(snapshot),
        NetworkType::WiMax => derive_wimax(snapshot),
        NetworkType::Vpn => (TypeConfig::Vpn(derive_vpn(snapshot.vpn.as_ref())), SecurityType::None),
    };

    let vpn_type = match &type_config {
        TypeConfig::Vpn(vpn) => Some(vpn.config_type()),
        _ => None,
    };
    let vpn_save_credentials = snapshot
        .vpn
        .as_ref()
        .map(ManagedVpn::save_credentials)
        .unwrap_or(false);

    Derived {
        config: ConfigProperties::new(name, type_config),
        security,
        vpn_type,
        vpn_save_credentials,
    }
}

fn derive_wifi(snapshot: &ManagedProperties) -> (TypeConfig, SecurityType) {
    let wifi = match &snapshot.wifi {
        Some(managed) => WifiConfig {
            auto_connect: active(&managed.auto_connect),
            ssid: active(&managed.ssid).unwrap_or_default(),
            passphrase: active(&managed.passphrase),
            security: active(&managed.security).unwrap_or_default(),
            eap: managed.eap.as_ref().map(convert_eap),
        },
        None => WifiConfig {
            auto_connect: Some(false),
            ssid: String::new(),
            passphrase: None,
            security: SecurityType::None,
            eap: None,
        },
    };
    let security = wifi.security;
    (TypeConfig::WiFi(wifi), security)
}

fn derive_ethernet(snapshot: &ManagedProperties) -> (TypeConfig, SecurityType) {
    let managed = snapshot.ethernet.as_ref();
    let eap = managed.and_then(|e| e.eap.as_ref()).map(|managed_eap| {
        let mut eap = convert_eap(managed_eap);
        eap.outer.get_or_insert(EapOuter::Leap);
        eap
    });
    let security = if eap.is_some() {
        SecurityType::WpaEap
    } else {
        SecurityType::None
    };
    let ethernet = EthernetConfig {
        auto_connect: Some(
            managed
                .and_then(|e| active(&e.auto_connect))
                .unwrap_or(false),
        ),
        authentication: Authentication::for_security(security),
        eap,
    };
    (TypeConfig::Ethernet(ethernet), security)
}

fn derive_wimax(snapshot: &ManagedProperties) -> (TypeConfig, SecurityType) {
    let wimax = match &snapshot.wimax {
        Some(managed) => WimaxConfig {
            auto_connect: active(&managed.auto_connect),
            eap: Some(managed.eap.as_ref().map(convert_eap).unwrap_or_default()),
        },
        None => WimaxConfig {
            auto_connect: Some(false),
            eap: None,
        },
    };
    (TypeConfig::WiMax(wimax), SecurityType::WpaEap)
}

fn derive_vpn(managed: Option<&ManagedVpn>) -> VpnConfig {
    let Some(managed) = managed else {
        return VpnConfig::default();
    };
    let vpn_type = active(&managed.vpn_type).unwrap_or_default();
    let provider = match vpn_type {
        VpnType::L2tpIpsec => VpnProvider::L2tpIpsec {
            ipsec: managed.ipsec.as_ref().map(convert_ipsec).unwrap_or_default(),
            l2tp: managed.l2tp.as_ref().map(convert_l2tp).unwrap_or_default(),
        },
        VpnType::OpenVpn => VpnProvider::OpenVpn(
            managed.openvpn.as_ref().map(convert_openvpn).unwrap_or_default(),
        ),
    };
    VpnConfig {
        host: active(&managed.host).unwrap_or_default(),
        auto_connect: None,
        provider,
    }
}

/// Active values of a managed EAP block.
pub fn convert_eap(managed: &ManagedEap) -> EapConfig {
    EapConfig {
        outer: active(&managed.outer),
        inner: active(&managed.inner),
        identity: active(&managed.identity),
        password: active(&managed.password),
        anonymous_identity: active(&managed.anonymous_identity),
        subject_match: active(&managed.subject_match),
        server_ca_pems: active(&managed.server_ca_pems).unwrap_or_default(),
        client_cert_type: active(&managed.client_cert_type),
        client_cert_pkcs11_id: active(&managed.client_cert_pkcs11_id),
        save_credentials: active(&managed.save_credentials).unwrap_or(false),
        use_system_cas: active(&managed.use_system_cas),
    }
}

fn convert_ipsec(managed: &ManagedIpsec) -> IpsecConfig {
    IpsecConfig {
        authentication_type: active(&managed.authentication_type)
            .unwrap_or(IpsecAuthenticationType::Psk),
        ike_version: active(&managed.ike_version).unwrap_or(IKE_VERSION_L2TP),
        psk: active(&managed.psk),
        server_ca_pems: active(&managed.server_ca_pems).unwrap_or_default(),
        client_cert_type: active(&managed.client_cert_type),
        client_cert_pkcs11_id: active(&managed.client_cert_pkcs11_id),
        save_credentials: active(&managed.save_credentials).unwrap_or(false),
    }
}

fn convert_l2tp(managed: &ManagedL2tp) -> L2tpConfig {
    L2tpConfig {
        username: active(&managed.username).unwrap_or_default(),
        password: active(&managed.password).unwrap_or_default(),
        save_credentials: active(&managed.save_credentials).unwrap_or(false),
    }
}

fn convert_openvpn(managed: &ManagedOpenVpn) -> OpenVpnConfig {
    OpenVpnConfig {
        username: active(&managed.username),
        password: active(&managed.password),
        otp: active(&managed.otp),
        server_ca_pems: active(&managed.server_ca_pems).unwrap_or_default(),
        client_cert_type: active(&managed.client_cert_type),
        client_cert_pkcs11_id: active(&managed.client_cert_pkcs11_id),
        user_authentication_type: active(&managed.user_authentication_type),
        save_credentials: active(&managed.save_credentials).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::managed::{ManagedEthernet, ManagedValue, ManagedWifi};

    #[test]
    fn test_new_wifi_defaults() {
        let derived = derive(&ManagedProperties::new_network(NetworkType::WiFi));
        let wifi = derived.config.wifi().unwrap();
        assert_eq!(wifi.ssid, "");
        assert_eq!(wifi.security, SecurityType::None);
        assert_eq!(wifi.auto_connect, Some(false));
        assert!(wifi.eap.is_none());
        assert_eq!(derived.security, SecurityType::None);
        assert_eq!(derived.vpn_type, None);
    }

    #[test]
    fn test_existing_wifi_copies_active_values() {
        let mut snapshot = ManagedProperties::new_network(NetworkType::WiFi);
        snapshot.name = Some(ManagedValue::user("Office".to_string()));
        snapshot.wifi = Some(ManagedWifi {
            ssid: Some(ManagedValue::device_policy("office".to_string())),
            security: Some(ManagedValue::user(SecurityType::WpaEap)),
            eap: Some(ManagedEap {
                outer: Some(ManagedValue::user(EapOuter::Peap)),
                ..Default::default()
            }),
            ..Default::default()
        });
        let derived = derive(&snapshot);
        assert_eq!(derived.config.name, "Office");
        assert_eq!(derived.security, SecurityType::WpaEap);
        let eap = derived.config.eap().unwrap();
        assert_eq!(eap.outer, Some(EapOuter::Peap));
        assert!(!eap.save_credentials);
    }

    #[test]
    fn test_ethernet_security_from_eap_presence() {
        let snapshot = ManagedProperties::new_network(NetworkType::Ethernet);
        let derived = derive(&snapshot);
        assert_eq!(derived.security, SecurityType::None);
        assert_eq!(derived.config.ethernet().unwrap().authentication, Authentication::None);

        let mut snapshot = ManagedProperties::new_network(NetworkType::Ethernet);
        snapshot.ethernet = Some(ManagedEthernet {
            eap: Some(ManagedEap::default()),
            ..Default::default()
        });
        let derived = derive(&snapshot);
        assert_eq!(derived.security, SecurityType::WpaEap);
        let ethernet = derived.config.ethernet().unwrap();
        assert_eq!(ethernet.authentication, Authentication::Ieee8021X);
        assert_eq!(ethernet.eap.as_ref().unwrap().outer, Some(EapOuter::Leap));
    }

    #[test]
    fn test_new_vpn_defaults_to_l2tp_psk() {
        let derived = derive(&ManagedProperties::new_network(NetworkType::Vpn));
        assert_eq!(derived.vpn_type, Some(VpnConfigType::L2tpIpsecPsk));
        let vpn = derived.config.vpn().unwrap();
        assert_eq!(vpn.l2tp().unwrap().username, "");
        assert!(vpn.openvpn().is_none());
    }

    #[test]
    fn test_openvpn_snapshot_has_no_ipsec() {
        let mut snapshot = ManagedProperties::new_network(NetworkType::Vpn);
        snapshot.vpn = Some(ManagedVpn {
            host: Some(ManagedValue::user("vpn.example.com".to_string())),
            vpn_type: Some(ManagedValue::user(VpnType::OpenVpn)),
            ipsec: Some(ManagedIpsec::default()),
            openvpn: Some(ManagedOpenVpn {
                username: Some(ManagedValue::user("alice".to_string())),
                save_credentials: Some(ManagedValue::user(true)),
                ..Default::default()
            }),
            ..Default::default()
        });
        let derived = derive(&snapshot);
        let vpn = derived.config.vpn().unwrap();
        assert_eq!(derived.vpn_type, Some(VpnConfigType::OpenVpn));
        assert!(vpn.ipsec().is_none());
        assert!(vpn.l2tp().is_none());
        assert_eq!(vpn.openvpn().unwrap().username.as_deref(), Some("alice"));
        assert!(derived.vpn_save_credentials);
    }

    #[test]
    fn test_l2tp_cert_snapshot() {
        let mut snapshot = ManagedProperties::new_network(NetworkType::Vpn);
        snapshot.vpn = Some(ManagedVpn {
            vpn_type: Some(ManagedValue::user(VpnType::L2tpIpsec)),
            ipsec: Some(ManagedIpsec {
                authentication_type: Some(ManagedValue::user(IpsecAuthenticationType::Cert)),
                ..Default::default()
            }),
            ..Default::default()
        });
        let derived = derive(&snapshot);
        assert_eq!(derived.vpn_type, Some(VpnConfigType::L2tpIpsecCert));
        assert!(derived.config.vpn().unwrap().l2tp().is_some());
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let mut snapshot = ManagedProperties::new_network(NetworkType::WiFi);
        snapshot.wifi = Some(ManagedWifi {
            ssid: Some(ManagedValue::user("home".to_string())),
            passphrase: Some(ManagedValue::user("abcdef".to_string())),
            security: Some(ManagedValue::user(SecurityType::WpaPsk)),
            ..Default::default()
        });
        assert_eq!(derive(&snapshot), derive(&snapshot));
    }
}

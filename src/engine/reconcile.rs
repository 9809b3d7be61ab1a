// Network Config - Security Reconciliation
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Keeps the working configuration consistent with the security selection,
//! the VPN type and the EAP outer method.
//!
//! Every function here is idempotent: applying it twice leaves the same
//! configuration as applying it once.

use crate::models::{
    Authentication, ConfigProperties, EapConfig, EapOuter, IpsecAuthenticationType, IpsecConfig,
    L2tpConfig, NetworkType, OpenVpnConfig, SecurityType, VpnConfig, VpnConfigType, VpnProvider,
};

/// Apply the security selection to the configuration.
///
/// WPA-EAP creates the EAP block when missing (outer method LEAP, except for
/// WiMAX which has no outer method); any other selection removes it.
pub fn reconcile_security(config: &mut ConfigProperties, security: SecurityType) {
    let network_type = config.network_type();
    if let Some(wifi) = config.wifi_mut() {
        wifi.security = security;
    }
    if let Some(ethernet) = config.ethernet_mut() {
        ethernet.authentication = Authentication::for_security(security);
    }

    let Some(slot) = config.eap_slot() else {
        return;
    };
    if security == SecurityType::WpaEap {
        let eap = slot.get_or_insert_with(EapConfig::default);
        if network_type != NetworkType::WiMax {
            eap.outer.get_or_insert(EapOuter::Leap);
        }
    } else {
        *slot = None;
    }
}

/// Reshape the VPN provider blocks for the selected VPN type.
///
/// Switching between the two L2TP/IPsec variants only changes the IPsec
/// authentication type. Moving to L2TP/IPsec from OpenVPN creates fresh
/// blocks and drops the OpenVPN block; moving to OpenVPN drops the IPsec
/// and L2TP blocks.
pub fn reconcile_vpn_type(vpn: &mut VpnConfig, vpn_type: VpnConfigType) {
    let authentication_type = match vpn_type {
        VpnConfigType::L2tpIpsecPsk => IpsecAuthenticationType::Psk,
        VpnConfigType::L2tpIpsecCert => IpsecAuthenticationType::Cert,
        VpnConfigType::OpenVpn => {
            if !matches!(vpn.provider, VpnProvider::OpenVpn(_)) {
                vpn.provider = VpnProvider::OpenVpn(OpenVpnConfig::default());
            }
            return;
        }
    };

    match &mut vpn.provider {
        VpnProvider::L2tpIpsec { ipsec, .. } => ipsec.authentication_type = authentication_type,
        VpnProvider::OpenVpn(_) => {
            vpn.provider = VpnProvider::L2tpIpsec {
                ipsec: IpsecConfig::with_authentication(authentication_type),
                l2tp: L2tpConfig::default(),
            };
        }
    }
}

/// Reset the inner method when it is not valid for the outer method.
pub fn reconcile_eap_inner(eap: &mut EapConfig) {
    let Some(outer) = eap.outer else {
        return;
    };
    let items = outer.inner_items();
    match items.first() {
        None => eap.inner = None,
        Some(first) => {
            if !eap.inner.is_some_and(|inner| items.contains(&inner)) {
                eap.inner = Some(*first);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EapInner, EthernetConfig, TypeConfig, WifiConfig, WimaxConfig};

    fn wifi() -> ConfigProperties {
        ConfigProperties::new("", TypeConfig::WiFi(WifiConfig::default()))
    }

    #[test]
    fn test_wpa_eap_creates_eap_with_leap() {
        let mut config = wifi();
        reconcile_security(&mut config, SecurityType::WpaEap);
        assert_eq!(config.wifi().unwrap().security, SecurityType::WpaEap);
        assert_eq!(config.eap().unwrap().outer, Some(EapOuter::Leap));

        reconcile_security(&mut config, SecurityType::WpaPsk);
        assert!(config.eap().is_none());
    }

    #[test]
    fn test_existing_eap_kept() {
        let mut config = wifi();
        config.wifi_mut().unwrap().eap = Some(EapConfig {
            outer: Some(EapOuter::Peap),
            identity: Some("alice".to_string()),
            ..Default::default()
        });
        reconcile_security(&mut config, SecurityType::WpaEap);
        let eap = config.eap().unwrap();
        assert_eq!(eap.outer, Some(EapOuter::Peap));
        assert_eq!(eap.identity.as_deref(), Some("alice"));
    }

    #[test]
    fn test_ethernet_authentication_follows_security() {
        let mut config = ConfigProperties::new("", TypeConfig::Ethernet(EthernetConfig::default()));
        reconcile_security(&mut config, SecurityType::WpaEap);
        let ethernet = config.ethernet().unwrap();
        assert_eq!(ethernet.authentication, Authentication::Ieee8021X);
        assert!(ethernet.eap.is_some());

        reconcile_security(&mut config, SecurityType::None);
        let ethernet = config.ethernet().unwrap();
        assert_eq!(ethernet.authentication, Authentication::None);
        assert!(ethernet.eap.is_none());
    }

    #[test]
    fn test_wimax_eap_has_no_outer() {
        let mut config = ConfigProperties::new("", TypeConfig::WiMax(WimaxConfig::default()));
        reconcile_security(&mut config, SecurityType::WpaEap);
        assert_eq!(config.eap().unwrap().outer, None);
    }

    #[test]
    fn test_security_is_idempotent() {
        let mut once = wifi();
        reconcile_security(&mut once, SecurityType::WpaEap);
        let mut twice = once.clone();
        reconcile_security(&mut twice, SecurityType::WpaEap);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_vpn_psk_to_cert_preserves_fields() {
        let mut vpn = VpnConfig::default();
        vpn.ipsec_mut().unwrap().psk = Some("shared".to_string());
        vpn.l2tp_mut().unwrap().username = "bob".to_string();

        reconcile_vpn_type(&mut vpn, VpnConfigType::L2tpIpsecCert);
        assert_eq!(vpn.config_type(), VpnConfigType::L2tpIpsecCert);
        assert_eq!(vpn.ipsec().unwrap().psk.as_deref(), Some("shared"));
        assert_eq!(vpn.l2tp().unwrap().username, "bob");
    }

    #[test]
    fn test_vpn_openvpn_round_trip() {
        let mut vpn = VpnConfig::default();
        vpn.l2tp_mut().unwrap().username = "bob".to_string();

        reconcile_vpn_type(&mut vpn, VpnConfigType::OpenVpn);
        assert!(vpn.ipsec().is_none());
        assert!(vpn.l2tp().is_none());
        vpn.openvpn_mut().unwrap().username = Some("carol".to_string());

        reconcile_vpn_type(&mut vpn, VpnConfigType::OpenVpn);
        assert_eq!(vpn.openvpn().unwrap().username.as_deref(), Some("carol"));

        reconcile_vpn_type(&mut vpn, VpnConfigType::L2tpIpsecPsk);
        assert!(vpn.openvpn().is_none());
        let ipsec = vpn.ipsec().unwrap();
        assert_eq!(ipsec.authentication_type, IpsecAuthenticationType::Psk);
        assert_eq!(ipsec.ike_version, 1);
        assert!(!ipsec.save_credentials);
        assert_eq!(vpn.l2tp().unwrap().username, "");
    }

    #[test]
    fn test_vpn_type_transitions() {
        let types = [
            VpnConfigType::L2tpIpsecPsk,
            VpnConfigType::L2tpIpsecCert,
            VpnConfigType::OpenVpn,
        ];
        for from in types {
            for to in types {
                let mut vpn = VpnConfig::default();
                reconcile_vpn_type(&mut vpn, from);
                assert_eq!(vpn.config_type(), from);

                reconcile_vpn_type(&mut vpn, to);
                assert_eq!(vpn.config_type(), to, "{:?} -> {:?}", from, to);
                match to {
                    VpnConfigType::OpenVpn => {
                        assert!(vpn.ipsec().is_none(), "{:?} -> {:?}", from, to);
                        assert!(vpn.l2tp().is_none(), "{:?} -> {:?}", from, to);
                        assert!(!vpn.openvpn().unwrap().save_credentials);
                    }
                    VpnConfigType::L2tpIpsecPsk | VpnConfigType::L2tpIpsecCert => {
                        assert!(vpn.openvpn().is_none(), "{:?} -> {:?}", from, to);
                        let ipsec = vpn.ipsec().unwrap();
                        assert_eq!(ipsec.ike_version, 1);
                        assert!(!ipsec.save_credentials);
                        assert!(!vpn.l2tp().unwrap().save_credentials);
                    }
                }
            }
        }
    }

    #[test]
    fn test_inner_reset_for_outer() {
        let mut eap = EapConfig {
            outer: Some(EapOuter::EapTtls),
            inner: Some(EapInner::Pap),
            ..Default::default()
        };
        reconcile_eap_inner(&mut eap);
        assert_eq!(eap.inner, Some(EapInner::Pap));

        eap.outer = Some(EapOuter::Peap);
        reconcile_eap_inner(&mut eap);
        assert_eq!(eap.inner, Some(EapInner::Automatic));

        eap.outer = Some(EapOuter::EapTls);
        reconcile_eap_inner(&mut eap);
        assert_eq!(eap.inner, None);
    }
}

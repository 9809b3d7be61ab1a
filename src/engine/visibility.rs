// Network Config - Field Visibility
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Which editor fields apply to the current configuration.

use serde::Serialize;

use crate::models::{EapConfig, EapOuter, NetworkType, SecurityType, Source, VpnConfigType};

/// EAP fields that apply to the selected outer method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EapFields {
    pub outer: bool,
    pub inner: bool,
    pub server_ca: bool,
    pub subject_match: bool,
    pub user_cert: bool,
    pub identity: bool,
    pub password: bool,
    pub anonymous_identity: bool,
}

/// VPN field groups that apply to the selected VPN type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnFields {
    pub cert: bool,
    pub open_vpn: bool,
    pub user_cert: bool,
}

/// EAP fields for the network, or `None` when EAP does not apply.
pub fn eap_fields(
    network_type: NetworkType,
    security: SecurityType,
    eap: Option<&EapConfig>,
) -> Option<EapFields> {
    let eap = eap?;
    if security == SecurityType::None {
        return None;
    }
    match network_type {
        NetworkType::WiMax => Some(EapFields {
            identity: true,
            password: true,
            ..Default::default()
        }),
        NetworkType::WiFi | NetworkType::Ethernet => {
            let outer = eap.outer;
            let tunneled = matches!(outer, Some(EapOuter::Peap) | Some(EapOuter::EapTtls));
            let tls = outer == Some(EapOuter::EapTls);
            Some(EapFields {
                outer: true,
                inner: tunneled,
                server_ca: outer != Some(EapOuter::Leap),
                subject_match: tls,
                user_cert: tls,
                identity: true,
                password: !tls,
                anonymous_identity: tunneled,
            })
        }
        NetworkType::Vpn => None,
    }
}

/// VPN field groups, or `None` for non-VPN networks.
pub fn vpn_fields(vpn_type: Option<VpnConfigType>) -> Option<VpnFields> {
    vpn_type.map(|vpn_type| match vpn_type {
        VpnConfigType::L2tpIpsecPsk => VpnFields::default(),
        VpnConfigType::L2tpIpsecCert => VpnFields {
            cert: true,
            open_vpn: false,
            user_cert: true,
        },
        // The user certificate is optional for OpenVPN.
        VpnConfigType::OpenVpn => VpnFields {
            cert: true,
            open_vpn: true,
            user_cert: false,
        },
    })
}

/// Whether the configuration cannot be submitted without a user certificate.
pub fn requires_user_cert(eap: Option<EapFields>, vpn: Option<VpnFields>) -> bool {
    eap.is_some_and(|e| e.user_cert) || vpn.is_some_and(|v| v.user_cert)
}

/// Security choices offered for the network type.
pub fn security_items(network_type: NetworkType) -> &'static [SecurityType] {
    match network_type {
        NetworkType::WiFi => &[
            SecurityType::None,
            SecurityType::WepPsk,
            SecurityType::WpaPsk,
            SecurityType::WpaEap,
        ],
        NetworkType::Ethernet => &[SecurityType::None, SecurityType::WpaEap],
        NetworkType::WiMax => &[SecurityType::WpaEap],
        NetworkType::Vpn => &[SecurityType::None],
    }
}

/// WiFi security cannot change once the network is configured.
pub fn security_is_enabled(network_type: NetworkType, is_new_network: bool) -> bool {
    is_new_network || network_type == NetworkType::Ethernet
}

pub fn share_is_visible(network_type: NetworkType, source: Source) -> bool {
    source == Source::None && matches!(network_type, NetworkType::WiFi | NetworkType::WiMax)
}

/// Open WiFi networks are always shared, so the toggle is locked for them.
pub fn share_is_enabled(
    network_type: NetworkType,
    source: Source,
    security: SecurityType,
    allow_enable: bool,
) -> bool {
    if !allow_enable || source != Source::None {
        return false;
    }
    !(network_type == NetworkType::WiFi && security == SecurityType::None)
}

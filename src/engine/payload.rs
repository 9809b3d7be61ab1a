// Network Config - Submission Payload
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Assembles the configuration sent to the network service.

use super::selector::SelectionState;
use crate::models::certificate::NO_USER_CERT_HASH;
use crate::models::properties::IKE_VERSION_L2TP;
use crate::models::{
    CertificateCatalog, ClientCertType, ConfigProperties, EapConfig, GlobalPolicy,
    IpsecAuthenticationType, NetworkType, UserAuthenticationType, VpnConfig, VpnProvider,
};

/// Session facts needed to build a payload.
#[derive(Debug, Clone, Copy)]
pub struct PayloadContext<'a> {
    /// Identifier of an existing network.
    pub guid: Option<&'a str>,
    pub catalog: &'a CertificateCatalog,
    pub selection: &'a SelectionState,
    /// The single VPN "save credentials" flag.
    pub vpn_save_credentials: bool,
    /// Explicit auto-connect choice made by the user, if any.
    pub auto_connect_override: Option<bool>,
    pub global_policy: Option<&'a GlobalPolicy>,
}

/// Build the submission payload from the working configuration.
pub fn build_payload(config: &ConfigProperties, ctx: &PayloadContext<'_>) -> ConfigProperties {
    let mut payload = config.clone();
    payload.guid = ctx.guid.map(str::to_string);
    payload.set_auto_connect(auto_connect(config.network_type(), ctx));

    let server_ca_pems = selected_server_ca_pems(ctx);
    let pkcs11_id = selected_pkcs11_id(ctx);

    if let Some(eap) = payload.eap_mut() {
        apply_eap_certificates(eap, ctx.selection, server_ca_pems.clone(), pkcs11_id.clone());
    }
    if let Some(vpn) = payload.vpn_mut() {
        apply_vpn(vpn, ctx, server_ca_pems, pkcs11_id);
    }
    payload
}

/// `AutoConnect` is only sent as `false`, and only for new networks.
///
/// The service enables auto-connect itself after a successful connection.
fn auto_connect(network_type: NetworkType, ctx: &PayloadContext<'_>) -> Option<bool> {
    if ctx.guid.is_some() {
        return None;
    }
    let disabled = ctx.auto_connect_override == Some(false)
        || network_type == NetworkType::Vpn
        || ctx.global_policy.is_some_and(GlobalPolicy::forbids_user_autoconnect);
    disabled.then_some(false)
}

fn selected_server_ca_pems(ctx: &PayloadContext<'_>) -> Vec<String> {
    ctx.selection
        .server_ca_hash
        .as_deref()
        .and_then(|hash| ctx.catalog.find_server_ca(hash))
        .filter(|entry| !entry.is_sentinel() && !entry.pem_or_id.is_empty())
        .map(|entry| vec![entry.pem_or_id.clone()])
        .unwrap_or_default()
}

fn selected_pkcs11_id(ctx: &PayloadContext<'_>) -> Option<String> {
    if !ctx.selection.has_valid_user_cert() {
        return None;
    }
    ctx.selection
        .user_cert_hash
        .as_deref()
        .filter(|hash| *hash != NO_USER_CERT_HASH)
        .and_then(|hash| ctx.catalog.find_user_cert(hash))
        .map(|entry| entry.pem_or_id.clone())
        .filter(|id| !id.is_empty())
}

fn apply_eap_certificates(
    eap: &mut EapConfig,
    selection: &SelectionState,
    server_ca_pems: Vec<String>,
    pkcs11_id: Option<String>,
) {
    eap.use_system_cas = Some(selection.uses_system_cas());
    eap.server_ca_pems = server_ca_pems;
    eap.client_cert_type = Some(if pkcs11_id.is_some() {
        ClientCertType::Pkcs11Id
    } else {
        ClientCertType::None
    });
    eap.client_cert_pkcs11_id = Some(pkcs11_id.unwrap_or_default());
}

fn apply_vpn(
    vpn: &mut VpnConfig,
    ctx: &PayloadContext<'_>,
    server_ca_pems: Vec<String>,
    pkcs11_id: Option<String>,
) {
    vpn.host = vpn.host.trim().to_string();
    let save_credentials = ctx.vpn_save_credentials;

    match &mut vpn.provider {
        VpnProvider::OpenVpn(openvpn) => {
            openvpn.server_ca_pems = server_ca_pems;
            openvpn.client_cert_type = Some(if pkcs11_id.is_some() {
                ClientCertType::Pkcs11Id
            } else {
                ClientCertType::None
            });
            openvpn.client_cert_pkcs11_id = pkcs11_id;
            let has_password = openvpn.password.as_deref().is_some_and(|p| !p.is_empty());
            let has_otp = openvpn.otp.as_deref().is_some_and(|o| !o.is_empty());
            openvpn.user_authentication_type =
                Some(UserAuthenticationType::from_credentials(has_password, has_otp));
            openvpn.save_credentials = save_credentials;
        }
        VpnProvider::L2tpIpsec { ipsec, l2tp } => {
            if ipsec.authentication_type == IpsecAuthenticationType::Cert {
                ipsec.client_cert_type = Some(ClientCertType::Pkcs11Id);
                ipsec.client_cert_pkcs11_id = Some(pkcs11_id.unwrap_or_default());
                ipsec.server_ca_pems = server_ca_pems;
            }
            ipsec.ike_version = IKE_VERSION_L2TP;
            ipsec.save_credentials = save_credentials;
            l2tp.save_credentials = save_credentials;
        }
    }
}

// Network Config - Completeness Validation
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Decides whether the working configuration is complete enough to submit.

use tracing::debug;

use super::selector::SelectionState;
use crate::models::validation::{require_field, require_selection, validate_passphrase};
use crate::models::{
    CertificateCatalog, ConfigProperties, EapConfig, EapOuter, Result, SecurityType, TypeConfig,
    VpnConfig, VpnConfigType,
};

/// Minimum length of a WEP or WPA pre-shared passphrase.
pub const MIN_PASSPHRASE_LENGTH: usize = 5;

/// Everything the completeness check reads.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub config: &'a ConfigProperties,
    pub security: SecurityType,
    pub vpn_type: Option<VpnConfigType>,
    pub catalog: &'a CertificateCatalog,
    pub selection: &'a SelectionState,
    pub device_certs_only: bool,
    pub min_passphrase_length: usize,
}

/// Return the first unmet requirement, if any.
pub fn check(ctx: &ValidationContext<'_>) -> Result<()> {
    match &ctx.config.type_config {
        TypeConfig::Vpn(vpn) => return check_vpn(ctx, vpn),
        TypeConfig::WiFi(wifi) => {
            require_field("SSID", Some(wifi.ssid.as_str()))?;
            if ctx.security.requires_passphrase() {
                validate_passphrase(wifi.passphrase.as_deref(), ctx.min_passphrase_length)?;
            }
        }
        TypeConfig::Ethernet(_) | TypeConfig::WiMax(_) => {}
    }
    if ctx.security == SecurityType::WpaEap {
        check_eap(ctx, ctx.config.eap())?;
    }
    Ok(())
}

/// Whether the configuration may be submitted.
pub fn is_configured(ctx: &ValidationContext<'_>) -> bool {
    match check(ctx) {
        Ok(()) => true,
        Err(e) => {
            debug!("Configuration incomplete: {}", e);
            false
        }
    }
}

fn check_eap(ctx: &ValidationContext<'_>, eap: Option<&EapConfig>) -> Result<()> {
    let Some(eap) = eap else {
        return require_selection("EAP method", false);
    };
    if eap.outer != Some(EapOuter::EapTls) {
        return Ok(());
    }
    if ctx.device_certs_only {
        require_selection("Device-wide user certificate", selected_is_device_wide(ctx, true))?;
        require_selection("Device-wide server CA", selected_is_device_wide(ctx, false))?;
    }
    require_selection("User certificate", ctx.selection.has_valid_user_cert())
}

fn selected_is_device_wide(ctx: &ValidationContext<'_>, user_cert: bool) -> bool {
    let entry = if user_cert {
        ctx.selection
            .user_cert_hash
            .as_deref()
            .and_then(|hash| ctx.catalog.find_user_cert(hash))
    } else {
        ctx.selection
            .server_ca_hash
            .as_deref()
            .and_then(|hash| ctx.catalog.find_server_ca(hash))
    };
    entry.is_some_and(|e| e.device_wide)
}

fn check_vpn(ctx: &ValidationContext<'_>, vpn: &VpnConfig) -> Result<()> {
    require_field("Name", Some(ctx.config.name.as_str()))?;
    require_field("Host", Some(vpn.host.as_str()))?;

    match ctx.vpn_type.unwrap_or_else(|| vpn.config_type()) {
        VpnConfigType::L2tpIpsecPsk => {
            require_field("L2TP username", vpn.l2tp().map(|l| l.username.as_str()))?;
            require_field("IPsec pre-shared key", vpn.ipsec().and_then(|i| i.psk.as_deref()))
        }
        VpnConfigType::L2tpIpsecCert => {
            require_field("L2TP username", vpn.l2tp().map(|l| l.username.as_str()))?;
            require_selection("User certificate", ctx.selection.has_valid_user_cert())
        }
        // Server authentication requirements vary; accept any OpenVPN setup.
        VpnConfigType::OpenVpn => Ok(()),
    }
}

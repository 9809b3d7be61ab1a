// Network Config - Certificate Selection
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Chooses the server CA and user certificate for the working configuration.
//!
//! Selection runs after every change to the catalog, the configuration or
//! the device-wide restriction. It first re-validates what is already
//! selected, then fills in defaults for whatever is unset.

use crate::models::certificate::{DEFAULT_HASH, DO_NOT_CHECK_HASH, NO_CERTS_HASH};
use crate::models::error::{ERROR_NOT_HARDWARE_BACKED, ERROR_NO_USER_CERTIFICATE};
use crate::models::{CertificateCatalog, CertificateEntry, EapConfig, EapOuter};

/// Selected certificate hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub server_ca_hash: Option<String>,
    pub user_cert_hash: Option<String>,
}

impl SelectionState {
    /// Whether the selected user certificate can be submitted.
    pub fn has_valid_user_cert(&self) -> bool {
        self.user_cert_hash
            .as_deref()
            .is_some_and(|hash| !hash.is_empty() && hash != NO_CERTS_HASH)
    }

    /// Whether the system CA store is selected.
    pub fn uses_system_cas(&self) -> bool {
        self.server_ca_hash.as_deref() == Some(DEFAULT_HASH)
    }
}

/// Configuration facts the selector depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionInputs<'a> {
    /// Server CA PEM stored in the existing configuration.
    pub stored_server_ca_pem: Option<&'a str>,
    /// Client certificate PKCS#11 id stored in the existing configuration.
    pub stored_pkcs11_id: Option<&'a str>,
    /// `EAP.UseSystemCAs` of the working configuration.
    pub use_system_cas: Option<bool>,
    /// The network has not been configured yet.
    pub is_new_network: bool,
    /// Only device-wide certificates may be selected.
    pub device_certs_only: bool,
}

/// Shared EAP-TLS networks may only use device-wide certificates.
pub fn device_certs_only(share_network: bool, eap: Option<&EapConfig>) -> bool {
    share_network && eap.is_some_and(|eap| eap.outer == Some(EapOuter::EapTls))
}

/// Compute the next selection state.
///
/// Returns `current` unchanged until the catalog has been loaded.
pub fn select_certificates(
    current: &SelectionState,
    catalog: &CertificateCatalog,
    inputs: &SelectionInputs<'_>,
) -> SelectionState {
    if !catalog.is_loaded() {
        return current.clone();
    }
    let restricted = inputs.device_certs_only;
    let eligible = |entry: &&CertificateEntry| entry.is_eligible(restricted);

    let server_ca_hash = current
        .server_ca_hash
        .as_deref()
        .and_then(|hash| catalog.find_server_ca(hash))
        .filter(eligible)
        .or_else(|| {
            inputs
                .stored_server_ca_pem
                .and_then(|pem| catalog.find_server_ca_by_pem(pem))
                .filter(eligible)
        })
        .map(|entry| entry.hash.clone())
        .unwrap_or_else(|| default_server_ca(catalog, inputs));

    let user_cert_hash = current
        .user_cert_hash
        .as_deref()
        .and_then(|hash| catalog.find_user_cert(hash))
        .filter(eligible)
        .or_else(|| {
            inputs
                .stored_pkcs11_id
                .and_then(|id| find_user_cert_by_id(catalog, id))
                .filter(eligible)
        })
        .or_else(|| catalog.user_certs().iter().find(eligible))
        .map(|entry| entry.hash.clone());

    SelectionState {
        server_ca_hash: Some(server_ca_hash),
        user_cert_hash,
    }
}

fn default_server_ca(catalog: &CertificateCatalog, inputs: &SelectionInputs<'_>) -> String {
    let restricted = inputs.device_certs_only;
    if inputs.use_system_cas == Some(true) {
        if let Some(entry) = catalog.find_server_ca(DEFAULT_HASH).filter(|e| e.is_eligible(restricted)) {
            return entry.hash.clone();
        }
    }
    if inputs.is_new_network {
        if let Some(entry) = catalog
            .server_cas()
            .iter()
            .find(|e| e.hash != DEFAULT_HASH && e.is_eligible(restricted))
        {
            return entry.hash.clone();
        }
    }
    DO_NOT_CHECK_HASH.to_string()
}

/// OpenVPN stores the full `slot:id`; EAP and IPsec ids may omit the slot.
fn find_user_cert_by_id<'a>(catalog: &'a CertificateCatalog, id: &str) -> Option<&'a CertificateEntry> {
    if catalog.is_open_vpn() {
        catalog
            .user_certs()
            .iter()
            .find(|c| !c.is_sentinel() && !id.is_empty() && c.pem_or_id == id)
    } else {
        catalog.find_user_cert_by_pkcs11_id(id)
    }
}

/// Derived certificate error for a configuration that needs a user
/// certificate, or `None` when there is nothing to report.
pub fn certificate_error(
    catalog: &CertificateCatalog,
    requires_user_cert: bool,
    device_certs_only: bool,
) -> Option<&'static str> {
    if !requires_user_cert || !catalog.is_loaded() {
        return None;
    }
    if catalog.has_no_user_certs() {
        return Some(ERROR_NO_USER_CERTIFICATE);
    }
    let any_eligible = catalog
        .user_certs()
        .iter()
        .any(|c| !c.is_sentinel() && c.is_eligible(device_certs_only));
    if any_eligible {
        None
    } else {
        Some(ERROR_NOT_HARDWARE_BACKED)
    }
}

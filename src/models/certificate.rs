// Network Config - Certificates
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Certificate entries and the selectable certificate catalog.
//!
//! The catalog wraps the raw lists returned by the network service and adds
//! sentinel entries for choices that are not real certificates ("use system
//! CAs", "do not check", "no certificate installed", "no user certificate").

use serde::{Deserialize, Serialize};

/// Use the system CA store. Not offered for OpenVPN.
pub const DEFAULT_HASH: &str = "default";
/// Do not verify the server certificate.
pub const DO_NOT_CHECK_HASH: &str = "do-not-check";
/// No usable certificate is installed.
pub const NO_CERTS_HASH: &str = "no-certs";
/// Connect without a user certificate (OpenVPN only).
pub const NO_USER_CERT_HASH: &str = "no-user-cert";

/// Label keys for sentinel entries, resolved by the presentation layer.
pub const LABEL_CA_USE_DEFAULT: &str = "networkCAUseDefault";
pub const LABEL_CA_DO_NOT_CHECK: &str = "networkCADoNotCheck";
pub const LABEL_NO_USER_CERT: &str = "networkNoUserCert";
pub const LABEL_NONE_INSTALLED: &str = "networkCertificateNoneInstalled";

/// Whether a hash names a synthesized entry.
pub fn is_sentinel_hash(hash: &str) -> bool {
    matches!(hash, DEFAULT_HASH | DO_NOT_CHECK_HASH | NO_CERTS_HASH | NO_USER_CERT_HASH)
}

/// One selectable certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateEntry {
    /// Identifier used for selection. Empty when the certificate is unusable.
    pub hash: String,
    /// PEM for server CAs, PKCS#11 id (`slot:id`) for user certificates.
    #[serde(default)]
    pub pem_or_id: String,
    #[serde(default)]
    pub issued_by: String,
    #[serde(default)]
    pub issued_to: String,
    #[serde(default)]
    pub hardware_backed: bool,
    #[serde(default)]
    pub device_wide: bool,
}

impl CertificateEntry {
    /// Synthesized entry. Sentinels are usable by every user of the device.
    pub fn sentinel(hash: &str, label: &str) -> Self {
        Self {
            hash: hash.to_string(),
            pem_or_id: String::new(),
            issued_by: label.to_string(),
            issued_to: String::new(),
            hardware_backed: false,
            device_wide: true,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        is_sentinel_hash(&self.hash)
    }

    /// Whether the entry can be selected at all.
    pub fn is_usable(&self) -> bool {
        !self.hash.is_empty()
    }

    /// Whether the entry may be selected under the given restriction.
    pub fn is_eligible(&self, device_certs_only: bool) -> bool {
        self.is_usable() && (!device_certs_only || self.device_wide)
    }
}

/// Raw lists as returned by the network service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateLists {
    pub server_cas: Vec<CertificateEntry>,
    pub user_certs: Vec<CertificateEntry>,
}

/// Selectable server CA and user certificate lists, sentinels included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateCatalog {
    server_cas: Vec<CertificateEntry>,
    user_certs: Vec<CertificateEntry>,
    is_open_vpn: bool,
}

impl CertificateCatalog {
    /// Build the catalog from raw lists.
    ///
    /// Server CAs get a leading `DEFAULT` entry (except for OpenVPN) and a
    /// trailing `DO_NOT_CHECK` entry. User certificates that are not
    /// hardware backed lose their hash. OpenVPN gets a leading
    /// `NO_USER_CERT` entry, and an otherwise empty list becomes a single
    /// `NO_CERTS` entry.
    pub fn build(lists: &CertificateLists, is_open_vpn: bool) -> Self {
        let mut server_cas = Vec::with_capacity(lists.server_cas.len() + 2);
        if !is_open_vpn {
            server_cas.push(CertificateEntry::sentinel(DEFAULT_HASH, LABEL_CA_USE_DEFAULT));
        }
        server_cas.extend(lists.server_cas.iter().cloned());
        server_cas.push(CertificateEntry::sentinel(DO_NOT_CHECK_HASH, LABEL_CA_DO_NOT_CHECK));

        let mut user_certs: Vec<CertificateEntry> = lists
            .user_certs
            .iter()
            .cloned()
            .map(|mut cert| {
                if !cert.hardware_backed {
                    cert.hash.clear();
                }
                cert
            })
            .collect();
        if is_open_vpn {
            user_certs.insert(0, CertificateEntry::sentinel(NO_USER_CERT_HASH, LABEL_NO_USER_CERT));
        }
        if user_certs.is_empty() {
            user_certs.push(CertificateEntry::sentinel(NO_CERTS_HASH, LABEL_NONE_INSTALLED));
        }

        Self {
            server_cas,
            user_certs,
            is_open_vpn,
        }
    }

    pub fn server_cas(&self) -> &[CertificateEntry] {
        &self.server_cas
    }

    pub fn user_certs(&self) -> &[CertificateEntry] {
        &self.user_certs
    }

    pub fn is_open_vpn(&self) -> bool {
        self.is_open_vpn
    }

    /// Whether the catalog has been built from a service response.
    pub fn is_loaded(&self) -> bool {
        !self.server_cas.is_empty()
    }

    pub fn find_server_ca(&self, hash: &str) -> Option<&CertificateEntry> {
        find_by_hash(&self.server_cas, hash)
    }

    pub fn find_user_cert(&self, hash: &str) -> Option<&CertificateEntry> {
        find_by_hash(&self.user_certs, hash)
    }

    /// Server CA whose PEM equals `pem`.
    pub fn find_server_ca_by_pem(&self, pem: &str) -> Option<&CertificateEntry> {
        if pem.is_empty() {
            return None;
        }
        self.server_cas.iter().find(|c| !c.is_sentinel() && c.pem_or_id == pem)
    }

    /// User certificate whose PKCS#11 id contains `id`.
    ///
    /// Catalog ids are always `slot:id`; stored EAP and IPsec ids may omit
    /// the slot, so a substring match covers both forms.
    pub fn find_user_cert_by_pkcs11_id(&self, id: &str) -> Option<&CertificateEntry> {
        if id.is_empty() {
            return None;
        }
        self.user_certs.iter().find(|c| !c.is_sentinel() && c.pem_or_id.contains(id))
    }

    /// True when the user certificate list holds only the `NO_CERTS` entry.
    pub fn has_no_user_certs(&self) -> bool {
        self.user_certs.first().map(|c| c.hash == NO_CERTS_HASH).unwrap_or(true)
    }
}

fn find_by_hash<'a>(certs: &'a [CertificateEntry], hash: &str) -> Option<&'a CertificateEntry> {
    if hash.is_empty() {
        return None;
    }
    certs.iter().find(|c| c.hash == hash)
}

// Network Config - Edit Session
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! One configuration edit session.
//!
//! A session owns the working configuration of a single network from the
//! moment its snapshot is known until it is saved, connected or dropped.
//! Every mutation ends in [`ConfigSession::recompute`], which runs the
//! reconcile, select and validate stages in that order.
//!
//! Events are handled one at a time; a session is never shared between
//! tasks, so it holds no locks.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::derive::{derive, Derived};
use super::payload::{build_payload, PayloadContext};
use super::reconcile::{reconcile_eap_inner, reconcile_security, reconcile_vpn_type};
use super::selector::{self, SelectionInputs, SelectionState};
use super::validate::{self, ValidationContext, MIN_PASSPHRASE_LENGTH};
use super::visibility::{self, EapFields, VpnFields};
use crate::models::error::is_certificate_error;
use crate::models::{
    AppConfig, CertificateCatalog, CertificateLists, ConfigProperties, ConnectionState, EapConfig,
    EapOuter, Error, GlobalPolicy, ManagedProperties, NetworkType, Result, SecurityType,
    ShareOptions, Source, StartConnectResult, VpnConfigType,
};
use crate::services::NetworkService;

/// Host-provided options for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub share: ShareOptions,
    pub min_passphrase_length: usize,
    /// Policy to use instead of asking the service.
    pub global_policy: Option<GlobalPolicy>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            share: ShareOptions::default(),
            min_passphrase_length: MIN_PASSPHRASE_LENGTH,
            global_policy: None,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            share: config.share_options(),
            min_passphrase_length: config.min_passphrase_length,
            global_policy: config.global_policy,
        }
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the snapshot of an existing network.
    Loading,
    Editing,
    /// Saved, connected, or the network disappeared.
    Closed,
}

/// Result of a save or connect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission is in flight, or the configuration is incomplete.
    Ignored,
    /// The configuration was stored and the session closed.
    Saved { guid: String },
    /// A connection was requested and the session closed.
    ConnectRequested {
        guid: String,
        result: StartConnectResult,
    },
}

/// Edit session for one network.
pub struct ConfigSession {
    service: Arc<dyn NetworkService>,
    options: SessionOptions,
    network_type: NetworkType,
    guid: Option<String>,
    snapshot: ManagedProperties,
    state: SessionState,
    properties_received: bool,

    config: Option<ConfigProperties>,
    security: SecurityType,
    vpn_type: Option<VpnConfigType>,
    vpn_save_credentials: bool,
    auto_connect_override: Option<bool>,
    share_network: bool,
    /// Security and outer method the share flag was last derived for.
    share_derived_for: Option<(SecurityType, Option<EapOuter>)>,

    certificates: Option<CertificateLists>,
    catalog: CertificateCatalog,
    selection: SelectionState,
    device_certs_only: bool,

    is_configured: bool,
    error: String,
    in_flight: bool,
}

impl ConfigSession {
    /// Start a session from an initial snapshot.
    ///
    /// A snapshot with a GUID names an existing network whose properties are
    /// fetched by [`init`](Self::init); otherwise the snapshot seeds a new
    /// network and is derived immediately.
    pub fn new(
        service: Arc<dyn NetworkService>,
        options: SessionOptions,
        snapshot: ManagedProperties,
    ) -> Self {
        let guid = snapshot.guid().map(str::to_string);
        let state = if guid.is_some() {
            SessionState::Loading
        } else {
            SessionState::Editing
        };

        let mut session = Self {
            service,
            options,
            network_type: snapshot.network_type,
            guid,
            snapshot,
            state,
            properties_received: false,
            config: None,
            security: SecurityType::None,
            vpn_type: None,
            vpn_save_credentials: false,
            auto_connect_override: None,
            share_network: false,
            share_derived_for: None,
            certificates: None,
            catalog: CertificateCatalog::default(),
            selection: SelectionState::default(),
            device_certs_only: false,
            is_configured: false,
            error: String::new(),
            in_flight: false,
        };
        if session.state == SessionState::Editing {
            session.apply_derived(derive(&session.snapshot));
        }
        session.recompute();
        session
    }

    /// Fetch policy, snapshot and certificates from the service.
    pub async fn init(&mut self) -> Result<()> {
        if self.options.global_policy.is_none() {
            match self.service.fetch_global_policy().await {
                Ok(policy) => self.options.global_policy = Some(policy),
                Err(e) => warn!("Failed to fetch global policy: {}", e),
            }
        }

        if let Some(guid) = self.guid.clone() {
            debug!("Fetching managed properties for {}", guid);
            let snapshot = self.service.fetch_managed_properties(&guid).await?;
            self.on_managed_properties(snapshot)?;
        }

        let certificates = self.service.fetch_certificates().await?;
        self.on_certificate_lists(certificates);
        Ok(())
    }

    // ========================================================================
    // External events
    // ========================================================================

    /// Handle a snapshot fetch. `None` means the network no longer exists.
    pub fn on_managed_properties(&mut self, snapshot: Option<ManagedProperties>) -> Result<()> {
        let Some(snapshot) = snapshot else {
            let guid = self.guid.clone().unwrap_or_default();
            error!("Network no longer exists: {}", guid);
            self.close();
            return Err(Error::NetworkNotFound(guid));
        };

        if let Some(guid) = snapshot.guid() {
            self.guid = Some(guid.to_string());
        }
        self.network_type = snapshot.network_type;
        self.error = snapshot.error_state.clone().unwrap_or_default();
        let derived = derive(&snapshot);
        self.snapshot = snapshot;
        self.properties_received = true;
        if self.state == SessionState::Loading {
            self.state = SessionState::Editing;
        }
        self.apply_derived(derived);
        self.recompute();
        Ok(())
    }

    /// Handle a certificate list refresh.
    pub fn on_certificate_lists(&mut self, certificates: CertificateLists) {
        debug!(
            "Certificate lists: {} server CAs, {} user certificates",
            certificates.server_cas.len(),
            certificates.user_certs.len()
        );
        self.catalog = CertificateCatalog::build(&certificates, self.is_open_vpn());
        self.certificates = Some(certificates);
        self.recompute();
    }

    pub fn on_global_policy(&mut self, policy: GlobalPolicy) {
        self.options.global_policy = Some(policy);
        self.recompute();
    }

    fn apply_derived(&mut self, derived: Derived) {
        self.config = Some(derived.config);
        self.security = derived.security;
        self.vpn_type = derived.vpn_type;
        self.vpn_save_credentials = derived.vpn_save_credentials;
        self.share_derived_for = None;
    }

    // ========================================================================
    // User edits
    // ========================================================================

    /// Change the security type.
    pub fn set_security(&mut self, security: SecurityType) -> Result<()> {
        if !visibility::security_items(self.network_type).contains(&security) {
            return Err(Error::ValidationFailed(format!(
                "{} is not offered for {} networks",
                security.as_str(),
                self.network_type
            )));
        }
        if security != self.security && !self.security_is_enabled() {
            return Err(Error::ValidationFailed(
                "Security cannot be changed for a configured network".to_string(),
            ));
        }
        self.security = security;
        self.recompute();
        Ok(())
    }

    pub fn set_vpn_type(&mut self, vpn_type: VpnConfigType) -> Result<()> {
        if self.network_type != NetworkType::Vpn {
            return Err(Error::ValidationFailed(format!(
                "VPN type does not apply to {} networks",
                self.network_type
            )));
        }
        self.vpn_type = Some(vpn_type);
        self.recompute();
        Ok(())
    }

    /// Change the EAP outer method. The inner method is reset if needed.
    pub fn set_eap_outer(&mut self, outer: EapOuter) -> Result<()> {
        self.edit(|config| match config.eap_mut() {
            Some(eap) => {
                eap.outer = Some(outer);
                Ok(())
            }
            None => Err(Error::ValidationFailed("EAP is not enabled".to_string())),
        })
    }

    /// Apply an arbitrary field edit to the working configuration.
    ///
    /// The security type and VPN type are owned by the session; use
    /// [`set_security`](Self::set_security) and
    /// [`set_vpn_type`](Self::set_vpn_type) to change them.
    pub fn edit<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ConfigProperties) -> Result<()>,
    {
        self.ensure_open()?;
        let config = self.config.as_mut().ok_or(Error::NotDerived)?;
        let result = f(config);
        self.recompute();
        result
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.edit(|config| {
            config.name = name;
            Ok(())
        })
    }

    pub fn set_ssid(&mut self, ssid: &str) -> Result<()> {
        let ssid = ssid.to_string();
        self.edit(|config| {
            let wifi = config.wifi_mut().ok_or_else(|| not_applicable("SSID"))?;
            wifi.ssid = ssid;
            Ok(())
        })
    }

    pub fn set_passphrase(&mut self, passphrase: &str) -> Result<()> {
        let passphrase = passphrase.to_string();
        self.edit(|config| {
            let wifi = config.wifi_mut().ok_or_else(|| not_applicable("Passphrase"))?;
            wifi.passphrase = Some(passphrase);
            Ok(())
        })
    }

    pub fn set_eap_identity(&mut self, identity: &str) -> Result<()> {
        let identity = identity.to_string();
        self.edit_eap(|eap| eap.identity = Some(identity))
    }

    pub fn set_eap_password(&mut self, password: &str) -> Result<()> {
        let password = password.to_string();
        self.edit_eap(|eap| eap.password = Some(password))
    }

    fn edit_eap<F: FnOnce(&mut EapConfig)>(&mut self, f: F) -> Result<()> {
        self.edit(|config| {
            let eap = config.eap_mut().ok_or_else(|| not_applicable("EAP"))?;
            f(eap);
            Ok(())
        })
    }

    pub fn set_vpn_host(&mut self, host: &str) -> Result<()> {
        let host = host.to_string();
        self.edit(|config| {
            let vpn = config.vpn_mut().ok_or_else(|| not_applicable("Host"))?;
            vpn.host = host;
            Ok(())
        })
    }

    pub fn set_l2tp_credentials(&mut self, username: &str, password: &str) -> Result<()> {
        let (username, password) = (username.to_string(), password.to_string());
        self.edit(|config| {
            let l2tp = config
                .vpn_mut()
                .and_then(|vpn| vpn.l2tp_mut())
                .ok_or_else(|| not_applicable("L2TP credentials"))?;
            l2tp.username = username;
            l2tp.password = password;
            Ok(())
        })
    }

    pub fn set_ipsec_psk(&mut self, psk: &str) -> Result<()> {
        let psk = psk.to_string();
        self.edit(|config| {
            let ipsec = config
                .vpn_mut()
                .and_then(|vpn| vpn.ipsec_mut())
                .ok_or_else(|| not_applicable("IPsec pre-shared key"))?;
            ipsec.psk = Some(psk);
            Ok(())
        })
    }

    pub fn set_openvpn_credentials(
        &mut self,
        username: Option<&str>,
        password: Option<&str>,
        otp: Option<&str>,
    ) -> Result<()> {
        let username = username.map(str::to_string);
        let password = password.map(str::to_string);
        let otp = otp.map(str::to_string);
        self.edit(|config| {
            let openvpn = config
                .vpn_mut()
                .and_then(|vpn| vpn.openvpn_mut())
                .ok_or_else(|| not_applicable("OpenVPN credentials"))?;
            openvpn.username = username;
            openvpn.password = password;
            openvpn.otp = otp;
            Ok(())
        })
    }

    /// Record an explicit auto-connect choice.
    pub fn set_auto_connect(&mut self, enabled: bool) -> Result<()> {
        self.edit(|config| {
            config.set_auto_connect(Some(enabled));
            Ok(())
        })?;
        self.auto_connect_override = Some(enabled);
        Ok(())
    }

    pub fn set_vpn_save_credentials(&mut self, save: bool) -> Result<()> {
        if self.network_type != NetworkType::Vpn {
            return Err(not_applicable("Save credentials"));
        }
        self.vpn_save_credentials = save;
        self.recompute();
        Ok(())
    }

    /// Change whether a new network is shared with other users.
    pub fn set_share_network(&mut self, share: bool) -> Result<()> {
        if share != self.share_network && !self.share_is_enabled() {
            return Err(Error::ValidationFailed(
                "Sharing cannot be changed for this network".to_string(),
            ));
        }
        self.share_network = share;
        self.recompute();
        Ok(())
    }

    pub fn select_server_ca(&mut self, hash: &str) {
        self.selection.server_ca_hash = Some(hash.to_string());
        self.recompute();
    }

    pub fn select_user_cert(&mut self, hash: &str) {
        self.selection.user_cert_hash = Some(hash.to_string());
        self.recompute();
    }

    // ========================================================================
    // Recomputation
    // ========================================================================

    /// Bring every derived value up to date with the working configuration.
    pub fn recompute(&mut self) {
        let Some(config) = self.config.as_mut() else {
            self.is_configured = false;
            return;
        };

        reconcile_security(config, self.security);
        if let (Some(vpn), Some(vpn_type)) = (config.vpn_mut(), self.vpn_type) {
            reconcile_vpn_type(vpn, vpn_type);
        }
        if let Some(eap) = config.eap_mut() {
            reconcile_eap_inner(eap);
        }

        let share_inputs = (self.security, config.eap().and_then(|eap| eap.outer));
        if self.share_derived_for != Some(share_inputs) {
            self.share_derived_for = Some(share_inputs);
            self.derive_share_network();
        }

        let Some(config) = self.config.as_ref() else {
            return;
        };
        self.device_certs_only = selector::device_certs_only(self.share_network, config.eap());

        let is_open_vpn = self.vpn_type == Some(VpnConfigType::OpenVpn);
        if let Some(certificates) = &self.certificates {
            if self.catalog.is_open_vpn() != is_open_vpn {
                self.catalog = CertificateCatalog::build(certificates, is_open_vpn);
            }
        }

        let (stored_server_ca_pem, stored_pkcs11_id, use_system_cas) = match config.vpn() {
            Some(vpn) if self.vpn_type != Some(VpnConfigType::L2tpIpsecPsk) => {
                (vpn.server_ca_pem(), vpn.pkcs11_id(), None)
            }
            Some(_) => (None, None, None),
            None => match config.eap() {
                Some(eap) => (eap.server_ca_pem(), eap.pkcs11_id(), eap.use_system_cas),
                None => (None, None, None),
            },
        };
        let inputs = SelectionInputs {
            stored_server_ca_pem,
            stored_pkcs11_id,
            use_system_cas,
            is_new_network: self.guid.is_none(),
            device_certs_only: self.device_certs_only,
        };
        self.selection = selector::select_certificates(&self.selection, &self.catalog, &inputs);

        self.is_configured = validate::is_configured(&ValidationContext {
            config,
            security: self.security,
            vpn_type: self.vpn_type,
            catalog: &self.catalog,
            selection: &self.selection,
            device_certs_only: self.device_certs_only,
            min_passphrase_length: self.options.min_passphrase_length,
        });

        self.update_certificate_error();
    }

    /// Derive the share flag for the current source and security.
    ///
    /// Does nothing until the configuration has been derived.
    fn derive_share_network(&mut self) {
        if self.config.is_none() {
            return;
        }
        let source = self.source();
        self.share_network = if source != Source::None {
            source.is_shared()
        } else if !self.share_is_visible() {
            false
        } else if self.options.share.allow_enable
            && self.network_type == NetworkType::WiFi
            && self.security == SecurityType::None
        {
            true
        } else {
            self.options.share.default_shared
        };
        debug!("Share network: {}", self.share_network);
    }

    /// Certificate errors replace each other but never a service error.
    fn update_certificate_error(&mut self) {
        if !self.error.is_empty() && !is_certificate_error(&self.error) {
            return;
        }
        let required = visibility::requires_user_cert(self.eap_fields(), self.vpn_fields());
        self.error = selector::certificate_error(&self.catalog, required, self.device_certs_only)
            .unwrap_or_default()
            .to_string();
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// The payload that would be submitted now.
    pub fn payload(&self) -> Result<ConfigProperties> {
        let config = self.config.as_ref().ok_or(Error::NotDerived)?;
        Ok(build_payload(
            config,
            &PayloadContext {
                guid: self.guid.as_deref(),
                catalog: &self.catalog,
                selection: &self.selection,
                vpn_save_credentials: self.vpn_save_credentials,
                auto_connect_override: self.auto_connect_override,
                global_policy: self.options.global_policy.as_ref(),
            },
        ))
    }

    pub async fn save(&mut self) -> Result<SubmitOutcome> {
        self.save_and_connect(false).await
    }

    pub async fn connect(&mut self) -> Result<SubmitOutcome> {
        self.save_and_connect(true).await
    }

    /// Save and connect, but only when the configuration is complete.
    pub async fn connect_if_configured(&mut self) -> Result<SubmitOutcome> {
        if !self.is_configured {
            return Ok(SubmitOutcome::Ignored);
        }
        self.connect().await
    }

    /// Submit the configuration, then connect when `connect` is set.
    ///
    /// An incomplete configuration is not submitted. At most one submission
    /// is in flight; a second call while one is pending returns
    /// [`SubmitOutcome::Ignored`].
    pub async fn save_and_connect(&mut self, connect: bool) -> Result<SubmitOutcome> {
        self.ensure_open()?;
        if !self.is_configured {
            debug!("Configuration incomplete, not submitting");
            return Ok(SubmitOutcome::Ignored);
        }
        if self.in_flight {
            debug!("Submission already in flight");
            return Ok(SubmitOutcome::Ignored);
        }
        let payload = self.payload()?;
        self.in_flight = true;
        self.error.clear();

        if self.source() == Source::None {
            info!("Creating {} network (shared: {})", self.network_type, self.share_network);
            let response = self.service.create_network(&payload, self.share_network).await;
            let guid = match response {
                Ok(response) => match response.guid {
                    Some(guid) => guid,
                    None => return Err(self.submission_failed(response.error_message, "create-network-failed")),
                },
                Err(e) => return Err(self.submission_failed(e.error_key(), "create-network-failed")),
            };
            if connect {
                return self.start_connect(guid).await;
            }
            self.close();
            Ok(SubmitOutcome::Saved { guid })
        } else {
            let guid = self.guid.clone().ok_or(Error::NotDerived)?;
            info!("Updating network {}", guid);
            match self.service.update_network(&guid, &payload).await {
                Ok(response) if response.success => {}
                Ok(response) => {
                    return Err(self.submission_failed(response.error_message, "set-properties-failed"))
                }
                Err(e) => return Err(self.submission_failed(e.error_key(), "set-properties-failed")),
            }
            let not_connected = matches!(
                self.snapshot.connection_state,
                None | Some(ConnectionState::NotConnected)
            );
            if connect && not_connected {
                return self.start_connect(guid).await;
            }
            self.close();
            Ok(SubmitOutcome::Saved { guid })
        }
    }

    async fn start_connect(&mut self, guid: String) -> Result<SubmitOutcome> {
        let response = match self.service.start_connect(&guid).await {
            Ok(response) => response,
            Err(e) => {
                let key = e.error_key();
                error!("Error connecting to network: {}", key);
                self.error = key.clone();
                self.in_flight = false;
                return Err(Error::connect_failed(StartConnectResult::OtherFailure, key));
            }
        };
        if response.result.is_terminal() {
            info!("Connect request for {}: {}", guid, response.result);
            self.close();
            return Ok(SubmitOutcome::ConnectRequested {
                guid,
                result: response.result,
            });
        }
        let err = Error::connect_failed(response.result, response.message);
        error!("Error connecting to network: {}", err);
        self.error = err.error_key();
        self.in_flight = false;
        Err(err)
    }

    fn submission_failed(&mut self, message: String, fallback: &str) -> Error {
        let key = if message.is_empty() {
            fallback.to_string()
        } else {
            message
        };
        error!("{} network error: {}", self.network_type, key);
        self.error = key.clone();
        self.in_flight = false;
        Error::SubmissionFailed(key)
    }

    /// End the session and scrub credentials from memory.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        debug!("Closing session for {}", self.guid.as_deref().unwrap_or("new network"));
        self.state = SessionState::Closed;
        if let Some(config) = self.config.as_mut() {
            config.zeroize_credentials();
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == SessionState::Closed {
            Err(Error::SessionClosed)
        } else {
            Ok(())
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn guid(&self) -> Option<&str> {
        self.guid.as_deref()
    }

    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    pub fn config(&self) -> Option<&ConfigProperties> {
        self.config.as_ref()
    }

    pub fn security(&self) -> SecurityType {
        self.security
    }

    pub fn vpn_type(&self) -> Option<VpnConfigType> {
        self.vpn_type
    }

    pub fn vpn_save_credentials(&self) -> bool {
        self.vpn_save_credentials
    }

    pub fn catalog(&self) -> &CertificateCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn share_network(&self) -> bool {
        self.share_network
    }

    pub fn device_certs_only(&self) -> bool {
        self.device_certs_only
    }

    /// Opaque error key, empty when there is none.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn is_configured(&self) -> bool {
        self.is_configured
    }

    pub fn enable_save(&self) -> bool {
        self.is_configured && self.properties_received
    }

    pub fn enable_connect(&self) -> bool {
        self.is_configured && !self.in_flight
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Where the network's configuration comes from; `None` for new networks.
    pub fn source(&self) -> Source {
        if self.guid.is_none() {
            Source::None
        } else {
            self.snapshot.source
        }
    }

    pub fn eap_fields(&self) -> Option<EapFields> {
        let eap = self.config.as_ref().and_then(ConfigProperties::eap);
        visibility::eap_fields(self.network_type, self.security, eap)
    }

    pub fn vpn_fields(&self) -> Option<VpnFields> {
        visibility::vpn_fields(self.vpn_type)
    }

    pub fn security_is_enabled(&self) -> bool {
        visibility::security_is_enabled(self.network_type, self.guid.is_none())
            && !self.snapshot.security_is_enforced()
    }

    pub fn share_is_visible(&self) -> bool {
        visibility::share_is_visible(self.network_type, self.source())
    }

    pub fn share_is_enabled(&self) -> bool {
        visibility::share_is_enabled(
            self.network_type,
            self.source(),
            self.security,
            self.options.share.allow_enable,
        )
    }

    fn is_open_vpn(&self) -> bool {
        self.vpn_type == Some(VpnConfigType::OpenVpn)
    }
}

impl Drop for ConfigSession {
    fn drop(&mut self) {
        if let Some(config) = self.config.as_mut() {
            config.zeroize_credentials();
        }
    }
}

fn not_applicable(field: &str) -> Error {
    Error::ValidationFailed(format!("{} does not apply to this network", field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::{DO_NOT_CHECK_HASH, NO_CERTS_HASH};
    use crate::models::error::{ERROR_NOT_HARDWARE_BACKED, ERROR_NO_USER_CERTIFICATE};
    use crate::models::managed::{ManagedVpn, ManagedWifi};
    use crate::models::{CertificateEntry, ManagedValue, VpnType};
    use crate::services::MemoryNetworkService;

    fn cert(hash: &str, id: &str, hardware_backed: bool, device_wide: bool) -> CertificateEntry {
        CertificateEntry {
            hash: hash.to_string(),
            pem_or_id: id.to_string(),
            issued_by: "Issuer".to_string(),
            issued_to: "Subject".to_string(),
            hardware_backed,
            device_wide,
        }
    }

    fn new_session(service: &Arc<MemoryNetworkService>, network_type: NetworkType) -> ConfigSession {
        let service: Arc<dyn NetworkService> = service.clone();
        ConfigSession::new(
            service,
            SessionOptions::default(),
            ManagedProperties::new_network(network_type),
        )
    }

    fn existing_wifi(guid: &str, source: Source) -> ManagedProperties {
        let mut snapshot = ManagedProperties::new_network(NetworkType::WiFi);
        snapshot.guid = Some(guid.to_string());
        snapshot.source = source;
        snapshot.name = Some(ManagedValue::user("Home".to_string()));
        snapshot.wifi = Some(ManagedWifi {
            ssid: Some(ManagedValue::user("home".to_string())),
            passphrase: Some(ManagedValue::user("secret1".to_string())),
            security: Some(ManagedValue::user(SecurityType::WpaPsk)),
            ..Default::default()
        });
        snapshot
    }

    #[tokio::test]
    async fn test_new_wifi_not_configured() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        session.init().await.unwrap();
        assert_eq!(session.state(), SessionState::Editing);
        assert!(!session.is_configured());
        assert!(!session.enable_save());
    }

    #[tokio::test]
    async fn test_new_wifi_passphrase_scenario() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        session.init().await.unwrap();
        session.set_security(SecurityType::WpaPsk).unwrap();
        session.set_ssid("home").unwrap();
        session.set_passphrase("abcd").unwrap();
        assert!(!session.is_configured());
        session.set_passphrase("abcde").unwrap();
        assert!(session.is_configured());
        assert!(session.enable_connect());
    }

    #[tokio::test]
    async fn test_incomplete_wifi_is_not_submitted() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        session.init().await.unwrap();
        session.set_security(SecurityType::WpaPsk).unwrap();
        assert!(!session.is_configured());

        assert_eq!(session.save().await.unwrap(), SubmitOutcome::Ignored);
        assert_eq!(session.connect().await.unwrap(), SubmitOutcome::Ignored);
        assert!(service.created().is_empty());
        assert!(service.connect_requests().is_empty());
        assert!(!session.is_in_flight());
        assert_eq!(session.state(), SessionState::Editing);

        session.set_ssid("home").unwrap();
        session.set_passphrase("abcde").unwrap();
        assert!(matches!(session.save().await.unwrap(), SubmitOutcome::Saved { .. }));
        assert_eq!(service.created().len(), 1);
    }

    #[tokio::test]
    async fn test_open_wifi_is_shared() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        assert!(session.share_network());
        assert!(!session.share_is_enabled());
        assert!(session.set_share_network(false).is_err());

        session.set_security(SecurityType::WpaPsk).unwrap();
        assert!(!session.share_network());
        assert!(session.share_is_enabled());
        session.set_share_network(true).unwrap();
        assert!(session.share_network());
        session.init().await.unwrap();
        assert!(session.share_network());
    }

    #[tokio::test]
    async fn test_create_and_connect() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        session.init().await.unwrap();
        session.set_ssid("cafe").unwrap();

        let outcome = session.connect().await.unwrap();
        let created = service.created();
        assert_eq!(created.len(), 1);
        assert!(created[0].shared);
        assert_eq!(created[0].config.wifi().unwrap().ssid, "cafe");
        assert_eq!(created[0].config.auto_connect(), None);
        assert_eq!(
            outcome,
            SubmitOutcome::ConnectRequested {
                guid: created[0].guid.clone(),
                result: StartConnectResult::Success
            }
        );
        assert_eq!(session.state(), SessionState::Closed);
        assert!(matches!(session.save().await, Err(Error::SessionClosed)));
    }

    #[tokio::test]
    async fn test_create_without_connect_closes() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        session.set_ssid("cafe").unwrap();
        let outcome = session.save().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Saved { .. }));
        assert!(service.connect_requests().is_empty());
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_create_failure_clears_in_flight() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        session.set_ssid("cafe").unwrap();
        service.fail_next_create("Error.AlreadyExists");

        let err = session.save().await.unwrap_err();
        assert!(matches!(err, Error::SubmissionFailed(_)));
        assert_eq!(session.error(), "Error.AlreadyExists");
        assert!(!session.is_in_flight());
        assert_eq!(session.state(), SessionState::Editing);

        assert!(matches!(session.save().await.unwrap(), SubmitOutcome::Saved { .. }));
    }

    #[tokio::test]
    async fn test_connect_failure_surfaces_error() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        session.set_ssid("cafe").unwrap();
        service.push_connect_result(StartConnectResult::OtherFailure, "connect-failed");

        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, Error::ConnectFailed { .. }));
        assert_eq!(session.error(), "connect-failed");
        assert!(session.enable_connect());
    }

    #[tokio::test]
    async fn test_invalid_state_closes() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        session.set_ssid("cafe").unwrap();
        service.push_connect_result(StartConnectResult::InvalidState, "connecting");
        let outcome = session.connect().await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::ConnectRequested {
                result: StartConnectResult::InvalidState,
                ..
            }
        ));
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_existing_network_update() {
        let service = Arc::new(
            MemoryNetworkService::new().with_network(existing_wifi("wifi-1", Source::User)),
        );
        let service_dyn: Arc<dyn NetworkService> = service.clone();
        let mut seed = ManagedProperties::new_network(NetworkType::WiFi);
        seed.guid = Some("wifi-1".to_string());
        let mut session = ConfigSession::new(service_dyn, SessionOptions::default(), seed);
        assert_eq!(session.state(), SessionState::Loading);
        assert!(session.config().is_none());

        session.init().await.unwrap();
        assert!(session.is_configured());
        assert!(session.enable_save());
        assert!(!session.security_is_enabled());
        assert!(session.set_security(SecurityType::None).is_err());

        let outcome = session.connect().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::ConnectRequested { .. }));
        let updated = service.updated();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].0, "wifi-1");
        assert_eq!(updated[0].1.guid.as_deref(), Some("wifi-1"));
        assert!(service.created().is_empty());
    }

    #[tokio::test]
    async fn test_connected_network_not_reconnected() {
        let mut snapshot = existing_wifi("wifi-1", Source::Device);
        snapshot.connection_state = Some(ConnectionState::Connected);
        let service = Arc::new(MemoryNetworkService::new().with_network(snapshot.clone()));
        let service_dyn: Arc<dyn NetworkService> = service.clone();
        let mut session = ConfigSession::new(service_dyn, SessionOptions::default(), snapshot);
        session.init().await.unwrap();
        assert!(session.share_network());

        let outcome = session.connect().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Saved { guid: "wifi-1".to_string() });
        assert!(service.connect_requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_network_closes() {
        let service = Arc::new(MemoryNetworkService::new());
        let service_dyn: Arc<dyn NetworkService> = service.clone();
        let mut seed = ManagedProperties::new_network(NetworkType::WiFi);
        seed.guid = Some("gone".to_string());
        let mut session = ConfigSession::new(service_dyn, SessionOptions::default(), seed);
        let err = session.init().await.unwrap_err();
        assert!(matches!(err, Error::NetworkNotFound(_)));
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_snapshot_error_state_kept_over_cert_error() {
        let mut snapshot = existing_wifi("wifi-1", Source::User);
        snapshot.error_state = Some("bad-passphrase".to_string());
        let service = Arc::new(MemoryNetworkService::new().with_network(snapshot.clone()));
        let service_dyn: Arc<dyn NetworkService> = service.clone();
        let mut session = ConfigSession::new(service_dyn, SessionOptions::default(), snapshot);
        session.init().await.unwrap();
        assert_eq!(session.error(), "bad-passphrase");
    }

    #[tokio::test]
    async fn test_eap_tls_without_user_certs() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        session.init().await.unwrap();
        session.set_ssid("corp").unwrap();
        session.set_security(SecurityType::WpaEap).unwrap();
        assert_eq!(session.config().unwrap().eap().unwrap().outer, Some(EapOuter::Leap));
        assert_eq!(session.error(), "");

        session.set_eap_outer(EapOuter::EapTls).unwrap();
        assert_eq!(session.selection().user_cert_hash.as_deref(), Some(NO_CERTS_HASH));
        assert_eq!(session.error(), ERROR_NO_USER_CERTIFICATE);
        assert!(!session.is_configured());

        session.set_eap_outer(EapOuter::Peap).unwrap();
        assert_eq!(session.error(), "");
        assert!(session.is_configured());
    }

    #[tokio::test]
    async fn test_eap_tls_shared_requires_device_wide() {
        let service = Arc::new(MemoryNetworkService::new().with_certificates(CertificateLists {
            server_cas: vec![cert("ca1", "PEM1", false, true)],
            user_certs: vec![cert("u1", "1:aa", true, false)],
        }));
        let mut session = new_session(&service, NetworkType::WiFi);
        session.init().await.unwrap();
        session.set_ssid("corp").unwrap();
        session.set_security(SecurityType::WpaEap).unwrap();
        session.set_eap_outer(EapOuter::EapTls).unwrap();
        assert_eq!(session.selection().user_cert_hash.as_deref(), Some("u1"));
        assert!(session.is_configured());

        session.set_share_network(true).unwrap();
        assert!(session.device_certs_only());
        assert_eq!(session.selection().user_cert_hash, None);
        assert_eq!(session.error(), ERROR_NOT_HARDWARE_BACKED);
        assert!(!session.is_configured());
    }

    #[tokio::test]
    async fn test_eap_payload_uses_selection() {
        let service = Arc::new(MemoryNetworkService::new().with_certificates(CertificateLists {
            server_cas: vec![cert("ca1", "PEM1", false, true)],
            user_certs: vec![cert("u1", "1:aa", true, true)],
        }));
        let mut session = new_session(&service, NetworkType::Ethernet);
        session.init().await.unwrap();
        session.set_security(SecurityType::WpaEap).unwrap();
        session.set_eap_outer(EapOuter::EapTls).unwrap();
        assert_eq!(session.selection().server_ca_hash.as_deref(), Some("ca1"));
        session.select_server_ca(DO_NOT_CHECK_HASH);

        let payload = session.payload().unwrap();
        let eap = payload.eap().unwrap();
        assert!(eap.server_ca_pems.is_empty());
        assert_eq!(eap.use_system_cas, Some(false));
        assert_eq!(eap.client_cert_pkcs11_id.as_deref(), Some("1:aa"));
    }

    #[tokio::test]
    async fn test_vpn_scenarios() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::Vpn);
        session.init().await.unwrap();
        assert_eq!(session.vpn_type(), Some(VpnConfigType::L2tpIpsecPsk));

        session.set_name("MyVPN").unwrap();
        session.set_vpn_host("vpn.example.com").unwrap();
        session.set_ipsec_psk("shared").unwrap();
        assert!(!session.is_configured());
        session.set_l2tp_credentials("bob", "pw").unwrap();
        assert!(session.is_configured());

        session.set_vpn_type(VpnConfigType::OpenVpn).unwrap();
        let vpn = session.config().unwrap().vpn().unwrap();
        assert!(vpn.ipsec().is_none() && vpn.l2tp().is_none());
        assert!(session.catalog().is_open_vpn());
        assert!(session.is_configured());

        session.set_vpn_save_credentials(true).unwrap();
        session.save().await.unwrap();
        let created = service.created();
        let payload = created[0].config.vpn().unwrap();
        assert_eq!(payload.auto_connect, Some(false));
        assert!(payload.openvpn().unwrap().save_credentials);
    }

    #[tokio::test]
    async fn test_existing_openvpn_snapshot() {
        let mut snapshot = ManagedProperties::new_network(NetworkType::Vpn);
        snapshot.guid = Some("vpn-1".to_string());
        snapshot.source = Source::User;
        snapshot.name = Some(ManagedValue::user("MyVPN".to_string()));
        snapshot.vpn = Some(ManagedVpn {
            host: Some(ManagedValue::user("vpn.example.com".to_string())),
            vpn_type: Some(ManagedValue::user(VpnType::OpenVpn)),
            ..Default::default()
        });
        let service = Arc::new(MemoryNetworkService::new().with_network(snapshot.clone()));
        let service_dyn: Arc<dyn NetworkService> = service.clone();
        let mut session = ConfigSession::new(service_dyn, SessionOptions::default(), snapshot);
        session.init().await.unwrap();
        assert_eq!(session.vpn_type(), Some(VpnConfigType::OpenVpn));
        assert!(session.is_configured());
        assert!(!session.share_is_visible());
    }

    #[tokio::test]
    async fn test_connect_if_configured() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        assert_eq!(session.connect_if_configured().await.unwrap(), SubmitOutcome::Ignored);
        assert!(service.created().is_empty());
    }

    #[tokio::test]
    async fn test_close_zeroizes_credentials() {
        let service = Arc::new(MemoryNetworkService::new());
        let mut session = new_session(&service, NetworkType::WiFi);
        session.set_security(SecurityType::WpaPsk).unwrap();
        session.set_passphrase("abcdef").unwrap();
        session.close();
        assert_eq!(session.config().unwrap().wifi().unwrap().passphrase.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_policy_forbids_autoconnect() {
        let service = Arc::new(MemoryNetworkService::new().with_policy(GlobalPolicy {
            allow_only_policy_networks_to_connect: true,
            ..Default::default()
        }));
        let mut session = new_session(&service, NetworkType::WiFi);
        session.init().await.unwrap();
        session.set_ssid("cafe").unwrap();
        session.save().await.unwrap();
        assert_eq!(service.created()[0].config.auto_connect(), Some(false));
    }
}

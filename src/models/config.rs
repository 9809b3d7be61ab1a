// Network Config - Application Configuration
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Application configuration model.

use serde::{Deserialize, Serialize};

/// Device-wide network policy, as reported by the network service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GlobalPolicy {
    /// Only policy-provided networks may be connected to.
    pub allow_only_policy_networks_to_connect: bool,
    /// Only policy-provided networks may auto-connect.
    pub allow_only_policy_networks_to_autoconnect: bool,
}

impl GlobalPolicy {
    /// Whether user-created networks must not auto-connect.
    pub fn forbids_user_autoconnect(&self) -> bool {
        self.allow_only_policy_networks_to_connect || self.allow_only_policy_networks_to_autoconnect
    }
}

/// Sharing options handed to an edit session by its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareOptions {
    /// The user may toggle whether a new network is shared.
    pub allow_enable: bool,
    /// Shared state of a new network when the user does not choose.
    pub default_shared: bool,
}

impl Default for ShareOptions {
    fn default() -> Self {
        Self {
            allow_enable: default_true(),
            default_shared: false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Users may toggle sharing of new networks.
    #[serde(default = "default_true")]
    pub share_allow_enable: bool,

    /// New networks are shared by default.
    #[serde(default)]
    pub share_default: bool,

    /// Minimum WiFi passphrase length for WEP/WPA pre-shared keys.
    #[serde(default = "default_min_passphrase_length")]
    pub min_passphrase_length: usize,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Bus name of the network service.
    #[serde(default = "default_dbus_service_name")]
    pub dbus_service_name: String,

    /// Object path of the network service.
    #[serde(default = "default_dbus_object_path")]
    pub dbus_object_path: String,

    /// Policy used when the service does not report one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_policy: Option<GlobalPolicy>,
}

fn default_true() -> bool {
    true
}

fn default_min_passphrase_length() -> usize {
    crate::engine::validate::MIN_PASSPHRASE_LENGTH
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_dbus_service_name() -> String {
    crate::DBUS_SERVICE_NAME.to_string()
}

fn default_dbus_object_path() -> String {
    crate::DBUS_OBJECT_PATH.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            share_allow_enable: true,
            share_default: false,
            min_passphrase_length: default_min_passphrase_length(),
            log_level: default_log_level(),
            dbus_service_name: default_dbus_service_name(),
            dbus_object_path: default_dbus_object_path(),
            global_policy: None,
        }
    }
}

impl AppConfig {
    /// Sharing options for a new edit session.
    pub fn share_options(&self) -> ShareOptions {
        ShareOptions {
            allow_enable: self.share_allow_enable,
            default_shared: self.share_default,
        }
    }

    /// Load configuration from TOML file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, super::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file with restrictive permissions (0600).
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), super::Error> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.share_allow_enable);
        assert!(!config.share_default);
        assert_eq!(config.min_passphrase_length, 5);
        assert_eq!(config.log_level, "info");
        assert!(config.global_policy.is_none());
    }

    #[test]
    fn test_global_policy_table() {
        let config: AppConfig = toml::from_str(
            "share_default = true\n[global_policy]\nAllowOnlyPolicyNetworksToConnect = true\n",
        )
        .unwrap();
        assert!(config.share_default);
        let policy = config.global_policy.unwrap();
        assert!(policy.allow_only_policy_networks_to_connect);
        assert!(policy.forbids_user_autoconnect());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut config = AppConfig::default();
        config.share_default = true;
        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert!(loaded.share_default);
        assert_eq!(loaded.dbus_service_name, config.dbus_service_name);
    }
}

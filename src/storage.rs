// Network Config - Local Storage
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Local storage for application settings and JSON inputs.
//!
//! Settings live in `settings.toml` under the user's config directory.
//! This module uses RwLock for thread-safe access. Lock poisoning is handled
//! by recovering the inner value.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::models::{AppConfig, Error, Result};
use crate::CONFIG_DIR_NAME;

/// Settings store backed by a TOML file.
#[derive(Debug)]
pub struct SettingsStore {
    /// Configuration directory path.
    config_dir: PathBuf,
    /// Settings file path.
    settings_file: PathBuf,
    /// Application settings.
    settings: RwLock<AppConfig>,
}

impl SettingsStore {
    /// Create a store in the default config directory.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);
        Self::with_config_dir(config_dir)
    }

    /// Create a store in a specific config directory.
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&config_dir) {
            error!("Failed to create config directory: {}", e);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&config_dir, fs::Permissions::from_mode(0o700));
        }

        let store = Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            settings: RwLock::new(AppConfig::default()),
        };
        store.load_settings();
        store
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    fn load_settings(&self) {
        if !self.settings_file.exists() {
            return;
        }
        match AppConfig::load_from_file(&self.settings_file) {
            Ok(config) => {
                self.write_settings(|s| *s = config);
                info!("Loaded settings from {:?}", self.settings_file);
            }
            Err(e) => error!("Failed to load settings: {}", e),
        }
    }

    /// Get the current settings.
    pub fn settings(&self) -> AppConfig {
        match self.settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                warn!("RwLock poisoned reading settings, recovering");
                poisoned.into_inner().clone()
            }
        }
    }

    /// Replace the settings and persist them.
    pub fn update_settings(&self, settings: AppConfig) -> Result<()> {
        self.write_settings(|s| *s = settings);
        self.save()
    }

    /// Persist the current settings.
    pub fn save(&self) -> Result<()> {
        self.settings().save_to_file(&self.settings_file)
    }

    fn write_settings<F: FnOnce(&mut AppConfig)>(&self, writer: F) {
        match self.settings.write() {
            Ok(mut guard) => writer(&mut *guard),
            Err(poisoned) => {
                warn!("RwLock poisoned writing settings, recovering");
                writer(&mut *poisoned.into_inner())
            }
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a JSON document such as a snapshot or certificate list.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .map_err(|e| Error::ConfigReadFailed(format!("{}: {}", path.display(), e)))?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

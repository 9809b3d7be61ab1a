// Network Config - Library Root
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Network Config
//!
//! Configuration engine for WiFi, Ethernet 802.1X, WiMAX and VPN
//! (L2TP/IPsec and OpenVPN) network profiles.
//!
//! An edit session derives a working configuration from a managed snapshot,
//! keeps it consistent as the user changes security or VPN type, selects
//! certificates, validates completeness and submits the result to a
//! network service.

pub mod engine;
pub mod models;
pub mod services;
pub mod storage;

pub use engine::{ConfigSession, SessionOptions, SessionState, SubmitOutcome};
pub use models::{Error, Result};
pub use services::NetworkService;

/// Application ID.
pub const APP_ID: &str = "com.chrisdaggas.network-config";

/// Human-readable application name.
pub const APP_NAME: &str = "Network Config";

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// D-Bus service name of the network daemon.
pub const DBUS_SERVICE_NAME: &str = "com.chrisdaggas.NetworkConfigd";

/// D-Bus object path of the network daemon.
pub const DBUS_OBJECT_PATH: &str = "/com/chrisdaggas/NetworkConfig";

/// Directory name under the user's config directory.
pub const CONFIG_DIR_NAME: &str = "network-config";

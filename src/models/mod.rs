// Network Config - Models
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Network Config Models
//!
//! Data types shared by the configuration engine and the network service:
//!
//! - **Managed**: read-only snapshot of a network's (possibly policy
//!   controlled) properties
//! - **Properties**: the mutable working configuration and submission payload
//! - **Certificate**: certificate entries and the selectable catalog
//! - **Network**: ONC enumerations
//! - **Config**: application settings and global policy
//! - **Error**: shared error types

pub mod certificate;
pub mod config;
pub mod error;
pub mod managed;
pub mod network;
pub mod properties;
pub mod validation;

// Re-export main types for convenience
pub use certificate::{CertificateCatalog, CertificateEntry, CertificateLists};
pub use config::{AppConfig, GlobalPolicy, ShareOptions};
pub use error::{Error, Result};
pub use managed::{ManagedProperties, ManagedValue};
pub use network::{
    Authentication, ClientCertType, ConnectionState, EapInner, EapOuter, IpsecAuthenticationType,
    NetworkType, SecurityType, Source, StartConnectResult, UserAuthenticationType, VpnConfigType,
    VpnType,
};
pub use properties::{
    ConfigProperties, EapConfig, EthernetConfig, IpsecConfig, L2tpConfig, OpenVpnConfig,
    TypeConfig, VpnConfig, VpnProvider, WifiConfig, WimaxConfig,
};

// Network Config - Error Types
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Shared error types for the Network Config engine.

use thiserror::Error;

use super::network::StartConnectResult;

/// Result type alias for Network Config operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error key: a user certificate is required but none is installed.
pub const ERROR_NO_USER_CERTIFICATE: &str = "no-user-certificate";

/// Error key: certificates are installed but none is hardware backed
/// (or device-wide, when only device-wide certificates may be used).
pub const ERROR_NOT_HARDWARE_BACKED: &str = "not-hardware-backed";

/// Whether an error key is one of the derived certificate errors.
pub fn is_certificate_error(key: &str) -> bool {
    key == ERROR_NO_USER_CERTIFICATE || key == ERROR_NOT_HARDWARE_BACKED
}

/// Main error type for Network Config operations.
#[derive(Debug, Error)]
pub enum Error {
    // ========================================
    // Session Errors
    // ========================================
    #[error("Network not found: {0}")]
    NetworkNotFound(String),

    #[error("Session is closed")]
    SessionClosed,

    #[error("Configuration has not been derived yet")]
    NotDerived,

    // ========================================
    // Submission Errors
    // ========================================
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Connect failed: {result} - {message}")]
    ConnectFailed {
        result: StartConnectResult,
        message: String,
    },

    // ========================================
    // Validation Errors
    // ========================================
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    // ========================================
    // Transport Errors
    // ========================================
    #[error("D-Bus error: {0}")]
    Dbus(String),

    #[error("D-Bus connection failed: {0}")]
    DbusConnectionFailed(String),

    // ========================================
    // Storage Errors
    // ========================================
    #[error("Failed to read configuration: {0}")]
    ConfigReadFailed(String),

    #[error("Failed to write configuration: {0}")]
    ConfigWriteFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParseFailed(String),

    // ========================================
    // System Errors
    // ========================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new connect failed error.
    pub fn connect_failed(result: StartConnectResult, message: impl Into<String>) -> Self {
        Self::ConnectFailed {
            result,
            message: message.into(),
        }
    }

    /// The opaque key surfaced to the presentation layer.
    pub fn error_key(&self) -> String {
        match self {
            Self::SubmissionFailed(message) => message.clone(),
            Self::ConnectFailed { message, result } if message.is_empty() => result.to_string(),
            Self::ConnectFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// Convert from zbus errors
impl From<zbus::Error> for Error {
    fn from(err: zbus::Error) -> Self {
        Error::Dbus(err.to_string())
    }
}

// Convert from toml parse errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParseFailed(err.to_string())
    }
}

// Convert from toml serialize errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::ConfigWriteFailed(err.to_string())
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParseFailed(err.to_string())
    }
}

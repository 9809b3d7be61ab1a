// Network Config - Validation Utilities
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Field-level checks used by the completeness engine.
//!
//! Each check returns the first unmet requirement as
//! [`Error::ValidationFailed`] so callers can log why a configuration is
//! not complete yet.

use super::error::{Error, Result};

/// Require a non-empty value.
pub fn require_field(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(Error::ValidationFailed(format!("{} is required", field))),
    }
}

/// Validate a WiFi pre-shared passphrase.
pub fn validate_passphrase(passphrase: Option<&str>, min_length: usize) -> Result<()> {
    let length = passphrase.map(|p| p.chars().count()).unwrap_or(0);
    if length < min_length {
        return Err(Error::ValidationFailed(format!(
            "Passphrase must be at least {} characters",
            min_length
        )));
    }
    Ok(())
}

/// Validate a selected certificate hash.
pub fn require_selection(field: &str, ok: bool) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::ValidationFailed(format!("{} must be selected", field)))
    }
}

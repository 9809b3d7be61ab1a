// Network Config - Engine
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Configuration Engine
//!
//! Stages run in a fixed order after every change:
//!
//! 1. **derive**: snapshot to working configuration (on snapshot arrival)
//! 2. **reconcile**: EAP and VPN blocks follow the security and VPN type
//! 3. **selector**: server CA and user certificate selection
//! 4. **validate**: completeness check
//!
//! [`ConfigSession`] drives the stages and submits the result built by
//! **payload**.

pub mod derive;
pub mod payload;
pub mod reconcile;
pub mod selector;
pub mod session;
pub mod validate;
pub mod visibility;

pub use selector::SelectionState;
pub use session::{ConfigSession, SessionOptions, SessionState, SubmitOutcome};

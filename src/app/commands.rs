//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world — the dashboard
//! over whatever transport is wired up — that the
//! [`AppService`](super::service::AppService) interprets and acts upon.
//! The transport and its JSON/wire parsing live outside this crate; by the
//! time a command reaches the service it is already a typed value.  The
//! serde derives define the deserialization boundary for those adapters.

use serde::{Deserialize, Serialize};

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AppCommand {
    /// Force or release the indicator LED independently of the sounder.
    SetIndicatorOverride { enabled: bool, level: bool },

    /// Force or release the sounder independently of the indicator.
    SetSounderOverride { enabled: bool, level: bool },

    /// Force or release both alert outputs at once (the dashboard's
    /// original single-switch control, kept for compatibility).
    SetCombinedOverride { enabled: bool, level: bool },

    /// Drop every manual override and return to automatic control.
    ClearOverrides,

    /// Switch the relay powering the alert-output rail.
    SetRelay { on: bool },

    /// Change the gas sampling interval at runtime (seconds, 1–300).
    SetSamplingInterval { secs: u16 },
}

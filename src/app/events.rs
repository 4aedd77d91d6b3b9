//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, publish to the MQTT bridge,
//! push to the dashboard, etc.

use serde::Serialize;

use crate::sensors::quality::AirQuality;

/// Which override slot an [`AppEvent::OverrideChanged`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverrideTarget {
    Indicator,
    Sounder,
    Combined,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service finished startup (calibration state attached).
    Started { calibrated: bool },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// Automatic alerting engaged (concentration crossed the activation
    /// threshold).
    AlertActivated { ppm: f32 },

    /// Automatic alerting disengaged (concentration fell below the
    /// deactivation threshold).
    AlertDeactivated { ppm: f32 },

    /// An operator override was engaged or released.
    OverrideChanged {
        target: OverrideTarget,
        engaged: bool,
        level: bool,
    },

    /// The alert-rail relay switched.
    RelayChanged { on: bool },

    /// The sampling interval was changed at runtime.
    SamplingIntervalChanged { secs: u16 },
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryData {
    pub gas_ppm: f32,
    pub gas_quality: AirQuality,
    pub co2_ppm: f32,
    pub co2_quality: AirQuality,
    pub calibrated: bool,
    pub alert_active: bool,
    pub indicator_on: bool,
    pub sounder_on: bool,
    pub relay_on: bool,
    pub override_engaged: bool,
}

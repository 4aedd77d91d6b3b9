//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the alert controller and the relay, and orchestrates
//! one sampling cycle: read the sensor hub, evaluate the alert thresholds,
//! and surface state changes as structured events.  Sensor input flows
//! through the [`SensorPort`] trait injected at call sites, making the
//! service testable with scripted readings.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService        │
//!                 │  alert · relay · timing │──▶ output pins (owned)
//!                 └────────────────────────┘
//! ```

use log::{info, warn};

use crate::alert::AlertController;
use crate::config::{SystemConfig, MAX_SAMPLING_INTERVAL_SECS, MIN_SAMPLING_INTERVAL_SECS};
use crate::drivers::relay::RelayDriver;
use crate::sensors::GasSnapshot;

use super::commands::AppCommand;
use super::events::{AppEvent, OverrideTarget, TelemetryData};
use super::ports::{EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    alert: AlertController,
    relay: RelayDriver,
    sampling_interval_secs: u16,
    last_snapshot: GasSnapshot,
}

impl AppService {
    /// Construct the service around pre-built actuators (built in main,
    /// where peripheral ownership is established).
    pub fn new(alert: AlertController, relay: RelayDriver, config: &SystemConfig) -> Self {
        Self {
            alert,
            relay,
            sampling_interval_secs: config.sampling_interval_secs,
            last_snapshot: GasSnapshot::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the system into its operating state: energise the alert-output
    /// rail and announce startup.
    pub fn start(&mut self, now_ms: u32, calibrated: bool, sink: &mut impl EventSink) {
        if self.relay.turn_on(now_ms) {
            sink.emit(&AppEvent::RelayChanged { on: true });
        }
        sink.emit(&AppEvent::Started { calibrated });
        info!("AppService started (calibrated={})", calibrated);
    }

    // ── Sampling cycle ────────────────────────────────────────

    /// Run one sampling cycle: read both gas channels and feed the smoothed
    /// concentration to the alert thresholds.  Alert edges come out as
    /// events; repeated readings on the same side of the band are silent.
    pub fn sample(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) {
        let snapshot = hw.read_gas();
        self.last_snapshot = snapshot;

        let was_active = self.alert.is_active();
        self.alert.check_level(snapshot.gas_ppm);
        let is_active = self.alert.is_active();

        if is_active && !was_active {
            sink.emit(&AppEvent::AlertActivated {
                ppm: snapshot.gas_ppm,
            });
        } else if !is_active && was_active {
            sink.emit(&AppEvent::AlertDeactivated {
                ppm: snapshot.gas_ppm,
            });
        }
    }

    /// Advance the alert blink/beep timers.  Call every loop iteration;
    /// rate limiting happens inside the controller.
    pub fn tick(&mut self, now_ms: u32) {
        self.alert.tick(now_ms);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (already deserialized by the transport
    /// adapter and funnelled through the control loop).
    pub fn handle_command(&mut self, cmd: AppCommand, now_ms: u32, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::SetIndicatorOverride { enabled, level } => {
                if enabled {
                    self.ensure_rail_powered(now_ms, sink);
                }
                self.alert.set_indicator_override(enabled, level);
                sink.emit(&AppEvent::OverrideChanged {
                    target: OverrideTarget::Indicator,
                    engaged: enabled,
                    level,
                });
            }

            AppCommand::SetSounderOverride { enabled, level } => {
                if enabled {
                    self.ensure_rail_powered(now_ms, sink);
                }
                self.alert.set_sounder_override(enabled, level);
                sink.emit(&AppEvent::OverrideChanged {
                    target: OverrideTarget::Sounder,
                    engaged: enabled,
                    level,
                });
            }

            AppCommand::SetCombinedOverride { enabled, level } => {
                if enabled {
                    self.ensure_rail_powered(now_ms, sink);
                }
                self.alert.set_combined_override(enabled, level);
                sink.emit(&AppEvent::OverrideChanged {
                    target: OverrideTarget::Combined,
                    engaged: enabled,
                    level,
                });
            }

            AppCommand::ClearOverrides => {
                // Report the release of every slot that was actually engaged.
                let engaged = [
                    (OverrideTarget::Indicator, self.alert.indicator_override()),
                    (OverrideTarget::Sounder, self.alert.sounder_override()),
                    (OverrideTarget::Combined, self.alert.combined_override()),
                ];
                self.alert.clear_overrides();
                for (target, slot) in engaged {
                    if slot.is_some() {
                        sink.emit(&AppEvent::OverrideChanged {
                            target,
                            engaged: false,
                            level: false,
                        });
                    }
                }
            }

            AppCommand::SetRelay { on } => {
                if self.relay.set_state(now_ms, on) {
                    sink.emit(&AppEvent::RelayChanged { on });
                }
            }

            AppCommand::SetSamplingInterval { secs } => {
                if (MIN_SAMPLING_INTERVAL_SECS..=MAX_SAMPLING_INTERVAL_SECS).contains(&secs) {
                    self.sampling_interval_secs = secs;
                    sink.emit(&AppEvent::SamplingIntervalChanged { secs });
                    info!("Sampling interval changed to {} s", secs);
                } else {
                    warn!("Rejected sampling interval {} s (allowed 1–300)", secs);
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current state.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            gas_ppm: self.last_snapshot.gas_ppm,
            gas_quality: self.last_snapshot.gas_quality,
            co2_ppm: self.last_snapshot.co2_ppm,
            co2_quality: self.last_snapshot.co2_quality,
            calibrated: self.last_snapshot.calibrated,
            alert_active: self.alert.is_active(),
            indicator_on: self.alert.indicator_level(),
            sounder_on: self.alert.sounder_level(),
            relay_on: self.relay.is_on(),
            override_engaged: self.alert.has_override(),
        }
    }

    /// The alert controller (read access for telemetry and tests).
    pub fn alert(&self) -> &AlertController {
        &self.alert
    }

    /// Current sampling interval in milliseconds, for the loop's
    /// elapsed-time check.
    pub fn sampling_interval_ms(&self) -> u32 {
        u32::from(self.sampling_interval_secs) * 1000
    }

    /// Most recent gas snapshot.
    pub fn last_snapshot(&self) -> GasSnapshot {
        self.last_snapshot
    }

    pub fn relay_on(&self) -> bool {
        self.relay.is_on()
    }

    // ── Internal ──────────────────────────────────────────────

    /// A forced output is useless on a dead rail — switch the relay back on
    /// before applying an override if something turned it off.
    fn ensure_rail_powered(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        if !self.relay.is_on() {
            warn!("Alert rail was off — re-energising relay for override");
            if self.relay.turn_on(now_ms) {
                sink.emit(&AppEvent::RelayChanged { on: true });
            }
        }
    }
}

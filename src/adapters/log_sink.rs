//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! ESP-IDF logger (which goes to UART / USB-CDC in production).  A future
//! MQTT or dashboard adapter would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | gas={:.1}ppm ({}) | co2={:.1}ppm ({}) | alert={} | \
                     led={} snd={} relay={} | cal={} ovr={}",
                    t.gas_ppm,
                    t.gas_quality,
                    t.co2_ppm,
                    t.co2_quality,
                    if t.alert_active { "ON" } else { "off" },
                    u8::from(t.indicator_on),
                    u8::from(t.sounder_on),
                    if t.relay_on { "ON" } else { "off" },
                    t.calibrated,
                    t.override_engaged,
                );
            }
            AppEvent::AlertActivated { ppm } => {
                info!("ALERT | activated at {:.0} ppm", ppm);
            }
            AppEvent::AlertDeactivated { ppm } => {
                info!("ALERT | deactivated at {:.0} ppm", ppm);
            }
            AppEvent::OverrideChanged {
                target,
                engaged,
                level,
            } => {
                info!(
                    "OVRD  | {:?} {} (level={})",
                    target,
                    if *engaged { "engaged" } else { "released" },
                    level,
                );
            }
            AppEvent::RelayChanged { on } => {
                info!("RELAY | {}", if *on { "ON" } else { "OFF" });
            }
            AppEvent::SamplingIntervalChanged { secs } => {
                info!("RATE  | sampling every {} s", secs);
            }
            AppEvent::Started { calibrated } => {
                info!("START | calibrated={}", calibrated);
            }
        }
    }
}

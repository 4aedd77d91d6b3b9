//! Mock adapters for integration tests.
//!
//! `ScriptedSensors` feeds a scripted sequence of concentrations into the
//! service; `RecordingSink` captures every emitted event so tests can assert
//! on the full history.

use std::collections::VecDeque;

use airguard::app::events::AppEvent;
use airguard::app::ports::{EventSink, SensorPort};
use airguard::config::SystemConfig;
use airguard::sensors::quality::AirQuality;
use airguard::sensors::GasSnapshot;

// ── ScriptedSensors ───────────────────────────────────────────

/// SensorPort whose readings come from a pre-loaded script.  When the
/// script runs out, the last value repeats.
pub struct ScriptedSensors {
    script: VecDeque<f32>,
    last_ppm: f32,
    breakpoints: [f32; 6],
}

#[allow(dead_code)]
impl ScriptedSensors {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            last_ppm: 0.0,
            breakpoints: SystemConfig::default().quality_breakpoints_ppm,
        }
    }

    pub fn with_script(ppms: &[f32]) -> Self {
        let mut s = Self::new();
        s.extend(ppms);
        s
    }

    pub fn extend(&mut self, ppms: &[f32]) {
        self.script.extend(ppms.iter().copied());
    }

    pub fn set_constant(&mut self, ppm: f32) {
        self.script.clear();
        self.last_ppm = ppm;
    }
}

impl Default for ScriptedSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for ScriptedSensors {
    fn read_gas(&mut self) -> GasSnapshot {
        if let Some(next) = self.script.pop_front() {
            self.last_ppm = next;
        }
        GasSnapshot {
            mq2_raw: 0,
            gas_ppm: self.last_ppm,
            gas_quality: AirQuality::from_ppm(self.last_ppm, &self.breakpoints),
            co2_ppm: 0.0,
            co2_quality: AirQuality::Excellent,
            calibrated: true,
        }
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// EventSink that records every event.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::AlertActivated { .. }))
            .count()
    }

    pub fn deactivations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::AlertDeactivated { .. }))
            .count()
    }

    pub fn override_changes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::OverrideChanged { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

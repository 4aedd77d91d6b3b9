//! Alert controller for the indicator LED and sounder.
//!
//! Runs every control-loop iteration and decides, per output, whether it is
//! off, blinking/beeping automatically, or held at a manually forced level.
//! Control is resolved fresh on every evaluation through four strict
//! precedence tiers:
//!
//! | Tier | Source                        | Effect                          |
//! |------|-------------------------------|---------------------------------|
//! | 1    | Independent output override   | Pin held at the forced level    |
//! | 2    | Combined override (both pins) | Pin held at the forced level    |
//! | 3    | Automatic mode (hysteretic)   | Pin toggles on its own timer    |
//! | 4    | Idle                          | Pin held low                    |
//!
//! Automatic mode engages when the smoothed concentration crosses the
//! activation threshold and disengages only below the (strictly lower)
//! deactivation threshold; inside the dead zone the previous state persists,
//! so a reading hovering at the threshold cannot chatter the sounder.
//!
//! Override setters drive the physical pin at set time — a dashboard "force
//! sounder ON" is audible before the next tick.  The indicator and sounder
//! blink on independent timers and are never synchronised to each other.
//! All elapsed-time checks use wrapping arithmetic on a u32 millisecond
//! clock.
//!
//! The controller exclusively owns both output pins; nothing else in the
//! firmware writes them.

use log::info;

use crate::config::SystemConfig;
use crate::drivers::output_pin::OutputPin;

/// The two outputs under arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlertOutput {
    Indicator,
    Sounder,
}

/// Effective control source for one output.  Resolution order **is** the
/// precedence: independent override, combined override, then the automatic
/// flag.  Exhaustive matching keeps a fifth tier from sneaking in as an
/// `if` chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputControl {
    /// A manual override pins the output at this level.
    Forced(bool),
    /// Automatic mode owns the output: blink/beep on its timer.
    Automatic,
    /// Nothing claims the output: hold it low.
    Idle,
}

pub struct AlertController {
    indicator: OutputPin,
    sounder: OutputPin,

    /// Automatic (concentration-driven) mode engaged.
    active: bool,
    activate_ppm: f32,
    deactivate_ppm: f32,

    indicator_interval_ms: u32,
    sounder_interval_ms: u32,
    last_indicator_toggle_ms: u32,
    last_sounder_toggle_ms: u32,

    indicator_override: Option<bool>,
    sounder_override: Option<bool>,
    combined_override: Option<bool>,
}

impl AlertController {
    /// Take ownership of the two output GPIOs, both driven low.
    pub fn new(indicator_gpio: i32, sounder_gpio: i32, config: &SystemConfig) -> Self {
        Self {
            indicator: OutputPin::new(indicator_gpio),
            sounder: OutputPin::new(sounder_gpio),
            active: false,
            activate_ppm: config.alert_activate_ppm,
            deactivate_ppm: config.alert_deactivate_ppm,
            indicator_interval_ms: config.indicator_blink_interval_ms,
            sounder_interval_ms: config.sounder_beep_interval_ms,
            last_indicator_toggle_ms: 0,
            last_sounder_toggle_ms: 0,
            indicator_override: None,
            sounder_override: None,
            combined_override: None,
        }
    }

    // ── Concentration-driven control ──────────────────────────

    /// Evaluate the smoothed concentration against the hysteresis band.
    ///
    /// While any override is engaged the operator owns the outputs and the
    /// reading is ignored.  Re-evaluating the same qualifying value is
    /// idempotent: the activate/deactivate edges fire once per crossing.
    pub fn check_level(&mut self, ppm: f32) {
        if self.has_override() {
            return;
        }

        if ppm >= self.activate_ppm {
            self.activate(ppm);
        } else if ppm < self.deactivate_ppm {
            self.deactivate(ppm);
        }
        // Between the thresholds: dead zone, previous state persists.
    }

    /// Automatic mode engaged?
    pub fn is_active(&self) -> bool {
        self.active
    }

    // ── Per-iteration timing ──────────────────────────────────

    /// Advance blink/beep timing.  Non-blocking; call every loop iteration.
    ///
    /// Overridden outputs were already driven by their setter and are left
    /// alone.  Automatic outputs toggle when their own interval elapses —
    /// the two timers are independent.  Unclaimed outputs are held low.
    pub fn tick(&mut self, now_ms: u32) {
        self.tick_output(AlertOutput::Indicator, now_ms);
        self.tick_output(AlertOutput::Sounder, now_ms);
    }

    // ── Manual overrides ──────────────────────────────────────

    /// Force or release the indicator independently of the sounder.
    pub fn set_indicator_override(&mut self, enabled: bool, level: bool) {
        self.indicator_override = if enabled { Some(level) } else { None };
        self.apply_now(AlertOutput::Indicator);
        log_override("Indicator", enabled, level);
    }

    /// Force or release the sounder independently of the indicator.
    pub fn set_sounder_override(&mut self, enabled: bool, level: bool) {
        self.sounder_override = if enabled { Some(level) } else { None };
        self.apply_now(AlertOutput::Sounder);
        log_override("Sounder", enabled, level);
    }

    /// Force or release both outputs at once (the dashboard's original
    /// single-switch control).  Outputs with their own independent override
    /// keep it — this tier sits below tier 1.
    pub fn set_combined_override(&mut self, enabled: bool, level: bool) {
        self.combined_override = if enabled { Some(level) } else { None };
        self.apply_now(AlertOutput::Indicator);
        self.apply_now(AlertOutput::Sounder);
        log_override("Combined", enabled, level);
    }

    /// Drop all three override slots and return both outputs to
    /// automatic/idle control.  Single-threaded loop — the reset is atomic
    /// with respect to every other evaluation.
    pub fn clear_overrides(&mut self) {
        self.indicator_override = None;
        self.sounder_override = None;
        self.combined_override = None;
        self.apply_now(AlertOutput::Indicator);
        self.apply_now(AlertOutput::Sounder);
        info!("All output overrides cleared — automatic control resumes");
    }

    /// Any override slot engaged?
    pub fn has_override(&self) -> bool {
        self.indicator_override.is_some()
            || self.sounder_override.is_some()
            || self.combined_override.is_some()
    }

    // ── State queries (telemetry / tests) ─────────────────────

    pub fn indicator_level(&self) -> bool {
        self.indicator.level()
    }

    pub fn sounder_level(&self) -> bool {
        self.sounder.level()
    }

    pub fn indicator_override(&self) -> Option<bool> {
        self.indicator_override
    }

    pub fn sounder_override(&self) -> Option<bool> {
        self.sounder_override
    }

    pub fn combined_override(&self) -> Option<bool> {
        self.combined_override
    }

    // ── Internal ──────────────────────────────────────────────

    fn activate(&mut self, ppm: f32) {
        if self.active {
            return;
        }
        self.active = true;
        info!("Alert activated at {:.0} ppm — outputs will blink/beep", ppm);
    }

    fn deactivate(&mut self, ppm: f32) {
        if !self.active {
            return;
        }
        self.active = false;
        self.indicator.set_level(false);
        self.sounder.set_level(false);
        info!("Alert deactivated at {:.0} ppm — outputs off", ppm);
    }

    /// Resolve which tier currently owns an output.
    fn resolve(&self, which: AlertOutput) -> OutputControl {
        let independent = match which {
            AlertOutput::Indicator => self.indicator_override,
            AlertOutput::Sounder => self.sounder_override,
        };
        if let Some(level) = independent {
            return OutputControl::Forced(level);
        }
        if let Some(level) = self.combined_override {
            return OutputControl::Forced(level);
        }
        if self.active {
            OutputControl::Automatic
        } else {
            OutputControl::Idle
        }
    }

    /// Drive an output to the level its resolved tier demands, immediately.
    /// Used by the override setters: a forced level lands now, and a
    /// released output parks low until the next `tick()` re-claims it.
    fn apply_now(&mut self, which: AlertOutput) {
        let control = self.resolve(which);
        let pin = match which {
            AlertOutput::Indicator => &mut self.indicator,
            AlertOutput::Sounder => &mut self.sounder,
        };
        match control {
            OutputControl::Forced(level) => pin.set_level(level),
            OutputControl::Automatic | OutputControl::Idle => pin.set_level(false),
        }
    }

    fn tick_output(&mut self, which: AlertOutput, now_ms: u32) {
        let control = self.resolve(which);
        let (pin, interval_ms, last_toggle_ms) = match which {
            AlertOutput::Indicator => (
                &mut self.indicator,
                self.indicator_interval_ms,
                &mut self.last_indicator_toggle_ms,
            ),
            AlertOutput::Sounder => (
                &mut self.sounder,
                self.sounder_interval_ms,
                &mut self.last_sounder_toggle_ms,
            ),
        };

        match control {
            // Level already applied at override time.
            OutputControl::Forced(_) => {}

            OutputControl::Automatic => {
                if now_ms.wrapping_sub(*last_toggle_ms) >= interval_ms {
                    let next = !pin.level();
                    pin.set_level(next);
                    *last_toggle_ms = now_ms;
                }
            }

            OutputControl::Idle => {
                if pin.level() {
                    pin.set_level(false);
                }
            }
        }
    }
}

fn log_override(name: &str, enabled: bool, level: bool) {
    if enabled {
        info!("{name} override engaged — forced {}", if level { "HIGH" } else { "LOW" });
    } else {
        info!("{name} override released — automatic control resumes");
    }
}

//! System configuration parameters
//!
//! All tunable parameters for the AirGuard monitor: analog front-end
//! constants, empirical sensor curves, air-quality breakpoints, alert
//! thresholds, and loop timing.  The empirical curve constants come from the
//! MQ-series datasheets' log-log sensitivity charts — they are configuration,
//! not something the firmware derives.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest accepted runtime sampling interval (seconds).
pub const MIN_SAMPLING_INTERVAL_SECS: u16 = 1;
/// Highest accepted runtime sampling interval (seconds).
pub const MAX_SAMPLING_INTERVAL_SECS: u16 = 300;

/// Power-law PPM conversion: `ppm = scale * ratio.powf(exponent)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurveParams {
    pub scale: f32,
    pub exponent: f32,
}

/// Shared analog front-end: both MQ sensors sit in identical voltage
/// dividers on ADC1 channels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalogFrontend {
    /// Divider supply voltage (volts).
    pub reference_voltage: f32,
    /// Full-scale ADC count (4095 for the ESP32's 12-bit ADC).
    pub adc_full_scale: u16,
    /// Load resistance at the divider tap (kΩ).
    pub load_resistance_kohm: f32,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Analog front end ---
    pub frontend: AnalogFrontend,

    // --- MQ-2 combustible-gas channel ---
    /// LPG sensitivity curve from the MQ-2 datasheet log-log chart.
    pub mq2_curve: CurveParams,
    /// Rs/R0 ratio the sensor settles at in clean air.
    pub mq2_clean_air_ratio: f32,
    /// PPM a healthy sensor reports in normal indoor air.
    pub clean_air_ppm: f32,
    /// Lower edge of the ratio band treated as clean-air equilibrium.
    pub recovery_ratio_low: f32,
    /// Upper edge of the ratio band treated as clean-air equilibrium.
    pub recovery_ratio_high: f32,
    /// Hard ceiling on any reported concentration (PPM).
    pub ppm_ceiling: f32,
    /// Ascending air-quality breakpoints (PPM).  A reading exactly at a
    /// breakpoint classifies into the tier above it.
    pub quality_breakpoints_ppm: [f32; 6],

    // --- MQ-135 CO2-equivalent channel (telemetry only) ---
    pub co2_curve: CurveParams,
    pub co2_clean_air_ratio: f32,
    pub co2_breakpoints_ppm: [f32; 6],

    // --- Alert thresholds ---
    /// Concentration (PPM) at or above which automatic alerting engages.
    pub alert_activate_ppm: f32,
    /// Concentration (PPM) below which automatic alerting disengages.
    /// Strictly less than the activation level — the gap is the dead zone
    /// that stops the alert chattering around a single threshold.
    pub alert_deactivate_ppm: f32,
    /// Indicator LED blink half-period (milliseconds).
    pub indicator_blink_interval_ms: u32,
    /// Sounder beep half-period (milliseconds).
    pub sounder_beep_interval_ms: u32,

    // --- Timing ---
    /// Gas sampling interval (seconds).  Adjustable at runtime.
    pub sampling_interval_secs: u16,
    /// Inbound command mailbox poll interval (seconds).
    pub command_poll_interval_secs: u16,
    /// Telemetry report interval (seconds).
    pub telemetry_interval_secs: u32,
    /// Heater warm-up wait before calibration (seconds).
    pub sensor_warmup_secs: u16,
    /// Samples averaged during clean-air calibration.
    pub calibration_samples: u16,
    /// Delay between calibration samples (milliseconds).
    pub calibration_sample_delay_ms: u32,

    // --- Relay ---
    /// Minimum time between relay toggles (milliseconds).
    pub relay_debounce_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            frontend: AnalogFrontend {
                reference_voltage: 3.3,
                adc_full_scale: 4095,
                load_resistance_kohm: 10.0,
            },

            // MQ-2, LPG curve
            mq2_curve: CurveParams {
                scale: 50.0,
                exponent: -2.5,
            },
            mq2_clean_air_ratio: 1.0,
            clean_air_ppm: 15.0,
            recovery_ratio_low: 0.8,
            recovery_ratio_high: 1.2,
            ppm_ceiling: 10_000.0,
            quality_breakpoints_ppm: [25.0, 50.0, 200.0, 500.0, 1000.0, 5000.0],

            // MQ-135, CO2 approximation curve
            co2_curve: CurveParams {
                scale: 116.602_07,
                exponent: -2.769_034_9,
            },
            co2_clean_air_ratio: 9.83,
            co2_breakpoints_ppm: [50.0, 100.0, 200.0, 400.0, 800.0, 2000.0],

            // Alerting
            alert_activate_ppm: 1000.0,
            alert_deactivate_ppm: 900.0,
            indicator_blink_interval_ms: 500,
            sounder_beep_interval_ms: 1000,

            // Timing
            sampling_interval_secs: 5,
            command_poll_interval_secs: 2,
            telemetry_interval_secs: 30,
            sensor_warmup_secs: 60,
            calibration_samples: 100,
            calibration_sample_delay_ms: 10,

            // Relay
            relay_debounce_ms: 100,
        }
    }
}

impl SystemConfig {
    /// Range-check the configuration.  Rejects values that would disable a
    /// protection mechanism (e.g. a collapsed hysteresis band) rather than
    /// silently clamping them.
    pub fn validate(&self) -> Result<()> {
        if self.frontend.reference_voltage <= 0.0 {
            return Err(Error::Config("reference voltage must be positive"));
        }
        if self.frontend.adc_full_scale == 0 {
            return Err(Error::Config("ADC full-scale count must be positive"));
        }
        if self.frontend.load_resistance_kohm <= 0.0 {
            return Err(Error::Config("load resistance must be positive"));
        }
        if self.alert_activate_ppm <= self.alert_deactivate_ppm {
            return Err(Error::Config(
                "activation threshold must exceed deactivation threshold",
            ));
        }
        if self.indicator_blink_interval_ms == 0 || self.sounder_beep_interval_ms == 0 {
            return Err(Error::Config("blink/beep intervals must be non-zero"));
        }
        if !ascending(&self.quality_breakpoints_ppm) {
            return Err(Error::Config(
                "gas quality breakpoints must be strictly ascending",
            ));
        }
        if !ascending(&self.co2_breakpoints_ppm) {
            return Err(Error::Config(
                "CO2 quality breakpoints must be strictly ascending",
            ));
        }
        if self.sampling_interval_secs < MIN_SAMPLING_INTERVAL_SECS
            || self.sampling_interval_secs > MAX_SAMPLING_INTERVAL_SECS
        {
            return Err(Error::Config("sampling interval out of range"));
        }
        if self.calibration_samples == 0 {
            return Err(Error::Config("calibration needs at least one sample"));
        }
        if self.ppm_ceiling <= 0.0 {
            return Err(Error::Config("ppm ceiling must be positive"));
        }
        if self.recovery_ratio_low >= self.recovery_ratio_high {
            return Err(Error::Config("recovery band is inverted"));
        }
        Ok(())
    }
}

fn ascending(values: &[f32]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

//! MQ-2 combustible-gas sensor driver.
//!
//! Reads the analog voltage across the divider load resistor through an
//! ESP32 ADC1 channel, converts it to a sensor resistance, and maps the
//! resistance ratio against the clean-air baseline onto a concentration via
//! the datasheet power-law curve.  A deviation-adaptive smoothing window
//! filters the result before it reaches the alert logic.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH6 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::{AtomicU16, Ordering};

use log::{info, warn};

use crate::config::{AnalogFrontend, CurveParams, SystemConfig};
use crate::sensors::quality::AirQuality;

static SIM_MQ2_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_mq2_adc(raw: u16) {
    SIM_MQ2_ADC.store(raw, Ordering::Relaxed);
}

/// Samples retained by the smoothing window.
const SMOOTHING_WINDOW: usize = 10;
/// Deviation from the running average (as a fraction of it) beyond which a
/// sample is treated as a genuine excursion rather than single-sample noise.
const SPIKE_DEVIATION: f32 = 0.3;
/// Blend weights when fast-tracking an excursion.
const SPIKE_AVERAGE_WEIGHT: f32 = 0.3;
const SPIKE_CURRENT_WEIGHT: f32 = 0.7;
/// Blend weight kept by the computed value inside the clean-air band;
/// the remainder goes to the configured clean-air baseline.
const RECOVERY_COMPUTED_WEIGHT: f32 = 0.3;
/// Divider output below this (volts) means the signal path is dead.
const MIN_VALID_VOLTAGE: f32 = 0.01;

/// One processed sample from the MQ-2 channel.
#[derive(Debug, Clone, Copy)]
pub struct GasReading {
    /// Raw ADC count (0 – 4095).
    pub raw: u16,
    /// Divider output voltage (volts).
    pub voltage: f32,
    /// Sensor resistance (kΩ).
    pub resistance_kohm: f32,
    /// Rs / R0 — resistance relative to the clean-air baseline.
    pub ratio: f32,
    /// Smoothed concentration (PPM), always finite and non-negative.
    pub ppm: f32,
}

pub struct Mq2Sensor {
    frontend: AnalogFrontend,
    curve: CurveParams,
    clean_air_ratio: f32,
    clean_air_ppm: f32,
    recovery_low: f32,
    recovery_high: f32,
    ppm_ceiling: f32,
    breakpoints: [f32; 6],
    calibration_samples: u16,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    calibration_delay_ms: u32,

    /// Clean-air baseline resistance R0 (kΩ).  0.0 = not yet calibrated.
    baseline_kohm: f32,

    ring: [f32; SMOOTHING_WINDOW],
    head: usize,
    total: f32,
    primed: bool,

    adc_channel: u32,
}

impl Mq2Sensor {
    pub fn new(adc_channel: u32, config: &SystemConfig) -> Self {
        Self {
            frontend: config.frontend,
            curve: config.mq2_curve,
            clean_air_ratio: config.mq2_clean_air_ratio,
            clean_air_ppm: config.clean_air_ppm,
            recovery_low: config.recovery_ratio_low,
            recovery_high: config.recovery_ratio_high,
            ppm_ceiling: config.ppm_ceiling,
            breakpoints: config.quality_breakpoints_ppm,
            calibration_samples: config.calibration_samples,
            calibration_delay_ms: config.calibration_sample_delay_ms,
            baseline_kohm: 0.0,
            ring: [0.0; SMOOTHING_WINDOW],
            head: 0,
            total: 0.0,
            primed: false,
            adc_channel,
        }
    }

    /// Establish the clean-air baseline resistance R0.
    ///
    /// **Blocking** — averages `calibration_samples` ADC reads spaced
    /// `calibration_sample_delay_ms` apart (~1 s with defaults).  Run once at
    /// startup, after the heater warm-up, with the sensor in clean air.
    ///
    /// On a dead signal path (divider output pinned near 0 V) the baseline is
    /// left at zero and the sensor stays uncalibrated; readings then degrade
    /// to 0 PPM instead of dividing by garbage.
    pub fn calibrate(&mut self) {
        let mut sum = 0.0f32;
        for _ in 0..self.calibration_samples {
            sum += f32::from(self.read_adc());
            self.settle();
        }

        let avg_adc = sum / f32::from(self.calibration_samples);
        let voltage = self.adc_to_voltage(avg_adc);

        if voltage <= MIN_VALID_VOLTAGE {
            warn!(
                "MQ-2 calibration failed: divider output {:.3} V — staying uncalibrated",
                voltage
            );
            self.baseline_kohm = 0.0;
            return;
        }

        let rs = self.divider_resistance(voltage);
        self.baseline_kohm = rs / self.clean_air_ratio;
        info!(
            "MQ-2 calibrated: R0 = {:.2} kΩ (Rs {:.2} kΩ at {:.2} V)",
            self.baseline_kohm, rs, voltage
        );
    }

    /// True once a clean-air baseline has been established.
    pub fn is_calibrated(&self) -> bool {
        self.baseline_kohm > 0.0
    }

    /// Clean-air baseline resistance (kΩ); 0.0 while uncalibrated.
    pub fn baseline_kohm(&self) -> f32 {
        self.baseline_kohm
    }

    /// Take one sample and run the full estimation pipeline.
    ///
    /// Never fails and never returns NaN/negative: an uncalibrated sensor or
    /// an implausible sample yields 0 PPM, and everything is clamped to
    /// `[0, ppm_ceiling]` before smoothing.
    pub fn read(&mut self) -> GasReading {
        let raw = self.read_adc();
        let voltage = self.adc_to_voltage(f32::from(raw));

        // Floor the divider voltage so a grounded input reads as a huge
        // resistance instead of a division blow-up.
        let resistance_kohm = self.divider_resistance(voltage.max(MIN_VALID_VOLTAGE));

        let ratio = if self.baseline_kohm > 0.0 {
            resistance_kohm / self.baseline_kohm
        } else {
            0.0
        };

        let ppm = self.smooth(self.ppm_from_ratio(ratio));

        GasReading {
            raw,
            voltage,
            resistance_kohm,
            ratio,
            ppm,
        }
    }

    /// Classify a concentration against this channel's breakpoints.
    pub fn air_quality(&self, ppm: f32) -> AirQuality {
        AirQuality::from_ppm(ppm, &self.breakpoints)
    }

    // ── Internal ──────────────────────────────────────────────────

    fn adc_to_voltage(&self, adc: f32) -> f32 {
        adc / f32::from(self.frontend.adc_full_scale) * self.frontend.reference_voltage
    }

    /// Rs = (Vref − Vout) / Vout · Rload
    fn divider_resistance(&self, vout: f32) -> f32 {
        (self.frontend.reference_voltage - vout) / vout * self.frontend.load_resistance_kohm
    }

    fn ppm_from_ratio(&self, ratio: f32) -> f32 {
        if ratio <= 0.0 {
            return 0.0;
        }

        let mut ppm = self.curve.scale * ratio.powf(self.curve.exponent);

        // Near Rs/R0 ≈ 1 the curve is numerically unstable: tiny ratio noise
        // swings the output by tens of PPM.  Inside the equilibrium band,
        // pull the estimate towards the known clean-air level.
        if ratio > self.recovery_low && ratio < self.recovery_high {
            ppm = ppm * RECOVERY_COMPUTED_WEIGHT
                + self.clean_air_ppm * (1.0 - RECOVERY_COMPUTED_WEIGHT);
        }

        ppm.clamp(0.0, self.ppm_ceiling)
    }

    /// Deviation-adaptive smoothing.
    ///
    /// Keeps a running sum over the last `SMOOTHING_WINDOW` samples.  While
    /// the window is still filling, the instantaneous value passes through.
    /// Once primed: samples within 30 % of the running average return the
    /// plain average (noise rejection); larger excursions return a 30/70
    /// average/current blend so a genuine gas spike is not flattened away.
    fn smooth(&mut self, current: f32) -> f32 {
        self.total -= self.ring[self.head];
        self.ring[self.head] = current;
        self.total += current;

        self.head += 1;
        if self.head >= SMOOTHING_WINDOW {
            self.head = 0;
            self.primed = true;
        }

        if !self.primed {
            return current;
        }

        let average = self.total / SMOOTHING_WINDOW as f32;
        if (current - average).abs() > average * SPIKE_DEVIATION {
            average * SPIKE_AVERAGE_WEIGHT + current * SPIKE_CURRENT_WEIGHT
        } else {
            average
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        crate::drivers::hw_init::adc1_read(self.adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        let _ = self.adc_channel;
        SIM_MQ2_ADC.load(Ordering::Relaxed)
    }

    #[cfg(target_os = "espidf")]
    fn settle(&self) {
        esp_idf_hal::delay::FreeRtos::delay_ms(self.calibration_delay_ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn settle(&self) {}
}

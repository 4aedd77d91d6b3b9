//! MQ-135 air-quality sensor driver (CO2-equivalent channel).
//!
//! Secondary channel published in telemetry alongside the combustible-gas
//! estimate.  Same voltage-divider front end and power-law conversion as the
//! MQ-2, but instantaneous — no smoothing window and no clean-air recovery
//! blend — and it never drives the alert logic.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH7 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::{AtomicU16, Ordering};

use log::{info, warn};

use crate::config::{AnalogFrontend, CurveParams, SystemConfig};
use crate::sensors::quality::AirQuality;

static SIM_MQ135_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_mq135_adc(raw: u16) {
    SIM_MQ135_ADC.store(raw, Ordering::Relaxed);
}

/// Divider output below this (volts) means the signal path is dead.
const MIN_VALID_VOLTAGE: f32 = 0.01;

/// One processed sample from the MQ-135 channel.
#[derive(Debug, Clone, Copy)]
pub struct Co2Reading {
    /// Raw ADC count (0 – 4095).
    pub raw: u16,
    /// Divider output voltage (volts).
    pub voltage: f32,
    /// CO2-equivalent concentration (PPM), finite and non-negative.
    pub ppm: f32,
}

pub struct Mq135Sensor {
    frontend: AnalogFrontend,
    curve: CurveParams,
    clean_air_ratio: f32,
    ppm_ceiling: f32,
    breakpoints: [f32; 6],
    calibration_samples: u16,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    calibration_delay_ms: u32,

    /// Clean-air baseline resistance R0 (kΩ).  0.0 = not yet calibrated.
    baseline_kohm: f32,

    adc_channel: u32,
}

impl Mq135Sensor {
    pub fn new(adc_channel: u32, config: &SystemConfig) -> Self {
        Self {
            frontend: config.frontend,
            curve: config.co2_curve,
            clean_air_ratio: config.co2_clean_air_ratio,
            ppm_ceiling: config.ppm_ceiling,
            breakpoints: config.co2_breakpoints_ppm,
            calibration_samples: config.calibration_samples,
            calibration_delay_ms: config.calibration_sample_delay_ms,
            baseline_kohm: 0.0,
            adc_channel,
        }
    }

    /// Establish the clean-air baseline resistance R0.
    ///
    /// **Blocking**, same procedure and guards as the MQ-2 channel; the
    /// MQ-135 settles at Rs/R0 ≈ 9.83 in clean air, so the measured Rs is
    /// divided down accordingly.
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
                "MQ-135 calibration failed: divider output {:.3} V — staying uncalibrated",
                voltage
            );
            self.baseline_kohm = 0.0;
            return;
        }

        let rs = self.divider_resistance(voltage);
        self.baseline_kohm = rs / self.clean_air_ratio;
        info!(
            "MQ-135 calibrated: R0 = {:.2} kΩ (Rs {:.2} kΩ at {:.2} V)",
            self.baseline_kohm, rs, voltage
        );
    }

    /// True once a clean-air baseline has been established.
    pub fn is_calibrated(&self) -> bool {
        self.baseline_kohm > 0.0
    }

    /// Take one instantaneous sample.  0 PPM while uncalibrated.
    pub fn read(&mut self) -> Co2Reading {
        let raw = self.read_adc();
        let voltage = self.adc_to_voltage(f32::from(raw));
        let resistance_kohm = self.divider_resistance(voltage.max(MIN_VALID_VOLTAGE));

        let ratio = if self.baseline_kohm > 0.0 {
            resistance_kohm / self.baseline_kohm
        } else {
            0.0
        };

        let ppm = if ratio <= 0.0 {
            0.0
        } else {
            (self.curve.scale * ratio.powf(self.curve.exponent)).clamp(0.0, self.ppm_ceiling)
        };

        Co2Reading { raw, voltage, ppm }
    }

    /// Classify a concentration against this channel's breakpoints.
    pub fn air_quality(&self, ppm: f32) -> AirQuality {
        AirQuality::from_ppm(ppm, &self.breakpoints)
    }

    // ── Internal ──────────────────────────────────────────────────

    fn adc_to_voltage(&self, adc: f32) -> f32 {
        adc / f32::from(self.frontend.adc_full_scale) * self.frontend.reference_voltage
    }

    fn divider_resistance(&self, vout: f32) -> f32 {
        (self.frontend.reference_voltage - vout) / vout * self.frontend.load_resistance_kohm
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        crate::drivers::hw_init::adc1_read(self.adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        let _ = self.adc_channel;
        SIM_MQ135_ADC.load(Ordering::Relaxed)
    }

    #[cfg(target_os = "espidf")]
    fn settle(&self) {
        esp_idf_hal::delay::FreeRtos::delay_ms(self.calibration_delay_ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn settle(&self) {}
}

//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns both gas channels and produces a [`GasSnapshot`] each
//! sampling tick for the application service.

pub mod mq135;
pub mod mq2;
pub mod quality;

use crate::app::ports::SensorPort;
use mq135::Mq135Sensor;
use mq2::Mq2Sensor;
use quality::AirQuality;

/// A point-in-time snapshot of both gas channels.
#[derive(Debug, Clone, Copy)]
pub struct GasSnapshot {
    /// Raw ADC count from the MQ-2 channel (0 – 4095).
    pub mq2_raw: u16,
    /// Smoothed combustible-gas concentration (PPM).
    pub gas_ppm: f32,
    /// Combustible-gas quality label.
    pub gas_quality: AirQuality,
    /// CO2-equivalent concentration (PPM), instantaneous.
    pub co2_ppm: f32,
    /// CO2 quality label.
    pub co2_quality: AirQuality,
    /// True once the MQ-2 clean-air baseline is established.
    pub calibrated: bool,
}

impl Default for GasSnapshot {
    fn default() -> Self {
        Self {
            mq2_raw: 0,
            gas_ppm: 0.0,
            gas_quality: AirQuality::Excellent,
            co2_ppm: 0.0,
            co2_quality: AirQuality::Excellent,
            calibrated: false,
        }
    }
}

/// Aggregates both gas sensors and produces a unified snapshot.
pub struct SensorHub {
    pub mq2: Mq2Sensor,
    pub mq135: Mq135Sensor,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main where
    /// peripheral ownership is established).
    pub fn new(mq2: Mq2Sensor, mq135: Mq135Sensor) -> Self {
        Self { mq2, mq135 }
    }

    /// Run the blocking clean-air calibration on both channels.
    pub fn calibrate_all(&mut self) {
        self.mq2.calibrate();
        self.mq135.calibrate();
    }

    /// Read both channels and return a unified snapshot.
    ///
    /// Uncalibrated channels report 0 PPM / `Excellent` rather than failing —
    /// one dead sensor must not stall the control loop.
    pub fn read_all(&mut self) -> GasSnapshot {
        let gas = self.mq2.read();
        let co2 = self.mq135.read();

        GasSnapshot {
            mq2_raw: gas.raw,
            gas_ppm: gas.ppm,
            gas_quality: self.mq2.air_quality(gas.ppm),
            co2_ppm: co2.ppm,
            co2_quality: self.mq135.air_quality(co2.ppm),
            calibrated: self.mq2.is_calibrated(),
        }
    }
}

impl SensorPort for SensorHub {
    fn read_gas(&mut self) -> GasSnapshot {
        self.read_all()
    }
}

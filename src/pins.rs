#![allow(dead_code)] // The pin map is the schematic's single source of truth; not every assignment is referenced on every build target

//! GPIO / peripheral pin assignments for the AirGuard main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! Targets the classic ESP32 (not S3): ADC1 channels live on GPIO 32–39.

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// MQ-2 combustible-gas sensor — analog voltage across the load resistor.
/// ADC1 channel 6 (GPIO 34, input-only).
pub const MQ2_ADC_GPIO: i32 = 34;
/// ADC1 channel number for the MQ-2 sensor.
pub const ADC1_CH_MQ2: u32 = 6;

/// MQ-135 air-quality sensor — CO2-equivalent estimate for telemetry.
/// ADC1 channel 7 (GPIO 35, input-only).
pub const MQ135_ADC_GPIO: i32 = 35;
/// ADC1 channel number for the MQ-135 sensor.
pub const ADC1_CH_MQ135: u32 = 7;

// ---------------------------------------------------------------------------
// Alert outputs
// ---------------------------------------------------------------------------

/// Indicator LED — digital output, active HIGH.
pub const ALERT_LED_GPIO: i32 = 25;
/// Sounder (active buzzer module) — digital output, active HIGH.
pub const SOUNDER_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Relay (powers the alert-output rail)
// ---------------------------------------------------------------------------

/// Relay module coil input — active LOW (common opto-isolated boards).
/// Held energised in normal operation so the LED/sounder rail has power.
pub const RELAY_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// I²C bus (reserved for the external display head, rendered elsewhere)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 1;
pub const UART_RX_GPIO: i32 = 3;

//! AirGuard Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single-threaded poll loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SensorHub          LogEventSink      CommandMailbox           │
//! │  (SensorPort)       (EventSink)       (transport → loop)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Alert arbitration · Relay · Telemetry                 │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Poll loop: sample → commands → telemetry → tick, every 100 ms │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod pins;

pub mod alert;
pub mod app;

mod adapters;
mod drivers;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::command_mailbox;
use adapters::log_sink::LogEventSink;
use adapters::time::MonotonicTime;
use alert::AlertController;
use app::events::AppEvent;
use app::ports::EventSink;
use app::service::AppService;
use config::SystemConfig;
use drivers::relay::RelayDriver;
use drivers::watchdog::Watchdog;
use sensors::mq135::Mq135Sensor;
use sensors::mq2::Mq2Sensor;
use sensors::SensorHub;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  AirGuard v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Hardware peripherals ───────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new(10_000);

    // ── 3. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;

    let time = MonotonicTime::new();

    // ── 4. Sensors: warm-up, then clean-air calibration ───────
    let mut hub = SensorHub::new(
        Mq2Sensor::new(pins::ADC1_CH_MQ2, &config),
        Mq135Sensor::new(pins::ADC1_CH_MQ135, &config),
    );

    info!(
        "Warming up gas sensor heaters ({} s)...",
        config.sensor_warmup_secs
    );
    for elapsed in 1..=config.sensor_warmup_secs {
        esp_idf_hal::delay::FreeRtos::delay_ms(1000);
        watchdog.feed();
        if elapsed % 10 == 0 {
            info!("  warm-up {}/{} s", elapsed, config.sensor_warmup_secs);
        }
    }

    info!("Calibrating in clean air — keep the sensor away from gas sources");
    hub.calibrate_all();
    if !hub.mq2.is_calibrated() {
        warn!("MQ-2 baseline not established — readings will degrade to 0 ppm");
    }

    // ── 5. Actuators + application service ────────────────────
    let alert = AlertController::new(pins::ALERT_LED_GPIO, pins::SOUNDER_GPIO, &config);
    let relay = RelayDriver::new(pins::RELAY_GPIO, config.relay_debounce_ms);
    let mut app = AppService::new(alert, relay, &config);
    let mut sink = LogEventSink::new();

    app.start(time.uptime_ms(), hub.mq2.is_calibrated(), &mut sink);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    //
    // Manual elapsed-time checks against the monotonic clock; the alert
    // timers tick every iteration and rate-limit themselves.  Wrapping
    // arithmetic keeps everything correct across the u32 ms rollover.
    let command_poll_ms = u32::from(config.command_poll_interval_secs) * 1000;
    let telemetry_ms = config.telemetry_interval_secs * 1000;

    let start_ms = time.uptime_ms();
    let mut last_sample_ms = start_ms;
    let mut last_command_ms = start_ms;
    let mut last_telemetry_ms = start_ms;

    loop {
        let now_ms = time.uptime_ms();

        // Gas sampling + threshold evaluation (runtime-adjustable rate).
        if now_ms.wrapping_sub(last_sample_ms) >= app.sampling_interval_ms() {
            last_sample_ms = now_ms;
            app.sample(&mut hub, &mut sink);
            let snap = app.last_snapshot();
            info!(
                "Gas: {:.1} ppm ({}) | CO2: {:.1} ppm ({})",
                snap.gas_ppm, snap.gas_quality, snap.co2_ppm, snap.co2_quality
            );
        }

        // Dashboard commands, funnelled through the mailbox.
        if now_ms.wrapping_sub(last_command_ms) >= command_poll_ms {
            last_command_ms = now_ms;
            command_mailbox::drain_commands(|cmd| {
                info!("Command received: {:?}", cmd);
                app.handle_command(cmd, now_ms, &mut sink);
            });
        }

        // Telemetry report.
        if now_ms.wrapping_sub(last_telemetry_ms) >= telemetry_ms {
            last_telemetry_ms = now_ms;
            sink.emit(&AppEvent::Telemetry(app.build_telemetry()));
        }

        // Blink/beep timing — every iteration, non-blocking.
        app.tick(now_ms);

        watchdog.feed();
        esp_idf_hal::delay::FreeRtos::delay_ms(100);
    }
}

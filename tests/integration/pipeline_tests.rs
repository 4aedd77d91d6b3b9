//! End-to-end estimation pipeline tests: injected ADC counts → sensor hub →
//! service → alert outputs.
//!
//! These exercise the real `Mq2Sensor`/`Mq135Sensor` conversion math via the
//! host-side simulated ADC, not a scripted port.

use std::sync::Mutex;

use crate::mock_hw::RecordingSink;

use airguard::alert::AlertController;
use airguard::app::service::AppService;
use airguard::config::SystemConfig;
use airguard::drivers::relay::RelayDriver;
use airguard::sensors::mq135::{sim_set_mq135_adc, Mq135Sensor};
use airguard::sensors::mq2::{sim_set_mq2_adc, Mq2Sensor};
use airguard::sensors::quality::AirQuality;
use airguard::sensors::SensorHub;

// The simulated ADC registers are process-wide statics; serialise the tests
// that touch them.
static ADC_LOCK: Mutex<()> = Mutex::new(());

/// Mid-scale count: divider at ~1.65 V, Rs ≈ 10 kΩ — a clean-air operating
/// point for the default front end.
const CLEAN_AIR_ADC: u16 = 2048;
/// High count: divider at ~2.63 V, Rs ≈ 2.6 kΩ — heavy combustible-gas load
/// (~1500 ppm instantaneous on the default curve).
const GAS_SPIKE_ADC: u16 = 3259;

fn make_system() -> (SensorHub, AppService, RecordingSink) {
    let config = SystemConfig::default();
    let hub = SensorHub::new(
        Mq2Sensor::new(6, &config),
        Mq135Sensor::new(7, &config),
    );
    let app = AppService::new(
        AlertController::new(25, 27, &config),
        RelayDriver::new(26, config.relay_debounce_ms),
        &config,
    );
    (hub, app, RecordingSink::new())
}

#[test]
fn clean_air_settles_near_the_baseline_ppm() {
    let _guard = ADC_LOCK.lock().unwrap();
    let (mut hub, mut app, mut sink) = make_system();

    sim_set_mq2_adc(CLEAN_AIR_ADC);
    sim_set_mq135_adc(CLEAN_AIR_ADC);
    hub.calibrate_all();
    assert!(hub.mq2.is_calibrated());

    app.sample(&mut hub, &mut sink);
    let snap = app.last_snapshot();

    // Ratio ≈ 1.0: curve value 50 blended 30/70 towards the 15 ppm clean-air
    // baseline → ~25.5 ppm, classified Good.
    assert!((snap.gas_ppm - 25.5).abs() < 1.0, "got {}", snap.gas_ppm);
    assert_eq!(snap.gas_quality, AirQuality::Good);
    assert!(!app.alert().is_active());
}

#[test]
fn gas_spike_drives_the_alert_through_the_whole_chain() {
    let _guard = ADC_LOCK.lock().unwrap();
    let (mut hub, mut app, mut sink) = make_system();

    sim_set_mq2_adc(CLEAN_AIR_ADC);
    sim_set_mq135_adc(CLEAN_AIR_ADC);
    hub.calibrate_all();

    // Establish a clean-air history in the smoothing window first.
    for _ in 0..12 {
        app.sample(&mut hub, &mut sink);
    }
    assert!(!app.alert().is_active());

    // Sustained spike: Rs collapses, ratio ~0.26, curve ~1500 ppm.  The
    // adaptive filter fast-tracks the excursion (30/70 blend towards the
    // current sample), so the alert engages within a few samples instead of
    // waiting out the whole window.
    sim_set_mq2_adc(GAS_SPIKE_ADC);
    for _ in 0..6 {
        app.sample(&mut hub, &mut sink);
    }
    assert!(app.alert().is_active(), "alert did not engage on spike");
    assert_eq!(sink.activations(), 1);

    // Outputs blink once the timers elapse.
    app.tick(500);
    assert!(app.alert().indicator_level());

    // Clean air returns; the window drains and the alert releases.
    sim_set_mq2_adc(CLEAN_AIR_ADC);
    for _ in 0..15 {
        app.sample(&mut hub, &mut sink);
    }
    assert!(!app.alert().is_active(), "alert did not release");
    assert_eq!(sink.deactivations(), 1);
    assert!(!app.alert().indicator_level());
    assert!(!app.alert().sounder_level());
}

#[test]
fn uncalibrated_system_stays_quiet() {
    let _guard = ADC_LOCK.lock().unwrap();
    let (mut hub, mut app, mut sink) = make_system();

    // No calibration at all; even a screaming ADC must read as 0 ppm.
    sim_set_mq2_adc(4000);
    sim_set_mq135_adc(4000);
    for _ in 0..12 {
        app.sample(&mut hub, &mut sink);
    }

    let snap = app.last_snapshot();
    assert_eq!(snap.gas_ppm, 0.0);
    assert_eq!(snap.gas_quality, AirQuality::Excellent);
    assert!(!snap.calibrated);
    assert!(!app.alert().is_active());
    assert_eq!(sink.activations(), 0);
}

#[test]
fn co2_channel_rides_along_in_the_snapshot() {
    let _guard = ADC_LOCK.lock().unwrap();
    let (mut hub, mut app, mut sink) = make_system();

    sim_set_mq2_adc(CLEAN_AIR_ADC);
    sim_set_mq135_adc(CLEAN_AIR_ADC);
    hub.calibrate_all();

    // Elevated MQ-135 reading, clean MQ-2: telemetry shows CO2 without
    // touching the alert state.
    sim_set_mq135_adc(3600);
    app.sample(&mut hub, &mut sink);
    let snap = app.last_snapshot();

    assert!(snap.co2_ppm > 5.0);
    assert!(!app.alert().is_active(), "CO2 channel never drives the alert");
}

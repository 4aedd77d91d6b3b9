//! Property and fuzz-style tests for robustness of the estimation and
//! alert cores.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use airguard::alert::AlertController;
use airguard::config::SystemConfig;
use airguard::sensors::quality::AirQuality;

// ── Air-quality classification ────────────────────────────────

proptest! {
    /// The label is monotonically non-decreasing in concentration.
    #[test]
    fn quality_label_is_monotonic(a in 0.0f32..12_000.0, b in 0.0f32..12_000.0) {
        let bands = SystemConfig::default().quality_breakpoints_ppm;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            AirQuality::from_ppm(lo, &bands) <= AirQuality::from_ppm(hi, &bands)
        );
    }

    /// Exact breakpoints classify into the tier above; a hair below stays in
    /// the tier beneath.
    #[test]
    fn breakpoints_belong_to_the_higher_tier(idx in 0usize..6) {
        let bands = SystemConfig::default().quality_breakpoints_ppm;
        let at = AirQuality::from_ppm(bands[idx], &bands);
        let below = AirQuality::from_ppm(bands[idx] - 0.01, &bands);
        prop_assert!(at > below);
    }
}

// ── Estimation pipeline ───────────────────────────────────────

// The simulated ADC register is a process-wide static; the two tests below
// must not interleave their injections.
static ADC_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

proptest! {
    /// Whatever the ADC reports, and whether or not the sensor calibrated,
    /// a reading is always finite, non-negative, and under the ceiling.
    #[test]
    fn readings_are_always_finite_and_bounded(
        calibration_adc in proptest::option::of(0u16..=4095),
        samples in proptest::collection::vec(0u16..=u16::MAX, 1..40),
    ) {
        use airguard::sensors::mq2::{sim_set_mq2_adc, Mq2Sensor};

        let _guard = ADC_LOCK.lock().unwrap();
        let config = SystemConfig::default();
        let mut sensor = Mq2Sensor::new(6, &config);

        if let Some(adc) = calibration_adc {
            sim_set_mq2_adc(adc);
            sensor.calibrate();
        }

        for raw in samples {
            sim_set_mq2_adc(raw);
            let r = sensor.read();
            prop_assert!(r.ppm.is_finite());
            prop_assert!(r.ppm >= 0.0);
            prop_assert!(r.ppm <= config.ppm_ceiling);
        }
    }

    /// Feeding the same concentration for a full window converges the
    /// smoothed output to that concentration exactly.
    #[test]
    fn constant_input_converges(adc in 100u16..=4000) {
        use airguard::sensors::mq2::{sim_set_mq2_adc, Mq2Sensor};

        let _guard = ADC_LOCK.lock().unwrap();
        let config = SystemConfig::default();
        let mut sensor = Mq2Sensor::new(6, &config);
        sim_set_mq2_adc(2048);
        sensor.calibrate();

        sim_set_mq2_adc(adc);
        let mut last = 0.0f32;
        let mut instantaneous = 0.0f32;
        for i in 0..=10 {
            let r = sensor.read();
            if i == 0 {
                instantaneous = r.ppm;
            }
            last = r.ppm;
        }
        prop_assert!((last - instantaneous).abs() <= instantaneous.abs() * 1e-4 + 1e-4);
    }
}

// ── Alert hysteresis ──────────────────────────────────────────

proptest! {
    /// Once engaged, readings anywhere inside the dead zone can never
    /// release the alert — no flicker at the band edges.
    #[test]
    fn dead_zone_never_releases(
        readings in proptest::collection::vec(900.0f32..1000.0, 1..50),
    ) {
        let config = SystemConfig::default();
        let mut alert = AlertController::new(25, 27, &config);

        alert.check_level(config.alert_activate_ppm);
        prop_assert!(alert.is_active());

        for ppm in readings {
            alert.check_level(ppm);
            prop_assert!(alert.is_active(), "released inside the dead zone at {ppm}");
        }
    }

    /// And symmetrically: while idle, dead-zone readings never engage it.
    #[test]
    fn dead_zone_never_engages(
        readings in proptest::collection::vec(900.0f32..1000.0, 1..50),
    ) {
        let config = SystemConfig::default();
        let mut alert = AlertController::new(25, 27, &config);

        for ppm in readings {
            alert.check_level(ppm);
            prop_assert!(!alert.is_active(), "engaged inside the dead zone at {ppm}");
        }
    }
}

// ── Override precedence under arbitrary operation sequences ──

#[derive(Debug, Clone)]
enum Op {
    SetIndicator(bool, bool),
    SetSounder(bool, bool),
    SetCombined(bool, bool),
    Clear,
    CheckLevel(f32),
    Tick(u32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), any::<bool>()).prop_map(|(e, l)| Op::SetIndicator(e, l)),
        (any::<bool>(), any::<bool>()).prop_map(|(e, l)| Op::SetSounder(e, l)),
        (any::<bool>(), any::<bool>()).prop_map(|(e, l)| Op::SetCombined(e, l)),
        Just(Op::Clear),
        (0.0f32..5000.0).prop_map(Op::CheckLevel),
        (0u32..1_000_000).prop_map(Op::Tick),
    ]
}

proptest! {
    /// Whatever sequence of overrides, readings, and ticks is thrown at the
    /// controller, an engaged independent override pins its output at the
    /// forced level — and with no override and no automatic mode, both
    /// outputs sit low after a tick.
    #[test]
    fn forced_levels_always_win(ops in proptest::collection::vec(arb_op(), 1..60)) {
        let config = SystemConfig::default();
        let mut alert = AlertController::new(25, 27, &config);

        for op in ops {
            match op {
                Op::SetIndicator(e, l) => alert.set_indicator_override(e, l),
                Op::SetSounder(e, l) => alert.set_sounder_override(e, l),
                Op::SetCombined(e, l) => alert.set_combined_override(e, l),
                Op::Clear => alert.clear_overrides(),
                Op::CheckLevel(ppm) => alert.check_level(ppm),
                Op::Tick(t) => alert.tick(t),
            }

            if let Some(level) = alert.indicator_override() {
                prop_assert_eq!(alert.indicator_level(), level);
            } else if let Some(level) = alert.combined_override() {
                prop_assert_eq!(alert.indicator_level(), level);
            }

            if let Some(level) = alert.sounder_override() {
                prop_assert_eq!(alert.sounder_level(), level);
            } else if let Some(level) = alert.combined_override() {
                prop_assert_eq!(alert.sounder_level(), level);
            }
        }

        // Quiescent check: drop every override, drive below the band, tick —
        // both outputs must rest low.
        alert.clear_overrides();
        alert.check_level(0.0);
        alert.tick(2_000_000);
        prop_assert!(!alert.indicator_level());
        prop_assert!(!alert.sounder_level());
    }
}

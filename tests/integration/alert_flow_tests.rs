//! Service-level tests for the sampling → threshold → alert-output chain.
//!
//! Drives `AppService` with scripted concentrations and asserts on the alert
//! controller's automatic state, the physical output levels, and the events
//! that reach the sink.

use crate::mock_hw::{RecordingSink, ScriptedSensors};

use airguard::alert::AlertController;
use airguard::app::commands::AppCommand;
use airguard::app::events::AppEvent;
use airguard::app::service::AppService;
use airguard::config::SystemConfig;
use airguard::drivers::relay::RelayDriver;

fn make_app() -> (AppService, ScriptedSensors, RecordingSink) {
    let config = SystemConfig::default();
    let mut app = AppService::new(
        AlertController::new(25, 27, &config),
        RelayDriver::new(26, config.relay_debounce_ms),
        &config,
    );
    let mut sink = RecordingSink::new();
    app.start(0, true, &mut sink);
    (app, ScriptedSensors::new(), sink)
}

// ── Hysteresis through the full sampling path ────────────────

#[test]
fn hysteresis_band_tracks_expected_state_sequence() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.extend(&[200.0, 1000.0, 1200.0, 950.0, 850.0]);

    let expected = [false, true, true, true, false];
    for want in expected {
        app.sample(&mut hw, &mut sink);
        assert_eq!(app.alert().is_active(), want);
    }

    assert_eq!(sink.activations(), 1, "exactly one activation edge");
    assert_eq!(sink.deactivations(), 1, "exactly one deactivation edge");
}

#[test]
fn readings_in_dead_zone_never_toggle_state() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.set_constant(1100.0);
    app.sample(&mut hw, &mut sink);
    assert!(app.alert().is_active());

    // Anything strictly between deactivate (900) and activate (1000)
    // leaves the engaged state alone.
    hw.extend(&[999.0, 901.0, 950.0, 925.0, 990.0]);
    for _ in 0..5 {
        app.sample(&mut hw, &mut sink);
        assert!(app.alert().is_active(), "flickered inside the dead zone");
    }
    assert_eq!(sink.activations(), 1);
    assert_eq!(sink.deactivations(), 0);
}

// ── Override scenarios ────────────────────────────────────────

#[test]
fn sounder_override_is_immediate_and_resumes_beeping_after_release() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.set_constant(1500.0);
    app.sample(&mut hw, &mut sink);
    assert!(app.alert().is_active());

    // Force HIGH: audible before any tick.
    app.handle_command(
        AppCommand::SetSounderOverride {
            enabled: true,
            level: true,
        },
        100,
        &mut sink,
    );
    assert!(app.alert().sounder_level());

    // Ticks must not disturb the forced level.
    for t in [200, 700, 1300, 2500] {
        app.tick(t);
        assert!(app.alert().sounder_level());
    }

    // Release: LOW immediately, beeping resumes at the next boundary.
    app.handle_command(
        AppCommand::SetSounderOverride {
            enabled: false,
            level: false,
        },
        2600,
        &mut sink,
    );
    assert!(!app.alert().sounder_level());

    app.tick(3000);
    assert!(app.alert().sounder_level(), "beeping resumed");
}

#[test]
fn indicator_override_holds_level_regardless_of_alert_state() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(
        AppCommand::SetIndicatorOverride {
            enabled: true,
            level: true,
        },
        0,
        &mut sink,
    );
    assert!(app.alert().indicator_level());

    // Concentration readings are ignored while any override is engaged.
    hw.set_constant(5000.0);
    for t in (0..5000).step_by(250) {
        app.sample(&mut hw, &mut sink);
        app.tick(t);
        assert!(app.alert().indicator_level());
    }
    assert!(!app.alert().is_active());
    assert_eq!(sink.activations(), 0);
}

#[test]
fn clearing_overrides_returns_control_to_the_level_check() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(
        AppCommand::SetCombinedOverride {
            enabled: true,
            level: false,
        },
        0,
        &mut sink,
    );
    hw.set_constant(2000.0);
    app.sample(&mut hw, &mut sink);
    assert!(!app.alert().is_active(), "override suppresses the check");

    app.handle_command(AppCommand::ClearOverrides, 500, &mut sink);
    app.sample(&mut hw, &mut sink);
    assert!(app.alert().is_active(), "next sample re-engages automatic mode");

    app.tick(1000);
    assert!(app.alert().indicator_level(), "blinking resumed after clear");
}

#[test]
fn override_events_reach_the_sink() {
    let (mut app, _hw, mut sink) = make_app();

    app.handle_command(
        AppCommand::SetIndicatorOverride {
            enabled: true,
            level: true,
        },
        0,
        &mut sink,
    );
    app.handle_command(
        AppCommand::SetSounderOverride {
            enabled: true,
            level: false,
        },
        0,
        &mut sink,
    );
    app.handle_command(AppCommand::ClearOverrides, 0, &mut sink);

    // Two engagements + two releases.
    assert_eq!(sink.override_changes(), 4);
}

// ── Runtime configuration ─────────────────────────────────────

#[test]
fn sampling_interval_command_round_trips() {
    let (mut app, _hw, mut sink) = make_app();

    app.handle_command(AppCommand::SetSamplingInterval { secs: 60 }, 0, &mut sink);
    assert_eq!(app.sampling_interval_ms(), 60_000);
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::SamplingIntervalChanged { secs: 60 })));

    // Out-of-range values are rejected and leave the interval untouched.
    app.handle_command(AppCommand::SetSamplingInterval { secs: 301 }, 0, &mut sink);
    assert_eq!(app.sampling_interval_ms(), 60_000);
}

#[test]
fn telemetry_snapshot_reports_the_whole_picture() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.set_constant(1200.0);
    app.sample(&mut hw, &mut sink);
    app.tick(500); // indicator toggles on

    let t = app.build_telemetry();
    assert!(t.alert_active);
    assert!(t.indicator_on);
    assert!(t.relay_on);
    assert!(t.calibrated);
    assert!(!t.override_engaged);
    assert!((t.gas_ppm - 1200.0).abs() < f32::EPSILON);
}

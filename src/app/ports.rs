//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (the sensor hub, event sinks) implement these traits.
//! The [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches hardware directly.  The alert output
//! pins are the one deliberate exception: the alert controller owns them
//! outright, because override setters must drive the physical level at set
//! time and no other component is allowed to write those pins.

use crate::sensors::GasSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain gas readings.
pub trait SensorPort {
    /// Read both gas channels and return a unified snapshot.
    fn read_gas(&mut self) -> GasSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, MQTT
/// bridge, dashboard push, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

//! Relay driver for the alert-output power rail.
//!
//! Common opto-isolated relay boards energise on a LOW coil input, so the
//! logical state is inverted at the pin.  A debounce window suppresses
//! rapid-fire toggles from the command path — mechanical relays arc when
//! chattered.
//!
//! Normal operation keeps the relay ON so the LED/sounder rail has power;
//! the application service re-asserts this when an output override arrives.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use log::info;

use crate::drivers::hw_init;

pub struct RelayDriver {
    gpio: i32,
    on: bool,
    debounce_ms: u32,
    last_toggle_ms: u32,
    has_toggled: bool,
}

impl RelayDriver {
    /// Wrap the relay GPIO, de-energised (coil input HIGH).
    pub fn new(gpio: i32, debounce_ms: u32) -> Self {
        hw_init::gpio_write(gpio, true);
        Self {
            gpio,
            on: false,
            debounce_ms,
            last_toggle_ms: 0,
            has_toggled: false,
        }
    }

    /// Request a state change.  Returns `true` if the relay actually moved;
    /// `false` when the request was a no-op or fell inside the debounce
    /// window.
    pub fn set_state(&mut self, now_ms: u32, on: bool) -> bool {
        if on == self.on {
            return false;
        }
        if self.has_toggled && now_ms.wrapping_sub(self.last_toggle_ms) < self.debounce_ms {
            return false;
        }

        self.on = on;
        // Active-LOW coil input.
        hw_init::gpio_write(self.gpio, !on);
        self.last_toggle_ms = now_ms;
        self.has_toggled = true;
        info!("Relay: {}", if on { "ON" } else { "OFF" });
        true
    }

    pub fn turn_on(&mut self, now_ms: u32) -> bool {
        self.set_state(now_ms, true)
    }

    pub fn turn_off(&mut self, now_ms: u32) -> bool {
        self.set_state(now_ms, false)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

//! Adapters — concrete implementations of the hexagonal port traits and the
//! thin bridges to the outside world.
//!
//! | Adapter           | Implements / provides | Connects to               |
//! |-------------------|-----------------------|---------------------------|
//! | `command_mailbox` | Command hand-off      | Transport callbacks → loop|
//! | `log_sink`        | EventSink             | Serial log output         |
//! | `time`            | Monotonic clock       | ESP32 system timer        |

pub mod command_mailbox;
pub mod log_sink;
pub mod time;

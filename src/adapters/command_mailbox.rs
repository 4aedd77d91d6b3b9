//! Inbound command mailbox.
//!
//! The hand-off point between whatever transport delivers dashboard commands
//! (MQTT callback, serial task, test harness) and the single-threaded
//! control loop.  Producers push already-deserialized [`AppCommand`]s; the
//! loop drains the mailbox at its command-poll interval and applies them
//! through [`AppService::handle_command`](crate::app::service::AppService::handle_command).
//!
//! Override state is therefore never mutated from callback context — every
//! mutation happens on the loop, between a `tick()` and the next.  The queue
//! is bounded and heap-free; when it overflows, the newest command is
//! rejected and the producer is told so it can surface the drop.

use std::sync::Mutex;

use log::warn;

use crate::app::commands::AppCommand;

/// Maximum commands buffered between loop polls.
const MAILBOX_CAP: usize = 8;

static MAILBOX: Mutex<heapless::Deque<AppCommand, MAILBOX_CAP>> =
    Mutex::new(heapless::Deque::new());

/// Enqueue a command for the control loop.  Returns `false` (and logs) if
/// the mailbox is full — the command is dropped, not blocked on.
pub fn push_command(cmd: AppCommand) -> bool {
    let Ok(mut mailbox) = MAILBOX.lock() else {
        return false;
    };
    match mailbox.push_back(cmd) {
        Ok(()) => true,
        Err(_) => {
            warn!("Command mailbox full — dropping {:?}", cmd);
            false
        }
    }
}

/// Dequeue the oldest pending command, if any.  Called from the loop.
pub fn take_command() -> Option<AppCommand> {
    MAILBOX.lock().ok()?.pop_front()
}

/// Drain every pending command into a handler, in arrival order.
pub fn drain_commands(mut handler: impl FnMut(AppCommand)) {
    while let Some(cmd) = take_command() {
        handler(cmd);
    }
}

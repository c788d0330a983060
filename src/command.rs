//! Menu commands and the channel that carries them.
//!
//! Button tasks post with [`post`] (never blocks, drops when full);
//! the menu task awaits the receiver.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

/// Queue depth, same as the FreeRTOS queue the remote always used.
pub const COMMAND_QUEUE_DEPTH: usize = 10;

/// One menu action. Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Top,
    Bottom,
    Select,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Up => "up",
            Command::Down => "down",
            Command::Top => "top",
            Command::Bottom => "bottom",
            Command::Select => "select",
        }
    }
}

/// Multi-producer, single-consumer command queue.
pub type CommandChannel = Channel<CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>;

/// Producer handle held by each button task.
pub type CommandSender<'a> = Sender<'a, CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>;

/// Consumer handle held by the menu task.
pub type CommandReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>;

/// Create a channel, usable in a `static`.
pub const fn new_channel() -> CommandChannel {
    Channel::new()
}

/// Best-effort post. Returns `false` when the queue was full and the
/// command was dropped.
pub fn post(tx: &CommandSender<'_>, cmd: Command) -> bool {
    tx.try_send(cmd).is_ok()
}

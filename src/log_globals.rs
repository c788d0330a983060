//! Global log stream instance.
//!
//! Button tasks and the menu task all push here; the binary's drain
//! thread is the single consumer.

use crate::logging::LogStream;

/// Event log shared by every task.
pub static EVENT_LOG: LogStream = LogStream::new();

//! Console drain for the event log.
//!
//! ```text
//! EVENT_LOG ──▶ LogDrain::pump ──▶ console (stdout / UART0)
//! ```
//!
//! Runs in its own low-priority thread on the device. Writing may block;
//! producers never wait on it. Drop counts are reported at most once per
//! [`DROP_REPORT_INTERVAL_MS`].

use core::fmt::Write;

use crate::logging::{drain_into, LogStream};

/// Minimum time between two "dropped" reports.
pub const DROP_REPORT_INTERVAL_MS: u64 = 10_000;

/// Sleep of the drain thread when nothing was written.
pub const IDLE_DELAY_MS: u32 = 20;

/// Drain state.
#[derive(Debug, Default)]
pub struct LogDrain {
    last_report_ms: u64,
}

impl LogDrain {
    pub const fn new() -> Self {
        Self { last_report_ms: 0 }
    }

    /// Write everything pending, plus a drop report when one is due.
    ///
    /// Returns the number of lines written; 0 means the caller may sleep.
    pub fn pump<const N: usize>(
        &mut self,
        stream: &LogStream<N>,
        now_ms: u64,
        out: &mut dyn Write,
    ) -> usize {
        let mut written = drain_into(stream, out);

        if now_ms.saturating_sub(self.last_report_ms) >= DROP_REPORT_INTERVAL_MS {
            let dropped = stream.dropped();
            if dropped > 0 {
                let _ = writeln!(out, "[{:8}] WARN: log dropped {} messages", now_ms, dropped);
                stream.reset_dropped();
                written += 1;
            }
            self.last_report_ms = now_ms;
        }

        written
    }
}

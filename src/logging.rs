//! Non-blocking event log for M5IrRemote.
//!
//! ```text
//! Button tasks ─┐
//!               ├─▶ LogStream [L0][L1][L2] ──▶ drain thread ──▶ console UART
//! Menu task ────┘     lock-free                 blocking ok
//! ```
//!
//! Producers never block: a full ring drops the message and counts it.
//! Formatting happens into a stack buffer, no heap.

use core::cell::UnsafeCell;
use core::fmt::Write as _;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Milliseconds since boot.
    pub timestamp_ms: u64,
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    pub const EMPTY: Self = Self {
        timestamp_ms: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text; invalid UTF-8 is cut at the first bad byte.
    pub fn text(&self) -> &str {
        let bytes = &self.msg[..self.len as usize];
        match core::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
        }
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free log ring (many producers, single drain).
///
/// A producer reserves a slot by advancing `write_idx` with a CAS, so a
/// full ring never hands out an index. The slot is published through
/// its `ready` flag once the bytes are in place; the drain stops at the
/// first slot that is reserved but not yet published.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: [UnsafeCell<LogEntry>; N],
    ready: [AtomicBool; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: a slot is written only by the producer that reserved it and read
// only by the single drain after `ready` is observed with Acquire.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: [const { UnsafeCell::new(LogEntry::EMPTY) }; N],
            ready: [const { AtomicBool::new(false) }; N],
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry, never blocks.
    ///
    /// Returns `true` if message was queued, `false` if dropped (ring full).
    pub fn push(&self, timestamp_ms: u64, level: LogLevel, msg: &[u8]) -> bool {
        let mut write = self.write_idx.load(Ordering::Relaxed);
        loop {
            let read = self.read_idx.load(Ordering::Acquire);
            if write.wrapping_sub(read) >= N as u32 {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self.write_idx.compare_exchange_weak(
                write,
                write.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => write = current,
            }
        }

        let idx = (write as usize) & Self::MASK;
        let len = msg.len().min(MAX_MSG_LEN);

        // SAFETY: slot `idx` was reserved by the CAS above and is not
        // published yet, so nobody else touches it.
        unsafe {
            let entry = &mut *self.entries[idx].get();
            entry.timestamp_ms = timestamp_ms;
            entry.level = level;
            entry.len = len as u8;
            entry.msg[..len].copy_from_slice(&msg[..len]);
        }
        self.ready[idx].store(true, Ordering::Release);
        true
    }

    /// Drain next log entry (single consumer).
    ///
    /// Returns `None` if nothing is published at the read position.
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let idx = (read as usize) & Self::MASK;

        if !self.ready[idx].load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: published slot, single consumer
        let entry = unsafe { *self.entries[idx].get() };

        self.ready[idx].store(false, Ordering::Relaxed);
        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Get number of reserved entries not yet drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// `core::fmt::Write` over a byte slice, truncating silently.
struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl core::fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written.
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Write an entry as `[timestamp_ms] LEVEL: message\n`.
pub fn write_entry(entry: &LogEntry, out: &mut dyn core::fmt::Write) -> core::fmt::Result {
    writeln!(
        out,
        "[{:8}] {}: {}",
        entry.timestamp_ms,
        entry.level.as_str(),
        entry.text()
    )
}

/// Drain everything currently published into `out`.
///
/// Returns the number of entries written.
pub fn drain_into<const N: usize>(
    stream: &LogStream<N>,
    out: &mut dyn core::fmt::Write,
) -> usize {
    let mut count = 0;
    while let Some(entry) = stream.drain() {
        let _ = write_entry(&entry, out);
        count += 1;
    }
    count
}

/// Log macro, never blocks.
///
/// # Example
///
/// ```ignore
/// ev_log!(LogLevel::Info, EVENT_LOG, now_ms, "cmd={:?}", cmd);
/// ```
#[macro_export]
macro_rules! ev_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, &buf[..len]);
    }};
}

/// Info log.
#[macro_export]
macro_rules! ev_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::ev_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! ev_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::ev_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Error log.
#[macro_export]
macro_rules! ev_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::ev_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! ev_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::ev_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Info, b"loaded 7 entries"));
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_ms, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.text(), "loaded 7 entries");

        assert!(stream.drain().is_none());
        assert_eq!(stream.pending(), 0);
    }

    #[test]
    fn test_log_stream_full_drops_without_losing_order() {
        let stream = LogStream::<4>::new();

        assert!(stream.push(1, LogLevel::Info, b"1"));
        assert!(stream.push(2, LogLevel::Info, b"2"));
        assert!(stream.push(3, LogLevel::Info, b"3"));
        assert!(stream.push(4, LogLevel::Info, b"4"));

        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);

        assert_eq!(stream.drain().unwrap().text(), "1");
        assert!(stream.push(6, LogLevel::Info, b"6"));

        let rest: Vec<u64> = core::iter::from_fn(|| stream.drain())
            .map(|e| e.timestamp_ms)
            .collect();
        assert_eq!(rest, vec![2, 3, 4, 6]);
    }

    #[test]
    fn test_long_message_truncated() {
        let stream = LogStream::<4>::new();
        let long = [b'x'; MAX_MSG_LEN + 20];

        assert!(stream.push(0, LogLevel::Warn, &long));
        assert_eq!(stream.drain().unwrap().len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_write_entry() {
        let stream = LogStream::<4>::new();
        ev_warn!(stream, 1234, "dropped {:?}", "Down");

        let entry = stream.drain().unwrap();
        let mut formatted = String::new();
        write_entry(&entry, &mut formatted).unwrap();

        assert!(formatted.contains("1234"));
        assert!(formatted.contains("WARN"));
        assert!(formatted.contains("dropped \"Down\""));
        assert!(formatted.ends_with('\n'));
    }

    #[test]
    fn test_drain_into_writer() {
        let stream = LogStream::<8>::new();
        ev_info!(stream, 1, "first");
        ev_error!(stream, 2, "second");

        let mut out = String::new();
        assert_eq!(drain_into(&stream, &mut out), 2);
        assert!(out.contains("INFO: first"));
        assert!(out.contains("ERROR: second"));
    }

    #[test]
    fn test_multiple_producers() {
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<64>::new());
        let mut handles = vec![];

        for i in 0..4 {
            let stream = Arc::clone(&stream);
            handles.push(thread::spawn(move || {
                for j in 0..10 {
                    let msg = format!("button {} press {}", i, j);
                    stream.push(j as u64, LogLevel::Info, msg.as_bytes());
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let mut count = 0;
        while stream.drain().is_some() {
            count += 1;
        }
        assert_eq!(count, 40, "All messages should be present");
        assert_eq!(stream.dropped(), 0);
    }
}

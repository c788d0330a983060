//! Host mocks for the hardware seams.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};

use m5_ir_remote::button::{Clock, POLL_INTERVAL_MS};
use m5_ir_remote::entry::{Entry, EntryStore};
use m5_ir_remote::error::{Peripheral, RemoteError};
use m5_ir_remote::hal::{Color, Display, RowSpan, Transmitter};
use m5_ir_remote::menu::MenuOptions;

/// One recorded display call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear(Color),
    Fill(RowSpan, Color),
    Title(String, Color),
    Row(usize, String, Color),
}

/// Display that records every call.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub ops: Vec<DrawOp>,
    /// Fail every call once this many calls succeeded
    pub fail_after: Option<usize>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows drawn with `Color::Highlight`, in order.
    pub fn highlighted(&self) -> Vec<(usize, String)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Row(row, text, Color::Highlight) => Some((*row, text.clone())),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, op: DrawOp) -> Result<(), RemoteError> {
        if self.fail_after.is_some_and(|n| self.ops.len() >= n) {
            return Err(RemoteError::HardwareFault {
                peripheral: Peripheral::Display,
                code: -1,
            });
        }
        self.ops.push(op);
        Ok(())
    }
}

impl Display for RecordingDisplay {
    fn clear(&mut self, color: Color) -> Result<(), RemoteError> {
        self.record(DrawOp::Clear(color))
    }

    fn fill_rect(&mut self, span: RowSpan, color: Color) -> Result<(), RemoteError> {
        self.record(DrawOp::Fill(span, color))
    }

    fn draw_title(&mut self, text: &str, color: Color) -> Result<(), RemoteError> {
        self.record(DrawOp::Title(text.to_string(), color))
    }

    fn draw_row(&mut self, row: usize, text: &str, color: Color) -> Result<(), RemoteError> {
        self.record(DrawOp::Row(row, text.to_string(), color))
    }
}

/// Transmitter that records every frame.
#[derive(Debug, Default)]
pub struct RecordingTransmitter {
    pub sent: Vec<(u16, u16)>,
    pub fail: bool,
}

impl RecordingTransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Vec::new(),
            fail: true,
        }
    }
}

impl Transmitter for RecordingTransmitter {
    fn transmit(&mut self, address: u16, command: u16) -> Result<(), RemoteError> {
        if self.fail {
            return Err(RemoteError::HardwareFault {
                peripheral: Peripheral::Transmitter,
                code: 0x103,
            });
        }
        self.sent.push((address, command));
        Ok(())
    }
}

/// Clock advanced only by `pause`.
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<u64>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn pause(&self) {
        self.now.set(self.now.get() + u64::from(POLL_INTERVAL_MS));
    }
}

/// Active-low pin replaying a script of samples; errors once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedPin {
    /// `true` = line low (pressed)
    samples: VecDeque<bool>,
}

impl ScriptedPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// `idle` released samples, then `pressed` low samples, then one
    /// released sample. Each sample lasts one poll interval, so the
    /// measured hold time is `(pressed - 1) * POLL_INTERVAL_MS`.
    pub fn press(mut self, idle: usize, pressed: usize) -> Self {
        self.samples.extend(std::iter::repeat(false).take(idle));
        self.samples.extend(std::iter::repeat(true).take(pressed));
        self.samples.push_back(false);
        self
    }

    /// Press lasting `held_ms` as the source will measure it.
    pub fn press_for(self, held_ms: u64) -> Self {
        let pressed = (held_ms / u64::from(POLL_INTERVAL_MS)) as usize + 1;
        self.press(1, pressed)
    }
}

impl ErrorType for ScriptedPin {
    type Error = ErrorKind;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.samples.pop_front().ok_or(ErrorKind::Other)
    }
}

/// Store holding `(label, command, address)` records.
pub fn store(limit: usize, records: &[(&str, u8, u8)]) -> EntryStore {
    let mut store = EntryStore::new(limit);
    for (label, command, address) in records {
        store
            .push(Entry::new(label, 26, *command, *address))
            .expect("store full");
    }
    store
}

/// `count` entries labelled `E0`, `E1`, ...
pub fn numbered(count: usize) -> EntryStore {
    let mut store = EntryStore::new(20);
    for i in 0..count {
        store
            .push(Entry::new(&format!("E{}", i), 26, i as u8, 0))
            .expect("store full");
    }
    store
}

pub fn options(visible_rows: usize) -> MenuOptions {
    MenuOptions {
        title: "M5 Test",
        visible_rows,
        wrap_down: false,
        alternate_after_select: false,
    }
}

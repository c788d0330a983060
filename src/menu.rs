//! Menu controller: selection/scroll state machine.
//!
//! Single consumer of the command channel. Owns the entries and the
//! window position and is the only code that draws or transmits.
//!
//! ```text
//!   title row      M5 StickC+
//!   window row 0   Power          <- offset
//!   window row 1   Vol, Up        <- offset + selected (highlighted)
//!   ...
//!   window row V-1 ...
//! ```
//!
//! Invariant: `selected < visible_rows` and `offset + selected < count`
//! whenever `count > 0`. With `count == 0` every command is ignored.

use core::convert::Infallible;

use crate::board::BoardProfile;
use crate::button::Clock;
use crate::command::{Command, CommandReceiver};
use crate::entry::EntryStore;
use crate::error::RemoteError;
use crate::hal::{Color, Display, RowSpan, Transmitter};
use crate::logging::LogStream;
use crate::{ev_debug, ev_error, ev_info};

/// What a navigation step changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Nothing (already at an end)
    Stay,
    /// Highlight moved between two window rows
    Row { from: usize, to: usize },
    /// Window scrolled, highlight stayed on the same row
    Scroll,
}

/// Window position over `count` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    selected: usize,
    offset: usize,
    count: usize,
    visible_rows: usize,
}

impl MenuState {
    /// Initial position `(0, 0)`.
    ///
    /// # Panics
    ///
    /// If `visible_rows` is zero.
    pub fn new(count: usize, visible_rows: usize) -> Self {
        assert!(visible_rows > 0, "window needs at least one row");
        Self {
            selected: 0,
            offset: 0,
            count,
            visible_rows,
        }
    }

    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Index of the highlighted entry.
    #[inline]
    pub fn current(&self) -> usize {
        self.selected + self.offset
    }

    pub fn is_at_first(&self) -> bool {
        self.current() == 0
    }

    pub fn is_at_last(&self) -> bool {
        self.current() + 1 >= self.count
    }

    pub fn is_valid(&self) -> bool {
        self.count == 0 || (self.selected < self.visible_rows && self.current() < self.count)
    }

    pub fn down(&mut self) -> Move {
        if self.count == 0 || self.is_at_last() {
            return Move::Stay;
        }
        if self.selected + 1 == self.visible_rows {
            self.offset += 1;
            Move::Scroll
        } else {
            let from = self.selected;
            self.selected += 1;
            Move::Row {
                from,
                to: self.selected,
            }
        }
    }

    pub fn up(&mut self) -> Move {
        if self.count == 0 || self.is_at_first() {
            return Move::Stay;
        }
        if self.offset > 0 {
            self.offset -= 1;
            Move::Scroll
        } else {
            let from = self.selected;
            self.selected -= 1;
            Move::Row {
                from,
                to: self.selected,
            }
        }
    }

    /// Highlight entry `index`, scrolling as little as needed. Out of
    /// range is ignored.
    pub fn jump(&mut self, index: usize) {
        if index >= self.count {
            return;
        }
        if index < self.visible_rows {
            self.offset = 0;
            self.selected = index;
        } else {
            self.offset = index + 1 - self.visible_rows;
            self.selected = self.visible_rows - 1;
        }
    }

    pub fn top(&mut self) {
        self.offset = 0;
        self.selected = 0;
    }

    pub fn bottom(&mut self) {
        if self.count == 0 {
            return;
        }
        self.offset = self.count.saturating_sub(self.visible_rows);
        self.selected = self.count.min(self.visible_rows) - 1;
    }
}

/// Board-specific menu behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOptions {
    pub title: &'static str,
    pub visible_rows: usize,
    pub wrap_down: bool,
    pub alternate_after_select: bool,
}

impl From<&BoardProfile> for MenuOptions {
    fn from(profile: &BoardProfile) -> Self {
        Self {
            title: profile.title,
            visible_rows: profile.visible_rows,
            wrap_down: profile.wrap_down,
            alternate_after_select: profile.alternate_after_select,
        }
    }
}

/// The menu task.
pub struct MenuController<'a, D, T, C> {
    entries: EntryStore,
    state: MenuState,
    options: MenuOptions,
    display: D,
    transmitter: T,
    clock: C,
    log: &'a LogStream,
}

impl<'a, D, T, C> MenuController<'a, D, T, C>
where
    D: Display,
    T: Transmitter,
    C: Clock,
{
    pub fn new(
        entries: EntryStore,
        options: MenuOptions,
        display: D,
        transmitter: T,
        clock: C,
        log: &'a LogStream,
    ) -> Self {
        let state = MenuState::new(entries.len(), options.visible_rows);
        Self {
            entries,
            state,
            options,
            display,
            transmitter,
            clock,
            log,
        }
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn entries(&self) -> &EntryStore {
        &self.entries
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn transmitter(&self) -> &T {
        &self.transmitter
    }

    /// Draw the first screen: title, window, row 0 highlighted.
    pub fn show(&mut self) -> Result<(), RemoteError> {
        self.display.clear(Color::Background)?;
        self.display.draw_title(self.options.title, Color::Title)?;
        if self.state.count() == 0 {
            return Ok(());
        }
        self.redraw_window()
    }

    /// Apply one command.
    pub fn handle(&mut self, cmd: Command) -> Result<(), RemoteError> {
        if self.state.count() == 0 {
            return Ok(());
        }

        ev_debug!(
            self.log,
            self.clock.now_ms(),
            "cmd={} selected={} offset={} count={}",
            cmd.as_str(),
            self.state.selected(),
            self.state.offset(),
            self.state.count()
        );

        match cmd {
            Command::Down => self.down()?,
            Command::Up => {
                let mv = self.state.up();
                self.apply_move(mv)?;
            }
            Command::Top => {
                self.state.top();
                self.redraw_window()?;
            }
            Command::Bottom => {
                self.state.bottom();
                self.redraw_window()?;
            }
            Command::Select => {
                self.select()?;
                if self.options.alternate_after_select {
                    self.alternate()?;
                }
            }
        }

        debug_assert!(self.state.is_valid(), "menu state out of range");
        Ok(())
    }

    /// Wait for one command and apply it.
    pub async fn step(&mut self, rx: &CommandReceiver<'_>) -> Result<Command, RemoteError> {
        let cmd = rx.receive().await;
        self.handle(cmd)?;
        Ok(cmd)
    }

    /// Serve commands until a hardware fault.
    pub async fn run(&mut self, rx: CommandReceiver<'_>) -> Result<Infallible, RemoteError> {
        loop {
            self.step(&rx).await?;
        }
    }

    fn down(&mut self) -> Result<(), RemoteError> {
        if self.state.is_at_last() && self.options.wrap_down {
            self.state.top();
            return self.redraw_window();
        }
        let mv = self.state.down();
        self.apply_move(mv)
    }

    /// Entry 0 goes to 1, anything else back to 0. Fewer than two
    /// entries stay on 0.
    fn alternate(&mut self) -> Result<(), RemoteError> {
        let next = if self.state.current() == 0 && self.state.count() > 1 {
            1
        } else {
            0
        };
        if next == self.state.current() {
            return Ok(());
        }
        self.state.jump(next);
        self.redraw_window()
    }

    fn select(&mut self) -> Result<(), RemoteError> {
        let index = self.state.current();
        let now = self.clock.now_ms();
        let Some(entry) = self.entries.get(index) else {
            ev_error!(self.log, now, "select: no entry at {}", index);
            return Ok(());
        };

        let code = entry.ir_code();
        ev_info!(
            self.log,
            now,
            "select {} [{}] cmd=0x{:02x} addr=0x{:02x} -> cmd=0x{:04x} addr=0x{:04x}",
            index,
            entry.label.as_str(),
            entry.command,
            entry.address,
            code.command,
            code.address
        );
        self.transmitter.transmit(code.address, code.command)
    }

    fn apply_move(&mut self, mv: Move) -> Result<(), RemoteError> {
        match mv {
            Move::Stay => Ok(()),
            Move::Row { from, to } => {
                self.draw_entry(from, Color::Normal)?;
                self.draw_entry(to, Color::Highlight)
            }
            Move::Scroll => self.redraw_window(),
        }
    }

    /// Clear the list area and draw every window row; rows past the
    /// last entry are blank.
    fn redraw_window(&mut self) -> Result<(), RemoteError> {
        let rows = self.state.visible_rows();
        let span = RowSpan {
            first: 0,
            count: rows,
        };
        self.display.fill_rect(span, Color::Background)?;
        for row in 0..rows {
            let color = if row == self.state.selected() {
                Color::Highlight
            } else {
                Color::Normal
            };
            self.draw_entry(row, color)?;
        }
        Ok(())
    }

    fn draw_entry(&mut self, row: usize, color: Color) -> Result<(), RemoteError> {
        let entry = self.entries.slot(self.state.offset() + row);
        let text = if entry.enabled {
            entry.label.as_str()
        } else {
            ""
        };
        self.display.draw_row(row, text, color)
    }
}

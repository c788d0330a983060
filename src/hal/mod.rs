//! Hardware seams for M5IrRemote.
//!
//! Business logic talks to the panel and the IR LED only through these
//! traits. The ESP-IDF implementations live in `esp`, console versions
//! in [`text`]; tests bring their own.

#[cfg(target_os = "espidf")]
pub mod esp;
pub mod text;

use crate::error::RemoteError;

/// Logical colours used by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Screen background (black on every board)
    Background,
    /// Board name in the title row (red)
    Title,
    /// Unselected entry (cyan)
    Normal,
    /// Selected entry (yellow)
    Highlight,
}

/// A band of window rows, `first..first + count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub first: usize,
    pub count: usize,
}

/// Text display, addressed in window rows below the title.
///
/// Every call must be visible before it returns; the menu never queues
/// draws.
pub trait Display {
    /// Fill the whole screen.
    fn clear(&mut self, color: Color) -> Result<(), RemoteError>;

    /// Fill a band of window rows.
    fn fill_rect(&mut self, span: RowSpan, color: Color) -> Result<(), RemoteError>;

    /// Draw the title row.
    fn draw_title(&mut self, text: &str, color: Color) -> Result<(), RemoteError>;

    /// Draw `text` on window row `row`. Idempotent.
    fn draw_row(&mut self, row: usize, text: &str, color: Color) -> Result<(), RemoteError>;
}

/// NEC transmitter taking the already complemented 16-bit halves.
pub trait Transmitter {
    fn transmit(&mut self, address: u16, command: u16) -> Result<(), RemoteError>;
}

impl<D: Display + ?Sized> Display for &mut D {
    fn clear(&mut self, color: Color) -> Result<(), RemoteError> {
        (**self).clear(color)
    }

    fn fill_rect(&mut self, span: RowSpan, color: Color) -> Result<(), RemoteError> {
        (**self).fill_rect(span, color)
    }

    fn draw_title(&mut self, text: &str, color: Color) -> Result<(), RemoteError> {
        (**self).draw_title(text, color)
    }

    fn draw_row(&mut self, row: usize, text: &str, color: Color) -> Result<(), RemoteError> {
        (**self).draw_row(row, text, color)
    }
}

impl<T: Transmitter + ?Sized> Transmitter for &mut T {
    fn transmit(&mut self, address: u16, command: u16) -> Result<(), RemoteError> {
        (**self).transmit(address, command)
    }
}

/// Display for boards without a panel (M5Atom).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDisplay;

impl Display for NoDisplay {
    fn clear(&mut self, _color: Color) -> Result<(), RemoteError> {
        Ok(())
    }

    fn fill_rect(&mut self, _span: RowSpan, _color: Color) -> Result<(), RemoteError> {
        Ok(())
    }

    fn draw_title(&mut self, _text: &str, _color: Color) -> Result<(), RemoteError> {
        Ok(())
    }

    fn draw_row(&mut self, _row: usize, _text: &str, _color: Color) -> Result<(), RemoteError> {
        Ok(())
    }
}

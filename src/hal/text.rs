//! Line-oriented display and transmitter over any `fmt::Write`.
//!
//! Used on the console (UART on the device, stdout in the simulator).
//! The highlighted row is marked with `>`:
//!
//! ```text
//! == M5 StickC+ ==
//!    0 Power
//!  > 1 Vol, Up
//! ```

use core::fmt::Write;

use super::{Color, Display, RowSpan, Transmitter};
use crate::error::{Peripheral, RemoteError};
use crate::ir::nec_verify;

fn marker(color: Color) -> &'static str {
    match color {
        Color::Highlight => " >",
        _ => "  ",
    }
}

/// Prints every draw call as one line.
pub struct TextDisplay<W> {
    out: W,
}

impl<W: Write> TextDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn emit(&mut self, args: core::fmt::Arguments<'_>) -> Result<(), RemoteError> {
        self.out
            .write_fmt(args)
            .map_err(|_| RemoteError::hardware(Peripheral::Display))
    }
}

impl<W: Write> Display for TextDisplay<W> {
    fn clear(&mut self, _color: Color) -> Result<(), RemoteError> {
        self.emit(format_args!("\n"))
    }

    fn fill_rect(&mut self, span: RowSpan, _color: Color) -> Result<(), RemoteError> {
        if span.count > 0 {
            self.emit(format_args!("--\n"))?;
        }
        Ok(())
    }

    fn draw_title(&mut self, text: &str, _color: Color) -> Result<(), RemoteError> {
        self.emit(format_args!("== {} ==\n", text))
    }

    fn draw_row(&mut self, row: usize, text: &str, color: Color) -> Result<(), RemoteError> {
        self.emit(format_args!("{} {:2} {}\n", marker(color), row, text))
    }
}

/// Prints each frame instead of sending it.
pub struct TextTransmitter<W> {
    out: W,
}

impl<W: Write> TextTransmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Transmitter for TextTransmitter<W> {
    fn transmit(&mut self, address: u16, command: u16) -> Result<(), RemoteError> {
        let ok = nec_verify(address).is_some() && nec_verify(command).is_some();
        writeln!(
            self.out,
            "IR addr=0x{:04x} cmd=0x{:04x}{}",
            address,
            command,
            if ok { "" } else { " (not NEC)" }
        )
        .map_err(|_| RemoteError::hardware(Peripheral::Transmitter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_mark_highlight() {
        let mut display = TextDisplay::new(String::new());
        display.draw_title("M5 Stack", Color::Title).unwrap();
        display.draw_row(0, "Power", Color::Normal).unwrap();
        display.draw_row(1, "Vol, Up", Color::Highlight).unwrap();

        let lines: Vec<&str> = display.get_ref().lines().collect();
        assert_eq!(lines, ["== M5 Stack ==", "    0 Power", " >  1 Vol, Up"]);
    }

    #[test]
    fn test_transmit_prints_frame() {
        let mut tx = TextTransmitter::new(String::new());
        tx.transmit(0xFF00, 0xEA15).unwrap();
        assert_eq!(tx.get_ref().as_str(), "IR addr=0xff00 cmd=0xea15\n");
    }
}

//! NEC-style code transform.
//!
//! Each stored byte goes on air next to its one's complement:
//!
//! ```text
//!   v = 0x15  ──▶  t = 0xEA15
//!                     ││└┴─ v
//!                     └┴─── !v
//! ```

/// Extend a stored byte to the 16-bit value handed to the transmitter.
#[inline]
pub const fn nec_extend(v: u8) -> u16 {
    ((!v as u16) << 8) | v as u16
}

/// Recover the byte from an extended value, `None` if the complement
/// half does not match.
#[inline]
pub const fn nec_verify(t: u16) -> Option<u8> {
    let low = (t & 0xFF) as u8;
    let high = (t >> 8) as u8;
    if low ^ high == 0xFF {
        Some(low)
    } else {
        None
    }
}

/// Address/command pair ready for [`crate::hal::Transmitter::transmit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrCode {
    pub address: u16,
    pub command: u16,
}

impl IrCode {
    /// Apply [`nec_extend`] to both stored fields.
    pub const fn from_raw(address: u8, command: u8) -> Self {
        Self {
            address: nec_extend(address),
            command: nec_extend(command),
        }
    }
}

/// Leading burst, carrier on.
pub const NEC_LEADER_MARK_US: u16 = 9000;
/// Gap after the leading burst.
pub const NEC_LEADER_SPACE_US: u16 = 4500;
/// Burst before every bit and at the end of the frame.
pub const NEC_BIT_MARK_US: u16 = 560;
pub const NEC_ZERO_SPACE_US: u16 = 560;
pub const NEC_ONE_SPACE_US: u16 = 1690;

/// Symbols in one frame: leader, 32 bits, trailing burst.
pub const NEC_FRAME_SYMBOLS: usize = 34;

/// One carrier burst followed by silence, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub mark_us: u16,
    pub space_us: u16,
}

/// Symbols of one NEC frame.
pub type NecFrame = heapless::Vec<Symbol, NEC_FRAME_SYMBOLS>;

/// Encode a frame: leader, `address` then `command`, each LSB first,
/// then a closing burst.
pub fn nec_frame(address: u16, command: u16) -> NecFrame {
    let mut frame = NecFrame::new();
    let mut push = |symbol| {
        // Capacity is exactly one frame
        let _ = frame.push(symbol);
    };

    push(Symbol {
        mark_us: NEC_LEADER_MARK_US,
        space_us: NEC_LEADER_SPACE_US,
    });
    for half in [address, command] {
        for bit in 0..16 {
            let space_us = if half & (1 << bit) != 0 {
                NEC_ONE_SPACE_US
            } else {
                NEC_ZERO_SPACE_US
            };
            push(Symbol {
                mark_us: NEC_BIT_MARK_US,
                space_us,
            });
        }
    }
    push(Symbol {
        mark_us: NEC_BIT_MARK_US,
        space_us: 0,
    });
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_every_byte() {
        for v in 0..=255u8 {
            let t = nec_extend(v);
            assert_eq!(t & 0xFF, v as u16);
            assert_eq!((t >> 8) & 0xFF, (!v) as u16 & 0xFF);
            assert_eq!(nec_verify(t), Some(v));
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(nec_extend(0x00), 0xFF00);
        assert_eq!(nec_extend(0x01), 0xFE01);
        assert_eq!(nec_extend(0x15), 0xEA15);
        assert_eq!(nec_extend(0xFF), 0x00FF);
    }

    #[test]
    fn test_verify_rejects_broken_complement() {
        assert_eq!(nec_verify(0x0000), None);
        assert_eq!(nec_verify(0xFE02), None);
    }

    #[test]
    fn test_frame_layout() {
        let code = IrCode::from_raw(0x00, 0x15);
        let frame = nec_frame(code.address, code.command);
        assert_eq!(frame.len(), NEC_FRAME_SYMBOLS);
        assert_eq!(frame[0].mark_us, NEC_LEADER_MARK_US);
        assert_eq!(frame[0].space_us, NEC_LEADER_SPACE_US);

        // Address 0xFF00: eight zeros then eight ones
        assert!(frame[1..9].iter().all(|s| s.space_us == NEC_ZERO_SPACE_US));
        assert!(frame[9..17].iter().all(|s| s.space_us == NEC_ONE_SPACE_US));

        // Command 0xEA15, LSB first: 1,0,1,0,1,0,0,0
        let low: Vec<bool> = frame[17..25]
            .iter()
            .map(|s| s.space_us == NEC_ONE_SPACE_US)
            .collect();
        assert_eq!(low, [true, false, true, false, true, false, false, false]);

        let last = frame[NEC_FRAME_SYMBOLS - 1];
        assert_eq!(last.mark_us, NEC_BIT_MARK_US);
        assert_eq!(last.space_us, 0);
    }
}

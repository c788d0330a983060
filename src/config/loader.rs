//! Configuration loader
//!
//! Reads `label, command_hex, address_hex` records into an
//! [`EntryStore`]. Hex is read the way `strtol(s, NULL, 16)` reads it:
//! a bad field becomes 0 instead of failing the record. That is
//! reported as an advisory, never as an error.

use super::parser::parse_fields;
use super::LINE_CAPACITY;
use crate::board::BoardProfile;
use crate::entry::{Entry, EntryStore};
use crate::error::{Advisory, RemoteError};

/// One raw line.
pub type LineBuffer = heapless::String<LINE_CAPACITY>;

/// Where configuration lines come from.
///
/// Opening the resource is the caller's business; a failed open is
/// [`RemoteError::ConfigMissing`].
pub trait ConfigSource {
    /// Replace `line` with the next line, newline optional. Returns
    /// `false` at end of input.
    fn read_line(&mut self, line: &mut LineBuffer) -> Result<bool, RemoteError>;
}

/// Lines of an in-memory string.
pub struct StrSource<'a> {
    rest: Option<&'a str>,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            rest: if text.is_empty() { None } else { Some(text) },
        }
    }
}

impl ConfigSource for StrSource<'_> {
    fn read_line(&mut self, line: &mut LineBuffer) -> Result<bool, RemoteError> {
        let Some(rest) = self.rest else {
            return Ok(false);
        };
        let (head, tail) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], Some(&rest[pos + 1..]).filter(|t| !t.is_empty())),
            None => (rest, None),
        };
        self.rest = tail;

        line.clear();
        for c in head.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        Ok(true)
    }
}

/// Limits taken from the board profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLimits {
    pub max_entries: usize,
    pub label_len: usize,
}

impl From<&BoardProfile> for EntryLimits {
    fn from(profile: &BoardProfile) -> Self {
        Self {
            max_entries: profile.max_entries,
            label_len: profile.label_len,
        }
    }
}

/// What happened while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Record lines with fewer than three fields
    pub skipped_lines: usize,
    pub malformed_fields: usize,
    /// More records followed once the store was full
    pub truncated: bool,
}

/// Result of a permissive hex read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexValue {
    pub value: u8,
    /// Whole field was hex and fit in a byte
    pub clean: bool,
}

/// Read a hex byte like `strtol(.., 16)`.
///
/// Surrounding blanks, a `+`/`-` sign and a `0x`/`0X` prefix are
/// accepted. The longest run of hex digits is used and no digits reads
/// as 0. Only the low byte is kept, so `-1` reads as `0xFF` (not clean).
pub fn parse_hex(field: &str) -> HexValue {
    let text = field.trim();
    let (negative, text) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    let mut value: u32 = 0;
    let mut seen = 0;
    for c in digits.chars() {
        match c.to_digit(16) {
            Some(d) => {
                value = value.saturating_mul(16).saturating_add(d);
                seen += 1;
            }
            None => break,
        }
    }

    let consumed_all = seen == digits.chars().count();
    let low = if negative {
        value.wrapping_neg()
    } else {
        value
    };
    HexValue {
        value: (low & 0xFF) as u8,
        clean: seen > 0 && consumed_all && value <= 0xFF && !negative,
    }
}

/// Load entries from `source`.
///
/// Comment (`#`) and empty lines are skipped. Loading stops once
/// `limits.max_entries` entries are stored. Each advisory is passed to
/// `on_advisory` as it is found.
///
/// # Errors
///
/// [`RemoteError::ConfigEmpty`] when nothing usable was found, or
/// whatever the source reports.
pub fn load_config<S, F>(
    source: &mut S,
    limits: EntryLimits,
    mut on_advisory: F,
) -> Result<(EntryStore, LoadReport), RemoteError>
where
    S: ConfigSource + ?Sized,
    F: FnMut(Advisory),
{
    let mut store = EntryStore::new(limits.max_entries);
    let mut report = LoadReport::default();
    let mut line = LineBuffer::new();
    let mut line_no = 0;

    while source.read_line(&mut line)? {
        line_no += 1;

        let text = line.as_str();
        let text = text.strip_suffix('\n').unwrap_or(text);
        let text = text.strip_suffix('\r').unwrap_or(text);
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let fields = parse_fields(text);
        if fields.len() < 3 {
            report.skipped_lines += 1;
            continue;
        }

        if store.is_full() {
            report.truncated = true;
            on_advisory(Advisory::ConfigTruncated);
            break;
        }

        let command = parse_hex(&fields[1]);
        let address = parse_hex(&fields[2]);
        for (field, hex) in [(2, command), (3, address)] {
            if !hex.clean {
                report.malformed_fields += 1;
                on_advisory(Advisory::MalformedField {
                    line: line_no,
                    field,
                });
            }
        }

        let entry = Entry::new(&fields[0], limits.label_len, command.value, address.value);
        if store.push(entry).is_ok() {
            report.loaded += 1;
        }
    }

    if store.is_empty() {
        return Err(RemoteError::ConfigEmpty);
    }
    Ok((store, report))
}

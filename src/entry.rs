//! Entries and the bounded store the menu walks over.

use crate::config::{LABEL_CAPACITY, MAX_CONFIG_CAPACITY};
use crate::ir::IrCode;

/// Display text of an entry.
pub type Label = heapless::String<LABEL_CAPACITY>;

/// One configured remote button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub enabled: bool,
    pub label: Label,
    pub command: u8,
    pub address: u8,
}

impl Entry {
    /// Placeholder for slots past the loaded count.
    pub const DISABLED: Entry = Entry {
        enabled: false,
        label: Label::new(),
        command: 0,
        address: 0,
    };

    /// Build an enabled entry, keeping at most `label_len` characters.
    pub fn new(label: &str, label_len: usize, command: u8, address: u8) -> Self {
        let mut kept = Label::new();
        for c in label.chars().take(label_len) {
            if kept.push(c).is_err() {
                break;
            }
        }
        Self {
            enabled: true,
            label: kept,
            command,
            address,
        }
    }

    /// Code handed to the transmitter for this entry.
    pub fn ir_code(&self) -> IrCode {
        IrCode::from_raw(self.address, self.command)
    }
}

static DISABLED_ENTRY: Entry = Entry::DISABLED;

/// Ordered, contiguous entries, bounded by a runtime limit.
#[derive(Debug, Clone)]
pub struct EntryStore {
    entries: heapless::Vec<Entry, MAX_CONFIG_CAPACITY>,
    limit: usize,
}

impl EntryStore {
    /// Create an empty store holding at most `limit` entries.
    ///
    /// # Panics
    ///
    /// If `limit` is zero or above [`MAX_CONFIG_CAPACITY`].
    pub fn new(limit: usize) -> Self {
        assert!(
            limit > 0 && limit <= MAX_CONFIG_CAPACITY,
            "entry limit out of range"
        );
        Self {
            entries: heapless::Vec::new(),
            limit,
        }
    }

    /// Append an entry; gives it back when the store is full.
    pub fn push(&mut self, entry: Entry) -> Result<(), Entry> {
        if self.is_full() {
            return Err(entry);
        }
        self.entries.push(entry)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.limit
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Entry at `index`, or the disabled placeholder past the end.
    pub fn slot(&self, index: usize) -> &Entry {
        self.entries.get(index).unwrap_or(&DISABLED_ENTRY)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}

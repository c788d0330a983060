//! Board profiles.
//!
//! One profile per supported M5 device. Everything that used to differ
//! between per-board builds (geometry, buttons, limits, IR pin) is data
//! here, and the menu, loader and button tasks read it at runtime.

use crate::command::Command;
use crate::config::{LABEL_CAPACITY, MAX_CONFIG_CAPACITY};

/// Physical button and the commands it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonBinding {
    /// Task name, shown in logs
    pub name: &'static str,
    /// GPIO number, active low
    pub gpio: i32,
    /// Command for a short press
    pub tap: Command,
    /// Command for a press held past the hold threshold, if any
    pub hold: Option<Command>,
}

/// Static description of one device variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardProfile {
    pub name: &'static str,
    /// Text drawn in the title row
    pub title: &'static str,
    /// Entries kept from the configuration file
    pub max_entries: usize,
    /// Characters kept from each label
    pub label_len: usize,
    /// Entries visible at once
    pub visible_rows: usize,
    pub buttons: &'static [ButtonBinding],
    /// RMT output pin driving the IR LED
    pub ir_gpio: i32,
    /// Pin that must be driven high to keep the board powered
    pub power_hold_gpio: Option<i32>,
    pub has_display: bool,
    /// Down on the last entry jumps back to the first
    pub wrap_down: bool,
    /// Toggle between the first two entries after each transmission
    pub alternate_after_select: bool,
}

impl BoardProfile {
    /// Check limits against the hard capacities.
    pub const fn is_valid(&self) -> bool {
        self.max_entries > 0
            && self.max_entries <= MAX_CONFIG_CAPACITY
            && self.label_len > 0
            && self.label_len <= LABEL_CAPACITY
            && self.visible_rows > 0
            && !self.buttons.is_empty()
    }

    /// Look a profile up by name (`m5stack`, `m5stickc-plus`, ...).
    pub fn by_name(name: &str) -> Option<&'static BoardProfile> {
        ALL_BOARDS.iter().copied().find(|b| b.name == name)
    }
}

/// M5Stack: 320x240, buttons A/B/C below the screen.
pub const M5STACK: BoardProfile = BoardProfile {
    name: "m5stack",
    title: "M5 Stack",
    max_entries: 20,
    label_len: 26,
    visible_rows: 8,
    buttons: &[
        ButtonBinding {
            name: "SELECT",
            gpio: 39,
            tap: Command::Select,
            hold: None,
        },
        ButtonBinding {
            name: "DOWN",
            gpio: 38,
            tap: Command::Down,
            hold: Some(Command::Bottom),
        },
        ButtonBinding {
            name: "UP",
            gpio: 37,
            tap: Command::Up,
            hold: Some(Command::Top),
        },
    ],
    // Grove port A
    ir_gpio: 21,
    power_hold_gpio: None,
    has_display: true,
    wrap_down: false,
    alternate_after_select: false,
};

/// M5Stick: 64x128 OLED, one button.
pub const M5STICK: BoardProfile = BoardProfile {
    name: "m5stick",
    title: "M5 Stick",
    max_entries: 14,
    label_len: 8,
    visible_rows: 14,
    buttons: &[ButtonBinding {
        name: "BUTTON",
        gpio: 35,
        tap: Command::Down,
        hold: Some(Command::Select),
    }],
    ir_gpio: 17,
    power_hold_gpio: None,
    has_display: true,
    wrap_down: true,
    alternate_after_select: false,
};

/// M5StickC: 80x160, button A on the face, B on the side.
pub const M5STICKC: BoardProfile = BoardProfile {
    name: "m5stickc",
    title: "M5 StickC",
    max_entries: 20,
    label_len: 10,
    visible_rows: 8,
    buttons: STICKC_BUTTONS,
    ir_gpio: 9,
    power_hold_gpio: None,
    has_display: true,
    wrap_down: false,
    alternate_after_select: false,
};

/// M5StickC Plus: 135x240.
pub const M5STICKC_PLUS: BoardProfile = BoardProfile {
    name: "m5stickc-plus",
    title: "M5 StickC+",
    max_entries: 20,
    label_len: 16,
    visible_rows: 12,
    buttons: STICKC_BUTTONS,
    ir_gpio: 9,
    power_hold_gpio: None,
    has_display: true,
    wrap_down: false,
    alternate_after_select: false,
};

/// M5StickC Plus2: same panel as the Plus, no AXP192, GPIO4 holds power.
pub const M5STICKC_PLUS2: BoardProfile = BoardProfile {
    name: "m5stickc-plus2",
    title: "M5 StickC+2",
    max_entries: 20,
    label_len: 16,
    visible_rows: 12,
    buttons: STICKC_BUTTONS,
    ir_gpio: 19,
    power_hold_gpio: Some(4),
    has_display: true,
    wrap_down: false,
    alternate_after_select: false,
};

/// M5Atom: no screen, one button; alternates through entries on each send.
pub const M5ATOM: BoardProfile = BoardProfile {
    name: "m5atom",
    title: "M5 Atom",
    max_entries: 20,
    label_len: 16,
    visible_rows: 1,
    buttons: &[ButtonBinding {
        name: "BUTTON",
        gpio: 39,
        tap: Command::Select,
        hold: None,
    }],
    ir_gpio: 12,
    power_hold_gpio: None,
    has_display: false,
    wrap_down: true,
    alternate_after_select: true,
};

const STICKC_BUTTONS: &[ButtonBinding] = &[
    ButtonBinding {
        name: "SELECT",
        gpio: 37,
        tap: Command::Select,
        hold: None,
    },
    ButtonBinding {
        name: "DOWN",
        gpio: 39,
        tap: Command::Down,
        hold: Some(Command::Top),
    },
];

/// Every known board.
pub const ALL_BOARDS: &[&BoardProfile] = &[
    &M5STACK,
    &M5STICK,
    &M5STICKC,
    &M5STICKC_PLUS,
    &M5STICKC_PLUS2,
    &M5ATOM,
];

const _: () = {
    assert!(M5STACK.is_valid());
    assert!(M5STICK.is_valid());
    assert!(M5STICKC.is_valid());
    assert!(M5STICKC_PLUS.is_valid());
    assert!(M5STICKC_PLUS2.is_valid());
    assert!(M5ATOM.is_valid());
};

/// Profile chosen by cargo feature; `m5stickc-plus` when none is set.
pub const fn selected() -> &'static BoardProfile {
    if cfg!(feature = "m5stack") {
        &M5STACK
    } else if cfg!(feature = "m5stick") {
        &M5STICK
    } else if cfg!(feature = "m5stickc") {
        &M5STICKC
    } else if cfg!(feature = "m5stickc-plus2") {
        &M5STICKC_PLUS2
    } else if cfg!(feature = "m5atom") {
        &M5ATOM
    } else {
        &M5STICKC_PLUS
    }
}

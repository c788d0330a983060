//! # M5IrRemote
//!
//! Menu-driven NEC infrared remote for M5 devices.
//!
//! ## Architecture
//!
//! ```text
//!  Display.def ──▶ config loader ──▶ EntryStore
//!                                        │
//!  button tasks ──▶ command channel ──▶ MenuController ──▶ Display
//!   (tap / hold)     (depth 10)              │
//!                                            └──▶ IR transform ──▶ Transmitter
//! ```
//!
//! Button tasks only post commands; the menu task is the single consumer
//! and the only code that draws or transmits. Hardware sits behind the
//! traits in [`hal`], so everything except `hal::esp` builds and tests
//! on the host.

#![cfg_attr(not(any(test, target_os = "espidf")), no_std)]

pub mod app;
pub mod board;
pub mod button;
pub mod command;
pub mod config;
pub mod entry;
pub mod error;
pub mod fault;
pub mod hal;
pub mod ir;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod menu;

pub use app::boot;
pub use board::{BoardProfile, ButtonBinding};
pub use button::{ButtonSource, Clock};
pub use command::{Command, CommandChannel};
pub use config::{load_config, ConfigSource, StrSource};
pub use entry::{Entry, EntryStore};
pub use error::{Advisory, Peripheral, RemoteError};
pub use fault::{FaultCode, FaultState};
pub use ir::{nec_extend, IrCode};
pub use log_globals::EVENT_LOG;
pub use menu::{MenuController, MenuState};

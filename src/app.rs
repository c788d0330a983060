//! Boot sequence.
//!
//! ```text
//!   open config ──▶ load_config ──▶ log entries ──▶ MenuController::show
//!        │               │
//!        └── E01         └── E02 / E03        (caller parks the board)
//! ```
//!
//! Shared by the firmware and the host simulator. Nothing is drawn when
//! loading fails.

use crate::board::BoardProfile;
use crate::button::Clock;
use crate::config::{load_config, ConfigSource, EntryLimits};
use crate::error::RemoteError;
use crate::hal::{Display, Transmitter};
use crate::logging::LogStream;
use crate::menu::{MenuController, MenuOptions};
use crate::{ev_error, ev_info, ev_warn};

/// Load the configuration and bring the menu up.
///
/// `source` is the result of opening the configuration; pass the open
/// error through (normally [`RemoteError::ConfigMissing`]).
///
/// # Errors
///
/// Fatal load errors and display faults while drawing the first screen.
/// Each one is also written to `log`.
pub fn boot<'a, S, D, T, C>(
    profile: &BoardProfile,
    source: Result<S, RemoteError>,
    display: D,
    transmitter: T,
    clock: C,
    log: &'a LogStream,
) -> Result<MenuController<'a, D, T, C>, RemoteError>
where
    S: ConfigSource,
    D: Display,
    T: Transmitter,
    C: Clock,
{
    ev_info!(log, clock.now_ms(), "board {}", profile.name);

    let loaded = source.and_then(|mut source| {
        load_config(&mut source, EntryLimits::from(profile), |advisory| {
            ev_warn!(log, clock.now_ms(), "{}", advisory);
        })
    });
    let (entries, report) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => {
            ev_error!(log, clock.now_ms(), "{}", err);
            return Err(err);
        }
    };

    ev_info!(
        log,
        clock.now_ms(),
        "loaded {} entries ({} lines skipped, {} malformed fields)",
        report.loaded,
        report.skipped_lines,
        report.malformed_fields
    );
    for (index, entry) in entries.iter().enumerate() {
        ev_info!(
            log,
            clock.now_ms(),
            "[{}] {} cmd=0x{:02x} addr=0x{:02x}",
            index,
            entry.label.as_str(),
            entry.command,
            entry.address
        );
    }

    let started = clock.now_ms();
    let mut menu = MenuController::new(
        entries,
        MenuOptions::from(profile),
        display,
        transmitter,
        clock,
        log,
    );
    if let Err(err) = menu.show() {
        ev_error!(log, started, "{}", err);
        return Err(err);
    }
    Ok(menu)
}

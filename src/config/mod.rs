//! Module: config
//!
//! Purpose: the user-editable code list (`Display.def`) and the limits
//! that bound it.
//!
//! Architecture:
//! - parser: one line to fields (`,` separator, `;` terminator, quotes)
//! - loader: lines to entries, permissive hex, advisories
//! - constants below: hard capacities, board profiles pick values within them

use core::ffi::CStr;

pub mod loader;
pub mod parser;

/// Configuration file on the SPIFFS partition.
pub const CONFIG_PATH: &str = "/spiffs/Display.def";

/// SPIFFS mount point, prefix of [`CONFIG_PATH`].
pub const SPIFFS_BASE_PATH: &CStr = c"/spiffs";

/// SPIFFS partition label in `partitions.csv`.
pub const SPIFFS_PARTITION: &CStr = c"storage";

/// Upper bound on entries for any board.
pub const MAX_CONFIG_CAPACITY: usize = 20;

/// Upper bound on label length for any board.
pub const LABEL_CAPACITY: usize = 26;

/// Bytes kept per parsed field.
pub const FIELD_CAPACITY: usize = 31;

/// Fields parsed per line.
pub const MAX_FIELDS: usize = 10;

/// Bytes kept per raw line.
pub const LINE_CAPACITY: usize = 128;

pub use loader::{
    load_config, parse_hex, ConfigSource, EntryLimits, HexValue, LineBuffer, LoadReport, StrSource,
};
pub use parser::{parse_fields, Field, Fields};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_on_mount_point() {
        let base = SPIFFS_BASE_PATH.to_str().unwrap();
        assert!(CONFIG_PATH.starts_with(base));
        assert_eq!(&CONFIG_PATH[base.len()..], "/Display.def");
    }
}

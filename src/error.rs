//! Error and advisory types
//!
//! Fatal errors stop the menu; advisories are reported and loading goes on.

/// Hardware collaborator that reported a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peripheral {
    /// SPIFFS mount or file access
    Storage,
    /// Display panel
    Display,
    /// IR transmitter (RMT channel)
    Transmitter,
    /// Button GPIO
    Button,
    /// Power-hold GPIO
    Power,
}

impl Peripheral {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Display => "display",
            Self::Transmitter => "transmitter",
            Self::Button => "button",
            Self::Power => "power",
        }
    }
}

/// Fatal error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteError {
    /// E01: Configuration file absent or unreadable
    ConfigMissing,
    /// E02: Configuration present but no usable record
    ConfigEmpty,
    /// E03: Collaborator failure, `code` is the driver's raw error code
    HardwareFault { peripheral: Peripheral, code: i32 },
}

impl RemoteError {
    /// Shorthand for a hardware fault without a driver error code.
    pub const fn hardware(peripheral: Peripheral) -> Self {
        Self::HardwareFault {
            peripheral,
            code: 0,
        }
    }

    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigMissing => "E01",
            Self::ConfigEmpty => "E02",
            Self::HardwareFault { .. } => "E03",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::ConfigMissing => "configuration missing",
            Self::ConfigEmpty => "no usable configuration",
            Self::HardwareFault { .. } => "hardware fault",
        }
    }
}

impl core::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::HardwareFault { peripheral, code } => write!(
                f,
                "{}: {} ({} code {})",
                self.code(),
                self.message(),
                peripheral.as_str(),
                code
            ),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

/// Non-fatal findings while loading the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// W01: More records than the board can hold; the rest were ignored
    ConfigTruncated,
    /// W02: A hex field did not parse cleanly and was read permissively
    MalformedField { line: usize, field: usize },
}

impl Advisory {
    /// Get advisory code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigTruncated => "W01",
            Self::MalformedField { .. } => "W02",
        }
    }
}

impl core::fmt::Display for Advisory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ConfigTruncated => write!(f, "{}: configuration truncated", self.code()),
            Self::MalformedField { line, field } => write!(
                f,
                "{}: malformed hex in line {} field {}",
                self.code(),
                line,
                field
            ),
        }
    }
}

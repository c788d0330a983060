//! Fault latch for M5IrRemote.
//!
//! A fatal error anywhere (config, display, transmitter, button GPIO)
//! is recorded here once and never retried. The main task parks the
//! device in an inert state and logs the latched fault from there.

use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU8, Ordering};

use crate::error::{Peripheral, RemoteError};

/// Fault codes indicating why the remote stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// Configuration file could not be opened.
    ConfigMissing = 1,

    /// Configuration file held no usable record.
    ConfigEmpty = 2,

    /// SPIFFS mount or read failure.
    StorageFault = 3,

    /// Display driver failure.
    DisplayFault = 4,

    /// RMT transmit failure.
    TransmitFault = 5,

    /// Button GPIO read failure.
    ButtonFault = 6,

    /// Power-hold pin could not be driven.
    PowerFault = 7,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::ConfigMissing,
            2 => FaultCode::ConfigEmpty,
            3 => FaultCode::StorageFault,
            4 => FaultCode::DisplayFault,
            5 => FaultCode::TransmitFault,
            6 => FaultCode::ButtonFault,
            7 => FaultCode::PowerFault,
            _ => FaultCode::None,
        }
    }
}

impl From<&RemoteError> for FaultCode {
    fn from(err: &RemoteError) -> Self {
        match err {
            RemoteError::ConfigMissing => FaultCode::ConfigMissing,
            RemoteError::ConfigEmpty => FaultCode::ConfigEmpty,
            RemoteError::HardwareFault { peripheral, .. } => match peripheral {
                Peripheral::Storage => FaultCode::StorageFault,
                Peripheral::Display => FaultCode::DisplayFault,
                Peripheral::Transmitter => FaultCode::TransmitFault,
                Peripheral::Button => FaultCode::ButtonFault,
                Peripheral::Power => FaultCode::PowerFault,
            },
        }
    }
}

/// Thread-safe fault latch.
///
/// Written by whichever task hits the fault first; later faults only
/// bump the counter so the original cause stays visible.
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// if let Err(err) = source.run(sender) {
///     FAULT.record(&err);
/// }
/// ```
pub struct FaultState {
    /// True if fault is active.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Driver error code, 0 when not applicable.
    detail: AtomicI32,

    /// Total faults since boot.
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            detail: AtomicI32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Latch a fault. Only the first one sets code and detail.
    pub fn set(&self, code: FaultCode, detail: i32) {
        self.count.fetch_add(1, Ordering::Relaxed);
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.code.store(code as u8, Ordering::Release);
            self.detail.store(detail, Ordering::Release);
        }
    }

    /// Latch a fault from an error value.
    pub fn record(&self, err: &RemoteError) {
        let detail = match err {
            RemoteError::HardwareFault { code, .. } => *code,
            _ => 0,
        };
        self.set(FaultCode::from(err), detail);
    }

    /// Check if fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    #[inline]
    pub fn detail(&self) -> i32 {
        self.detail.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Get a snapshot of the current fault state.
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            detail: self.detail(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub detail: i32,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_state_basic() {
        let fault = FaultState::new();

        assert!(!fault.is_active());
        assert_eq!(fault.code(), FaultCode::None);
        assert_eq!(fault.count(), 0);

        fault.record(&RemoteError::HardwareFault {
            peripheral: Peripheral::Transmitter,
            code: 259,
        });

        assert!(fault.is_active());
        assert_eq!(fault.code(), FaultCode::TransmitFault);
        assert_eq!(fault.detail(), 259);
        assert_eq!(fault.count(), 1);
    }

    #[test]
    fn test_first_fault_wins() {
        let fault = FaultState::new();

        fault.record(&RemoteError::ConfigEmpty);
        fault.record(&RemoteError::hardware(Peripheral::Button));

        assert_eq!(fault.code(), FaultCode::ConfigEmpty);
        assert_eq!(fault.count(), 2);
    }

    #[test]
    fn test_snapshot_tracks_later_faults() {
        let fault = FaultState::new();
        assert!(!fault.snapshot().active);

        fault.record(&RemoteError::ConfigMissing);
        let first = fault.snapshot();
        assert!(first.active);
        assert_eq!(first.code, FaultCode::ConfigMissing);
        assert_eq!(first.count, 1);

        fault.record(&RemoteError::HardwareFault {
            peripheral: Peripheral::Power,
            code: -1,
        });
        let second = fault.snapshot();
        assert_eq!(second.code, FaultCode::ConfigMissing);
        assert_eq!(second.detail, 0);
        assert_eq!(second.count, 2);
    }

    #[test]
    fn test_fault_code_round_trip_from_u8() {
        for code in [
            FaultCode::ConfigMissing,
            FaultCode::ConfigEmpty,
            FaultCode::StorageFault,
            FaultCode::DisplayFault,
            FaultCode::TransmitFault,
            FaultCode::ButtonFault,
            FaultCode::PowerFault,
        ] {
            assert_eq!(FaultCode::from_u8(code as u8), code);
        }
        assert_eq!(FaultCode::from_u8(200), FaultCode::None);
    }
}

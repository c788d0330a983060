//! ESP-IDF implementations of the hardware seams.
//!
//! ```text
//!   SPIFFS "storage" ──▶ FileSource        (ConfigSource)
//!   GPIO, active low ──▶ ButtonPin         (embedded-hal InputPin)
//!   esp_timer        ──▶ FreeRtosClock     (Clock)
//!   RMT channel 0    ──▶ NecTransmitter    (Transmitter, 38 kHz / 33 %)
//!   UART0 console    ──▶ ConsoleOut        (fmt::Write for TextDisplay)
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Write as _};
use std::time::Duration;

use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyInputPin, AnyOutputPin, Input, Output, PinDriver};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::rmt::config::{CarrierConfig, DutyPercent, TransmitConfig};
use esp_idf_svc::hal::rmt::{FixedLengthSignal, PinState, Pulse, RmtChannel, TxRmtDriver};
use esp_idf_svc::hal::units::{FromValueType, Hertz};
use esp_idf_svc::sys::{self, esp, EspError};

use crate::button::{Clock, POLL_INTERVAL_MS};
use crate::config::{ConfigSource, LineBuffer, SPIFFS_BASE_PATH, SPIFFS_PARTITION};
use crate::error::{Peripheral as Device, RemoteError};
use crate::ir::{nec_frame, NEC_FRAME_SYMBOLS};

/// Open files allowed on the SPIFFS mount.
const SPIFFS_MAX_FILES: usize = 10;

/// RMT tick rate after the divider: 1 MHz, one tick per microsecond.
const RMT_CLOCK_DIVIDER: u8 = 80;

const CARRIER_DUTY_PERCENT: u8 = 33;

fn fault(peripheral: Device) -> impl Fn(EspError) -> RemoteError {
    move |err| RemoteError::HardwareFault {
        peripheral,
        code: err.code(),
    }
}

/// Mount the `storage` partition at `/spiffs`, formatting it if the
/// mount fails. Returns `(total, used)` bytes.
pub fn mount_storage() -> Result<(usize, usize), RemoteError> {
    let conf = sys::esp_vfs_spiffs_conf_t {
        base_path: SPIFFS_BASE_PATH.as_ptr(),
        partition_label: SPIFFS_PARTITION.as_ptr(),
        max_files: SPIFFS_MAX_FILES,
        format_if_mount_failed: true,
    };

    // SAFETY: `conf` outlives the call and the strings are 'static.
    esp!(unsafe { sys::esp_vfs_spiffs_register(&conf) }).map_err(fault(Device::Storage))?;

    let mut total = 0;
    let mut used = 0;
    // SAFETY: out-pointers are valid locals.
    let info = unsafe { sys::esp_spiffs_info(conf.partition_label, &mut total, &mut used) };
    esp!(info).map_err(fault(Device::Storage))?;
    Ok((total, used))
}

/// Configuration file on the mounted partition.
pub struct FileSource {
    reader: BufReader<File>,
    raw: Vec<u8>,
}

impl FileSource {
    /// Open `path`; any failure is [`RemoteError::ConfigMissing`].
    pub fn open(path: &str) -> Result<Self, RemoteError> {
        let file = File::open(path).map_err(|_| RemoteError::ConfigMissing)?;
        Ok(Self {
            reader: BufReader::new(file),
            raw: Vec::new(),
        })
    }
}

impl ConfigSource for FileSource {
    fn read_line(&mut self, line: &mut LineBuffer) -> Result<bool, RemoteError> {
        self.raw.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.raw)
            .map_err(|err| RemoteError::HardwareFault {
                peripheral: Device::Storage,
                code: err.raw_os_error().unwrap_or(0),
            })?;
        if read == 0 {
            return Ok(false);
        }

        line.clear();
        for c in String::from_utf8_lossy(&self.raw).chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        Ok(true)
    }
}

/// Button line, read through embedded-hal.
pub type ButtonPin = PinDriver<'static, AnyInputPin, Input>;

/// Claim `gpio` as a button input. The boards pull the lines up
/// externally.
pub fn button_pin(gpio: i32) -> Result<ButtonPin, RemoteError> {
    // SAFETY: every GPIO number comes from a board profile and is claimed once.
    let pin = unsafe { AnyInputPin::new(gpio) };
    PinDriver::input(pin).map_err(fault(Device::Button))
}

/// Drive the power-hold line high (StickC Plus2) and keep it that way
/// for as long as the returned driver lives.
pub fn hold_power(gpio: i32) -> Result<PinDriver<'static, AnyOutputPin, Output>, RemoteError> {
    // SAFETY: as for `button_pin`.
    let pin = unsafe { AnyOutputPin::new(gpio) };
    let mut driver = PinDriver::output(pin).map_err(fault(Device::Power))?;
    driver.set_high().map_err(fault(Device::Power))?;
    Ok(driver)
}

/// `esp_timer` time and FreeRTOS tick delays.
#[derive(Debug, Default, Clone, Copy)]
pub struct FreeRtosClock;

impl Clock for FreeRtosClock {
    fn now_ms(&self) -> u64 {
        // SAFETY: plain read of the system timer.
        let us = unsafe { sys::esp_timer_get_time() };
        (us / 1000) as u64
    }

    fn pause(&self) {
        FreeRtos::delay_ms(POLL_INTERVAL_MS);
    }
}

/// NEC sender on one RMT channel, 38 kHz carrier at 33 % duty.
pub struct NecTransmitter {
    tx: TxRmtDriver<'static>,
    ticks_hz: Hertz,
}

impl NecTransmitter {
    pub fn new<C: RmtChannel>(
        channel: impl Peripheral<P = C> + 'static,
        gpio: i32,
    ) -> Result<Self, RemoteError> {
        let duty = DutyPercent::new(CARRIER_DUTY_PERCENT).map_err(fault(Device::Transmitter))?;
        let carrier = CarrierConfig::new()
            .frequency(38.kHz().into())
            .carrier_level(PinState::High)
            .duty_percent(duty);
        let config = TransmitConfig::new()
            .clock_divider(RMT_CLOCK_DIVIDER)
            .carrier(Some(carrier));

        // SAFETY: the IR pin comes from the board profile and is claimed once.
        let pin = unsafe { AnyOutputPin::new(gpio) };
        let tx = TxRmtDriver::new(channel, pin, &config).map_err(fault(Device::Transmitter))?;
        let ticks_hz = tx.counter_clock().map_err(fault(Device::Transmitter))?;
        Ok(Self { tx, ticks_hz })
    }

    fn pulse(&self, state: PinState, us: u16) -> Result<Pulse, RemoteError> {
        if us == 0 {
            return Ok(Pulse::zero());
        }
        Pulse::new_with_duration(self.ticks_hz, state, &Duration::from_micros(u64::from(us)))
            .map_err(fault(Device::Transmitter))
    }
}

impl crate::hal::Transmitter for NecTransmitter {
    fn transmit(&mut self, address: u16, command: u16) -> Result<(), RemoteError> {
        let frame = nec_frame(address, command);
        let mut signal = FixedLengthSignal::<NEC_FRAME_SYMBOLS>::new();
        for (i, symbol) in frame.iter().enumerate() {
            let mark = self.pulse(PinState::High, symbol.mark_us)?;
            let space = self.pulse(PinState::Low, symbol.space_us)?;
            signal
                .set(i, &(mark, space))
                .map_err(fault(Device::Transmitter))?;
        }
        self.tx
            .start_blocking(&signal)
            .map_err(fault(Device::Transmitter))
    }
}

/// Console UART as a `fmt::Write`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleOut;

impl core::fmt::Write for ConsoleOut {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let mut out = std::io::stdout().lock();
        out.write_all(s.as_bytes()).map_err(|_| core::fmt::Error)?;
        out.flush().map_err(|_| core::fmt::Error)
    }
}

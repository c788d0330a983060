//! Button event sources.
//!
//! One source per physical button. The loop waits for the line to go
//! low, waits for it to come back high, then classifies the press by
//! how long it was held and posts one command.
//!
//! ```text
//!   level  ‾‾‾‾‾\____________/‾‾‾‾‾
//!               ^ start      ^ release: held = now - start
//!                              held > 1000 ms ? hold : tap
//! ```
//!
//! Pure logic over two traits: [`embedded_hal::digital::InputPin`] for the
//! line and [`Clock`] for time, so it runs on host against mocks.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

use crate::board::ButtonBinding;
use crate::command::{post, Command, CommandSender};
use crate::error::{Peripheral, RemoteError};
use crate::logging::LogStream;
use crate::{ev_info, ev_warn};

/// A press held strictly longer than this is a hold.
pub const HOLD_THRESHOLD_MS: u64 = 1000;

/// Delay between two samples of the button line (one FreeRTOS tick).
pub const POLL_INTERVAL_MS: u32 = 10;

/// Monotonic time and cooperative waiting.
pub trait Clock {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Give up the CPU for one poll interval.
    fn pause(&self);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn pause(&self) {
        (**self).pause()
    }
}

/// Press detector for one active-low button.
pub struct ButtonSource<'a, P, C> {
    binding: ButtonBinding,
    pin: P,
    clock: C,
    log: &'a LogStream,
}

impl<'a, P, C> ButtonSource<'a, P, C>
where
    P: InputPin,
    C: Clock,
{
    pub fn new(binding: ButtonBinding, pin: P, clock: C, log: &'a LogStream) -> Self {
        Self {
            binding,
            pin,
            clock,
            log,
        }
    }

    pub fn binding(&self) -> &ButtonBinding {
        &self.binding
    }

    /// Command for a press of `held_ms`.
    pub fn classify(&self, held_ms: u64) -> Command {
        match self.binding.hold {
            Some(hold) if held_ms > HOLD_THRESHOLD_MS => hold,
            _ => self.binding.tap,
        }
    }

    /// Block until one full press-release and return its command.
    pub fn wait_press(&mut self) -> Result<Command, RemoteError> {
        while !self.is_pressed()? {
            self.clock.pause();
        }

        let start = self.clock.now_ms();
        ev_info!(self.log, start, "{}: push button", self.binding.name);
        while self.is_pressed()? {
            self.clock.pause();
        }

        let held = self.clock.now_ms().saturating_sub(start);
        let cmd = self.classify(held);
        ev_info!(
            self.log,
            start + held,
            "{}: held {} ms -> {}",
            self.binding.name,
            held,
            cmd.as_str()
        );
        Ok(cmd)
    }

    /// Post one command per press, forever.
    ///
    /// A full queue drops the command. Only returns on a GPIO error.
    pub fn run(&mut self, tx: CommandSender<'_>) -> Result<Infallible, RemoteError> {
        loop {
            let cmd = self.wait_press()?;
            if !post(&tx, cmd) {
                ev_warn!(
                    self.log,
                    self.clock.now_ms(),
                    "{}: queue full, dropped {}",
                    self.binding.name,
                    cmd.as_str()
                );
            }
            self.clock.pause();
        }
    }

    fn is_pressed(&mut self) -> Result<bool, RemoteError> {
        self.pin
            .is_low()
            .map_err(|_| RemoteError::hardware(Peripheral::Button))
    }
}

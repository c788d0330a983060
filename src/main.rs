//! M5IrRemote entry point.
//!
//! On ESP-IDF:
//! 1. Hold power (StickC Plus2), start the log drain thread
//! 2. Mount SPIFFS, load `/spiffs/Display.def`, draw the menu
//! 3. Spawn one thread per button
//! 4. Run the menu task on the main thread until a fault
//!
//! Any fatal error is latched and the board stays up but inert.
//!
//! On the host the same boot and menu code runs as a console simulator
//! driven by keys read from stdin.

#[cfg(target_os = "espidf")]
fn main() {
    device::main()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> std::process::ExitCode {
    simulator::main()
}

#[cfg(target_os = "espidf")]
mod device {
    use std::thread;

    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::task::block_on;

    use m5_ir_remote::board::{self, BoardProfile, ButtonBinding};
    use m5_ir_remote::button::{ButtonSource, Clock};
    use m5_ir_remote::command::{new_channel, CommandChannel};
    use m5_ir_remote::config::CONFIG_PATH;
    use m5_ir_remote::error::{Peripheral, RemoteError};
    use m5_ir_remote::fault::FaultState;
    use m5_ir_remote::hal::esp::{
        button_pin, hold_power, mount_storage, ConsoleOut, FileSource, FreeRtosClock,
        NecTransmitter,
    };
    use m5_ir_remote::hal::text::TextDisplay;
    use m5_ir_remote::hal::{Display, NoDisplay};
    use m5_ir_remote::log_drain::{LogDrain, IDLE_DELAY_MS};
    use m5_ir_remote::{boot, ev_error, ev_info, EVENT_LOG};

    const BUTTON_STACK_SIZE: usize = 4096;
    const LOG_STACK_SIZE: usize = 4096;

    static COMMANDS: CommandChannel = new_channel();
    static FAULT: FaultState = FaultState::new();

    pub fn main() {
        esp_idf_svc::sys::link_patches();
        println!("{}", env!("VERSION_STRING"));

        if let Err(err) = spawn_log_drain() {
            println!("log drain: {}", err);
        }

        if let Err(err) = run(board::selected()) {
            FAULT.record(&err);
            ev_error!(EVENT_LOG, FreeRtosClock.now_ms(), "halted: {}", err);
        }

        // Inert: no menu, buttons ignored, log still drained
        let mut reported = 0;
        loop {
            let fault = FAULT.snapshot();
            if fault.active && fault.count != reported {
                reported = fault.count;
                ev_error!(
                    EVENT_LOG,
                    FreeRtosClock.now_ms(),
                    "fault {:?} detail={} count={}",
                    fault.code,
                    fault.detail,
                    fault.count
                );
            }
            FreeRtos::delay_ms(1000);
        }
    }

    fn run(profile: &'static BoardProfile) -> Result<(), RemoteError> {
        let _power = profile.power_hold_gpio.map(hold_power).transpose()?;

        // The RMT channel is the only peripheral taken from the singleton,
        // so failing to take it is a transmitter fault.
        let peripherals = Peripherals::take().map_err(|err| RemoteError::HardwareFault {
            peripheral: Peripheral::Transmitter,
            code: err.code(),
        })?;
        let transmitter = NecTransmitter::new(peripherals.rmt.channel0, profile.ir_gpio)?;

        if profile.has_display {
            serve(profile, TextDisplay::new(ConsoleOut), transmitter)
        } else {
            serve(profile, NoDisplay, transmitter)
        }
    }

    fn serve<D: Display>(
        profile: &'static BoardProfile,
        display: D,
        transmitter: NecTransmitter,
    ) -> Result<(), RemoteError> {
        let source = mount_storage().and_then(|(total, used)| {
            ev_info!(
                EVENT_LOG,
                FreeRtosClock.now_ms(),
                "spiffs total={} used={}",
                total,
                used
            );
            FileSource::open(CONFIG_PATH)
        });

        let mut menu = boot(
            profile,
            source,
            display,
            transmitter,
            FreeRtosClock,
            &EVENT_LOG,
        )?;

        for binding in profile.buttons {
            spawn_button(*binding)?;
        }

        match block_on(menu.run(COMMANDS.receiver())) {
            Ok(never) => match never {},
            Err(err) => Err(err),
        }
    }

    fn spawn_button(binding: ButtonBinding) -> Result<(), RemoteError> {
        let pin = button_pin(binding.gpio)?;
        thread::Builder::new()
            .name(binding.name.to_lowercase())
            .stack_size(BUTTON_STACK_SIZE)
            .spawn(move || {
                let mut source = ButtonSource::new(binding, pin, FreeRtosClock, &EVENT_LOG);
                if let Err(err) = source.run(COMMANDS.sender()) {
                    FAULT.record(&err);
                    ev_error!(
                        EVENT_LOG,
                        FreeRtosClock.now_ms(),
                        "{}: {}",
                        binding.name,
                        err
                    );
                }
            })
            .map(drop)
            .map_err(|_| RemoteError::hardware(Peripheral::Button))
    }

    fn spawn_log_drain() -> std::io::Result<()> {
        thread::Builder::new()
            .name("log".into())
            .stack_size(LOG_STACK_SIZE)
            .spawn(|| {
                let mut drain = LogDrain::new();
                let mut out = ConsoleOut;
                loop {
                    if drain.pump(&EVENT_LOG, FreeRtosClock.now_ms(), &mut out) == 0 {
                        FreeRtos::delay_ms(IDLE_DELAY_MS);
                    }
                }
            })
            .map(drop)
    }
}

#[cfg(not(target_os = "espidf"))]
mod simulator {
    use std::io::{BufRead, Write as _};
    use std::path::PathBuf;
    use std::process::ExitCode;
    use std::time::{Duration, Instant};

    use clap::Parser;
    use embassy_futures::block_on;

    use m5_ir_remote::board::{self, BoardProfile, ALL_BOARDS};
    use m5_ir_remote::button::{Clock, POLL_INTERVAL_MS};
    use m5_ir_remote::command::{new_channel, post, Command, CommandChannel};
    use m5_ir_remote::config::StrSource;
    use m5_ir_remote::error::RemoteError;
    use m5_ir_remote::hal::text::{TextDisplay, TextTransmitter};
    use m5_ir_remote::log_drain::LogDrain;
    use m5_ir_remote::{boot, EVENT_LOG};

    #[derive(Parser)]
    #[command(name = "irremote")]
    #[command(about = "Console simulator for the M5 IR remote", long_about = None)]
    struct Cli {
        /// Configuration file (Display.def format)
        #[arg(default_value = "data/Display.def")]
        config: PathBuf,
        /// Board profile (m5stack, m5stick, m5stickc, m5stickc-plus, m5stickc-plus2, m5atom)
        #[arg(long)]
        board: Option<String>,
        /// Print the event log to stderr
        #[arg(short, long)]
        verbose: bool,
    }

    struct StdClock(Instant);

    impl Clock for StdClock {
        fn now_ms(&self) -> u64 {
            self.0.elapsed().as_millis() as u64
        }

        fn pause(&self) {
            std::thread::sleep(Duration::from_millis(u64::from(POLL_INTERVAL_MS)));
        }
    }

    struct Stdout;

    impl core::fmt::Write for Stdout {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            std::io::stdout()
                .write_all(s.as_bytes())
                .map_err(|_| core::fmt::Error)
        }
    }

    struct Stderr;

    impl core::fmt::Write for Stderr {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            std::io::stderr()
                .write_all(s.as_bytes())
                .map_err(|_| core::fmt::Error)
        }
    }

    static COMMANDS: CommandChannel = new_channel();

    fn key_command(key: char) -> Option<Command> {
        match key {
            'u' => Some(Command::Up),
            'd' => Some(Command::Down),
            't' => Some(Command::Top),
            'b' => Some(Command::Bottom),
            's' => Some(Command::Select),
            _ => None,
        }
    }

    fn profile(name: Option<&str>) -> Result<&'static BoardProfile, String> {
        match name {
            None => Ok(board::selected()),
            Some(name) => BoardProfile::by_name(name).ok_or_else(|| {
                let known: Vec<&str> = ALL_BOARDS.iter().map(|b| b.name).collect();
                format!(
                    "unknown board '{}', expected one of: {}",
                    name,
                    known.join(", ")
                )
            }),
        }
    }

    pub fn main() -> ExitCode {
        let cli = Cli::parse();
        let profile = match profile(cli.board.as_deref()) {
            Ok(profile) => profile,
            Err(msg) => {
                eprintln!("{}", msg);
                return ExitCode::FAILURE;
            }
        };

        let clock = StdClock(Instant::now());
        let mut drain = LogDrain::new();
        let mut flush_log = |now_ms: u64| {
            if cli.verbose {
                drain.pump(&EVENT_LOG, now_ms, &mut Stderr);
            } else {
                while EVENT_LOG.drain().is_some() {}
            }
        };

        let text = std::fs::read(&cli.config)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|_| RemoteError::ConfigMissing);
        let source = text.as_deref().map(StrSource::new).map_err(|err| *err);

        let booted = boot(
            profile,
            source,
            TextDisplay::new(Stdout),
            TextTransmitter::new(Stdout),
            &clock,
            &EVENT_LOG,
        );
        flush_log(clock.now_ms());
        let mut menu = match booted {
            Ok(menu) => menu,
            Err(err) => {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            }
        };

        println!("keys: u=up d=down t=top b=bottom s=select q=quit");
        let rx = COMMANDS.receiver();
        let tx = COMMANDS.sender();
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            for key in line.chars() {
                if key == 'q' {
                    return ExitCode::SUCCESS;
                }
                let Some(cmd) = key_command(key) else {
                    continue;
                };
                post(&tx, cmd);
                let stepped = block_on(menu.step(&rx));
                flush_log(clock.now_ms());
                if let Err(err) = stepped {
                    eprintln!("{}", err);
                    return ExitCode::FAILURE;
                }
            }
        }
        ExitCode::SUCCESS
    }
}

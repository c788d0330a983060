//! Boot sequence tests

mod common;

use common::{DrawOp, MockClock, RecordingDisplay, RecordingTransmitter};
use m5_ir_remote::board::{M5ATOM, M5STACK, M5STICKC};
use m5_ir_remote::boot;
use m5_ir_remote::command::Command;
use m5_ir_remote::config::StrSource;
use m5_ir_remote::error::RemoteError;
use m5_ir_remote::hal::{Color, NoDisplay};
use m5_ir_remote::logging::{LogLevel, LogStream};

fn drain_text(log: &LogStream) -> Vec<(LogLevel, String)> {
    let mut lines = Vec::new();
    while let Some(entry) = log.drain() {
        lines.push((entry.level, entry.text().to_string()));
    }
    lines
}

#[test]
fn test_boot_draws_first_screen() {
    let log = LogStream::new();
    let mut display = RecordingDisplay::new();
    let mut transmitter = RecordingTransmitter::new();

    let menu = boot(
        &M5STACK,
        Ok(StrSource::new("Power,0x15,0x00;\nMute,0x47,0x00;\n")),
        &mut display,
        &mut transmitter,
        MockClock::new(),
        &log,
    )
    .unwrap();
    assert_eq!(menu.entries().len(), 2);
    drop(menu);

    assert_eq!(display.ops[0], DrawOp::Clear(Color::Background));
    assert_eq!(
        display.ops[1],
        DrawOp::Title("M5 Stack".into(), Color::Title)
    );
    assert_eq!(display.highlighted(), [(0, "Power".to_string())]);
    assert!(transmitter.sent.is_empty());

    let lines = drain_text(&log);
    assert!(lines.iter().any(|(_, l)| l.contains("loaded 2 entries")));
    assert!(lines.iter().any(|(_, l)| l.contains("[1] Mute cmd=0x47")));
}

#[test]
fn test_missing_config_is_inert() {
    let log = LogStream::new();
    let mut display = RecordingDisplay::new();

    let result = boot(
        &M5STACK,
        Err::<StrSource<'_>, _>(RemoteError::ConfigMissing),
        &mut display,
        RecordingTransmitter::new(),
        MockClock::new(),
        &log,
    );
    assert_eq!(result.err(), Some(RemoteError::ConfigMissing));
    assert!(display.ops.is_empty());

    let lines = drain_text(&log);
    assert!(lines
        .iter()
        .any(|(level, l)| *level == LogLevel::Error && l.starts_with("E01")));
}

#[test]
fn test_empty_config_is_inert() {
    let log = LogStream::new();
    let mut display = RecordingDisplay::new();

    let result = boot(
        &M5STACK,
        Ok(StrSource::new("# nothing here\n\n")),
        &mut display,
        RecordingTransmitter::new(),
        MockClock::new(),
        &log,
    );
    assert_eq!(result.err().map(|e| e.code()), Some("E02"));
    assert!(display.ops.is_empty());
}

#[test]
fn test_advisories_are_logged_as_warnings() {
    let log = LogStream::new();
    let text: String = (0..25).map(|i| format!("E{},zz,0x00;\n", i)).collect();

    let menu = boot(
        &M5STICKC,
        Ok(StrSource::new(&text)),
        RecordingDisplay::new(),
        RecordingTransmitter::new(),
        MockClock::new(),
        &log,
    )
    .unwrap();
    assert_eq!(menu.entries().len(), M5STICKC.max_entries);
    drop(menu);

    let warnings: Vec<String> = drain_text(&log)
        .into_iter()
        .filter(|(level, _)| *level == LogLevel::Warn)
        .map(|(_, l)| l)
        .collect();
    assert!(warnings.iter().any(|l| l.starts_with("W01")));
    assert!(warnings.iter().any(|l| l.starts_with("W02")));
}

#[test]
fn test_headless_board_boots_and_sends() {
    let log = LogStream::new();
    let mut transmitter = RecordingTransmitter::new();

    let mut menu = boot(
        &M5ATOM,
        Ok(StrSource::new("TV,0x08,0x00;\nAmp,0x12,0x00;\n")),
        NoDisplay,
        &mut transmitter,
        MockClock::new(),
        &log,
    )
    .unwrap();
    menu.handle(Command::Select).unwrap();
    menu.handle(Command::Select).unwrap();
    drop(menu);

    assert_eq!(transmitter.sent, [(0xFF00, 0xF708), (0xFF00, 0xED12)]);
}

use std::fmt::Display;

use ::log::{Level, LevelFilter, Metadata, Record};

/// Forwards `log` records to cargo. Warnings and errors become
/// `cargo:warning` lines, everything else is only visible with `-vv`.
struct CargoLogger;

impl ::log::Log for CargoLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= ::log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        for line in output_lines(record.level(), &record.args().to_string()) {
            println!("{line}");
        }
    }

    fn flush(&self) {}
}

fn output_lines(level: Level, message: &str) -> Vec<String> {
    match level {
        // cargo only picks up the first line of a directive
        Level::Error | Level::Warn => message
            .lines()
            .map(|line| format!("cargo:warning={line}"))
            .collect(),
        level => vec![format!("[{level}] {message}")],
    }
}

static LOGGER: CargoLogger = CargoLogger;

/// Installs the cargo logger. Subsequent calls only adjust the level.
pub fn init(level: LevelFilter) {
    let _ = ::log::set_logger(&LOGGER);
    ::log::set_max_level(level);
}

pub trait OkLog<T> {
    fn ok_log(self) -> Option<T>;
}

impl<T, E: Display> OkLog<T> for Result<T, E> {
    #[track_caller]
    fn ok_log(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let location = std::panic::Location::caller();
                ::log::warn!("{err} ({}:{})", location.file(), location.line());
                None
            }
        }
    }
}

//! Generic logger utility functions
//!
//! Records go to two places: the console, coloured, and the session log file, uncoloured so it
//! can be grepped and diffed between runs. Each has its own level.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info};
use fern;
use colored::{ColoredString, Colorize};
use std::fmt::Display;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Levels for each log output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLevels {
    /// Level written to stdout.
    pub console: LevelFilter,

    /// Level written to the session log file, must include `INFO`.
    pub file: LevelFilter,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log file level of at least `INFO`, found `{0}`")]
    InvalidFileLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LogLevels {
    /// The same level for both outputs.
    pub fn both(level: LevelFilter) -> Self {
        Self {
            console: level,
            file: level,
        }
    }

    /// Check the levels can be used. The log file is the record of what the mount did, so it
    /// must not drop `INFO` records.
    pub fn validate(&self) -> Result<(), LoggerInitError> {
        if self.file < log::Level::Info {
            return Err(LoggerInitError::InvalidFileLogLevel(self.file))
        }

        Ok(())
    }

    /// The most verbose of the two levels.
    pub fn max(&self) -> LevelFilter {
        std::cmp::max(self.console, self.file)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    levels: LogLevels,
    session: &session::Session
) -> Result<(), LoggerInitError> {

    levels.validate()?;

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    let console = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!(
            "{}",
            format_line(
                session::get_elapsed_seconds(),
                record.level(),
                record.target(),
                message,
                true
            )
        )))
        .level(levels.console)
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!(
            "{}",
            format_line(
                session::get_elapsed_seconds(),
                record.level(),
                record.target(),
                message,
                false
            )
        )))
        .level(levels.file)
        .chain(log_file);

    fern::Dispatch::new()
        .level(levels.max())
        // The line editor is very chatty at debug level
        .level_for("rustyline", LevelFilter::Info)
        .chain(console)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Console level: {:?}, file level: {:?}", levels.console, levels.file);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

/// Format a single log line.
///
/// Debug and trace records include the module they came from.
pub fn format_line(
    elapsed_s: f64,
    level: log::Level,
    target: &str,
    message: &dyn Display,
    coloured: bool
) -> String {
    let level_str = match coloured {
        true => level_to_str(level).to_string(),
        false => level_to_plain_str(level).to_string()
    };

    if level > log::Level::Info {
        format!("[{:10.6} {}] {}: {}", elapsed_s, level_str, target, message)
    }
    else {
        format!("[{:10.6} {}] {}", elapsed_s, level_str, message)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => level_to_plain_str(level).dimmed().italic(),
        log::Level::Debug => level_to_plain_str(level).dimmed(),
        log::Level::Info  => level_to_plain_str(level).normal(),
        log::Level::Warn  => level_to_plain_str(level).yellow(),
        log::Level::Error => level_to_plain_str(level).red().bold()
    }
}

fn level_to_plain_str(level: log::Level) -> &'static str {
    match level {
        log::Level::Trace => "TRC",
        log::Level::Debug => "DBG",
        log::Level::Info  => "INF",
        log::Level::Warn  => "WRN",
        log::Level::Error => "ERR"
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_plain_lines() {
        assert_eq!(
            format_line(1.5, log::Level::Info, "tracker_lib::mount_ctrl", &"Saved", false),
            "[  1.500000 INF] Saved"
        );
        assert_eq!(
            format_line(0.25, log::Level::Debug, "tracker_lib::mount_ctrl", &"Pan", false),
            "[  0.250000 DBG] tracker_lib::mount_ctrl: Pan"
        );
        assert_eq!(
            format_line(12.0, log::Level::Warn, "calibrate", &format_args!("{}°", 90), false),
            "[ 12.000000 WRN] 90°"
        );
    }

    #[test]
    fn test_plain_lines_have_no_escapes() {
        for level in &[log::Level::Trace, log::Level::Error] {
            assert!(!format_line(0.0, *level, "t", &"m", false).contains('\u{1b}'));
        }
    }

    #[test]
    fn test_levels() {
        let levels = LogLevels { console: LevelFilter::Warn, file: LevelFilter::Debug };
        assert!(levels.validate().is_ok());
        assert_eq!(levels.max(), LevelFilter::Debug);

        assert!(LogLevels::both(LevelFilter::Info).validate().is_ok());
        assert!(matches!(
            LogLevels::both(LevelFilter::Warn).validate(),
            Err(LoggerInitError::InvalidFileLogLevel(LevelFilter::Warn))
        ));
        assert!(LogLevels::both(LevelFilter::Off).validate().is_err());
    }
}

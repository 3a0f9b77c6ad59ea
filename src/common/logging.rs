//! Colored console output for wallet lifecycle events.
//!
//! Low-level diagnostics go through the `log` facade; this module covers the
//! user-facing messages an embedding application expects to see on its
//! console.

use colored::Colorize;

/// Severity of a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Prints a message with a colored level prefix.
pub fn log(level: LogLevel, message: &str) {
    match level {
        LogLevel::Info => println!("{} {message}", "[INFO]".blue()),
        LogLevel::Success => println!("{} {message}", "[OK]".green()),
        LogLevel::Warning => eprintln!("{} {message}", "[WARN]".yellow()),
        LogLevel::Error => eprintln!("{} {message}", "[ERROR]".red()),
    }
}

//! User interface module - change log output and terminal messages.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing rendered output to a sink

use std::io::{self, Write};

use console::style;

use crate::config::Config;
use crate::domain::ChangeLog;
use crate::error::Result;

pub mod formatter;

// Re-export formatter items for convenience
pub use formatter::{format_change, ChangeFormatter};

/// Writes every entry of `log` to `w`, each followed by a blank line.
///
/// Entries are streamed: when a later entry has an invalid version, the
/// entries before it have already been written.
///
/// # Returns
/// * `Ok(())` - All entries written
/// * `Err` - On the first invalid version or write failure
pub fn write_change_log<W: Write>(w: &mut W, log: &ChangeLog, config: &Config) -> Result<()> {
    let formatter = ChangeFormatter::new(config);
    for entry in log {
        let rendered = formatter.format_change(entry)?;
        writeln!(w, "{}", rendered)?;
    }
    Ok(())
}

/// Writes every entry of `log` to stdout.
pub fn print_change_log(log: &ChangeLog, config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_change_log(&mut handle, log, config)?;
    handle.flush()?;
    Ok(())
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

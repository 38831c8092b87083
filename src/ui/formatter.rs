//! Pure formatting of change entries into fixed-width boxed text.
//!
//! Each entry renders as:
//!
//! ```text
//! ――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――
//!  version 0.1.0                                    Wed, 26 Feb 2020 00:00:00 UTC
//! ――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――――
//!   initial commit
//! ```
//!
//! Functions here perform no I/O and are testable in isolation.

use std::fmt::Write;

use tracing::{debug, instrument};

use crate::config::Config;
use crate::date::DateParser;
use crate::domain::{ChangeEntry, ChangeLog};
use crate::error::{Result, VerlogError};

/// Renders change entries with a given configuration.
#[derive(Debug, Clone)]
pub struct ChangeFormatter<'a> {
    config: &'a Config,
    dates: DateParser,
}

impl<'a> ChangeFormatter<'a> {
    pub fn new(config: &'a Config) -> Self {
        ChangeFormatter {
            config,
            dates: DateParser::new(&config.formats),
        }
    }

    /// Left-hand header text: `[package ]version <v>[ - <title>]`.
    ///
    /// When a package name is present the title is wrapped in double quotes,
    /// keeping free-form titles distinguishable from the package name.
    pub fn header_label(&self, entry: &ChangeEntry) -> String {
        let mut label = String::new();
        if let Some(package) = non_empty(&entry.package_name) {
            label.push_str(package);
            label.push(' ');
        }
        label.push_str("version ");
        label.push_str(&entry.version);
        if let Some(title) = non_empty(&entry.title) {
            label.push_str(" - ");
            if non_empty(&entry.package_name).is_some() {
                label.push('"');
                label.push_str(title);
                label.push('"');
            } else {
                label.push_str(title);
            }
        }
        label
    }

    /// Right-hand header text: the entry's date in the output template, or
    /// `None` when the date is missing or unparseable.
    ///
    /// # Returns
    /// * `Err(VerlogError::Config)` - If the output template cannot be rendered
    pub fn header_date(&self, entry: &ChangeEntry) -> Result<Option<String>> {
        let Some(parsed) = non_empty(&entry.date).and_then(|date| self.dates.parse(date)) else {
            return Ok(None);
        };

        let template = &self.config.render.date_time_format;
        let mut rendered = String::new();
        write!(rendered, "{}", parsed.format(template)).map_err(|_| {
            VerlogError::config(format!("cannot render dates with '{}'", template))
        })?;
        Ok(Some(rendered))
    }

    /// Format one change entry.
    ///
    /// The version is validated first; an invalid version fails the whole
    /// entry. The output ends with a newline after its last line.
    ///
    /// # Returns
    /// * `Ok(String)` - The boxed, multi-line entry
    /// * `Err(VerlogError::InvalidVersion)` - If the entry's version is not semver
    pub fn format_change(&self, entry: &ChangeEntry) -> Result<String> {
        entry.semantic_version()?;

        let render = &self.config.render;
        let label = self.header_label(entry);
        let date = self.header_date(entry)?;

        let rule: String = std::iter::repeat(render.rule).take(render.width).collect();
        let indent = " ".repeat(render.title_indent);

        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&indent);
        out.push_str(&label);
        if let Some(date) = &date {
            // the date ends `title_indent` columns short of the full width
            let used = 2 * render.title_indent + label.chars().count() + date.chars().count();
            let padding = render.width.saturating_sub(used);
            out.push_str(&" ".repeat(padding));
            out.push_str(date);
        }
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');

        let description_indent = " ".repeat(render.description_indent);
        for line in &entry.description {
            out.push_str(&description_indent);
            out.push_str(line);
            out.push('\n');
        }

        debug!(version = %entry.version, dated = date.is_some(), "change formatted");
        Ok(out)
    }

    /// Format every entry of a change log, oldest first, each followed by a
    /// blank line.
    ///
    /// All-or-nothing: the first invalid entry fails the call and no output
    /// is returned.
    #[instrument(skip_all, fields(entries = log.len()))]
    pub fn format_change_log(&self, log: &ChangeLog) -> Result<String> {
        let mut out = String::new();
        for entry in log {
            out.push_str(&self.format_change(entry)?);
            out.push('\n');
        }
        Ok(out)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Format one change entry with the default configuration.
pub fn format_change(entry: &ChangeEntry) -> Result<String> {
    ChangeFormatter::new(&Config::default()).format_change(entry)
}

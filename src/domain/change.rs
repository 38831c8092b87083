use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::version::SemanticVersion;

/// The details of a single release in a change log.
///
/// Entries are written by hand (or loaded from TOML) and never modified by
/// the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChangeEntry {
    #[serde(default, rename = "package")]
    pub package_name: Option<String>,

    pub version: String,

    #[serde(default)]
    pub title: Option<String>,

    /// Free-form date, see [`crate::date::DateParser`] for accepted shapes.
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub description: Vec<String>,
}

impl ChangeEntry {
    /// Create an entry with only a version set
    pub fn new(version: impl Into<String>) -> Self {
        ChangeEntry {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_package(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = Some(package_name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_description<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and decompose this entry's version string
    pub fn semantic_version(&self) -> Result<SemanticVersion> {
        SemanticVersion::parse(&self.version)
    }
}

/// Ordered history of version changes, oldest first.
///
/// The last entry describes the current release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChangeLog {
    #[serde(default, rename = "change")]
    entries: Vec<ChangeEntry>,
}

impl ChangeLog {
    pub fn new() -> Self {
        ChangeLog::default()
    }

    pub fn push(&mut self, entry: ChangeEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent change, if any
    pub fn latest(&self) -> Option<&ChangeEntry> {
        self.entries.last()
    }

    /// Parse a change log from a TOML document of `[[change]]` tables.
    ///
    /// Versions are not validated here; an invalid version surfaces when the
    /// entry is rendered.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl From<Vec<ChangeEntry>> for ChangeLog {
    fn from(entries: Vec<ChangeEntry>) -> Self {
        ChangeLog { entries }
    }
}

impl FromIterator<ChangeEntry> for ChangeLog {
    fn from_iter<I: IntoIterator<Item = ChangeEntry>>(iter: I) -> Self {
        ChangeLog {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = &'a ChangeEntry;
    type IntoIter = std::slice::Iter<'a, ChangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Loads a change log from a TOML file.
///
/// # Returns
/// * `Ok(ChangeLog)` - Parsed change log (possibly empty)
/// * `Err` - If the file cannot be read or is not valid TOML
pub fn load_change_log(path: impl AsRef<Path>) -> Result<ChangeLog> {
    let content = fs::read_to_string(path)?;
    ChangeLog::from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_entry_builder() {
        let entry = ChangeEntry::new("0.2.0-beta+red")
            .with_title("Red Label")
            .with_date("20-Mar-9 17:45:23")
            .with_description(["add feature: Dude", "fix bug: Sweet"]);

        assert_eq!(entry.version, "0.2.0-beta+red");
        assert_eq!(entry.title.as_deref(), Some("Red Label"));
        assert_eq!(entry.package_name, None);
        assert_eq!(entry.description.len(), 2);
        assert_eq!(entry.semantic_version().unwrap().prerelease, "beta");
    }

    #[test]
    fn test_change_log_latest_is_last_pushed() {
        let mut log = ChangeLog::new();
        assert!(log.latest().is_none());

        log.push(ChangeEntry::new("0.1.0"));
        log.push(ChangeEntry::new("0.2.0"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.latest().map(|c| c.version.as_str()), Some("0.2.0"));
    }

    #[test]
    fn test_change_log_from_toml() {
        let content = r#"
[[change]]
version = "0.1.0"
date = "Feb 26, 2020"
description = ["initial commit"]

[[change]]
package = "verlog"
version = "0.1.0+fqt"
title = "Formal Test"
"#;
        let log = ChangeLog::from_toml_str(content).unwrap();
        assert_eq!(log.len(), 2);

        let first = &log.entries()[0];
        assert_eq!(first.date.as_deref(), Some("Feb 26, 2020"));
        assert_eq!(first.description, vec!["initial commit".to_string()]);

        let second = &log.entries()[1];
        assert_eq!(second.package_name.as_deref(), Some("verlog"));
        assert!(second.description.is_empty());
    }

    #[test]
    fn test_change_log_from_empty_toml() {
        let log = ChangeLog::from_toml_str("").unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_change_log_from_toml_missing_version() {
        let result = ChangeLog::from_toml_str("[[change]]\ntitle = \"oops\"\n");
        assert!(result.is_err());
    }
}

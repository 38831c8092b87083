//! The "current" version of an application.
//!
//! [`VersionState`] is a plain value owned by the application. The [`global`]
//! module wraps one instance in a process-wide lock for callers that want a
//! single shared version.

use tracing::debug;

use crate::domain::{ChangeLog, SemanticVersion};
use crate::error::Result;

/// Current version record; all-zero means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionState {
    version: SemanticVersion,
}

impl VersionState {
    pub fn new() -> Self {
        VersionState::default()
    }

    /// Parse `input` and overwrite the stored version.
    ///
    /// On an invalid version the state is left untouched.
    pub fn set(&mut self, input: &str) -> Result<()> {
        self.version = SemanticVersion::parse(input)?;
        debug!(version = %self.version, "version set");
        Ok(())
    }

    /// True iff any component differs from its zero value.
    ///
    /// Setting `0.0.0` therefore leaves the state unset.
    pub fn is_set(&self) -> bool {
        !self.version.is_zero()
    }

    pub fn version(&self) -> &SemanticVersion {
        &self.version
    }

    /// Render the current version.
    ///
    /// Falls back to the last entry of `log` when unset (without storing it),
    /// and to an empty string when the log is empty too.
    ///
    /// # Returns
    /// * `Ok(String)` - Canonical version string, possibly empty
    /// * `Err(VerlogError::InvalidVersion)` - If the fallback entry's version is invalid
    pub fn current_version_string(&self, log: &ChangeLog) -> Result<String> {
        if self.is_set() {
            return Ok(self.version.to_string());
        }
        match log.latest() {
            Some(entry) => Ok(entry.semantic_version()?.to_string()),
            None => Ok(String::new()),
        }
    }
}

/// Process-wide version state.
///
/// Reads may run concurrently; writes take an exclusive lock and the last
/// write wins.
pub mod global {
    use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

    use super::VersionState;
    use crate::domain::{ChangeLog, SemanticVersion};
    use crate::error::Result;

    static STATE: RwLock<VersionState> = RwLock::new(VersionState {
        version: SemanticVersion {
            major: 0,
            minor: 0,
            patch: 0,
            prerelease: String::new(),
            build_metadata: String::new(),
        },
    });

    // A panic while holding the lock cannot leave a half-written version.
    fn read() -> RwLockReadGuard<'static, VersionState> {
        STATE.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write() -> RwLockWriteGuard<'static, VersionState> {
        STATE.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_version(input: &str) -> Result<()> {
        write().set(input)
    }

    pub fn is_set() -> bool {
        read().is_set()
    }

    pub fn current_version_string(log: &ChangeLog) -> Result<String> {
        read().current_version_string(log)
    }

    /// Snapshot of the stored version.
    pub fn version() -> SemanticVersion {
        read().version().clone()
    }

    /// Return to the unset state.
    pub fn reset() {
        *write() = VersionState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChangeEntry;

    fn sample_log() -> ChangeLog {
        ChangeLog::from(vec![
            ChangeEntry::new("0.1.0"),
            ChangeEntry::new("0.2.0-beta+red"),
        ])
    }

    #[test]
    fn test_fresh_state_is_unset() {
        let state = VersionState::new();
        assert!(!state.is_set());
        assert_eq!(state.current_version_string(&ChangeLog::new()).unwrap(), "");
    }

    #[test]
    fn test_set_marks_state_set() {
        let mut state = VersionState::new();
        state.set("0.1.4").unwrap();
        assert!(state.is_set());
        assert_eq!(state.current_version_string(&sample_log()).unwrap(), "0.1.4");
    }

    #[test]
    fn test_set_zero_version_stays_unset() {
        let mut state = VersionState::new();
        state.set("0.0.0").unwrap();
        assert!(!state.is_set());
        assert_eq!(
            state.current_version_string(&sample_log()).unwrap(),
            "0.2.0-beta+red"
        );
    }

    #[test]
    fn test_set_zero_with_prerelease_is_set() {
        let mut state = VersionState::new();
        state.set("0.0.0-alpha").unwrap();
        assert!(state.is_set());
    }

    #[test]
    fn test_invalid_set_keeps_previous_version() {
        let mut state = VersionState::new();
        state.set("1.2.3").unwrap();
        assert!(state.set("1.2").unwrap_err().is_invalid_version());
        assert_eq!(state.version(), &SemanticVersion::new(1, 2, 3));
    }

    #[test]
    fn test_fallback_does_not_mutate_state() {
        let state = VersionState::new();
        assert_eq!(
            state.current_version_string(&sample_log()).unwrap(),
            "0.2.0-beta+red"
        );
        assert!(!state.is_set());
    }

    #[test]
    fn test_fallback_with_invalid_last_entry_fails() {
        let state = VersionState::new();
        let log = ChangeLog::from(vec![ChangeEntry::new("1.0")]);
        assert!(state.current_version_string(&log).is_err());
    }
}

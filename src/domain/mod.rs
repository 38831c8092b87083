//! Domain types - versions and change history, independent of rendering

pub mod change;
pub mod version;

pub use change::{load_change_log, ChangeEntry, ChangeLog};
pub use version::{parse_version, SemanticVersion, VERSION_PATTERN};

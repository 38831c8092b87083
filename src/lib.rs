//! Semantic version bookkeeping and boxed change log rendering.

pub mod config;
pub mod date;
pub mod domain;
pub mod error;
pub mod state;
pub mod ui;

pub use config::{load_config, Config};
pub use date::{parse_date, DateParser, StandardFormat};
pub use domain::{parse_version, ChangeEntry, ChangeLog, SemanticVersion};
pub use error::{Result, VerlogError};
pub use state::VersionState;
pub use ui::{format_change, print_change_log, write_change_log, ChangeFormatter};

use crate::error::{Result, VerlogError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Regular expression validating a semantic version string and capturing its
/// components.
///
/// Digits are ASCII only (`[0-9]`, not the Unicode-aware `\d`).
///
/// Source: https://semver.org/#is-there-a-suggested-regular-expression-regex-to-check-a-semver-string
pub const VERSION_PATTERN: &str = r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(?:-((?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("semver pattern is a valid regex"))
}

/// Semantic version representation (semver 2.0.0)
///
/// Prerelease and build metadata are kept verbatim; an empty string means the
/// component is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: String,
    pub build_metadata: String,
}

impl SemanticVersion {
    /// Create a release version with no prerelease or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            ..Default::default()
        }
    }

    /// Validate `input` against the semver grammar and decompose it.
    ///
    /// # Returns
    /// * `Ok(SemanticVersion)` - Every component of the version
    /// * `Err(VerlogError::InvalidVersion)` - If `input` does not match the grammar
    ///
    /// # Example
    /// ```
    /// use verlog::domain::SemanticVersion;
    ///
    /// let v = SemanticVersion::parse("0.2.0-beta+red").unwrap();
    /// assert_eq!(v.minor, 2);
    /// assert_eq!(v.prerelease, "beta");
    /// assert_eq!(v.build_metadata, "red");
    /// assert!(SemanticVersion::parse("v1.2.3").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let captures = version_regex()
            .captures(input)
            .ok_or_else(|| VerlogError::invalid_version(input))?;

        let numeric = |index: usize| -> Result<u64> {
            captures[index]
                .parse::<u64>()
                .map_err(|_| VerlogError::invalid_version(input))
        };

        Ok(SemanticVersion {
            major: numeric(1)?,
            minor: numeric(2)?,
            patch: numeric(3)?,
            prerelease: captures
                .get(4)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            build_metadata: captures
                .get(5)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    /// True when every component holds its zero value (0.0.0, no suffixes).
    pub fn is_zero(&self) -> bool {
        self.major == 0
            && self.minor == 0
            && self.patch == 0
            && self.prerelease.is_empty()
            && self.build_metadata.is_empty()
    }

    /// Split into the five raw components.
    pub fn into_parts(self) -> (u64, u64, u64, String, String) {
        (
            self.major,
            self.minor,
            self.patch,
            self.prerelease,
            self.build_metadata,
        )
    }
}

impl FromStr for SemanticVersion {
    type Err = VerlogError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease)?;
        }
        if !self.build_metadata.is_empty() {
            write!(f, "+{}", self.build_metadata)?;
        }
        Ok(())
    }
}

/// Parse a version string into `(major, minor, patch, prerelease, build_metadata)`.
pub fn parse_version(input: &str) -> Result<(u64, u64, u64, String, String)> {
    SemanticVersion::parse(input).map(SemanticVersion::into_parts)
}

//! FoundationDB version parsing
//!
//! Versions are plain `major.minor.patch` triples (e.g. "6.2.20").

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a version string cannot be parsed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("could not parse FDB version from {0:?}")]
pub struct VersionParseError(pub String);

/// A parsed FoundationDB version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FdbVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl FdbVersion {
    /// Create a version from its components
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parse a version string of the form `major.minor.patch`
    pub fn parse(version: &str) -> Result<Self, VersionParseError> {
        let err = || VersionParseError(version.to_string());

        let mut parts = version.split('.');
        let mut next = || -> Result<u32, VersionParseError> {
            let part = parts.next().ok_or_else(err)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
            part.parse().map_err(|_| err())
        };

        let parsed = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(parsed)
    }

    /// Whether this version is at least `other`
    #[must_use]
    pub fn is_at_least(&self, other: FdbVersion) -> bool {
        *self >= other
    }

    /// Whether the sidecar can run binaries copied out of the main container.
    ///
    /// Only then is a `BINARY_DIR` substitution rendered.
    #[must_use]
    pub fn supports_using_binaries_from_main_container(&self) -> bool {
        self.is_at_least(FdbVersion::new(6, 1, 0))
    }
}

impl FromStr for FdbVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FdbVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

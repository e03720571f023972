//! Packed module revision code.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hardware module revision, packed as `major << 16 | minor`.
///
/// This is the raw value reported by the capability probe for each
/// subsystem.
///
/// # Examples
///
/// ```
/// use flow_hw_types::Version;
///
/// let v = Version::new(21, 0);
/// assert_eq!(v.as_u32(), 0x0015_0000);
/// assert_eq!(v.major(), 21);
/// assert_eq!(v.to_string(), "21.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Version(u32);

impl Version {
    /// Creates a version from its major and minor parts.
    pub const fn new(major: u16, minor: u16) -> Self {
        Version(((major as u32) << 16) | minor as u32)
    }

    /// Creates a version from the raw packed value.
    pub const fn from_raw(raw: u32) -> Self {
        Version(raw)
    }

    /// Returns the raw packed value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    pub const fn major(&self) -> u16 {
        ((self.0 >> 16) & 0xffff) as u16
    }

    pub const fn minor(&self) -> u16 {
        (self.0 & 0xffff) as u16
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidVersion(s.to_string());
        let (major, minor) = s.split_once('.').unwrap_or((s, "0"));
        let major: u16 = major.trim().parse().map_err(|_| invalid())?;
        let minor: u16 = minor.trim().parse().map_err(|_| invalid())?;
        Ok(Version::new(major, minor))
    }
}

impl From<u32> for Version {
    fn from(raw: u32) -> Self {
        Version(raw)
    }
}

impl From<Version> for u32 {
    fn from(v: Version) -> u32 {
        v.0
    }
}

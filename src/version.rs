//! MDS version negotiation
//!
//! A client targets one MDS version. The version selects the media type
//! advertised in the `Accept` header and the default encoding of time filters.

use crate::error::{Error, Result};
use crate::types::TimeUnit;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Matches `major.minor` with an optional `.patch`
static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").unwrap());

/// Versions of MDS Provider this library can talk to
pub const SUPPORTED_VERSIONS: &[&str] = &["0.2.0", "0.2.1", "0.3.0", "0.3.1", "0.3.2"];

/// Media type namespace used in the `Accept` header
const MEDIA_TYPE_NAMESPACE: &str = "mds";

/// A semantic MDS version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl Version {
    /// Create a version from its parts
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The minimum version supported by this library
    pub fn minimum() -> Self {
        supported_versions()
            .into_iter()
            .min()
            .unwrap_or(Version::new(0, 2, 0))
    }

    /// Check this version against [`SUPPORTED_VERSIONS`]
    pub fn is_supported(&self) -> bool {
        supported_versions().contains(self)
    }

    /// Fail with a configuration error unless supported
    pub fn ensure_supported(self) -> Result<Self> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(Error::UnsupportedVersion {
                version: self.to_string(),
            })
        }
    }

    /// Custom media type with this version, e.g.
    /// `application/vnd.mds.provider+json;version=0.3`
    pub fn media_type(&self) -> String {
        format!(
            "application/vnd.{MEDIA_TYPE_NAMESPACE}.provider+json;version={}.{}",
            self.major, self.minor
        )
    }

    /// Time encoding used by this version of the API.
    ///
    /// MDS 0.2 expresses timestamps in seconds, 0.3 onwards in milliseconds.
    pub fn time_unit(&self) -> TimeUnit {
        if self.major == 0 && self.minor < 3 {
            TimeUnit::Seconds
        } else {
            TimeUnit::Milliseconds
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::minimum()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersion {
            version: s.to_string(),
        };
        let caps = VERSION_REGEX.captures(s.trim()).ok_or_else(invalid)?;

        let part = |i: usize| -> Result<u32> {
            caps.get(i)
                .map_or(Ok(0), |m| m.as_str().parse::<u32>().map_err(|_| invalid()))
        };

        Ok(Version::new(part(1)?, part(2)?, part(3)?))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parsed [`SUPPORTED_VERSIONS`]
pub fn supported_versions() -> Vec<Version> {
    SUPPORTED_VERSIONS
        .iter()
        .filter_map(|v| v.parse().ok())
        .collect()
}

//! SDMX-REST API versions
//!
//! Versions are ordered, so rules that changed at a given release are written
//! as comparisons (`version < ApiVersion::V2_0_0`).

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A released version of the SDMX-REST specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApiVersion {
    V1_0_0,
    V1_0_1,
    V1_0_2,
    V1_1_0,
    V1_2_0,
    V1_3_0,
    V1_4_0,
    V1_5_0,
    V2_0_0,
    V2_1_0,
}

impl ApiVersion {
    /// All supported versions, oldest first
    pub const ALL: [ApiVersion; 10] = [
        ApiVersion::V1_0_0,
        ApiVersion::V1_0_1,
        ApiVersion::V1_0_2,
        ApiVersion::V1_1_0,
        ApiVersion::V1_2_0,
        ApiVersion::V1_3_0,
        ApiVersion::V1_4_0,
        ApiVersion::V1_5_0,
        ApiVersion::V2_0_0,
        ApiVersion::V2_1_0,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1_0_0 => "1.0.0",
            ApiVersion::V1_0_1 => "1.0.1",
            ApiVersion::V1_0_2 => "1.0.2",
            ApiVersion::V1_1_0 => "1.1.0",
            ApiVersion::V1_2_0 => "1.2.0",
            ApiVersion::V1_3_0 => "1.3.0",
            ApiVersion::V1_4_0 => "1.4.0",
            ApiVersion::V1_5_0 => "1.5.0",
            ApiVersion::V2_0_0 => "2.0.0",
            ApiVersion::V2_1_0 => "2.1.0",
        }
    }

    /// The most recent supported version
    pub fn latest() -> Self {
        ApiVersion::V2_1_0
    }

    /// Whether this version belongs to the 2.x family
    pub fn is_v2(&self) -> bool {
        *self >= ApiVersion::V2_0_0
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    /// Parses `"2.0.0"`, `"v2.0.0"` or the short form `"2.0"`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches(['v', 'V']);
        let normalized = if trimmed.matches('.').count() == 1 {
            format!("{}.0", trimmed)
        } else {
            trimmed.to_string()
        };

        let parsed = semver::Version::parse(&normalized)
            .map_err(|_| Error::UnknownApiVersion(s.to_string()))?;

        ApiVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == format!("{}.{}.{}", parsed.major, parsed.minor, parsed.patch))
            .filter(|_| parsed.pre.is_empty())
            .ok_or_else(|| Error::UnknownApiVersion(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_ordered() {
        assert!(ApiVersion::V1_0_0 < ApiVersion::V1_5_0);
        assert!(ApiVersion::V1_5_0 < ApiVersion::V2_0_0);
        assert!(ApiVersion::V2_1_0 >= ApiVersion::V2_0_0);

        let mut sorted = ApiVersion::ALL;
        sorted.sort();
        assert_eq!(sorted, ApiVersion::ALL);
    }

    #[test]
    fn test_v2_family() {
        let v2: Vec<_> = ApiVersion::ALL.into_iter().filter(|v| v.is_v2()).collect();
        assert_eq!(v2, vec![ApiVersion::V2_0_0, ApiVersion::V2_1_0]);
    }

    #[test]
    fn test_parse_versions() {
        assert_eq!("2.0.0".parse::<ApiVersion>().unwrap(), ApiVersion::V2_0_0);
        assert_eq!("v1.5.0".parse::<ApiVersion>().unwrap(), ApiVersion::V1_5_0);
        assert_eq!("1.4".parse::<ApiVersion>().unwrap(), ApiVersion::V1_4_0);

        for v in ApiVersion::ALL {
            assert_eq!(v.to_string().parse::<ApiVersion>().unwrap(), v);
        }
    }

    #[test]
    fn test_parse_unknown_versions() {
        for input in ["3.0.0", "1.6.0", "two", "", "2.0.0-beta"] {
            let err = input.parse::<ApiVersion>().unwrap_err();
            assert!(matches!(err, Error::UnknownApiVersion(_)), "{input}");
        }
    }
}

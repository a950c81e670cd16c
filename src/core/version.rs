//! SDK version numbers.

use std::cmp::Ordering;
use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

/// Version of a probed SDK installation.
///
/// qmake reports versions like `5.15.2` or `4.8`, so parsing is lenient:
/// missing components default to zero and trailing non-numeric suffixes
/// (`6.5.0-beta1`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SdkVersion(Version);

impl SdkVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SdkVersion(Version::new(major, minor, patch))
    }

    /// Parse a version string, accepting one to three numeric components.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = [0u64; 3];
        let mut seen = 0;
        for (i, component) in s.trim().split('.').take(3).enumerate() {
            let digits: String = component.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                break;
            }
            parts[i] = digits.parse().ok()?;
            seen += 1;
            if digits.len() != component.len() {
                break;
            }
        }
        if seen == 0 {
            return None;
        }
        Some(SdkVersion::new(parts[0], parts[1], parts[2]))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Whether this version is at least `major.minor.patch`.
    pub fn at_least(&self, major: u64, minor: u64, patch: u64) -> bool {
        self.cmp_triple(major, minor, patch) != Ordering::Less
    }

    fn cmp_triple(&self, major: u64, minor: u64, patch: u64) -> Ordering {
        (self.0.major, self.0.minor, self.0.patch).cmp(&(major, minor, patch))
    }

    pub fn as_semver(&self) -> &Version {
        &self.0
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0.major, self.0.minor, self.0.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let v = SdkVersion::parse("5.15.2").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (5, 15, 2));
    }

    #[test]
    fn test_parse_short_and_suffixed() {
        assert_eq!(SdkVersion::parse("4.8"), Some(SdkVersion::new(4, 8, 0)));
        assert_eq!(SdkVersion::parse("6"), Some(SdkVersion::new(6, 0, 0)));
        assert_eq!(SdkVersion::parse("6.5.0-beta1"), Some(SdkVersion::new(6, 5, 0)));
        assert_eq!(SdkVersion::parse(""), None);
        assert_eq!(SdkVersion::parse("abc"), None);
    }

    #[test]
    fn test_at_least() {
        let v = SdkVersion::new(5, 14, 0);
        assert!(v.at_least(5, 14, 0));
        assert!(v.at_least(5, 0, 0));
        assert!(!v.at_least(5, 14, 1));
        assert!(!v.at_least(6, 0, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(SdkVersion::new(6, 2, 4).to_string(), "6.2.4");
    }
}

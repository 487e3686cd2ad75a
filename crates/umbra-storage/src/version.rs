//! Model version gate.
//!
//! Model files carry the version of the application that wrote them in the
//! `gaphor-version` header attribute. Files older than
//! [`MIN_SUPPORTED_VERSION`] are rejected before anything is loaded.
//!
//! Version strings are parsed leniently: only the leading numeric
//! `major.minor.patch` triple counts, pre-release and build suffixes are
//! ignored and missing components are zero.

use std::fmt;

/// Oldest model version the loader accepts.
pub const MIN_SUPPORTED_VERSION: (u32, u32, u32) = (0, 17, 0);

/// Version stamped into `gaphor-version` by the writer.
pub const MODEL_VERSION: &str = "2.19.0";

/// File format version stamped into the `version` header attribute.
pub const FORMAT_VERSION: &str = "3.0";

/// A numeric `major.minor.patch` version.
///
/// # Examples
///
/// ```
/// # use umbra_storage::version::ModelVersion;
/// assert_eq!(ModelVersion::parse("0.14"), ModelVersion::new(0, 14, 0));
/// assert_eq!(ModelVersion::parse("0.15.0b123"), ModelVersion::new(0, 15, 0));
/// assert_eq!(ModelVersion::parse("1.2.0rc2-dev0+7fad31a0"), ModelVersion::new(1, 2, 0));
/// assert!(ModelVersion::parse("0.14.1111") < ModelVersion::new(0, 15, 0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl ModelVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses the leading numeric triple of a version string.
    ///
    /// At most three dot separated segments are read. Each segment
    /// contributes its leading digits; a segment without leading digits ends
    /// the version, and so does a segment that carries a suffix.
    pub fn parse(version: &str) -> Self {
        let mut parts = [0u32; 3];
        for (slot, segment) in parts.iter_mut().zip(version.trim().split('.')) {
            let digits_end = segment
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(segment.len());
            if digits_end == 0 {
                break;
            }
            *slot = segment[..digits_end].parse().unwrap_or(u32::MAX);
            if digits_end < segment.len() {
                break;
            }
        }
        let [major, minor, patch] = parts;
        Self::new(major, minor, patch)
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }
}

impl From<(u32, u32, u32)> for ModelVersion {
    fn from((major, minor, patch): (u32, u32, u32)) -> Self {
        Self::new(major, minor, patch)
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Returns `true` if `version` is older than `minimum`.
pub fn version_lower_than(version: &str, minimum: (u32, u32, u32)) -> bool {
    ModelVersion::parse(version) < ModelVersion::from(minimum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_than_minimum() {
        for version in ["0.3.0", "0", "0.14", "0.14.1111", "0.14.0.b1"] {
            assert!(version_lower_than(version, (0, 15, 0)), "{version}");
        }
    }

    #[test]
    fn test_not_lower_than_minimum() {
        for version in ["0.15.0", "1.33.0", "0.15.0b123", "0.15.b1", "0.16.b1"] {
            assert!(!version_lower_than(version, (0, 15, 0)), "{version}");
        }
    }

    #[test]
    fn test_extra_segment_is_ignored() {
        assert!(!version_lower_than("0.15.0.b2", (0, 14, 99)));
    }

    #[test]
    fn test_build_metadata_is_ignored() {
        assert!(!version_lower_than(
            "1.2.0rc2-dev0+7fad31a0",
            MIN_SUPPORTED_VERSION
        ));
    }

    #[test]
    fn test_garbage_is_version_zero() {
        assert_eq!(ModelVersion::parse(""), ModelVersion::default());
        assert_eq!(ModelVersion::parse("beta"), ModelVersion::default());
    }

    #[test]
    fn test_model_version_is_supported() {
        assert!(!version_lower_than(MODEL_VERSION, MIN_SUPPORTED_VERSION));
    }

    #[test]
    fn test_display() {
        assert_eq!(ModelVersion::parse("1.2").to_string(), "1.2.0");
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn triple() -> impl Strategy<Value = (u32, u32, u32)> {
        (0u32..10_000, 0u32..10_000, 0u32..10_000)
    }

    proptest! {
        #[test]
        fn parse_roundtrip((major, minor, patch) in triple()) {
            let version = ModelVersion::new(major, minor, patch);
            prop_assert_eq!(ModelVersion::parse(&version.to_string()), version);
        }

        #[test]
        fn suffix_does_not_change_version(
            (major, minor, patch) in triple(),
            suffix in "(b|rc|a|\\.dev)[0-9]{0,3}",
        ) {
            let text = format!("{major}.{minor}.{patch}{suffix}");
            prop_assert_eq!(ModelVersion::parse(&text), ModelVersion::new(major, minor, patch));
        }

        #[test]
        fn ordering_matches_tuples(a in triple(), b in triple()) {
            let text = format!("{}.{}.{}", a.0, a.1, a.2);
            prop_assert_eq!(version_lower_than(&text, b), a < b);
        }
    }
}

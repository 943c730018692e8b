//! Immutable, ordered framework versions.
//!
//! An [`ApiVersion`] is a sequence of non-negative integer segments with an
//! optional suffix such as `SNAPSHOT`. Two orderings are defined on it:
//!
//! - [`cmp_level`](ApiVersion::cmp_level) compares release levels. Missing
//!   trailing segments count as zero and the suffix is ignored, so `4`,
//!   `4.0` and `4.0-SNAPSHOT` are all the same level.
//! - [`cmp_reach`](ApiVersion::cmp_reach) orders *ceilings* by how far they
//!   reach. A ceiling names a release line at its own precision: `11` reaches
//!   every `11.x`, while `4.3` stops after `4.3.x`, so `4.3` reaches less far
//!   than `4`.
//!
//! Neither ordering is exposed through [`Ord`]: identity (`Eq`, `Hash`) is
//! structural and includes the suffix, which would contradict both.
//!
//! # Example
//!
//! ```
//! use apilevel_core::version::ApiVersion;
//!
//! let ceiling = ApiVersion::new([11]);
//! let detected: ApiVersion = "11.2.14-SNAPSHOT".parse().unwrap();
//!
//! assert!(ceiling.covers(&detected));
//! assert!(detected.is_snapshot());
//! assert_eq!(detected.to_string(), "11.2.14-SNAPSHOT");
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Suffix marking a pre-release build.
pub const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

/// Error returned when a version string is not of the form `N(.N)*(-suffix)?`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    /// The input was empty.
    #[error("empty version string")]
    Empty,

    /// A segment was not a non-negative integer.
    #[error("invalid segment '{segment}' in version '{input}'")]
    InvalidSegment {
        /// The offending segment.
        segment: String,
        /// The full input.
        input: String,
    },

    /// A `-` was present but no suffix followed it, or the suffix held whitespace.
    #[error("invalid suffix in version '{0}'")]
    InvalidSuffix(String),
}

/// An immutable framework version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiVersion {
    segments: Vec<u32>,
    suffix: Option<String>,
}

impl ApiVersion {
    /// Creates a version from its integer segments.
    ///
    /// No segments at all is read as `0`, so every version has a level.
    #[must_use]
    pub fn new(segments: impl Into<Vec<u32>>) -> Self {
        let mut segments = segments.into();
        if segments.is_empty() {
            segments.push(0);
        }
        Self {
            segments,
            suffix: None,
        }
    }

    /// Returns a copy of this version carrying `suffix`.
    ///
    /// Surrounding whitespace is trimmed and inner whitespace runs become a
    /// single `-`, so `"beta 1"` is stored as `beta-1`. A blank suffix clears it.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl AsRef<str>) -> Self {
        let suffix = suffix.as_ref().split_whitespace().collect::<Vec<_>>().join("-");
        self.suffix = (!suffix.is_empty()).then_some(suffix);
        self
    }

    /// Returns a copy of this version without its suffix.
    #[must_use]
    pub fn without_suffix(&self) -> Self {
        Self::new(self.segments.clone())
    }

    /// Returns all declared segments.
    #[must_use]
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// Returns the segment at `index`, or `0` if the version is shorter.
    #[must_use]
    pub fn segment(&self, index: usize) -> u32 {
        self.segments.get(index).copied().unwrap_or(0)
    }

    /// Returns the first segment.
    #[must_use]
    pub fn major(&self) -> u32 {
        self.segment(0)
    }

    /// Returns the second segment.
    #[must_use]
    pub fn minor(&self) -> u32 {
        self.segment(1)
    }

    /// Returns the third segment.
    #[must_use]
    pub fn patch(&self) -> u32 {
        self.segment(2)
    }

    /// Returns the suffix, if any.
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Returns true if the suffix is `SNAPSHOT` (case-insensitive).
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.suffix
            .as_deref()
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case(SNAPSHOT_SUFFIX))
    }

    /// Compares release levels, zero-filling missing segments and ignoring suffixes.
    #[must_use]
    pub fn cmp_level(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Returns true if both versions denote the same release level.
    #[must_use]
    pub fn is_same_level(&self, other: &Self) -> bool {
        self.cmp_level(other).is_eq()
    }

    /// Returns true if this version, read at its own precision, is at or above `request`.
    ///
    /// `request` is truncated to this version's segment count before the
    /// comparison, so `11` covers `11.2.14` and `4.3` covers `4.1` but not `4.5`.
    #[must_use]
    pub fn covers(&self, request: &Self) -> bool {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, segment)| segment.cmp(&request.segment(i)))
            .find(|ordering| ordering.is_ne())
            .is_none_or(Ordering::is_gt)
    }

    /// Orders ceilings by how far they reach.
    ///
    /// The shared prefix decides first; on an equal prefix the more specific
    /// (longer) ceiling reaches less far.
    #[must_use]
    pub fn cmp_reach(&self, other: &Self) -> Ordering {
        self.segments
            .iter()
            .zip(&other.segments)
            .map(|(a, b)| a.cmp(b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| other.segments.len().cmp(&self.segments.len()))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        if let Some(suffix) = &self.suffix {
            write!(f, "-{suffix}")?;
        }
        Ok(())
    }
}

impl FromStr for ApiVersion {
    type Err = VersionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let (levels, suffix) = match input.split_once('-') {
            Some((levels, suffix)) => {
                if suffix.is_empty() || suffix.chars().any(char::is_whitespace) {
                    return Err(VersionParseError::InvalidSuffix(input.to_string()));
                }
                (levels, Some(suffix))
            }
            None => (input, None),
        };

        let segments = levels
            .split('.')
            .map(|segment| {
                let valid = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
                valid
                    .then(|| segment.parse::<u32>().ok())
                    .flatten()
                    .ok_or_else(|| VersionParseError::InvalidSegment {
                        segment: segment.to_string(),
                        input: input.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            segments,
            suffix: suffix.map(str::to_string),
        })
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApiVersion> for String {
    fn from(version: ApiVersion) -> Self {
        version.to_string()
    }
}

impl<const N: usize> From<[u32; N]> for ApiVersion {
    fn from(segments: [u32; N]) -> Self {
        Self::new(segments)
    }
}

impl From<&[u32]> for ApiVersion {
    fn from(segments: &[u32]) -> Self {
        Self::new(segments)
    }
}

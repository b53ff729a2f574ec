//! Dotted numeric project versions.
//!
//! Versions such as `1.2`, `1.2.0` or `2025.10.3.1` have any number of
//! segments. Comparison is numeric per segment, with the shorter version
//! padded with zeros, so `1.2 == 1.2.0` and `1.10 > 1.9`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed project version.
#[derive(Debug, Clone)]
pub struct ProjectVersion {
    segments: Vec<u64>,
}

impl ProjectVersion {
    /// Parses a version leniently: a segment that is not a non-negative
    /// integer counts as zero.
    pub fn parse(s: &str) -> Self {
        let segments = s
            .trim()
            .split('.')
            .map(|segment| segment.trim().parse::<u64>().unwrap_or(0))
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    fn segment(&self, index: usize) -> u64 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for ProjectVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl PartialEq for ProjectVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ProjectVersion {}

impl PartialOrd for ProjectVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProjectVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for ProjectVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Compares two optional version strings.
///
/// Returns `None` (incomparable) when either side is absent.
pub fn compare_versions(a: Option<&str>, b: Option<&str>) -> Option<Ordering> {
    let (a, b) = (a?, b?);
    Some(ProjectVersion::parse(a).cmp(&ProjectVersion::parse(b)))
}

//! Match kind configuration for multi-pattern search.
//!
//! This crate provides the `MatchKind` enum which selects the semantics an
//! automaton reports matches with. It is shared by the core automaton and the
//! entry-point crate so both agree on the numeric codes.

use std::fmt;
use std::str::FromStr;

/// Match kind for multi-pattern search.
///
/// Selected when the automaton is built and fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum MatchKind {
    /// At the first position where a pattern completes, report the longest
    /// pattern ending there (a state's own pattern before its suffixes,
    /// lowest index on ties), then restart after it. Also the only kind
    /// that supports overlapping search.
    #[default]
    Standard = 0,
    /// Among matches starting at the leftmost position, report the longest.
    LeftmostLongest = 1,
    /// Among matches starting at the leftmost position, report the one
    /// registered first.
    LeftmostFirst = 2,
}

impl MatchKind {
    /// Returns true for [`MatchKind::Standard`].
    pub fn is_standard(self) -> bool {
        self == MatchKind::Standard
    }

    /// Returns true for either leftmost kind.
    pub fn is_leftmost(self) -> bool {
        matches!(self, MatchKind::LeftmostLongest | MatchKind::LeftmostFirst)
    }

    /// Returns true for [`MatchKind::LeftmostFirst`].
    pub fn is_leftmost_first(self) -> bool {
        self == MatchKind::LeftmostFirst
    }

    /// Kebab-case name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Standard => "standard",
            MatchKind::LeftmostLongest => "leftmost-longest",
            MatchKind::LeftmostFirst => "leftmost-first",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a numeric code or name does not denote a match kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidMatchKind {
    /// Unknown numeric code
    Code(u8),
    /// Unknown name
    Name(String),
}

impl fmt::Display for InvalidMatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidMatchKind::Code(code) => write!(f, "Invalid match kind code: {}", code),
            InvalidMatchKind::Name(name) => write!(f, "Invalid match kind name: {}", name),
        }
    }
}

impl std::error::Error for InvalidMatchKind {}

impl TryFrom<u8> for MatchKind {
    type Error = InvalidMatchKind;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MatchKind::Standard),
            1 => Ok(MatchKind::LeftmostLongest),
            2 => Ok(MatchKind::LeftmostFirst),
            _ => Err(InvalidMatchKind::Code(code)),
        }
    }
}

impl From<MatchKind> for u8 {
    fn from(kind: MatchKind) -> Self {
        kind as u8
    }
}

impl FromStr for MatchKind {
    type Err = InvalidMatchKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "standard" => Ok(MatchKind::Standard),
            "leftmost-longest" => Ok(MatchKind::LeftmostLongest),
            "leftmost-first" => Ok(MatchKind::LeftmostFirst),
            _ => Err(InvalidMatchKind::Name(s.to_string())),
        }
    }
}

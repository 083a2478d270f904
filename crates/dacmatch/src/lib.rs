//! dacmatch - Multi-Pattern String Search
//!
//! dacmatch finds every occurrence of a fixed set of literal patterns in a
//! string with one left-to-right pass, using an Aho-Corasick automaton
//! compiled into a double array.
//!
//! # Quick Start
//!
//! ```rust
//! use dacmatch::{Automaton, MatchKind};
//!
//! let patterns = ["t", "hi", "h", "this", "テス"];
//!
//! // Standard: longest pattern ending where one first completes, then
//! // restart after it
//! let ac = Automaton::new(patterns)?;
//! assert_eq!(
//!     ac.find("this is a テスト"),
//!     vec![(0, 1, 0), (1, 2, 2), (10, 12, 4)]
//! );
//!
//! // Every occurrence, nested and overlapping ones included
//! assert_eq!(
//!     ac.find_overlapping("this is a テスト")?,
//!     vec![(0, 1, 0), (1, 2, 2), (1, 3, 1), (0, 4, 3), (10, 12, 4)]
//! );
//!
//! // Leftmost-longest
//! let ac = Automaton::with_match_kind(patterns, MatchKind::LeftmostLongest)?;
//! assert_eq!(ac.find_as_strings("this is a テスト"), vec!["this", "テス"]);
//! # Ok::<(), dacmatch::DacmatchError>(())
//! ```
//!
//! # Match kinds
//!
//! | Kind               | Code | `find` reports                                                   |
//! |--------------------|------|------------------------------------------------------------------|
//! | `Standard`         | 0    | longest pattern ending where the first one completes, lowest index on ties |
//! | `LeftmostLongest`  | 1    | longest pattern at the leftmost start                            |
//! | `LeftmostFirst`    | 2    | earliest registered pattern at the leftmost start                |
//!
//! Overlapping search is only available on `Standard` automata.
//!
//! Offsets are `char` offsets, `(start, end, pattern_index)` with `end`
//! exclusive.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types for dacmatch operations
pub mod error;

pub use crate::error::{AcError, DacmatchError, Result};
pub use dacmatch_ac::{DoubleArrayAhoCorasick, FindIter, Match};
pub use dacmatch_match_kind::{InvalidMatchKind, MatchKind};

use tracing::debug;

/// Builder for [`Automaton`]
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    match_kind: MatchKind,
    verify: bool,
}

impl AutomatonBuilder {
    /// Create a builder for a standard automaton
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match kind
    pub fn match_kind(mut self, match_kind: MatchKind) -> Self {
        self.match_kind = match_kind;
        self
    }

    /// Set the match kind from its numeric code
    ///
    /// ```
    /// use dacmatch::{AutomatonBuilder, MatchKind};
    ///
    /// let builder = AutomatonBuilder::new().match_kind_code(1).unwrap();
    /// let ac = builder.build(["a"]).unwrap();
    /// assert_eq!(ac.match_kind(), MatchKind::LeftmostLongest);
    ///
    /// assert!(AutomatonBuilder::new().match_kind_code(7).is_err());
    /// ```
    pub fn match_kind_code(self, code: u8) -> Result<Self> {
        Ok(self.match_kind(MatchKind::try_from(code)?))
    }

    /// Validate the compiled automaton before returning it
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Build the automaton
    ///
    /// # Errors
    ///
    /// [`DacmatchError::Automaton`] if a pattern is empty or the pattern
    /// set is too large to index.
    pub fn build<I, P>(self, patterns: I) -> Result<Automaton>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let pma = DoubleArrayAhoCorasick::builder()
            .match_kind(self.match_kind)
            .verify(self.verify)
            .build(&patterns)?;
        debug!(
            patterns = patterns.len(),
            states = pma.num_states(),
            heap_bytes = pma.heap_bytes(),
            "automaton ready"
        );
        Ok(Automaton { pma, patterns })
    }
}

/// Multi-pattern search automaton
///
/// Immutable once built; share it between threads with `Arc` or plain
/// references.
#[derive(Debug, Clone)]
pub struct Automaton {
    pma: DoubleArrayAhoCorasick,
    patterns: Vec<String>,
}

impl Automaton {
    /// Build a standard automaton
    pub fn new<I, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        AutomatonBuilder::new().build(patterns)
    }

    /// Build an automaton with the given match kind
    pub fn with_match_kind<I, P>(patterns: I, match_kind: MatchKind) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        AutomatonBuilder::new().match_kind(match_kind).build(patterns)
    }

    /// Shorthand for [`AutomatonBuilder::new`]
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::new()
    }

    /// Non-overlapping matches under the automaton's match kind, as
    /// `(start, end, pattern_index)`
    pub fn find(&self, haystack: &str) -> Vec<(usize, usize, usize)> {
        self.pma.find_iter(haystack).map(Into::into).collect()
    }

    /// Every occurrence of every pattern, by ascending end then ascending
    /// pattern index
    ///
    /// # Errors
    ///
    /// [`AcError::UnsupportedOperation`](dacmatch_ac::AcError) wrapped in
    /// [`DacmatchError::Automaton`] for leftmost automata. Nothing is
    /// scanned in that case.
    pub fn find_overlapping(&self, haystack: &str) -> Result<Vec<(usize, usize, usize)>> {
        Ok(self
            .pma
            .find_overlapping_iter(haystack)?
            .map(Into::into)
            .collect())
    }

    /// Overlapping search reporting only the longest pattern at each end
    /// position
    ///
    /// # Errors
    ///
    /// Same as [`Automaton::find_overlapping`].
    pub fn find_overlapping_no_suffix(
        &self,
        haystack: &str,
    ) -> Result<Vec<(usize, usize, usize)>> {
        Ok(self
            .pma
            .find_overlapping_no_suffix_iter(haystack)?
            .map(Into::into)
            .collect())
    }

    /// [`Automaton::find`], returning the matched patterns
    pub fn find_as_strings(&self, haystack: &str) -> Vec<&str> {
        self.pma
            .find_iter(haystack)
            .map(|m| self.patterns[m.pattern()].as_str())
            .collect()
    }

    /// [`Automaton::find_overlapping`], returning the matched patterns
    pub fn find_overlapping_as_strings(&self, haystack: &str) -> Result<Vec<&str>> {
        Ok(self
            .pma
            .find_overlapping_iter(haystack)?
            .map(|m| self.patterns[m.pattern()].as_str())
            .collect())
    }

    /// [`Automaton::find_overlapping_no_suffix`], returning the matched
    /// patterns
    pub fn find_overlapping_no_suffix_as_strings(&self, haystack: &str) -> Result<Vec<&str>> {
        Ok(self
            .pma
            .find_overlapping_no_suffix_iter(haystack)?
            .map(|m| self.patterns[m.pattern()].as_str())
            .collect())
    }

    /// Lazy version of [`Automaton::find`]
    pub fn find_iter<'a>(&'a self, haystack: &'a str) -> FindIter<'a, &'a str> {
        self.pma.find_iter(haystack)
    }

    /// Patterns in registration order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Pattern at `index`
    pub fn pattern(&self, index: usize) -> Option<&str> {
        self.patterns.get(index).map(String::as_str)
    }

    /// Match kind the automaton was built with
    pub fn match_kind(&self) -> MatchKind {
        self.pma.match_kind()
    }

    /// Number of automaton states
    pub fn num_states(&self) -> usize {
        self.pma.num_states()
    }

    /// The underlying double-array automaton
    pub fn as_double_array(&self) -> &DoubleArrayAhoCorasick {
        &self.pma
    }
}

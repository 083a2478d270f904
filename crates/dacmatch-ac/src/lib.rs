//! Double-Array Aho-Corasick Automaton
//!
//! This crate builds an Aho-Corasick automaton over a fixed set of literal
//! patterns and compiles it into a double array, so each transition is one
//! addition and one comparison instead of a map lookup.
//!
//! # Design
//!
//! Construction runs four passes, once:
//! - a prefix trie over the patterns (symbols are Unicode scalar values)
//! - failure links, breadth-first
//! - output sets aggregated along the failure links
//! - compaction into BASE/CHECK arrays with a free-list placement search
//!
//! The compiled automaton is immutable. Searching only reads it, so one
//! automaton can serve any number of threads at once.
//!
//! # Example
//!
//! ```
//! use dacmatch_ac::DoubleArrayAhoCorasick;
//!
//! let pma = DoubleArrayAhoCorasick::new(["bcd", "ab", "a"]).unwrap();
//!
//! let matches: Vec<_> = pma
//!     .find_iter("abcd")
//!     .map(|m| (m.start(), m.end(), m.pattern()))
//!     .collect();
//! assert_eq!(matches, vec![(0, 1, 2), (1, 4, 0)]);
//! ```

#![warn(missing_docs)]

mod code_mapper;
mod double_array;
pub mod error;
mod failure;
mod outputs;
pub mod search;
mod trie;

// Validation module for compiled automata
pub mod validation;

pub use dacmatch_match_kind::MatchKind;
pub use error::{AcError, Result};
pub use search::{FindIter, Match};
pub use validation::{
    validate_automaton, validate_transitions, AutomatonStats, AutomatonValidationResult,
};

use code_mapper::CodeMapper;
use double_array::{State, BASE_INVALID, DEAD_STATE_IDX, ROOT_STATE_IDX};
use outputs::Output;
use search::Protocol;
use tracing::{debug, warn};

/// Builder for [`DoubleArrayAhoCorasick`]
///
/// ```
/// use dacmatch_ac::{AhoCorasickBuilder, MatchKind};
///
/// let pma = AhoCorasickBuilder::new()
///     .match_kind(MatchKind::LeftmostLongest)
///     .build(["ab", "a", "abcd"])
///     .unwrap();
///
/// let m = pma.find_iter("abcd").next().unwrap();
/// assert_eq!((0, 4, 2), (m.start(), m.end(), m.pattern()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AhoCorasickBuilder {
    match_kind: MatchKind,
    verify: bool,
}

impl AhoCorasickBuilder {
    /// Create a builder with standard semantics and no verification pass
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match semantics of the automaton
    pub fn match_kind(mut self, match_kind: MatchKind) -> Self {
        self.match_kind = match_kind;
        self
    }

    /// Run [`validate_automaton`] and [`validate_transitions`] after
    /// construction and fail if either reports an error
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Build the automaton from patterns
    ///
    /// The position of each pattern in `patterns` is its index in reported
    /// matches. Duplicate patterns are allowed and keep their own indices.
    ///
    /// # Errors
    ///
    /// - [`AcError::InvalidInput`] if a pattern is empty
    /// - [`AcError::ResourceLimitExceeded`] if the automaton outgrows 32-bit
    ///   indices
    pub fn build<I, P>(self, patterns: I) -> Result<DoubleArrayAhoCorasick>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let patterns: Vec<P> = patterns.into_iter().collect();
        let match_kind = self.match_kind;

        let mut trie = trie::Trie::new(match_kind);
        for pattern in &patterns {
            trie.add(pattern.as_ref())?;
        }
        debug!(
            patterns = trie.num_patterns(),
            nodes = trie.len(),
            %match_kind,
            "built pattern trie"
        );

        let links = failure::build_failure_links(&trie, match_kind);
        let table = outputs::aggregate_outputs(&trie, &links, match_kind);
        if table.pool.len() > u32::MAX as usize {
            return Err(AcError::ResourceLimitExceeded(format!(
                "{} output entries, maximum is {}",
                table.pool.len(),
                u32::MAX
            )));
        }

        let mapper = CodeMapper::new(patterns.iter().map(|p| p.as_ref()));
        let da = double_array::compile(&trie, &links, &table, &mapper)?;
        debug!(
            slots = da.states.len(),
            occupied = da.occupied,
            alphabet = mapper.alphabet_size(),
            output_entries = table.pool.len(),
            "compiled double array"
        );

        let mut pool = table.pool;
        pool.shrink_to_fit();
        let pma = DoubleArrayAhoCorasick {
            states: da.states,
            outputs: pool,
            mapper,
            match_kind,
            max_depth: trie.max_depth(),
            pattern_lens: trie.pattern_lens,
            num_states: da.occupied,
        };

        if self.verify {
            let mut errors = Vec::new();
            for result in [
                validate_automaton(&pma),
                validate_transitions(&pma, &patterns),
            ] {
                for warning in &result.warnings {
                    warn!("automaton validation: {}", warning);
                }
                errors.extend(result.errors);
            }
            if !errors.is_empty() {
                return Err(AcError::InvalidInput(format!(
                    "Automaton failed validation: {}",
                    errors.join("; ")
                )));
            }
        }

        Ok(pma)
    }
}

/// Aho-Corasick automaton compiled into a double array
///
/// Built once by [`AhoCorasickBuilder`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct DoubleArrayAhoCorasick {
    pub(crate) states: Vec<State>,
    pub(crate) outputs: Vec<Output>,
    pub(crate) mapper: CodeMapper,
    pub(crate) match_kind: MatchKind,
    pub(crate) pattern_lens: Vec<u32>,
    pub(crate) max_depth: u32,
    num_states: usize,
}

impl DoubleArrayAhoCorasick {
    /// Build an automaton with standard semantics
    ///
    /// # Errors
    ///
    /// See [`AhoCorasickBuilder::build`].
    pub fn new<I, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        AhoCorasickBuilder::new().build(patterns)
    }

    /// Shorthand for [`AhoCorasickBuilder::new`]
    pub fn builder() -> AhoCorasickBuilder {
        AhoCorasickBuilder::new()
    }

    /// Non-overlapping matches under the automaton's match kind
    ///
    /// Offsets are counted in `char`s, not bytes.
    ///
    /// ```
    /// use dacmatch_ac::DoubleArrayAhoCorasick;
    ///
    /// let pma = DoubleArrayAhoCorasick::new(["全世界", "世界", "に"]).unwrap();
    /// let mut it = pma.find_iter("全世界中に");
    ///
    /// let m = it.next().unwrap();
    /// assert_eq!((0, 3, 0), (m.start(), m.end(), m.pattern()));
    /// let m = it.next().unwrap();
    /// assert_eq!((4, 5, 2), (m.start(), m.end(), m.pattern()));
    /// assert_eq!(None, it.next());
    /// ```
    pub fn find_iter<P>(&self, haystack: P) -> FindIter<'_, P>
    where
        P: AsRef<str>,
    {
        let protocol = if self.match_kind.is_leftmost() {
            Protocol::Leftmost
        } else {
            Protocol::Standard
        };
        FindIter::new(self, haystack, protocol)
    }

    /// Every occurrence of every pattern, by ascending end then ascending
    /// pattern index
    ///
    /// # Errors
    ///
    /// [`AcError::UnsupportedOperation`] unless the automaton was built with
    /// [`MatchKind::Standard`].
    pub fn find_overlapping_iter<P>(&self, haystack: P) -> Result<FindIter<'_, P>>
    where
        P: AsRef<str>,
    {
        self.require_standard("find_overlapping")?;
        Ok(FindIter::new(self, haystack, Protocol::Overlapping))
    }

    /// Overlapping search reporting one match per end position: the longest
    /// pattern ending there, so suffixes of it are left out
    ///
    /// # Errors
    ///
    /// [`AcError::UnsupportedOperation`] unless the automaton was built with
    /// [`MatchKind::Standard`].
    pub fn find_overlapping_no_suffix_iter<P>(&self, haystack: P) -> Result<FindIter<'_, P>>
    where
        P: AsRef<str>,
    {
        self.require_standard("find_overlapping_no_suffix")?;
        Ok(FindIter::new(self, haystack, Protocol::OverlappingNoSuffix))
    }

    fn require_standard(&self, operation: &str) -> Result<()> {
        if self.match_kind.is_standard() {
            Ok(())
        } else {
            Err(AcError::UnsupportedOperation(format!(
                "{} requires match kind standard, automaton was built with {}",
                operation, self.match_kind
            )))
        }
    }

    /// Match kind the automaton was built with
    pub fn match_kind(&self) -> MatchKind {
        self.match_kind
    }

    /// Number of registered patterns, including duplicates
    pub fn num_patterns(&self) -> usize {
        self.pattern_lens.len()
    }

    /// Length in `char`s of the pattern at `index`
    pub fn pattern_len(&self, index: usize) -> Option<usize> {
        self.pattern_lens.get(index).map(|&len| len as usize)
    }

    /// Number of states, root and the leftmost dead state included
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Length of the double array, vacant slots included
    pub fn num_slots(&self) -> usize {
        self.states.len()
    }

    /// Heap memory held by the automaton, in bytes
    pub fn heap_bytes(&self) -> usize {
        self.states.capacity() * std::mem::size_of::<State>()
            + self.outputs.capacity() * std::mem::size_of::<Output>()
            + self.pattern_lens.capacity() * std::mem::size_of::<u32>()
            + self.mapper.heap_bytes()
    }

    #[inline(always)]
    pub(crate) fn child_index(&self, state: u32, code: u32) -> Option<u32> {
        let base = self.states[state as usize].base;
        if base == BASE_INVALID {
            return None;
        }
        let idx = base.checked_add(code)?;
        match self.states.get(idx as usize) {
            Some(child) if child.check == state => Some(idx),
            _ => None,
        }
    }

    /// Follow `code` from `state`, falling back along failure links.
    ///
    /// A symbol that appears in no pattern has no code; it walks the chain
    /// down to the root, or to the dead state in leftmost automata.
    #[inline(always)]
    pub(crate) fn next_state(&self, mut state: u32, code: Option<u32>) -> u32 {
        loop {
            if let Some(code) = code {
                if let Some(next) = self.child_index(state, code) {
                    return next;
                }
            }
            if state == ROOT_STATE_IDX {
                return ROOT_STATE_IDX;
            }
            state = self.states[state as usize].fail;
            if state == DEAD_STATE_IDX {
                return DEAD_STATE_IDX;
            }
        }
    }

    #[inline(always)]
    pub(crate) fn outputs_of(&self, state: u32) -> &[Output] {
        let s = &self.states[state as usize];
        let pos = s.output_pos as usize;
        &self.outputs[pos..pos + s.output_len as usize]
    }

    /// Longest output of `state`, lowest index among equals. For a state
    /// that completes patterns of its own this is its own pattern.
    #[inline(always)]
    pub(crate) fn preferred_output(&self, state: u32) -> Option<Output> {
        let s = &self.states[state as usize];
        if s.output_len == 0 {
            return None;
        }
        Some(self.outputs[s.output_longest as usize])
    }
}

//! Match reporting over a compiled automaton
//!
//! All search modes share one scanning loop. They differ in which of a
//! state's outputs they report and in whether the scan restarts from the
//! root after a report.

use crate::double_array::{DEAD_STATE_IDX, ROOT_STATE_IDX};
use crate::outputs::Output;
use crate::DoubleArrayAhoCorasick;
use std::ops::Range;

/// A pattern occurrence
///
/// `start` and `end` are offsets in `char`s; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    start: usize,
    end: usize,
    pattern: usize,
}

impl Match {
    #[inline(always)]
    fn ending_at(end: usize, output: Output) -> Self {
        Self {
            start: end - output.len as usize,
            end,
            pattern: output.pattern as usize,
        }
    }

    /// Offset of the first `char` of the occurrence
    #[inline(always)]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset just past the last `char` of the occurrence
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Index of the pattern in the order given at build time
    #[inline(always)]
    pub fn pattern(&self) -> usize {
        self.pattern
    }

    /// Length of the occurrence in `char`s
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always `false`: patterns are never empty
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `start..end`, for slicing a `Vec<char>` of the haystack
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Match> for (usize, usize, usize) {
    fn from(m: Match) -> Self {
        (m.start, m.end, m.pattern)
    }
}

/// How a scan turns a state's outputs into reported matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Protocol {
    /// Preferred output (the state's own pattern, else the longest
    /// suffix pattern), then restart from the root
    Standard,
    /// Every output by ascending pattern index, no restart
    Overlapping,
    /// Preferred output, no restart
    OverlappingNoSuffix,
    /// Remember the latest output as a candidate; report it when the
    /// automaton dies or the input ends, then rescan from its end
    Leftmost,
}

/// Iterator over matches in a haystack
///
/// Created by [`DoubleArrayAhoCorasick::find_iter`],
/// [`DoubleArrayAhoCorasick::find_overlapping_iter`] and
/// [`DoubleArrayAhoCorasick::find_overlapping_no_suffix_iter`].
pub struct FindIter<'a, P> {
    pma: &'a DoubleArrayAhoCorasick,
    haystack: P,
    protocol: Protocol,
    state: u32,
    byte_pos: usize,
    pos: usize,
    /// Outputs of the current state not reported yet
    pending: Range<usize>,
    /// Leftmost candidate and the byte offset of its end
    candidate: Option<(Match, usize)>,
}

impl<'a, P> FindIter<'a, P>
where
    P: AsRef<str>,
{
    pub(crate) fn new(pma: &'a DoubleArrayAhoCorasick, haystack: P, protocol: Protocol) -> Self {
        Self {
            pma,
            haystack,
            protocol,
            state: ROOT_STATE_IDX,
            byte_pos: 0,
            pos: 0,
            pending: 0..0,
            candidate: None,
        }
    }
}

impl<P> Iterator for FindIter<'_, P>
where
    P: AsRef<str>,
{
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let pma = self.pma;
        if let Some(i) = self.pending.next() {
            return Some(Match::ending_at(self.pos, pma.outputs[i]));
        }

        let haystack = self.haystack.as_ref();
        while let Some(ch) = haystack[self.byte_pos..].chars().next() {
            self.byte_pos += ch.len_utf8();
            self.pos += 1;
            self.state = pma.next_state(self.state, pma.mapper.get(ch));

            if self.state == DEAD_STATE_IDX {
                // Only match states fail to the dead state, and reaching
                // one always sets a candidate.
                debug_assert!(self.candidate.is_some());
                self.state = ROOT_STATE_IDX;
                if let Some((m, end_byte)) = self.candidate.take() {
                    self.pos = m.end;
                    self.byte_pos = end_byte;
                    return Some(m);
                }
                continue;
            }

            let Some(preferred) = pma.preferred_output(self.state) else {
                continue;
            };
            match self.protocol {
                Protocol::Standard => {
                    self.state = ROOT_STATE_IDX;
                    return Some(Match::ending_at(self.pos, preferred));
                }
                Protocol::Overlapping => {
                    let s = &pma.states[self.state as usize];
                    let pos = s.output_pos as usize;
                    self.pending = pos + 1..pos + s.output_len as usize;
                    return Some(Match::ending_at(self.pos, pma.outputs[pos]));
                }
                Protocol::OverlappingNoSuffix => {
                    return Some(Match::ending_at(self.pos, preferred));
                }
                Protocol::Leftmost => {
                    self.candidate = Some((Match::ending_at(self.pos, preferred), self.byte_pos));
                }
            }
        }

        let (m, end_byte) = self.candidate.take()?;
        self.state = ROOT_STATE_IDX;
        self.pos = m.end;
        self.byte_pos = end_byte;
        Some(m)
    }
}

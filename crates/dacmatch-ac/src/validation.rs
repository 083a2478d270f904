//! Automaton validation
//!
//! Structural checks over a compiled double array, plus a re-walk of the
//! pattern set through direct transitions. Both passes only read the
//! automaton; they are run after construction when the builder is asked to
//! verify, and are available on their own for tests and diagnostics.

use crate::double_array::{BASE_INVALID, CHECK_INVALID, DEAD_STATE_IDX, ROOT_STATE_IDX};
use crate::DoubleArrayAhoCorasick;

/// Depth marker for states not resolved yet
const DEPTH_UNKNOWN: u32 = u32::MAX;
/// Depth marker for states on the parent chain being resolved
const DEPTH_VISITING: u32 = u32::MAX - 1;
/// Depth marker for states whose parent chain never reaches the root
const DEPTH_ORPHAN: u32 = u32::MAX - 2;

/// Validation result for a compiled automaton
#[derive(Debug, Clone)]
pub struct AutomatonValidationResult {
    /// Critical errors that make the automaton unusable
    pub errors: Vec<String>,
    /// Warnings about potential issues (non-fatal)
    pub warnings: Vec<String>,
    /// Statistics gathered during validation
    pub stats: AutomatonStats,
}

/// Statistics gathered during automaton validation
#[derive(Debug, Clone, Default)]
pub struct AutomatonStats {
    /// Length of the double array
    pub state_count: usize,
    /// Slots holding a state, root and dead included
    pub occupied_count: usize,
    /// `occupied_count / state_count`
    pub load_factor: f64,
    /// Entries in the shared output pool
    pub output_entries: usize,
    /// Occupied slots not reachable from the root
    pub orphaned_count: usize,
}

impl AutomatonValidationResult {
    fn new(pma: &DoubleArrayAhoCorasick) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: AutomatonStats {
                state_count: pma.states.len(),
                output_entries: pma.outputs.len(),
                ..AutomatonStats::default()
            },
        }
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate that a range is within bounds
fn validate_range(offset: usize, size: usize, len: usize) -> bool {
    offset.checked_add(size).is_some_and(|end| end <= len)
}

fn is_occupied(pma: &DoubleArrayAhoCorasick, idx: usize) -> bool {
    idx == ROOT_STATE_IDX as usize
        || idx == DEAD_STATE_IDX as usize
        || pma.states[idx].check != CHECK_INVALID
}

/// Validate the structure of a compiled automaton
///
/// Validates:
/// - Root and dead states are in place
/// - Every CHECK names an in-range parent whose BASE reaches the slot with
///   a code inside the alphabet
/// - Every occupied slot is reachable from the root through CHECK
/// - Failure links land on shallower states, so every chain ends at the
///   root or the dead state
/// - Output ranges, pattern ids and output lengths
pub fn validate_automaton(pma: &DoubleArrayAhoCorasick) -> AutomatonValidationResult {
    let mut result = AutomatonValidationResult::new(pma);
    let states = &pma.states;
    let len = states.len();

    if len < 2 {
        result
            .errors
            .push(format!("Double array has {} slots, root and dead need 2", len));
        return result;
    }
    if states[ROOT_STATE_IDX as usize].check != CHECK_INVALID {
        result.errors.push("Root state has a parent".to_string());
    }
    let dead = &states[DEAD_STATE_IDX as usize];
    if dead.check != CHECK_INVALID || dead.base != BASE_INVALID {
        result
            .errors
            .push("Dead state has a parent or children".to_string());
    }
    if dead.fail != DEAD_STATE_IDX {
        result
            .errors
            .push(format!("Dead state fails to {} instead of itself", dead.fail));
    }

    // Parent links and child counts
    let alphabet_size = pma.mapper.alphabet_size() as usize;
    let mut child_counts = vec![0u32; len];
    for idx in 0..len {
        if !is_occupied(pma, idx) {
            continue;
        }
        result.stats.occupied_count += 1;

        let parent = states[idx].check;
        if parent == CHECK_INVALID {
            continue;
        }
        if parent as usize >= len {
            result.errors.push(format!(
                "State {} claims parent {} out of range (len={})",
                idx, parent, len
            ));
            continue;
        }
        let base = states[parent as usize].base;
        if base == BASE_INVALID || (base as usize) > idx || idx - base as usize >= alphabet_size
        {
            result.errors.push(format!(
                "State {} is claimed by parent {} but parent base {} does not reach it",
                idx, parent, base
            ));
            continue;
        }
        child_counts[parent as usize] += 1;
    }

    for (idx, state) in states.iter().enumerate() {
        if state.base != BASE_INVALID && is_occupied(pma, idx) && child_counts[idx] == 0 {
            result
                .warnings
                .push(format!("State {} has a base but no children", idx));
        }
    }

    if result.stats.occupied_count != pma.num_states() {
        result.errors.push(format!(
            "Found {} occupied slots, automaton reports {} states",
            result.stats.occupied_count,
            pma.num_states()
        ));
    }
    result.stats.load_factor = result.stats.occupied_count as f64 / len as f64;

    // Depth of every state along its parent chain
    let depths = state_depths(pma);
    result.stats.orphaned_count = depths.iter().filter(|&&d| d == DEPTH_ORPHAN).count();
    if result.stats.orphaned_count > 0 {
        result.errors.push(format!(
            "Found {} orphaned states (not reachable from root)",
            result.stats.orphaned_count
        ));
    }

    let num_patterns = pma.num_patterns();
    for idx in 0..len {
        let depth = depths[idx];
        if idx == DEAD_STATE_IDX as usize || depth == DEPTH_ORPHAN || depth == DEPTH_UNKNOWN {
            continue;
        }
        let state = &states[idx];

        if depth > pma.max_depth {
            result.errors.push(format!(
                "State {} is at depth {}, longest pattern has {}",
                idx, depth, pma.max_depth
            ));
        }

        // Failure link
        let fail = state.fail as usize;
        if fail >= len {
            result.errors.push(format!(
                "State {} has failure link {} out of range (len={})",
                idx, fail, len
            ));
        } else if idx != ROOT_STATE_IDX as usize && fail != DEAD_STATE_IDX as usize {
            let fail_depth = depths[fail];
            if fail_depth >= depth {
                result.errors.push(format!(
                    "State {} at depth {} fails to state {} which is not shallower",
                    idx, depth, fail
                ));
            }
        }

        // Outputs
        if !validate_range(
            state.output_pos as usize,
            state.output_len as usize,
            pma.outputs.len(),
        ) {
            result.errors.push(format!(
                "State {} output range {}+{} out of bounds (pool={})",
                idx,
                state.output_pos,
                state.output_len,
                pma.outputs.len()
            ));
            continue;
        }
        let mut prev_pattern = None;
        for output in pma.outputs_of(idx as u32) {
            let pattern = output.pattern as usize;
            if pattern >= num_patterns {
                result.errors.push(format!(
                    "State {} references invalid pattern ID: {} (max={})",
                    idx, pattern, num_patterns
                ));
                continue;
            }
            if output.len != pma.pattern_lens[pattern] || output.len > depth {
                result.errors.push(format!(
                    "State {} reports pattern {} with length {} (pattern length {}, depth {})",
                    idx, pattern, output.len, pma.pattern_lens[pattern], depth
                ));
            }
            if prev_pattern.is_some_and(|prev| prev >= pattern) {
                result.errors.push(format!(
                    "State {} outputs are not ascending by pattern index",
                    idx
                ));
            }
            prev_pattern = Some(pattern);
        }

        let outputs = pma.outputs_of(idx as u32);
        if let Some(longest) = outputs.iter().map(|o| o.len).max() {
            let expected = state.output_pos as usize
                + outputs.iter().position(|o| o.len == longest).unwrap_or(0);
            if state.output_longest as usize != expected {
                result.errors.push(format!(
                    "State {} prefers output {} but the longest output is at {}",
                    idx, state.output_longest, expected
                ));
            }
        }
    }

    result
}

/// Resolve the depth of every occupied state by walking CHECK up to the root.
///
/// Each slot is walked once; states whose chain leaves the array, hits a
/// vacant slot or loops back on itself are marked orphaned.
fn state_depths(pma: &DoubleArrayAhoCorasick) -> Vec<u32> {
    let states = &pma.states;
    let len = states.len();
    let mut depths = vec![DEPTH_UNKNOWN; len];
    depths[ROOT_STATE_IDX as usize] = 0;
    let mut path = Vec::new();

    for start in 0..len {
        if depths[start] != DEPTH_UNKNOWN
            || start == DEAD_STATE_IDX as usize
            || !is_occupied(pma, start)
        {
            continue;
        }

        path.clear();
        let mut cur = start;
        let resolved = loop {
            match depths[cur] {
                DEPTH_UNKNOWN => {}
                DEPTH_VISITING | DEPTH_ORPHAN => break None,
                depth => break Some(depth),
            }
            depths[cur] = DEPTH_VISITING;
            path.push(cur);

            let parent = states[cur].check;
            if parent == CHECK_INVALID || parent as usize >= len {
                break None;
            }
            cur = parent as usize;
        };

        match resolved {
            Some(mut depth) => {
                for &idx in path.iter().rev() {
                    depth += 1;
                    depths[idx] = depth;
                }
            }
            None => {
                for &idx in &path {
                    depths[idx] = DEPTH_ORPHAN;
                }
            }
        }
    }

    depths
}

/// Validate that every pattern is spelled by direct transitions and ends in
/// a state that reports it
///
/// `patterns` must be the set the automaton was built from, in the same
/// order. In leftmost-first automata a pattern that extends an earlier,
/// already complete pattern can never be reported and is not in the
/// automaton; its walk stops at the complete prefix.
pub fn validate_transitions<S>(
    pma: &DoubleArrayAhoCorasick,
    patterns: &[S],
) -> AutomatonValidationResult
where
    S: AsRef<str>,
{
    let mut result = AutomatonValidationResult::new(pma);

    if patterns.len() != pma.num_patterns() {
        result.errors.push(format!(
            "Automaton has {} patterns, {} given",
            pma.num_patterns(),
            patterns.len()
        ));
        return result;
    }

    let leftmost_first = pma.match_kind.is_leftmost_first();
    let mut pruned = 0usize;

    'patterns: for (index, pattern) in patterns.iter().enumerate() {
        let pattern = pattern.as_ref();
        let char_len = pattern.chars().count();
        if char_len != pma.pattern_lens[index] as usize {
            result.errors.push(format!(
                "Pattern {} has {} chars, automaton records {}",
                index, char_len, pma.pattern_lens[index]
            ));
            continue;
        }

        let mut state = ROOT_STATE_IDX;
        for (depth, ch) in pattern.chars().enumerate() {
            if leftmost_first
                && pma
                    .outputs_of(state)
                    .iter()
                    .any(|o| o.len as usize == depth && (o.pattern as usize) < index)
            {
                pruned += 1;
                continue 'patterns;
            }
            let next = pma
                .mapper
                .get(ch)
                .and_then(|code| pma.child_index(state, code));
            match next {
                Some(next) => state = next,
                None => {
                    result.errors.push(format!(
                        "Pattern {} has no transition on {:?} after {} chars",
                        index, ch, depth
                    ));
                    continue 'patterns;
                }
            }
        }

        if !pma
            .outputs_of(state)
            .iter()
            .any(|o| o.pattern as usize == index)
        {
            result.errors.push(format!(
                "Pattern {} ends in state {} which does not report it",
                index, state
            ));
        }
    }

    if pruned > 0 {
        result.warnings.push(format!(
            "{} patterns extend an earlier complete pattern and can never match",
            pruned
        ));
    }

    result
}

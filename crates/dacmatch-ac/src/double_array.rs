//! Double-array compilation of the trie
//!
//! The trie, its failure links and its output ranges are packed into one
//! index-addressed array of [`State`] records. A transition from state `s` on
//! code `c` lands on `t = BASE[s] + c` and is valid iff `CHECK[t] == s`.
//!
//! # Placement
//!
//! States are placed breadth-first. For each trie node the compiler searches
//! for a base at which every child slot is vacant, scanning a circular
//! doubly-linked list of free slots (first fit). The array grows in blocks of
//! [`BLOCK_LEN`] slots and only the last [`FREE_BLOCKS`] blocks stay on the
//! free list; older blocks are closed, so one search never scans more than
//! `BLOCK_LEN * FREE_BLOCKS` slots regardless of the pattern count.

use crate::code_mapper::CodeMapper;
use crate::error::{AcError, Result};
use crate::failure::{FailureLinks, DEAD};
use crate::outputs::OutputTable;
use crate::trie::{Trie, ROOT};
use tracing::trace;

/// Index of the root state
pub(crate) const ROOT_STATE_IDX: u32 = 0;
/// Index of the state that ends a leftmost candidate
pub(crate) const DEAD_STATE_IDX: u32 = 1;
/// BASE of a state without children
pub(crate) const BASE_INVALID: u32 = u32::MAX;
/// CHECK of a slot no parent owns
pub(crate) const CHECK_INVALID: u32 = u32::MAX;

/// Number of slots added each time the array grows
const BLOCK_LEN: usize = 256;
/// Number of trailing blocks kept open for placement
const FREE_BLOCKS: usize = 16;
/// Largest usable state index; `u32::MAX` is reserved for the sentinels
const STATE_IDX_MAX: usize = (u32::MAX - 1) as usize;

const LINK_NONE: u32 = u32::MAX;

/// One slot of the compiled automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct State {
    pub(crate) base: u32,
    /// Index of the parent state, or [`CHECK_INVALID`]
    pub(crate) check: u32,
    pub(crate) fail: u32,
    pub(crate) output_pos: u32,
    pub(crate) output_len: u32,
    /// Pool index of the output reported by non-overlapping scans
    pub(crate) output_longest: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            base: BASE_INVALID,
            check: CHECK_INVALID,
            fail: ROOT_STATE_IDX,
            output_pos: 0,
            output_len: 0,
            output_longest: 0,
        }
    }
}

/// Free-list bookkeeping for one slot
#[derive(Debug, Clone, Copy)]
struct Slot {
    next: u32,
    prev: u32,
    used: bool,
    listed: bool,
}

/// Result of compilation
#[derive(Debug, Clone)]
pub(crate) struct DoubleArray {
    pub(crate) states: Vec<State>,
    /// Number of slots holding a state, root and dead included
    pub(crate) occupied: usize,
}

/// Builder for the double array
struct DoubleArrayBuilder {
    states: Vec<State>,
    slots: Vec<Slot>,
    head: Option<u32>,
    closed_blocks: usize,
    occupied: usize,
}

impl DoubleArrayBuilder {
    fn new(capacity: usize) -> Self {
        let mut builder = Self {
            states: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            head: None,
            closed_blocks: 0,
            occupied: 0,
        };
        builder.extend_block();
        builder.fix(ROOT_STATE_IDX as usize);
        builder.fix(DEAD_STATE_IDX as usize);
        builder
    }

    /// First base at which every code in `codes` lands on a vacant slot.
    ///
    /// `codes` must be sorted ascending and non-empty.
    fn find_base(&self, codes: &[u32]) -> usize {
        let first = codes[0] as usize;
        if let Some(head) = self.head {
            let head = head as usize;
            let mut idx = head;
            loop {
                debug_assert!(self.slots[idx].listed && !self.slots[idx].used);
                if idx >= first {
                    let base = idx - first;
                    if self.is_valid_base(base, codes) {
                        return base;
                    }
                }
                idx = self.slots[idx].next as usize;
                if idx == head {
                    break;
                }
            }
        }
        // Nothing open fits; place all children past the current end.
        self.states.len().saturating_sub(first)
    }

    fn is_valid_base(&self, base: usize, codes: &[u32]) -> bool {
        codes.iter().all(|&code| {
            let idx = base + code as usize;
            match self.slots.get(idx) {
                Some(slot) => slot.listed && !slot.used,
                None => true,
            }
        })
    }

    fn ensure_len(&mut self, len: usize) -> Result<()> {
        if len > STATE_IDX_MAX {
            return Err(AcError::ResourceLimitExceeded(format!(
                "Double array needs {} slots, maximum is {}",
                len, STATE_IDX_MAX
            )));
        }
        while self.states.len() < len {
            self.extend_block();
        }
        Ok(())
    }

    /// Append one block of vacant slots to the array and the free list.
    fn extend_block(&mut self) {
        let old_len = self.states.len();
        let new_len = old_len + BLOCK_LEN;
        trace!(old_len, new_len, "extending double array");

        self.states.resize(new_len, State::default());
        for i in old_len..new_len {
            self.slots.push(Slot {
                next: (i + 1) as u32,
                prev: i.wrapping_sub(1) as u32,
                used: false,
                listed: true,
            });
        }

        match self.head {
            None => {
                self.slots[old_len].prev = (new_len - 1) as u32;
                self.slots[new_len - 1].next = old_len as u32;
                self.head = Some(old_len as u32);
            }
            Some(head) => {
                let head = head as usize;
                let tail = self.slots[head].prev as usize;
                self.slots[old_len].prev = tail as u32;
                self.slots[tail].next = old_len as u32;
                self.slots[new_len - 1].next = head as u32;
                self.slots[head].prev = (new_len - 1) as u32;
            }
        }
    }

    /// Close every block that fell out of the open window.
    fn close_surplus_blocks(&mut self) {
        let num_blocks = self.states.len() / BLOCK_LEN;
        while num_blocks - self.closed_blocks > FREE_BLOCKS {
            let beg = self.closed_blocks * BLOCK_LEN;
            trace!(block = self.closed_blocks, "closing double array block");
            for idx in beg..beg + BLOCK_LEN {
                if self.slots[idx].listed {
                    self.unlink(idx);
                }
            }
            self.closed_blocks += 1;
        }
    }

    fn unlink(&mut self, idx: usize) {
        let Slot { next, prev, .. } = self.slots[idx];
        self.slots[idx].listed = false;
        self.slots[idx].next = LINK_NONE;
        self.slots[idx].prev = LINK_NONE;

        if next as usize == idx {
            self.head = None;
            return;
        }
        self.slots[prev as usize].next = next;
        self.slots[next as usize].prev = prev;
        if self.head == Some(idx as u32) {
            self.head = Some(next);
        }
    }

    /// Mark a slot as holding a state.
    fn fix(&mut self, idx: usize) {
        debug_assert!(!self.slots[idx].used);
        if self.slots[idx].listed {
            self.unlink(idx);
        }
        self.slots[idx].used = true;
        self.occupied += 1;
    }

    /// Drop the vacant tail so lookups past the last state fail the bounds check.
    fn finish(mut self) -> DoubleArray {
        let keep = self
            .slots
            .iter()
            .rposition(|slot| slot.used)
            .map_or(0, |last| last + 1);
        self.states.truncate(keep);
        self.states.shrink_to_fit();
        DoubleArray {
            states: self.states,
            occupied: self.occupied,
        }
    }
}

/// Compile the trie, its failure links and its output table into a double array.
pub(crate) fn compile(
    trie: &Trie,
    links: &FailureLinks,
    outputs: &OutputTable,
    mapper: &CodeMapper,
) -> Result<DoubleArray> {
    let mut builder = DoubleArrayBuilder::new(trie.len() + 2);
    let mut node_map = vec![u32::MAX; trie.len()];
    node_map[ROOT as usize] = ROOT_STATE_IDX;

    let mut children: Vec<(u32, u32)> = Vec::new();
    let mut codes: Vec<u32> = Vec::new();

    for &node in &links.bfs_order {
        let idx = node_map[node as usize];
        children.clear();
        for (&ch, &child) in &trie.nodes[node as usize].children {
            let code = mapper.get(ch).ok_or_else(|| {
                AcError::InvalidInput(format!("Symbol {:?} missing from the code table", ch))
            })?;
            children.push((code, child));
        }
        if children.is_empty() {
            continue;
        }
        children.sort_unstable_by_key(|&(code, _)| code);
        codes.clear();
        codes.extend(children.iter().map(|&(code, _)| code));

        let base = builder.find_base(&codes);
        let last = base + codes[codes.len() - 1] as usize;
        builder.ensure_len(last + 1)?;

        for &(code, child) in &children {
            let child_idx = base + code as usize;
            builder.fix(child_idx);
            builder.states[child_idx].check = idx;
            node_map[child as usize] = child_idx as u32;
        }
        builder.states[idx as usize].base = base as u32;
        builder.close_surplus_blocks();
    }

    for (node, &idx) in node_map.iter().enumerate() {
        let fail = links.fail[node];
        let range = outputs.ranges[node];
        let state = &mut builder.states[idx as usize];
        state.fail = if fail == DEAD {
            DEAD_STATE_IDX
        } else {
            node_map[fail as usize]
        };
        state.output_pos = range.pos;
        state.output_len = range.len;
        state.output_longest = range.longest;
    }
    builder.states[DEAD_STATE_IDX as usize].fail = DEAD_STATE_IDX;

    Ok(builder.finish())
}

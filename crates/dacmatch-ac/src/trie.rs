//! Prefix trie built from the pattern set
//!
//! The trie is the uncompiled form of the automaton. Nodes are addressed by
//! dense `u32` ids with the root at id 0; children are kept in a `BTreeMap`
//! so every later pass walks them in symbol order and construction is
//! deterministic.

use crate::error::{AcError, Result};
use dacmatch_match_kind::MatchKind;
use std::collections::{BTreeMap, VecDeque};

/// Id of the root node
pub(crate) const ROOT: u32 = 0;

/// Longest pattern accepted, in symbols
pub(crate) const PATTERN_LEN_MAX: usize = (u32::MAX >> 1) as usize;

/// Trie node used during construction
#[derive(Debug, Clone, Default)]
pub(crate) struct TrieNode {
    pub(crate) children: BTreeMap<char, u32>,
    /// Patterns completing exactly at this node, ascending by index
    pub(crate) outputs: Vec<u32>,
    pub(crate) depth: u32,
}

impl TrieNode {
    fn new(depth: u32) -> Self {
        Self {
            children: BTreeMap::new(),
            outputs: Vec::new(),
            depth,
        }
    }

    pub(crate) fn is_match(&self) -> bool {
        !self.outputs.is_empty()
    }
}

/// Prefix trie over the pattern set
#[derive(Debug, Clone)]
pub(crate) struct Trie {
    pub(crate) nodes: Vec<TrieNode>,
    /// Length of each registered pattern in symbols, by pattern index
    pub(crate) pattern_lens: Vec<u32>,
    match_kind: MatchKind,
}

impl Trie {
    pub(crate) fn new(match_kind: MatchKind) -> Self {
        Self {
            nodes: vec![TrieNode::new(0)],
            pattern_lens: Vec::new(),
            match_kind,
        }
    }

    /// Register the next pattern and return its index.
    ///
    /// In leftmost-first mode a pattern that extends an already complete
    /// pattern is registered (it keeps its index) but never reaches the trie,
    /// since the earlier pattern always wins at that start position.
    pub(crate) fn add(&mut self, pattern: &str) -> Result<u32> {
        if pattern.is_empty() {
            return Err(AcError::InvalidInput(format!(
                "Empty pattern at index {}",
                self.pattern_lens.len()
            )));
        }
        let pattern_id = u32::try_from(self.pattern_lens.len())
            .ok()
            .filter(|&id| id < u32::MAX)
            .ok_or_else(|| {
                AcError::ResourceLimitExceeded(format!(
                    "Number of patterns must be < {}",
                    u32::MAX
                ))
            })?;

        let len = pattern.chars().count();
        if len > PATTERN_LEN_MAX {
            return Err(AcError::ResourceLimitExceeded(format!(
                "Pattern {} is {} symbols long, maximum is {}",
                pattern_id, len, PATTERN_LEN_MAX
            )));
        }
        self.pattern_lens.push(len as u32);

        let mut current = ROOT;
        for ch in pattern.chars() {
            if self.match_kind.is_leftmost_first() && self.nodes[current as usize].is_match() {
                return Ok(pattern_id);
            }
            current = match self.nodes[current as usize].children.get(&ch) {
                Some(&next) => next,
                None => {
                    let next = u32::try_from(self.nodes.len()).map_err(|_| {
                        AcError::ResourceLimitExceeded("Too many trie nodes".to_string())
                    })?;
                    let depth = self.nodes[current as usize].depth + 1;
                    self.nodes.push(TrieNode::new(depth));
                    self.nodes[current as usize].children.insert(ch, next);
                    next
                }
            };
        }

        self.nodes[current as usize].outputs.push(pattern_id);
        Ok(pattern_id)
    }

    pub(crate) fn child(&self, node: u32, ch: char) -> Option<u32> {
        self.nodes[node as usize].children.get(&ch).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn num_patterns(&self) -> usize {
        self.pattern_lens.len()
    }

    pub(crate) fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Node ids in breadth-first order, root first
    pub(crate) fn bfs_order(&self) -> Vec<u32> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::new();
        queue.push_back(ROOT);
        while let Some(node) = queue.pop_front() {
            order.push(node);
            queue.extend(self.nodes[node as usize].children.values().copied());
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie_of(patterns: &[&str], kind: MatchKind) -> Trie {
        let mut trie = Trie::new(kind);
        for p in patterns {
            trie.add(p).unwrap();
        }
        trie
    }

    #[test]
    fn test_shared_prefixes() {
        let trie = trie_of(&["he", "she", "his", "hers"], MatchKind::Standard);
        // root, h, he, s, sh, she, hi, his, her, hers
        assert_eq!(trie.len(), 10);
        assert_eq!(trie.pattern_lens, vec![2, 3, 3, 4]);

        let h = trie.child(ROOT, 'h').unwrap();
        let he = trie.child(h, 'e').unwrap();
        assert_eq!(trie.nodes[he as usize].outputs, vec![0]);
        assert_eq!(trie.nodes[he as usize].depth, 2);
        assert!(trie.child(he, 'x').is_none());
    }

    #[test]
    fn test_duplicates_keep_their_indices() {
        let trie = trie_of(&["ab", "ab", "a"], MatchKind::Standard);
        let a = trie.child(ROOT, 'a').unwrap();
        let ab = trie.child(a, 'b').unwrap();
        assert_eq!(trie.nodes[ab as usize].outputs, vec![0, 1]);
        assert_eq!(trie.nodes[a as usize].outputs, vec![2]);
    }

    #[test]
    fn test_multibyte_symbols_are_single_edges() {
        let trie = trie_of(&["テス"], MatchKind::Standard);
        assert_eq!(trie.len(), 3);
        assert_eq!(trie.pattern_lens, vec![2]);
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let mut trie = Trie::new(MatchKind::Standard);
        trie.add("a").unwrap();
        let err = trie.add("").unwrap_err();
        assert!(matches!(err, AcError::InvalidInput(_)));
    }

    #[test]
    fn test_leftmost_first_skips_unreachable_extensions() {
        let trie = trie_of(&["ab", "abc", "a"], MatchKind::LeftmostFirst);
        // "abc" can never beat "ab" so only root, a, ab exist
        assert_eq!(trie.len(), 3);
        assert_eq!(trie.num_patterns(), 3);
        assert_eq!(trie.max_depth(), 2);
    }

    #[test]
    fn test_bfs_order_by_depth() {
        let trie = trie_of(&["abc", "b", "bd"], MatchKind::Standard);
        let depths: Vec<u32> = trie
            .bfs_order()
            .iter()
            .map(|&n| trie.nodes[n as usize].depth)
            .collect();
        assert_eq!(depths, vec![0, 1, 1, 2, 2, 3]);
    }
}

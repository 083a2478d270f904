//! Output sets aggregated along failure chains
//!
//! Every trie node gets a contiguous range into one shared pool. Nodes that
//! complete no pattern of their own reuse their failure node's range, so the
//! pool only grows at nodes that complete a pattern.
//!
//! A range is ascending by pattern index, which is the order overlapping
//! search reports in. Each range also records its preferred entry: the
//! longest pattern, which is the node's own pattern when it completes one,
//! lowest index first among equals.

use crate::failure::{FailureLinks, DEAD};
use crate::trie::Trie;
use dacmatch_match_kind::MatchKind;

/// One reported pattern: its index and its length in symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Output {
    pub(crate) pattern: u32,
    pub(crate) len: u32,
}

/// Range of the pool holding a node's output set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct OutputRange {
    pub(crate) pos: u32,
    pub(crate) len: u32,
    /// Pool index of the preferred entry; meaningless when `len == 0`
    pub(crate) longest: u32,
}

/// Output sets of every trie node
#[derive(Debug, Clone, Default)]
pub(crate) struct OutputTable {
    pub(crate) pool: Vec<Output>,
    pub(crate) ranges: Vec<OutputRange>,
}

impl OutputTable {
    #[cfg(test)]
    pub(crate) fn preferred_of(&self, node: u32) -> Option<u32> {
        let r = self.ranges[node as usize];
        (r.len > 0).then(|| self.pool[r.longest as usize].pattern)
    }

    #[cfg(test)]
    pub(crate) fn patterns_of(&self, node: u32) -> Vec<u32> {
        let r = self.ranges[node as usize];
        self.pool[r.pos as usize..(r.pos + r.len) as usize]
            .iter()
            .map(|o| o.pattern)
            .collect()
    }
}

/// Aggregate output sets in BFS order.
///
/// Standard mode: `out(v) = own(v) ∪ out(fail(v))`, ascending by pattern
/// index. Leftmost modes: a node with its own patterns reports only those
/// (its failure is dead), other nodes report their failure node's set.
pub(crate) fn aggregate_outputs(
    trie: &Trie,
    links: &FailureLinks,
    match_kind: MatchKind,
) -> OutputTable {
    let mut table = OutputTable {
        pool: Vec::new(),
        ranges: vec![OutputRange::default(); trie.len()],
    };

    for &node in &links.bfs_order {
        let own = &trie.nodes[node as usize].outputs;
        let fail = links.of(node);
        let inherited = if fail == DEAD || fail == node {
            OutputRange::default()
        } else {
            table.ranges[fail as usize]
        };

        if own.is_empty() {
            table.ranges[node as usize] = inherited;
            continue;
        }

        let pos = table.pool.len() as u32;
        let own_outputs = own.iter().map(|&pattern| Output {
            pattern,
            len: trie.pattern_lens[pattern as usize],
        });

        if match_kind.is_leftmost() || inherited.len == 0 {
            table.pool.extend(own_outputs);
        } else {
            let start = inherited.pos as usize;
            let end = start + inherited.len as usize;
            let merged = merge_ascending(own_outputs, &table.pool[start..end]);
            table.pool.extend(merged);
        }

        table.ranges[node as usize] = OutputRange {
            pos,
            len: table.pool.len() as u32 - pos,
            longest: pos + longest_entry(&table.pool[pos as usize..]),
        };
    }

    table
}

/// Offset of the longest entry, the first one among equals.
fn longest_entry(outputs: &[Output]) -> u32 {
    let mut best = 0;
    for (i, out) in outputs.iter().enumerate() {
        if out.len > outputs[best].len {
            best = i;
        }
    }
    best as u32
}

/// Merge two output lists that are each ascending by pattern index.
fn merge_ascending(own: impl Iterator<Item = Output>, inherited: &[Output]) -> Vec<Output> {
    let mut merged = Vec::with_capacity(inherited.len() + 1);
    let mut inherited = inherited.iter().copied().peekable();
    for out in own {
        while let Some(prev) = inherited.next_if(|prev| prev.pattern < out.pattern) {
            merged.push(prev);
        }
        merged.push(out);
    }
    merged.extend(inherited);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::build_failure_links;
    use crate::trie::ROOT;

    fn build(patterns: &[&str], kind: MatchKind) -> (Trie, OutputTable) {
        let mut trie = Trie::new(kind);
        for p in patterns {
            trie.add(p).unwrap();
        }
        let links = build_failure_links(&trie, kind);
        let table = aggregate_outputs(&trie, &links, kind);
        (trie, table)
    }

    fn node(trie: &Trie, path: &str) -> u32 {
        path.chars()
            .fold(ROOT, |n, ch| trie.child(n, ch).unwrap())
    }

    #[test]
    fn test_suffix_outputs_ascending_by_index() {
        let (trie, table) = build(&["abc", "c", "bc"], MatchKind::Standard);
        assert_eq!(table.patterns_of(node(&trie, "abc")), vec![0, 1, 2]);
        assert_eq!(table.patterns_of(node(&trie, "bc")), vec![1, 2]);
        assert_eq!(table.patterns_of(node(&trie, "ab")), Vec::<u32>::new());
        assert!(table.patterns_of(ROOT).is_empty());
    }

    #[test]
    fn test_inherited_only_nodes_share_ranges() {
        let (trie, table) = build(&["b", "abx"], MatchKind::Standard);
        let ab = node(&trie, "ab");
        let b = node(&trie, "b");
        assert_eq!(table.ranges[ab as usize], table.ranges[b as usize]);
        assert_eq!(table.pool.len(), 2);
    }

    #[test]
    fn test_lengths_recorded_in_symbols() {
        let (trie, table) = build(&["テス", "ス"], MatchKind::Standard);
        let r = table.ranges[node(&trie, "テス") as usize];
        let lens: Vec<u32> = table.pool[r.pos as usize..(r.pos + r.len) as usize]
            .iter()
            .map(|o| o.len)
            .collect();
        assert_eq!(lens, vec![2, 1]);
    }

    #[test]
    fn test_leftmost_outputs_stop_at_own_patterns() {
        let (trie, table) = build(&["abc", "bc", "c"], MatchKind::LeftmostLongest);
        assert_eq!(table.patterns_of(node(&trie, "abc")), vec![0]);
        assert_eq!(table.patterns_of(node(&trie, "bc")), vec![1]);
        // "ab" has no pattern and its failure node "b" has none either
        assert!(table.patterns_of(node(&trie, "ab")).is_empty());
    }

    #[test]
    fn test_own_pattern_is_preferred_over_suffixes() {
        let (trie, table) = build(&["c", "abc"], MatchKind::Standard);
        let abc = node(&trie, "abc");
        assert_eq!(table.patterns_of(abc), vec![0, 1]);
        assert_eq!(table.preferred_of(abc), Some(1));

        // inherited-only nodes prefer their failure node's own pattern
        let (trie, table) = build(&["a", "bc", "c", "xbcy"], MatchKind::Standard);
        assert_eq!(table.preferred_of(node(&trie, "xbc")), Some(1));
        assert_eq!(table.preferred_of(node(&trie, "xb")), None);
    }

    #[test]
    fn test_duplicates_prefer_lowest_index() {
        let (trie, table) = build(&["b", "ab", "ab"], MatchKind::Standard);
        assert_eq!(table.patterns_of(node(&trie, "ab")), vec![0, 1, 2]);
        assert_eq!(table.preferred_of(node(&trie, "ab")), Some(1));
    }
}

//! Failure links over the trie
//!
//! Computed breadth-first so that a node's parent, and every node on the
//! parent's failure chain, already has its link when the node is reached.
//! The walk up the chain for each node is amortized linear over the whole
//! trie.

use crate::trie::{Trie, ROOT};
use dacmatch_match_kind::MatchKind;

/// Failure target that ends a leftmost candidate. Not a trie node.
pub(crate) const DEAD: u32 = u32::MAX;

/// Failure link per trie node, plus the BFS order used to compute them
#[derive(Debug, Clone)]
pub(crate) struct FailureLinks {
    pub(crate) fail: Vec<u32>,
    pub(crate) bfs_order: Vec<u32>,
}

impl FailureLinks {
    pub(crate) fn of(&self, node: u32) -> u32 {
        self.fail[node as usize]
    }
}

/// Compute the failure link of every trie node.
///
/// In leftmost modes a node that completes a pattern fails to [`DEAD`]: once
/// a candidate is complete, falling back to a shorter suffix would start a
/// match further right, which never beats the candidate. The same holds for
/// every node below it, whose chains pass through it.
pub(crate) fn build_failure_links(trie: &Trie, match_kind: MatchKind) -> FailureLinks {
    let leftmost = match_kind.is_leftmost();
    let bfs_order = trie.bfs_order();
    let mut fail = vec![ROOT; trie.len()];

    for &node in &bfs_order {
        for (&ch, &child) in &trie.nodes[node as usize].children {
            if leftmost && trie.nodes[child as usize].is_match() {
                fail[child as usize] = DEAD;
                continue;
            }
            if node == ROOT {
                fail[child as usize] = ROOT;
                continue;
            }

            let mut state = fail[node as usize];
            fail[child as usize] = loop {
                if state == DEAD {
                    break DEAD;
                }
                if let Some(target) = trie.child(state, ch) {
                    break target;
                }
                if state == ROOT {
                    break ROOT;
                }
                state = fail[state as usize];
            };
        }
    }

    FailureLinks { fail, bfs_order }
}

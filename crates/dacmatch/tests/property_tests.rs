//! Properties of the facade's search results over random pattern sets.

use dacmatch::{Automaton, MatchKind};
use proptest::prelude::*;

const KINDS: [MatchKind; 3] = [
    MatchKind::Standard,
    MatchKind::LeftmostLongest,
    MatchKind::LeftmostFirst,
];

fn spell(hay: &[char], start: usize, end: usize) -> String {
    hay[start..end].iter().collect()
}

proptest! {
    #[test]
    fn find_reports_ordered_disjoint_spans(
        patterns in prop::collection::vec("[xyお]{1,3}", 1..6),
        hay in "[xyzお]{0,30}",
    ) {
        let hay_chars: Vec<char> = hay.chars().collect();
        for kind in KINDS {
            let ac = Automaton::with_match_kind(patterns.clone(), kind).unwrap();
            let mut prev_end = 0;
            for (start, end, idx) in ac.find(&hay) {
                prop_assert!(start >= prev_end);
                prop_assert!(start < end && end <= hay_chars.len());
                prop_assert_eq!(spell(&hay_chars, start, end), patterns[idx].clone());
                prev_end = end;
            }
            let strings = ac.find_as_strings(&hay);
            prop_assert_eq!(strings.len(), ac.find(&hay).len());
        }
    }

    #[test]
    fn overlapping_contains_every_other_result(
        patterns in prop::collection::vec("[xyお]{1,3}", 1..6),
        hay in "[xyzお]{0,30}",
    ) {
        let hay_chars: Vec<char> = hay.chars().collect();
        let ac = Automaton::new(patterns.clone()).unwrap();
        let all = ac.find_overlapping(&hay).unwrap();

        for &(start, end, idx) in &all {
            prop_assert_eq!(spell(&hay_chars, start, end), patterns[idx].clone());
        }
        prop_assert!(all.windows(2).all(|w| (w[0].1, w[0].2) < (w[1].1, w[1].2)));

        for m in ac.find(&hay) {
            prop_assert!(all.contains(&m));
        }
        let no_suffix = ac.find_overlapping_no_suffix(&hay).unwrap();
        for m in &no_suffix {
            prop_assert!(all.contains(m));
            // Nothing longer ends at the same position.
            prop_assert!(all
                .iter()
                .filter(|o| o.1 == m.1)
                .all(|o| o.1 - o.0 <= m.1 - m.0));
        }
    }

    #[test]
    fn leftmost_kinds_reject_overlapping(
        patterns in prop::collection::vec("[xyお]{1,3}", 1..6),
    ) {
        for kind in [MatchKind::LeftmostLongest, MatchKind::LeftmostFirst] {
            let ac = Automaton::with_match_kind(patterns.clone(), kind).unwrap();
            prop_assert!(ac.find_overlapping("xy").is_err());
            prop_assert!(ac.find_overlapping_no_suffix("xy").is_err());
        }
    }
}

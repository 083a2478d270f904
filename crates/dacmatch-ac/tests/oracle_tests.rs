//! Equivalence tests between the automaton and a naive scan over every
//! start and end position.

use dacmatch_ac::{DoubleArrayAhoCorasick, MatchKind};
use proptest::prelude::*;

type Triple = (usize, usize, usize);

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn matches_at(hay: &[char], pattern: &[char], start: usize) -> bool {
    hay.len() >= start + pattern.len() && hay[start..start + pattern.len()] == *pattern
}

fn naive_overlapping(patterns: &[Vec<char>], hay: &[char]) -> Vec<Triple> {
    let mut out = Vec::new();
    for end in 1..=hay.len() {
        for (idx, p) in patterns.iter().enumerate() {
            if p.len() <= end && matches_at(hay, p, end - p.len()) {
                out.push((end - p.len(), end, idx));
            }
        }
    }
    out
}

fn naive_no_suffix(patterns: &[Vec<char>], hay: &[char]) -> Vec<Triple> {
    let mut out: Vec<Triple> = Vec::new();
    for m in naive_overlapping(patterns, hay) {
        match out.last_mut() {
            Some(last) if last.1 == m.1 => {
                if m.1 - m.0 > last.1 - last.0 {
                    *last = m;
                }
            }
            _ => out.push(m),
        }
    }
    out
}

/// At the first end position where a pattern starting at or after the
/// restart point completes, the longest such pattern (lowest index on ties).
fn naive_standard(patterns: &[Vec<char>], hay: &[char]) -> Vec<Triple> {
    let mut out = Vec::new();
    let mut restart = 0;
    for end in 1..=hay.len() {
        let mut best: Option<(usize, usize)> = None;
        for (idx, p) in patterns.iter().enumerate() {
            let fits = p.len() <= end && end - p.len() >= restart;
            let longer = best.map_or(true, |(_, len)| p.len() > len);
            if fits && longer && matches_at(hay, p, end - p.len()) {
                best = Some((idx, p.len()));
            }
        }
        if let Some((idx, len)) = best {
            out.push((end - len, end, idx));
            restart = end;
        }
    }
    out
}

fn naive_leftmost(patterns: &[Vec<char>], hay: &[char], kind: MatchKind) -> Vec<Triple> {
    let mut out = Vec::new();
    let mut start = 0;
    while start < hay.len() {
        let mut best: Option<(usize, usize)> = None;
        for (idx, p) in patterns.iter().enumerate() {
            if !matches_at(hay, p, start) {
                continue;
            }
            best = match best {
                None => Some((idx, p.len())),
                Some((_, len)) if kind == MatchKind::LeftmostLongest && p.len() > len => {
                    Some((idx, p.len()))
                }
                keep => keep,
            };
        }
        match best {
            Some((idx, len)) => {
                out.push((start, start + len, idx));
                start += len;
            }
            None => start += 1,
        }
    }
    out
}

fn build(patterns: &[String], kind: MatchKind) -> DoubleArrayAhoCorasick {
    DoubleArrayAhoCorasick::builder()
        .match_kind(kind)
        .verify(true)
        .build(patterns)
        .unwrap()
}

fn find(pma: &DoubleArrayAhoCorasick, hay: &str) -> Vec<Triple> {
    pma.find_iter(hay).map(Into::into).collect()
}

#[test]
fn test_naive_standard_prefers_longest() {
    let ps = vec![chars("c"), chars("abc")];
    assert_eq!(naive_standard(&ps, &chars("abc")), vec![(0, 3, 1)]);
    let pma = build(&["c".to_string(), "abc".to_string()], MatchKind::Standard);
    assert_eq!(find(&pma, "abc"), vec![(0, 3, 1)]);
}

proptest! {
    #[test]
    fn standard_matches_naive(
        patterns in prop::collection::vec("[abテ]{1,4}", 0..8),
        hay in "[abcテ]{0,40}",
    ) {
        let pma = build(&patterns, MatchKind::Standard);
        let ps: Vec<Vec<char>> = patterns.iter().map(|p| chars(p)).collect();
        prop_assert_eq!(find(&pma, &hay), naive_standard(&ps, &chars(&hay)));
    }

    #[test]
    fn overlapping_matches_naive(
        patterns in prop::collection::vec("[abテ]{1,4}", 0..8),
        hay in "[abcテ]{0,40}",
    ) {
        let pma = build(&patterns, MatchKind::Standard);
        let ps: Vec<Vec<char>> = patterns.iter().map(|p| chars(p)).collect();
        let found: Vec<Triple> = pma.find_overlapping_iter(&hay).unwrap().map(Into::into).collect();
        prop_assert_eq!(found, naive_overlapping(&ps, &chars(&hay)));
    }

    #[test]
    fn no_suffix_matches_naive(
        patterns in prop::collection::vec("[abテ]{1,4}", 0..8),
        hay in "[abcテ]{0,40}",
    ) {
        let pma = build(&patterns, MatchKind::Standard);
        let ps: Vec<Vec<char>> = patterns.iter().map(|p| chars(p)).collect();
        let found: Vec<Triple> = pma
            .find_overlapping_no_suffix_iter(&hay)
            .unwrap()
            .map(Into::into)
            .collect();
        prop_assert_eq!(found, naive_no_suffix(&ps, &chars(&hay)));
    }

    #[test]
    fn leftmost_longest_matches_naive(
        patterns in prop::collection::vec("[abテ]{1,4}", 0..8),
        hay in "[abcテ]{0,40}",
    ) {
        let pma = build(&patterns, MatchKind::LeftmostLongest);
        let ps: Vec<Vec<char>> = patterns.iter().map(|p| chars(p)).collect();
        prop_assert_eq!(
            find(&pma, &hay),
            naive_leftmost(&ps, &chars(&hay), MatchKind::LeftmostLongest)
        );
    }

    #[test]
    fn leftmost_first_matches_naive(
        patterns in prop::collection::vec("[abテ]{1,4}", 0..8),
        hay in "[abcテ]{0,40}",
    ) {
        let pma = build(&patterns, MatchKind::LeftmostFirst);
        let ps: Vec<Vec<char>> = patterns.iter().map(|p| chars(p)).collect();
        prop_assert_eq!(
            find(&pma, &hay),
            naive_leftmost(&ps, &chars(&hay), MatchKind::LeftmostFirst)
        );
    }

    #[test]
    fn reported_spans_spell_their_patterns(
        patterns in prop::collection::vec("[abテ]{1,4}", 1..8),
        hay in "[abcテ]{0,40}",
    ) {
        let hay_chars = chars(&hay);
        for kind in [MatchKind::Standard, MatchKind::LeftmostLongest, MatchKind::LeftmostFirst] {
            let pma = build(&patterns, kind);
            let mut prev_end = 0;
            for m in pma.find_iter(&hay) {
                let spelled: String = hay_chars[m.start()..m.end()].iter().collect();
                prop_assert_eq!(&spelled, &patterns[m.pattern()]);
                prop_assert!(m.start() >= prev_end);
                prev_end = m.end();
            }
        }
    }
}

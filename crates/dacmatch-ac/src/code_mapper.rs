//! Mapping from symbols to dense transition codes
//!
//! Symbols are numbered by descending frequency in the pattern set so that
//! the most common labels get the smallest codes. Small codes keep the
//! children of busy states close to their base, which packs the double array
//! tighter.

use std::collections::HashMap;

const CODE_INVALID: u32 = u32::MAX;

/// Dense symbol-to-code table
#[derive(Debug, Clone, Default)]
pub(crate) struct CodeMapper {
    table: Vec<u32>,
    alphabet_size: u32,
}

impl CodeMapper {
    /// Build the mapping from every pattern in the set.
    pub(crate) fn new<'a, I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut freqs: HashMap<char, usize> = HashMap::new();
        for pattern in patterns {
            for ch in pattern.chars() {
                *freqs.entry(ch).or_insert(0) += 1;
            }
        }

        let mut by_freq: Vec<(char, usize)> = freqs.into_iter().collect();
        // Ties broken by symbol so the layout is reproducible.
        by_freq.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let table_len = by_freq
            .iter()
            .map(|&(ch, _)| ch as usize + 1)
            .max()
            .unwrap_or(0);
        let mut table = vec![CODE_INVALID; table_len];
        for (code, &(ch, _)) in by_freq.iter().enumerate() {
            table[ch as usize] = code as u32;
        }

        Self {
            table,
            alphabet_size: by_freq.len() as u32,
        }
    }

    /// Code of `ch`, or `None` if no pattern contains it.
    #[inline(always)]
    pub(crate) fn get(&self, ch: char) -> Option<u32> {
        self.table
            .get(ch as usize)
            .copied()
            .filter(|&code| code != CODE_INVALID)
    }

    pub(crate) fn alphabet_size(&self) -> u32 {
        self.alphabet_size
    }

    pub(crate) fn heap_bytes(&self) -> usize {
        self.table.len() * std::mem::size_of::<u32>()
    }
}

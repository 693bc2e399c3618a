//! The index collaborator (§6): exact-match search over the reference.
//!
//! The real index (FM-index construction, suffix array sampling, the full
//! `[0, 2G)` forward+reverse concatenation) is an external collaborator per
//! spec §1 — the core only needs `BWT_Search`. [`InMemoryIndex`] is a small,
//! faithful reference implementation built the way
//! `FofanovLab-mtsv_tools/src/index.rs` builds its own FM-index (suffix
//! array + BWT via the `bio` crate), so the pipeline can be exercised
//! end-to-end without a production-scale collaborator.

use bio::alphabets;
use bio::data_structures::bwt::{bwt, less, Less, Occ, BWT};
use bio::data_structures::fmindex::{BackwardSearchResult, FMIndex, FMIndexable};
use bio::data_structures::suffix_array::{suffix_array, RawSuffixArray, SuffixArray};

/// The result of a single `BWT_Search` call: the longest exact match
/// starting at `from`, and every occurrence of it in the reference.
#[derive(Clone, Debug, Default)]
pub struct SearchHit {
    pub len: usize,
    pub locations: Vec<i64>,
}

/// Exact-match search over an encoded reference, owned entirely by the
/// index collaborator (spec §6).
pub trait BwtIndex: Send + Sync {
    /// Longest exact match of `encoded[from..]` against the reference,
    /// trying match lengths from `rlen - from` down to 1.
    fn search(&self, encoded: &[u8], from: usize, rlen: usize) -> SearchHit;
}

const ALPHABET: &[u8] = b"ACGTN$";

fn decode(code: u8) -> u8 {
    match code {
        0 => b'A',
        1 => b'C',
        2 => b'G',
        3 => b'T',
        _ => b'N',
    }
}

/// A small in-memory reference index over the `[0, 2G)` concatenation of a
/// forward sequence and its reverse complement, backed by an FM-index.
pub struct InMemoryIndex {
    bwt: BWT,
    less: Less,
    occ: Occ,
    sa: RawSuffixArray,
    genome_size: i64,
}

impl InMemoryIndex {
    /// Build the index from a forward-strand reference sequence (raw bases,
    /// not yet encoded). The logical genome is `forward ++ revcomp(forward)`.
    pub fn new(forward: &[u8]) -> Self {
        let mut concat: Vec<u8> = forward.to_vec();
        concat.extend(bio::alphabets::dna::revcomp(forward));
        for b in &mut concat {
            *b = decode(crate::util::encode_base(*b));
        }
        concat.push(b'$');

        let alphabet = alphabets::Alphabet::new(ALPHABET);
        let sa = suffix_array(&concat);
        let bwt_vec = bwt(&concat, &sa);
        let less_vec = less(&bwt_vec, &alphabet);
        let occ = Occ::new(&bwt_vec, 8, &alphabet);

        InMemoryIndex {
            bwt: bwt_vec,
            less: less_vec,
            occ,
            sa,
            genome_size: forward.len() as i64,
        }
    }

    pub fn genome_size(&self) -> i64 {
        self.genome_size
    }

    pub fn two_genome_size(&self) -> i64 {
        self.genome_size * 2
    }
}

impl BwtIndex for InMemoryIndex {
    fn search(&self, encoded: &[u8], from: usize, rlen: usize) -> SearchHit {
        let fmindex = FMIndex::new(&self.bwt, &self.less, &self.occ);

        let mut best_len = 0usize;
        let mut best_locations = Vec::new();

        // Try progressively shorter suffixes starting at `from` until a hit
        // (or nothing) is found; this is the "longest exact match" contract.
        for len in (1..=(rlen - from)).rev() {
            let query: Vec<u8> = encoded[from..from + len].iter().map(|&c| decode(c)).collect();
            let result = fmindex.backward_search(query.iter());
            let interval = match result {
                BackwardSearchResult::Complete(iv) => Some(iv),
                BackwardSearchResult::Partial(iv, l) if l == len => Some(iv),
                _ => None,
            };
            if let Some(iv) = interval {
                if iv.upper > iv.lower {
                    best_len = len;
                    best_locations = iv
                        .occ(&self.sa)
                        .into_iter()
                        .map(|p| p as i64)
                        .collect();
                    break;
                }
            }
        }

        SearchHit { len: best_len, locations: best_locations }
    }
}

/// A hand-stubbed index for unit tests: returns whatever was registered for
/// a given `from` offset, independent of the actual bases at that position.
#[cfg(test)]
pub struct MockIndex {
    stubs: std::collections::HashMap<usize, SearchHit>,
}

#[cfg(test)]
impl MockIndex {
    pub fn new() -> Self {
        MockIndex { stubs: std::collections::HashMap::new() }
    }

    pub fn stub(&mut self, from: usize, hit: SearchHit) {
        self.stubs.insert(from, hit);
    }
}

#[cfg(test)]
impl BwtIndex for MockIndex {
    fn search(&self, _encoded: &[u8], from: usize, _rlen: usize) -> SearchHit {
        self.stubs.get(&from).cloned().unwrap_or_default()
    }
}

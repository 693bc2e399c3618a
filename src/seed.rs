//! Encoded reads, seeds, and the seed finder (§3, §4.1).

use crate::bwt::BwtIndex;
use crate::config::MIN_SEED_LENGTH;

/// A read encoded into the crate's internal base alphabet (`A=0,C=1,G=2,T=3, other>=4`).
pub type EncodedRead = Vec<u8>;

/// A maximal exact match between a read substring and the reference.
///
/// `pos_diff = g_pos - r_pos` is always strictly positive; seeds that would
/// compute a non-positive offset are discarded at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seed {
    pub r_pos: usize,
    pub g_pos: i64,
    pub len: usize,
    pub pos_diff: i64,
    /// True for an exact match from the seed finder, false once downstream
    /// refinement has filled a gap in (tracked for completeness; the core
    /// never sets this itself).
    pub simple: bool,
}

impl Seed {
    fn new(r_pos: usize, g_pos: i64, len: usize) -> Option<Self> {
        let pos_diff = g_pos - r_pos as i64;
        if pos_diff <= 0 {
            return None;
        }
        Some(Seed { r_pos, g_pos, len, pos_diff, simple: true })
    }
}

/// An ordered list of seeds for one read, sorted by `(pos_diff, r_pos)`,
/// terminated by a sentinel with `pos_diff = two_genome_size` and zero length.
pub type SeedList = Vec<Seed>;

/// Enumerate maximal exact matches of `encoded` against the reference index.
///
/// Walks a cursor from `0` to `rlen - MIN_SEED_LENGTH`, querying the index at
/// each non-ambiguous position for the longest exact match, then advancing
/// past the match. Produces an empty list (not an error) when the read is
/// too short or has no hits; a terminal sentinel is always appended.
pub fn find_seeds(encoded: &EncodedRead, index: &dyn BwtIndex, two_genome_size: i64) -> SeedList {
    let rlen = encoded.len();
    let mut seeds = Vec::new();

    if rlen < MIN_SEED_LENGTH {
        seeds.push(sentinel(two_genome_size));
        return seeds;
    }

    let stop_pos = rlen - MIN_SEED_LENGTH;
    let mut pos = 0usize;
    while pos < stop_pos {
        if encoded[pos] >= 4 {
            pos += 1;
            continue;
        }

        let hit = index.search(encoded, pos, rlen);
        if hit.locations.is_empty() {
            pos += hit.len.max(1) + 1;
            continue;
        }

        for &loc in &hit.locations {
            if let Some(seed) = Seed::new(pos, loc, hit.len) {
                seeds.push(seed);
            }
        }
        pos += hit.len + 1;
    }

    seeds.sort_by(|a, b| a.pos_diff.cmp(&b.pos_diff).then(a.r_pos.cmp(&b.r_pos)));
    seeds.push(sentinel(two_genome_size));
    seeds
}

fn sentinel(two_genome_size: i64) -> Seed {
    Seed { r_pos: 0, g_pos: two_genome_size, len: 0, pos_diff: two_genome_size, simple: true }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bwt::{MockIndex, SearchHit};

    #[test]
    fn empty_read_shorter_than_min_seed_length() {
        let index = MockIndex::new();
        let encoded: EncodedRead = vec![0; MIN_SEED_LENGTH - 1];
        let seeds = find_seeds(&encoded, &index, 2_000_000);
        // only the sentinel
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].pos_diff, 2_000_000);
    }

    #[test]
    fn discards_non_positive_pos_diff() {
        let mut index = MockIndex::new();
        // a hit whose g_pos equals r_pos would have pos_diff == 0 and must be dropped
        index.stub(0, SearchHit { len: MIN_SEED_LENGTH, locations: vec![0, 50] });
        let encoded: EncodedRead = vec![0; MIN_SEED_LENGTH + 5];
        let seeds = find_seeds(&encoded, &index, 2_000_000);
        // only the g_pos=50 hit (pos_diff=50) and the sentinel should survive
        let real: Vec<_> = seeds.iter().filter(|s| s.pos_diff != 2_000_000).collect();
        assert_eq!(real.len(), 1);
        assert_eq!(real[0].pos_diff, 50);
    }

    #[test]
    fn sorted_by_pos_diff_then_r_pos() {
        let mut index = MockIndex::new();
        index.stub(0, SearchHit { len: MIN_SEED_LENGTH, locations: vec![500_000, 500_010] });
        index.stub(MIN_SEED_LENGTH + 1, SearchHit { len: MIN_SEED_LENGTH, locations: vec![500_000] });
        let encoded: EncodedRead = vec![0; MIN_SEED_LENGTH * 2 + 5];
        let seeds = find_seeds(&encoded, &index, 2_000_000);
        let real: Vec<_> = seeds.iter().filter(|s| s.pos_diff != 2_000_000).collect();
        for w in real.windows(2) {
            assert!(
                w[0].pos_diff < w[1].pos_diff
                    || (w[0].pos_diff == w[1].pos_diff && w[0].r_pos <= w[1].r_pos)
            );
        }
    }

    #[test]
    fn invariant_r_pos_plus_len_within_rlen() {
        let mut index = MockIndex::new();
        index.stub(0, SearchHit { len: 20, locations: vec![1_000_000] });
        let encoded: EncodedRead = vec![0; 50];
        let seeds = find_seeds(&encoded, &index, 2_000_000);
        for s in seeds.iter().filter(|s| s.len > 0) {
            assert!(s.r_pos + s.len <= encoded.len());
            assert!(s.pos_diff > 0);
        }
    }
}

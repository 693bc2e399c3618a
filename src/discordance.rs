//! Discordant-pair classification (§4.5): inversion, translocation, concordant.
//!
//! Operates entirely in the linearized `[0, 2G)` coordinate space; `gPos < G`
//! means forward strand. Does not reproduce the source's asymmetric
//! inversion `push_back` (one branch's emission sitting outside its guarded
//! block) — both discordant-site lists only ever grow from this module's
//! single, symmetric emission path.

use crate::candidate::AlnCan;
use crate::config::{MAX_INVERSION_SIZE, MIN_INVERSION_SIZE, MIN_TRANSLOCATION_SIZE};

/// The relative geometry of a finalized mate pair, in global coordinates.
/// `g_pos = -1` on either side means "no alignment on that mate".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinatePair {
    pub g_pos1: i64,
    pub g_pos2: i64,
    pub dist: i64,
}

/// A single discordant observation, projected back to forward-strand
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiscordantSite {
    pub g_pos: i64,
    pub dist: i64,
}

pub enum Classification {
    /// Accumulate `dist` into the insert-size estimator.
    Concordant { dist: i64 },
    Inversion(DiscordantSite),
    Translocation(DiscordantSite, DiscordantSite),
    /// Nothing to record: `dist == 0` or either side unmapped.
    NotRecorded,
}

/// Build the CoordinatePair for a finalized mate pair (§4.5, first
/// paragraph). `mate1`/`mate2` are the two candidate lists after pairing
/// and masking.
pub fn resolve_coordinate_pair(mate1: &[AlnCan], mate2: &[AlnCan]) -> CoordinatePair {
    for a in mate1.iter() {
        if a.score > 0 {
            if let Some(j) = a.paired_idx {
                if mate2[j].score > 0 {
                    let g1 = a.anchor_pos();
                    let g2 = mate2[j].anchor_pos();
                    return CoordinatePair { g_pos1: g1, g_pos2: g2, dist: (g2 - g1).abs() };
                }
            }
        }
    }

    let live1: Vec<i64> = mate1.iter().filter(|c| c.score > 0).map(|c| c.anchor_pos()).collect();
    let live2: Vec<i64> = mate2.iter().filter(|c| c.score > 0).map(|c| c.anchor_pos()).collect();

    if live1.len() == 1 && live2.len() == 1 {
        let g1 = live1[0];
        let g2 = live2[0];
        return CoordinatePair { g_pos1: g1, g_pos2: g2, dist: (g2 - g1).abs() };
    }

    if live1.is_empty() && !live2.is_empty() {
        let g2 = live2[0];
        return CoordinatePair { g_pos1: -1, g_pos2: g2, dist: g2 };
    }
    if live2.is_empty() && !live1.is_empty() {
        let g1 = live1[0];
        return CoordinatePair { g_pos1: g1, g_pos2: -1, dist: g1 };
    }

    CoordinatePair { g_pos1: -1, g_pos2: -1, dist: 0 }
}

/// Classify a resolved CoordinatePair against the genome size `g`.
pub fn classify(pair: CoordinatePair, g: i64) -> Classification {
    if pair.dist == 0 || pair.g_pos1 < 0 || pair.g_pos2 < 0 {
        return Classification::NotRecorded;
    }

    let forward1 = pair.g_pos1 < g;
    let forward2 = pair.g_pos2 < g;

    if forward1 != forward2 {
        let d = (2 * g - pair.g_pos1 - pair.g_pos2).abs();
        if d > MIN_INVERSION_SIZE && d < MAX_INVERSION_SIZE {
            let site_pos = if forward1 { pair.g_pos1 } else { pair.g_pos2 };
            return Classification::Inversion(DiscordantSite { g_pos: site_pos, dist: d });
        }
        // opposite-strand is a terminal branch: out-of-range d is dropped,
        // not folded into the concordant distance estimator.
        return Classification::NotRecorded;
    }

    if pair.dist > MIN_TRANSLOCATION_SIZE {
        let (site1, site2) = if forward1 {
            (pair.g_pos1, pair.g_pos2)
        } else {
            (2 * g - pair.g_pos1, 2 * g - pair.g_pos2)
        };
        return Classification::Translocation(
            DiscordantSite { g_pos: site1, dist: pair.dist },
            DiscordantSite { g_pos: site2, dist: pair.dist },
        );
    }

    Classification::Concordant { dist: pair.dist }
}

/// A sorted sequence of discordant sites, merged in place as new
/// pre-sorted batches arrive (§5: two-way in-place merge under a lock).
#[derive(Default)]
pub struct SiteList(Vec<DiscordantSite>);

impl SiteList {
    pub fn new() -> Self {
        SiteList(Vec::new())
    }

    pub fn as_slice(&self) -> &[DiscordantSite] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge an already-sorted batch into the existing sorted sequence.
    pub fn merge_batch(&mut self, mut batch: Vec<DiscordantSite>) {
        batch.sort();
        let mut merged = Vec::with_capacity(self.0.len() + batch.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < batch.len() {
            if self.0[i] <= batch[j] {
                merged.push(self.0[i]);
                i += 1;
            } else {
                merged.push(batch[j]);
                j += 1;
            }
        }
        merged.extend_from_slice(&self.0[i..]);
        merged.extend_from_slice(&batch[j..]);
        self.0 = merged;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::seed::Seed;

    fn can(g_pos: i64, score: i64) -> AlnCan {
        AlnCan { seeds: vec![Seed { r_pos: 0, g_pos, len: score.max(0) as usize, pos_diff: g_pos, simple: true }], score, paired_idx: None }
    }

    const G: i64 = 1_000_000;

    #[test]
    fn concordant_pair_contributes_distance_only() {
        let pair = CoordinatePair { g_pos1: 500_000, g_pos2: 500_380, dist: 380 };
        match classify(pair, G) {
            Classification::Concordant { dist } => assert_eq!(dist, 380),
            _ => panic!("expected concordant"),
        }
    }

    #[test]
    fn inversion_below_min_size_is_not_recorded() {
        // mate1 forward 500_000, mate2 reverse at 2G - 500_500 = 1_499_500
        let pair = CoordinatePair { g_pos1: 500_000, g_pos2: 2 * G - 500_500, dist: 0 };
        // dist isn't used for the inversion branch's own math, only forward1 != forward2 matters;
        // set dist nonzero so the dist==0 short-circuit above doesn't fire first
        let pair = CoordinatePair { dist: (pair.g_pos2 - pair.g_pos1).abs(), ..pair };
        match classify(pair, G) {
            Classification::NotRecorded => {}
            other => panic!("expected not recorded, got {:?}", discriminant_name(&other)),
        }
    }

    #[test]
    fn inversion_within_range_is_emitted_at_forward_position() {
        let g_pos2 = 2 * G - 498_000; // d = |2G - 500_000 - g_pos2| = 2000
        let pair = CoordinatePair { g_pos1: 500_000, g_pos2, dist: (g_pos2 - 500_000).abs() };
        match classify(pair, G) {
            Classification::Inversion(site) => {
                assert_eq!(site.g_pos, 500_000);
                assert_eq!(site.dist, 2_000);
            }
            _ => panic!("expected inversion"),
        }
    }

    #[test]
    fn translocation_same_strand_emits_both_sites() {
        use pretty_assertions::assert_eq;
        let pair = CoordinatePair { g_pos1: 100_000, g_pos2: 900_000, dist: 800_000 };
        match classify(pair, G) {
            Classification::Translocation(s1, s2) => {
                assert_eq!(s1, DiscordantSite { g_pos: 100_000, dist: 800_000 });
                assert_eq!(s2, DiscordantSite { g_pos: 900_000, dist: 800_000 });
            }
            _ => panic!("expected translocation"),
        }
    }

    #[test]
    fn one_end_anchored_pair_is_not_recorded() {
        let pair = resolve_coordinate_pair(&[], &[can(750_000, 10)]);
        assert_eq!(pair.g_pos1, -1);
        assert_eq!(pair.g_pos2, 750_000);
        match classify(pair, G) {
            Classification::NotRecorded => {}
            _ => panic!("expected not recorded"),
        }
    }

    #[test]
    fn committed_pair_resolves_from_paired_idx() {
        let mut m1 = vec![can(500_000, 50)];
        let m2 = vec![can(500_380, 50)];
        m1[0].paired_idx = Some(0);
        let pair = resolve_coordinate_pair(&m1, &m2);
        assert_eq!(pair.g_pos1, 500_000);
        assert_eq!(pair.g_pos2, 500_380);
        assert_eq!(pair.dist, 380);
    }

    #[test]
    fn site_list_merge_preserves_sort_order() {
        let mut sites = SiteList::new();
        sites.merge_batch(vec![DiscordantSite { g_pos: 100, dist: 1 }, DiscordantSite { g_pos: 300, dist: 1 }]);
        sites.merge_batch(vec![DiscordantSite { g_pos: 200, dist: 1 }]);
        let positions: Vec<i64> = sites.as_slice().iter().map(|s| s.g_pos).collect();
        assert_eq!(positions, vec![100, 200, 300]);
    }

    fn discriminant_name(c: &Classification) -> &'static str {
        match c {
            Classification::Concordant { .. } => "Concordant",
            Classification::Inversion(_) => "Inversion",
            Classification::Translocation(_, _) => "Translocation",
            Classification::NotRecorded => "NotRecorded",
        }
    }
}

//! Alignment candidates and the scorer/deduplicator (§3, §4.3).

use crate::seed::Seed;

/// A cluster of seeds sharing a near-identical `pos_diff`; spec's `AlnCan`.
///
/// `score` is the sum of seed lengths that survived clustering; a `score`
/// of zero marks the candidate as suppressed without physically removing
/// it (§4.3). `paired_idx` back-references a candidate in the mate's list
/// and is kept symmetric by the resolver (§4.4).
#[derive(Clone, Debug)]
pub struct AlnCan {
    pub seeds: Vec<Seed>,
    pub score: i64,
    pub paired_idx: Option<usize>,
}

impl AlnCan {
    pub fn new(seeds: Vec<Seed>) -> Self {
        let score = seeds.iter().map(|s| s.len as i64).sum();
        AlnCan { seeds, score, paired_idx: None }
    }

    /// Global position used to represent this candidate's anchor (the first
    /// seed's `g_pos`), per §4.5.
    pub fn anchor_pos(&self) -> i64 {
        self.seeds[0].g_pos
    }

    pub fn is_live(&self) -> bool {
        self.score > 0
    }
}

/// Zero out the score of every candidate strictly below the best score in
/// the list (§4.3). A no-op when fewer than two candidates are present.
/// Idempotent: a second call leaves the list unchanged, since every
/// survivor already equals the max and every suppressed one stays at zero.
pub fn deduplicate(candidates: &mut [AlnCan]) {
    if candidates.len() <= 1 {
        return;
    }
    let max_score = candidates.iter().map(|c| c.score).max().unwrap_or(0);
    for c in candidates.iter_mut() {
        if c.score < max_score {
            c.score = 0;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn can(score: i64) -> AlnCan {
        AlnCan {
            seeds: vec![Seed { r_pos: 0, g_pos: 100, len: score.max(0) as usize, pos_diff: 100, simple: true }],
            score,
            paired_idx: None,
        }
    }

    #[test]
    fn dedup_zeros_dominated_candidates() {
        let mut cans = vec![can(80), can(80), can(40)];
        deduplicate(&mut cans);
        assert_eq!(cans[0].score, 80);
        assert_eq!(cans[1].score, 80);
        assert_eq!(cans[2].score, 0);
    }

    #[test]
    fn dedup_is_idempotent() {
        let mut cans = vec![can(80), can(80), can(40)];
        deduplicate(&mut cans);
        let after_first: Vec<i64> = cans.iter().map(|c| c.score).collect();
        deduplicate(&mut cans);
        let after_second: Vec<i64> = cans.iter().map(|c| c.score).collect();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn dedup_single_candidate_is_noop() {
        let mut cans = vec![can(0)];
        deduplicate(&mut cans);
        assert_eq!(cans[0].score, 0);
    }

    #[quickcheck_macros::quickcheck]
    fn dedup_is_idempotent_for_any_score_list(scores: Vec<i64>) -> bool {
        let mut cans: Vec<AlnCan> = scores.into_iter().map(|s| can(s.max(0))).collect();
        if cans.is_empty() {
            return true;
        }
        deduplicate(&mut cans);
        let once: Vec<i64> = cans.iter().map(|c| c.score).collect();
        deduplicate(&mut cans);
        let twice: Vec<i64> = cans.iter().map(|c| c.score).collect();
        once == twice
    }
}

//! The paired-end resolver (§4.4): pairing, rescue, and masking.

use crate::candidate::{deduplicate, AlnCan};
use crate::config::DEDUP_BEFORE_PAIR_THRESHOLD;
use crate::refine::AlignmentRefiner;
use crate::seed::EncodedRead;

/// `EstiDistance = round(1.5 * avgDist)`, the pairing window (§6). A stale
/// `avg_dist` hint only widens or narrows the window, never breaks
/// correctness.
pub fn esti_distance(avg_dist: i64) -> i64 {
    ((avg_dist as f64) * 1.5).round() as i64
}

/// A single committed pairing: `mate1[i]` paired with `mate2[j]` at combined
/// score `p_score`.
#[derive(Clone, Copy, Debug)]
struct Pairing {
    i: usize,
    j: usize,
    p_score: i64,
}

/// Resolve a mate pair's candidate lists in place (§4.4 steps 1-4).
///
/// Applies the §4.3 deduplicator first when the candidate-list product
/// exceeds [`DEDUP_BEFORE_PAIR_THRESHOLD`], scans for the best eligible
/// partner per mate-1 candidate, then commits every pairing whose combined
/// score equals the scan's global maximum. Returns the number of committed
/// pairs.
pub fn resolve_pair(mate1: &mut [AlnCan], mate2: &mut [AlnCan], esti_distance: i64) -> usize {
    if mate1.len() * mate2.len() > DEDUP_BEFORE_PAIR_THRESHOLD {
        deduplicate(mate1);
        deduplicate(mate2);
    }

    let mut candidates: Vec<Pairing> = Vec::new();
    let mut max_score = i64::MIN;

    for (i, a) in mate1.iter().enumerate() {
        if a.score <= 0 {
            continue;
        }
        let mut best: Option<(usize, i64)> = None;
        for (j, b) in mate2.iter().enumerate() {
            if b.score <= 0 {
                continue;
            }
            if b.seeds[0].pos_diff < a.seeds[0].pos_diff {
                continue;
            }
            if b.seeds[0].pos_diff - a.seeds[0].pos_diff >= esti_distance {
                continue;
            }
            match best {
                Some((_, best_score)) if b.score <= best_score => {}
                _ => best = Some((j, b.score)),
            }
        }
        if let Some((j, b_score)) = best {
            let p_score = a.score + b_score;
            if p_score > max_score {
                max_score = p_score;
            }
            candidates.push(Pairing { i, j, p_score });
        }
    }

    let mut committed = 0usize;
    for p in &candidates {
        if p.p_score == max_score {
            mate1[p.i].paired_idx = Some(p.j);
            mate2[p.j].paired_idx = Some(p.i);
            committed += 1;
        }
    }
    committed
}

/// Zero the score of every candidate not part of the best committed pairing
/// (§4.4 "Masking"). The best combined score is computed from mate-1's
/// paired candidates only, then applied symmetrically to both sides,
/// matching the source's one-sided `max_score` computation.
pub fn mask_unpaired(mate1: &mut [AlnCan], mate2: &mut [AlnCan]) {
    let best = mate1
        .iter()
        .filter_map(|a| a.paired_idx.map(|j| a.score + mate2[j].score))
        .max();

    let Some(best) = best else { return };

    for a in mate1.iter_mut() {
        let keep = match a.paired_idx {
            Some(j) if a.score + mate2[j].score >= best => true,
            _ => false,
        };
        if !keep {
            a.score = 0;
        }
    }
    for b in mate2.iter_mut() {
        let keep = match b.paired_idx {
            Some(i) if mate1[i].score + b.score >= best => true,
            _ => false,
        };
        if !keep {
            b.score = 0;
        }
    }
}

/// Full §4.4 procedure: pair, rescue on failure, then mask (or fall back to
/// independent deduplication when nothing ever committed).
pub fn pair_and_mask(
    mate1: &mut Vec<AlnCan>,
    mate2: &mut Vec<AlnCan>,
    read1: &EncodedRead,
    read2: &EncodedRead,
    esti_distance_val: i64,
    refiner: &dyn AlignmentRefiner,
) -> usize {
    let mut committed = resolve_pair(mate1, mate2, esti_distance_val);

    if committed == 0 {
        if let Some(anchor) = mate1.iter().find(|c| c.score > 0) {
            if let Some(rescued) = refiner.rescue(read2, anchor) {
                mate2.push(rescued);
            }
        } else if let Some(anchor) = mate2.iter().find(|c| c.score > 0) {
            if let Some(rescued) = refiner.rescue(read1, anchor) {
                mate1.push(rescued);
            }
        }
        committed = resolve_pair(mate1, mate2, esti_distance_val);
    }

    if committed > 0 {
        mask_unpaired(mate1, mate2);
    } else {
        deduplicate(mate1);
        deduplicate(mate2);
    }

    committed
}

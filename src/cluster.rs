//! The seed cluster builder (§4.2): sweeps a sorted `SeedList` into `AlnCan`s.

use itertools::Itertools;

use crate::candidate::AlnCan;
use crate::coordinate::CoordinateSystem;
use crate::seed::SeedList;

/// Group a sorted, sentinel-terminated `SeedList` into alignment candidates.
///
/// A window `[head, j)` closes when the next seed's `g_pos` runs past the
/// current chromosome's alignment boundary, or its `pos_diff` has drifted
/// from the previous seed's by more than `max_pos_diff`. A closed window is
/// only emitted once its score clears a threshold that starts at `rlen/4`
/// and is raised to `max(threshold, score/2)` after every accepted cluster.
/// Windows whose score reaches `rlen` are collapsed to their single
/// dominant `pos_diff` sub-run (tandem-repeat defense, §4.2).
pub fn build_clusters(
    seeds: &SeedList,
    rlen: usize,
    coords: &dyn CoordinateSystem,
    max_pos_diff: i64,
) -> Vec<AlnCan> {
    let mut clusters = Vec::new();
    if seeds.len() < 2 {
        return clusters;
    }

    let mut head = 0usize;
    let mut boundary = coords.alignment_boundary(seeds[0].g_pos);
    let mut score: i64 = seeds[0].len as i64;
    let mut score_thr = (rlen / 4) as i64;

    let num = seeds.len();
    let mut i = 0usize;
    let mut j = 1usize;
    while j < num {
        let broke_boundary = seeds[j].g_pos > boundary;
        let drifted = (seeds[j].pos_diff - seeds[i].pos_diff).abs() > max_pos_diff;

        if broke_boundary || drifted {
            if score > score_thr {
                if score_thr < score / 2 {
                    score_thr = score / 2;
                }
                if score >= rlen as i64 {
                    clusters.push(closest_fragment_pairs(head, j, seeds));
                } else {
                    clusters.push(AlnCan::new(seeds[head..j].to_vec()));
                }
            }
            head = j;
            boundary = coords.alignment_boundary(seeds[j].g_pos);
            score = seeds[j].len as i64;
        } else {
            score += seeds[j].len as i64;
        }
        i += 1;
        j += 1;
    }

    clusters
}

/// The "closest fragment pairs" refinement: within `[beg, end)`, find the
/// single contiguous run of equal `pos_diff` seeds with the largest summed
/// length, breaking ties in favor of the first occurrence.
fn closest_fragment_pairs(beg: usize, end: usize, seeds: &SeedList) -> AlnCan {
    let window = &seeds[beg..end];
    let grouped = window.iter().group_by(|s| s.pos_diff);

    let best_run = grouped
        .into_iter()
        .map(|(_, run)| run.cloned().collect::<Vec<_>>())
        .fold(None::<Vec<_>>, |best, run| {
            let run_score: i64 = run.iter().map(|s| s.len as i64).sum();
            match &best {
                Some(b) if b.iter().map(|s| s.len as i64).sum::<i64>() >= run_score => best,
                _ => Some(run),
            }
        })
        .unwrap_or_default();

    AlnCan::new(best_run)
}

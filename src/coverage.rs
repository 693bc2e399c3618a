//! The coverage sweep (§4.7): a strided parallel pass over the per-base profile.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Per-base hit counts, shared across the sweep's worker threads. Index `i`
/// is hit count at genome position `i`; profile construction and aligned-base
/// accumulation remain the variant-signal collector's concern (external to
/// the core), this only reduces what's already there.
pub struct Profile {
    counts: Vec<AtomicU32>,
}

impl Profile {
    pub fn new(len: usize) -> Self {
        Profile { counts: (0..len).map(|_| AtomicU32::new(0)).collect() }
    }

    pub fn record_hit(&self, pos: usize) {
        self.counts[pos].fetch_add(1, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }
}

/// Aligned-base/coverage totals accumulated under `ProfileLock`.
#[derive(Default, Clone, Copy, Debug)]
pub struct CoverageTotals {
    pub aligned_bases: u64,
    pub coverage_sum: u64,
}

/// `(duplicates, positionsWithHit)` reported after a sweep (§4.7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DuplicationReport {
    pub duplicates: u64,
    pub positions_with_hit: u64,
}

/// Run the coverage sweep: `num_workers` threads each visit a strided slice
/// of `profile` (`t, t+T, t+2T, ...`), summing hits into thread-local
/// totals before reducing into the shared aggregate under `profile_lock`.
pub fn sweep(profile: &Profile, num_workers: usize) -> (CoverageTotals, DuplicationReport) {
    let num_workers = num_workers.max(1);
    let aggregate = Arc::new(Mutex::new((CoverageTotals::default(), 0u64, 0u64)));

    std::thread::scope(|scope| {
        for t in 0..num_workers {
            let aggregate = Arc::clone(&aggregate);
            scope.spawn(move || {
                let mut local = CoverageTotals::default();
                let mut local_positions_with_hit = 0u64;
                let mut local_hits = 0u64;

                let mut pos = t;
                while pos < profile.len() {
                    let hits = profile.counts[pos].load(Ordering::Relaxed) as u64;
                    if hits > 0 {
                        local.aligned_bases += 1;
                        local.coverage_sum += hits;
                        local_positions_with_hit += 1;
                        local_hits += hits;
                    }
                    pos += num_workers;
                }

                let mut guard = aggregate.lock().unwrap();
                guard.0.aligned_bases += local.aligned_bases;
                guard.0.coverage_sum += local.coverage_sum;
                guard.1 += local_positions_with_hit;
                guard.2 += local_hits;
            });
        }
    });

    let guard = aggregate.lock().unwrap();
    let (totals, positions_with_hit, total_hits) = *guard;
    let report = DuplicationReport {
        duplicates: total_hits.saturating_sub(positions_with_hit),
        positions_with_hit,
    };
    (totals, report)
}

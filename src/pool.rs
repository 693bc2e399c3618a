//! The worker pool and shared aggregates (§4.6): a fixed-size thread pool
//! driving §4.1-4.5 over chunked input, behind three disjoint locks, mirroring
//! the original's `pthread_mutex_t LibraryLock/OutputLock/ProfileLock` model.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use log::{debug, info};
use serde::Serialize;

use crate::bwt::BwtIndex;
use crate::candidate::AlnCan;
use crate::cluster::build_clusters;
use crate::config::MIN_PAIRED_FOR_ESTIMATE;
use crate::coordinate::CoordinateSystem;
use crate::discordance::{classify, resolve_coordinate_pair, Classification, SiteList};
use crate::io::reads::{PairedReadSource, RawRead};
use crate::io::sink::AlignmentSink;
use crate::pairing::{esti_distance, pair_and_mask};
use crate::refine::AlignmentRefiner;
use crate::util::{encode_seq, reverse_complement};

/// Global monotonic counters, updated only while `output_lock` is held.
#[derive(Default, Debug, Clone, Copy, Serialize)]
pub struct Counters {
    pub total_reads: u64,
    pub mapped_reads: u64,
    pub paired_reads: u64,
    pub summed_distance: i64,
    pub summed_read_length: u64,
    pub total_paired_count: i64,
}

/// The shared aggregate state a worker pool runs against: three lock
/// domains plus the lock-free `avg_dist` hint (§5, §9).
pub struct Aggregates {
    library: Mutex<PairedReadSource>,
    output: Mutex<OutputState>,
    profile: Mutex<ProfileState>,
    avg_dist: AtomicI64,
}

struct OutputState {
    counters: Counters,
    sink: Box<dyn AlignmentSink + Send>,
}

#[derive(Default)]
struct ProfileState {
    inversions: SiteList,
    translocations: SiteList,
}

impl Aggregates {
    pub fn new(source: PairedReadSource, sink: Box<dyn AlignmentSink + Send>) -> Self {
        Aggregates {
            library: Mutex::new(source),
            output: Mutex::new(OutputState { counters: Counters::default(), sink }),
            profile: Mutex::new(ProfileState::default()),
            avg_dist: AtomicI64::new(0),
        }
    }

    pub fn avg_dist(&self) -> i64 {
        self.avg_dist.load(Ordering::Relaxed)
    }

    pub fn counters(&self) -> Counters {
        self.output.lock().unwrap().counters
    }

    pub fn inversion_count(&self) -> usize {
        self.profile.lock().unwrap().inversions.len()
    }

    pub fn translocation_count(&self) -> usize {
        self.profile.lock().unwrap().translocations.len()
    }
}

/// Per-worker scratch plus references to the read-only external
/// collaborators. One instance is built per spawned thread; none of its
/// contents escape into shared state except through `Aggregates`.
pub struct Worker<'a> {
    index: &'a dyn BwtIndex,
    coords: &'a dyn CoordinateSystem,
    refiner: &'a dyn AlignmentRefiner,
}

impl<'a> Worker<'a> {
    pub fn new(index: &'a dyn BwtIndex, coords: &'a dyn CoordinateSystem, refiner: &'a dyn AlignmentRefiner) -> Self {
        Worker { index, coords, refiner }
    }

    /// Run this worker's loop to completion: repeatedly pull a chunk under
    /// `library_lock`, process every read/pair, then flush under
    /// `output_lock` (and `profile_lock` when collecting variant signal).
    pub fn run(&self, aggregates: &Aggregates, variant_signal: bool) {
        loop {
            let chunk = {
                let mut source = aggregates.library.lock().unwrap();
                source.next_chunk()
            };
            if chunk.is_empty() {
                return;
            }
            debug!("worker pulled a chunk of {} read(s)", chunk.len());

            let mut batch_records = Vec::with_capacity(chunk.len());
            let mut batch_inversions = Vec::new();
            let mut batch_translocations = Vec::new();
            let mut local = Counters::default();

            let avg_dist = aggregates.avg_dist();
            let esti = esti_distance(avg_dist).max(crate::config::MAX_PAIRED_DISTANCE);

            for (read1, read2) in chunk {
                self.process_read_pair(
                    &read1,
                    read2.as_ref(),
                    esti,
                    &mut local,
                    &mut batch_records,
                    &mut batch_inversions,
                    &mut batch_translocations,
                );
            }

            {
                let mut out = aggregates.output.lock().unwrap();
                out.counters.total_reads += local.total_reads;
                out.counters.mapped_reads += local.mapped_reads;
                out.counters.paired_reads += local.paired_reads;
                out.counters.summed_distance += local.summed_distance;
                out.counters.summed_read_length += local.summed_read_length;
                out.counters.total_paired_count += local.total_paired_count;
                for text in &batch_records {
                    let _ = out.sink.write_record(text);
                }
                if out.counters.total_paired_count > MIN_PAIRED_FOR_ESTIMATE {
                    let new_avg = (out.counters.summed_distance as f64
                        / out.counters.total_paired_count as f64)
                        .round() as i64;
                    aggregates.avg_dist.store(new_avg, Ordering::Relaxed);
                }
            }

            if variant_signal && (!batch_inversions.is_empty() || !batch_translocations.is_empty()) {
                let mut profile = aggregates.profile.lock().unwrap();
                profile.inversions.merge_batch(batch_inversions);
                profile.translocations.merge_batch(batch_translocations);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn process_read_pair(
        &self,
        read1: &RawRead,
        read2: Option<&RawRead>,
        esti: i64,
        local: &mut Counters,
        batch_records: &mut Vec<String>,
        batch_inversions: &mut Vec<crate::discordance::DiscordantSite>,
        batch_translocations: &mut Vec<crate::discordance::DiscordantSite>,
    ) {
        let two_genome = self.coords.two_genome_size();
        let genome_size = self.coords.genome_size();

        let enc1 = encode_seq(&read1.seq);
        let mut cands1 = self.seed_and_cluster(&enc1, two_genome);
        local.total_reads += 1;
        local.summed_read_length += read1.rlen() as u64;

        let Some(read2) = read2 else {
            // single-end reads dedup unconditionally; pairing's own conditional
            // dedup (§4.4 step 1) only applies when there's a mate to pair against.
            crate::candidate::deduplicate(&mut cands1);
            let mapped = self.finalize_single(&mut cands1, &enc1, batch_records, &read1.header);
            if mapped {
                local.mapped_reads += 1;
            }
            return;
        };

        // mate 2 is reverse-complemented before seeding (§4.6 step 2, §9).
        let rc2 = reverse_complement(&read2.seq);
        let enc2 = encode_seq(&rc2);
        let mut cands2 = self.seed_and_cluster(&enc2, two_genome);

        local.total_reads += 1;
        local.summed_read_length += read2.rlen() as u64;

        let committed = pair_and_mask(&mut cands1, &mut cands2, &enc1, &enc2, esti, self.refiner);

        if committed > 0 {
            local.paired_reads += 1;
        }

        let mapped1 = self.finalize_single(&mut cands1, &enc1, batch_records, &read1.header);
        let mapped2 = self.finalize_single(&mut cands2, &enc2, batch_records, &read2.header);
        if mapped1 {
            local.mapped_reads += 1;
        }
        if mapped2 {
            local.mapped_reads += 1;
        }

        let pair = resolve_coordinate_pair(&cands1, &cands2);
        match classify(pair, genome_size) {
            Classification::Concordant { dist } => {
                local.summed_distance += dist;
                local.total_paired_count += 1;
            }
            Classification::Inversion(site) => batch_inversions.push(site),
            Classification::Translocation(s1, s2) => {
                batch_translocations.push(s1);
                batch_translocations.push(s2);
            }
            Classification::NotRecorded => {}
        }
    }

    /// Seeds and clusters a read without deduplicating: the §4.3 dedup step
    /// is conditional on context (single-end vs paired, §4.4 step 1), so
    /// callers apply it themselves once they know which applies.
    fn seed_and_cluster(&self, encoded: &crate::seed::EncodedRead, two_genome: i64) -> Vec<AlnCan> {
        let seeds = crate::seed::find_seeds(encoded, self.index, two_genome);
        build_clusters(&seeds, encoded.len(), self.coords, crate::config::MAX_POS_DIFF)
    }

    /// Refine the best surviving candidate into an output record, if any.
    /// Returns whether the read is counted as mapped (§4.6 step 3).
    fn finalize_single(
        &self,
        cands: &mut [AlnCan],
        read: &crate::seed::EncodedRead,
        batch_records: &mut Vec<String>,
        header: &str,
    ) -> bool {
        let Some(best) = cands.iter().filter(|c| c.score > 0).max_by_key(|c| c.score) else {
            return false;
        };
        match self.refiner.refine(read, best) {
            Some(refined) => {
                batch_records.push(format!("{}\t{}\t{}", header, refined.anchor_pos(), refined.score));
                true
            }
            None => false,
        }
    }
}

/// Spawn `num_workers` threads that each run [`Worker::run`] to completion,
/// then join all of them. Blocks until the input is exhausted (§5: no
/// cancellation/timeouts).
pub fn run_pool(
    aggregates: &Aggregates,
    index: &dyn BwtIndex,
    coords: &dyn CoordinateSystem,
    refiner: &dyn AlignmentRefiner,
    num_workers: usize,
    variant_signal: bool,
) {
    info!("starting worker pool with {} thread(s)", num_workers);
    std::thread::scope(|scope| {
        for _ in 0..num_workers.max(1) {
            let worker = Worker::new(index, coords, refiner);
            scope.spawn(move || worker.run(aggregates, variant_signal));
        }
    });
    info!("worker pool finished: {:?}", aggregates.counters());
}

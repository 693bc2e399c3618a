//! Numeric constants and the command-line configuration surface.

use clap::Parser;

/// Minimum seed length the seed finder will try to extend from a cursor.
pub const MIN_SEED_LENGTH: usize = 17;

/// Maximum spread in `posDiff` within a single seed cluster window.
pub const MAX_POS_DIFF: i64 = 15;

/// Lower/upper bounds for emitting an inversion candidate (exclusive).
pub const MIN_INVERSION_SIZE: i64 = 1_000;
pub const MAX_INVERSION_SIZE: i64 = 10_000_000;

/// Lower bound (exclusive) for emitting a translocation candidate.
pub const MIN_TRANSLOCATION_SIZE: i64 = 1_000;

/// Initial pairing-window bound, used before the insert-size estimator warms up.
pub const MAX_PAIRED_DISTANCE: i64 = 2_000;

/// Number of paired observations required before the estimator is trusted.
pub const MIN_PAIRED_FOR_ESTIMATE: i64 = 1_000;

/// Reads (or mate pairs) pulled per chunk by a worker.
pub const READ_CHUNK_SIZE: usize = 4_096;

/// Candidate-list product above which dedup runs before pairing (§4.4 step 1).
pub const DEDUP_BEFORE_PAIR_THRESHOLD: usize = 100;

/// Command-line configuration for the aligner binary.
///
/// Mirrors the configuration surface in spec §6: single/paired end, text vs
/// binary output, variant-signal collection, thread count, library file
/// lists, output path, log path.
#[derive(Parser, Debug, Clone)]
#[command(name = "readmap", version, about = "Short-read aligner core")]
pub struct Config {
    /// Reference genome FASTA used to build the in-memory index and
    /// coordinate system when no external collaborator is configured.
    #[arg(long = "reference", required = true)]
    pub reference: String,

    /// Mate 1 (or single-end) library file(s). FASTA/FASTQ, optionally gzipped.
    #[arg(long = "reads1", required = true, num_args = 1..)]
    pub reads1: Vec<String>,

    /// Mate 2 library file(s), for paired-end input. Must match `--reads1` in count.
    #[arg(long = "reads2", num_args = 1..)]
    pub reads2: Vec<String>,

    /// Number of worker threads.
    #[arg(short = 't', long = "threads", default_value_t = num_cpus::get())]
    pub threads: usize,

    /// Emit binary-style output records instead of textual ones.
    #[arg(long = "binary")]
    pub binary_output: bool,

    /// Collect per-base coverage/duplication signal for a downstream variant caller.
    #[arg(long = "variant-signal")]
    pub variant_signal: bool,

    /// Output path, or `-` for standard output.
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output_path: String,

    /// Log file path; stderr is always used in addition.
    #[arg(long = "log")]
    pub log_path: Option<String>,

    /// Enable debug-level logging.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Config {
    /// True when mate-2 libraries were supplied and line up with mate-1.
    pub fn is_paired(&self) -> bool {
        !self.reads2.is_empty()
    }

    pub fn validate(&self) -> crate::error::AlignResult<()> {
        if self.threads == 0 {
            return Err(crate::error::AlignError::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }
        if !self.reads2.is_empty() && self.reads2.len() != self.reads1.len() {
            return Err(crate::error::AlignError::InvalidConfig(format!(
                "reads1 has {} librar{} but reads2 has {}",
                self.reads1.len(),
                if self.reads1.len() == 1 { "y" } else { "ies" },
                self.reads2.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_mismatched_library_counts() {
        let cfg = Config {
            reference: "ref.fa".into(),
            reads1: vec!["a.fq".into(), "b.fq".into()],
            reads2: vec!["a2.fq".into()],
            threads: 4,
            binary_output: false,
            variant_signal: false,
            output_path: "-".into(),
            log_path: None,
            verbose: false,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_threads() {
        let cfg = Config {
            reference: "ref.fa".into(),
            reads1: vec!["a.fq".into()],
            reads2: vec![],
            threads: 0,
            binary_output: false,
            variant_signal: false,
            output_path: "-".into(),
            log_path: None,
            verbose: false,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn single_end_is_not_paired() {
        let cfg = Config {
            reference: "ref.fa".into(),
            reads1: vec!["a.fq".into()],
            reads2: vec![],
            threads: 1,
            binary_output: false,
            variant_signal: false,
            output_path: "-".into(),
            log_path: None,
            verbose: false,
        };
        assert!(!cfg.is_paired());
    }
}

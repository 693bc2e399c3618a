//! `readmap`: a short-read aligner core — seeding, clustering, paired-end
//! resolution, rescue, discordant-pair classification, a concurrent worker
//! pool, and a post-mapping coverage sweep.
//!
//! FM-index construction, coordinate translation, base-level alignment
//! refinement, read ingestion, and output sinks are external collaborators
//! (see [`bwt`], [`coordinate`], [`refine`], [`io`]); each ships a minimal
//! concrete implementation so the crate runs end to end on its own.

pub mod bwt;
pub mod candidate;
pub mod cluster;
pub mod config;
pub mod coordinate;
pub mod coverage;
pub mod discordance;
pub mod error;
pub mod io;
pub mod pairing;
pub mod pool;
pub mod refine;
pub mod seed;
pub mod util;

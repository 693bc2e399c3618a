//! CLI entry point: wires configuration, read source, worker pool, and
//! output sink together, in the style of
//! `FofanovLab-mtsv_tools/src/bin/mtsv-binner.rs`.

use std::process::exit;

use clap::Parser;
use log::{debug, error, info, LevelFilter};

use readmap::bwt::InMemoryIndex;
use readmap::config::Config;
use readmap::coordinate::FlatCoordinateSystem;
use readmap::io::reads::PairedReadSource;
use readmap::io::sink::{AlignmentSink, ChromInfo, TextSink};
use readmap::pool::{run_pool, Aggregates};
use readmap::refine::NoopRefiner;
use readmap::util::init_logging;

fn main() {
    let config = Config::parse();

    init_logging(if config.verbose { LevelFilter::Debug } else { LevelFilter::Info });

    if let Err(e) = config.validate() {
        error!("{e}");
        exit(1);
    }

    if let Err(e) = run(&config) {
        error!("{e}");
        exit(1);
    }
}

fn run(config: &Config) -> readmap::error::AlignResult<()> {
    info!("loading reference from {}", config.reference);
    let ref_file = std::fs::File::open(&config.reference)?;
    let mut reader = bio::io::fasta::Reader::new(ref_file).records();
    let mut forward = Vec::new();
    let mut chrom_lengths = Vec::new();
    let mut chrom_names = Vec::new();
    while let Some(record) = reader.next() {
        let record = record.map_err(|e| readmap::error::AlignError::InvalidConfig(e.to_string()))?;
        chrom_names.push(record.id().to_string());
        chrom_lengths.push(record.seq().len() as i64);
        forward.extend_from_slice(record.seq());
    }

    let index = InMemoryIndex::new(&forward);
    let coords = FlatCoordinateSystem::new(&chrom_lengths);
    let refiner = NoopRefiner;

    let chroms: Vec<ChromInfo> = chrom_names
        .iter()
        .zip(chrom_lengths.iter())
        .map(|(name, &length)| ChromInfo { name: name.clone(), length })
        .collect();

    let mut failures = 0usize;
    for (lib_idx, path1) in config.reads1.iter().enumerate() {
        let path2 = config.reads2.get(lib_idx).map(|s| s.as_str());
        match PairedReadSource::open(path1, path2) {
            Ok(source) => {
                let mut sink = TextSink::open(&config.output_path)?;
                sink.write_header(&chroms)?;
                let sink_box: Box<dyn AlignmentSink + Send> = Box::new(sink);
                let aggregates = Aggregates::new(source, sink_box);

                run_pool(&aggregates, &index, &coords, &refiner, config.threads, config.variant_signal);

                let counters = aggregates.counters();
                info!(
                    "library {}: {} reads, {} mapped, {} paired",
                    path1, counters.total_reads, counters.mapped_reads, counters.paired_reads
                );
                match serde_json::to_string(&counters) {
                    Ok(json) => debug!("library {} summary: {}", path1, json),
                    Err(e) => error!("failed to serialize summary for {}: {}", path1, e),
                }
            }
            Err(e) => {
                error!("skipping library {}: {}", path1, e);
                failures += 1;
            }
        }
    }

    if failures == config.reads1.len() && !config.reads1.is_empty() {
        return Err(readmap::error::AlignError::MissingLibrary(config.reads1.join(", ")));
    }

    Ok(())
}

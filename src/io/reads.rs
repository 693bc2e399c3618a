//! Read ingestion (§2.12, §6 "Read source"): chunked FASTA/FASTQ reading
//! with gzip detection by the `.gz` extension suffix, adapted from
//! `FofanovLab-mtsv_tools/src/binner.rs::open_maybe_gz`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bio::io::{fasta, fastq};
use flate2::read::GzDecoder;

use crate::config::READ_CHUNK_SIZE;
use crate::error::{AlignError, AlignResult};

/// One read pulled from a library: header, sequence, and (for FASTQ) quality
/// scores. Corresponds to spec's `ReadRecord` before candidates/summary are
/// attached.
#[derive(Clone, Debug)]
pub struct RawRead {
    pub header: String,
    pub seq: Vec<u8>,
    pub qual: Option<Vec<u8>>,
}

impl RawRead {
    pub fn rlen(&self) -> usize {
        self.seq.len()
    }
}

fn is_gz(path: &str) -> bool {
    path.to_ascii_lowercase().ends_with(".gz")
}

fn open_maybe_gz(path: &str) -> AlignResult<Box<dyn Read + Send>> {
    let file = File::open(Path::new(path))?;
    if is_gz(path) {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

enum FormatReader {
    Fasta(fasta::Records<Box<dyn Read + Send>>),
    Fastq(fastq::Records<Box<dyn Read + Send>>),
}

/// Detects FASTA vs FASTQ by file extension and opens a chunked iterator
/// over one library file. Chunked reading of both mate files is driven one
/// level up by [`PairedReadSource`].
pub struct ReadSource {
    inner: FormatReader,
}

fn is_fastq(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".fastq")
        || lower.ends_with(".fq")
        || lower.ends_with(".fastq.gz")
        || lower.ends_with(".fq.gz")
}

impl ReadSource {
    pub fn open(path: &str) -> AlignResult<Self> {
        let raw = open_maybe_gz(path)?;
        let inner = if is_fastq(path) {
            FormatReader::Fastq(fastq::Reader::new(raw).records())
        } else {
            FormatReader::Fasta(fasta::Reader::new(raw).records())
        };
        Ok(ReadSource { inner })
    }

    fn next_record(&mut self) -> Option<AlignResult<RawRead>> {
        match &mut self.inner {
            FormatReader::Fasta(records) => records.next().map(|r| {
                let r = r.map_err(|e| AlignError::InvalidConfig(e.to_string()))?;
                Ok(RawRead { header: r.id().to_string(), seq: r.seq().to_vec(), qual: None })
            }),
            FormatReader::Fastq(records) => records.next().map(|r| {
                let r = r.map_err(|e| AlignError::InvalidConfig(e.to_string()))?;
                Ok(RawRead {
                    header: r.id().to_string(),
                    seq: r.seq().to_vec(),
                    qual: Some(r.qual().to_vec()),
                })
            }),
        }
    }

    /// Pull up to [`READ_CHUNK_SIZE`] reads. Returns fewer (or zero) at the
    /// end of the file; read errors drop the offending record and continue.
    pub fn next_chunk(&mut self) -> Vec<RawRead> {
        let mut chunk = Vec::with_capacity(READ_CHUNK_SIZE);
        while chunk.len() < READ_CHUNK_SIZE {
            match self.next_record() {
                Some(Ok(read)) => chunk.push(read),
                Some(Err(_)) => continue,
                None => break,
            }
        }
        chunk
    }
}

/// A paired-end read source over two mate-file libraries. Mates are kept
/// co-located one-for-one within a chunk; a library whose files fail to
/// open is skipped with a diagnostic, per §7.
pub struct PairedReadSource {
    mate1: ReadSource,
    mate2: Option<ReadSource>,
}

impl PairedReadSource {
    pub fn open(path1: &str, path2: Option<&str>) -> AlignResult<Self> {
        if let Some(p2) = path2 {
            if is_fastq(path1) != is_fastq(p2) {
                return Err(AlignError::LibraryMismatch {
                    mate1: path1.to_string(),
                    mate2: p2.to_string(),
                });
            }
        }

        let mate1 = ReadSource::open(path1)?;
        let mate2 = match path2 {
            Some(p) => Some(ReadSource::open(p)?),
            None => None,
        };
        Ok(PairedReadSource { mate1, mate2 })
    }

    pub fn is_paired(&self) -> bool {
        self.mate2.is_some()
    }

    /// Pull a chunk of `(mate1, mate2)` pairs. `mate2` is `None` for
    /// single-end input. Mismatched mate-file lengths truncate to the
    /// shorter side (an input-format mismatch is diagnosed by the caller).
    pub fn next_chunk(&mut self) -> Vec<(RawRead, Option<RawRead>)> {
        let chunk1 = self.mate1.next_chunk();
        match &mut self.mate2 {
            None => chunk1.into_iter().map(|r| (r, None)).collect(),
            Some(m2) => {
                let chunk2 = m2.next_chunk();
                chunk1.into_iter().zip(chunk2.into_iter().map(Some)).collect()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write as IoWrite;

    #[test]
    fn detects_fastq_extension() {
        assert!(is_fastq("reads.fastq"));
        assert!(is_fastq("reads.fq.gz"));
        assert!(!is_fastq("reads.fasta"));
    }

    #[test]
    fn detects_gz_extension() {
        assert!(is_gz("reads.fastq.gz"));
        assert!(!is_gz("reads.fastq"));
    }

    #[test]
    fn mismatched_mate_formats_are_rejected() {
        let mut f1 = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        writeln!(f1, ">r1\nACGT").unwrap();
        let mut f2 = tempfile::Builder::new().suffix(".fastq").tempfile().unwrap();
        writeln!(f2, "@r1\nACGT\n+\nIIII").unwrap();
        let path1 = f1.path().to_str().unwrap().to_string();
        let path2 = f2.path().to_str().unwrap().to_string();

        let err = PairedReadSource::open(&path1, Some(&path2)).unwrap_err();
        assert!(matches!(err, AlignError::LibraryMismatch { .. }));
    }

    #[test]
    fn reads_a_small_fasta_chunk() {
        let mut file = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        writeln!(file, ">r1\nACGTACGT\n>r2\nTTTTGGGG").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let mut source = ReadSource::open(&path).unwrap();
        let chunk = source.next_chunk();
        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk[0].header, "r1");
        assert_eq!(chunk[0].seq, b"ACGTACGT");
        assert!(chunk[0].qual.is_none());
    }

    #[test]
    fn single_end_source_reports_no_mate2() {
        let mut file = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        writeln!(file, ">r1\nACGT").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let mut source = PairedReadSource::open(&path, None).unwrap();
        assert!(!source.is_paired());
        let chunk = source.next_chunk();
        assert_eq!(chunk.len(), 1);
        assert!(chunk[0].1.is_none());
    }
}

//! The output sink (§2.13, §6): textual alignment records with SAM-style
//! headers (one `@PG` line, one `@SQ` line per chromosome), matching the
//! header conventions the original calls `OutputSamHeaders`.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};

use crate::error::AlignResult;

/// Name and length of a chromosome, used only to write the `@SQ` header.
#[derive(Clone, Debug)]
pub struct ChromInfo {
    pub name: String,
    pub length: i64,
}

/// Where finalized alignment records go. A binary sink (via a standard
/// alignment library) is out of scope for the core (§6); this textual sink
/// is the concrete implementation the CLI wires in by default.
pub trait AlignmentSink {
    fn write_header(&mut self, chroms: &[ChromInfo]) -> AlignResult<()>;
    fn write_record(&mut self, text: &str) -> AlignResult<()>;
    fn flush(&mut self) -> AlignResult<()>;
}

enum Dest {
    File(BufWriter<File>),
    Stdout(BufWriter<Stdout>),
}

impl Write for Dest {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Dest::File(w) => w.write(buf),
            Dest::Stdout(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Dest::File(w) => w.flush(),
            Dest::Stdout(w) => w.flush(),
        }
    }
}

/// Textual output sink; `"-"` means standard output.
pub struct TextSink {
    dest: Dest,
}

impl TextSink {
    pub fn open(path: &str) -> AlignResult<Self> {
        let dest = if path == "-" {
            Dest::Stdout(BufWriter::new(io::stdout()))
        } else {
            Dest::File(BufWriter::new(File::create(path)?))
        };
        Ok(TextSink { dest })
    }
}

impl AlignmentSink for TextSink {
    fn write_header(&mut self, chroms: &[ChromInfo]) -> AlignResult<()> {
        writeln!(
            self.dest,
            "@CO\trun started {}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S")
        )?;
        writeln!(self.dest, "@PG\tID:readmap\tPN:readmap\tVN:{}", env!("CARGO_PKG_VERSION"))?;
        for chrom in chroms {
            writeln!(self.dest, "@SQ\tSN:{}\tLN:{}", chrom.name, chrom.length)?;
        }
        Ok(())
    }

    fn write_record(&mut self, text: &str) -> AlignResult<()> {
        writeln!(self.dest, "{text}")?;
        Ok(())
    }

    fn flush(&mut self) -> AlignResult<()> {
        self.dest.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Read as IoRead;

    #[test]
    fn writes_pg_and_sq_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.sam");
        let mut sink = TextSink::open(path.to_str().unwrap()).unwrap();
        sink.write_header(&[ChromInfo { name: "chr1".into(), length: 1_000 }]).unwrap();
        sink.write_record("r1\t0\tchr1\t1\t60\t8M").unwrap();
        sink.flush().unwrap();

        let mut contents = String::new();
        File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
        assert!(contents.starts_with("@CO"));
        assert!(contents.contains("@PG"));
        assert!(contents.contains("@SQ\tSN:chr1\tLN:1000"));
        assert!(contents.contains("r1\t0\tchr1\t1\t60\t8M"));
    }
}

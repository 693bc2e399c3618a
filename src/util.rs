//! Small helpers shared across the crate: logging setup and base encoding.

use log::LevelFilter;

/// Initialize the global logger at the given verbosity.
///
/// Safe to call more than once; subsequent calls are no-ops (mirrors
/// `env_logger`'s own idempotence under `try_init`).
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

/// Encode a single base to its 2-bit code, `A=0,C=1,G=2,T=3`, anything else `4`.
#[inline]
pub fn encode_base(b: u8) -> u8 {
    match b {
        b'A' | b'a' => 0,
        b'C' | b'c' => 1,
        b'G' | b'g' => 2,
        b'T' | b't' => 3,
        _ => 4,
    }
}

/// Encode a raw sequence of bases into the crate's internal alphabet.
pub fn encode_seq(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(|&b| encode_base(b)).collect()
}

/// Reverse-complement a raw (unencoded) base sequence, used on mate 2 before seeding.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    bio::alphabets::dna::revcomp(seq)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encodes_known_bases() {
        assert_eq!(encode_base(b'A'), 0);
        assert_eq!(encode_base(b'C'), 1);
        assert_eq!(encode_base(b'G'), 2);
        assert_eq!(encode_base(b'T'), 3);
        assert_eq!(encode_base(b'N'), 4);
        assert_eq!(encode_base(b'n'), 4);
    }

    #[test]
    fn revcomp_roundtrips() {
        let seq = b"ACGGT";
        let rc = reverse_complement(seq);
        assert_eq!(rc, b"ACCGT");
        assert_eq!(reverse_complement(&rc), seq);
    }
}

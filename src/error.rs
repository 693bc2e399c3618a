//! Result and Error types used across the crate.

use std::fmt;
use std::io;

#[allow(missing_docs)]
pub type AlignResult<T> = Result<T, AlignError>;

#[allow(missing_docs)]
#[derive(Debug)]
pub enum AlignError {
    Io(io::Error),
    InvalidConfig(String),
    LibraryMismatch { mate1: String, mate2: String },
    MissingLibrary(String),
    Serialize(bincode::Error),
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AlignError::Io(e) => write!(f, "I/O problem: {}", e),
            AlignError::InvalidConfig(s) => write!(f, "invalid configuration: {}", s),
            AlignError::LibraryMismatch { mate1, mate2 } => {
                write!(f, "mate files have mismatched formats: {} vs {}", mate1, mate2)
            }
            AlignError::MissingLibrary(p) => write!(f, "unable to find library file {}", p),
            AlignError::Serialize(e) => write!(f, "unable to serialize/deserialize item: {}", e),
        }
    }
}

impl std::error::Error for AlignError {}

impl From<io::Error> for AlignError {
    fn from(e: io::Error) -> Self {
        AlignError::Io(e)
    }
}

impl From<bincode::Error> for AlignError {
    fn from(e: bincode::Error) -> Self {
        AlignError::Serialize(e)
    }
}

impl From<anyhow::Error> for AlignError {
    fn from(e: anyhow::Error) -> Self {
        AlignError::InvalidConfig(e.to_string())
    }
}

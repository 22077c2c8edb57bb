// Error types for ccf-core

use std::fmt;
use std::io;

/// All failure modes the CCF codec surfaces.
///
/// Every error is terminal for the enclosing call: a writer never emits
/// a partial file and a reader never returns a partial column.
#[derive(Debug)]
pub enum CcfError {
    /// The file's first bytes do not match the CCF magic number.
    BadMagic,
    /// The file's version byte is not one this build understands.
    UnsupportedVersion(u8),
    /// A read ran past the end of the file or buffer.
    TruncatedFile,
    /// `read_column` was asked for a name not present in the header directory.
    UnknownColumn(String),
    /// A header directory entry's dtype byte is outside {0,1,2}.
    UnknownType(u8),
    /// The compression codec rejected a compressed block.
    DecompressionError(String),
    /// Offsets were non-monotonic, UTF-8 decoding failed, or a string
    /// payload was shorter than its offsets array implies.
    InvalidEncoding(String),
    /// `uncompressed_size` exceeded the configured allocation ceiling.
    OversizeAllocation { declared: u64, limit: u64 },
    /// A schema entry is unsupported, duplicated, or an `INT32` value
    /// does not fit in 32 bits.
    SchemaMismatch(String),
    /// Any other I/O failure (permissions, disk full, etc).
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, CcfError>;

impl fmt::Display for CcfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CcfError::BadMagic => write!(f, "bad magic number: not a CCF file"),
            CcfError::UnsupportedVersion(v) => write!(f, "unsupported CCF version: {}", v),
            CcfError::TruncatedFile => write!(f, "truncated file: read past end of data"),
            CcfError::UnknownColumn(name) => write!(f, "no such column: {}", name),
            CcfError::UnknownType(code) => write!(f, "unknown column dtype code: {}", code),
            CcfError::DecompressionError(msg) => write!(f, "decompression failed: {}", msg),
            CcfError::InvalidEncoding(msg) => write!(f, "invalid column encoding: {}", msg),
            CcfError::OversizeAllocation { declared, limit } => write!(
                f,
                "uncompressed size {} exceeds allocation ceiling {}",
                declared, limit
            ),
            CcfError::SchemaMismatch(msg) => write!(f, "schema mismatch: {}", msg),
            CcfError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CcfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CcfError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CcfError {
    fn from(e: io::Error) -> Self {
        // A read hitting EOF mid-field means the file is shorter than the
        // header directory promised; surface that as TruncatedFile rather
        // than the raw io::ErrorKind::UnexpectedEof, matching §7.
        if e.kind() == io::ErrorKind::UnexpectedEof {
            CcfError::TruncatedFile
        } else {
            CcfError::Io(e)
        }
    }
}

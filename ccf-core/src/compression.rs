// Compression primitive for CCF column blocks: deflate-family, zlib-wrapped.

use crate::error::{CcfError, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Compress a column's uncompressed buffer with zlib-wrapped deflate.
///
/// The zlib wrapper (as opposed to raw deflate) is specified so the
/// on-disk bytes are decompressible by any conforming implementation
/// without out-of-band knowledge of dictionary or window size.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| CcfError::DecompressionError(format!("compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| CcfError::DecompressionError(format!("compression failed: {}", e)))
}

/// Decompress a column's compressed block, allocating exactly
/// `uncompressed_size` bytes up front (the caller is responsible for
/// checking `uncompressed_size` against an allocation ceiling before
/// calling this).
pub fn decompress(data: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::with_capacity(uncompressed_size);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| CcfError::DecompressionError(e.to_string()))?;
    Ok(out)
}

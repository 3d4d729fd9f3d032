use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::{Compressor, ID_ZLIB};
use crate::error::{Error, Result};

/// zlib-backed compressor (wire id 2).
pub struct ZlibCompressor;

impl Compressor for ZlibCompressor {
    fn id(&self) -> u8 {
        ID_ZLIB
    }

    fn name(&self) -> &'static str {
        "zlib"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(data)
            .map_err(|e| Error::Msg(format!("zlib compress failed: {e}")))?;
        encoder
            .finish()
            .map_err(|e| Error::Msg(format!("zlib compress failed: {e}")))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| Error::Msg(format!("zlib decompress failed: {e}")))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let c = ZlibCompressor;
        let data = b"the quick brown fox jumps over the lazy dog".repeat(4);
        let compressed = c.compress(&data).unwrap();
        assert_eq!(c.decompress(&compressed).unwrap(), data);
    }
}

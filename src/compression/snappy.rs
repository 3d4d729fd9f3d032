use super::{Compressor, ID_SNAPPY};
use crate::error::{Error, Result};

/// Snappy-backed compressor (wire id 1).
pub struct SnappyCompressor;

impl Compressor for SnappyCompressor {
    fn id(&self) -> u8 {
        ID_SNAPPY
    }

    fn name(&self) -> &'static str {
        "snappy"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = snap::raw::Encoder::new();
        encoder
            .compress_vec(data)
            .map_err(|e| Error::Msg(format!("snappy compress failed: {e}")))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = snap::raw::Decoder::new();
        decoder
            .decompress_vec(data)
            .map_err(|e| Error::Msg(format!("snappy decompress failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let c = SnappyCompressor;
        let data = b"the quick brown fox jumps over the lazy dog".repeat(4);
        let compressed = c.compress(&data).unwrap();
        assert_eq!(c.decompress(&compressed).unwrap(), data);
    }
}

use super::{Compressor, ID_ZSTD};
use crate::error::{Error, Result};

/// zstd-backed compressor (wire id 3).
pub struct ZstdCompressor;

const DEFAULT_LEVEL: i32 = 3;

impl Compressor for ZstdCompressor {
    fn id(&self) -> u8 {
        ID_ZSTD
    }

    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        zstd::stream::encode_all(data, DEFAULT_LEVEL)
            .map_err(|e| Error::Msg(format!("zstd compress failed: {e}")))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        zstd::stream::decode_all(data).map_err(|e| Error::Msg(format!("zstd decompress failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let c = ZstdCompressor;
        let data = b"the quick brown fox jumps over the lazy dog".repeat(4);
        let compressed = c.compress(&data).unwrap();
        assert_eq!(c.decompress(&compressed).unwrap(), data);
    }
}

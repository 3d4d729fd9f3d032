use super::{Compressor, ID_NOOP};
use crate::error::Result;

/// The identity compressor; always compiled in.
pub struct NoopCompressor;

impl Compressor for NoopCompressor {
    fn id(&self) -> u8 {
        ID_NOOP
    }

    fn name(&self) -> &'static str {
        "noop"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_bytes_through_unchanged() {
        let c = NoopCompressor;
        let data = b"hello world".to_vec();
        assert_eq!(c.decompress(&c.compress(&data).unwrap()).unwrap(), data);
    }
}

//! The document codec seam.
//!
//! The wire codec only needs to know how long a BSON document is, not what is
//! inside it. [`DocumentCodec`] is the abstract interface the rest of this
//! crate depends on; [`BsonCodec`] is the default, `bson`-crate-backed
//! implementation. Any conformant implementation may be substituted.

use bson::Document;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Error, Result};

/// Encodes and decodes BSON documents and BSON C-strings.
///
/// Implementations are pure and re-entrant; they hold no connection state.
pub trait DocumentCodec: Send + Sync {
    /// Serializes a document to its BSON byte representation.
    fn encode_document(&self, doc: &Document) -> Result<Vec<u8>>;

    /// Reads exactly one length-prefixed BSON document from the front of
    /// `bytes`, returning it along with the number of bytes consumed.
    fn decode_document(&self, bytes: &[u8]) -> Result<(Document, usize)>;

    /// Encodes a NUL-terminated UTF-8 C-string.
    fn encode_cstring(&self, s: &str) -> Vec<u8>;

    /// Reads a NUL-terminated UTF-8 C-string from the front of `bytes`,
    /// returning it along with the number of bytes consumed (including the
    /// terminating NUL).
    fn decode_cstring(&self, bytes: &[u8]) -> Result<(String, usize)>;
}

/// Default [`DocumentCodec`] backed by the `bson` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct BsonCodec;

impl DocumentCodec for BsonCodec {
    fn encode_document(&self, doc: &Document) -> Result<Vec<u8>> {
        bson::to_vec(doc).map_err(|e| Error::DecodeError(format!("bson encode failed: {e}")))
    }

    fn decode_document(&self, bytes: &[u8]) -> Result<(Document, usize)> {
        if bytes.len() < 4 {
            return Err(Error::DecodeError(
                "document too short to contain a length prefix".into(),
            ));
        }
        let len = Cursor::new(&bytes[..4]).read_i32::<LittleEndian>()? as usize;
        if len < 5 || bytes.len() < len {
            return Err(Error::DecodeError(format!(
                "document length {len} exceeds available {} bytes",
                bytes.len()
            )));
        }
        let mut cursor = Cursor::new(&bytes[..len]);
        let doc = Document::from_reader(&mut cursor)
            .map_err(|e| Error::DecodeError(format!("bson decode failed: {e}")))?;
        Ok((doc, len))
    }

    fn encode_cstring(&self, s: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(s.len() + 1);
        out.extend_from_slice(s.as_bytes());
        out.push(0);
        out
    }

    fn decode_cstring(&self, bytes: &[u8]) -> Result<(String, usize)> {
        let nul = bytes
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::DecodeError("unterminated c-string".into()))?;
        let s = std::str::from_utf8(&bytes[..nul])
            .map_err(|e| Error::DecodeError(format!("c-string is not valid utf-8: {e}")))?
            .to_string();
        Ok((s, nul + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn cstring_round_trips() {
        let codec = BsonCodec;
        let encoded = codec.encode_cstring("admin.$cmd");
        assert_eq!(encoded, b"admin.$cmd\0");
        let (decoded, consumed) = codec.decode_cstring(&encoded).unwrap();
        assert_eq!(decoded, "admin.$cmd");
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn cstring_decode_stops_at_first_nul_with_trailing_bytes() {
        let codec = BsonCodec;
        let mut bytes = b"foo\0".to_vec();
        bytes.extend_from_slice(b"trailing");
        let (decoded, consumed) = codec.decode_cstring(&bytes).unwrap();
        assert_eq!(decoded, "foo");
        assert_eq!(consumed, 4);
    }

    #[test]
    fn document_round_trips() {
        let codec = BsonCodec;
        let doc = doc! { "isMaster": 1, "name": "client" };
        let encoded = codec.encode_document(&doc).unwrap();
        let (decoded, consumed) = codec.decode_document(&encoded).unwrap();
        assert_eq!(decoded, doc);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn document_decode_rejects_truncated_length() {
        let codec = BsonCodec;
        assert!(codec.decode_document(&[1, 2]).is_err());
    }
}

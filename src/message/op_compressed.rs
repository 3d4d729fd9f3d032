use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

use super::wire::{read_i32, read_u8};
use super::Payload;
use crate::compression::compressor_by_id;
use crate::document::DocumentCodec;
use crate::error::{Error, Result};
use crate::opcode::OpCode;

/// Wraps another opcode's encoded payload behind a negotiated compressor.
/// Decoding is recursive: the decompressed bytes are themselves a complete
/// payload for `original_opcode`, parsed via [`Payload::decode`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpCompressed {
    pub original_opcode: OpCode,
    pub compressor_id: u8,
    pub wrapped: Box<Payload>,
}

impl OpCompressed {
    pub fn encode(&self, codec: &dyn DocumentCodec) -> Result<Vec<u8>> {
        let inner = self.wrapped.encode(codec)?;
        let uncompressed_size = inner.len() as i32;
        let compressor = compressor_by_id(self.compressor_id)?;
        let compressed = compressor.compress(&inner)?;

        let mut out = Vec::with_capacity(9 + compressed.len());
        out.write_i32::<LittleEndian>(self.original_opcode.as_i32())?;
        out.write_i32::<LittleEndian>(uncompressed_size)?;
        out.push(self.compressor_id);
        out.extend_from_slice(&compressed);
        Ok(out)
    }

    pub fn decode(body: &[u8], codec: &dyn DocumentCodec) -> Result<Self> {
        let mut cursor = Cursor::new(body);
        let original_opcode = OpCode::from_i32(read_i32(&mut cursor)?)?;
        let uncompressed_size = read_i32(&mut cursor)?;
        let compressor_id = read_u8(&mut cursor)?;
        let offset = cursor.position() as usize;

        let compressor = compressor_by_id(compressor_id)?;
        let decompressed = compressor.decompress(&body[offset..])?;
        if decompressed.len() as i32 != uncompressed_size {
            return Err(Error::DecodeError(format!(
                "OP_COMPRESSED declared uncompressed size {uncompressed_size} but got {}",
                decompressed.len()
            )));
        }

        let wrapped = Payload::decode(original_opcode, &decompressed, codec)?;
        Ok(OpCompressed {
            original_opcode,
            compressor_id,
            wrapped: Box::new(wrapped),
        })
    }

    /// Whether the server will reply to this compressed message — a pure
    /// function of the opcode it wraps.
    pub fn has_reply(&self) -> bool {
        self.wrapped.has_reply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::ID_NOOP;
    use crate::document::BsonCodec;
    use crate::message::OpMsg;
    use bson::doc;

    #[test]
    fn round_trips_with_noop_compressor() {
        let codec = BsonCodec;
        let msg = OpMsg::insert("test", "people", vec![doc! { "name": "Ada" }]);
        let compressed = OpCompressed {
            original_opcode: OpCode::OpMsg,
            compressor_id: ID_NOOP,
            wrapped: Box::new(Payload::Msg(msg.clone())),
        };
        let encoded = compressed.encode(&codec).unwrap();
        let decoded = OpCompressed::decode(&encoded, &codec).unwrap();
        assert_eq!(decoded.original_opcode, OpCode::OpMsg);
        match *decoded.wrapped {
            Payload::Msg(decoded_msg) => assert_eq!(decoded_msg, msg),
            other => panic!("expected Payload::Msg, got {other:?}"),
        }
    }

    #[cfg(feature = "compression-zstd")]
    #[test]
    fn round_trips_with_zstd_compressor() {
        let codec = BsonCodec;
        let msg = OpMsg::insert("test", "people", vec![doc! { "name": "Ada" }]);
        let compressed = OpCompressed {
            original_opcode: OpCode::OpMsg,
            compressor_id: crate::compression::ID_ZSTD,
            wrapped: Box::new(Payload::Msg(msg.clone())),
        };
        let encoded = compressed.encode(&codec).unwrap();
        let decoded = OpCompressed::decode(&encoded, &codec).unwrap();
        match *decoded.wrapped {
            Payload::Msg(decoded_msg) => assert_eq!(decoded_msg, msg),
            other => panic!("expected Payload::Msg, got {other:?}"),
        }
    }

    #[test]
    fn rejects_size_mismatch() {
        let codec = BsonCodec;
        let msg = OpMsg::insert("test", "people", vec![]);
        let compressed = OpCompressed {
            original_opcode: OpCode::OpMsg,
            compressor_id: ID_NOOP,
            wrapped: Box::new(Payload::Msg(msg)),
        };
        let mut encoded = compressed.encode(&codec).unwrap();
        // corrupt the declared uncompressed_size field (bytes 4..8)
        encoded[4..8].copy_from_slice(&999i32.to_le_bytes());
        assert!(OpCompressed::decode(&encoded, &codec).is_err());
    }

    #[test]
    fn has_reply_delegates_to_wrapped_payload() {
        let codec = BsonCodec;
        let msg = OpMsg::insert("test", "people", vec![]);
        let compressed = OpCompressed {
            original_opcode: OpCode::OpMsg,
            compressor_id: ID_NOOP,
            wrapped: Box::new(Payload::Msg(msg)),
        };
        assert!(compressed.has_reply());
        let _ = codec; // silence unused warning under some feature combinations
    }
}

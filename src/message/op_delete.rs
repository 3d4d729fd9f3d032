use bson::Document;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

use super::wire::{read_i32, read_u32};
use crate::document::DocumentCodec;
use crate::error::Result;
use crate::flags::OpDeleteFlags;

/// Removes document(s) matching `selector` from `full_collection_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct OpDelete {
    pub full_collection_name: String,
    pub flags: OpDeleteFlags,
    pub selector: Document,
}

impl OpDelete {
    pub fn encode(&self, codec: &dyn DocumentCodec) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_i32::<LittleEndian>(0)?; // reserved
        out.extend_from_slice(&codec.encode_cstring(&self.full_collection_name));
        out.write_u32::<LittleEndian>(self.flags.bits())?;
        out.extend_from_slice(&codec.encode_document(&self.selector)?);
        Ok(out)
    }

    pub fn decode(body: &[u8], codec: &dyn DocumentCodec) -> Result<Self> {
        let mut cursor = Cursor::new(body);
        let _reserved = read_i32(&mut cursor)?;
        let mut offset = cursor.position() as usize;

        let (full_collection_name, consumed) = codec.decode_cstring(&body[offset..])?;
        offset += consumed;

        let mut cursor = Cursor::new(&body[offset..]);
        let flags = OpDeleteFlags::from_bits_truncate(read_u32(&mut cursor)?);
        offset += cursor.position() as usize;

        let (selector, consumed) = codec.decode_document(&body[offset..])?;
        offset += consumed;

        if offset != body.len() {
            return Err(crate::error::Error::DecodeError(format!(
                "OP_DELETE left {} trailing bytes",
                body.len() - offset
            )));
        }
        Ok(OpDelete {
            full_collection_name,
            flags,
            selector,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BsonCodec;
    use bson::doc;

    #[test]
    fn round_trips() {
        let codec = BsonCodec;
        let op = OpDelete {
            full_collection_name: "test.people".to_string(),
            flags: OpDeleteFlags::SINGLE_REMOVE,
            selector: doc! { "name": "Ada" },
        };
        let encoded = op.encode(&codec).unwrap();
        let decoded = OpDelete::decode(&encoded, &codec).unwrap();
        assert_eq!(op, decoded);
    }

    #[test]
    fn rejects_trailing_bytes() {
        let codec = BsonCodec;
        let op = OpDelete {
            full_collection_name: "test.people".to_string(),
            flags: OpDeleteFlags::empty(),
            selector: doc! { "name": "Ada" },
        };
        let mut encoded = op.encode(&codec).unwrap();
        encoded.push(0xFF);
        assert!(OpDelete::decode(&encoded, &codec).is_err());
    }
}

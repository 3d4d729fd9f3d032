use bson::Document;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

use super::wire::{read_i32, read_u32};
use crate::document::DocumentCodec;
use crate::error::Result;
use crate::flags::OpUpdateFlags;

/// Updates document(s) matching `selector` in `full_collection_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct OpUpdate {
    pub full_collection_name: String,
    pub flags: OpUpdateFlags,
    pub selector: Document,
    pub update: Document,
}

impl OpUpdate {
    pub fn encode(&self, codec: &dyn DocumentCodec) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_i32::<LittleEndian>(0)?; // reserved
        out.extend_from_slice(&codec.encode_cstring(&self.full_collection_name));
        out.write_u32::<LittleEndian>(self.flags.bits())?;
        out.extend_from_slice(&codec.encode_document(&self.selector)?);
        out.extend_from_slice(&codec.encode_document(&self.update)?);
        Ok(out)
    }

    pub fn decode(body: &[u8], codec: &dyn DocumentCodec) -> Result<Self> {
        let mut cursor = Cursor::new(body);
        let _reserved = read_i32(&mut cursor)?;
        let mut offset = cursor.position() as usize;

        let (full_collection_name, consumed) = codec.decode_cstring(&body[offset..])?;
        offset += consumed;

        let mut cursor = Cursor::new(&body[offset..]);
        let flags = OpUpdateFlags::from_bits_truncate(read_u32(&mut cursor)?);
        offset += cursor.position() as usize;

        let (selector, consumed) = codec.decode_document(&body[offset..])?;
        offset += consumed;
        let (update, consumed) = codec.decode_document(&body[offset..])?;
        offset += consumed;

        if offset != body.len() {
            return Err(crate::error::Error::DecodeError(format!(
                "OP_UPDATE left {} trailing bytes",
                body.len() - offset
            )));
        }
        Ok(OpUpdate {
            full_collection_name,
            flags,
            selector,
            update,
        })
    }
}

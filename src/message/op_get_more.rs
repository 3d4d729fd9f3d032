use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

use super::wire::{read_i32, read_i64};
use crate::document::DocumentCodec;
use crate::error::Result;

/// Requests the next batch of results for an existing cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct OpGetMore {
    pub full_collection_name: String,
    pub number_to_return: i32,
    pub cursor_id: i64,
}

impl OpGetMore {
    pub fn encode(&self, codec: &dyn DocumentCodec) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_i32::<LittleEndian>(0)?; // reserved
        out.extend_from_slice(&codec.encode_cstring(&self.full_collection_name));
        out.write_i32::<LittleEndian>(self.number_to_return)?;
        out.write_i64::<LittleEndian>(self.cursor_id)?;
        Ok(out)
    }

    pub fn decode(body: &[u8], codec: &dyn DocumentCodec) -> Result<Self> {
        let mut cursor = Cursor::new(body);
        let _reserved = read_i32(&mut cursor)?;
        let mut offset = cursor.position() as usize;

        let (full_collection_name, consumed) = codec.decode_cstring(&body[offset..])?;
        offset += consumed;

        let mut cursor = Cursor::new(&body[offset..]);
        let number_to_return = read_i32(&mut cursor)?;
        let cursor_id = read_i64(&mut cursor)?;
        offset += cursor.position() as usize;

        if offset != body.len() {
            return Err(crate::error::Error::DecodeError(format!(
                "OP_GET_MORE left {} trailing bytes",
                body.len() - offset
            )));
        }

        Ok(OpGetMore {
            full_collection_name,
            number_to_return,
            cursor_id,
        })
    }
}

use bson::Document;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

use super::wire::read_i32;
use crate::document::DocumentCodec;
use crate::error::Result;
use crate::flags::OpInsertFlags;

/// Inserts one or more documents into `full_collection_name`. Fire-and-forget:
/// the server never replies to this opcode.
#[derive(Debug, Clone, PartialEq)]
pub struct OpInsert {
    pub flags: OpInsertFlags,
    pub full_collection_name: String,
    pub documents: Vec<Document>,
}

impl OpInsert {
    pub fn encode(&self, codec: &dyn DocumentCodec) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_i32::<LittleEndian>(self.flags.bits())?;
        out.extend_from_slice(&codec.encode_cstring(&self.full_collection_name));
        for doc in &self.documents {
            out.extend_from_slice(&codec.encode_document(doc)?);
        }
        Ok(out)
    }

    pub fn decode(body: &[u8], codec: &dyn DocumentCodec) -> Result<Self> {
        let mut cursor = Cursor::new(body);
        let flags = OpInsertFlags::from_bits_truncate(read_i32(&mut cursor)?);
        let mut offset = cursor.position() as usize;

        let (full_collection_name, consumed) = codec.decode_cstring(&body[offset..])?;
        offset += consumed;

        let mut documents = Vec::new();
        while offset < body.len() {
            let (doc, consumed) = codec.decode_document(&body[offset..])?;
            documents.push(doc);
            offset += consumed;
        }

        Ok(OpInsert {
            flags,
            full_collection_name,
            documents,
        })
    }
}

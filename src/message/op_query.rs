use bson::Document;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

use super::wire::{read_i32, read_u32};
use crate::document::DocumentCodec;
use crate::error::Result;
use crate::flags::OpQueryFlags;

/// Queries a collection for documents. The classic predecessor to OP_MSG
/// `find` commands; still used to speak `hello`/`isMaster` to older servers.
#[derive(Debug, Clone, PartialEq)]
pub struct OpQuery {
    pub flags: OpQueryFlags,
    pub full_collection_name: String,
    pub number_to_skip: i32,
    pub number_to_return: i32,
    pub query: Document,
    pub return_fields_selector: Option<Document>,
}

impl OpQuery {
    pub fn encode(&self, codec: &dyn DocumentCodec) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(self.flags.bits())?;
        out.extend_from_slice(&codec.encode_cstring(&self.full_collection_name));
        out.write_i32::<LittleEndian>(self.number_to_skip)?;
        out.write_i32::<LittleEndian>(self.number_to_return)?;
        out.extend_from_slice(&codec.encode_document(&self.query)?);
        if let Some(ref selector) = self.return_fields_selector {
            out.extend_from_slice(&codec.encode_document(selector)?);
        }
        Ok(out)
    }

    pub fn decode(body: &[u8], codec: &dyn DocumentCodec) -> Result<Self> {
        let mut cursor = Cursor::new(body);
        let flags = OpQueryFlags::from_bits_truncate(read_u32(&mut cursor)?);
        let mut offset = cursor.position() as usize;

        let (full_collection_name, consumed) = codec.decode_cstring(&body[offset..])?;
        offset += consumed;

        let mut cursor = Cursor::new(&body[offset..]);
        let number_to_skip = read_i32(&mut cursor)?;
        let number_to_return = read_i32(&mut cursor)?;
        offset += cursor.position() as usize;

        let (query, consumed) = codec.decode_document(&body[offset..])?;
        offset += consumed;

        let return_fields_selector = if offset < body.len() {
            let (selector, consumed) = codec.decode_document(&body[offset..])?;
            offset += consumed;
            Some(selector)
        } else {
            None
        };

        if offset != body.len() {
            return Err(crate::error::Error::DecodeError(format!(
                "OP_QUERY left {} trailing bytes",
                body.len() - offset
            )));
        }
        Ok(OpQuery {
            flags,
            full_collection_name,
            number_to_skip,
            number_to_return,
            query,
            return_fields_selector,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BsonCodec;
    use bson::doc;

    #[test]
    fn round_trips_without_selector() {
        let codec = BsonCodec;
        let op = OpQuery {
            flags: OpQueryFlags::SLAVE_OK,
            full_collection_name: "admin.$cmd".to_string(),
            number_to_skip: 0,
            number_to_return: 1,
            query: doc! { "isMaster": 1 },
            return_fields_selector: None,
        };
        let encoded = op.encode(&codec).unwrap();
        let decoded = OpQuery::decode(&encoded, &codec).unwrap();
        assert_eq!(op, decoded);
    }

    #[test]
    fn rejects_trailing_bytes_after_selector() {
        let codec = BsonCodec;
        let op = OpQuery {
            flags: OpQueryFlags::empty(),
            full_collection_name: "admin.$cmd".to_string(),
            number_to_skip: 0,
            number_to_return: 1,
            query: doc! { "isMaster": 1 },
            return_fields_selector: None,
        };
        let mut encoded = op.encode(&codec).unwrap();
        encoded.push(0xFF);
        assert!(OpQuery::decode(&encoded, &codec).is_err());
    }

    #[test]
    fn round_trips_with_selector() {
        let codec = BsonCodec;
        let op = OpQuery {
            flags: OpQueryFlags::empty(),
            full_collection_name: "test.people".to_string(),
            number_to_skip: 10,
            number_to_return: 20,
            query: doc! { "age": { "$gt": 21 } },
            return_fields_selector: Some(doc! { "name": 1 }),
        };
        let encoded = op.encode(&codec).unwrap();
        let decoded = OpQuery::decode(&encoded, &codec).unwrap();
        assert_eq!(op, decoded);
    }
}

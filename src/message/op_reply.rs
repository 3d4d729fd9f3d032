use bson::Document;
use std::io::Cursor;

use super::wire::{read_i32, read_i64};
use crate::document::DocumentCodec;
use crate::error::{Error, Result};
use crate::flags::OpReplyFlags;

/// Server response to an OP_QUERY or OP_GET_MORE. Decode-only: the client
/// never constructs or sends one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct OpReply {
    pub response_flags: OpReplyFlags,
    pub cursor_id: i64,
    pub starting_from: i32,
    pub number_returned: i32,
    pub documents: Vec<Document>,
}

impl OpReply {
    pub fn decode(body: &[u8], codec: &dyn DocumentCodec) -> Result<Self> {
        let mut cursor = Cursor::new(body);
        let response_flags = OpReplyFlags::from_bits_truncate(read_i32(&mut cursor)?);
        let cursor_id = read_i64(&mut cursor)?;
        let starting_from = read_i32(&mut cursor)?;
        let number_returned = read_i32(&mut cursor)?;

        let mut offset = cursor.position() as usize;
        let mut documents = Vec::with_capacity(number_returned.max(0) as usize);
        for _ in 0..number_returned {
            let (doc, consumed) = codec.decode_document(&body[offset..])?;
            documents.push(doc);
            offset += consumed;
        }
        if offset != body.len() {
            return Err(Error::DecodeError(format!(
                "OP_REPLY left {} trailing bytes",
                body.len() - offset
            )));
        }

        Ok(OpReply {
            response_flags,
            cursor_id,
            starting_from,
            number_returned,
            documents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BsonCodec;

    #[test]
    fn decodes_empty_reply() {
        let codec = BsonCodec;
        let mut body = Vec::new();
        body.extend_from_slice(&0i32.to_le_bytes()); // flags
        body.extend_from_slice(&0i64.to_le_bytes()); // cursor_id
        body.extend_from_slice(&0i32.to_le_bytes()); // starting_from
        body.extend_from_slice(&0i32.to_le_bytes()); // number_returned

        let reply = OpReply::decode(&body, &codec).unwrap();
        assert_eq!(reply.number_returned, 0);
        assert!(reply.documents.is_empty());
        assert_eq!(reply.cursor_id, 0);
    }

    #[test]
    fn rejects_trailing_bytes() {
        let codec = BsonCodec;
        let mut body = Vec::new();
        body.extend_from_slice(&0i32.to_le_bytes());
        body.extend_from_slice(&0i64.to_le_bytes());
        body.extend_from_slice(&0i32.to_le_bytes());
        body.extend_from_slice(&0i32.to_le_bytes());
        body.push(0xFF);
        assert!(OpReply::decode(&body, &codec).is_err());
    }

    #[test]
    fn rejects_truncated_header() {
        let codec = BsonCodec;
        assert!(OpReply::decode(&[0, 0], &codec).is_err());
    }
}

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

use super::wire::{read_i32, read_i64};
use crate::document::DocumentCodec;
use crate::error::{Error, Result};

/// Tells the server the client is done with a set of cursors.
#[derive(Debug, Clone, PartialEq)]
pub struct OpKillCursors {
    pub cursor_ids: Vec<i64>,
}

impl OpKillCursors {
    pub fn encode(&self, _codec: &dyn DocumentCodec) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_i32::<LittleEndian>(0)?; // reserved
        out.write_i32::<LittleEndian>(self.cursor_ids.len() as i32)?;
        for id in &self.cursor_ids {
            out.write_i64::<LittleEndian>(*id)?;
        }
        Ok(out)
    }

    pub fn decode(body: &[u8], _codec: &dyn DocumentCodec) -> Result<Self> {
        let mut cursor = Cursor::new(body);
        let _reserved = read_i32(&mut cursor)?;
        let number_of_cursor_ids = read_i32(&mut cursor)?;
        if number_of_cursor_ids < 0 {
            return Err(Error::DecodeError(format!(
                "negative cursor id count {number_of_cursor_ids}"
            )));
        }

        let mut cursor_ids = Vec::with_capacity(number_of_cursor_ids as usize);
        for _ in 0..number_of_cursor_ids {
            cursor_ids.push(read_i64(&mut cursor)?);
        }

        if cursor.position() as usize != body.len() {
            return Err(Error::DecodeError(
                "OP_KILL_CURSORS trailing bytes after declared cursor id count".into(),
            ));
        }

        Ok(OpKillCursors { cursor_ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BsonCodec;

    #[test]
    fn round_trips() {
        let codec = BsonCodec;
        let op = OpKillCursors {
            cursor_ids: vec![1, 2, 3],
        };
        let encoded = op.encode(&codec).unwrap();
        assert_eq!(encoded.len(), 4 + 4 + 3 * 8);
        let decoded = OpKillCursors::decode(&encoded, &codec).unwrap();
        assert_eq!(op, decoded);
    }

    #[test]
    fn rejects_mismatched_count() {
        let codec = BsonCodec;
        let mut body = Vec::new();
        body.extend_from_slice(&0i32.to_le_bytes());
        body.extend_from_slice(&2i32.to_le_bytes()); // claims 2 ids
        body.extend_from_slice(&1i64.to_le_bytes()); // but only provides 1
        assert!(OpKillCursors::decode(&body, &codec).is_err());
    }
}

//! Wire protocol opcode enumeration.
//!
//! See https://www.mongodb.com/docs/manual/reference/mongodb-wire-protocol/#request-opcodes

use crate::error::Error;

/// Discriminates the payload kind carried by a [`crate::frame::FramedMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum OpCode {
    OpReply = 1,
    OpUpdate = 2001,
    OpInsert = 2002,
    Reserved = 2003,
    OpQuery = 2004,
    OpGetMore = 2005,
    OpDelete = 2006,
    OpKillCursors = 2007,
    OpCompressed = 2012,
    OpMsg = 2013,
}

impl OpCode {
    pub fn from_i32(value: i32) -> Result<Self, Error> {
        match value {
            1 => Ok(OpCode::OpReply),
            2001 => Ok(OpCode::OpUpdate),
            2002 => Ok(OpCode::OpInsert),
            2003 => Ok(OpCode::Reserved),
            2004 => Ok(OpCode::OpQuery),
            2005 => Ok(OpCode::OpGetMore),
            2006 => Ok(OpCode::OpDelete),
            2007 => Ok(OpCode::OpKillCursors),
            2012 => Ok(OpCode::OpCompressed),
            2013 => Ok(OpCode::OpMsg),
            other => Err(Error::UnknownOpcode(other)),
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_values() {
        for (value, code) in [
            (1, OpCode::OpReply),
            (2001, OpCode::OpUpdate),
            (2002, OpCode::OpInsert),
            (2003, OpCode::Reserved),
            (2004, OpCode::OpQuery),
            (2005, OpCode::OpGetMore),
            (2006, OpCode::OpDelete),
            (2007, OpCode::OpKillCursors),
            (2012, OpCode::OpCompressed),
            (2013, OpCode::OpMsg),
        ] {
            assert_eq!(OpCode::from_i32(value).unwrap(), code);
            assert_eq!(code.as_i32(), value);
        }
    }

    #[test]
    fn rejects_unknown_opcode() {
        match OpCode::from_i32(9999) {
            Err(Error::UnknownOpcode(9999)) => {}
            other => panic!("expected UnknownOpcode, got {other:?}"),
        }
    }
}

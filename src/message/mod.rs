//! Per-opcode payload types and the [`Payload`] enum that dispatches between
//! them by [`OpCode`].

mod op_compressed;
mod op_delete;
mod op_get_more;
mod op_insert;
mod op_kill_cursors;
mod op_msg;
mod op_query;
mod op_reply;
mod op_update;
mod wire;

pub use op_compressed::OpCompressed;
pub use op_delete::OpDelete;
pub use op_get_more::OpGetMore;
pub use op_insert::OpInsert;
pub use op_kill_cursors::OpKillCursors;
pub use op_msg::{OpMsg, Section};
pub use op_query::OpQuery;
pub use op_reply::OpReply;
pub use op_update::OpUpdate;

use crate::document::DocumentCodec;
use crate::error::{Error, Result};
use crate::opcode::OpCode;

/// A fully-typed wire protocol payload, discriminated by [`OpCode`].
///
/// `OpReply` is decode-only: the client never builds or sends one, so
/// [`Payload::encode`] rejects it. Every other variant round-trips.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Reply(OpReply),
    Update(OpUpdate),
    Insert(OpInsert),
    Query(OpQuery),
    GetMore(OpGetMore),
    Delete(OpDelete),
    KillCursors(OpKillCursors),
    Msg(OpMsg),
    Compressed(Box<OpCompressed>),
}

impl Payload {
    pub fn op_code(&self) -> OpCode {
        match self {
            Payload::Reply(_) => OpCode::OpReply,
            Payload::Update(_) => OpCode::OpUpdate,
            Payload::Insert(_) => OpCode::OpInsert,
            Payload::Query(_) => OpCode::OpQuery,
            Payload::GetMore(_) => OpCode::OpGetMore,
            Payload::Delete(_) => OpCode::OpDelete,
            Payload::KillCursors(_) => OpCode::OpKillCursors,
            Payload::Msg(_) => OpCode::OpMsg,
            Payload::Compressed(_) => OpCode::OpCompressed,
        }
    }

    /// Whether the server sends a reply frame for this payload. Drives
    /// whether the multiplexer registers a pending slot for a submitted
    /// request or completes it immediately.
    pub fn has_reply(&self) -> bool {
        match self {
            Payload::Query(_) | Payload::GetMore(_) | Payload::Msg(_) => true,
            Payload::Update(_) | Payload::Insert(_) | Payload::Delete(_) | Payload::KillCursors(_) => false,
            Payload::Reply(_) => false,
            Payload::Compressed(inner) => inner.has_reply(),
        }
    }

    pub fn encode(&self, codec: &dyn DocumentCodec) -> Result<Vec<u8>> {
        match self {
            Payload::Reply(_) => Err(Error::EncodeUnsupported("OP_REPLY")),
            Payload::Update(op) => op.encode(codec),
            Payload::Insert(op) => op.encode(codec),
            Payload::Query(op) => op.encode(codec),
            Payload::GetMore(op) => op.encode(codec),
            Payload::Delete(op) => op.encode(codec),
            Payload::KillCursors(op) => op.encode(codec),
            Payload::Msg(op) => op.encode(codec),
            Payload::Compressed(op) => op.encode(codec),
        }
    }

    pub fn decode(op_code: OpCode, body: &[u8], codec: &dyn DocumentCodec) -> Result<Self> {
        Ok(match op_code {
            OpCode::OpReply => Payload::Reply(OpReply::decode(body, codec)?),
            OpCode::OpUpdate => Payload::Update(OpUpdate::decode(body, codec)?),
            OpCode::OpInsert => Payload::Insert(OpInsert::decode(body, codec)?),
            OpCode::OpQuery => Payload::Query(OpQuery::decode(body, codec)?),
            OpCode::OpGetMore => Payload::GetMore(OpGetMore::decode(body, codec)?),
            OpCode::OpDelete => Payload::Delete(OpDelete::decode(body, codec)?),
            OpCode::OpKillCursors => Payload::KillCursors(OpKillCursors::decode(body, codec)?),
            OpCode::OpMsg => Payload::Msg(OpMsg::decode(body, codec)?),
            OpCode::OpCompressed => Payload::Compressed(Box::new(OpCompressed::decode(body, codec)?)),
            OpCode::Reserved => {
                return Err(Error::DecodeError(
                    "opcode 2003 is reserved and carries no payload".into(),
                ))
            }
        })
    }
}

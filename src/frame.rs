//! The length-prefixed frame that carries a [`MessageHeader`] and a
//! [`Payload`] over the wire.
//!
//! ```text
//! i32   messageLength   // total length of this frame, including itself
//! i32   requestID
//! i32   responseTo
//! i32   opCode
//! ...   payload
//! ```

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use crate::document::DocumentCodec;
use crate::error::{Error, Result};
use crate::header::MessageHeader;
use crate::message::Payload;
use crate::opcode::OpCode;

/// Bytes occupied by the length prefix and the three header/opcode i32s,
/// before the payload begins.
pub const HEADER_LEN: usize = 16;

/// A complete wire protocol frame: header plus typed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FramedMessage {
    pub header: MessageHeader,
    pub payload: Payload,
}

impl FramedMessage {
    pub fn new(header: MessageHeader, payload: Payload) -> Self {
        FramedMessage { header, payload }
    }

    /// A frame for a fresh outbound request: a newly generated request id and
    /// `response_to = 0`.
    pub fn request(payload: Payload) -> Self {
        FramedMessage {
            header: MessageHeader::generate(),
            payload,
        }
    }

    pub fn request_id(&self) -> i32 {
        self.header.request_id
    }

    pub fn response_to(&self) -> i32 {
        self.header.response_to
    }

    /// Serializes the full frame, including its own length prefix.
    pub fn encode(&self, codec: &dyn DocumentCodec) -> Result<Vec<u8>> {
        let payload_bytes = self.payload.encode(codec)?;
        let total_len = HEADER_LEN + payload_bytes.len();
        if total_len > i32::MAX as usize {
            return Err(Error::DecodeError(format!(
                "encoded frame of {total_len} bytes exceeds the i32 length prefix"
            )));
        }

        let mut out = Vec::with_capacity(total_len);
        out.write_u32::<LittleEndian>(total_len as u32)?;
        out.write_i32::<LittleEndian>(self.header.request_id)?;
        out.write_i32::<LittleEndian>(self.header.response_to)?;
        out.write_i32::<LittleEndian>(self.payload.op_code().as_i32())?;
        out.extend_from_slice(&payload_bytes);
        Ok(out)
    }

    /// Parses exactly one complete frame, including its length prefix. The
    /// caller (typically the multiplexer's receive loop) is responsible for
    /// buffering reads from the transport until `frame.len()` bytes are
    /// available; see [`read_length_prefix`] for peeking the declared size.
    pub fn decode(frame: &[u8], codec: &dyn DocumentCodec) -> Result<Self> {
        if frame.len() < HEADER_LEN {
            return Err(Error::DecodeError(format!(
                "frame of {} bytes is shorter than the {HEADER_LEN}-byte header",
                frame.len()
            )));
        }

        let mut cursor = Cursor::new(frame);
        let declared_len = cursor
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::DecodeError(format!("truncated frame reading length: {e}")))?;
        if declared_len as usize != frame.len() {
            return Err(Error::DecodeError(format!(
                "frame declared length {declared_len} does not match the {} bytes supplied",
                frame.len()
            )));
        }

        let request_id = cursor
            .read_i32::<LittleEndian>()
            .map_err(|e| Error::DecodeError(format!("truncated frame reading request id: {e}")))?;
        let response_to = cursor
            .read_i32::<LittleEndian>()
            .map_err(|e| Error::DecodeError(format!("truncated frame reading response_to: {e}")))?;
        let op_code = OpCode::from_i32(
            cursor
                .read_i32::<LittleEndian>()
                .map_err(|e| Error::DecodeError(format!("truncated frame reading opcode: {e}")))?,
        )?;

        let offset = cursor.position() as usize;
        let payload = Payload::decode(op_code, &frame[offset..], codec)?;

        Ok(FramedMessage {
            header: MessageHeader {
                request_id,
                response_to,
            },
            payload,
        })
    }
}

/// Reads the 4-byte little-endian length prefix that precedes every frame.
/// Transports use this to know how many more bytes to buffer before handing
/// a complete frame to [`FramedMessage::decode`].
pub fn read_length_prefix(bytes: &[u8; 4]) -> Result<u32> {
    let len = u32::from_le_bytes(*bytes);
    if (len as usize) < HEADER_LEN {
        return Err(Error::DecodeError(format!(
            "frame length {len} is shorter than the {HEADER_LEN}-byte header"
        )));
    }
    Ok(len)
}

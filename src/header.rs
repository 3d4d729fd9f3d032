//! The (request_id, response_to) pair carried by every frame.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rand::Rng;
use std::io::{Read, Write};

use crate::error::Result;

/// Identifies a request and, on a reply, the request it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub request_id: i32,
    pub response_to: i32,
}

impl MessageHeader {
    /// Builds a header with an explicit request id and `response_to = 0`.
    pub fn new(request_id: i32) -> Self {
        MessageHeader {
            request_id,
            response_to: 0,
        }
    }

    /// Builds a header with a fresh request id drawn from `[0, 2^31)`.
    pub fn generate() -> Self {
        let id: u32 = rand::thread_rng().gen_range(0..(1u32 << 31));
        MessageHeader {
            request_id: id as i32,
            response_to: 0,
        }
    }

    pub fn reply_to(request_id: i32, response_to: i32) -> Self {
        MessageHeader {
            request_id,
            response_to,
        }
    }

    pub(crate) fn write<W: Write>(&self, buffer: &mut W) -> Result<()> {
        buffer.write_i32::<LittleEndian>(self.request_id)?;
        buffer.write_i32::<LittleEndian>(self.response_to)?;
        Ok(())
    }

    pub(crate) fn read<R: Read>(buffer: &mut R) -> Result<Self> {
        let request_id = buffer.read_i32::<LittleEndian>()?;
        let response_to = buffer.read_i32::<LittleEndian>()?;
        Ok(MessageHeader {
            request_id,
            response_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_header_has_zero_response_to() {
        let header = MessageHeader::generate();
        assert_eq!(header.response_to, 0);
        assert!(header.request_id >= 0);
    }

    #[test]
    fn round_trips_through_bytes() {
        let header = MessageHeader::reply_to(42, 7);
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        let decoded = MessageHeader::read(&mut buf.as_slice()).unwrap();
        assert_eq!(header, decoded);
    }
}

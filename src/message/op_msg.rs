use bson::{doc, Document};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

use super::wire::{read_i32, read_u32};
use crate::document::DocumentCodec;
use crate::error::{Error, Result};
use crate::flags::OpMsgFlags;

/// A section within an OP_MSG payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Tag 0: a single command document.
    Body(Document),
    /// Tag 1: an identified sequence of documents (e.g. the bulk write
    /// payload for `insert`/`update`/`delete`).
    DocumentSequence {
        identifier: String,
        documents: Vec<Document>,
    },
}

impl Section {
    fn encode_into(&self, out: &mut Vec<u8>, codec: &dyn DocumentCodec) -> Result<()> {
        match self {
            Section::Body(doc) => {
                out.push(0);
                out.extend_from_slice(&codec.encode_document(doc)?);
            }
            Section::DocumentSequence {
                identifier,
                documents,
            } => {
                out.push(1);
                let mut payload = codec.encode_cstring(identifier);
                for doc in documents {
                    payload.extend_from_slice(&codec.encode_document(doc)?);
                }
                let size = (payload.len() + 4) as i32;
                out.write_i32::<LittleEndian>(size)?;
                out.extend_from_slice(&payload);
            }
        }
        Ok(())
    }
}

/// MongoDB 3.6+ general-purpose message. The sole client-sent, reply-bearing
/// opcode in modern deployments.
#[derive(Debug, Clone, PartialEq)]
pub struct OpMsg {
    pub flag_bits: OpMsgFlags,
    pub sections: Vec<Section>,
    /// CRC-32C checksum. Only ever emitted on the wire when `flag_bits`
    /// contains `CHECKSUM_PRESENT`; see the open-question resolution in
    /// DESIGN.md.
    pub checksum: Option<u32>,
}

impl OpMsg {
    /// An OP_MSG for a bulk `insert` command.
    pub fn insert(db: impl Into<String>, collection: impl Into<String>, documents: Vec<Document>) -> OpMsg {
        OpMsg {
            flag_bits: OpMsgFlags::empty(),
            sections: vec![
                Section::Body(doc! { "insert": collection.into(), "$db": db.into() }),
                Section::DocumentSequence {
                    identifier: "documents".to_string(),
                    documents,
                },
            ],
            checksum: None,
        }
    }

    /// An OP_MSG for a bulk `update` command. Each entry in `updates` should
    /// be a `{q, u, ...}` update spec document.
    pub fn update(db: impl Into<String>, collection: impl Into<String>, updates: Vec<Document>) -> OpMsg {
        OpMsg {
            flag_bits: OpMsgFlags::empty(),
            sections: vec![
                Section::Body(doc! { "update": collection.into(), "$db": db.into() }),
                Section::DocumentSequence {
                    identifier: "updates".to_string(),
                    documents: updates,
                },
            ],
            checksum: None,
        }
    }

    /// An OP_MSG for a bulk `delete` command. Each entry in `deletes` should
    /// be a `{q, limit}` delete spec document.
    pub fn delete(db: impl Into<String>, collection: impl Into<String>, deletes: Vec<Document>) -> OpMsg {
        OpMsg {
            flag_bits: OpMsgFlags::empty(),
            sections: vec![
                Section::Body(doc! { "delete": collection.into(), "$db": db.into() }),
                Section::DocumentSequence {
                    identifier: "deletes".to_string(),
                    documents: deletes,
                },
            ],
            checksum: None,
        }
    }

    pub fn encode(&self, codec: &dyn DocumentCodec) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(self.flag_bits.bits())?;
        for section in &self.sections {
            section.encode_into(&mut out, codec)?;
        }
        if self.flag_bits.contains(OpMsgFlags::CHECKSUM_PRESENT) {
            let crc = self
                .checksum
                .unwrap_or_else(|| crc32c::crc32c(&out));
            out.write_u32::<LittleEndian>(crc)?;
        }
        Ok(out)
    }

    pub fn decode(body: &[u8], codec: &dyn DocumentCodec) -> Result<Self> {
        let mut cursor = Cursor::new(body);
        let flag_bits = OpMsgFlags::from_bits_truncate(read_u32(&mut cursor)?);
        let has_checksum = flag_bits.contains(OpMsgFlags::CHECKSUM_PRESENT);

        if has_checksum && body.len() < 8 {
            return Err(Error::DecodeError(
                "OP_MSG too short to contain the declared checksum".into(),
            ));
        }
        let sections_end = if has_checksum {
            body.len() - 4
        } else {
            body.len()
        };

        let mut offset = cursor.position() as usize;
        let mut sections = Vec::new();
        while offset < sections_end {
            let tag = body[offset];
            offset += 1;
            match tag {
                0 => {
                    let (doc, consumed) = codec.decode_document(&body[offset..])?;
                    offset += consumed;
                    sections.push(Section::Body(doc));
                }
                1 => {
                    let section_start = offset;
                    let mut size_cursor = Cursor::new(&body[offset..]);
                    let size = read_i32(&mut size_cursor)?;
                    if size < 4 {
                        return Err(Error::DecodeError(format!(
                            "OP_MSG document sequence section has impossible size {size}"
                        )));
                    }
                    let section_end = section_start + size as usize;
                    if section_end > sections_end {
                        return Err(Error::DecodeError(
                            "OP_MSG document sequence section overruns payload".into(),
                        ));
                    }

                    let mut inner = section_start + 4;
                    let (identifier, consumed) = codec.decode_cstring(&body[inner..section_end])?;
                    inner += consumed;

                    let mut documents = Vec::new();
                    while inner < section_end {
                        let (doc, consumed) = codec.decode_document(&body[inner..section_end])?;
                        documents.push(doc);
                        inner += consumed;
                    }
                    if inner != section_end {
                        return Err(Error::DecodeError(
                            "OP_MSG document sequence section left trailing bytes".into(),
                        ));
                    }

                    offset = section_end;
                    sections.push(Section::DocumentSequence {
                        identifier,
                        documents,
                    });
                }
                other => {
                    return Err(Error::DecodeError(format!(
                        "unknown OP_MSG section tag {other}"
                    )))
                }
            }
        }
        if offset != sections_end {
            return Err(Error::DecodeError(
                "OP_MSG sections did not exactly fill the payload".into(),
            ));
        }

        let checksum = if has_checksum {
            let mut c = Cursor::new(&body[sections_end..]);
            Some(read_u32(&mut c)?)
        } else {
            None
        };

        Ok(OpMsg {
            flag_bits,
            sections,
            checksum,
        })
    }
}

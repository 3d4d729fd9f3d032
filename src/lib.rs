//! A client-side implementation of the MongoDB wire protocol: message
//! framing, the eight opcode-specific payload encodings plus the
//! `OP_COMPRESSED` wrapper, and the asynchronous connection multiplexer that
//! pairs each outbound request with its eventual reply.
//!
//! The wire codec (`opcode`, `header`, `frame`, `message`) is pure and
//! synchronous; it does not know about sockets. [`connection::Multiplexer`]
//! is the only piece that touches I/O, and it is generic over anything
//! implementing `AsyncRead + AsyncWrite` — a `TcpStream` in production, an
//! in-memory `tokio::io::duplex` pipe in tests.
//!
//! The BSON document format itself, the TCP transport, and the compression
//! backends are all external collaborators: see [`document::DocumentCodec`]
//! and [`compression::Compressor`] for the seams.

pub mod compression;
pub mod connection;
pub mod document;
pub mod error;
pub mod flags;
pub mod frame;
pub mod header;
pub mod message;
pub mod opcode;

pub use connection::{Multiplexer, PendingReply};
pub use document::{BsonCodec, DocumentCodec};
pub use error::{Error, Result};
pub use frame::FramedMessage;
pub use header::MessageHeader;
pub use opcode::OpCode;

use std::result::Result as StdResult;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unknown wire protocol opcode {0}")]
    UnknownOpcode(i32),

    #[error("malformed payload: {0}")]
    DecodeError(String),

    #[error("{0} cannot be encoded; it is decode-only")]
    EncodeUnsupported(&'static str),

    #[error("unexpected response to request id {0}")]
    UnexpectedResponse(i32),

    #[error("transport error: {0}")]
    TransportError(String),

    #[error("not connected")]
    Disconnected,

    #[error("duplicate request id {0}")]
    DuplicateRequestId(i32),

    #[error("unknown compressor id {0}")]
    UnknownCompressor(u8),

    #[error("{0}")]
    Msg(String),
}

pub type Result<T> = StdResult<T, Error>;

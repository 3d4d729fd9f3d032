//! OP_COMPRESSED compressor backends.
//!
//! Each compressor is an opaque codec keyed by a one-byte wire identifier.
//! Only the backends actually compiled in (via Cargo features) are
//! registered; `compressor_by_id` fails with [`Error::UnknownCompressor`]
//! for anything else.

use crate::error::{Error, Result};

mod noop;
#[cfg(feature = "compression-snappy")]
mod snappy;
#[cfg(feature = "compression-zlib")]
mod zlib;
#[cfg(feature = "compression-zstd")]
mod zstd_backend;

pub use noop::NoopCompressor;
#[cfg(feature = "compression-snappy")]
pub use snappy::SnappyCompressor;
#[cfg(feature = "compression-zlib")]
pub use zlib::ZlibCompressor;
#[cfg(feature = "compression-zstd")]
pub use zstd_backend::ZstdCompressor;

/// Wire identifier for the `noop` compressor.
pub const ID_NOOP: u8 = 0;
/// Wire identifier for the `snappy` compressor.
pub const ID_SNAPPY: u8 = 1;
/// Wire identifier for the `zlib` compressor.
pub const ID_ZLIB: u8 = 2;
/// Wire identifier for the `zstd` compressor.
pub const ID_ZSTD: u8 = 3;

/// A compression backend usable with OP_COMPRESSED.
pub trait Compressor: Send + Sync {
    /// The wire identifier used in the OP_COMPRESSED header.
    fn id(&self) -> u8;

    /// The name used to negotiate this compressor during a `hello` handshake.
    fn name(&self) -> &'static str;

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Resolves a compressor by its wire id among those compiled into this build.
pub fn compressor_by_id(id: u8) -> Result<&'static dyn Compressor> {
    match id {
        ID_NOOP => Ok(&noop::NoopCompressor),
        #[cfg(feature = "compression-snappy")]
        ID_SNAPPY => Ok(&snappy::SnappyCompressor),
        #[cfg(feature = "compression-zlib")]
        ID_ZLIB => Ok(&zlib::ZlibCompressor),
        #[cfg(feature = "compression-zstd")]
        ID_ZSTD => Ok(&zstd_backend::ZstdCompressor),
        other => Err(Error::UnknownCompressor(other)),
    }
}

/// The wire ids of the compressors actually compiled into this build, for use
/// when advertising `compression` support during a `hello` handshake.
pub fn registered_compressor_ids() -> Vec<u8> {
    let mut ids = vec![ID_NOOP];
    #[cfg(feature = "compression-snappy")]
    ids.push(ID_SNAPPY);
    #[cfg(feature = "compression-zlib")]
    ids.push(ID_ZLIB);
    #[cfg(feature = "compression-zstd")]
    ids.push(ID_ZSTD);
    ids
}

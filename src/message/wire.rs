//! Bounds-checked little-endian integer reads shared by the payload decoders.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Error, Result};

pub(crate) fn read_i32(cursor: &mut Cursor<&[u8]>) -> Result<i32> {
    cursor
        .read_i32::<LittleEndian>()
        .map_err(|e| Error::DecodeError(format!("truncated frame reading i32: {e}")))
}

pub(crate) fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    cursor
        .read_u32::<LittleEndian>()
        .map_err(|e| Error::DecodeError(format!("truncated frame reading u32: {e}")))
}

pub(crate) fn read_i64(cursor: &mut Cursor<&[u8]>) -> Result<i64> {
    cursor
        .read_i64::<LittleEndian>()
        .map_err(|e| Error::DecodeError(format!("truncated frame reading i64: {e}")))
}

pub(crate) fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8> {
    cursor
        .read_u8()
        .map_err(|e| Error::DecodeError(format!("truncated frame reading u8: {e}")))
}

//! Literal data packets (tag 11). Ref: RFC 4880, section 5.9.

use std::io;

use byteorder::{BigEndian, WriteBytesExt};

use crate::errors::{Error, Result};
use crate::parsing::BufParsing;
use crate::types::{header_len, write_header, Tag};

/// Binary format marker.
pub const FORMAT_BINARY: u8 = b'b';
/// Text format marker.
pub const FORMAT_TEXT: u8 = b't';

/// A parsed literal data body, borrowing from the packet buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralData<'a> {
    pub format: u8,
    pub file_name: &'a [u8],
    /// Modification time, seconds since the epoch, 0 for "unknown".
    pub mtime: u32,
    pub payload: &'a [u8],
}

impl<'a> LiteralData<'a> {
    pub fn from_slice(body: &'a [u8]) -> Result<LiteralData<'a>> {
        let mut buf = body;
        let format = buf.read_u8()?;
        let name_len = buf.read_u8()?;
        let file_name = buf.read_take(usize::from(name_len))?;
        let mtime = buf.read_be_u32()?;
        Ok(LiteralData {
            format,
            file_name,
            mtime,
            payload: buf,
        })
    }
}

/// The full packet size (header included) `write_packet` will produce.
pub fn packet_len(file_name: &[u8], payload_len: usize) -> usize {
    let body_len = 2 + file_name.len() + 4 + payload_len;
    header_len(body_len) + body_len
}

/// Write a whole literal data packet, header included.
pub fn write_packet<W: io::Write>(
    writer: &mut W,
    format: u8,
    file_name: &[u8],
    mtime: u32,
    payload: &[u8],
) -> Result<()> {
    if file_name.len() > 0xff {
        return Err(Error::InvalidValue);
    }

    let body_len = 2 + file_name.len() + 4 + payload.len();
    write_header(writer, Tag::LiteralData, body_len)?;
    writer.write_u8(format)?;
    writer.write_u8(file_name.len() as u8)?;
    writer.write_all(file_name)?;
    writer.write_u32::<BigEndian>(mtime)?;
    writer.write_all(payload)?;
    Ok(())
}

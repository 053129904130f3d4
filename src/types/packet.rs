//! Packet framing: cipher type byte and length decoding.
//!
//! Both the old and the new header format are read; headers written by this
//! crate are always new format with the shortest possible length encoding.
//! Ref: RFC 4880, section 4.

use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::errors::{Error, Result};
use crate::parsing::BufParsing;

/// Packet type ids. Ref: RFC 4880, section 4.3.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Tag {
    /// Public-Key Encrypted Session Key Packet
    PublicKeyEncryptedSessionKey = 1,
    /// Signature Packet
    Signature = 2,
    /// Symmetric-Key Encrypted Session Key Packet
    SymKeyEncryptedSessionKey = 3,
    /// One-Pass Signature Packet
    OnePassSignature = 4,
    /// Secret-Key Packet
    SecretKey = 5,
    /// Public-Key Packet
    PublicKey = 6,
    /// Secret-Subkey Packet
    SecretSubkey = 7,
    /// Compressed Data Packet
    CompressedData = 8,
    /// Symmetrically Encrypted Data Packet
    SymEncryptedData = 9,
    /// Marker Packet
    Marker = 10,
    /// Literal Data Packet
    LiteralData = 11,
    /// Trust Packet
    Trust = 12,
    /// User ID Packet
    UserId = 13,
    /// Public-Subkey Packet
    PublicSubkey = 14,
    /// User Attribute Packet
    UserAttribute = 17,
    /// Sym. Encrypted and Integrity Protected Data Packet
    SymEncryptedProtectedData = 18,
    /// Modification Detection Code Packet
    ModDetectionCode = 19,
    #[num_enum(catch_all)]
    Other(u8),
}

impl Tag {
    pub fn encode(self) -> u8 {
        self.into()
    }

    /// Tags that may legally carry a partial length body.
    fn allows_partial(self) -> bool {
        matches!(
            self,
            Tag::CompressedData
                | Tag::SymEncryptedData
                | Tag::LiteralData
                | Tag::SymEncryptedProtectedData
        )
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PacketHeaderFormat {
    /// Old lengths: the CTB carries the width of the length field.
    Old,
    /// New lengths: variable width, derived from the first length octet.
    New,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PacketHeader {
    pub tag: Tag,
    pub format: PacketHeaderFormat,
    /// Number of octets the CTB and length field occupy.
    pub header_len: usize,
    /// Number of octets in the packet body.
    pub body_len: usize,
}

impl PacketHeader {
    /// Decode a packet header from the front of `buf`, advancing the slice
    /// past it. The body is not consumed.
    pub fn from_slice(buf: &mut &[u8]) -> Result<PacketHeader> {
        let start_len = buf.len();
        if buf.is_empty() {
            return Err(Error::NoData);
        }
        let ctb = buf.read_u8()?;
        if ctb & 0x80 == 0 {
            return Err(Error::InvalidPacket);
        }

        let (tag, format, body_len) = if ctb & 0x40 != 0 {
            // New style CTB.
            let tag = Tag::from(ctb & 0x3f);
            let c = buf.read_u8().map_err(|_| Error::InvalidPacket)?;
            let len = match c {
                0..=191 => usize::from(c),
                192..=223 => {
                    let c2 = buf.read_u8().map_err(|_| Error::InvalidPacket)?;
                    (usize::from(c) - 192) * 256 + usize::from(c2) + 192
                }
                255 => buf.read_be_u32().map_err(|_| Error::InvalidPacket)? as usize,
                _ => {
                    // Partial body length.
                    if !tag.allows_partial() {
                        return Err(Error::InvalidPacket);
                    }
                    return Err(Error::not_implemented("partial length bodies"));
                }
            };
            (tag, PacketHeaderFormat::New, len)
        } else {
            // Old style CTB.
            let tag = Tag::from((ctb >> 2) & 0x0f);
            if ctb & 3 == 3 {
                // No length octets, as used by old compressed packets.
                return Err(Error::not_implemented("indeterminate length packets"));
            }
            let lenbytes = 1usize << (ctb & 3);
            let mut len = 0usize;
            for _ in 0..lenbytes {
                let c = buf.read_u8().map_err(|_| Error::InvalidPacket)?;
                len = len << 8 | usize::from(c);
            }
            (tag, PacketHeaderFormat::Old, len)
        };

        // Basic sanity checks.
        let raw: u8 = tag.into();
        if raw < 1 || raw > 110 || body_len == 0xffff_ffff {
            return Err(Error::InvalidPacket);
        }

        Ok(PacketHeader {
            tag,
            format,
            header_len: start_len - buf.len(),
            body_len,
        })
    }
}

/// The size of a minimal new format header (CTB plus length) for a body of
/// `body_len` octets.
pub fn header_len(body_len: usize) -> usize {
    if body_len < 192 {
        2
    } else if body_len < 8384 {
        3
    } else {
        5
    }
}

/// Write a minimal new format packet header.
pub fn write_header<W: io::Write>(writer: &mut W, tag: Tag, body_len: usize) -> Result<()> {
    let raw = tag.encode();
    if raw >= 1 << 6 {
        return Err(Error::Bug {
            what: "packet tag does not fit a new style CTB",
        });
    }
    if body_len > u32::MAX as usize {
        return Err(Error::InvalidValue);
    }

    writer.write_u8(0x80 | 0x40 | raw)?;
    match header_len(body_len) {
        2 => writer.write_u8(body_len as u8)?,
        3 => {
            let l = body_len - 192;
            writer.write_u8((l / 256 + 192) as u8)?;
            writer.write_u8((l % 256) as u8)?;
        }
        _ => {
            writer.write_u8(255)?;
            writer.write_u32::<BigEndian>(body_len as u32)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn parse(raw: &[u8]) -> Result<PacketHeader> {
        let mut buf = raw;
        PacketHeader::from_slice(&mut buf)
    }

    #[test]
    fn new_format_lengths() {
        let hdr = parse(&[0xcb, 0x05]).unwrap();
        assert_eq!(hdr.tag, Tag::LiteralData);
        assert_eq!(hdr.format, PacketHeaderFormat::New);
        assert_eq!((hdr.header_len, hdr.body_len), (2, 5));

        // two octet form: (c1 - 192) * 256 + c2 + 192
        let hdr = parse(&[0xc9, 0xc0, 0x00]).unwrap();
        assert_eq!((hdr.header_len, hdr.body_len), (3, 192));

        let hdr = parse(&[0xc9, 0xdf, 0xff]).unwrap();
        assert_eq!((hdr.header_len, hdr.body_len), (3, 8383));

        // five octet form
        let hdr = parse(&[0xc9, 0xff, 0x00, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!((hdr.header_len, hdr.body_len), (6, 65536));
    }

    #[test]
    fn old_format_lengths() {
        // 0x98 = old format, tag 6, one length octet
        let hdr = parse(&[0x98, 0x05]).unwrap();
        assert_eq!(hdr.tag, Tag::PublicKey);
        assert_eq!(hdr.format, PacketHeaderFormat::Old);
        assert_eq!((hdr.header_len, hdr.body_len), (2, 5));

        // two length octets
        let hdr = parse(&[0x99, 0x01, 0x00]).unwrap();
        assert_eq!((hdr.header_len, hdr.body_len), (3, 256));

        // four length octets
        let hdr = parse(&[0x9a, 0x00, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!((hdr.header_len, hdr.body_len), (5, 65536));
    }

    #[test]
    fn invalid_ctb() {
        assert!(matches!(parse(&[0x05, 0x00]), Err(Error::InvalidPacket)));
        assert!(matches!(parse(&[]), Err(Error::NoData)));
        // tag 0, new and old format
        assert!(matches!(parse(&[0xc0, 0x00]), Err(Error::InvalidPacket)));
        assert!(matches!(parse(&[0x80, 0x00]), Err(Error::InvalidPacket)));
    }

    #[test]
    fn partial_lengths_are_not_implemented() {
        // tag 9 may carry partial lengths, but we do not decode them
        assert!(matches!(
            parse(&[0xc9, 0xe0]),
            Err(Error::NotImplemented { .. })
        ));
        // tag 1 may not carry them at all
        assert!(matches!(parse(&[0xc1, 0xe0]), Err(Error::InvalidPacket)));
        // old format indeterminate length
        assert!(matches!(
            parse(&[0x9b, 0x00]),
            Err(Error::NotImplemented { .. })
        ));
    }

    #[test]
    fn truncated_length_field() {
        assert!(matches!(parse(&[0xc9]), Err(Error::InvalidPacket)));
        assert!(matches!(parse(&[0xc9, 0xc0]), Err(Error::InvalidPacket)));
        assert!(matches!(
            parse(&[0xc9, 0xff, 0x00, 0x01]),
            Err(Error::InvalidPacket)
        ));
    }

    proptest! {
        #[test]
        fn header_round_trip(len in 0usize..100_000) {
            let mut buf = Vec::new();
            write_header(&mut buf, Tag::SymEncryptedData, len).unwrap();
            prop_assert_eq!(buf.len(), header_len(len));

            let mut cursor = &buf[..];
            let hdr = PacketHeader::from_slice(&mut cursor).unwrap();
            prop_assert!(cursor.is_empty());
            prop_assert_eq!(hdr.tag, Tag::SymEncryptedData);
            prop_assert_eq!(hdr.body_len, len);
            prop_assert_eq!(hdr.header_len, header_len(len));
        }
    }
}

//! Iterating over the packets of a message buffer.

use log::debug;

use crate::errors::{Error, Result};
use crate::types::{PacketHeader, Tag};

/// One framed packet, borrowing its body from the message buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPacket<'a> {
    pub tag: Tag,
    pub body: &'a [u8],
    /// Octets the header occupied in front of `body`.
    pub header_len: usize,
}

/// Walks a byte slice packet by packet.
///
/// The iterator ends when the buffer is exhausted; a framing error is
/// yielded once and terminates the walk.
#[derive(Debug, Clone)]
pub struct PacketParser<'a> {
    buf: &'a [u8],
    failed: bool,
}

impl<'a> PacketParser<'a> {
    pub fn new(buf: &'a [u8]) -> PacketParser<'a> {
        PacketParser { buf, failed: false }
    }
}

impl<'a> Iterator for PacketParser<'a> {
    type Item = Result<RawPacket<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.buf.is_empty() {
            return None;
        }

        let mut cursor = self.buf;
        let header = match PacketHeader::from_slice(&mut cursor) {
            Ok(header) => header,
            Err(err) => {
                self.failed = true;
                return Some(Err(err));
            }
        };
        if header.body_len > cursor.len() {
            self.failed = true;
            return Some(Err(Error::InvalidPacket));
        }

        let (body, rest) = cursor.split_at(header.body_len);
        self.buf = rest;
        debug!(
            "packet {:?}, {} header + {} body bytes",
            header.tag, header.header_len, header.body_len
        );
        Some(Ok(RawPacket {
            tag: header.tag,
            body,
            header_len: header.header_len,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_consecutive_packets() {
        // a marker packet ("PGP") followed by a one byte literal body
        let raw = [0xca, 0x03, b'P', b'G', b'P', 0xcb, 0x01, 0xff];
        let packets: Vec<_> = PacketParser::new(&raw).collect::<Result<_, _>>().unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].tag, Tag::Marker);
        assert_eq!(packets[0].body, b"PGP");
        assert_eq!(packets[1].tag, Tag::LiteralData);
        assert_eq!(packets[1].body, &[0xff]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(PacketParser::new(&[]).count(), 0);
    }

    #[test]
    fn oversized_body_is_invalid() {
        let raw = [0xca, 0x07, b'P', b'G', b'P'];
        let mut parser = PacketParser::new(&raw);
        assert!(matches!(parser.next(), Some(Err(Error::InvalidPacket))));
        // the walk stops after the first error
        assert!(parser.next().is_none());
    }

    #[test]
    fn garbage_is_invalid() {
        let raw = [0x13, 0x00];
        let mut parser = PacketParser::new(&raw);
        assert!(matches!(parser.next(), Some(Err(Error::InvalidPacket))));
    }
}

//! Classifying a packet stream by its first significant packet.

use log::debug;

use crate::errors::{Error, Result};
use crate::message::MessageType;
use crate::packet::PacketParser;
use crate::types::Tag;

/// Decide what kind of message `data` holds.
///
/// Leading marker packets are ignored. The caller maps `NoData` and
/// `UnexpectedPacket` onto the soft `Unknown`/`Invalid` results; everything
/// else is a hard error.
pub(crate) fn identify_packets(data: &[u8]) -> Result<MessageType> {
    let mut any_packets = false;

    for packet in PacketParser::new(data) {
        let packet = packet?;
        if !any_packets && packet.tag == Tag::Marker {
            continue;
        }
        any_packets = true;

        match packet.tag {
            Tag::SymEncryptedData => {
                // Old style symmetric-only messages are not supported.
                return Err(Error::not_implemented("old style symmetric messages"));
            }
            Tag::SymKeyEncryptedSessionKey => {
                // No symmetric decryption; skip these and hope for a
                // public key encrypted session key.
            }
            Tag::PublicKeyEncryptedSessionKey => {
                debug!("identified an encrypted message");
                return Ok(MessageType::Encrypted);
            }
            Tag::OnePassSignature | Tag::Signature => {
                return Ok(MessageType::Signed);
            }
            Tag::LiteralData | Tag::CompressedData => {
                return Err(Error::not_implemented("plain or compressed messages"));
            }
            Tag::PublicKey | Tag::SecretKey => {
                return Ok(MessageType::KeyData);
            }
            other => {
                return Err(Error::UnexpectedPacket {
                    tag: other.encode(),
                });
            }
        }
    }

    Err(Error::NoData)
}

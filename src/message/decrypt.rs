//! The decrypt pipeline.

use log::debug;
use zeroize::Zeroizing;

use crate::crypto::hash::sha1;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::crypto::{checksum, eme_pkcs1, rsa};
use crate::data::Data;
use crate::errors::{Error, Result};
use crate::keystore::Keystore;
use crate::packet::literal_data::LiteralData;
use crate::packet::pkesk::Pkesk;
use crate::packet::PacketParser;
use crate::types::Tag;
use crate::Flags;

/// The pieces of an encrypted message the walk below collects: the first
/// PKESK one of our keys can open, and the encrypted data packet.
#[derive(Debug)]
struct EncryptedMessage<'a> {
    pkesk: Pkesk<'a>,
    /// Body of the encrypted data packet, version octet included for MDC.
    body: &'a [u8],
    mdc: bool,
}

/// Walk the packets of `msg` and collect what decryption needs.
fn parse_encrypted_message<'a>(keystore: &Keystore, msg: &'a [u8]) -> Result<EncryptedMessage<'a>> {
    let mut any_packets = false;
    let mut any_enc_seen = false;
    let mut matched: Option<Pkesk<'a>> = None;

    for packet in PacketParser::new(msg) {
        let packet = packet?;
        if !any_packets && packet.tag == Tag::Marker {
            continue;
        }
        any_packets = true;

        match packet.tag {
            Tag::SymKeyEncryptedSessionKey => {
                // Not supported; skip and hope for a public key ESK.
                any_enc_seen = true;
            }
            Tag::PublicKeyEncryptedSessionKey => {
                any_enc_seen = true;
                if matched.is_none() {
                    let pkesk = Pkesk::from_slice(packet.body)?;
                    if keystore.has_secret_key(pkesk.algorithm, pkesk.key_id) {
                        matched = Some(pkesk);
                    }
                }
            }
            Tag::SymEncryptedData | Tag::SymEncryptedProtectedData => {
                if !any_enc_seen {
                    // An encrypted packet without any ESK in front is an
                    // old style symmetric message.
                    return Err(Error::not_implemented("old style symmetric messages"));
                }
                let Some(pkesk) = matched else {
                    return Err(Error::NoSecKey);
                };
                return Ok(EncryptedMessage {
                    pkesk,
                    body: packet.body,
                    mdc: packet.tag == Tag::SymEncryptedProtectedData,
                });
            }
            other => {
                return Err(Error::UnexpectedPacket {
                    tag: other.encode(),
                });
            }
        }
    }

    if any_enc_seen {
        Err(Error::InvalidMessage)
    } else {
        Err(Error::NoData)
    }
}

/// Recover the symmetric algorithm and session key from the PKESK.
fn decrypt_session_key(
    keystore: &Keystore,
    pkesk: &Pkesk<'_>,
) -> Result<(SymmetricKeyAlgorithm, Zeroizing<Vec<u8>>)> {
    let record = keystore.secret_key(pkesk.algorithm, pkesk.key_id)?;
    debug!("decrypting session key for {}", record.key_id());

    let em = rsa::decrypt(record.mpis(), pkesk.encrypted[0])?;
    let frame = eme_pkcs1::decode(&em)?;
    let (algo, seskey) = checksum::read_session_key_frame(frame)?;
    Ok((SymmetricKeyAlgorithm::from(algo), seskey))
}

/// Decrypt the message in `cipher`; the payload replaces the contents of
/// `plain`, which is resized to fit.
pub(crate) fn decrypt(
    keystore: &Keystore,
    flags: Flags,
    cipher: &[u8],
    plain: &mut Data<'_>,
) -> Result<()> {
    let message = parse_encrypted_message(keystore, cipher)?;

    if !message.mdc && flags.contains(Flags::MANDATORY_MDC) {
        return Err(Error::MdcFailed);
    }

    let (sym, seskey) = decrypt_session_key(keystore, &message.pkesk)?;
    let bs = sym.block_size()?;
    debug!("session key algorithm {:?}, mdc {}", sym, message.mdc);

    let mut body = message.body;
    if message.mdc {
        // Tag 18 bodies start with a version octet.
        if body.first() != Some(&1) {
            return Err(Error::InvalidMessage);
        }
        body = &body[1..];
    }
    if body.len() < bs + 2 {
        return Err(Error::InvalidMessage);
    }

    let mut prefix = Zeroizing::new(vec![0u8; bs + 2]);
    let mut plaintext = Zeroizing::new(vec![0u8; body.len() - bs - 2]);
    if message.mdc {
        sym.decrypt_protected(&seskey, body, &mut prefix, &mut plaintext)?;
    } else {
        sym.decrypt(&seskey, body, &mut prefix, &mut plaintext)?;
    }

    // The last two prefix bytes repeat the two before them; this is the
    // quick check that the session key fit.
    if prefix[bs - 2] != prefix[bs] || prefix[bs - 1] != prefix[bs + 1] {
        return Err(Error::InvalidMessage);
    }

    // The decrypted stream is one literal data packet, followed by the MDC
    // packet when integrity protection is on.
    let mut packets = PacketParser::new(&plaintext);
    let literal_packet = packets.next().ok_or(Error::InvalidMessage)??;
    if literal_packet.tag != Tag::LiteralData {
        return Err(Error::UnexpectedPacket {
            tag: literal_packet.tag.encode(),
        });
    }
    let literal = LiteralData::from_slice(literal_packet.body)?;

    if message.mdc {
        let mdc_packet = packets.next().ok_or(Error::MdcFailed)??;
        if mdc_packet.tag != Tag::ModDetectionCode
            || mdc_packet.body.len() != 20
            || packets.next().is_some()
        {
            return Err(Error::MdcFailed);
        }
        // SHA-1 over prefix and everything up to and including the MDC
        // packet header.
        let hashed = &plaintext[..plaintext.len() - 20];
        let digest = sha1(&[&prefix[..], hashed]);
        if digest != mdc_packet.body[..] {
            return Err(Error::MdcFailed);
        }
    } else if packets.next().is_some() {
        return Err(Error::InvalidMessage);
    }

    plain.resize(literal.payload.len());
    plain.make_mut().copy_from_slice(literal.payload);
    Ok(())
}

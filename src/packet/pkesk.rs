//! Public-Key Encrypted Session Key packets (tag 1).
//! Ref: RFC 4880, section 5.1.

use std::io;

use byteorder::WriteBytesExt;

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::{Error, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{header_len, write_header, KeyId, Mpi, MpiRef, Tag};

/// A parsed PKESK body. The encrypted session key MPIs borrow from the
/// packet buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkesk<'a> {
    pub version: u8,
    pub key_id: KeyId,
    pub algorithm: PublicKeyAlgorithm,
    /// One MPI for RSA, two for ElGamal.
    pub encrypted: Vec<MpiRef<'a>>,
}

impl<'a> Pkesk<'a> {
    pub fn from_slice(body: &'a [u8]) -> Result<Pkesk<'a>> {
        if body.len() < 10 {
            return Err(Error::InvalidPacket);
        }
        let mut buf = body;
        let version = buf.read_u8()?;
        if version != 2 && version != 3 {
            return Err(Error::InvalidPacket);
        }
        let key_id = KeyId::from_slice(buf.read_take(8)?)?;
        let algorithm = PublicKeyAlgorithm::from(buf.read_u8()?);

        let nenc = algorithm.encrypted_mpi_count();
        if nenc == 0 {
            return Err(Error::InvalidAlgo {
                algo: algorithm.into(),
            });
        }
        let mut encrypted = Vec::with_capacity(nenc);
        for _ in 0..nenc {
            encrypted.push(MpiRef::from_slice(&mut buf)?);
        }
        if !buf.is_empty() {
            return Err(Error::InvalidPacket); // Trailing garbage.
        }

        Ok(Pkesk {
            version,
            key_id,
            algorithm,
            encrypted,
        })
    }
}

/// The full packet size (header included) `write_packet` will produce.
pub fn packet_len(encrypted: &[Mpi]) -> usize {
    let body_len = 10 + encrypted.iter().map(|m| m.write_len()).sum::<usize>();
    header_len(body_len) + body_len
}

/// Write a whole version 3 PKESK packet, header included.
pub fn write_packet<W: io::Write>(
    writer: &mut W,
    key_id: &KeyId,
    algorithm: PublicKeyAlgorithm,
    encrypted: &[Mpi],
) -> Result<()> {
    let body_len = 10 + encrypted.iter().map(|m| m.write_len()).sum::<usize>();
    write_header(writer, Tag::PublicKeyEncryptedSessionKey, body_len)?;

    writer.write_u8(3)?;
    writer.write_all(key_id.as_bytes())?;
    writer.write_u8(algorithm.into())?;
    for mpi in encrypted {
        mpi.to_writer(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use crate::packet::parser::PacketParser;

    use super::*;

    #[test]
    fn packet_round_trip() {
        let key_id = KeyId::from_halves(0x907b5d16, 0x40619dd0);
        let encrypted = vec![Mpi::from_raw(&hex!("c0ffee"))];

        let mut raw = Vec::new();
        write_packet(&mut raw, &key_id, PublicKeyAlgorithm::Rsa, &encrypted).unwrap();
        assert_eq!(raw.len(), packet_len(&encrypted));

        let packet = PacketParser::new(&raw).next().unwrap().unwrap();
        assert_eq!(packet.tag, Tag::PublicKeyEncryptedSessionKey);

        let pkesk = Pkesk::from_slice(packet.body).unwrap();
        assert_eq!(pkesk.version, 3);
        assert_eq!(pkesk.key_id, key_id);
        assert_eq!(pkesk.algorithm, PublicKeyAlgorithm::Rsa);
        assert_eq!(pkesk.encrypted.len(), 1);
        assert_eq!(pkesk.encrypted[0].as_bytes(), &hex!("c0ffee"));
    }

    #[test]
    fn version_2_parses() {
        let mut body = vec![2u8];
        body.extend_from_slice(&hex!("deadbeefdeadbeef"));
        body.push(1); // RSA
        body.extend_from_slice(&hex!("0008 aa"));
        let pkesk = Pkesk::from_slice(&body).unwrap();
        assert_eq!(pkesk.version, 2);
    }

    #[test]
    fn bad_version_is_rejected() {
        let mut body = vec![5u8];
        body.extend_from_slice(&hex!("deadbeefdeadbeef"));
        body.push(1);
        body.extend_from_slice(&hex!("0008 aa"));
        assert!(matches!(
            Pkesk::from_slice(&body),
            Err(Error::InvalidPacket)
        ));
    }

    #[test]
    fn dsa_cannot_carry_a_session_key() {
        let mut body = vec![3u8];
        body.extend_from_slice(&hex!("deadbeefdeadbeef"));
        body.push(17); // DSA
        body.extend_from_slice(&hex!("0008 aa"));
        assert!(matches!(
            Pkesk::from_slice(&body),
            Err(Error::InvalidAlgo { algo: 17 })
        ));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let mut body = vec![3u8];
        body.extend_from_slice(&hex!("deadbeefdeadbeef"));
        body.push(1);
        body.extend_from_slice(&hex!("0008 aa 00"));
        assert!(matches!(
            Pkesk::from_slice(&body),
            Err(Error::InvalidPacket)
        ));
    }

    #[test]
    fn truncated_mpi_is_invalid() {
        let mut body = vec![3u8];
        body.extend_from_slice(&hex!("deadbeefdeadbeef"));
        body.push(1);
        body.extend_from_slice(&hex!("0020 aa"));
        assert!(matches!(Pkesk::from_slice(&body), Err(Error::InvalidMpi)));
    }
}

//! The 16 bit additive checksum and the session key frame it protects.
//!
//! After the RSA layer and the PKCS#1 padding are peeled off, the session
//! key travels as `algo || key bytes || checksum`, where the checksum is
//! the sum of the key bytes mod 65536 (RFC 4880, section 5.1).

use byteorder::{BigEndian, WriteBytesExt};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Sum of all bytes mod 2^16.
pub fn checksum(data: &[u8]) -> u16 {
    data.iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)))
}

/// Split a decrypted session key frame into algorithm id and key bytes,
/// verifying the trailing checksum.
///
/// A frame that fails these checks almost certainly went through the wrong
/// RSA key, hence `WrongKey`.
pub fn read_session_key_frame(frame: &[u8]) -> Result<(u8, Zeroizing<Vec<u8>>)> {
    if frame.len() < 4 {
        return Err(Error::WrongKey);
    }
    let algo = frame[0];
    let key = &frame[1..frame.len() - 2];
    let csum = u16::from_be_bytes([frame[frame.len() - 2], frame[frame.len() - 1]]);
    if checksum(key) != csum {
        return Err(Error::WrongKey);
    }
    Ok((algo, Zeroizing::new(key.to_vec())))
}

/// Append `algo || key || checksum` to `out`.
pub fn write_session_key_frame(out: &mut Vec<u8>, algo: u8, key: &[u8]) -> Result<()> {
    out.write_u8(algo)?;
    out.extend_from_slice(key);
    out.write_u16::<BigEndian>(checksum(key))?;
    Ok(())
}

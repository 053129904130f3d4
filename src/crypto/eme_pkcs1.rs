//! EME-PKCS1-v1_5 in its OpenPGP flavor.
//!
//! OpenPGP transports the RSA input as an MPI, which drops the leading
//! zero octet of the PKCS#1 block. So the block handled here starts with
//! the type octet `0x02` directly: `02 || PS || 00 || M`, where PS is at
//! least eight non zero random octets. Ref: RFC 4880, section 13.1.

use rand::{CryptoRng, Rng};

use crate::errors::{Error, Result};

/// Fill `em` with the to-be-prepended encoding `02 || PS || 00`. The
/// message itself is appended by the caller.
pub fn encode<R: CryptoRng + Rng>(mut rng: R, em: &mut [u8]) -> Result<()> {
    if em.len() < 10 {
        return Err(Error::Bug {
            what: "PKCS#1 encoding needs at least 8 padding octets",
        });
    }

    let last = em.len() - 1;
    em[0] = 2;
    rng.fill(&mut em[1..last]);
    for b in &mut em[1..last] {
        while *b == 0 {
            *b = rng.gen();
        }
    }
    em[last] = 0;
    Ok(())
}

/// Recover the message from a decoded block, returning it as a borrowed
/// slice.
///
/// A malformed block is the expected outcome of decrypting with the wrong
/// RSA private key, so every failure here is `WrongKey`.
pub fn decode(em: &[u8]) -> Result<&[u8]> {
    if em.len() < 10 || em[0] != 2 {
        return Err(Error::WrongKey);
    }

    // Skip the random part.
    let mut n = 2;
    while n < em.len() && em[n] != 0 {
        n += 1;
    }
    if n >= em.len() {
        return Err(Error::WrongKey); // No terminating zero.
    }
    if n < 9 {
        return Err(Error::WrongKey); // Not enough random bytes.
    }

    Ok(&em[n + 1..])
}

//! Raw RSA on keystore material.
//!
//! The PKCS#1 layer lives in [`crate::crypto::eme_pkcs1`]; here the RSA
//! primitive runs bare, which is why the `hazmat` functions of the `rsa`
//! crate are used.

use num_bigint::BigUint;
use rsa::hazmat::{rsa_decrypt_and_check, rsa_encrypt};
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};
use crate::types::{Mpi, MpiRef};

/// Secret key MPIs in keystore order: n, e, d, p, q, u.
///
/// The CRT helper u (p^-1 mod q, as gcrypt stores it) rides along in the
/// keystore format but is not consumed here; the `rsa` crate derives its
/// own CRT parameters from the primes.
pub const SECRET_KEY_MPIS: usize = 6;

/// Decrypt one encrypted MPI under the given secret key.
///
/// The result is the RSA plaintext integer as bytes, leading zero octets
/// stripped the same way MPI encoding strips them.
pub fn decrypt(seckey: &[Mpi], encdat: MpiRef<'_>) -> Result<Zeroizing<Vec<u8>>> {
    if seckey.len() < SECRET_KEY_MPIS {
        return Err(Error::Bug {
            what: "short RSA secret key record",
        });
    }

    let key = RsaPrivateKey::from_components(
        seckey[0].to_biguint(),
        seckey[1].to_biguint(),
        seckey[2].to_biguint(),
        vec![seckey[3].to_biguint(), seckey[4].to_biguint()],
    )?;

    let c = encdat.to_biguint();
    let m = rsa_decrypt_and_check(&key, None::<&mut rand::rngs::ThreadRng>, &c)?;
    Ok(Zeroizing::new(m.to_bytes_be()))
}

/// Encrypt an EME block under the public parts n and e, producing the
/// encrypted session key MPI.
pub fn encrypt(n: &Mpi, e: &Mpi, em: &[u8]) -> Result<Mpi> {
    let key = RsaPublicKey::new(n.to_biguint(), e.to_biguint())?;
    let m = BigUint::from_bytes_be(em);
    let c = rsa_encrypt(&key, &m)?;
    Ok(Mpi::from_biguint(&c))
}

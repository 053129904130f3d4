//! The compiled in secret key table.
//!
//! Keys are handed to [`crate::Context`] at construction; there is no
//! on-disk keyring. The companion `tinypgp-keystore` tool turns a canonical
//! S-expression private key into the source text of such a table.

use log::debug;

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::rsa::SECRET_KEY_MPIS;
use crate::errors::{Error, Result};
use crate::types::{KeyId, Mpi};

/// One secret key: algorithm, key id, and the key MPIs.
///
/// For RSA the MPIs are n, e, d, p, q, u in that order, u being p^-1 mod q
/// as gcrypt style keys store it.
#[derive(Debug, Clone)]
pub struct KeyRecord {
    algorithm: PublicKeyAlgorithm,
    key_id: KeyId,
    mpis: Vec<Mpi>,
}

impl KeyRecord {
    /// Build an RSA record from raw big endian magnitudes.
    pub fn rsa(key_id: KeyId, n: &[u8], e: &[u8], d: &[u8], p: &[u8], q: &[u8], u: &[u8]) -> KeyRecord {
        KeyRecord {
            algorithm: PublicKeyAlgorithm::Rsa,
            key_id,
            mpis: [n, e, d, p, q, u].iter().map(|m| Mpi::from_raw(m)).collect(),
        }
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }

    /// All key MPIs in keystore order.
    pub fn mpis(&self) -> &[Mpi] {
        &self.mpis
    }

    /// The public RSA parameters (n, e).
    pub fn public_rsa(&self) -> Result<(&Mpi, &Mpi)> {
        if self.algorithm != PublicKeyAlgorithm::Rsa || self.mpis.len() < SECRET_KEY_MPIS {
            return Err(Error::InvalidAlgo {
                algo: self.algorithm.into(),
            });
        }
        Ok((&self.mpis[0], &self.mpis[1]))
    }
}

/// The set of secret keys this process can decrypt for.
#[derive(Debug, Clone, Default)]
pub struct Keystore {
    keys: Vec<KeyRecord>,
}

impl Keystore {
    pub fn new(keys: Vec<KeyRecord>) -> Keystore {
        Keystore { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[KeyRecord] {
        &self.keys
    }

    /// Whether a secret key matching (algorithm, key id) is present.
    pub fn has_secret_key(&self, algorithm: PublicKeyAlgorithm, key_id: KeyId) -> bool {
        debug!("looking for key {} (algo {:?})", key_id, algorithm);
        self.keys
            .iter()
            .any(|k| k.algorithm == algorithm && k.key_id == key_id)
    }

    /// Fetch the secret key for (algorithm, key id).
    ///
    /// Only RSA keys can be used for decryption.
    pub fn secret_key(&self, algorithm: PublicKeyAlgorithm, key_id: KeyId) -> Result<&KeyRecord> {
        let record = self
            .keys
            .iter()
            .find(|k| k.algorithm == algorithm && k.key_id == key_id)
            .ok_or(Error::NoSecKey)?;
        if record.algorithm != PublicKeyAlgorithm::Rsa {
            return Err(Error::InvalidAlgo {
                algo: record.algorithm.into(),
            });
        }
        Ok(record)
    }
}

//! String-to-key: passphrase stretching per RFC 4880, section 3.7.

use sha1::{Digest, Sha1};

use crate::crypto::hash::HashAlgorithm;
use crate::errors::{Error, Result};

/// A string-to-key specifier.
///
/// Mode 3 (iterated and salted) is what protected private keys use; the
/// simple and salted modes exist for completeness of the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringToKey {
    /// Mode 0: hash the passphrase as is.
    Simple,
    /// Mode 1: hash salt then passphrase.
    Salted { salt: [u8; 8] },
    /// Mode 3: hash `salt || passphrase` repeated to the coded octet count.
    IteratedAndSalted { salt: [u8; 8], count: u32 },
}

impl StringToKey {
    /// Stretch `passphrase` into `key`, filling it completely.
    ///
    /// Longer keys are produced by running the hash again with one more
    /// zero byte preloaded per pass and concatenating the digests.
    pub fn derive(&self, hash: HashAlgorithm, passphrase: &[u8], key: &mut [u8]) -> Result<()> {
        if key.is_empty() {
            return Err(Error::InvalidValue);
        }
        if hash != HashAlgorithm::Sha1 {
            return Err(Error::not_implemented("s2k hashes other than SHA-1"));
        }

        let mut used = 0;
        let mut pass = 0usize;
        while used < key.len() {
            let mut md = Sha1::new();
            for _ in 0..pass {
                md.update([0u8]);
            }

            match self {
                StringToKey::Simple => md.update(passphrase),
                StringToKey::Salted { salt } | StringToKey::IteratedAndSalted { salt, .. } => {
                    let len2 = passphrase.len() as u64 + 8;
                    let mut nbytes = len2;
                    if let StringToKey::IteratedAndSalted { count, .. } = self {
                        nbytes = expand_count(*count)?.max(len2);
                    }

                    while nbytes > len2 {
                        md.update(salt);
                        md.update(passphrase);
                        nbytes -= len2;
                    }
                    // The trailing block may be cut short, possibly inside
                    // the salt.
                    let nbytes = nbytes as usize;
                    if nbytes < 8 {
                        md.update(&salt[..nbytes]);
                    } else {
                        md.update(salt);
                        md.update(&passphrase[..nbytes - 8]);
                    }
                }
            }

            let digest = md.finalize();
            let take = digest.len().min(key.len() - used);
            key[used..used + take].copy_from_slice(&digest[..take]);
            used += take;
            pass += 1;
        }
        Ok(())
    }
}

/// Decode the coded iteration count octet into a byte count:
/// `(16 + (c & 15)) << ((c >> 4) + 6)`.
fn expand_count(count: u32) -> Result<u64> {
    (16u64 + u64::from(count & 15))
        .checked_shl((count >> 4) + 6)
        .ok_or(Error::InvalidValue)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    const SALT: [u8; 8] = hex!("a09ab21a8d4bdc61");

    #[test]
    fn coded_count_expansion() {
        assert_eq!(expand_count(0).unwrap(), 1024);
        assert_eq!(expand_count(96).unwrap(), 65536);
        assert_eq!(expand_count(255).unwrap(), 65011712);
        assert!(expand_count(u32::MAX).is_err());
    }

    #[test]
    fn simple_mode_is_a_plain_hash() {
        let mut key = [0u8; 16];
        StringToKey::Simple
            .derive(HashAlgorithm::Sha1, b"abc", &mut key)
            .unwrap();
        // the first 16 bytes of SHA-1("abc")
        assert_eq!(key, hex!("a9993e364706816aba3e25717850c26c"));
    }

    #[test]
    fn salted_mode() {
        let mut key = [0u8; 16];
        StringToKey::Salted { salt: SALT }
            .derive(HashAlgorithm::Sha1, b"abc", &mut key)
            .unwrap();
        assert_eq!(key, hex!("1fafd42d39123ae49af6904a3dbd1e6e"));
    }

    #[test]
    fn iterated_mode_known_answers() {
        let s2k = StringToKey::IteratedAndSalted {
            salt: SALT,
            count: 96,
        };

        let mut key16 = [0u8; 16];
        s2k.derive(HashAlgorithm::Sha1, b"abc", &mut key16).unwrap();
        assert_eq!(key16, hex!("48befb90dcb2a9f25e8b44aa93796ea8"));

        // a second pass over the digest boundary
        let mut key24 = [0u8; 24];
        s2k.derive(HashAlgorithm::Sha1, b"abc", &mut key24).unwrap();
        assert_eq!(key24, hex!("48befb90dcb2a9f25e8b44aa93796ea8b05328182c309539"));
    }

    #[test]
    fn trailing_block_truncates_mid_passphrase() {
        // count 0 expands to 1024 bytes; with a 30 byte passphrase the
        // last repetition ends inside the passphrase
        let s2k = StringToKey::IteratedAndSalted {
            salt: SALT,
            count: 0,
        };
        let mut key = [0u8; 16];
        s2k.derive(HashAlgorithm::Sha1, b"the-quick-brown-fox-0123456789", &mut key)
            .unwrap();
        assert_eq!(key, hex!("9d763a62d98b72e8636c91426ab0923a"));
    }

    #[test]
    fn deterministic() {
        let s2k = StringToKey::IteratedAndSalted {
            salt: SALT,
            count: 96,
        };
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        s2k.derive(HashAlgorithm::Sha1, b"passphrase", &mut a).unwrap();
        s2k.derive(HashAlgorithm::Sha1, b"passphrase", &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unsupported_hash() {
        let mut key = [0u8; 16];
        assert!(matches!(
            StringToKey::Simple.derive(HashAlgorithm::Sha256, b"abc", &mut key),
            Err(Error::NotImplemented { .. })
        ));
    }
}

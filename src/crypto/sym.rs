//! Symmetric ciphers and the OpenPGP CFB modes.
//!
//! Encrypted data packets prepend a random block plus a repeat of its last
//! two bytes as a quick check. Tag 9 packets additionally resynchronize the
//! CFB register after that prefix (RFC 4880, section 13.9); tag 18 packets
//! run plain CFB over prefix and body. Both modes start from an all zero IV.

use aes::{Aes128, Aes192, Aes256};
use cast5::Cast5;
use cfb_mode::{BufDecryptor, BufEncryptor};
use cipher::block_padding::NoPadding;
use cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use des::TdesEde3;
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::errors::{Error, Result};

/// Symmetric key algorithm ids. Ref: RFC 4880, section 9.2.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SymmetricKeyAlgorithm {
    TripleDes = 2,
    Cast5 = 3,
    Aes128 = 7,
    Aes192 = 8,
    Aes256 = 9,
    #[num_enum(catch_all)]
    Unknown(u8),
}

macro_rules! dispatch {
    ($alg:expr, $f:ident ( $($args:expr),* )) => {
        match $alg {
            SymmetricKeyAlgorithm::TripleDes => $f::<TdesEde3>($($args),*),
            SymmetricKeyAlgorithm::Cast5 => $f::<Cast5>($($args),*),
            SymmetricKeyAlgorithm::Aes128 => $f::<Aes128>($($args),*),
            SymmetricKeyAlgorithm::Aes192 => $f::<Aes192>($($args),*),
            SymmetricKeyAlgorithm::Aes256 => $f::<Aes256>($($args),*),
            SymmetricKeyAlgorithm::Unknown(algo) => Err(Error::InvalidAlgo { algo }),
        }
    };
}

impl SymmetricKeyAlgorithm {
    pub fn block_size(self) -> Result<usize> {
        match self {
            SymmetricKeyAlgorithm::TripleDes | SymmetricKeyAlgorithm::Cast5 => Ok(8),
            SymmetricKeyAlgorithm::Aes128
            | SymmetricKeyAlgorithm::Aes192
            | SymmetricKeyAlgorithm::Aes256 => Ok(16),
            SymmetricKeyAlgorithm::Unknown(algo) => Err(Error::InvalidAlgo { algo }),
        }
    }

    pub fn key_size(self) -> Result<usize> {
        match self {
            SymmetricKeyAlgorithm::TripleDes => Ok(24),
            SymmetricKeyAlgorithm::Cast5 => Ok(16),
            SymmetricKeyAlgorithm::Aes128 => Ok(16),
            SymmetricKeyAlgorithm::Aes192 => Ok(24),
            SymmetricKeyAlgorithm::Aes256 => Ok(32),
            SymmetricKeyAlgorithm::Unknown(algo) => Err(Error::InvalidAlgo { algo }),
        }
    }

    /// Decrypt a tag 9 body: OpenPGP-CFB with the resync quirk.
    ///
    /// `ciphertext` covers the whole packet body. The decrypted random
    /// prefix (block size + 2 bytes) lands in `prefix`, the remainder in
    /// `out`.
    pub fn decrypt(self, key: &[u8], ciphertext: &[u8], prefix: &mut [u8], out: &mut [u8]) -> Result<()> {
        dispatch!(self, cfb_resync_decrypt(key, ciphertext, prefix, out))
    }

    /// Decrypt a tag 18 body (without its version octet): plain CFB.
    pub fn decrypt_protected(
        self,
        key: &[u8],
        ciphertext: &[u8],
        prefix: &mut [u8],
        out: &mut [u8],
    ) -> Result<()> {
        dispatch!(self, cfb_plain_decrypt(key, ciphertext, prefix, out))
    }

    /// Encrypt `prefix || body` in OpenPGP-CFB with the resync quirk
    /// (tag 9). `out` receives the whole ciphertext.
    pub fn encrypt(self, key: &[u8], prefix: &[u8], body: &[u8], out: &mut [u8]) -> Result<()> {
        dispatch!(self, cfb_resync_encrypt(key, prefix, body, out))
    }

    /// Encrypt `prefix || body` in plain CFB (tag 18 bodies).
    pub fn encrypt_protected(
        self,
        key: &[u8],
        prefix: &[u8],
        body: &[u8],
        out: &mut [u8],
    ) -> Result<()> {
        dispatch!(self, cfb_plain_encrypt(key, prefix, body, out))
    }

    /// In-place CBC decryption without padding. `data` must be a whole
    /// number of blocks.
    pub fn decrypt_cbc(self, key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()> {
        dispatch!(self, cbc_decrypt(key, iv, data))
    }

    /// In-place CBC encryption without padding. `data` must be a whole
    /// number of blocks.
    pub fn encrypt_cbc(self, key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()> {
        dispatch!(self, cbc_encrypt(key, iv, data))
    }
}

fn block_size_of<C: BlockCipher>() -> usize {
    C::block_size()
}

fn check_split(bs: usize, ciphertext: &[u8], prefix: &[u8], out: &[u8]) -> Result<()> {
    if ciphertext.len() < bs + 2 {
        return Err(Error::InvalidMessage);
    }
    if prefix.len() != bs + 2 || out.len() != ciphertext.len() - bs - 2 {
        return Err(Error::Bug {
            what: "cfb buffer sizes do not line up",
        });
    }
    Ok(())
}

fn cfb_plain_decrypt<C>(key: &[u8], ciphertext: &[u8], prefix: &mut [u8], out: &mut [u8]) -> Result<()>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let bs = block_size_of::<C>();
    check_split(bs, ciphertext, prefix, out)?;

    let iv = vec![0u8; bs];
    let mut decryptor = BufDecryptor::<C>::new_from_slices(key, &iv)?;
    prefix.copy_from_slice(&ciphertext[..bs + 2]);
    decryptor.decrypt(prefix);
    out.copy_from_slice(&ciphertext[bs + 2..]);
    decryptor.decrypt(out);
    Ok(())
}

fn cfb_resync_decrypt<C>(key: &[u8], ciphertext: &[u8], prefix: &mut [u8], out: &mut [u8]) -> Result<()>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let bs = block_size_of::<C>();
    check_split(bs, ciphertext, prefix, out)?;

    let iv = vec![0u8; bs];
    let mut decryptor = BufDecryptor::<C>::new_from_slices(key, &iv)?;
    prefix.copy_from_slice(&ciphertext[..bs + 2]);
    decryptor.decrypt(prefix);

    // Resynchronize: the register restarts on the ciphertext bytes right
    // after the two quick check bytes.
    let mut decryptor = BufDecryptor::<C>::new_from_slices(key, &ciphertext[2..bs + 2])?;
    out.copy_from_slice(&ciphertext[bs + 2..]);
    decryptor.decrypt(out);
    Ok(())
}

fn cfb_plain_encrypt<C>(key: &[u8], prefix: &[u8], body: &[u8], out: &mut [u8]) -> Result<()>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let bs = block_size_of::<C>();
    if prefix.len() != bs + 2 || out.len() != prefix.len() + body.len() {
        return Err(Error::Bug {
            what: "cfb buffer sizes do not line up",
        });
    }

    let iv = vec![0u8; bs];
    let mut encryptor = BufEncryptor::<C>::new_from_slices(key, &iv)?;
    out[..bs + 2].copy_from_slice(prefix);
    out[bs + 2..].copy_from_slice(body);
    encryptor.encrypt(out);
    Ok(())
}

fn cfb_resync_encrypt<C>(key: &[u8], prefix: &[u8], body: &[u8], out: &mut [u8]) -> Result<()>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let bs = block_size_of::<C>();
    if prefix.len() != bs + 2 || out.len() != prefix.len() + body.len() {
        return Err(Error::Bug {
            what: "cfb buffer sizes do not line up",
        });
    }

    let iv = vec![0u8; bs];
    let mut encryptor = BufEncryptor::<C>::new_from_slices(key, &iv)?;
    out[..bs + 2].copy_from_slice(prefix);
    encryptor.encrypt(&mut out[..bs + 2]);

    let resync_iv = out[2..bs + 2].to_vec();
    let mut encryptor = BufEncryptor::<C>::new_from_slices(key, &resync_iv)?;
    out[bs + 2..].copy_from_slice(body);
    encryptor.encrypt(&mut out[bs + 2..]);
    Ok(())
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    if data.len() % block_size_of::<C>() != 0 {
        return Err(Error::InvalidData);
    }
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)?;
    decryptor
        .decrypt_padded_mut::<NoPadding>(data)
        .map_err(|_| Error::CryptError)?;
    Ok(())
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let len = data.len();
    if len % block_size_of::<C>() != 0 {
        return Err(Error::InvalidData);
    }
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv)?;
    encryptor
        .encrypt_padded_mut::<NoPadding>(data, len)
        .map_err(|_| Error::CryptError)?;
    Ok(())
}

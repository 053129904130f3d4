//! # tinypgp
//!
//! A deliberately small OpenPGP (RFC 4880) library: it decrypts and
//! encrypts short messages addressed to a fixed set of RSA secret keys the
//! embedding application compiles in, and it can unprotect gpg-agent style
//! `protected-private-key` S-expressions. There is no keyring, no
//! signature verification and no web of trust.
//!
//! ```no_run
//! use tinypgp::{Context, Data, Keystore, KeyRecord};
//!
//! # fn keys() -> Vec<KeyRecord> { Vec::new() }
//! let ctx = Context::new(Keystore::new(keys()));
//!
//! let cipher = Data::from_mem(b"...an OpenPGP message...", false).unwrap();
//! let mut plain = Data::new();
//! ctx.decrypt(&cipher, &mut plain).unwrap();
//! ```

pub mod crypto;
mod data;
pub mod errors;
mod keystore;
mod message;
pub mod packet;
mod parsing;
pub mod protect;
pub mod ser;
pub mod sexp;
pub mod types;

use rand::{CryptoRng, RngCore};

pub use crate::data::Data;
pub use crate::errors::{Error, Result};
pub use crate::keystore::{KeyRecord, Keystore};
pub use crate::message::MessageType;
pub use crate::types::KeyId;

/// Process wide behavior switches, captured per [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    bits: u32,
}

impl Flags {
    /// Refuse to decrypt messages that lack integrity protection.
    pub const MANDATORY_MDC: Flags = Flags { bits: 1 };

    pub const fn empty() -> Flags {
        Flags { bits: 0 }
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl std::ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags {
            bits: self.bits | rhs.bits,
        }
    }
}

/// The anchor for all operations: the secret key table plus the flags,
/// both fixed at construction time.
///
/// Contexts are cheap; use one per thread of work. All operations run to
/// completion on the calling thread.
#[derive(Debug, Clone)]
pub struct Context {
    keystore: Keystore,
    flags: Flags,
}

impl Context {
    pub fn new(keystore: Keystore) -> Context {
        Context {
            keystore,
            flags: Flags::empty(),
        }
    }

    pub fn with_flags(keystore: Keystore, flags: Flags) -> Context {
        Context { keystore, flags }
    }

    pub fn keystore(&self) -> &Keystore {
        &self.keystore
    }

    /// Decrypt the message in `cipher`. `plain` is resized to the payload
    /// and overwritten.
    pub fn decrypt(&self, cipher: &Data<'_>, plain: &mut Data<'_>) -> Result<()> {
        message::decrypt(&self.keystore, self.flags, cipher.as_bytes(), plain)
    }

    /// Encrypt `plain` to the owner of `key` as a classic (tag 9) message.
    /// `cipher` is resized to the message and overwritten.
    pub fn encrypt<R: CryptoRng + RngCore>(
        &self,
        rng: R,
        plain: &Data<'_>,
        key: &KeyRecord,
        cipher: &mut Data<'_>,
    ) -> Result<()> {
        message::encrypt(rng, plain.as_bytes(), key, false, cipher)
    }

    /// Like [`Context::encrypt`], but with integrity protection (tag 18
    /// plus MDC trailer).
    pub fn encrypt_with_mdc<R: CryptoRng + RngCore>(
        &self,
        rng: R,
        plain: &Data<'_>,
        key: &KeyRecord,
        cipher: &mut Data<'_>,
    ) -> Result<()> {
        message::encrypt(rng, plain.as_bytes(), key, true, cipher)
    }
}

/// Identify the type of the OpenPGP message in `data`.
///
/// Unrecognizable input yields [`MessageType::Unknown`], recognizable but
/// misordered packets [`MessageType::Invalid`]; only harder failures
/// (framing errors, unsupported features) surface as errors.
pub fn identify(data: &Data<'_>) -> Result<MessageType> {
    match message::identify_packets(data.as_bytes()) {
        Ok(t) => Ok(t),
        Err(Error::NoData) => Ok(MessageType::Unknown),
        Err(Error::UnexpectedPacket { .. }) => Ok(MessageType::Invalid),
        Err(err) => Err(err),
    }
}

//! OpenPGP 64 bit key ids.

use std::fmt;

use crate::errors::{Error, Result};

/// A key id in wire order: the high 32 bit half first, then the low half.
/// Ref: RFC 4880, section 3.3.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId([u8; 8]);

impl KeyId {
    pub fn from_slice(bytes: &[u8]) -> Result<KeyId> {
        let id: [u8; 8] = bytes.try_into().map_err(|_| Error::InvalidValue)?;
        Ok(KeyId(id))
    }

    pub const fn from_halves(high: u32, low: u32) -> KeyId {
        let h = high.to_be_bytes();
        let l = low.to_be_bytes();
        KeyId([h[0], h[1], h[2], h[3], l[0], l[1], l[2], l[3]])
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn high(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn low(&self) -> u32 {
        u32::from_be_bytes([self.0[4], self.0[5], self.0[6], self.0[7]])
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", self)
    }
}

//! OpenPGP multi precision integers.
//!
//! An MPI is a 2 octet big endian bit count followed by the magnitude,
//! most significant byte first. Ref: RFC 4880, section 3.2.

use std::fmt;
use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use num_bigint::BigUint;

use crate::errors::{Error, Result};
use crate::ser::Serialize;

/// A borrowed MPI, pointing into the packet buffer it was parsed from.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MpiRef<'a> {
    bits: u16,
    value: &'a [u8],
}

/// An owned MPI.
#[derive(Clone, PartialEq, Eq)]
pub struct Mpi {
    bits: u16,
    value: Vec<u8>,
}

impl<'a> MpiRef<'a> {
    /// Parse an MPI from the front of `buf`, advancing the slice past it.
    ///
    /// On error the slice is left untouched.
    pub fn from_slice(buf: &mut &'a [u8]) -> Result<MpiRef<'a>> {
        if buf.len() < 2 {
            return Err(Error::InvalidMpi);
        }
        let bits = u16::from_be_bytes([buf[0], buf[1]]);
        let nbytes = (usize::from(bits) + 7) / 8;
        if buf.len() - 2 < nbytes {
            return Err(Error::InvalidMpi);
        }
        let value = &buf[2..2 + nbytes];
        *buf = &buf[2 + nbytes..];
        Ok(MpiRef { bits, value })
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.value
    }

    pub fn to_owned(&self) -> Mpi {
        Mpi {
            bits: self.bits,
            value: self.value.to_vec(),
        }
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(self.value)
    }
}

impl Mpi {
    /// Build an MPI from raw big endian magnitude bytes, normalizing away
    /// leading zero octets.
    pub fn from_raw(bytes: &[u8]) -> Mpi {
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        let value = &bytes[first..];
        let bits = match value.first() {
            Some(&top) => (value.len() as u16 - 1) * 8 + (8 - top.leading_zeros() as u16),
            None => 0,
        };
        Mpi {
            bits,
            value: value.to_vec(),
        }
    }

    pub fn from_biguint(n: &BigUint) -> Mpi {
        Mpi::from_raw(&n.to_bytes_be())
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    pub fn as_ref(&self) -> MpiRef<'_> {
        MpiRef {
            bits: self.bits,
            value: &self.value,
        }
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.value)
    }
}

impl Serialize for MpiRef<'_> {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(self.bits)?;
        writer.write_all(self.value)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        2 + self.value.len()
    }
}

impl Serialize for Mpi {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.as_ref().to_writer(writer)
    }

    fn write_len(&self) -> usize {
        self.as_ref().write_len()
    }
}

impl fmt::Debug for MpiRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mpi({} bits, {})", self.bits, hex::encode(self.value))
    }
}

impl fmt::Debug for Mpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

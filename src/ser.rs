use std::io;

use crate::errors::Result;

/// Serialization into the OpenPGP wire format.
pub trait Serialize {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()>;

    /// The exact number of bytes `to_writer` produces.
    fn write_len(&self) -> usize;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.write_len());
        self.to_writer(&mut buf)?;
        Ok(buf)
    }
}

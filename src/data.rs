//! Buffer handles passed across the public API.

use crate::errors::{Error, Result};

/// A chunk of memory handed to or received from the library.
///
/// A handle either borrows caller provided memory or owns its backing
/// buffer. Borrowed handles are promoted to owned ones by copying the bytes
/// exactly once, the first time mutable access is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data<'a> {
    /// A read only view into memory the caller keeps stable for the
    /// lifetime of the handle.
    Borrowed(&'a [u8]),
    /// An owned buffer.
    Owned(Vec<u8>),
}

impl Data<'_> {
    /// Create a new, empty handle.
    pub fn new() -> Data<'static> {
        Data::Owned(Vec::new())
    }

    /// Create a handle over `bytes`, copying them right away when `copy` is
    /// set and borrowing otherwise.
    pub fn from_mem(bytes: &[u8], copy: bool) -> Result<Data<'_>> {
        if bytes.is_empty() {
            return Err(Error::InvalidValue);
        }
        if copy {
            Ok(Data::Owned(bytes.to_vec()))
        } else {
            Ok(Data::Borrowed(bytes))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Data::Borrowed(b) => b,
            Data::Owned(v) => v,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Mutable access to the backing buffer, copying a borrowed view once.
    pub fn make_mut(&mut self) -> &mut Vec<u8> {
        if let Data::Borrowed(b) = self {
            *self = Data::Owned(b.to_vec());
        }
        match self {
            Data::Owned(v) => v,
            Data::Borrowed(_) => unreachable!("converted above"),
        }
    }

    /// Grow or shrink the buffer to `size` bytes, keeping the common
    /// prefix. The handle becomes owned.
    pub fn resize(&mut self, size: usize) {
        self.make_mut().resize(size, 0);
    }
}

impl Default for Data<'static> {
    fn default() -> Self {
        Data::new()
    }
}

impl<'a> From<&'a [u8]> for Data<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Data::Borrowed(bytes)
    }
}

impl From<Vec<u8>> for Data<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Data::Owned(bytes)
    }
}

impl AsRef<[u8]> for Data<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

use num_enum::{FromPrimitive, IntoPrimitive};
use sha1::{Digest, Sha1};

/// Hash algorithm ids. Ref: RFC 4880, section 9.4.
///
/// Only SHA-1 is backed by an implementation here; it is the digest the
/// S2K, MDC and key MIC paths are specified with. The other ids are known
/// so they can be named in errors and stored descriptors.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum HashAlgorithm {
    Md5 = 1,
    Sha1 = 2,
    Ripemd160 = 3,
    Sha256 = 8,
    #[num_enum(catch_all)]
    Unknown(u8),
}

pub const SHA1_DIGEST_LEN: usize = 20;

/// One-shot SHA-1.
pub fn sha1(chunks: &[&[u8]]) -> [u8; SHA1_DIGEST_LEN] {
    let mut md = Sha1::new();
    for chunk in chunks {
        md.update(chunk);
    }
    md.finalize().into()
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn sha1_known_answer() {
        assert_eq!(
            sha1(&[b"abc"]),
            hex!("a9993e364706816aba3e25717850c26c9cd0d89d")
        );
        // chunking does not change the digest
        assert_eq!(sha1(&[b"a", b"b", b"c"]), sha1(&[b"abc"]));
    }
}

//! Reading gpg-agent style protected private keys.
//!
//! A protected key is a canonical S-expression whose secret parameters are
//! replaced by one `(protected openpgp-s2k3-sha1-aes-cbc ...)` list: the
//! parameters are CBC encrypted under a passphrase derived AES-128 key and
//! carry a SHA-1 MIC over the rebuilt plain key.

use zeroize::Zeroizing;

use crate::crypto::hash::{sha1, HashAlgorithm, SHA1_DIGEST_LEN};
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::errors::{Error, Result};
use crate::sexp::{canonical_len, SexpCursor};
use crate::types::StringToKey;

const PROT_CIPHER: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::Aes128;
const PROT_CIPHER_KEYLEN: usize = 16;
const PROT_BLOCKLEN: usize = 16;

/// The protection scheme we can undo.
const PROT_SCHEME: &[u8] = b"openpgp-s2k3-sha1-aes-cbc";

/// Key algorithms a protected key may carry.
const KNOWN_ALGOS: &[&[u8]] = &[b"rsa", b"dsa", b"elg"];

/// Whether `seckey` is a protected private key.
///
/// `Ok(false)` means the key is already unprotected (`private-key` head).
pub fn is_protected(seckey: &[u8]) -> Result<bool> {
    let mut cur = SexpCursor::new(seckey);
    cur.expect(b'(')?;
    let head = cur.atom()?;
    if head == b"protected-private-key" {
        Ok(true)
    } else if head == b"private-key" {
        Ok(false)
    } else {
        Err(Error::UnexpectedData)
    }
}

/// Unprotect `protectedkey` with `passphrase`, returning the rebuilt
/// `(private-key ...)` expression in canonical form.
pub fn unprotect(protectedkey: &[u8], passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let mut cur = SexpCursor::new(protectedkey);
    cur.expect(b'(')?;
    if cur.atom()? != b"protected-private-key" {
        return Err(Error::UnexpectedData);
    }
    if cur.peek() != Some(b'(') {
        return Err(Error::UnexpectedData);
    }
    cur.expect(b'(')?;
    let algo = cur.atom()?;
    if !KNOWN_ALGOS.contains(&algo) {
        return Err(Error::InvalidAlgo { algo: 0 });
    }

    // Find the protected list among the parameter lists, e.g.
    // (protected openpgp-s2k3-sha1-aes-cbc ((sha1 <salt> <count>) <iv>) <data>)
    let prot_begin;
    loop {
        if cur.peek() != Some(b'(') {
            return Err(Error::InvalidData);
        }
        let here = cur.pos();
        cur.expect(b'(')?;
        if cur.atom()? == b"protected" {
            prot_begin = here;
            break;
        }
        cur.skip(1)?;
    }

    if cur.atom()? != PROT_SCHEME {
        return Err(Error::not_implemented("unknown key protection scheme"));
    }
    if cur.peek() != Some(b'(') {
        return Err(Error::InvalidData);
    }
    cur.expect(b'(')?;
    cur.expect(b'(')?;
    if cur.atom()? != b"sha1" {
        return Err(Error::not_implemented("s2k hashes other than SHA-1"));
    }
    let salt: [u8; 8] = cur.atom()?.try_into().map_err(|_| Error::InvalidData)?;
    let count_atom = cur.atom()?;
    let count: u32 = std::str::from_utf8(count_atom)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(Error::InvalidData)?;
    if count == 0 {
        return Err(Error::InvalidData);
    }
    cur.expect(b')')?;

    let iv = cur.atom()?;
    if iv.len() != PROT_BLOCKLEN {
        return Err(Error::InvalidData); // Only aes-128 sized IVs.
    }
    cur.expect(b')')?;
    let ciphertext = cur.atom()?;

    let cleartext = do_decryption(ciphertext, passphrase, salt, count, iv)?;

    let (rebuilt, stored_mic) = merge_lists(protectedkey, prot_begin, &cleartext)?;

    let computed_mic = calculate_mic(&rebuilt)?;
    if computed_mic != stored_mic {
        return Err(Error::InvalidData);
    }

    let final_len = canonical_len(&rebuilt, 0);
    if final_len == 0 {
        return Err(Error::Bug {
            what: "rebuilt key is not canonical",
        });
    }
    let mut result = rebuilt;
    result.truncate(final_len);
    Ok(result)
}

/// Derive the AES key, decrypt the protected blob and check that the
/// plaintext looks like the expected pair of S-expressions.
fn do_decryption(
    ciphertext: &[u8],
    passphrase: &[u8],
    salt: [u8; 8],
    count: u32,
    iv: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if ciphertext.len() < 4 || ciphertext.len() % PROT_BLOCKLEN != 0 {
        return Err(Error::InvalidData); // Corrupted protection.
    }

    let mut key = Zeroizing::new([0u8; PROT_CIPHER_KEYLEN]);
    StringToKey::IteratedAndSalted { salt, count }.derive(
        HashAlgorithm::Sha1,
        passphrase,
        key.as_mut(),
    )?;

    let mut outbuf = Zeroizing::new(ciphertext.to_vec());
    PROT_CIPHER.decrypt_cbc(key.as_ref(), iv, &mut outbuf)?;

    // A wrong passphrase yields noise instead of the expected expressions.
    let reallen = canonical_len(&outbuf, 0);
    if !outbuf.starts_with(b"((")
        || reallen == 0
        || reallen + PROT_BLOCKLEN < ciphertext.len()
    {
        return Err(Error::InvalidPassphrase);
    }

    Ok(outbuf)
}

/// Splice the decrypted parameter lists into the outer key in place of the
/// protected list. Returns the rebuilt key and the MIC stored alongside
/// the parameters.
///
/// The cleartext layout is
/// `((<parameter lists>)(hash sha1 <20 bytes>))`.
fn merge_lists(
    protectedkey: &[u8],
    replacepos: usize,
    cleartext: &[u8],
) -> Result<(Zeroizing<Vec<u8>>, [u8; SHA1_DIGEST_LEN])> {
    // "(21:protected-private-key" is 25 bytes, anything protected sits
    // behind it.
    if replacepos < 26 {
        return Err(Error::Bug {
            what: "protected list offset out of range",
        });
    }

    let outer_len = canonical_len(protectedkey, 0);
    let clear_len = canonical_len(cleartext, 0);
    if outer_len == 0 || clear_len == 0 {
        return Err(Error::Bug {
            what: "merge input is not canonical",
        });
    }

    let mut newlist = Zeroizing::new(Vec::with_capacity(outer_len + clear_len));
    newlist.extend_from_slice(b"(11:private-key");
    newlist.extend_from_slice(&protectedkey[25..replacepos]);

    // Pick the parameter lists out of the cleartext.
    let mut cur = SexpCursor::new(cleartext);
    cur.expect(b'(')?;
    cur.expect(b'(')?;
    let startpos = cur.pos();
    while cur.peek() == Some(b'(') {
        cur.expect(b'(')?;
        cur.atom()?;
        cur.atom()?;
        cur.expect(b')')?;
    }
    let endpos = cur.pos();
    cur.expect(b')')?;

    // Now get the MIC.
    cur.expect(b'(')?;
    if cur.atom()? != b"hash" {
        return Err(Error::InvalidData);
    }
    if cur.atom()? != b"sha1" {
        return Err(Error::InvalidData);
    }
    let mic: [u8; SHA1_DIGEST_LEN] = cur
        .atom()?
        .try_into()
        .map_err(|_| Error::InvalidData)?;
    cur.expect(b')')?;

    newlist.extend_from_slice(&cleartext[startpos..endpos]);

    // Skip the protected list in the original and append what follows it,
    // up to and including the closing parentheses of the outer key.
    let tail = &protectedkey[replacepos..];
    let mut cur = SexpCursor::new(tail);
    cur.expect(b'(')?;
    cur.skip(1)?;
    let tail_start = cur.pos();
    cur.skip(2)?;
    let tail_end = cur.pos();
    newlist.extend_from_slice(&tail[tail_start..tail_end]);

    Ok((newlist, mic))
}

/// SHA-1 over the inner list of a plain private key, parentheses included.
fn calculate_mic(plainkey: &[u8]) -> Result<[u8; SHA1_DIGEST_LEN]> {
    let mut cur = SexpCursor::new(plainkey);
    cur.expect(b'(')?;
    if cur.atom()? != b"private-key" {
        return Err(Error::UnexpectedData);
    }
    if cur.peek() != Some(b'(') {
        return Err(Error::UnexpectedData);
    }
    let hash_begin = cur.pos();
    cur.expect(b'(')?;
    cur.atom()?; // Skip the algorithm name.

    while cur.peek() == Some(b'(') {
        cur.expect(b'(')?;
        cur.atom()?;
        cur.atom()?;
        cur.expect(b')')?;
    }
    cur.expect(b')')?;
    let hash_end = cur.pos();

    Ok(sha1(&[&plainkey[hash_begin..hash_end]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_protection_state() {
        assert!(is_protected(b"(21:protected-private-key(3:rsa))").unwrap());
        assert!(!is_protected(b"(11:private-key(3:rsa))").unwrap());
        assert!(matches!(
            is_protected(b"(10:public-key)"),
            Err(Error::UnexpectedData)
        ));
        assert!(matches!(is_protected(b"nonsense"), Err(Error::InvalidData)));
    }

    #[test]
    fn unknown_scheme_is_not_implemented() {
        let key = b"(21:protected-private-key(3:rsa(1:n1:x)(1:e1:y)\
                    (9:protected3:foo(1:a)(1:b))))";
        assert!(matches!(
            unprotect(key, b"abc"),
            Err(Error::NotImplemented { .. })
        ));
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let key = b"(21:protected-private-key(3:ecc(9:protected)))";
        assert!(matches!(
            unprotect(key, b"abc"),
            Err(Error::InvalidAlgo { .. })
        ));
    }

    #[test]
    fn unprotected_key_is_unexpected_here() {
        let key = b"(11:private-key(3:rsa(1:n1:x)))";
        assert!(matches!(unprotect(key, b"abc"), Err(Error::UnexpectedData)));
    }

    #[test]
    fn mic_covers_the_inner_list() {
        let key = b"(11:private-key(3:rsa(1:n3:abc)(1:e1:q)))";
        let expected = sha1(&[&b"(3:rsa(1:n3:abc)(1:e1:q))"[..]]);
        assert_eq!(calculate_mic(key).unwrap(), expected);
    }

    // Full unprotect round trips live in tests/unprotect.rs, built on the
    // same S2K + CBC + MIC construction the protection writer side uses.
}

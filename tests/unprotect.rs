//! Protected private key reader, end to end.
//!
//! The fixtures are built with the same S2K + AES-CBC + MIC construction
//! gpg-agent uses for `openpgp-s2k3-sha1-aes-cbc`, then fed through
//! `protect::unprotect`.

use hex_literal::hex;
use pretty_assertions::assert_eq;

use tinypgp::crypto::hash::{sha1, HashAlgorithm};
use tinypgp::crypto::sym::SymmetricKeyAlgorithm;
use tinypgp::errors::Error;
use tinypgp::protect::{is_protected, unprotect};
use tinypgp::types::StringToKey;

const PASSPHRASE: &[u8] = b"abc";
const SALT: [u8; 8] = hex!("a09ab21a8d4bdc61");
const COUNT: u32 = 96;
const IV: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

const N: &[u8] = &hex!("c3551122");
const E: &[u8] = &hex!("010001");
const D: &[u8] = &hex!("0ba1d2e3f4");
const P: &[u8] = &hex!("d10203");
const Q: &[u8] = &hex!("e30405");
const U: &[u8] = &hex!("750607");

const PROTECTED_AT: &[u8] = b"(12:protected-at15:20250101T000000)";

/// `<len>:<bytes>`
fn atom(value: &[u8]) -> Vec<u8> {
    let mut out = value.len().to_string().into_bytes();
    out.push(b':');
    out.extend_from_slice(value);
    out
}

/// `(<name> <value>)`
fn param(name: &str, value: &[u8]) -> Vec<u8> {
    let mut out = vec![b'('];
    out.extend_from_slice(&atom(name.as_bytes()));
    out.extend_from_slice(&atom(value));
    out.push(b')');
    out
}

struct Fixture {
    protected: Vec<u8>,
    expected: Vec<u8>,
}

/// Assemble a protected key and the plain key unprotecting it must yield.
fn build_fixture(mangle_mic: bool) -> Fixture {
    // the plain key, as the merge rebuilds it
    let mut inner = b"(3:rsa".to_vec();
    inner.extend_from_slice(&param("n", N));
    inner.extend_from_slice(&param("e", E));
    inner.extend_from_slice(&param("d", D));
    inner.extend_from_slice(&param("p", P));
    inner.extend_from_slice(&param("q", Q));
    inner.extend_from_slice(&param("u", U));
    inner.extend_from_slice(PROTECTED_AT);
    inner.push(b')');

    let mut expected = b"(11:private-key".to_vec();
    expected.extend_from_slice(&inner);
    expected.push(b')');

    let mut mic = sha1(&[&inner]);
    if mangle_mic {
        mic[0] ^= 0x01;
    }

    // (( <protected params> )(hash sha1 <mic>))
    let mut cleartext = b"((".to_vec();
    cleartext.extend_from_slice(&param("d", D));
    cleartext.extend_from_slice(&param("p", P));
    cleartext.extend_from_slice(&param("q", Q));
    cleartext.extend_from_slice(&param("u", U));
    cleartext.extend_from_slice(b")(4:hash4:sha1");
    cleartext.extend_from_slice(&atom(&mic));
    cleartext.extend_from_slice(b"))");

    // pad to the cipher block, then encrypt under the stretched passphrase
    while cleartext.len() % 16 != 0 {
        cleartext.push(0);
    }
    let mut key = [0u8; 16];
    StringToKey::IteratedAndSalted { salt: SALT, count: COUNT }
        .derive(HashAlgorithm::Sha1, PASSPHRASE, &mut key)
        .unwrap();
    SymmetricKeyAlgorithm::Aes128
        .encrypt_cbc(&key, &IV, &mut cleartext)
        .unwrap();

    // the outer protected-private-key expression
    let mut protected = b"(21:protected-private-key(3:rsa".to_vec();
    protected.extend_from_slice(&param("n", N));
    protected.extend_from_slice(&param("e", E));
    protected.extend_from_slice(b"(9:protected25:openpgp-s2k3-sha1-aes-cbc((4:sha1");
    protected.extend_from_slice(&atom(&SALT));
    protected.extend_from_slice(&atom(COUNT.to_string().as_bytes()));
    protected.push(b')');
    protected.extend_from_slice(&atom(&IV));
    protected.push(b')');
    protected.extend_from_slice(&atom(&cleartext)); // now the ciphertext
    protected.push(b')');
    protected.extend_from_slice(PROTECTED_AT);
    protected.extend_from_slice(b"))");

    Fixture {
        protected,
        expected,
    }
}

#[test]
fn unprotects_and_verifies_the_mic() {
    let fixture = build_fixture(false);
    assert!(is_protected(&fixture.protected).unwrap());

    let plain = unprotect(&fixture.protected, PASSPHRASE).unwrap();
    assert_eq!(&plain[..], &fixture.expected[..]);
    assert!(!is_protected(&plain).unwrap());
}

#[test]
fn wrong_passphrase_is_rejected() {
    let fixture = build_fixture(false);
    assert!(matches!(
        unprotect(&fixture.protected, b"not abc"),
        Err(Error::InvalidPassphrase)
    ));
}

#[test]
fn mangled_mic_is_invalid_data() {
    let fixture = build_fixture(true);
    assert!(matches!(
        unprotect(&fixture.protected, PASSPHRASE),
        Err(Error::InvalidData)
    ));
}

#[test]
fn truncated_ciphertext_is_invalid_data() {
    // a protection blob that is not a whole number of blocks
    let mut protected = b"(21:protected-private-key(3:rsa".to_vec();
    protected.extend_from_slice(&param("n", N));
    protected.extend_from_slice(&param("e", E));
    protected.extend_from_slice(b"(9:protected25:openpgp-s2k3-sha1-aes-cbc((4:sha1");
    protected.extend_from_slice(&atom(&SALT));
    protected.extend_from_slice(&atom(b"96"));
    protected.push(b')');
    protected.extend_from_slice(&atom(&IV));
    protected.push(b')');
    protected.extend_from_slice(&atom(&[0u8; 15]));
    protected.extend_from_slice(b")))");

    assert!(matches!(
        unprotect(&protected, PASSPHRASE),
        Err(Error::InvalidData)
    ));
}

//! The encrypt pipeline.

use log::debug;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::crypto::hash::sha1;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::crypto::{checksum, eme_pkcs1, rsa};
use crate::data::Data;
use crate::errors::{Error, Result};
use crate::keystore::KeyRecord;
use crate::packet::{literal_data, pkesk};
use crate::types::{header_len, write_header, Tag};

/// The cipher every message is encrypted with.
const CIPHER: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::Aes256;

/// Encrypt `plain` to the owner of `key`. The result replaces the
/// contents of `cipher`.
///
/// With `mdc` an integrity protected packet (tag 18) is written; without,
/// the classic tag 9 packet with the CFB resync quirk.
pub(crate) fn encrypt<R: CryptoRng + RngCore>(
    mut rng: R,
    plain: &[u8],
    key: &KeyRecord,
    mdc: bool,
    cipher: &mut Data<'_>,
) -> Result<()> {
    let keylen = CIPHER.key_size()?;
    let bs = CIPHER.block_size()?;

    // The literal data packet carrying the payload.
    let mut literal = Vec::with_capacity(literal_data::packet_len(b"", plain.len()));
    literal_data::write_packet(
        &mut literal,
        literal_data::FORMAT_BINARY,
        b"",
        0,
        plain,
    )?;
    let literal = Zeroizing::new(literal);

    // Generate the session key and its PKCS#1 frame, sized so that with
    // the leading zero octet dropped the block is one byte short of the
    // modulus.
    let (n, e) = key.public_rsa()?;
    let modulus_len = (usize::from(n.bits()) + 7) / 8;
    let frame_len = 1 + keylen + 2;
    let em_len = modulus_len.saturating_sub(1);
    if em_len < frame_len + 10 {
        return Err(Error::CryptError); // Modulus too small for a session key.
    }

    let mut seskey = Zeroizing::new(vec![0u8; keylen]);
    rng.fill_bytes(&mut seskey);

    let mut em = Zeroizing::new(vec![0u8; em_len]);
    eme_pkcs1::encode(&mut rng, &mut em[..em_len - frame_len])?;
    let mut frame = Zeroizing::new(Vec::with_capacity(frame_len));
    checksum::write_session_key_frame(&mut frame, CIPHER.into(), &seskey)?;
    em[em_len - frame_len..].copy_from_slice(&frame);

    let encdat = rsa::encrypt(n, e, &em)?;
    debug!(
        "encrypting {} payload bytes for {} (mdc {})",
        plain.len(),
        key.key_id(),
        mdc
    );

    // Lay out the two packets.
    let enc_body_len = if mdc {
        1 + bs + 2 + literal.len() + 22
    } else {
        bs + 2 + literal.len()
    };
    let encdat = [encdat];
    let total = pkesk::packet_len(&encdat) + header_len(enc_body_len) + enc_body_len;

    let out = cipher.make_mut();
    out.clear();
    out.reserve(total);

    pkesk::write_packet(out, &key.key_id(), PublicKeyAlgorithm::Rsa, &encdat)?;

    let enc_tag = if mdc {
        Tag::SymEncryptedProtectedData
    } else {
        Tag::SymEncryptedData
    };
    write_header(out, enc_tag, enc_body_len)?;

    // The random prefix with its two byte quick check repeat.
    let mut prefix = Zeroizing::new(vec![0u8; bs + 2]);
    rng.fill_bytes(&mut prefix[..bs]);
    prefix[bs] = prefix[bs - 2];
    prefix[bs + 1] = prefix[bs - 1];

    if mdc {
        out.push(1); // Version octet.
        let body_start = out.len();

        // literal || mdc header || SHA-1(prefix || literal || mdc header)
        let mut plaintext = Zeroizing::new(Vec::with_capacity(literal.len() + 22));
        plaintext.extend_from_slice(&literal);
        plaintext.extend_from_slice(&[0xd3, 0x14]);
        let digest = sha1(&[&prefix[..], &plaintext[..]]);
        plaintext.extend_from_slice(&digest);

        out.resize(body_start + bs + 2 + plaintext.len(), 0);
        CIPHER.encrypt_protected(&seskey, &prefix, &plaintext, &mut out[body_start..])?;
    } else {
        let body_start = out.len();
        out.resize(body_start + bs + 2 + literal.len(), 0);
        CIPHER.encrypt(&seskey, &prefix, &literal, &mut out[body_start..])?;
    }

    debug_assert_eq!(cipher.len(), total, "miscounted the message layout");
    Ok(())
}

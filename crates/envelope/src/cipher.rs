//! AES-256-CBC with PKCS#7 padding.
//!
//! CBC provides confidentiality only. There is no authentication tag, so a
//! party able to modify ciphertext in transit can cause predictable changes
//! to the decrypted plaintext. Integrity rests on the transport (TLS).
//!
//! Each call builds its own cipher context; nothing here is shared between
//! threads.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};

use crate::error::EnvelopeError;
use crate::key::DerivedKey;

/// Byte length of a CBC initialisation vector (one AES block).
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Draw a fresh IV from the OS CSPRNG.
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypt `plaintext` and return the padded ciphertext (IV not included).
///
/// # Errors
///
/// Returns [`EnvelopeError::Cipher`] if the primitive rejects the key or IV
/// length, which the fixed-size arguments make unreachable.
pub fn encrypt(
    key: &DerivedKey,
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, EnvelopeError> {
    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| EnvelopeError::Cipher("rejected key or IV length"))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt `ciphertext` and strip its PKCS#7 padding.
///
/// # Errors
///
/// Returns [`EnvelopeError::MalformedEnvelope`] if the ciphertext is empty or
/// not a whole number of blocks, and [`EnvelopeError::Padding`] if the
/// decrypted trailer is not valid PKCS#7.
pub fn decrypt(
    key: &DerivedKey,
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, EnvelopeError> {
    if ciphertext.is_empty() {
        return Err(EnvelopeError::MalformedEnvelope("ciphertext is empty"));
    }
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(EnvelopeError::MalformedEnvelope(
            "ciphertext is not a multiple of the block size",
        ));
    }
    let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| EnvelopeError::Cipher("rejected key or IV length"))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| EnvelopeError::Padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{derive, KEY_LEN};

    fn test_key() -> DerivedKey {
        DerivedKey::from_bytes([0x42u8; KEY_LEN])
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = test_key();
        let iv = generate_iv();
        let ciphertext = encrypt(&key, &iv, b"123-45-6789").unwrap();
        let plaintext = decrypt(&key, &iv, &ciphertext).unwrap();
        assert_eq!(plaintext, b"123-45-6789");
    }

    #[test]
    fn ciphertext_is_padded_to_whole_blocks() {
        let key = test_key();
        let iv = [0u8; IV_LEN];
        assert_eq!(encrypt(&key, &iv, b"").unwrap().len(), BLOCK_LEN);
        assert_eq!(encrypt(&key, &iv, &[7u8; 15]).unwrap().len(), BLOCK_LEN);
        // A full block of input still gains a full block of padding.
        assert_eq!(encrypt(&key, &iv, &[7u8; 16]).unwrap().len(), 2 * BLOCK_LEN);
    }

    #[test]
    fn known_answer_empty_plaintext() {
        // AES-256-CBC, key = "test-encryption-key-32-character", IV = 0, PKCS#7.
        let key = derive(b"test-encryption-key-32-characters-long");
        let ciphertext = encrypt(&key, &[0u8; IV_LEN], b"").unwrap();
        let expected: [u8; 16] = [
            0x29, 0xf0, 0xd5, 0xe8, 0x51, 0x82, 0x2d, 0xaf, 0xa6, 0xfb, 0x9d, 0x35, 0xb2, 0x18,
            0x2b, 0x22,
        ];
        assert_eq!(ciphertext, expected);
    }

    #[test]
    fn wrong_key_fails_or_differs() {
        let iv = generate_iv();
        let ciphertext = encrypt(&test_key(), &iv, b"secret").unwrap();
        let other = DerivedKey::from_bytes([0x24u8; KEY_LEN]);
        match decrypt(&other, &iv, &ciphertext) {
            Err(e) => assert_eq!(e, EnvelopeError::Padding),
            Ok(p) => assert_ne!(p, b"secret"),
        }
    }

    #[test]
    fn rejects_unaligned_ciphertext() {
        let err = decrypt(&test_key(), &[0u8; IV_LEN], &[0u8; 17]).unwrap_err();
        assert!(matches!(err, EnvelopeError::MalformedEnvelope(_)));
    }

    #[test]
    fn rejects_empty_ciphertext() {
        let err = decrypt(&test_key(), &[0u8; IV_LEN], &[]).unwrap_err();
        assert!(matches!(err, EnvelopeError::MalformedEnvelope(_)));
    }

    #[test]
    fn generated_ivs_differ() {
        assert_ne!(generate_iv(), generate_iv());
    }
}

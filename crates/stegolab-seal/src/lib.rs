//! # Sealing payloads
//!
//! Password based authenticated encryption used by `stegolab-core`.
//! Keys are derived with argon2id, data is sealed with XChaCha20Poly1305.
//!
//! The sealed layout is `ciphertext || tag || nonce (24 bytes) || salt (32 bytes)`,
//! so a sealed message is always [`OVERHEAD`] bytes longer than its plaintext.

use argon2::{Algorithm, Argon2, ParamsBuilder, Version};
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit};
use chacha20poly1305::XChaCha20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

pub mod error;

pub use crate::error::SealError;

const NONCE_LEN: usize = 24;
const SALT_LEN: usize = 32;
const KEY_LEN: usize = 32;
const TAG_LEN: usize = 16;

/// Number of bytes sealing adds on top of the plaintext
pub const OVERHEAD: usize = TAG_LEN + NONCE_LEN + SALT_LEN;

pub type Result<T> = std::result::Result<T, SealError>;
pub type Key = [u8; KEY_LEN];

/// Opens data sealed by [`encrypt_data`] with the same password
pub fn decrypt_data(password: &str, data: &[u8]) -> Result<Vec<u8>> {
    let (body, nonce, salt) = split_sealed(data)?;
    let mut key = derive_key(password.as_bytes(), salt)?;
    let cipher = XChaCha20Poly1305::new(&key.into());
    key.zeroize();

    cipher.decrypt(nonce.into(), body).map_err(SealError::Decryption)
}

/// Seals `data` under a key derived from `password` and a fresh random salt
pub fn encrypt_data(password: &str, data: &[u8]) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let mut key = derive_key(password.as_bytes(), &salt)?;
    let cipher = XChaCha20Poly1305::new(&key.into());
    key.zeroize();

    let mut sealed = Vec::with_capacity(data.len() + OVERHEAD);
    sealed.append(&mut cipher.encrypt(&nonce, data).map_err(SealError::Encryption)?);
    sealed.extend_from_slice(nonce.as_slice());
    sealed.extend_from_slice(&salt);
    nonce.zeroize();
    salt.zeroize();

    Ok(sealed)
}

/// `ciphertext || tag`, nonce and salt of a sealed message
fn split_sealed(data: &[u8]) -> Result<(&[u8], &[u8], &[u8])> {
    let minimum = SALT_LEN + NONCE_LEN;
    let Some(body_len) = data.len().checked_sub(minimum) else {
        return Err(SealError::TooShort {
            actual: data.len(),
            minimum,
        });
    };
    let (body, trailer) = data.split_at(body_len);
    let (nonce, salt) = trailer.split_at(NONCE_LEN);

    Ok((body, nonce, salt))
}

fn argon2id<'key>() -> Result<Argon2<'key>> {
    let params = ParamsBuilder::default()
        .t_cost(10)
        .output_len(KEY_LEN)
        .build()
        .map_err(SealError::KeyDerivationParams)?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn derive_key(password: &[u8], salt: &[u8]) -> Result<Key> {
    let mut output_key_material = [0u8; KEY_LEN];
    argon2id()?
        .hash_password_into(password, salt, &mut output_key_material)
        .map_err(SealError::KeyDerivation)?;

    Ok(output_key_material)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOREM: &[u8] = b"lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

    #[test]
    fn should_derive_the_same_key_for_the_same_salt() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key(b"hunter42", &salt).unwrap();
        let b = derive_key(b"hunter42", &salt).unwrap();
        let c = derive_key(b"hunter43", &salt).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, [0u8; KEY_LEN]);
    }

    #[test]
    fn should_round_trip_encryption() {
        let password = "correct horse battery staple";

        let cipher_data = encrypt_data(password, LOREM).unwrap();
        let opened = decrypt_data(password, &cipher_data).unwrap();

        assert_ne!(LOREM, &cipher_data[..LOREM.len()]);
        assert_eq!(LOREM, opened.as_slice());
    }

    #[test]
    fn should_add_exactly_the_overhead() {
        let cipher_data = encrypt_data("pw", LOREM).unwrap();
        assert_eq!(cipher_data.len(), LOREM.len() + OVERHEAD);

        let cipher_data = encrypt_data("pw", b"").unwrap();
        assert_eq!(cipher_data.len(), OVERHEAD);
    }

    #[test]
    fn should_use_fresh_salt_and_nonce_per_call() {
        let a = encrypt_data("pw", LOREM).unwrap();
        let b = encrypt_data("pw", LOREM).unwrap();
        assert_ne!(a, b, "two seals of the same data must differ");
    }

    #[test]
    fn should_reject_a_wrong_password() {
        let cipher_data = encrypt_data("right", LOREM).unwrap();
        let result = decrypt_data("wrong", &cipher_data);
        assert!(matches!(result, Err(SealError::Decryption(_))));
    }

    #[test]
    fn should_reject_a_modified_ciphertext() {
        let mut cipher_data = encrypt_data("pw", LOREM).unwrap();
        cipher_data[3] ^= 0x01;
        let result = decrypt_data("pw", &cipher_data);
        assert!(matches!(result, Err(SealError::Decryption(_))));
    }

    #[test]
    fn should_reject_too_short_data_without_panicking() {
        let result = decrypt_data("pw", &[0u8; 10]);
        assert!(matches!(
            result,
            Err(SealError::TooShort {
                actual: 10,
                minimum: 56
            })
        ));
    }
}

use stegolab_seal::{decrypt_data, encrypt_data};

use crate::{Result, StegoError};

/// Bytes sealing adds to a payload: salt, nonce and authentication tag
pub use stegolab_seal::OVERHEAD;

/// Seals the payload with a key derived from `password`
pub fn encrypt(payload: &[u8], password: &str) -> Result<Vec<u8>> {
    encrypt_data(password, payload).map_err(StegoError::EncryptionFailure)
}

/// Opens a sealed payload, any failure including a wrong password ends up as [`StegoError::DecryptionFailure`]
pub fn decrypt(sealed: &[u8], password: &str) -> Result<Vec<u8>> {
    decrypt_data(password, sealed).map_err(StegoError::DecryptionFailure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_wrong_passwords_to_decryption_failure() {
        let sealed = encrypt(b"attack at dawn", "correct horse").unwrap();
        assert_eq!(decrypt(&sealed, "correct horse").unwrap(), b"attack at dawn");
        assert!(matches!(
            decrypt(&sealed, "battery staple"),
            Err(StegoError::DecryptionFailure(_))
        ));
    }

    #[test]
    fn should_map_garbage_to_decryption_failure() {
        assert!(matches!(
            decrypt(&[1, 2, 3], "pw"),
            Err(StegoError::DecryptionFailure(_))
        ));
    }
}

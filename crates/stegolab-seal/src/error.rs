pub use argon2::Error as Argon2Error;
pub use chacha20poly1305::Error as Chacha20Poly1305Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SealError {
    #[error("Key derivation error")]
    KeyDerivation(Argon2Error),

    #[error("Key derivation parameter error")]
    KeyDerivationParams(Argon2Error),

    /// Represents a wrong password, a modified ciphertext or a tag mismatch
    #[error("Decryption error")]
    Decryption(Chacha20Poly1305Error),

    #[error("Encryption error")]
    Encryption(Chacha20Poly1305Error),

    /// Represents sealed data that cannot even hold the nonce and the salt
    #[error("Sealed data is too short: {actual} bytes, at least {minimum} bytes expected")]
    TooShort { actual: usize, minimum: usize },
}

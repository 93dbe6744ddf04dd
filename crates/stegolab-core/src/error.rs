use thiserror::Error;

pub use stegolab_seal::SealError;

#[derive(Error, Debug)]
pub enum StegoError {
    /// Represents a payload that, together with its header, needs more bit slots than the
    /// carrier offers with the chosen channels and bits per channel
    #[error("Capacity Error: {required_bits} bits are required but the carrier offers only {available_bits} bits")]
    InsufficientCapacity {
        required_bits: usize,
        available_bits: usize,
    },

    /// Represents the absence of a payload header, for example a clean image or wrong extraction options
    #[error("No payload header found, the magic bytes or the reserved word do not match")]
    InvalidMagic,

    /// Represents a payload that was modified after embedding or extracted with the wrong options
    #[error("Payload checksum mismatch: header says {expected:#010x}, payload hashes to {computed:#010x}")]
    CrcMismatch { expected: u32, computed: u32 },

    /// Represents a header whose length field points beyond the end of the carrier
    #[error("Payload header claims {claimed_bits} bits but only {available_bits} bits follow it")]
    PayloadLengthOutOfRange {
        claimed_bits: usize,
        available_bits: usize,
    },

    /// Represents an error when decrypting the data, usually a wrong password
    #[error("Decryption error")]
    DecryptionFailure(#[source] SealError),

    /// Represents an error when encrypting the data
    #[error("Encryption error")]
    EncryptionFailure(#[source] SealError),

    /// Represents options or inputs that cannot work together, for example a missing password
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Represents an image file that could not be decoded, for example a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia(#[source] image::ImageError),

    /// Represents a failure when encoding an image file
    #[error("Image encoding error")]
    ImageEncodingError(#[source] image::ImageError),

    /// Represents an output format that would not keep the LSBs intact, for example JPEG
    #[error("Unsupported output format '{0}', only lossless PNG and BMP keep the payload intact")]
    UnsupportedOutputFormat(String),

    #[error("API Error: No carrier image set")]
    CarrierNotSet,

    #[error("API Error: Missing payload")]
    MissingPayload,

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

//! Self describing container around the embedded body.
//!
//! Standard header, 16 bytes, big endian, the last word is reserved and must be zero:
//!
//! ```text
//! +------+------+------+------+-----------+-----------+-----------+
//! | 'S'  | 'T'  | 'E'  | 'G'  | length u32| crc32 u32 | 0u32      |
//! +------+------+------+------+-----------+-----------+-----------+
//! ```
//!
//! Minimal header, 8 bytes, big endian: `'S' 'G' | length u24 | crc32 & 0xFFFFFF as u24`.
//!
//! `length` counts the body bytes that follow the header, which is the ciphertext when the
//! payload was encrypted. The checksum always covers the plaintext payload.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::options::HeaderFormat;
use crate::{Result, StegoError};

pub const STANDARD_MAGIC: [u8; 4] = *b"STEG";
pub const MINIMAL_MAGIC: [u8; 2] = *b"SG";

const MINIMAL_CHECKSUM_MASK: u32 = 0x00FF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadHeader {
    pub format: HeaderFormat,
    /// body length in bytes
    pub payload_length: u32,
    pub checksum: u32,
}

impl PayloadHeader {
    /// Header describing `body`, where `checksum` is the CRC32 of the plaintext
    pub fn new(format: HeaderFormat, body_len: usize, checksum: u32) -> Result<Self> {
        if body_len > format.max_body_len() {
            return Err(StegoError::InvalidParameters(format!(
                "a body of {body_len} bytes exceeds the {format} header limit of {} bytes",
                format.max_body_len()
            )));
        }
        let checksum = match format {
            HeaderFormat::Standard => checksum,
            HeaderFormat::Minimal => checksum & MINIMAL_CHECKSUM_MASK,
        };

        Ok(Self {
            format,
            payload_length: body_len as u32,
            checksum,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.format.byte_len());
        match self.format {
            HeaderFormat::Standard => {
                buffer.extend_from_slice(&STANDARD_MAGIC);
                buffer.write_u32::<BigEndian>(self.payload_length)?;
                buffer.write_u32::<BigEndian>(self.checksum)?;
                buffer.write_u32::<BigEndian>(0)?;
            }
            HeaderFormat::Minimal => {
                buffer.extend_from_slice(&MINIMAL_MAGIC);
                buffer.write_u24::<BigEndian>(self.payload_length)?;
                buffer.write_u24::<BigEndian>(self.checksum)?;
            }
        }

        Ok(buffer)
    }

    /// Parses a header from the beginning of `bytes`
    pub fn decode(bytes: &[u8], format: HeaderFormat) -> Result<Self> {
        if bytes.len() < format.byte_len() {
            return Err(StegoError::InvalidMagic);
        }
        let mut cursor = Cursor::new(bytes);
        let header = match format {
            HeaderFormat::Standard => {
                let mut magic = [0u8; 4];
                cursor.read_exact(&mut magic)?;
                if magic != STANDARD_MAGIC {
                    return Err(StegoError::InvalidMagic);
                }
                let payload_length = cursor.read_u32::<BigEndian>()?;
                let checksum = cursor.read_u32::<BigEndian>()?;
                // reserved, anything but zero is not one of our headers
                if cursor.read_u32::<BigEndian>()? != 0 {
                    return Err(StegoError::InvalidMagic);
                }
                Self {
                    format,
                    payload_length,
                    checksum,
                }
            }
            HeaderFormat::Minimal => {
                let mut magic = [0u8; 2];
                cursor.read_exact(&mut magic)?;
                if magic != MINIMAL_MAGIC {
                    return Err(StegoError::InvalidMagic);
                }
                Self {
                    format,
                    payload_length: cursor.read_u24::<BigEndian>()?,
                    checksum: cursor.read_u24::<BigEndian>()?,
                }
            }
        };

        Ok(header)
    }

    pub fn body_len(&self) -> usize {
        self.payload_length as usize
    }

    /// Compares the stored checksum with the CRC32 of `plaintext`
    pub fn verify(&self, plaintext: &[u8]) -> Result<()> {
        let computed = match self.format {
            HeaderFormat::Standard => checksum(plaintext),
            HeaderFormat::Minimal => checksum(plaintext) & MINIMAL_CHECKSUM_MASK,
        };
        if computed != self.checksum {
            return Err(StegoError::CrcMismatch {
                expected: self.checksum,
                computed,
            });
        }

        Ok(())
    }
}

/// CRC32 (IEEE) as used in the header
pub fn checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Header followed by `payload`, checksum computed over `payload`
pub fn frame(payload: &[u8], format: HeaderFormat) -> Result<Vec<u8>> {
    frame_with_checksum(payload, checksum(payload), format)
}

/// Header followed by `body`, with the checksum of the plaintext given explicitly
pub fn frame_with_checksum(body: &[u8], plaintext_checksum: u32, format: HeaderFormat) -> Result<Vec<u8>> {
    let header = PayloadHeader::new(format, body.len(), plaintext_checksum)?;
    let mut framed = header.encode()?;
    framed.extend_from_slice(body);

    Ok(framed)
}

/// Parses and verifies an unencrypted container, returns the payload
pub fn unframe(bytes: &[u8], format: HeaderFormat) -> Result<Vec<u8>> {
    let header = PayloadHeader::decode(bytes, format)?;
    let body = &bytes[format.byte_len()..];
    if body.len() < header.body_len() {
        return Err(StegoError::PayloadLengthOutOfRange {
            claimed_bits: header.body_len() * 8,
            available_bits: body.len() * 8,
        });
    }
    let payload = &body[..header.body_len()];
    header.verify(payload)?;

    Ok(payload.to_vec())
}

//! How much fits into a carrier.
//!
//! Every selected sample offers `bits_per_channel` slots, so a grid of `H x W` pixels with
//! `k` selected channels holds `H * W * k * bits_per_channel` bits. The payload header
//! is embedded into the same slots and is subtracted from what is left for the payload.

use crate::grid::GridShape;
use crate::options::{BitsPerChannel, ChannelSelection, CodecOptions};
use crate::{crypto, Result, StegoError};

/// Number of bits the selected channels of a grid can carry
pub fn capacity_bits(
    shape: &GridShape,
    selection: ChannelSelection,
    bits: BitsPerChannel,
) -> Result<usize> {
    let k = selection.indices(shape)?.len();
    Ok(shape.pixel_count() * k * bits.bits() as usize)
}

/// Bits left for the payload body once the header is accounted for
pub fn payload_bits(shape: &GridShape, options: &CodecOptions) -> Result<usize> {
    let total = capacity_bits(shape, options.channels(), options.bits_per_channel())?;
    Ok(total.saturating_sub(options.header_format().bit_len()))
}

/// Fails with [`StegoError::InsufficientCapacity`] if a body of `body_len` bytes plus header does not fit
pub fn check(shape: &GridShape, options: &CodecOptions, body_len: usize) -> Result<()> {
    let available_bits = capacity_bits(shape, options.channels(), options.bits_per_channel())?;
    let required_bits = (body_len + options.header_format().byte_len()) * 8;
    if required_bits > available_bits {
        log::debug!("{required_bits} bits required, carrier offers {available_bits} bits");
        return Err(StegoError::InsufficientCapacity {
            required_bits,
            available_bits,
        });
    }

    Ok(())
}

/// Largest plaintext payload in bytes that can be embedded with the given options.
///
/// Takes the encryption overhead and the range of the header length field into account.
pub fn max_payload_bytes(shape: &GridShape, options: &CodecOptions) -> Result<usize> {
    let body = (payload_bits(shape, options)? / 8).min(options.header_format().max_body_len());
    if options.encrypt() {
        Ok(body.saturating_sub(crypto::OVERHEAD))
    } else {
        Ok(body)
    }
}

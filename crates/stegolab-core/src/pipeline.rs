//! Embedding and extraction as a straight line of stages.
//!
//! Embed: frame (and encrypt) the payload, check capacity, generate positions, write bits,
//! measure quality. Extract: read the header from the first slots, validate it, read the
//! body from the slots right after it, decrypt and verify the checksum.
//! A failing stage aborts the whole operation, there is never a partial result.

use log::debug;

use crate::grid::PixelGrid;
use crate::options::{EmbedOptions, ExtractOptions};
use crate::positions::{self, CandidateSpace, PositionOrder};
use crate::{bit_codec, capacity, crypto, frame, quality, Result, StegoError};

/// Result of a successful embedding
#[derive(Debug, Clone)]
pub struct EmbedOutcome {
    pub stego: PixelGrid,
    pub metrics: EmbedMetrics,
}

/// Quality and utilization figures of an embedding
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedMetrics {
    /// plaintext payload size in bytes
    pub payload_size: usize,
    /// largest plaintext payload these options could have carried
    pub capacity_bytes: usize,
    /// `payload_size / capacity_bytes`
    pub embedding_efficiency: f64,
    pub psnr: f64,
    pub ssim: f64,
    pub bits_per_channel: u32,
    pub channels_used: usize,
    /// samples touched, header included
    pub positions_used: usize,
}

/// Hides `payload` in a copy of `carrier`
pub fn embed(carrier: &PixelGrid, payload: &[u8], options: &EmbedOptions) -> Result<EmbedOutcome> {
    let shape = carrier.shape();
    let bits = options.bits_per_channel();
    let format = options.header_format();
    let space = CandidateSpace::new(&shape, options.channels())?;

    // sealing has a fixed overhead, so capacity is known before paying for key derivation
    let body_len = if options.encrypt() {
        payload.len() + crypto::OVERHEAD
    } else {
        payload.len()
    };
    capacity::check(&shape, options, body_len)?;

    let checksum = frame::checksum(payload);
    let body = encrypt_if_requested(payload, options)?;
    let framed = frame::frame_with_checksum(&body, checksum, format)?;
    debug!(
        "framed {} payload bytes into {} bytes ({} header)",
        payload.len(),
        framed.len(),
        format
    );

    let order = PositionOrder::for_options(options);
    let needed = bits.positions_for(framed.len() * 8);
    let positions = positions::generate(&shape, options.channels(), needed, &order, 0)?;
    debug!("writing {needed} positions with {} bit(s) each, order {order:?}", bits.bits());

    let mut stego = carrier.clone();
    bit_codec::embed(&mut stego, &framed, &positions, bits)?;

    let capacity_bytes = capacity::max_payload_bytes(&shape, options)?;
    let metrics = EmbedMetrics {
        payload_size: payload.len(),
        capacity_bytes,
        embedding_efficiency: if capacity_bytes == 0 {
            0.0
        } else {
            payload.len() as f64 / capacity_bytes as f64
        },
        psnr: quality::psnr(carrier, &stego)?,
        ssim: quality::ssim(carrier, &stego)?,
        bits_per_channel: bits.bits(),
        channels_used: space.channel_count(),
        positions_used: needed,
    };
    debug!("embedding done: {metrics:?}");

    Ok(EmbedOutcome { stego, metrics })
}

/// Recovers the payload hidden by [`embed`] with the same options
pub fn extract(stego: &PixelGrid, options: &ExtractOptions) -> Result<Vec<u8>> {
    let shape = stego.shape();
    let bits = options.bits_per_channel();
    let format = options.header_format();
    let space = CandidateSpace::new(&shape, options.channels())?;
    let order = PositionOrder::for_options(options);

    let header_positions = bits.positions_for(format.bit_len());
    if header_positions > space.len() {
        return Err(StegoError::InsufficientCapacity {
            required_bits: format.bit_len(),
            available_bits: space.len() * bits.bits() as usize,
        });
    }
    let positions = positions::generate(&shape, options.channels(), header_positions, &order, 0)?;
    let header_bytes = bit_codec::extract(stego, &positions, bits, format.byte_len())?;
    let header = frame::PayloadHeader::decode(&header_bytes, format)?;
    debug!("found {format} header announcing {} body bytes", header.body_len());

    let body_positions = bits.positions_for(header.body_len() * 8);
    let remaining = space.len() - header_positions;
    if body_positions > remaining {
        return Err(StegoError::PayloadLengthOutOfRange {
            claimed_bits: header.body_len() * 8,
            available_bits: remaining * bits.bits() as usize,
        });
    }
    let positions = positions::generate(
        &shape,
        options.channels(),
        body_positions,
        &order,
        header_positions,
    )?;
    let body = bit_codec::extract(stego, &positions, bits, header.body_len())?;

    let payload = decrypt_if_requested(&body, options)?;
    header.verify(&payload)?;

    Ok(payload)
}

fn encrypt_if_requested(payload: &[u8], options: &EmbedOptions) -> Result<Vec<u8>> {
    match options.password().get() {
        Some(password) if options.encrypt() => crypto::encrypt(payload, password),
        _ => Ok(payload.to_vec()),
    }
}

fn decrypt_if_requested(body: &[u8], options: &ExtractOptions) -> Result<Vec<u8>> {
    match options.password().get() {
        Some(password) if options.encrypt() => crypto::decrypt(body, password),
        _ => Ok(body.to_vec()),
    }
}

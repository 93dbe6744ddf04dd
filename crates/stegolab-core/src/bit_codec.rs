//! Writing and reading bit groups into the low bits of samples.
//!
//! Bits are taken MSB first from the byte stream, `b` at a time. Group `g` replaces the
//! low `b` bits of the sample at position `g`. Since `b` divides 8 and data comes in whole
//! bytes, groups never straddle the end of the data.

use std::io::Cursor;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::grid::PixelGrid;
use crate::options::BitsPerChannel;
use crate::positions::Position;
use crate::{Result, StegoError};

/// Hides `data` in the samples at `positions`, which must hold at least `ceil(len * 8 / b)` entries
pub fn embed(
    grid: &mut PixelGrid,
    data: &[u8],
    positions: &[Position],
    bits: BitsPerChannel,
) -> Result<()> {
    let total_bits = data.len() * 8;
    let needed = bits.positions_for(total_bits);
    check_positions(positions.len(), needed, bits)?;

    let mut reader = BitReader::endian(Cursor::new(data), BigEndian);
    for position in &positions[..needed] {
        let group = reader.read::<u8>(bits.bits())?;
        let sample = grid.get(position.row, position.col, position.channel);
        grid.set(
            position.row,
            position.col,
            position.channel,
            conceal(sample, group, bits),
        );
    }

    Ok(())
}

/// Reads `byte_count` bytes back from the samples at `positions`
pub fn extract(
    grid: &PixelGrid,
    positions: &[Position],
    bits: BitsPerChannel,
    byte_count: usize,
) -> Result<Vec<u8>> {
    let total_bits = byte_count * 8;
    let needed = bits.positions_for(total_bits);
    check_positions(positions.len(), needed, bits)?;

    let mut writer = BitWriter::endian(Vec::with_capacity(byte_count), BigEndian);
    for position in &positions[..needed] {
        let group = grid.get(position.row, position.col, position.channel) & bits.mask();
        writer.write(bits.bits(), group)?;
    }
    writer.byte_align()?;

    Ok(writer.into_writer())
}

#[inline]
fn conceal(sample: u8, group: u8, bits: BitsPerChannel) -> u8 {
    (sample & !bits.mask()) | (group & bits.mask())
}

fn check_positions(available: usize, needed: usize, bits: BitsPerChannel) -> Result<()> {
    if available < needed {
        return Err(StegoError::InsufficientCapacity {
            required_bits: needed * bits.bits() as usize,
            available_bits: available * bits.bits() as usize,
        });
    }
    Ok(())
}

//! Where the bits go.
//!
//! The candidate space of a grid is the list of all selected samples in raster order:
//! candidate `i` is pixel `i / k` (row major) and channel `selected[i % k]`, with `k`
//! the number of selected channels. A [`PositionOrder`] decides in which order the
//! candidates are visited.
//!
//! The permuted order is reproducible across platforms and implementations:
//!
//! 1. `seed = SHA-256("stegolab/permutation/v1" || password as UTF-8)`
//! 2. `rng = ChaCha20Rng::from_seed(seed)`, consumed through `next_u64`
//! 3. `uniform(n)`: `threshold = (2^64 - n) mod n`, draw `x` until `x >= threshold`, return `x mod n`
//! 4. forward Fisher-Yates over `a = [0, 1, .., N-1]`:
//!    for `i` in `0..N`: `j = i + uniform(N - i)`, swap `a[i]` and `a[j]`
//!
//! Slot `s` of the order is `a[s]` after the shuffle. Only the first `start + count` steps
//! are ever evaluated, the result is the same as shuffling the whole array.

use std::collections::HashMap;

use enum_dispatch::enum_dispatch;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::grid::GridShape;
use crate::options::{ChannelSelection, CodecOptions};
use crate::{Result, StegoError};

const SEED_DOMAIN: &[u8] = b"stegolab/permutation/v1";

/// Coordinate of a single sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
    pub channel: usize,
}

/// Maps candidate indices to sample coordinates
#[derive(Debug, Clone)]
pub struct CandidateSpace {
    width: usize,
    pixels: usize,
    channels: Vec<usize>,
}

impl CandidateSpace {
    pub fn new(shape: &GridShape, selection: ChannelSelection) -> Result<Self> {
        Ok(Self {
            width: shape.width,
            pixels: shape.pixel_count(),
            channels: selection.indices(shape)?,
        })
    }

    pub fn len(&self) -> usize {
        self.pixels * self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of selected channels per pixel
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn position(&self, candidate: usize) -> Position {
        let k = self.channels.len();
        let pixel = candidate / k;
        Position {
            row: pixel / self.width,
            col: pixel % self.width,
            channel: self.channels[candidate % k],
        }
    }
}

/// An order in which the candidates of a carrier are visited
#[enum_dispatch]
pub trait PositionSource {
    /// Candidate indices for the slots `start..start + count` of this order.
    ///
    /// The caller guarantees `start + count <= candidates`.
    fn candidate_indices(&self, candidates: usize, start: usize, count: usize) -> Vec<usize>;
}

/// Raster order, row by row, channel by channel
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterOrder;

impl PositionSource for RasterOrder {
    fn candidate_indices(&self, _candidates: usize, start: usize, count: usize) -> Vec<usize> {
        (start..start + count).collect()
    }
}

/// Password seeded Fisher-Yates permutation of the candidates
#[derive(Clone)]
pub struct PermutedOrder {
    seed: [u8; 32],
}

impl std::fmt::Debug for PermutedOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PermutedOrder(..)")
    }
}

impl PermutedOrder {
    pub fn from_password(password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(SEED_DOMAIN);
        hasher.update(password.as_bytes());
        let digest = hasher.finalize();

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest);
        Self { seed }
    }
}

impl PositionSource for PermutedOrder {
    fn candidate_indices(&self, candidates: usize, start: usize, count: usize) -> Vec<usize> {
        let end = start + count;
        let mut rng = ChaCha20Rng::from_seed(self.seed);
        // sparse view of the shuffled array, untouched entries hold their own index
        let mut swapped: HashMap<usize, usize> = HashMap::with_capacity(end.min(candidates));
        let mut out = Vec::with_capacity(count);

        for i in 0..end {
            let j = i + uniform(&mut rng, (candidates - i) as u64) as usize;
            let at_i = swapped.get(&i).copied().unwrap_or(i);
            let at_j = swapped.get(&j).copied().unwrap_or(j);
            swapped.insert(j, at_i);
            swapped.remove(&i);
            if i >= start {
                out.push(at_j);
            }
        }

        out
    }
}

/// Uniform draw from `0..bound` by rejection sampling, `bound` must not be zero
fn uniform(rng: &mut ChaCha20Rng, bound: u64) -> u64 {
    let threshold = bound.wrapping_neg() % bound;
    loop {
        let x = rng.next_u64();
        if x >= threshold {
            return x % bound;
        }
    }
}

#[enum_dispatch(PositionSource)]
#[derive(Debug, Clone)]
pub enum PositionOrder {
    RasterOrder,
    PermutedOrder,
}

impl PositionOrder {
    /// Permuted when a password is present and sequential order was not forced
    pub fn for_options(options: &CodecOptions) -> Self {
        match options.password().get() {
            Some(password) if options.is_permuted() => PermutedOrder::from_password(password).into(),
            _ => RasterOrder.into(),
        }
    }
}

/// Positions for the slots `start_index..start_index + positions_needed` of `order`.
///
/// Fails with [`StegoError::InsufficientCapacity`] when the carrier has fewer candidates,
/// the error counts positions instead of bits in that case.
pub fn generate(
    shape: &GridShape,
    selection: ChannelSelection,
    positions_needed: usize,
    order: &PositionOrder,
    start_index: usize,
) -> Result<Vec<Position>> {
    let space = CandidateSpace::new(shape, selection)?;
    let end = start_index.saturating_add(positions_needed);
    if end > space.len() {
        return Err(StegoError::InsufficientCapacity {
            required_bits: end,
            available_bits: space.len(),
        });
    }

    Ok(order
        .candidate_indices(space.len(), start_index, positions_needed)
        .into_iter()
        .map(|candidate| space.position(candidate))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn rgb(height: usize, width: usize) -> GridShape {
        GridShape::new(height, width, 3)
    }

    #[test]
    fn should_walk_raster_order_channel_first() {
        let order: PositionOrder = RasterOrder.into();
        let positions = generate(&rgb(2, 2), ChannelSelection::Auto, 5, &order, 0).unwrap();

        assert_eq!(
            positions,
            vec![
                Position { row: 0, col: 0, channel: 0 },
                Position { row: 0, col: 0, channel: 1 },
                Position { row: 0, col: 0, channel: 2 },
                Position { row: 0, col: 1, channel: 0 },
                Position { row: 0, col: 1, channel: 1 },
            ]
        );
    }

    #[test]
    fn should_only_visit_the_selected_channel() {
        let order: PositionOrder = RasterOrder.into();
        let positions = generate(&rgb(2, 3), ChannelSelection::Green, 6, &order, 0).unwrap();

        assert!(positions.iter().all(|p| p.channel == 1));
        assert_eq!(positions[4], Position { row: 1, col: 1, channel: 1 });
    }

    #[test]
    fn should_be_deterministic_for_the_same_password() {
        let a: PositionOrder = PermutedOrder::from_password("secret").into();
        let b: PositionOrder = PermutedOrder::from_password("secret").into();

        let pa = generate(&rgb(16, 16), ChannelSelection::Auto, 100, &a, 0).unwrap();
        let pb = generate(&rgb(16, 16), ChannelSelection::Auto, 100, &b, 0).unwrap();
        assert_eq!(pa, pb);
    }

    #[test]
    fn should_differ_for_different_passwords() {
        let a: PositionOrder = PermutedOrder::from_password("secret").into();
        let b: PositionOrder = PermutedOrder::from_password("Secret").into();

        let pa = generate(&rgb(16, 16), ChannelSelection::Auto, 100, &a, 0).unwrap();
        let pb = generate(&rgb(16, 16), ChannelSelection::Auto, 100, &b, 0).unwrap();
        assert_ne!(pa, pb);
    }

    #[test]
    fn should_not_repeat_positions() {
        let order: PositionOrder = PermutedOrder::from_password("pw").into();
        let shape = rgb(8, 8);
        let positions = generate(&shape, ChannelSelection::Auto, 192, &order, 0).unwrap();
        let unique: HashSet<_> = positions.iter().collect();

        assert_eq!(unique.len(), 192, "a full permutation covers every candidate once");
        assert!(positions.iter().all(|p| p.row < 8 && p.col < 8 && p.channel < 3));
    }

    #[test]
    fn should_continue_seamlessly_from_a_start_index() {
        let order: PositionOrder = PermutedOrder::from_password("pw").into();
        let shape = rgb(10, 10);

        let whole = generate(&shape, ChannelSelection::Auto, 80, &order, 0).unwrap();
        let head = generate(&shape, ChannelSelection::Auto, 30, &order, 0).unwrap();
        let tail = generate(&shape, ChannelSelection::Auto, 50, &order, 30).unwrap();

        assert_eq!(&whole[..30], head.as_slice());
        assert_eq!(&whole[30..], tail.as_slice());
    }

    #[test]
    fn should_actually_shuffle() {
        let order: PositionOrder = PermutedOrder::from_password("pw").into();
        let shuffled = generate(&rgb(10, 10), ChannelSelection::Auto, 50, &order, 0).unwrap();
        let raster = generate(&rgb(10, 10), ChannelSelection::Auto, 50, &PositionOrder::from(RasterOrder), 0).unwrap();

        assert_ne!(shuffled, raster);
    }

    #[test]
    fn should_fail_when_the_carrier_is_too_small() {
        let order: PositionOrder = RasterOrder.into();
        let result = generate(&rgb(2, 2), ChannelSelection::Auto, 10, &order, 5);

        assert!(matches!(
            result,
            Err(StegoError::InsufficientCapacity { .. })
        ));
    }

    #[test]
    fn should_handle_zero_positions() {
        let order: PositionOrder = PermutedOrder::from_password("pw").into();
        assert!(generate(&rgb(2, 2), ChannelSelection::Auto, 0, &order, 12)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn should_choose_the_order_from_options() {
        let options = CodecOptions::builder().password("pw").build().unwrap();
        assert!(matches!(
            PositionOrder::for_options(&options),
            PositionOrder::PermutedOrder(_)
        ));

        let options = CodecOptions::builder()
            .password("pw")
            .sequential(true)
            .build()
            .unwrap();
        assert!(matches!(
            PositionOrder::for_options(&options),
            PositionOrder::RasterOrder(_)
        ));
    }

    #[test]
    fn uniform_should_stay_in_bounds() {
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        for bound in [1u64, 2, 3, 7, 1000, u64::MAX] {
            for _ in 0..100 {
                assert!(uniform(&mut rng, bound) < bound);
            }
        }
    }
}

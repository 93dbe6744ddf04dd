//! Regular/singular group analysis.
//!
//! Each row is cut into groups of four horizontally adjacent samples. The smoothness of a
//! group is `f(G) = Σ |x[j+1] - x[j]|`. Flipping the inner two samples with
//! `F1: x -> x ^ 1` (mask `M`) or `F-1: x -> ((x + 1) ^ 1) - 1` (mask `-M`) makes a group
//! regular when it gets rougher and singular when it gets smoother.
//!
//! In untouched images both masks see about the same regular/singular gap. Random LSBs
//! close the gap of `M` while the gap of `-M` stays open, so
//! `score = 1 - (R_M - S_M) / (R_-M - S_-M)` grows from 0 towards 1 with the amount of
//! embedded data. The classic RS estimate of the embedding rate is reported alongside.

const GROUP: usize = 4;
const MASK: [bool; GROUP] = [false, true, true, false];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsResult {
    /// regular groups under `M`
    pub regular_count: usize,
    /// singular groups under `M`
    pub singular_count: usize,
    /// regular groups under `-M`
    pub regular_negative: usize,
    /// singular groups under `-M`
    pub singular_negative: usize,
    pub groups: usize,
    /// normalized asymmetry of the two masks, `0..=1`
    pub rs_score: f64,
    /// embedding rate from the RS quadratic, `None` where it has no real solution
    pub estimated_rate: Option<f64>,
    pub suspicious: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    regular: usize,
    singular: usize,
    regular_negative: usize,
    singular_negative: usize,
    groups: usize,
}

impl Counts {
    fn gap(&self) -> f64 {
        (self.regular as f64 - self.singular as f64) / self.groups as f64
    }

    fn gap_negative(&self) -> f64 {
        (self.regular_negative as f64 - self.singular_negative as f64) / self.groups as f64
    }
}

#[inline]
fn flip_positive(x: i16) -> i16 {
    x ^ 1
}

#[inline]
fn flip_negative(x: i16) -> i16 {
    ((x + 1) ^ 1) - 1
}

#[inline]
fn smoothness(group: &[i16; GROUP]) -> i16 {
    group.windows(2).map(|w| (w[1] - w[0]).abs()).sum()
}

fn apply(group: &[i16; GROUP], flip: fn(i16) -> i16) -> [i16; GROUP] {
    let mut flipped = *group;
    for (value, masked) in flipped.iter_mut().zip(MASK) {
        if masked {
            *value = flip(*value);
        }
    }
    flipped
}

fn count(samples: &[u8], width: usize, invert_lsbs: bool) -> Counts {
    let mut counts = Counts::default();
    if width < GROUP {
        return counts;
    }

    for row in samples.chunks_exact(width) {
        for chunk in row.chunks_exact(GROUP) {
            let mut group = [0i16; GROUP];
            for (g, &s) in group.iter_mut().zip(chunk) {
                *g = if invert_lsbs { (s ^ 1) as i16 } else { s as i16 };
            }
            let base = smoothness(&group);
            let positive = smoothness(&apply(&group, flip_positive));
            let negative = smoothness(&apply(&group, flip_negative));

            counts.groups += 1;
            if positive > base {
                counts.regular += 1;
            } else if positive < base {
                counts.singular += 1;
            }
            if negative > base {
                counts.regular_negative += 1;
            } else if negative < base {
                counts.singular_negative += 1;
            }
        }
    }

    counts
}

/// Solves the RS quadratic for the embedding rate
fn estimate_rate(original: &Counts, inverted: &Counts) -> Option<f64> {
    let d0 = original.gap();
    let d1 = inverted.gap();
    let dn0 = original.gap_negative();
    let dn1 = inverted.gap_negative();

    let a = 2.0 * (d1 + d0);
    let b = dn0 - dn1 - d1 - 3.0 * d0;
    let c = d0 - dn0;

    let z = if a.abs() < f64::EPSILON {
        if b.abs() < f64::EPSILON {
            return None;
        }
        -c / b
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let z1 = (-b + root) / (2.0 * a);
        let z2 = (-b - root) / (2.0 * a);
        if z1.abs() <= z2.abs() {
            z1
        } else {
            z2
        }
    };

    let rate = z / (z - 0.5);
    rate.is_finite().then(|| rate.clamp(0.0, 1.0))
}

/// Runs RS analysis over one channel given as row major samples of `width` columns
pub fn rs_analysis(samples: &[u8], width: usize, threshold: f64) -> RsResult {
    let original = count(samples, width, false);
    if original.groups == 0 {
        return RsResult {
            regular_count: 0,
            singular_count: 0,
            regular_negative: 0,
            singular_negative: 0,
            groups: 0,
            rs_score: 0.0,
            estimated_rate: None,
            suspicious: false,
        };
    }
    let inverted = count(samples, width, true);

    let gap = original.gap();
    let gap_negative = original.gap_negative();
    let rs_score = if gap_negative > 0.0 {
        (1.0 - gap / gap_negative).clamp(0.0, 1.0)
    } else {
        0.0
    };

    RsResult {
        regular_count: original.regular,
        singular_count: original.singular,
        regular_negative: original.regular_negative,
        singular_negative: original.singular_negative,
        groups: original.groups,
        rs_score,
        estimated_rate: estimate_rate(&original, &inverted),
        suspicious: rs_score > threshold,
    }
}

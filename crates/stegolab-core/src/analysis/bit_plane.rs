//! Noise level of the LSB plane compared with a higher bit plane.
//!
//! Local variance is measured inside non-overlapping square blocks, a partial block at the
//! right or bottom edge is skipped. Images smaller than one block count as one block.

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitPlaneResult {
    /// mean block variance of the LSB plane
    pub lsb_variance: f64,
    /// standard deviation of the LSB block variances
    pub lsb_std: f64,
    /// mean block variance of the reference plane
    pub higher_plane_variance: f64,
    pub variance_ratio: f64,
    pub suspicious: bool,
}

/// Block variances of one bit plane of a channel
fn block_variances(
    samples: &[u8],
    height: usize,
    width: usize,
    bit: u8,
    block_size: usize,
) -> Vec<f64> {
    let bh = block_size.min(height);
    let bw = block_size.min(width);
    if bh == 0 || bw == 0 {
        return Vec::new();
    }

    let mut variances = Vec::with_capacity((height / bh) * (width / bw));
    for top in (0..=height - bh).step_by(bh) {
        for left in (0..=width - bw).step_by(bw) {
            let mut ones = 0usize;
            for row in top..top + bh {
                let line = &samples[row * width + left..row * width + left + bw];
                ones += line.iter().filter(|&&s| (s >> bit) & 1 == 1).count();
            }
            // bits are 0 or 1, so the variance is p * (1 - p)
            let p = ones as f64 / (bh * bw) as f64;
            variances.push(p * (1.0 - p));
        }
    }

    variances
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum / values.len() as f64).sqrt()
}

/// Compares the LSB plane of one channel with bit plane `reference_plane`
pub fn bit_plane_analysis(
    samples: &[u8],
    height: usize,
    width: usize,
    reference_plane: u8,
    block_size: usize,
    ratio_threshold: f64,
) -> BitPlaneResult {
    let lsb = block_variances(samples, height, width, 0, block_size);
    let reference = block_variances(samples, height, width, reference_plane, block_size);

    let lsb_variance = mean(&lsb);
    let higher_plane_variance = mean(&reference);
    let variance_ratio = lsb_variance / (higher_plane_variance + EPSILON);

    BitPlaneResult {
        lsb_variance,
        lsb_std: std_dev(&lsb, lsb_variance),
        higher_plane_variance,
        variance_ratio,
        suspicious: variance_ratio > ratio_threshold,
    }
}

/// Extracts bit plane `bit` of a channel as 0/1 values
pub fn extract_plane(samples: &[u8], bit: u8) -> Vec<u8> {
    samples.iter().map(|s| (s >> bit) & 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PixelGrid;
    use crate::test_utils::{prepare_noisy_gradient, randomize_lsbs};

    /// plateaus of 8x8 pixels with odd values, LSBs are all set
    fn plateaus() -> PixelGrid {
        PixelGrid::from_fn(32, 32, 3, |r, c, ch| (41 + ((r / 8) * 4 + c / 8) * 8 + ch * 2) as u8).unwrap()
    }

    #[test]
    fn should_measure_block_variance() {
        // checkerboard LSBs, p = 0.5 in every block
        let samples: Vec<u8> = (0..64).map(|i| ((i / 8 + i % 8) % 2) as u8).collect();
        let variances = block_variances(&samples, 8, 8, 0, 8);
        assert_eq!(variances, vec![0.25]);

        let variances = block_variances(&samples, 8, 8, 0, 4);
        assert_eq!(variances.len(), 4);
    }

    #[test]
    fn should_stay_calm_on_a_clean_image() {
        let grid = plateaus();
        let result = bit_plane_analysis(&grid.channel_plane(0), 32, 32, 1, 8, 2.0);
        assert_eq!(result.lsb_variance, 0.0);
        assert!(!result.suspicious);
    }

    #[test]
    fn should_stay_calm_when_all_low_planes_are_noisy() {
        let grid = prepare_noisy_gradient(128, 9);
        for channel in 0..3 {
            let result = bit_plane_analysis(&grid.channel_plane(channel), 128, 128, 1, 8, 2.0);
            assert!(result.lsb_variance > 0.1, "{result:?}");
            assert!((0.8..1.25).contains(&result.variance_ratio), "{result:?}");
            assert!(!result.suspicious);
        }
    }

    #[test]
    fn should_flag_noisy_lsbs_over_a_flat_reference() {
        let grid = randomize_lsbs(&plateaus(), 3);
        for channel in 0..3 {
            let result = bit_plane_analysis(&grid.channel_plane(channel), 32, 32, 1, 8, 2.0);
            assert!(result.lsb_variance > 0.15, "{result:?}");
            assert_eq!(result.higher_plane_variance, 0.0);
            assert!(result.suspicious);
            assert!(result.lsb_std >= 0.0);
        }
    }

    #[test]
    fn should_treat_tiny_images_as_one_block() {
        let result = bit_plane_analysis(&[0, 1, 0, 1, 1, 0], 2, 3, 1, 8, 2.0);
        assert!((result.lsb_variance - 0.25).abs() < 1e-12);
        assert!(result.suspicious);

        let result = bit_plane_analysis(&[], 0, 0, 1, 8, 2.0);
        assert_eq!(result.variance_ratio, 0.0);
        assert!(!result.suspicious);
    }

    #[test]
    fn should_extract_a_plane() {
        assert_eq!(extract_plane(&[0b101, 0b010, 0b111], 1), vec![0, 1, 1]);
    }
}

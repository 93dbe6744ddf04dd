//! Pairs of values test.
//!
//! Overwriting LSBs with random bits moves samples between `2i` and `2i + 1`, which
//! equalizes the frequencies within each pair. Untouched images show clearly unequal
//! pairs. The statistic `Σ (h[2i] - e_i)² / e_i` with `e_i = (h[2i] + h[2i+1]) / 2`
//! is therefore unusually small for images with randomized LSBs.
//!
//! Pairs expecting at most [`MIN_EXPECTED`] samples are left out, sparse histogram tails
//! would otherwise read as equalized pairs.
//!
//! The test only sees the histogram. Smooth, noisy images (gradients, skies, defocused
//! photos) populate neighbouring values about equally, so their pairs look equalized without
//! any embedding and the test reports them as suspicious. Images with a combed or peaked
//! histogram are where it separates clean from stego reliably. The aggregated confidence
//! leans on RS analysis for the rest.

use super::distribution::chi_square_cdf;

/// Pairs with an expected count up to this are not tested
pub const MIN_EXPECTED: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareResult {
    pub statistic: f64,
    /// `P(X <= statistic)`, small values mean the pairs are suspiciously balanced
    pub p_value: f64,
    pub degrees_of_freedom: usize,
    /// `1 - p_value`
    pub embedding_probability: f64,
    pub suspicious: bool,
}

impl ChiSquareResult {
    /// Result for channels without enough distinct values to test
    fn inconclusive(degrees_of_freedom: usize) -> Self {
        Self {
            statistic: 0.0,
            p_value: 1.0,
            degrees_of_freedom,
            embedding_probability: 0.0,
            suspicious: false,
        }
    }
}

pub fn histogram(samples: &[u8]) -> [usize; 256] {
    let mut histogram = [0usize; 256];
    for &sample in samples {
        histogram[sample as usize] += 1;
    }
    histogram
}

/// Runs the test over the samples of one channel
pub fn chi_square_test(samples: &[u8], significance: f64) -> ChiSquareResult {
    let histogram = histogram(samples);

    let mut statistic = 0.0;
    let mut buckets = 0usize;
    for pair in histogram.chunks_exact(2) {
        let expected = (pair[0] + pair[1]) as f64 / 2.0;
        if expected <= MIN_EXPECTED {
            continue;
        }
        let deviation = pair[0] as f64 - expected;
        statistic += deviation * deviation / expected;
        buckets += 1;
    }

    if buckets < 2 {
        return ChiSquareResult::inconclusive(0);
    }
    let degrees_of_freedom = buckets - 1;
    let p_value = chi_square_cdf(statistic, degrees_of_freedom);

    ChiSquareResult {
        statistic,
        p_value,
        degrees_of_freedom,
        embedding_probability: 1.0 - p_value,
        suspicious: p_value < significance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{prepare_noisy_gradient, prepare_stretched_gradient, randomize_lsbs};

    #[test]
    fn should_not_flag_a_combed_histogram() {
        let grid = prepare_stretched_gradient(128, 11);
        for channel in 0..3 {
            let samples = grid.channel_plane(channel);
            assert!(samples.iter().any(|s| s & 1 == 1));

            let result = chi_square_test(&samples, 0.05);
            assert!(!result.suspicious, "channel {channel}: {result:?}");
            assert!(result.p_value > 0.99);
            assert!(result.embedding_probability < 0.01);
        }
    }

    #[test]
    fn should_flag_randomized_lsbs() {
        let grid = randomize_lsbs(&prepare_stretched_gradient(128, 11), 7);
        for channel in 0..3 {
            let result = chi_square_test(&grid.channel_plane(channel), 0.05);
            assert!(result.suspicious, "channel {channel}: {result:?}");
            assert!(result.embedding_probability > 0.95);
        }
    }

    #[test]
    fn should_read_flat_histograms_as_equalized() {
        // no embedding at all, the pairs are balanced by the noise alone
        let grid = prepare_noisy_gradient(128, 5);
        for channel in 0..3 {
            let result = chi_square_test(&grid.channel_plane(channel), 0.05);
            assert!(result.embedding_probability > 0.8, "channel {channel}: {result:?}");
        }
    }

    #[test]
    fn should_compute_the_statistic_over_populated_pairs() {
        // pair (10, 11): 12 vs 4, pair (20, 21): 10 vs 10
        let mut samples = vec![10u8; 12];
        samples.extend([11; 4]);
        samples.extend([20; 10]);
        samples.extend([21; 10]);

        let result = chi_square_test(&samples, 0.05);
        assert_eq!(result.degrees_of_freedom, 1);
        // (12 - 8)² / 8 + 0
        assert!((result.statistic - 2.0).abs() < 1e-12);
    }

    #[test]
    fn should_skip_sparse_pairs() {
        // (30, 31) expects 4 samples per value and does not count
        let mut samples = vec![10u8; 12];
        samples.extend([11; 4]);
        samples.extend([20; 10]);
        samples.extend([21; 10]);
        samples.extend([30; 8]);

        let result = chi_square_test(&samples, 0.05);
        assert_eq!(result.degrees_of_freedom, 1);
        assert!((result.statistic - 2.0).abs() < 1e-12);

        let scattered: Vec<u8> = (0..=255).collect();
        let result = chi_square_test(&scattered, 0.05);
        assert_eq!(result.degrees_of_freedom, 0);
        assert!(!result.suspicious);
    }

    #[test]
    fn should_be_inconclusive_on_flat_channels() {
        let result = chi_square_test(&[128; 64], 0.05);
        assert!(!result.suspicious);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.degrees_of_freedom, 0);

        assert!(!chi_square_test(&[], 0.05).suspicious);
    }
}

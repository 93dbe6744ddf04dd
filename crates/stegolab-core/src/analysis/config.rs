use crate::{Result, StegoError};

/// Relative weight of each detector in the aggregated confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorWeights {
    pub chi_square: f64,
    pub rs: f64,
    pub bit_plane: f64,
}

impl Default for DetectorWeights {
    fn default() -> Self {
        Self {
            chi_square: 0.4,
            rs: 0.35,
            bit_plane: 0.25,
        }
    }
}

impl DetectorWeights {
    pub fn total(&self) -> f64 {
        self.chi_square + self.rs + self.bit_plane
    }
}

/// Thresholds and knobs of the steganalysis engine
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// A channel is suspicious when the lower tail chi-square p-value drops below this
    pub chi_square_significance: f64,

    /// A channel is suspicious when the RS score exceeds this
    pub rs_threshold: f64,

    /// A channel is suspicious when LSB noise exceeds the reference plane noise by this factor
    pub bit_plane_ratio_threshold: f64,

    /// Bit plane the LSB plane is compared with, `1..=7`
    pub reference_plane: u8,

    /// Edge length of the square blocks local variance is measured in
    pub block_size: usize,

    pub weights: DetectorWeights,

    /// Confidence from which on an image counts as likely carrying a payload
    pub verdict_threshold: f64,

    /// Render the LSB histogram and bit plane composites
    pub render_visualizations: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            chi_square_significance: 0.05,
            rs_threshold: 0.2,
            bit_plane_ratio_threshold: 2.0,
            reference_plane: 1,
            block_size: 8,
            weights: DetectorWeights::default(),
            verdict_threshold: 0.7,
            render_visualizations: false,
        }
    }
}

impl AnalysisConfig {
    pub fn with_visualizations(mut self, render: bool) -> Self {
        self.render_visualizations = render;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Err(StegoError::InvalidParameters(reason.to_string()));

        if !(0.0..=1.0).contains(&self.chi_square_significance) {
            return invalid("the chi-square significance must be within 0..=1");
        }
        if !(0.0..=1.0).contains(&self.rs_threshold) {
            return invalid("the RS threshold must be within 0..=1");
        }
        if !(0.0..=1.0).contains(&self.verdict_threshold) {
            return invalid("the verdict threshold must be within 0..=1");
        }
        if !(1..=7).contains(&self.reference_plane) {
            return invalid("the reference bit plane must be within 1..=7");
        }
        if self.block_size == 0 {
            return invalid("the block size must not be zero");
        }
        if self.bit_plane_ratio_threshold.is_nan() || self.bit_plane_ratio_threshold <= 1.0 {
            return invalid("the bit plane ratio threshold must be above 1");
        }
        let w = &self.weights;
        let valid_weight = |weight: f64| weight.is_finite() && weight >= 0.0;
        if !(valid_weight(w.chi_square) && valid_weight(w.rs) && valid_weight(w.bit_plane))
            || w.total() <= 0.0
        {
            return invalid("detector weights must be non-negative and not all zero");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_the_defaults() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn should_reject_broken_settings() {
        let config = AnalysisConfig {
            reference_plane: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            weights: DetectorWeights {
                chi_square: 0.0,
                rs: 0.0,
                bit_plane: 0.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            bit_plane_ratio_threshold: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_keep_thresholds_within_the_unit_interval() {
        for value in [-0.1, 1.5, f64::NAN] {
            let config = AnalysisConfig {
                rs_threshold: value,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "rs threshold {value}");

            let config = AnalysisConfig {
                verdict_threshold: value,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "verdict threshold {value}");

            let config = AnalysisConfig {
                chi_square_significance: value,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "significance {value}");
        }

        let config = AnalysisConfig {
            rs_threshold: 1.0,
            verdict_threshold: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_reject_nan_ratios_and_weights() {
        let config = AnalysisConfig {
            bit_plane_ratio_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            weights: DetectorWeights {
                rs: f64::NAN,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Folds the per channel detector results into one confidence value and prose.
//!
//! Every detector contributes the score of its most suspicious channel:
//! the chi-square embedding probability, the RS score and the bit plane ratio mapped
//! linearly so that `1` scores `0` and twice the threshold distance scores `1`.
//! The confidence is the weighted mean of the three scores.

use super::config::{AnalysisConfig, DetectorWeights};
use super::ChannelAnalysis;

/// Per detector score in `0..=1`, taken from the most suspicious channel
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DetectorScores {
    pub chi_square: f64,
    pub rs: f64,
    pub bit_plane: f64,
}

impl DetectorScores {
    pub fn from_channels(channels: &[ChannelAnalysis], config: &AnalysisConfig) -> Self {
        channels.iter().fold(Self::default(), |acc, channel| Self {
            chi_square: acc
                .chi_square
                .max(channel.chi_square.embedding_probability.clamp(0.0, 1.0)),
            rs: acc.rs.max(channel.rs.rs_score.clamp(0.0, 1.0)),
            bit_plane: acc.bit_plane.max(bit_plane_score(
                channel.bit_plane.variance_ratio,
                config.bit_plane_ratio_threshold,
            )),
        })
    }

    /// Weighted mean, clamped to `0..=1`
    pub fn confidence(&self, weights: &DetectorWeights) -> f64 {
        let total = weights.total();
        if total <= 0.0 {
            return 0.0;
        }
        let weighted = weights.chi_square * self.chi_square
            + weights.rs * self.rs
            + weights.bit_plane * self.bit_plane;
        (weighted / total).clamp(0.0, 1.0)
    }
}

fn bit_plane_score(ratio: f64, threshold: f64) -> f64 {
    let score = (ratio - 1.0) / (2.0 * (threshold - 1.0));
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Human readable summary of an analysis
pub fn explain(channels: &[ChannelAnalysis], confidence: f64) -> String {
    let lead = if confidence < 0.3 {
        "No significant steganographic artifacts detected."
    } else if confidence < 0.6 {
        "Some statistical anomalies detected, but inconclusive."
    } else {
        "Strong evidence of steganographic content detected."
    };

    let mut sentences = vec![lead.to_string()];
    let mut flagged = Vec::new();
    for channel in channels {
        let name = capitalize(&channel.channel);
        if channel.chi_square.suspicious {
            flagged.push(channel.channel.as_str());
            sentences.push(format!(
                "{name} channel shows an unnatural LSB distribution (p={:.3}).",
                channel.chi_square.p_value
            ));
        }
        if channel.rs.suspicious {
            sentences.push(format!(
                "{name} channel RS analysis indicates LSB manipulation (score {:.2}).",
                channel.rs.rs_score
            ));
        }
        if channel.bit_plane.suspicious {
            sentences.push(format!(
                "{name} channel LSB plane is {:.1}x noisier than its reference plane.",
                channel.bit_plane.variance_ratio
            ));
        }
    }
    if !flagged.is_empty() {
        sentences.push(format!("Most suspicious channels: {}.", flagged.join(", ")));
    }

    sentences.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Statistical steganalysis of a candidate image, no secret required.
//!
//! Three independent detectors run per colour channel, alpha is ignored:
//! - [`chi_square`] looks for equalized pairs of values,
//! - [`rs`] compares regular and singular groups under a flipping mask and its negation,
//! - [`bit_plane`] compares the noise of the LSB plane with a higher plane.
//!
//! [`confidence`] folds their results into a single value in `0..=1` and an explanation.
//!
//! ```rust
//! use stegolab_core::{analyze, PixelGrid};
//!
//! let grid = PixelGrid::from_fn(32, 32, 3, |row, col, _| (row * 8 + col * 4) as u8).unwrap();
//! let report = analyze(&grid);
//!
//! assert_eq!(report.channels.len(), 3);
//! assert!((0.0..=1.0).contains(&report.confidence));
//! ```

pub mod bit_plane;
pub mod chi_square;
pub mod config;
pub mod confidence;
pub mod distribution;
pub mod render;
pub mod rs;

use log::{debug, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::grid::PixelGrid;
use crate::Result;

pub use bit_plane::BitPlaneResult;
pub use chi_square::ChiSquareResult;
pub use config::{AnalysisConfig, DetectorWeights};
pub use confidence::DetectorScores;
pub use render::Visualizations;
pub use rs::RsResult;

/// Detector results of one colour channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelAnalysis {
    /// `red`, `green`, `blue` or `gray`
    pub channel: String,
    pub chi_square: ChiSquareResult,
    pub rs: RsResult,
    pub bit_plane: BitPlaneResult,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub channels: Vec<ChannelAnalysis>,
    pub scores: DetectorScores,
    pub confidence: f64,
    pub likely_stego: bool,
    pub explanation: String,
    pub visualizations: Option<Visualizations>,
}

impl AnalysisReport {
    pub fn channel(&self, name: &str) -> Option<&ChannelAnalysis> {
        self.channels.iter().find(|c| c.channel == name)
    }
}

/// Names of the colour channels of a grid, in sample order
pub fn channel_names(grid: &PixelGrid) -> Vec<(usize, String)> {
    match grid.shape().color_channels() {
        1 => vec![(0, "gray".to_string())],
        n => ["red", "green", "blue"]
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, name)| (i, name.to_string()))
            .collect(),
    }
}

/// Analyzes `grid` with the default thresholds and weights
pub fn analyze(grid: &PixelGrid) -> AnalysisReport {
    let config = AnalysisConfig::default();
    // the defaults always validate
    run(grid, &config)
}

/// Analyzes `grid` with the given configuration
pub fn analyze_with(grid: &PixelGrid, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    Ok(run(grid, config))
}

fn analyze_channel(grid: &PixelGrid, index: usize, name: &str, config: &AnalysisConfig) -> ChannelAnalysis {
    let samples = grid.channel_plane(index);
    let (height, width) = (grid.height(), grid.width());

    ChannelAnalysis {
        channel: name.to_string(),
        chi_square: chi_square::chi_square_test(&samples, config.chi_square_significance),
        rs: rs::rs_analysis(&samples, width, config.rs_threshold),
        bit_plane: bit_plane::bit_plane_analysis(
            &samples,
            height,
            width,
            config.reference_plane,
            config.block_size,
            config.bit_plane_ratio_threshold,
        ),
    }
}

fn run(grid: &PixelGrid, config: &AnalysisConfig) -> AnalysisReport {
    let names = channel_names(grid);
    let per_channel = |(index, name): &(usize, String)| analyze_channel(grid, *index, name, config);

    #[cfg(feature = "parallel")]
    let channels: Vec<ChannelAnalysis> = names.par_iter().map(per_channel).collect();
    #[cfg(not(feature = "parallel"))]
    let channels: Vec<ChannelAnalysis> = names.iter().map(per_channel).collect();

    let scores = DetectorScores::from_channels(&channels, config);
    let confidence = scores.confidence(&config.weights);
    debug!(
        "detector scores chi-square {:.3}, rs {:.3}, bit plane {:.3} => confidence {confidence:.3}",
        scores.chi_square, scores.rs, scores.bit_plane
    );

    let visualizations = config
        .render_visualizations
        .then(|| render_visualizations(grid, &names));

    AnalysisReport {
        explanation: confidence::explain(&channels, confidence),
        likely_stego: confidence >= config.verdict_threshold,
        channels,
        scores,
        confidence,
        visualizations,
    }
}

fn render_visualizations(grid: &PixelGrid, names: &[(usize, String)]) -> Visualizations {
    let lsb_histogram = match render::lsb_histogram(grid, names) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!("skipping the LSB histogram: {e}");
            None
        }
    };

    let mut bit_planes = Vec::with_capacity(names.len());
    for (index, name) in names {
        match render::bit_plane_composite(grid, *index) {
            Ok(image) => bit_planes.push((name.clone(), image)),
            Err(e) => warn!("skipping the {name} bit planes: {e}"),
        }
    }

    Visualizations {
        lsb_histogram,
        bit_planes,
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use log::info;
use stegolab_core::analysis::{AnalysisConfig, AnalysisReport, Visualizations};
use stegolab_core::StegoError;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{print_figures, Figure};
use crate::CliResult;

/// Estimates whether an image carries LSB hidden data
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image to analyze, PNG or BMP
    #[arg(short = 'i', long = "in", value_name = "image", required = true)]
    pub image: PathBuf,

    /// Write the LSB histogram and bit plane composites as PNGs into this folder
    #[arg(long, value_name = "folder")]
    pub visualizations: Option<PathBuf>,

    /// Chi-square p-value below which a channel counts as suspicious
    #[arg(long, value_name = "p-value", default_value_t = 0.05)]
    pub significance: f64,

    /// RS score above which a channel counts as suspicious
    #[arg(long, value_name = "score", default_value_t = 0.2)]
    pub rs_threshold: f64,

    /// LSB to reference plane noise ratio above which a channel counts as suspicious
    #[arg(long, value_name = "ratio", default_value_t = 2.0)]
    pub bit_plane_threshold: f64,

    /// Confidence from which on the image is reported as likely carrying data
    #[arg(long, value_name = "confidence", default_value_t = 0.7)]
    pub verdict_threshold: f64,
}

#[derive(Tabled)]
struct ChannelRow {
    #[tabled(rename = "channel")]
    channel: String,
    #[tabled(rename = "chi² p-value")]
    p_value: String,
    #[tabled(rename = "RS score")]
    rs_score: String,
    #[tabled(rename = "R / S (M)")]
    rs_counts: String,
    #[tabled(rename = "LSB noise ratio")]
    variance_ratio: String,
    #[tabled(rename = "flagged by")]
    flagged_by: String,
}

impl AnalyzeArgs {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            chi_square_significance: self.significance,
            rs_threshold: self.rs_threshold,
            bit_plane_ratio_threshold: self.bit_plane_threshold,
            verdict_threshold: self.verdict_threshold,
            render_visualizations: self.visualizations.is_some(),
            ..Default::default()
        }
    }

    pub fn run(self) -> CliResult<()> {
        let report = stegolab_core::api::analyze::prepare()
            .with_config(self.config())
            .with_image_file(&self.image)
            .execute()?;

        print_channels(&report);
        print_figures(vec![
            Figure::new("chi-square score", format!("{:.3}", report.scores.chi_square)),
            Figure::new("RS score", format!("{:.3}", report.scores.rs)),
            Figure::new("bit plane score", format!("{:.3}", report.scores.bit_plane)),
            Figure::new("confidence", format!("{:.3}", report.confidence)),
            Figure::new("likely stego", report.likely_stego),
        ]);
        println!("{}", report.explanation);

        if let (Some(folder), Some(visualizations)) = (&self.visualizations, &report.visualizations) {
            write_visualizations(folder, visualizations)?;
        }

        Ok(())
    }
}

fn print_channels(report: &AnalysisReport) {
    let rows = report.channels.iter().map(|c| {
        let flagged: Vec<&str> = [
            (c.chi_square.suspicious, "chi²"),
            (c.rs.suspicious, "RS"),
            (c.bit_plane.suspicious, "bit plane"),
        ]
        .into_iter()
        .filter_map(|(flagged, name)| flagged.then_some(name))
        .collect();

        ChannelRow {
            channel: c.channel.clone(),
            p_value: format!("{:.4}", c.chi_square.p_value),
            rs_score: format!("{:.3}", c.rs.rs_score),
            rs_counts: format!("{} / {}", c.rs.regular_count, c.rs.singular_count),
            variance_ratio: format!("{:.2}", c.bit_plane.variance_ratio),
            flagged_by: flagged.join(", "),
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn write_visualizations(folder: &Path, visualizations: &Visualizations) -> CliResult<()> {
    fs::create_dir_all(folder)?;

    if let Some(histogram) = &visualizations.lsb_histogram {
        let path = folder.join("lsb_histogram.png");
        histogram.save(&path).map_err(StegoError::ImageEncodingError)?;
        info!("LSB histogram written to {path:?}");
    }
    for (channel, composite) in &visualizations.bit_planes {
        let path = folder.join(format!("bit_planes_{channel}.png"));
        composite.save(&path).map_err(StegoError::ImageEncodingError)?;
        info!("{channel} bit planes written to {path:?}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stegolab_core::media::save_image;
    use stegolab_core::PixelGrid;
    use tempfile::tempdir;

    #[test]
    fn should_write_visualizations_into_the_folder() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let image = temp_dir.path().join("image.png");
        let grid = PixelGrid::from_fn(16, 16, 3, |row, col, _| (row * 16 + col) as u8).unwrap();
        save_image(&grid, &image).unwrap();

        let folder = temp_dir.path().join("visuals");
        AnalyzeArgs {
            image,
            visualizations: Some(folder.clone()),
            significance: 0.05,
            rs_threshold: 0.2,
            bit_plane_threshold: 2.0,
            verdict_threshold: 0.7,
        }
        .run()
        .expect("Failed to analyze the image");

        assert!(folder.join("lsb_histogram.png").exists());
        for channel in ["red", "green", "blue"] {
            assert!(folder.join(format!("bit_planes_{channel}.png")).exists());
        }
    }
}

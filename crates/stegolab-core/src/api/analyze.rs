use std::path::Path;

use super::ImageSource;
use crate::analysis::{self, AnalysisConfig, AnalysisReport};
use crate::grid::PixelGrid;
use crate::StegoError;

pub fn prepare() -> AnalyzeApi {
    AnalyzeApi::default()
}

#[derive(Default, Debug)]
pub struct AnalyzeApi {
    image: Option<ImageSource>,
    config: AnalysisConfig,
}

impl AnalyzeApi {
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Render the LSB histogram and bit plane composites into the report
    pub fn with_visualizations(mut self, render: bool) -> Self {
        self.config.render_visualizations = render;
        self
    }

    pub fn with_image(mut self, image: PixelGrid) -> Self {
        self.image = Some(ImageSource::Grid(image));
        self
    }

    pub fn with_image_file(mut self, image: impl AsRef<Path>) -> Self {
        self.image = Some(ImageSource::File(image.as_ref().to_path_buf()));
        self
    }

    pub fn execute(self) -> Result<AnalysisReport, StegoError> {
        let Some(image) = self.image else {
            return Err(StegoError::CarrierNotSet);
        };

        analysis::analyze_with(&image.load()?, &self.config)
    }
}

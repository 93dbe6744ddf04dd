use std::path::{Path, PathBuf};

use super::ImageSource;
use crate::grid::PixelGrid;
use crate::{pipeline, ExtractOptions, StegoError};

pub fn prepare() -> ExtractApi {
    ExtractApi::default()
}

#[derive(Default, Debug)]
pub struct ExtractApi {
    stego: Option<ImageSource>,
    output: Option<PathBuf>,
    options: ExtractOptions,
}

impl ExtractApi {
    /// Use the options the payload was embedded with
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// This is the decoded image that contains the payload
    pub fn from_stego(mut self, stego: PixelGrid) -> Self {
        self.stego = Some(ImageSource::Grid(stego));
        self
    }

    /// This is the PNG or BMP file that contains the payload
    pub fn from_stego_file(mut self, stego: impl AsRef<Path>) -> Self {
        self.stego = Some(ImageSource::File(stego.as_ref().to_path_buf()));
        self
    }

    /// Also writes the payload to this file
    pub fn into_output_file(mut self, output: impl AsRef<Path>) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// Execute the extraction and return the payload
    pub fn execute(self) -> Result<Vec<u8>, StegoError> {
        let Some(stego) = self.stego else {
            return Err(StegoError::CarrierNotSet);
        };

        let stego = stego.load()?;
        let payload = pipeline::extract(&stego, &self.options)?;

        if let Some(output) = self.output {
            std::fs::write(output, &payload)?;
        }

        Ok(payload)
    }
}

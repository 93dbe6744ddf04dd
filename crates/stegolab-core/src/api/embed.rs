use std::path::{Path, PathBuf};

use log::debug;

use super::ImageSource;
use crate::grid::PixelGrid;
use crate::pipeline::{self, EmbedOutcome};
use crate::{media, EmbedOptions, StegoError};

pub fn prepare() -> EmbedApi {
    EmbedApi::default()
}

#[derive(Default, Debug)]
pub struct EmbedApi {
    carrier: Option<ImageSource>,
    payload: Option<Vec<u8>>,
    payload_file: Option<PathBuf>,
    output: Option<PathBuf>,
    options: EmbedOptions,
}

impl EmbedApi {
    pub fn with_options(mut self, options: EmbedOptions) -> Self {
        self.options = options;
        self
    }

    /// The decoded carrier image
    pub fn with_carrier(mut self, carrier: PixelGrid) -> Self {
        self.carrier = Some(ImageSource::Grid(carrier));
        self
    }

    /// A PNG or BMP file used as carrier
    pub fn with_carrier_file(mut self, carrier: impl AsRef<Path>) -> Self {
        self.carrier = Some(ImageSource::File(carrier.as_ref().to_path_buf()));
        self
    }

    pub fn with_payload(mut self, payload: &[u8]) -> Self {
        self.payload = Some(payload.to_vec());
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.payload = Some(message.as_bytes().to_vec());
        self
    }

    pub fn use_message<S: AsRef<str>>(mut self, message: Option<S>) -> Self {
        self.payload = message.map(|s| s.as_ref().as_bytes().to_vec());
        self
    }

    /// Hides the bytes of this file, read when executing
    pub fn with_payload_file(mut self, payload_file: impl AsRef<Path>) -> Self {
        self.payload_file = Some(payload_file.as_ref().to_path_buf());
        self
    }

    /// Also writes the stego image to this PNG or BMP file
    pub fn with_output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn execute(self) -> Result<EmbedOutcome, StegoError> {
        let Some(carrier) = self.carrier else {
            return Err(StegoError::CarrierNotSet);
        };
        // fail on a lossy target before doing any work
        if let Some(output) = &self.output {
            media::lossless_format(output)?;
        }
        let payload = match (self.payload, self.payload_file) {
            (Some(payload), _) => payload,
            (None, Some(file)) => std::fs::read(file)?,
            (None, None) => return Err(StegoError::MissingPayload),
        };

        let carrier = carrier.load()?;
        let outcome = pipeline::embed(&carrier, &payload, &self.options)?;

        if let Some(output) = self.output {
            media::save_image(&outcome.stego, &output)?;
            debug!("stego image written to {output:?}");
        }

        Ok(outcome)
    }
}

use std::path::PathBuf;

use clap::Args;
use log::info;

use super::{print_figures, Figure};
use crate::cli::CodecArgs;
use crate::CliResult;

/// Hides a message or a file in a PNG or BMP image
#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Carrier image, PNG or BMP, used readonly
    #[arg(short = 'i', long = "in", value_name = "carrier image", required = true)]
    pub carrier: PathBuf,

    /// The stego image will be stored in this PNG or BMP file
    #[arg(
        short = 'o',
        long = "out",
        value_name = "output image file",
        required = true
    )]
    pub write_to_file: PathBuf,

    /// File whose bytes are hidden in the image
    #[arg(
        short = 'd',
        long = "data",
        value_name = "data file",
        required_unless_present = "message",
        conflicts_with = "message"
    )]
    pub data_file: Option<PathBuf>,

    /// A text message that will be hidden
    #[arg(
        short,
        long,
        value_name = "text message",
        required_unless_present = "data_file"
    )]
    pub message: Option<String>,

    #[command(flatten)]
    pub codec: CodecArgs,
}

impl EmbedArgs {
    pub fn run(self) -> CliResult<()> {
        let options = self.codec.to_options(true)?;

        let mut api = stegolab_core::api::embed::prepare()
            .with_options(options)
            .with_carrier_file(&self.carrier)
            .with_output(&self.write_to_file)
            .use_message(self.message);
        if let Some(data_file) = self.data_file {
            api = api.with_payload_file(data_file);
        }
        let outcome = api.execute()?;
        info!("stego image written to {:?}", self.write_to_file);

        let metrics = outcome.metrics;
        print_figures(vec![
            Figure::new("payload size", format!("{} bytes", metrics.payload_size)),
            Figure::new("capacity", format!("{} bytes", metrics.capacity_bytes)),
            Figure::new(
                "capacity used",
                format!("{:.1} %", metrics.embedding_efficiency * 100.0),
            ),
            Figure::new("bits per channel", metrics.bits_per_channel),
            Figure::new("channels used", metrics.channels_used),
            Figure::new("samples touched", metrics.positions_used),
            Figure::new("PSNR", format!("{:.2} dB", metrics.psnr)),
            Figure::new("SSIM", format!("{:.5}", metrics.ssim)),
        ]);

        Ok(())
    }
}

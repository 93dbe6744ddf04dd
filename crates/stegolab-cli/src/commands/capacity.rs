use std::path::PathBuf;

use clap::Args;
use stegolab_core::capacity::{capacity_bits, max_payload_bytes};
use stegolab_core::crypto::OVERHEAD;
use stegolab_core::media::open_image;

use super::{print_figures, Figure};
use crate::cli::LayoutArgs;
use crate::CliResult;

/// Shows how many bytes an image can carry
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// Carrier image, PNG or BMP
    #[arg(short = 'i', long = "in", value_name = "carrier image", required = true)]
    pub carrier: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

impl CapacityArgs {
    pub fn run(self) -> CliResult<()> {
        let options = self.layout.to_options()?;
        let grid = open_image(&self.carrier)?;
        let shape = grid.shape();

        let bits = capacity_bits(&shape, options.channels(), options.bits_per_channel())?;
        let plain = max_payload_bytes(&shape, &options)?;

        print_figures(vec![
            Figure::new("dimensions", format!("{}x{}", shape.width, shape.height)),
            Figure::new("channels", options.channels()),
            Figure::new("bits per channel", options.bits_per_channel().bits()),
            Figure::new("capacity", format!("{bits} bits")),
            Figure::new("header", format!("{} bytes", options.header_format().byte_len())),
            Figure::new("max payload", format!("{plain} bytes")),
            Figure::new(
                "max payload encrypted",
                format!("{} bytes", plain.saturating_sub(OVERHEAD)),
            ),
        ]);

        Ok(())
    }
}

use std::path::PathBuf;

use clap::Args;
use log::info;
use stegolab_core::PayloadKind;

use crate::cli::CodecArgs;
use crate::CliResult;

/// Extracts a payload hidden with the same codec settings
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Stego image that contains the payload
    #[arg(
        short = 'i',
        long = "in",
        value_name = "stego image",
        required = true
    )]
    pub stego: PathBuf,

    /// The payload will be stored in this file, text payloads are printed otherwise
    #[arg(short = 'o', long = "out", value_name = "output file")]
    pub output_file: Option<PathBuf>,

    #[command(flatten)]
    pub codec: CodecArgs,
}

impl ExtractArgs {
    pub fn run(self) -> CliResult<()> {
        let options = self.codec.to_options(false)?;

        let mut api = stegolab_core::api::extract::prepare()
            .with_options(options)
            .from_stego_file(&self.stego);
        if let Some(output_file) = &self.output_file {
            api = api.into_output_file(output_file);
        }
        let payload = api.execute()?;

        match (&self.output_file, PayloadKind::of(&payload)) {
            (Some(output_file), _) => {
                info!("{} payload bytes written to {output_file:?}", payload.len())
            }
            (None, PayloadKind::Text) => println!("{}", String::from_utf8_lossy(&payload)),
            (None, PayloadKind::Binary) => eprintln!(
                "The payload is {} bytes of binary data, use --out to store it in a file",
                payload.len()
            ),
        }

        Ok(())
    }
}

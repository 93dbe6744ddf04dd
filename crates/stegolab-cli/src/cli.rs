use clap::{Args, Parser, Subcommand};
use dialoguer::Password;
use stegolab_core::{BitsPerChannel, ChannelSelection, CodecOptions, HeaderFormat};

use crate::commands::*;
use crate::CliResult;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Embed(embed::EmbedArgs),
    Extract(extract::ExtractArgs),
    Analyze(analyze::AnalyzeArgs),
    Capacity(capacity::CapacityArgs),
}

/// Where and how densely the payload is laid out
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Low bits used per color sample
    #[arg(
        short,
        long,
        value_name = "1|2",
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(1..=2)
    )]
    pub bits: u8,

    /// Color channels that carry data: auto, red, green or blue
    #[arg(short, long, value_name = "channels", default_value_t = ChannelSelection::Auto)]
    pub channels: ChannelSelection,

    /// Payload header layout: standard (16 bytes) or minimal (8 bytes)
    #[arg(long, value_name = "format", default_value_t = HeaderFormat::Standard)]
    pub header: HeaderFormat,
}

impl LayoutArgs {
    pub fn to_options(&self) -> CliResult<CodecOptions> {
        let options = CodecOptions::builder()
            .bits_per_channel(BitsPerChannel::try_from(self.bits)?)
            .channels(self.channels)
            .header_format(self.header)
            .build()?;

        Ok(options)
    }
}

/// Codec settings, extraction needs the very same ones embedding used
#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Password that permutes the embedding positions (and encrypts with --encrypt)
    #[arg(short, long, value_name = "password")]
    pub password: Option<String>,

    /// Encrypt the payload with the password, prompts for one if none is given
    #[arg(short, long)]
    pub encrypt: bool,

    /// Visit positions in raster order even when a password is given
    #[arg(long)]
    pub sequential: bool,
}

impl CodecArgs {
    /// Builds the codec options, asking for a password when encryption lacks one
    pub fn to_options(&self, confirm_password: bool) -> CliResult<CodecOptions> {
        let password = match &self.password {
            None if self.encrypt => Some(ask_for_password(confirm_password)?),
            other => other.clone(),
        };

        let options = CodecOptions::builder()
            .bits_per_channel(BitsPerChannel::try_from(self.layout.bits)?)
            .channels(self.layout.channels)
            .header_format(self.layout.header)
            .use_password(password)
            .encrypt(self.encrypt)
            .sequential(self.sequential)
            .build()?;

        Ok(options)
    }
}

pub fn ask_for_password(confirm: bool) -> CliResult<String> {
    let prompt = Password::new()
        .with_prompt("Password")
        .allow_empty_password(false);
    let password = if confirm {
        prompt
            .with_confirmation("Repeat password", "Error: the passwords don't match.")
            .interact()?
    } else {
        prompt.interact()?
    };

    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn should_parse_codec_flags() {
        let args = CliArgs::parse_from([
            "stegolab", "embed", "-i", "in.png", "-o", "out.png", "-m", "hi", "--bits", "2",
            "--channels", "green", "--header", "minimal", "-p", "secret", "--sequential",
        ]);
        let Commands::Embed(embed) = args.command else {
            panic!("expected the embed command");
        };

        let options = embed.codec.to_options(true).unwrap();
        assert_eq!(options.bits_per_channel(), BitsPerChannel::Two);
        assert_eq!(options.channels(), ChannelSelection::Green);
        assert_eq!(options.header_format(), HeaderFormat::Minimal);
        assert_eq!(options.password().get(), Some("secret"));
        assert!(!options.is_permuted());
    }

    #[test]
    fn should_reject_three_bits() {
        let result = CliArgs::try_parse_from([
            "stegolab", "capacity", "-i", "in.png", "--bits", "3",
        ]);
        assert!(result.is_err());
    }
}

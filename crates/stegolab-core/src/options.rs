use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::grid::GridShape;
use crate::password::Password;
use crate::{Result, StegoError};

/// How many low order bits of every selected sample carry payload
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BitsPerChannel {
    #[default]
    One = 1,
    Two = 2,
}

impl BitsPerChannel {
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Bit mask covering the payload carrying bits of a sample
    pub fn mask(self) -> u8 {
        match self {
            BitsPerChannel::One => 0b01,
            BitsPerChannel::Two => 0b11,
        }
    }

    /// Number of positions needed to hold `bit_count` bits
    pub fn positions_for(self, bit_count: usize) -> usize {
        bit_count.div_ceil(self.bits() as usize)
    }
}

impl TryFrom<u8> for BitsPerChannel {
    type Error = StegoError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(BitsPerChannel::One),
            2 => Ok(BitsPerChannel::Two),
            other => Err(StegoError::InvalidParameters(format!(
                "bits per channel must be 1 or 2, got {other}"
            ))),
        }
    }
}

/// Which color channels of a pixel carry payload
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSelection {
    /// every color channel, alpha is never used
    #[default]
    Auto,
    Red,
    Green,
    Blue,
}

impl ChannelSelection {
    /// Channel indices used on a grid of the given shape, in embedding order.
    ///
    /// `Auto` selects all color channels, so three on RGB(A) and one on gray grids.
    /// A single color channel can only be selected on RGB(A) grids.
    pub fn indices(self, shape: &GridShape) -> Result<Vec<usize>> {
        let colors = shape.color_channels();
        let single = |index: usize| {
            if colors == 3 {
                Ok(vec![index])
            } else {
                Err(StegoError::InvalidParameters(format!(
                    "the {} channel requires an RGB carrier, this one has {colors} color channel(s)",
                    self
                )))
            }
        };

        match self {
            ChannelSelection::Auto => Ok((0..colors).collect()),
            ChannelSelection::Red => single(0),
            ChannelSelection::Green => single(1),
            ChannelSelection::Blue => single(2),
        }
    }
}

impl Display for ChannelSelection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelSelection::Auto => "auto",
            ChannelSelection::Red => "red",
            ChannelSelection::Green => "green",
            ChannelSelection::Blue => "blue",
        };
        f.write_str(name)
    }
}

impl FromStr for ChannelSelection {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" | "rgb" => Ok(ChannelSelection::Auto),
            "red" | "r" => Ok(ChannelSelection::Red),
            "green" | "g" => Ok(ChannelSelection::Green),
            "blue" | "b" => Ok(ChannelSelection::Blue),
            other => Err(StegoError::InvalidParameters(format!(
                "unknown channel selection '{other}', use auto, red, green or blue"
            ))),
        }
    }
}

/// Layout of the payload header, see [`crate::frame`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFormat {
    /// 16 bytes: magic, 32 bit length, CRC32, reserved word
    #[default]
    Standard,
    /// 8 bytes: short magic, 24 bit length, 24 bit checksum
    Minimal,
}

impl HeaderFormat {
    /// Header size in bytes
    pub fn byte_len(self) -> usize {
        match self {
            HeaderFormat::Standard => 16,
            HeaderFormat::Minimal => 8,
        }
    }

    pub fn bit_len(self) -> usize {
        self.byte_len() * 8
    }

    /// Largest body the length field can describe
    pub fn max_body_len(self) -> usize {
        match self {
            HeaderFormat::Standard => u32::MAX as usize,
            HeaderFormat::Minimal => 0x00FF_FFFF,
        }
    }
}

impl Display for HeaderFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HeaderFormat::Standard => f.write_str("standard"),
            HeaderFormat::Minimal => f.write_str("minimal"),
        }
    }
}

impl FromStr for HeaderFormat {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(HeaderFormat::Standard),
            "minimal" => Ok(HeaderFormat::Minimal),
            other => Err(StegoError::InvalidParameters(format!(
                "unknown header format '{other}', use standard or minimal"
            ))),
        }
    }
}

/// Codec configuration shared by embedding and extraction.
///
/// Extraction only succeeds with the very same options the payload was embedded with.
/// Built through [`CodecOptions::builder`], which refuses encryption without a password.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    bits_per_channel: BitsPerChannel,
    channels: ChannelSelection,
    password: Password,
    encrypt: bool,
    sequential: bool,
    header_format: HeaderFormat,
}

/// Options for [`crate::embed`]
pub type EmbedOptions = CodecOptions;

/// Options for [`crate::extract`]
pub type ExtractOptions = CodecOptions;

impl CodecOptions {
    pub fn builder() -> CodecOptionsBuilder {
        CodecOptionsBuilder::default()
    }

    pub fn bits_per_channel(&self) -> BitsPerChannel {
        self.bits_per_channel
    }

    pub fn channels(&self) -> ChannelSelection {
        self.channels
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn encrypt(&self) -> bool {
        self.encrypt
    }

    /// Positions are visited in raster order, even when a password is present
    pub fn sequential(&self) -> bool {
        self.sequential
    }

    pub fn header_format(&self) -> HeaderFormat {
        self.header_format
    }

    /// Whether positions are shuffled with a password seeded permutation
    pub fn is_permuted(&self) -> bool {
        !self.sequential && self.password.is_some()
    }
}

#[derive(Debug, Default)]
pub struct CodecOptionsBuilder {
    options: CodecOptions,
}

impl CodecOptionsBuilder {
    pub fn bits_per_channel(mut self, bits: BitsPerChannel) -> Self {
        self.options.bits_per_channel = bits;
        self
    }

    pub fn channels(mut self, channels: ChannelSelection) -> Self {
        self.options.channels = channels;
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.options.password = password.into();
        self
    }

    /// If `None` is passed, no password will be used, which also means neither encryption nor permutation
    pub fn use_password<S: AsRef<str>>(mut self, password: Option<S>) -> Self {
        self.options.password = password.map(|p| p.as_ref().to_string()).into();
        self
    }

    pub fn encrypt(mut self, encrypt: bool) -> Self {
        self.options.encrypt = encrypt;
        self
    }

    pub fn sequential(mut self, sequential: bool) -> Self {
        self.options.sequential = sequential;
        self
    }

    pub fn header_format(mut self, header_format: HeaderFormat) -> Self {
        self.options.header_format = header_format;
        self
    }

    pub fn build(self) -> Result<CodecOptions> {
        if self.options.encrypt && !self.options.password.is_some() {
            return Err(StegoError::InvalidParameters(
                "encryption requires a non-empty password".to_string(),
            ));
        }

        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_one_bit_all_channels_standard_header() {
        let options = CodecOptions::default();
        assert_eq!(options.bits_per_channel(), BitsPerChannel::One);
        assert_eq!(options.channels(), ChannelSelection::Auto);
        assert_eq!(options.header_format(), HeaderFormat::Standard);
        assert!(!options.encrypt());
        assert!(!options.is_permuted());
    }

    #[test]
    fn should_refuse_encryption_without_password() {
        let result = CodecOptions::builder().encrypt(true).build();
        assert!(matches!(result, Err(StegoError::InvalidParameters(_))));

        let result = CodecOptions::builder().encrypt(true).password("").build();
        assert!(
            matches!(result, Err(StegoError::InvalidParameters(_))),
            "an empty password is no password"
        );

        let options = CodecOptions::builder()
            .encrypt(true)
            .password("secret")
            .build()
            .unwrap();
        assert!(options.encrypt());
    }

    #[test]
    fn should_permute_only_with_password_and_not_sequential() {
        let options = CodecOptions::builder().password("pw").build().unwrap();
        assert!(options.is_permuted());

        let options = CodecOptions::builder()
            .password("pw")
            .sequential(true)
            .build()
            .unwrap();
        assert!(!options.is_permuted());

        let options = CodecOptions::builder().use_password(None::<&str>).build().unwrap();
        assert!(!options.is_permuted());
    }

    #[test]
    fn should_not_leak_the_password_in_debug_output() {
        let options = CodecOptions::builder().password("hunter2").build().unwrap();
        let debug = format!("{options:?}");
        assert!(!debug.contains("hunter2"), "{debug}");
    }

    #[test]
    fn should_parse_bits_per_channel() {
        assert_eq!(BitsPerChannel::try_from(2).unwrap(), BitsPerChannel::Two);
        assert!(BitsPerChannel::try_from(3).is_err());
        assert_eq!(BitsPerChannel::Two.positions_for(17), 9);
        assert_eq!(BitsPerChannel::One.positions_for(17), 17);
    }

    #[test]
    fn should_resolve_channel_indices() {
        let rgb = GridShape::new(2, 2, 3);
        let rgba = GridShape::new(2, 2, 4);
        let gray = GridShape::new(2, 2, 1);

        assert_eq!(ChannelSelection::Auto.indices(&rgb).unwrap(), vec![0, 1, 2]);
        assert_eq!(ChannelSelection::Auto.indices(&rgba).unwrap(), vec![0, 1, 2]);
        assert_eq!(ChannelSelection::Auto.indices(&gray).unwrap(), vec![0]);
        assert_eq!(ChannelSelection::Blue.indices(&rgba).unwrap(), vec![2]);
        assert!(ChannelSelection::Green.indices(&gray).is_err());
    }

    #[test]
    fn should_parse_names() {
        assert_eq!("Red".parse::<ChannelSelection>().unwrap(), ChannelSelection::Red);
        assert_eq!("auto".parse::<ChannelSelection>().unwrap(), ChannelSelection::Auto);
        assert!("alpha".parse::<ChannelSelection>().is_err());
        assert_eq!("minimal".parse::<HeaderFormat>().unwrap(), HeaderFormat::Minimal);
    }
}

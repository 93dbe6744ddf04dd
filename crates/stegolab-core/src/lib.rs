//! # StegoLab Core
//!
//! LSB steganography on lossless raster images and the matching statistical steganalysis.
//!
//! - [`embed`] hides a payload in the least significant bits of a [`PixelGrid`]
//! - [`extract`] recovers it, given the same [`CodecOptions`]
//! - [`analyze`] estimates whether an image already carries LSB hidden data
//!
//! The builders in [`api`] wrap these calls for callers that collect their inputs step by step.
//!
//! # Usage Examples
//!
//! ## Hide and recover a message
//!
//! ```rust
//! use stegolab_core::{CodecOptions, PixelGrid};
//!
//! let carrier = PixelGrid::from_fn(32, 32, 3, |row, col, channel| {
//!     (row * 7 + col * 3 + channel * 50) as u8
//! })
//! .expect("Failed to build the carrier");
//!
//! let options = CodecOptions::builder()
//!     .password("SuperSecret42") // permutes the embedding positions
//!     .build()
//!     .expect("Invalid options");
//!
//! let outcome = stegolab_core::embed(&carrier, b"Hello, World!", &options)
//!     .expect("Failed to hide the message");
//! assert!(outcome.metrics.psnr > 40.0);
//!
//! let payload = stegolab_core::extract(&outcome.stego, &options)
//!     .expect("Failed to recover the message");
//! assert_eq!(payload, b"Hello, World!");
//! ```
//!
//! ## Check an image for hidden data
//!
//! ```rust
//! use stegolab_core::PixelGrid;
//!
//! let grid = PixelGrid::filled(16, 16, 3, 128).expect("Failed to build the grid");
//! let report = stegolab_core::analyze(&grid);
//!
//! assert!(!report.likely_stego);
//! println!("{}", report.explanation);
//! ```

#![warn(clippy::redundant_else)]

pub mod analysis;
pub mod api;
pub mod bit_codec;
pub mod capacity;
pub mod crypto;
pub mod error;
pub mod frame;
pub mod grid;
pub mod media;
pub mod options;
pub mod password;
pub mod payload;
pub mod pipeline;
pub mod positions;
pub mod quality;
pub mod result;

pub use crate::analysis::{analyze, analyze_with, AnalysisConfig, AnalysisReport};
pub use crate::error::StegoError;
pub use crate::grid::{GridShape, PixelGrid};
pub use crate::options::{
    BitsPerChannel, ChannelSelection, CodecOptions, EmbedOptions, ExtractOptions, HeaderFormat,
};
pub use crate::password::Password;
pub use crate::payload::PayloadKind;
pub use crate::pipeline::{embed, extract, EmbedMetrics, EmbedOutcome};
pub use crate::result::Result;

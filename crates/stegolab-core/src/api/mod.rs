//! Builders around [`crate::embed`], [`crate::extract`] and [`crate::analyze`] that collect
//! their inputs step by step and accept image files as well as decoded grids.

pub mod analyze;
pub mod embed;
pub mod extract;

use std::path::PathBuf;

use crate::grid::PixelGrid;
use crate::media;
use crate::Result;

/// An image given either decoded or as a PNG/BMP file
#[derive(Debug, Clone)]
pub(crate) enum ImageSource {
    Grid(PixelGrid),
    File(PathBuf),
}

impl ImageSource {
    pub(crate) fn load(self) -> Result<PixelGrid> {
        match self {
            ImageSource::Grid(grid) => Ok(grid),
            ImageSource::File(path) => media::open_image(path),
        }
    }
}

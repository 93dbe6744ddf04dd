//! In-memory pixel grid the codec and the detectors operate on.

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::{Result, StegoError};

/// Bits per sample, only 8 bit images are supported
pub const BIT_DEPTH: u8 = 8;

/// Dimensions of a grid, `(height, width, channels)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl GridShape {
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.height * self.width
    }

    pub fn sample_count(&self) -> usize {
        self.pixel_count() * self.channels
    }

    /// Number of color channels, alpha is not counted
    pub fn color_channels(&self) -> usize {
        match self.channels {
            4 => 3,
            2 => 1,
            c => c,
        }
    }
}

/// A decoded raster image as samples addressed by `[row][col][channel]`.
///
/// Samples are stored interleaved and row major, exactly like `image::ImageBuffer` does,
/// so converting from and into `image` buffers is a plain move of the sample vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    shape: GridShape,
    samples: Vec<u8>,
}

impl PixelGrid {
    /// Wraps raw interleaved samples.
    ///
    /// Fails if the channel count is not within `1..=4` or if the buffer length
    /// does not match `height * width * channels`.
    pub fn from_raw(height: usize, width: usize, channels: usize, samples: Vec<u8>) -> Result<Self> {
        if !(1..=4).contains(&channels) {
            return Err(StegoError::InvalidParameters(format!(
                "a pixel grid needs 1 to 4 channels, got {channels}"
            )));
        }
        let shape = GridShape::new(height, width, channels);
        if samples.len() != shape.sample_count() {
            return Err(StegoError::InvalidParameters(format!(
                "expected {} samples for a {height}x{width}x{channels} grid, got {}",
                shape.sample_count(),
                samples.len()
            )));
        }

        Ok(Self { shape, samples })
    }

    /// A grid where every sample has the same value
    pub fn filled(height: usize, width: usize, channels: usize, value: u8) -> Result<Self> {
        Self::from_raw(
            height,
            width,
            channels,
            vec![value; height * width * channels],
        )
    }

    /// Builds a grid by asking `f(row, col, channel)` for every sample
    pub fn from_fn<F>(height: usize, width: usize, channels: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> u8,
    {
        let mut samples = Vec::with_capacity(height * width * channels);
        for row in 0..height {
            for col in 0..width {
                for channel in 0..channels {
                    samples.push(f(row, col, channel));
                }
            }
        }
        Self::from_raw(height, width, channels, samples)
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    pub fn bit_depth(&self) -> u8 {
        BIT_DEPTH
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    #[inline]
    fn offset(&self, row: usize, col: usize, channel: usize) -> usize {
        (row * self.shape.width + col) * self.shape.channels + channel
    }

    /// Sample at the given coordinate, panics when out of bounds like slice indexing does
    #[inline]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> u8 {
        self.samples[self.offset(row, col, channel)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) {
        let offset = self.offset(row, col, channel);
        self.samples[offset] = value;
    }

    /// All samples of one channel in raster order
    pub fn channel_plane(&self, channel: usize) -> Vec<u8> {
        self.samples
            .iter()
            .skip(channel)
            .step_by(self.shape.channels)
            .copied()
            .collect()
    }

    /// Converts the grid back into an `image` crate image of matching color type
    pub fn to_dynamic_image(&self) -> Result<DynamicImage> {
        let (w, h) = self.image_dimensions()?;
        let samples = self.samples.clone();
        let image = match self.shape.channels {
            1 => GrayImage::from_raw(w, h, samples).map(DynamicImage::ImageLuma8),
            2 => image::GrayAlphaImage::from_raw(w, h, samples).map(DynamicImage::ImageLumaA8),
            3 => RgbImage::from_raw(w, h, samples).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(w, h, samples).map(DynamicImage::ImageRgba8),
            _ => None,
        };

        image.ok_or_else(|| {
            StegoError::InvalidParameters(format!(
                "cannot build an image from a {}x{}x{} grid",
                self.shape.height, self.shape.width, self.shape.channels
            ))
        })
    }

    fn image_dimensions(&self) -> Result<(u32, u32)> {
        let w = u32::try_from(self.shape.width);
        let h = u32::try_from(self.shape.height);
        match (w, h) {
            (Ok(w), Ok(h)) => Ok((w, h)),
            _ => Err(StegoError::InvalidParameters(
                "grid dimensions exceed the image size limits".to_string(),
            )),
        }
    }
}

impl From<RgbImage> for PixelGrid {
    fn from(image: RgbImage) -> Self {
        let shape = GridShape::new(image.height() as usize, image.width() as usize, 3);
        Self {
            shape,
            samples: image.into_raw(),
        }
    }
}

impl From<RgbaImage> for PixelGrid {
    fn from(image: RgbaImage) -> Self {
        let shape = GridShape::new(image.height() as usize, image.width() as usize, 4);
        Self {
            shape,
            samples: image.into_raw(),
        }
    }
}

impl From<GrayImage> for PixelGrid {
    fn from(image: GrayImage) -> Self {
        let shape = GridShape::new(image.height() as usize, image.width() as usize, 1);
        Self {
            shape,
            samples: image.into_raw(),
        }
    }
}

/// 8 bit gray, gray alpha, RGB and RGBA images are taken as they are, everything else
/// becomes 8 bit RGB(A).
impl From<DynamicImage> for PixelGrid {
    fn from(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => gray.into(),
            DynamicImage::ImageLumaA8(gray_alpha) => Self {
                shape: GridShape::new(gray_alpha.height() as usize, gray_alpha.width() as usize, 2),
                samples: gray_alpha.into_raw(),
            },
            DynamicImage::ImageRgb8(rgb) => rgb.into(),
            DynamicImage::ImageRgba8(rgba) => rgba.into(),
            other if other.color().has_alpha() => other.to_rgba8().into(),
            other => other.to_rgb8().into(),
        }
    }
}

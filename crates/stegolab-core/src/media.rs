//! Reading carriers from and writing stego images to lossless image files.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use image::ImageFormat;
use log::error;

use crate::grid::PixelGrid;
use crate::{Result, StegoError};

/// Lossless format an image path points to, judged by its file extension
pub fn lossless_format(path: &Path) -> Result<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "bmp" => Ok(ImageFormat::Bmp),
        _ => Err(StegoError::UnsupportedOutputFormat(ext)),
    }
}

/// Decodes a PNG or BMP file into a grid
pub fn open_image(path: impl AsRef<Path>) -> Result<PixelGrid> {
    let path = path.as_ref();
    lossless_format(path)?;
    let image = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(e) => StegoError::IoError(e),
        other => StegoError::InvalidImageMedia(other),
    })?;

    Ok(image.into())
}

/// Encodes `grid` into a PNG or BMP file, the format follows the file extension
pub fn save_image(grid: &PixelGrid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = lossless_format(path)?;
    let file = File::create(path).map_err(|e| {
        error!("Error creating file {path:?}: {e}");
        StegoError::IoError(e)
    })?;

    let mut writer = BufWriter::new(file);
    write_image(grid, &mut writer, format)?;
    writer.flush()?;

    Ok(())
}

pub fn write_image<W: Write + Seek>(grid: &PixelGrid, writer: &mut W, format: ImageFormat) -> Result<()> {
    grid.to_dynamic_image()?
        .write_to(writer, format)
        .map_err(|e| {
            error!("Error saving image: {e}");
            StegoError::ImageEncodingError(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::prepare_textured_grid;
    use tempfile::tempdir;

    #[test]
    fn should_only_accept_lossless_extensions() {
        assert_eq!(lossless_format(Path::new("a.PNG")).unwrap(), ImageFormat::Png);
        assert_eq!(lossless_format(Path::new("a.bmp")).unwrap(), ImageFormat::Bmp);
        assert!(matches!(
            lossless_format(Path::new("a.jpg")),
            Err(StegoError::UnsupportedOutputFormat(ext)) if ext == "jpg"
        ));
        assert!(lossless_format(Path::new("no_extension")).is_err());
    }

    #[test]
    fn should_keep_every_sample_through_png_and_bmp() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let grid = prepare_textured_grid(7, 9);

        for name in ["grid.png", "grid.bmp"] {
            let path = temp_dir.path().join(name);
            save_image(&grid, &path).expect("Failed to save the grid");
            let back = open_image(&path).expect("Failed to open the grid");
            assert_eq!(back, grid, "{name}");
        }
    }

    #[test]
    fn should_report_missing_files() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let result = open_image(temp_dir.path().join("missing.png"));
        assert!(matches!(result, Err(StegoError::IoError(_))));
    }
}

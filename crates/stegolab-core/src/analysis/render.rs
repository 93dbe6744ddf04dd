//! Raster renderings of the LSB statistics, meant for display next to a report.

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

use super::bit_plane::extract_plane;
use crate::grid::{PixelGrid, BIT_DEPTH};
use crate::{Result, StegoError};

const PANEL_WIDTH: u32 = 160;
const PANEL_HEIGHT: u32 = 200;
const MARGIN: u32 = 10;
const BAR_WIDTH: u32 = 50;
const DASH: u32 = 6;

const PLANE_COLUMNS: usize = 4;
const PLANE_ROWS: usize = 2;
const SEPARATOR: usize = 2;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const EXPECTED_LINE: Rgb<u8> = Rgb([40, 40, 40]);
const SEPARATOR_SHADE: Luma<u8> = Luma([128]);

/// Rendered images of one analysis
#[derive(Debug, Clone, Default)]
pub struct Visualizations {
    /// one panel per channel with the LSB 0 and LSB 1 counts
    pub lsb_histogram: Option<RgbImage>,
    /// channel name and the composite of its eight bit planes
    pub bit_planes: Vec<(String, GrayImage)>,
}

fn bar_color(channel: &str) -> Rgb<u8> {
    match channel {
        "red" => Rgb([205, 60, 60]),
        "green" => Rgb([60, 165, 80]),
        "blue" => Rgb([60, 90, 200]),
        _ => Rgb([110, 110, 110]),
    }
}

/// Bar chart of the LSB 0/1 counts per channel with a dashed line at the count
/// a perfectly balanced LSB plane would have
pub fn lsb_histogram(grid: &PixelGrid, channels: &[(usize, String)]) -> Result<RgbImage> {
    if channels.is_empty() || grid.shape().pixel_count() == 0 {
        return Err(StegoError::InvalidParameters(
            "nothing to draw a histogram of".to_string(),
        ));
    }

    let width = PANEL_WIDTH * channels.len() as u32;
    let mut canvas = RgbImage::from_pixel(width, PANEL_HEIGHT, BACKGROUND);
    let plot_height = PANEL_HEIGHT - 2 * MARGIN;
    let baseline = PANEL_HEIGHT - MARGIN;

    for (panel, (index, name)) in channels.iter().enumerate() {
        let plane = grid.channel_plane(*index);
        let total = plane.len() as f64;
        let ones = plane.iter().filter(|&&s| s & 1 == 1).count() as f64;
        let origin = panel as u32 * PANEL_WIDTH;
        let color = bar_color(name);

        for (slot, count) in [total - ones, ones].into_iter().enumerate() {
            let bar_height = ((count / total) * plot_height as f64).round() as u32;
            let left = origin + MARGIN + slot as u32 * (BAR_WIDTH + 2 * MARGIN) + MARGIN;
            for x in left..left + BAR_WIDTH {
                for y in baseline - bar_height..baseline {
                    canvas.put_pixel(x, y, color);
                }
            }
        }

        let expected_y = baseline - plot_height / 2;
        for x in (origin + MARGIN..origin + PANEL_WIDTH - MARGIN).filter(|x| (x / DASH) % 2 == 0) {
            canvas.put_pixel(x, expected_y, EXPECTED_LINE);
        }
    }

    Ok(canvas)
}

/// All eight bit planes of one channel, LSB top left, MSB bottom right, set bits white
pub fn bit_plane_composite(grid: &PixelGrid, channel: usize) -> Result<GrayImage> {
    let (height, width) = (grid.height(), grid.width());
    if height == 0 || width == 0 || channel >= grid.channels() {
        return Err(StegoError::InvalidParameters(format!(
            "cannot draw bit planes of channel {channel} on a {height}x{width} grid"
        )));
    }

    let composite_width = PLANE_COLUMNS * width + (PLANE_COLUMNS - 1) * SEPARATOR;
    let composite_height = PLANE_ROWS * height + (PLANE_ROWS - 1) * SEPARATOR;
    let too_large = || StegoError::InvalidParameters("bit plane composite too large".to_string());
    let mut canvas: GrayImage = ImageBuffer::from_pixel(
        u32::try_from(composite_width).map_err(|_| too_large())?,
        u32::try_from(composite_height).map_err(|_| too_large())?,
        SEPARATOR_SHADE,
    );

    let plane = grid.channel_plane(channel);
    for bit in 0..BIT_DEPTH {
        let top = (bit as usize / PLANE_COLUMNS) * (height + SEPARATOR);
        let left = (bit as usize % PLANE_COLUMNS) * (width + SEPARATOR);
        for (i, set) in extract_plane(&plane, bit).into_iter().enumerate() {
            let (row, col) = (i / width, i % width);
            canvas.put_pixel((left + col) as u32, (top + row) as u32, Luma([set * 255]));
        }
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(indices: &[usize]) -> Vec<(usize, String)> {
        let names = ["red", "green", "blue"];
        indices.iter().map(|&i| (i, names[i].to_string())).collect()
    }

    #[test]
    fn should_draw_one_panel_per_channel() {
        let grid = PixelGrid::filled(8, 8, 3, 0).unwrap();
        let histogram = lsb_histogram(&grid, &named(&[0, 1, 2])).unwrap();

        assert_eq!(histogram.dimensions(), (3 * PANEL_WIDTH, PANEL_HEIGHT));
        // all LSBs are 0: the first bar reaches the top of the plot, the second is empty
        let first_bar = MARGIN + MARGIN + 1;
        let second_bar = first_bar + BAR_WIDTH + 2 * MARGIN;
        assert_eq!(*histogram.get_pixel(first_bar, MARGIN), bar_color("red"));
        assert_eq!(*histogram.get_pixel(second_bar, PANEL_HEIGHT - MARGIN - 1), BACKGROUND);
    }

    #[test]
    fn should_refuse_empty_histograms() {
        let grid = PixelGrid::filled(8, 8, 3, 0).unwrap();
        assert!(lsb_histogram(&grid, &[]).is_err());
    }

    #[test]
    fn should_lay_out_bit_planes_in_two_rows() {
        // 0b1000_0001: only the LSB and MSB planes are set
        let grid = PixelGrid::filled(3, 5, 1, 0b1000_0001).unwrap();
        let composite = bit_plane_composite(&grid, 0).unwrap();

        assert_eq!(composite.dimensions(), (4 * 5 + 3 * 2, 2 * 3 + 2));
        assert_eq!(composite.get_pixel(0, 0).0, [255]);
        assert_eq!(composite.get_pixel(5, 0).0, [128]);
        assert_eq!(composite.get_pixel(7, 0).0, [0]);
        // MSB: row 1, column 3
        assert_eq!(composite.get_pixel(3 * 7, 5).0, [255]);
    }

    #[test]
    fn should_refuse_unknown_channels() {
        let grid = PixelGrid::filled(3, 3, 1, 0).unwrap();
        assert!(bit_plane_composite(&grid, 1).is_err());
    }
}

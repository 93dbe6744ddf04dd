//! Image quality metrics between a carrier and its stego version.

use crate::grid::PixelGrid;
use crate::{Result, StegoError};

const MAX_VALUE: f64 = 255.0;
const SSIM_WINDOW: usize = 7;
const C1: f64 = (0.01 * MAX_VALUE) * (0.01 * MAX_VALUE);
const C2: f64 = (0.03 * MAX_VALUE) * (0.03 * MAX_VALUE);

/// Peak signal to noise ratio in dB over all samples, `f64::INFINITY` for identical grids
pub fn psnr(carrier: &PixelGrid, stego: &PixelGrid) -> Result<f64> {
    ensure_comparable(carrier, stego)?;

    let squared_error: u64 = carrier
        .samples()
        .iter()
        .zip(stego.samples())
        .map(|(&a, &b)| {
            let d = a.abs_diff(b) as u64;
            d * d
        })
        .sum();
    if squared_error == 0 {
        return Ok(f64::INFINITY);
    }
    let mse = squared_error as f64 / carrier.samples().len() as f64;

    Ok(10.0 * (MAX_VALUE * MAX_VALUE / mse).log10())
}

/// Mean structural similarity, averaged over the color channels.
///
/// Every 7x7 window (smaller for tiny images) contributes one SSIM value computed from
/// the window means, variances and covariance.
pub fn ssim(carrier: &PixelGrid, stego: &PixelGrid) -> Result<f64> {
    ensure_comparable(carrier, stego)?;

    let colors = carrier.shape().color_channels();
    let total: f64 = (0..colors)
        .map(|channel| channel_ssim(carrier, stego, channel))
        .sum();

    Ok(total / colors as f64)
}

fn ensure_comparable(a: &PixelGrid, b: &PixelGrid) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(StegoError::InvalidParameters(format!(
            "cannot compare a {:?} grid with a {:?} grid",
            a.shape(),
            b.shape()
        )));
    }
    if a.samples().is_empty() {
        return Err(StegoError::InvalidParameters(
            "cannot compare empty grids".to_string(),
        ));
    }
    Ok(())
}

/// Summed area table, `at(r, c)` is the sum over all rows `< r` and columns `< c`
struct SummedArea {
    width: usize,
    table: Vec<f64>,
}

impl SummedArea {
    fn new<F>(height: usize, width: usize, value: F) -> Self
    where
        F: Fn(usize, usize) -> f64,
    {
        let stride = width + 1;
        let mut table = vec![0.0; (height + 1) * stride];
        for r in 0..height {
            let mut row_sum = 0.0;
            for c in 0..width {
                row_sum += value(r, c);
                table[(r + 1) * stride + c + 1] = table[r * stride + c + 1] + row_sum;
            }
        }
        Self { width, table }
    }

    #[inline]
    fn at(&self, r: usize, c: usize) -> f64 {
        self.table[r * (self.width + 1) + c]
    }

    #[inline]
    fn window(&self, r: usize, c: usize, h: usize, w: usize) -> f64 {
        self.at(r + h, c + w) - self.at(r, c + w) - self.at(r + h, c) + self.at(r, c)
    }
}

fn channel_ssim(a: &PixelGrid, b: &PixelGrid, channel: usize) -> f64 {
    let (height, width) = (a.height(), a.width());
    let x = |r: usize, c: usize| a.get(r, c, channel) as f64;
    let y = |r: usize, c: usize| b.get(r, c, channel) as f64;

    let sx = SummedArea::new(height, width, x);
    let sy = SummedArea::new(height, width, y);
    let sxx = SummedArea::new(height, width, |r, c| x(r, c) * x(r, c));
    let syy = SummedArea::new(height, width, |r, c| y(r, c) * y(r, c));
    let sxy = SummedArea::new(height, width, |r, c| x(r, c) * y(r, c));

    let wh = SSIM_WINDOW.min(height);
    let ww = SSIM_WINDOW.min(width);
    let n = (wh * ww) as f64;
    let dof = if n > 1.0 { n - 1.0 } else { 1.0 };

    let mut total = 0.0;
    let mut windows = 0usize;
    for r in 0..=(height - wh) {
        for c in 0..=(width - ww) {
            let (sum_x, sum_y) = (sx.window(r, c, wh, ww), sy.window(r, c, wh, ww));
            let mu_x = sum_x / n;
            let mu_y = sum_y / n;
            let var_x = ((sxx.window(r, c, wh, ww) - sum_x * mu_x) / dof).max(0.0);
            let var_y = ((syy.window(r, c, wh, ww) - sum_y * mu_y) / dof).max(0.0);
            let cov = (sxy.window(r, c, wh, ww) - sum_x * mu_y) / dof;

            let numerator = (2.0 * mu_x * mu_y + C1) * (2.0 * cov + C2);
            let denominator = (mu_x * mu_x + mu_y * mu_y + C1) * (var_x + var_y + C2);
            total += numerator / denominator;
            windows += 1;
        }
    }

    total / windows as f64
}

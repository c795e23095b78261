//! Gaussian blur for premultiplied RGBA8 rasters.
//!
//! Three successive box blurs approximate a Gaussian of the requested
//! standard deviation. Each box pass is a sliding window, so the cost does
//! not grow with the blur radius. Pixels outside the raster count as fully
//! transparent, matching how a filtered canvas layer fades out at its edges.

use meshgrad_core::RenderQuality;
use tiny_skia::Pixmap;

/// Raster pixels of standard deviation per unit of point blur, before `q`.
pub const BLUR_SCALE: f32 = 50.0;

/// Number of box passes used to approximate one Gaussian.
const PASSES: usize = 3;

/// Standard deviation in raster pixels for a point's normalized `blur` at quality `q`.
///
/// Out-of-range and NaN blur values are clamped into `0..=1`.
#[must_use]
pub fn blur_sigma(blur: f32, quality: RenderQuality) -> f32 {
    let blur = if blur.is_nan() { 0.0 } else { blur.clamp(0.0, 1.0) };
    blur * BLUR_SCALE * quality.factor()
}

/// Half-widths of the box passes whose convolution approximates a Gaussian
/// with standard deviation `sigma`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn box_radii(sigma: f32) -> [usize; PASSES] {
    if !sigma.is_finite() || sigma <= 0.0 {
        return [0; PASSES];
    }
    let n = PASSES as f32;
    let variance = 12.0 * sigma * sigma;
    let ideal = (variance / n + 1.0).sqrt();
    let mut lower = ideal.floor() as usize;
    if lower % 2 == 0 {
        lower = lower.saturating_sub(1);
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let wl = lower as f32;
    let m = ((variance - n * wl * wl - 4.0 * n * wl - 3.0 * n) / (-4.0 * wl - 4.0)).round();

    let mut radii = [0; PASSES];
    for (i, r) in radii.iter_mut().enumerate() {
        let width = if (i as f32) < m { lower } else { upper };
        *r = (width - 1) / 2;
    }
    radii
}

/// Blur a pixmap in place.
///
/// A `sigma` of zero (or anything not finite and positive) leaves it untouched.
pub fn gaussian_blur(pixmap: &mut Pixmap, sigma: f32) {
    let radii = box_radii(sigma);
    if radii.iter().all(|&r| r == 0) {
        return;
    }
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    tracing::trace!("Blurring {width}x{height} layer, sigma {sigma:.1}, boxes {radii:?}");
    blur_rgba8_premul(pixmap.data_mut(), width, height, &radii);
}

/// Apply one horizontal and one vertical box pass per radius.
///
/// `data` must hold `width * height` premultiplied RGBA pixels.
pub fn blur_rgba8_premul(data: &mut [u8], width: usize, height: usize, radii: &[usize]) {
    if width == 0 || height == 0 || data.len() != width * height * 4 {
        return;
    }
    let mut tmp = vec![0u8; data.len()];
    for &radius in radii.iter().filter(|&&r| r > 0) {
        // Rows: `height` lines of `width` pixels, one pixel apart.
        box_pass(data, &mut tmp, height, width, width, 1, radius);
        // Columns: `width` lines of `height` pixels, one row apart.
        box_pass(&tmp, data, width, height, 1, width, radius);
    }
}

/// One sliding-window box pass along `lines` lines of `len` pixels.
#[allow(clippy::cast_possible_truncation)]
fn box_pass(
    src: &[u8],
    dst: &mut [u8],
    lines: usize,
    len: usize,
    line_stride: usize,
    step: usize,
    radius: usize,
) {
    let div = (2 * radius + 1) as u32;
    for line in 0..lines {
        let base = line * line_stride;
        let at = |i: usize| (base + i * step) * 4;

        let mut sum = [0u32; 4];
        for i in 0..=radius.min(len - 1) {
            accumulate(&mut sum, &src[at(i)..at(i) + 4], true);
        }

        for i in 0..len {
            let o = at(i);
            for c in 0..4 {
                dst[o + c] = ((sum[c] + div / 2) / div).min(255) as u8;
            }
            let enter = i + radius + 1;
            if enter < len {
                accumulate(&mut sum, &src[at(enter)..at(enter) + 4], true);
            }
            if i >= radius {
                let leave = i - radius;
                accumulate(&mut sum, &src[at(leave)..at(leave) + 4], false);
            }
        }
    }
}

fn accumulate(sum: &mut [u32; 4], px: &[u8], add: bool) {
    for (s, &v) in sum.iter_mut().zip(px) {
        if add {
            *s += u32::from(v);
        } else {
            *s -= u32::from(v);
        }
    }
}

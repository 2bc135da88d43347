//! Offline fidelity scoring between a source raster and a re-rendered one.

use image::{GrayImage, Luma, RgbaImage};

use crate::{VectorizeError, VectorizeResult};

const WINDOW: u32 = 8;
const STRIDE: u32 = WINDOW / 2;
const K1: f64 = 0.01;
const K2: f64 = 0.03;
const DYNAMIC_RANGE: f64 = 255.0;

/// Weighted luma, `0.3 R + 0.59 G + 0.11 B`, rounded.
fn luma(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, _] = image.get_pixel(x, y).0;
        let value = 0.3 * r as f64 + 0.59 * g as f64 + 0.11 * b as f64;
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

fn window_ssim(a: &GrayImage, b: &GrayImage, x0: u32, y0: u32) -> f64 {
    let c1 = (K1 * DYNAMIC_RANGE).powi(2);
    let c2 = (K2 * DYNAMIC_RANGE).powi(2);

    let (mut sum_a, mut sum_b, mut sum_aa, mut sum_bb, mut sum_ab) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for y in y0..y0 + WINDOW {
        for x in x0..x0 + WINDOW {
            let pa = a.get_pixel(x, y)[0] as f64;
            let pb = b.get_pixel(x, y)[0] as f64;
            sum_a += pa;
            sum_b += pb;
            sum_aa += pa * pa;
            sum_bb += pb * pb;
            sum_ab += pa * pb;
        }
    }

    let n = (WINDOW * WINDOW) as f64;
    let mu_a = sum_a / n;
    let mu_b = sum_b / n;
    let var_a = sum_aa / n - mu_a * mu_a;
    let var_b = sum_bb / n - mu_b * mu_b;
    let covariance = sum_ab / n - mu_a * mu_b;

    ((2.0 * mu_a * mu_b + c1) * (2.0 * covariance + c2))
        / ((mu_a * mu_a + mu_b * mu_b + c1) * (var_a + var_b + c2))
}

/// Mean structural similarity over 8x8 luma windows stepped by 4 pixels.
///
/// Scores are near 1 for matching images; the windowed covariance can push
/// the value slightly outside `[0, 1]`. Rasters too small for a single window
/// score 1 when their luma is identical and 0 otherwise.
pub fn structural_similarity(original: &RgbaImage, converted: &RgbaImage) -> VectorizeResult<f64> {
    let expected = original.dimensions();
    let found = converted.dimensions();
    if expected != found {
        return Err(VectorizeError::DimensionMismatch { expected, found });
    }

    let a = luma(original);
    let b = luma(converted);
    let (w, h) = expected;
    if w < WINDOW || h < WINDOW {
        return Ok(if a == b { 1.0 } else { 0.0 });
    }

    let mut total = 0.0;
    let mut windows = 0usize;
    for y in (0..=h - WINDOW).step_by(STRIDE as usize) {
        for x in (0..=w - WINDOW).step_by(STRIDE as usize) {
            total += window_ssim(&a, &b, x, y);
            windows += 1;
        }
    }
    Ok(total / windows as f64)
}

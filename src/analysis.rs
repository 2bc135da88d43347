//! Heuristic image inspection used to pick options in automatic mode.

use std::fmt;

use image::{GrayImage, Luma, RgbaImage};
use imageproc::gradients::{horizontal_prewitt, vertical_prewitt};

use crate::config::{PathSmoothing, ProcessingOptions};
use crate::quantize::OPACITY_THRESHOLD;

/// Practical entropy ceiling for an 8-bit channel.
const MAX_CHANNEL_ENTROPY: f64 = 8.0;

/// Averaged Prewitt magnitude above which a pixel counts as an edge.
const EDGE_MAGNITUDE: f64 = 30.0;

/// Overall processing strategy suggested for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestedMode {
    Precise,
    Balanced,
    Fast,
}

impl fmt::Display for SuggestedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SuggestedMode::Precise => "precise",
            SuggestedMode::Balanced => "balanced",
            SuggestedMode::Fast => "fast",
        };
        f.write_str(name)
    }
}

/// Result of [`analyze_image`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysis {
    pub options: ProcessingOptions,
    /// Mean Shannon entropy of the RGB channels, in bits.
    pub entropy: f64,
    pub text_like: bool,
    /// Entropy normalized to `[0, 1]`.
    pub complexity: f64,
    pub suggested_mode: SuggestedMode,
}

/// Mean Shannon entropy of the R, G and B histograms over opaque pixels.
pub fn channel_entropy(image: &RgbaImage) -> f64 {
    let mut histograms = [[0u64; 256]; 3];
    let mut opaque = 0u64;
    for pixel in image.pixels() {
        if pixel[3] < OPACITY_THRESHOLD {
            continue;
        }
        opaque += 1;
        for (channel, histogram) in histograms.iter_mut().enumerate() {
            histogram[pixel[channel] as usize] += 1;
        }
    }
    if opaque == 0 {
        return 0.0;
    }

    let total = opaque as f64;
    let sum: f64 = histograms
        .iter()
        .map(|histogram| {
            histogram
                .iter()
                .filter(|&&count| count > 0)
                .map(|&count| {
                    let p = count as f64 / total;
                    -p * p.log2()
                })
                .sum::<f64>()
        })
        .sum();
    sum / 3.0
}

fn red_channel(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y)[0]])
    })
}

/// Guess whether the image is dominated by text from its edge statistics.
///
/// Edges come from Prewitt gradients of the red channel over interior pixels.
/// Text-like images have a moderate edge density and a roughly balanced
/// ratio of horizontally to vertically adjacent edge pixels.
pub fn detect_text_content(image: &RgbaImage) -> bool {
    let (w, h) = image.dimensions();
    if w < 3 || h < 3 {
        return false;
    }

    let red = red_channel(image);
    let gx = horizontal_prewitt(&red);
    let gy = vertical_prewitt(&red);

    let (wu, hu) = (w as usize, h as usize);
    let mut edges = vec![false; wu * hu];
    let mut edge_count = 0usize;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let dx = gx.get_pixel(x, y)[0].unsigned_abs() as f64 / 3.0;
            let dy = gy.get_pixel(x, y)[0].unsigned_abs() as f64 / 3.0;
            if dx.hypot(dy) > EDGE_MAGNITUDE {
                edges[y as usize * wu + x as usize] = true;
                edge_count += 1;
            }
        }
    }

    let edge_density = edge_count as f64 / (wu * hu) as f64;

    let mut horizontal = 0usize;
    let mut vertical = 0usize;
    for y in 1..hu - 1 {
        for x in 1..wu - 1 {
            let i = y * wu + x;
            if !edges[i] {
                continue;
            }
            if edges[i - 1] || edges[i + 1] {
                horizontal += 1;
            }
            if edges[i - wu] || edges[i + wu] {
                vertical += 1;
            }
        }
    }
    let direction_ratio = horizontal as f64 / vertical.max(1) as f64;

    edge_density > 0.05 && edge_density < 0.3 && direction_ratio > 0.7 && direction_ratio < 1.5
}

/// Palette size recommended for a given mean channel entropy.
pub fn optimal_color_precision(entropy: f64) -> u32 {
    let (factor, min, max) = if entropy > 7.5 {
        (1.8, 16.0, 24.0)
    } else if entropy > 6.0 {
        (1.5, 12.0, 16.0)
    } else if entropy > 4.5 {
        (1.2, 8.0, 12.0)
    } else {
        (1.0, 4.0, 8.0)
    };
    (entropy * factor).round().clamp(min, max) as u32
}

/// Full option recommendation from entropy alone, before any text adjustment.
pub fn recommend_options(entropy: f64) -> ProcessingOptions {
    let complexity = entropy / MAX_CHANNEL_ENTROPY;
    let (path_precision, line_threshold, path_smoothing) = if complexity > 0.7 {
        (2.5, 0.05, PathSmoothing::Minimal)
    } else if complexity > 0.5 {
        (2.0, 0.08, PathSmoothing::Balanced)
    } else {
        (1.5, 0.1, PathSmoothing::High)
    };

    ProcessingOptions::default()
        .with_color_precision(optimal_color_precision(entropy))
        .with_path_precision(path_precision)
        .with_line_threshold(line_threshold)
        .with_path_smoothing(path_smoothing)
        .with_gradient_optimization(complexity > 0.4)
}

/// Inspect `image` and propose options, a complexity score and a mode.
pub fn analyze_image(image: &RgbaImage) -> ImageAnalysis {
    let entropy = channel_entropy(image);
    let text_like = detect_text_content(image);
    let complexity = entropy / MAX_CHANNEL_ENTROPY;

    let suggested_mode = if text_like || complexity > 0.7 {
        SuggestedMode::Precise
    } else if complexity > 0.4 {
        SuggestedMode::Balanced
    } else {
        SuggestedMode::Fast
    };

    let mut options = recommend_options(entropy);
    if text_like {
        options.path_precision = (options.path_precision + 0.5).min(5.0);
        options.line_threshold = (options.line_threshold - 0.02).max(0.01);
        options.path_smoothing = PathSmoothing::Minimal;
        options.gradient_optimization = false;
    }

    ImageAnalysis {
        options,
        entropy,
        text_like,
        complexity,
        suggested_mode,
    }
}

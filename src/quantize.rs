use std::collections::HashMap;

use image::{Rgb, RgbaImage};

use crate::geometry::PixelCoord;

/// Pixels with alpha below this value are treated as transparent and dropped.
pub const OPACITY_THRESHOLD: u8 = 128;

/// A color snapped to the quantization grid.
///
/// Levels are stored instead of channel values because the grid step
/// `256 / color_precision` is generally not an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantizedColor {
    levels: [u16; 3],
    color_precision: u32,
}

impl QuantizedColor {
    /// Snap an RGB triple to the grid for `color_precision` levels per channel.
    pub fn from_rgb(rgb: [u8; 3], color_precision: u32) -> Self {
        let step = quantization_step(color_precision);
        let levels = rgb.map(|c| (c as f64 / step).round() as u16);
        Self {
            levels,
            color_precision,
        }
    }

    /// Quantization level of each channel.
    pub fn levels(&self) -> [u16; 3] {
        self.levels
    }

    /// Exact quantized channel values, `level * step`. May reach 256.
    pub fn channels(&self) -> [f64; 3] {
        let step = quantization_step(self.color_precision);
        self.levels.map(|level| level as f64 * step)
    }

    /// Displayable color: channels rounded and clamped into 0..=255.
    pub fn display(&self) -> Rgb<u8> {
        Rgb(self.channels().map(|c| c.round().clamp(0.0, 255.0) as u8))
    }
}

/// The pixels sharing one quantized color.
#[derive(Debug, Clone)]
pub struct ColorBucket {
    pub key: QuantizedColor,
    pub pixels: Vec<PixelCoord>,
}

impl ColorBucket {
    /// Displayable color of the bucket.
    pub fn color(&self) -> Rgb<u8> {
        self.key.display()
    }
}

fn quantization_step(color_precision: u32) -> f64 {
    256.0 / color_precision.max(1) as f64
}

/// Partition the opaque pixels of `image` into buckets of equal quantized color.
///
/// Buckets are returned in the order their first pixel appears in a row-major
/// scan. Every opaque pixel lands in exactly one bucket; transparent pixels in none.
pub fn quantize_colors(image: &RgbaImage, color_precision: u32) -> Vec<ColorBucket> {
    let mut index: HashMap<QuantizedColor, usize> = HashMap::new();
    let mut buckets: Vec<ColorBucket> = Vec::new();

    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        if a < OPACITY_THRESHOLD {
            continue;
        }
        let key = QuantizedColor::from_rgb([r, g, b], color_precision);
        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(ColorBucket {
                key,
                pixels: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].pixels.push(PixelCoord::new(x, y));
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn rgba_image(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    mod quantized_color {
        use super::*;

        #[test]
        fn snaps_to_nearest_multiple_of_step() {
            // step = 32 for 8 levels
            let q = QuantizedColor::from_rgb([200, 50, 10], 8);
            assert_eq!(q.levels(), [6, 2, 0]);
            assert_eq!(q.channels(), [192.0, 64.0, 0.0]);
        }

        #[test]
        fn top_level_can_exceed_255_but_display_clamps() {
            let q = QuantizedColor::from_rgb([255, 255, 255], 8);
            assert_eq!(q.channels(), [256.0, 256.0, 256.0]);
            assert_eq!(q.display(), Rgb([255, 255, 255]));
        }

        #[test]
        fn fractional_step_is_preserved() {
            // step = 256 / 12 = 21.333..
            let q = QuantizedColor::from_rgb([100, 0, 0], 12);
            assert_eq!(q.levels()[0], 5);
            assert_eq!(q.display(), Rgb([107, 0, 0]));
        }
    }

    mod quantize_colors {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn single_color_image_yields_one_bucket() {
                let image = rgba_image(4, 4, [200, 50, 50, 255]);
                let buckets = quantize_colors(&image, 8);
                assert_eq!(buckets.len(), 1);
                assert_eq!(buckets[0].pixels.len(), 16);
            }

            #[test]
            fn transparent_pixels_are_dropped() {
                let mut image = rgba_image(2, 2, [10, 10, 10, 255]);
                image.put_pixel(0, 0, Rgba([10, 10, 10, 127]));
                image.put_pixel(1, 1, Rgba([10, 10, 10, 0]));
                let buckets = quantize_colors(&image, 8);
                assert_eq!(buckets.len(), 1);
                assert_eq!(
                    buckets[0].pixels,
                    vec![PixelCoord::new(1, 0), PixelCoord::new(0, 1)]
                );
            }

            #[test]
            fn alpha_at_threshold_is_opaque() {
                let image = rgba_image(1, 1, [0, 0, 0, 128]);
                assert_eq!(quantize_colors(&image, 4).len(), 1);
            }

            #[test]
            fn fully_transparent_image_yields_nothing() {
                let image = rgba_image(3, 3, [255, 0, 0, 0]);
                assert!(quantize_colors(&image, 8).is_empty());
            }

            #[test]
            fn buckets_follow_first_appearance() {
                let mut image = rgba_image(3, 1, [0, 0, 0, 255]);
                image.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
                let buckets = quantize_colors(&image, 4);
                assert_eq!(buckets.len(), 2);
                assert_eq!(buckets[0].color(), Rgb([255, 255, 255]));
                assert_eq!(buckets[1].color(), Rgb([0, 0, 0]));
                assert_eq!(buckets[1].pixels.len(), 2);
            }

            #[test]
            fn nearby_colors_share_a_bucket() {
                let mut image = rgba_image(2, 1, [100, 100, 100, 255]);
                image.put_pixel(1, 0, Rgba([105, 98, 101, 255]));
                assert_eq!(quantize_colors(&image, 8).len(), 1);
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// Every opaque pixel appears in exactly one bucket, transparent ones in none.
                #[test]
                fn buckets_partition_opaque_pixels(
                    w in 1u32..8,
                    h in 1u32..8,
                    precision in 2u32..32,
                    seed in proptest::collection::vec(proptest::num::u8::ANY, 256)
                ) {
                    let image = RgbaImage::from_fn(w, h, |x, y| {
                        let i = ((y * w + x) * 4) as usize;
                        Rgba([seed[i % 256], seed[(i + 1) % 256], seed[(i + 2) % 256], seed[(i + 3) % 256]])
                    });
                    let buckets = quantize_colors(&image, precision);

                    let mut seen = std::collections::HashSet::new();
                    for bucket in &buckets {
                        prop_assert!(!bucket.pixels.is_empty());
                        for p in &bucket.pixels {
                            prop_assert!(seen.insert(*p));
                            prop_assert!(image.get_pixel(p.x, p.y)[3] >= OPACITY_THRESHOLD);
                        }
                    }
                    let opaque = image.pixels().filter(|p| p[3] >= OPACITY_THRESHOLD).count();
                    prop_assert_eq!(seen.len(), opaque);
                }
            }
        }
    }
}

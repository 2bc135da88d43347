//! The native quantize-and-trace pipeline.
//!
//! Buckets are independent between rasterization and validation, so each one
//! is traced as its own rayon task. Repair and merging wait for all of them.

use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::bitmap::{extract_boundary, rasterize_bucket};
use crate::config::ProcessingOptions;
use crate::contour::{find_contours, order_contour};
use crate::layer::{ColorLayer, ProcessingResult};
use crate::merge::merge_similar_layers;
use crate::path::emit_path;
use crate::quantize::{ColorBucket, quantize_colors};
use crate::simplify::simplify_path;
use crate::validate::{PathDiagnostic, repair_every_path, validate_paths};
use crate::{VectorizeError, VectorizeResult};

/// Trace the outlines of one color bucket.
///
/// Returns `None` when the bucket has no contour longer than two points.
pub fn trace_bucket(
    bucket: &ColorBucket,
    width: u32,
    height: u32,
    options: &ProcessingOptions,
) -> VectorizeResult<Option<ColorLayer>> {
    let color = bucket.color();
    if bucket.pixels.is_empty() {
        return Err(VectorizeError::EmptyLayer {
            color: format!("{:?}", color.0),
        });
    }

    let bitmap = rasterize_bucket(&bucket.pixels, width, height);
    let boundary = extract_boundary(&bitmap, options.boundary_policy);
    let tolerance = options.simplification_tolerance();

    let paths: Vec<String> = find_contours(&boundary)
        .iter()
        .map(|contour| simplify_path(&order_contour(contour), tolerance))
        .filter_map(|points| emit_path(&points))
        .map(|path| path.to_string())
        .collect();

    if paths.is_empty() {
        return Ok(None);
    }

    Ok(Some(ColorLayer::new(color, paths)))
}

/// Run the full pipeline, giving up as soon as `is_stale` reports true.
///
/// Returns `Ok(None)` when the run was abandoned.
pub fn trace_raster_unless_stale(
    image: &RgbaImage,
    options: &ProcessingOptions,
    is_stale: &(dyn Fn() -> bool + Sync),
) -> VectorizeResult<Option<ProcessingResult>> {
    options.validate()?;
    let (width, height) = image.dimensions();

    let buckets = quantize_colors(image, options.color_precision);
    debug!(buckets = buckets.len(), width, height, "quantized palette");

    let traced = buckets
        .par_iter()
        .map(|bucket| {
            if is_stale() {
                return Ok(None);
            }
            let layer = trace_bucket(bucket, width, height, options)?;
            Ok(layer.map(|layer| {
                let diagnostics = validate_paths(&layer.paths);
                (layer, diagnostics)
            }))
        })
        .collect::<VectorizeResult<Vec<Option<(ColorLayer, Vec<PathDiagnostic>)>>>>()?;

    if is_stale() {
        debug!("run superseded before merging");
        return Ok(None);
    }

    let (mut layers, diagnostics): (Vec<ColorLayer>, Vec<Vec<PathDiagnostic>>) =
        traced.into_iter().flatten().unzip();
    let issues: usize = diagnostics.iter().map(Vec::len).sum();
    if issues > 0 {
        warn!(issues, "repairing malformed paths in every layer");
        repair_every_path(&mut layers);
    }

    let traced_layers = layers.len();
    if options.gradient_optimization {
        layers = merge_similar_layers(layers);
    }
    debug!(
        traced = traced_layers,
        emitted = layers.len(),
        "layers ready"
    );

    Ok(Some(ProcessingResult::new(
        layers,
        width,
        height,
        options.clone(),
    )))
}

/// Run the full pipeline to completion.
pub fn trace_raster(image: &RgbaImage, options: &ProcessingOptions) -> VectorizeResult<ProcessingResult> {
    trace_raster_unless_stale(image, options, &|| false)?
        .ok_or_else(|| VectorizeError::Trace("run abandoned".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundaryPolicy;
    use crate::quantize::QuantizedColor;
    use crate::validate::validate_paths;
    use image::Rgba;

    fn solid(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    /// A filled square of `color` on a transparent canvas.
    fn square(canvas: u32, from: u32, to: u32, color: [u8; 4]) -> RgbaImage {
        let mut image = solid(canvas, canvas, [0, 0, 0, 0]);
        for y in from..to {
            for x in from..to {
                image.put_pixel(x, y, Rgba(color));
            }
        }
        image
    }

    mod trace_bucket {
        use super::*;

        #[test]
        fn empty_bucket_is_an_error() {
            let bucket = ColorBucket {
                key: QuantizedColor::from_rgb([1, 2, 3], 8),
                pixels: Vec::new(),
            };
            let err = trace_bucket(&bucket, 4, 4, &ProcessingOptions::default()).unwrap_err();
            assert!(matches!(err, VectorizeError::EmptyLayer { .. }));
        }
    }

    mod trace_raster {
        use super::*;

        #[test]
        fn solid_four_by_four_emits_nothing() {
            let image = solid(4, 4, [200, 50, 50, 255]);
            let options = ProcessingOptions::default().with_color_precision(8);
            let result = trace_raster(&image, &options).unwrap();
            assert!(result.layers.is_empty());
            assert!(result.gradients.is_empty());
            assert_eq!((result.metadata.width, result.metadata.height), (4, 4));
        }

        #[test]
        fn thin_rasters_emit_nothing() {
            let image = RgbaImage::from_fn(2, 10, |x, _| {
                if x == 0 {
                    Rgba([255, 0, 0, 255])
                } else {
                    Rgba([0, 0, 255, 255])
                }
            });
            let result = trace_raster(&image, &ProcessingOptions::default()).unwrap();
            assert!(result.layers.is_empty());
        }

        #[test]
        fn square_yields_one_closed_outline() {
            let image = square(12, 3, 9, [0, 0, 0, 255]);
            let result = trace_raster(&image, &ProcessingOptions::default()).unwrap();
            assert_eq!(result.layers.len(), 1);
            assert_eq!(result.layers[0].css_color(), "rgb(0, 0, 0)");
            assert_eq!(result.layers[0].paths.len(), 1);

            let path = &result.layers[0].paths[0];
            assert!(path.starts_with("M 3 3"));
            assert!(path.ends_with('Z'));
            assert!(validate_paths(&result.layers[0].paths).is_empty());
        }

        #[test]
        fn simplification_drops_straight_runs() {
            let image = square(12, 3, 9, [0, 0, 0, 255]);
            let options = ProcessingOptions::default().with_path_precision(5.0);
            let result = trace_raster(&image, &options).unwrap();
            let path = &result.layers[0].paths[0];
            // a 6x6 ring has 20 cells; corners alone survive simplification
            let points = path.matches(['M', 'L']).count();
            assert!(points < 20, "path kept {points} points: {path}");
        }

        #[test]
        fn metadata_records_options() {
            let image = square(8, 2, 6, [255, 255, 255, 255]);
            let options = ProcessingOptions::default()
                .with_color_precision(16)
                .with_gradient_optimization(false);
            let result = trace_raster(&image, &options).unwrap();
            assert_eq!(result.metadata.options, options);
        }

        #[test]
        fn edge_policy_traces_full_canvas() {
            let image = solid(6, 6, [90, 90, 90, 255]);
            let interior = trace_raster(&image, &ProcessingOptions::default()).unwrap();
            assert!(interior.layers.is_empty());

            let options =
                ProcessingOptions::default().with_boundary_policy(BoundaryPolicy::IncludeImageEdges);
            let edges = trace_raster(&image, &options).unwrap();
            assert_eq!(edges.layers.len(), 1);
        }

        #[test]
        fn invalid_options_are_rejected() {
            let image = solid(4, 4, [0, 0, 0, 255]);
            let options = ProcessingOptions::default().with_color_precision(0);
            assert!(trace_raster(&image, &options).is_err());
        }

        #[test]
        fn stale_runs_return_none() {
            let image = square(12, 3, 9, [0, 0, 0, 255]);
            let result =
                trace_raster_unless_stale(&image, &ProcessingOptions::default(), &|| true).unwrap();
            assert!(result.is_none());
        }
    }
}

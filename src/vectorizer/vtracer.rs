use image::{Rgb, RgbaImage};
use tracing::warn;
use visioncortex::{CompoundPathElement, PathSimplifyMode};
use vtracer::{ColorImage, ColorMode, Config, Hierarchical, SvgFile, convert};

use crate::config::{PathSmoothing, ProcessingOptions};
use crate::layer::{ColorLayer, ProcessingResult};
use crate::merge::merge_similar_layers;
use crate::path::{PathCommand, PathData};
use crate::validate::repair_if_invalid;
use crate::{VectorizeError, VectorizeResult};

use super::RasterTracer;

/// Tuning knobs of the VTracer backend that have no counterpart in
/// [`ProcessingOptions`].
#[derive(Debug, Clone)]
pub struct VtracerTracer {
    pub hierarchical: Hierarchical,
    pub filter_speckle: usize,
    pub layer_difference: i32,
    pub corner_threshold: i32,
    pub length_threshold: f64,
    pub max_iterations: usize,
    pub splice_threshold: i32,
}

impl Default for VtracerTracer {
    fn default() -> Self {
        Self {
            hierarchical: Hierarchical::Stacked,
            filter_speckle: 4,
            layer_difference: 16,
            corner_threshold: 60,
            length_threshold: 4.0,
            max_iterations: 10,
            splice_threshold: 45,
        }
    }
}

/// Significant bits per channel needed for `levels` quantization levels.
fn precision_bits(levels: u32) -> i32 {
    let bits = u32::BITS - levels.saturating_sub(1).leading_zeros();
    bits.clamp(1, 8) as i32
}

impl VtracerTracer {
    /// Build the VTracer configuration for a run.
    pub fn config_for(&self, options: &ProcessingOptions) -> Config {
        let mode = match options.path_smoothing {
            PathSmoothing::High | PathSmoothing::Balanced => PathSimplifyMode::Spline,
            PathSmoothing::Minimal => PathSimplifyMode::Polygon,
        };
        Config {
            color_mode: ColorMode::Color,
            hierarchical: self.hierarchical.clone(),
            mode,
            filter_speckle: self.filter_speckle,
            color_precision: precision_bits(options.color_precision),
            layer_difference: self.layer_difference,
            corner_threshold: self.corner_threshold,
            length_threshold: self.length_threshold,
            max_iterations: self.max_iterations,
            splice_threshold: self.splice_threshold,
            path_precision: Some(decimal_places(options)),
        }
    }
}

/// Decimal places kept in emitted coordinates.
fn decimal_places(options: &ProcessingOptions) -> u32 {
    options.path_precision.round().clamp(0.0, 15.0) as u32
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

fn to_color_image(image: &RgbaImage) -> ColorImage {
    let (w, h) = image.dimensions();
    ColorImage {
        pixels: image.as_raw().clone(),
        width: w as usize,
        height: h as usize,
    }
}

fn element_commands(element: &CompoundPathElement, decimals: u32, out: &mut PathData) {
    let point = |x: f64, y: f64| (round_to(x, decimals), round_to(y, decimals));
    let mut polygon = |points: &mut dyn Iterator<Item = (f64, f64)>| {
        if let Some((x, y)) = points.next() {
            out.push(PathCommand::MoveTo { x, y });
            for (x, y) in points {
                out.push(PathCommand::LineTo { x, y });
            }
            out.push(PathCommand::Close);
        }
    };
    match element {
        CompoundPathElement::PathI32(path) => {
            polygon(&mut path.path.iter().map(|p| point(p.x as f64, p.y as f64)));
        }
        CompoundPathElement::PathF64(path) => {
            polygon(&mut path.path.iter().map(|p| point(p.x, p.y)));
        }
        CompoundPathElement::Spline(spline) => {
            let Some((first, rest)) = spline.points.split_first() else {
                return;
            };
            let (x, y) = point(first.x, first.y);
            out.push(PathCommand::MoveTo { x, y });
            for segment in rest.chunks_exact(3) {
                out.push(PathCommand::CubicTo {
                    c1: point(segment[0].x, segment[0].y),
                    c2: point(segment[1].x, segment[1].y),
                    to: point(segment[2].x, segment[2].y),
                });
            }
            out.push(PathCommand::Close);
        }
    }
}

fn svg_file_to_layers(svg: &SvgFile, decimals: u32) -> Vec<ColorLayer> {
    svg.paths
        .iter()
        .filter_map(|svg_path| {
            let mut data = PathData::new();
            for element in &svg_path.path.paths {
                element_commands(element, decimals, &mut data);
            }
            if data.is_empty() {
                return None;
            }
            let color = Rgb([svg_path.color.r, svg_path.color.g, svg_path.color.b]);
            Some(ColorLayer::new(color, vec![data.to_string()]))
        })
        .collect()
}

impl RasterTracer for VtracerTracer {
    fn trace(
        &self,
        image: &RgbaImage,
        options: &ProcessingOptions,
    ) -> VectorizeResult<ProcessingResult> {
        options.validate()?;
        let svg = convert(to_color_image(image), self.config_for(options))
            .map_err(VectorizeError::Trace)?;

        let mut layers = svg_file_to_layers(&svg, decimal_places(options));
        let diagnostics = repair_if_invalid(&mut layers);
        if !diagnostics.is_empty() {
            warn!(issues = diagnostics.len(), "repairing malformed paths in every layer");
        }
        if options.gradient_optimization {
            layers = merge_similar_layers(layers);
        }

        let (width, height) = image.dimensions();
        Ok(ProcessingResult::new(layers, width, height, options.clone()))
    }
}

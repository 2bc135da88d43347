use std::fmt;
use std::fs;
use std::path::Path;

use image::Rgb;

use crate::VectorizeResult;
use crate::config::ProcessingOptions;

/// One flat fill color and the closed outlines painted with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLayer {
    pub color: Rgb<u8>,
    pub paths: Vec<String>,
}

impl ColorLayer {
    pub fn new(color: Rgb<u8>, paths: Vec<String>) -> Self {
        Self { color, paths }
    }

    /// CSS color string, `rgb(r, g, b)`.
    pub fn css_color(&self) -> String {
        let [r, g, b] = self.color.0;
        format!("rgb({r}, {g}, {b})")
    }

    /// All paths of the layer as a single path-data string.
    pub fn joined_paths(&self) -> String {
        self.paths.join(" ")
    }
}

/// Kind of a gradient fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
}

/// A color stop, `offset` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgb<u8>,
}

/// Gradient definition. The native tracer never produces any.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub id: String,
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
}

/// Dimensions of the traced raster and the options that produced the layers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMetadata {
    pub width: u32,
    pub height: u32,
    pub options: ProcessingOptions,
}

/// Output of one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub layers: Vec<ColorLayer>,
    pub gradients: Vec<Gradient>,
    pub metadata: ResultMetadata,
}

impl ProcessingResult {
    pub fn new(layers: Vec<ColorLayer>, width: u32, height: u32, options: ProcessingOptions) -> Self {
        Self {
            layers,
            gradients: Vec::new(),
            metadata: ResultMetadata {
                width,
                height,
                options,
            },
        }
    }

    /// Total number of path strings across all layers.
    pub fn path_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.paths.len()).sum()
    }

    /// Standalone SVG document for this result, rendered through `Display`.
    pub fn svg_document(&self) -> SvgDocument<'_> {
        SvgDocument(self)
    }

    /// Render a standalone SVG document, one `<path>` element per layer.
    pub fn to_svg_document(&self) -> String {
        self.svg_document().to_string()
    }

    /// Write the SVG document to `path`.
    pub fn save_svg(&self, path: impl AsRef<Path>) -> VectorizeResult<()> {
        fs::write(path, self.to_svg_document())?;
        Ok(())
    }
}

/// SVG rendering of a [`ProcessingResult`].
#[derive(Debug, Clone, Copy)]
pub struct SvgDocument<'a>(&'a ProcessingResult);

impl fmt::Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let ResultMetadata { width, height, .. } = result.metadata;
        writeln!(f, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(
            f,
            "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\">"
        )?;

        if !result.gradients.is_empty() {
            writeln!(f, "  <defs>")?;
            for gradient in &result.gradients {
                let tag = match gradient.kind {
                    GradientKind::Linear => "linearGradient",
                    GradientKind::Radial => "radialGradient",
                };
                writeln!(f, "    <{tag} id=\"{}\">", gradient.id)?;
                for stop in &gradient.stops {
                    let [r, g, b] = stop.color.0;
                    writeln!(
                        f,
                        "      <stop offset=\"{}%\" stop-color=\"rgb({r}, {g}, {b})\" />",
                        stop.offset * 100.0
                    )?;
                }
                writeln!(f, "    </{tag}>")?;
            }
            writeln!(f, "  </defs>")?;
        }

        for layer in &result.layers {
            writeln!(
                f,
                "  <path d=\"{}\" fill=\"{}\" />",
                layer.joined_paths(),
                layer.css_color()
            )?;
        }
        writeln!(f, "</svg>")
    }
}

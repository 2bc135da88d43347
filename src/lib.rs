pub mod analysis;
pub mod bitmap;
pub mod config;
pub mod contour;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod merge;
pub mod path;
pub mod pipeline;
pub mod quality;
pub mod quantize;
pub mod session;
pub mod simplify;
pub mod validate;
pub mod vectorizer;

pub use analysis::{ImageAnalysis, SuggestedMode, analyze_image};
pub use config::{BoundaryPolicy, PathSmoothing, ProcessingOptions};
pub use error::{VectorizeError, VectorizeResult};
pub use layer::{ColorLayer, ProcessingResult, SvgDocument};
pub use quality::structural_similarity;
pub use session::{ProcessingMode, RunTicket, TraceSession};
pub use validate::{PathDiagnostic, PathIssue, repair_path, validate_paths};
pub use vectorizer::{QuantizingTracer, RasterTracer};
#[cfg(feature = "backend-vtracer")]
pub use vectorizer::vtracer::VtracerTracer;

use std::path::Path;

use image::RgbaImage;

/// Convert a raster into colored path layers with explicit options.
pub fn vectorize(image: &RgbaImage, options: &ProcessingOptions) -> VectorizeResult<ProcessingResult> {
    QuantizingTracer.trace(image, options)
}

/// Analyze the raster first and convert it with the recommended options.
pub fn vectorize_auto(image: &RgbaImage) -> VectorizeResult<(ImageAnalysis, ProcessingResult)> {
    let analysis = analyze_image(image);
    let result = vectorize(image, &analysis.options)?;
    Ok((analysis, result))
}

/// Load any image format supported by `image` as RGBA.
pub fn open_rgba(path: impl AsRef<Path>) -> VectorizeResult<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

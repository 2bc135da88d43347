use image::RgbaImage;

use crate::config::ProcessingOptions;
use crate::layer::ProcessingResult;
use crate::pipeline::{trace_raster, trace_raster_unless_stale};
use crate::VectorizeResult;

/// A backend that turns a raster into colored layers of closed path strings.
pub trait RasterTracer {
    fn trace(&self, image: &RgbaImage, options: &ProcessingOptions)
    -> VectorizeResult<ProcessingResult>;

    /// Trace unless the run becomes stale; `Ok(None)` means it was abandoned.
    ///
    /// Backends that cannot stop midway only check before starting.
    fn trace_unless_stale(
        &self,
        image: &RgbaImage,
        options: &ProcessingOptions,
        is_stale: &(dyn Fn() -> bool + Sync),
    ) -> VectorizeResult<Option<ProcessingResult>> {
        if is_stale() {
            return Ok(None);
        }
        self.trace(image, options).map(Some)
    }
}

/// The native palette-quantizing tracer.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantizingTracer;

impl RasterTracer for QuantizingTracer {
    fn trace(
        &self,
        image: &RgbaImage,
        options: &ProcessingOptions,
    ) -> VectorizeResult<ProcessingResult> {
        trace_raster(image, options)
    }

    fn trace_unless_stale(
        &self,
        image: &RgbaImage,
        options: &ProcessingOptions,
        is_stale: &(dyn Fn() -> bool + Sync),
    ) -> VectorizeResult<Option<ProcessingResult>> {
        trace_raster_unless_stale(image, options, is_stale)
    }
}

#[cfg(feature = "backend-vtracer")]
pub mod vtracer;

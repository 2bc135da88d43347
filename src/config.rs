use std::fmt;

use crate::{VectorizeError, VectorizeResult};

/// Upper bound of the simplification tolerance; `path_precision` is subtracted from it.
const TOLERANCE_CEILING: f64 = 6.0;

/// Requested smoothing level. Advisory for the native tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathSmoothing {
    High,
    #[default]
    Balanced,
    Minimal,
}

impl fmt::Display for PathSmoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathSmoothing::High => "high",
            PathSmoothing::Balanced => "balanced",
            PathSmoothing::Minimal => "minimal",
        };
        f.write_str(name)
    }
}

/// Which occupancy cells are evaluated when extracting boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Only cells with a full 8-neighborhood are evaluated; the outermost rows
    /// and columns never become boundary cells.
    #[default]
    InteriorOnly,
    /// Every cell is evaluated and out-of-range neighbors count as empty.
    IncludeImageEdges,
}

/// Options controlling a single conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingOptions {
    /// Quantization levels per channel (at least 2).
    pub color_precision: u32,
    /// Higher values keep more detail; tolerance is `6 - path_precision`.
    pub path_precision: f64,
    /// Advisory line threshold, consumed by alternate backends.
    pub line_threshold: f64,
    pub path_smoothing: PathSmoothing,
    /// Merge layers whose colors are perceptually close.
    pub gradient_optimization: bool,
    pub boundary_policy: BoundaryPolicy,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            color_precision: 8,
            path_precision: 2.0,
            line_threshold: 0.1,
            path_smoothing: PathSmoothing::Balanced,
            gradient_optimization: true,
            boundary_policy: BoundaryPolicy::InteriorOnly,
        }
    }
}

impl ProcessingOptions {
    /// Set the number of quantization levels per channel.
    pub fn with_color_precision(mut self, color_precision: u32) -> Self {
        self.color_precision = color_precision;
        self
    }

    /// Set the path precision used to derive the simplification tolerance.
    pub fn with_path_precision(mut self, path_precision: f64) -> Self {
        self.path_precision = path_precision;
        self
    }

    /// Set the advisory line threshold.
    pub fn with_line_threshold(mut self, line_threshold: f64) -> Self {
        self.line_threshold = line_threshold;
        self
    }

    /// Set the advisory smoothing level.
    pub fn with_path_smoothing(mut self, path_smoothing: PathSmoothing) -> Self {
        self.path_smoothing = path_smoothing;
        self
    }

    /// Enable or disable merging of similar layers.
    pub fn with_gradient_optimization(mut self, enabled: bool) -> Self {
        self.gradient_optimization = enabled;
        self
    }

    /// Set the boundary extraction policy.
    pub fn with_boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary_policy = policy;
        self
    }

    /// Maximum perpendicular deviation allowed by the path simplifier.
    pub fn simplification_tolerance(&self) -> f64 {
        TOLERANCE_CEILING - self.path_precision
    }

    /// Check that every option is inside its accepted domain.
    pub fn validate(&self) -> VectorizeResult<()> {
        if self.color_precision < 2 {
            return Err(VectorizeError::InvalidOption(format!(
                "color precision must be at least 2, got {}",
                self.color_precision
            )));
        }
        if !self.path_precision.is_finite() {
            return Err(VectorizeError::InvalidOption(format!(
                "path precision must be finite, got {}",
                self.path_precision
            )));
        }
        if !self.line_threshold.is_finite() {
            return Err(VectorizeError::InvalidOption(format!(
                "line threshold must be finite, got {}",
                self.line_threshold
            )));
        }
        Ok(())
    }
}

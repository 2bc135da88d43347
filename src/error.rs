use thiserror::Error;

/// Result type alias for operations that may fail with [`VectorizeError`].
pub type VectorizeResult<T> = std::result::Result<T, VectorizeError>;

/// Error types that can occur while turning a raster into vector layers.
///
/// Malformed path strings are not errors: they are reported as
/// [`PathDiagnostic`](crate::validate::PathDiagnostic) lists and repaired.
#[derive(Debug, Error)]
pub enum VectorizeError {
    /// Image loading, decoding, or encoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Two rasters that must share dimensions do not.
    #[error("Raster size {found:?} does not match expected size {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// A color bucket was materialized without any pixels.
    #[error("Color bucket {color} has no pixels")]
    EmptyLayer { color: String },
    /// An option value is outside its accepted domain.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    /// An alternate tracing backend failed.
    #[error("Tracing failed: {0}")]
    Trace(String),
    /// A run was requested before any image was loaded.
    #[error("No image loaded")]
    NoImage,
}

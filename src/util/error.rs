//! Error types for mockwarp.

use thiserror::Error;

/// Result alias for mockwarp operations.
pub type MockwarpResult<T> = std::result::Result<T, MockwarpError>;

/// Errors that can occur while resolving, fitting, or compositing a mockup.
///
/// Every variant is a request-scoped failure: it is deterministic for the
/// given inputs and is never retried by the engine itself. Batch generation
/// catches these per template and records them against the failing entry.
#[derive(Debug, Error, PartialEq)]
pub enum MockwarpError {
    /// An image or target region has a zero or unusably small dimension.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A pixel buffer is shorter than its declared geometry requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A destination quadrilateral is degenerate or self-intersecting.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: &'static str },
    /// The color-key scan found no region above the area threshold.
    #[error("no marker region detected: {reason}")]
    NoRegionDetected { reason: &'static str },
    /// The four destination corners produce a singular transform.
    #[error("degenerate homography: destination corners are collinear or coincident")]
    HomographyDegenerate,
    /// A template manifest or its background asset could not be loaded.
    #[error("template load failed: {reason}")]
    TemplateLoadFailed { reason: String },
    /// Output serialization failed.
    #[error("encode failed: {reason}")]
    EncodeFailed { reason: String },
    /// Decoding an artwork or background byte stream failed.
    #[error("image i/o: {reason}")]
    ImageIo { reason: String },
}

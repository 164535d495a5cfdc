//! Error types for histmatch.

use thiserror::Error;

/// Result alias for histmatch operations.
pub type HistMatchResult<T> = std::result::Result<T, HistMatchError>;

/// Errors that can occur when building, comparing or ranking histograms.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HistMatchError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A value cannot be interpreted in the numeric or set form a metric needs.
    #[error("type conversion failed: {reason}")]
    TypeConversion { reason: &'static str },
    /// Two vectors passed to a distance computation differ in length.
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    /// A histogram is structurally unusable (zero bins, empty counts).
    #[error("invalid histogram: {reason}")]
    InvalidHistogram { reason: &'static str },
    /// A channel does not hold exactly `bins` counts.
    #[error("channel length {got} does not match bin count {bins}")]
    ChannelLength { bins: usize, got: usize },
    /// The operation needs the source pixels, but the histogram carries none.
    #[error("histogram has no backing pixels: {context}")]
    MissingPixels { context: &'static str },
    /// Requested result depth must be at least 1.
    #[error("invalid depth: {depth}")]
    InvalidDepth { depth: usize },
    /// A catalog cursor yielded a payload the selected mode cannot use.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A single catalog entry could not be read or decoded.
    #[error("catalog entry {id} unreadable: {reason}")]
    CatalogEntryUnreadable { id: String, reason: String },
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Pixel buffer length does not match the declared dimensions.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Image decoding or file access failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}

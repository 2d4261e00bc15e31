//! Error types for yolodec.

use thiserror::Error;

/// Result alias for yolodec operations.
pub type YoloDecResult<T> = std::result::Result<T, YoloDecError>;

/// Errors that can occur when decoding detection tensors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum YoloDecError {
    /// A tensor or image dimension is zero or overflows `usize`.
    #[error("invalid dimensions: {shape:?}")]
    InvalidDimensions { shape: [usize; 4] },
    /// A stride is smaller than the extent it has to step over.
    #[error("invalid stride {stride} for axis {axis} (needs at least {min})")]
    InvalidStride {
        axis: usize,
        stride: usize,
        min: usize,
    },
    /// The backing buffer is too small for the requested view.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The tensor shape disagrees with the configured grid layout.
    #[error("tensor shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: [usize; 4],
        got: [usize; 4],
    },
    /// An index is outside of the valid range.
    #[error("{context} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// The label table does not have one entry per class.
    #[error("label count mismatch: expected {expected}, got {got}")]
    LabelCountMismatch { expected: usize, got: usize },
    /// The anchor priors do not have one entry per box slot.
    #[error("anchor count mismatch: expected {expected}, got {got}")]
    AnchorCountMismatch { expected: usize, got: usize },
    /// Anchor prior values could not be paired or are not finite.
    #[error("invalid anchors: {reason}")]
    InvalidAnchors { reason: &'static str },
    /// A configuration value is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Reading a file failed.
    #[error("io error: {reason}")]
    Io { reason: String },
    /// Image decoding failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}

impl From<std::io::Error> for YoloDecError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

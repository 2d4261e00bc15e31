//! Low-level building blocks for custom decoding pipelines.
//!
//! These expose the activation functions, overlap metric and suppression
//! used by `Detector`. Most users should prefer `Detector` or
//! the top-level `detect` function.

pub use crate::activation::{argmax, sigmoid, softmax};
pub use crate::candidate::nms::suppress;
pub use crate::geometry::iou;
pub use crate::tensor::preprocess::{normalize_channel, INPUT_MEAN, INPUT_STD};

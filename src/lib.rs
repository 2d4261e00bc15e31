//! yolodec turns raw YOLO-style grid tensors into labeled bounding boxes.
//!
//! The decoder walks every grid cell and anchor slot of an NHWC output
//! tensor, scores objectness and classes, maps offsets to input-image pixels
//! and prunes overlaps with greedy IOU suppression. Optional features add
//! row-parallel decoding (`rayon`), image loading and preprocessing
//! (`image-io`) and spans/events (`tracing`).

mod trace;

pub mod activation;
mod candidate;
pub mod classify;
pub mod decode;
pub mod geometry;
pub mod labels;
pub mod lowlevel;
pub mod tensor;
pub mod util;

pub use candidate::nms::suppress;
pub use candidate::CandidateBox;
pub use classify::{rank_classes, Classification};
pub use decode::{
    detect, AnchorPrior, DetectConfig, Detector, GridLayout, ModelLayout,
    BOX_INFO_FEATURE_COUNT, TINY_YOLO_V2_INPUT_SIZE,
};
pub use geometry::{iou, BoxDimensions, CellDimensions};
pub use labels::LabelTable;
pub use tensor::preprocess::normalize_rgb;
pub use tensor::{OwnedTensor, TensorView};
pub use util::{YoloDecError, YoloDecResult};

#[cfg(feature = "image-io")]
pub use tensor::io;

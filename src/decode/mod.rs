//! Decoding of YOLO-style grid tensors into labeled boxes.
//!
//! A `ModelLayout` bundles the static geometry of a model output (grid size,
//! anchors per cell, class count, cell pixel size), its anchor priors and its
//! label table. It is validated once and then shared read-only between calls.
//! A `Detector` pairs a layout with per-call thresholds and runs the two
//! stages: grid decode and greedy IOU suppression.
//!
//! Channel layout per cell: for anchor slot `b`, channels starting at
//! `b * (class_count + 5)` hold `[tx, ty, tw, th, objectness, class logits...]`.

mod anchors;
pub(crate) mod grid;
#[cfg(feature = "rayon")]
pub(crate) mod rayon;

pub use anchors::AnchorPrior;

use crate::candidate::nms::suppress;
use crate::candidate::CandidateBox;
use crate::labels::LabelTable;
use crate::tensor::TensorView;
use crate::trace::{trace_event, trace_span};
use crate::util::{YoloDecError, YoloDecResult};

/// Number of non-class channels per anchor slot (`tx, ty, tw, th, objectness`).
pub const BOX_INFO_FEATURE_COUNT: usize = 5;

/// Square input side of the reference Tiny YOLOv2 model.
pub const TINY_YOLO_V2_INPUT_SIZE: u32 = 416;

/// Static geometry of a grid output tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    /// Grid rows (tensor axis 1).
    pub rows: usize,
    /// Grid columns (tensor axis 2).
    pub cols: usize,
    /// Anchor slots evaluated per cell.
    pub boxes_per_cell: usize,
    /// Classes scored per anchor slot.
    pub class_count: usize,
    /// Width of one grid cell in input pixels.
    pub cell_width: f32,
    /// Height of one grid cell in input pixels.
    pub cell_height: f32,
}

impl GridLayout {
    /// 13x13 grid, 5 anchors, 20 classes, 32 px cells.
    pub fn tiny_yolo_v2_voc() -> Self {
        Self {
            rows: 13,
            cols: 13,
            boxes_per_cell: 5,
            class_count: 20,
            cell_width: 32.0,
            cell_height: 32.0,
        }
    }

    /// Channels occupied by one anchor slot.
    pub fn channels_per_box(&self) -> usize {
        self.class_count + BOX_INFO_FEATURE_COUNT
    }

    /// Total channels per cell.
    pub fn channels(&self) -> usize {
        self.boxes_per_cell * self.channels_per_box()
    }

    /// Expected tensor shape `[1, rows, cols, channels]`.
    pub fn tensor_shape(&self) -> [usize; 4] {
        [1, self.rows, self.cols, self.channels()]
    }

    fn validate(&self) -> YoloDecResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(YoloDecError::InvalidConfig {
                reason: "grid must have at least one row and column",
            });
        }
        if self.boxes_per_cell == 0 {
            return Err(YoloDecError::InvalidConfig {
                reason: "boxes_per_cell must be > 0",
            });
        }
        if self.class_count == 0 {
            return Err(YoloDecError::InvalidConfig {
                reason: "class_count must be > 0",
            });
        }
        let cell_ok = |v: f32| v.is_finite() && v > 0.0;
        if !cell_ok(self.cell_width) || !cell_ok(self.cell_height) {
            return Err(YoloDecError::InvalidConfig {
                reason: "cell size must be finite and > 0",
            });
        }
        Ok(())
    }
}

/// Validated grid geometry, anchor priors and labels of one model.
#[derive(Clone, Debug)]
pub struct ModelLayout {
    grid: GridLayout,
    anchors: Vec<AnchorPrior>,
    labels: LabelTable,
}

impl ModelLayout {
    /// Validates and bundles a model layout.
    ///
    /// Requires one anchor prior per box slot and one label per class.
    pub fn new(
        grid: GridLayout,
        anchors: Vec<AnchorPrior>,
        labels: LabelTable,
    ) -> YoloDecResult<Self> {
        grid.validate()?;
        if anchors.len() != grid.boxes_per_cell {
            return Err(YoloDecError::AnchorCountMismatch {
                expected: grid.boxes_per_cell,
                got: anchors.len(),
            });
        }
        if anchors
            .iter()
            .any(|a| !a.width.is_finite() || !a.height.is_finite())
        {
            return Err(YoloDecError::InvalidAnchors {
                reason: "non-finite anchor value",
            });
        }
        if labels.len() != grid.class_count {
            return Err(YoloDecError::LabelCountMismatch {
                expected: grid.class_count,
                got: labels.len(),
            });
        }
        Ok(Self {
            grid,
            anchors,
            labels,
        })
    }

    /// Reference Tiny YOLOv2 layout with the Pascal VOC classes.
    pub fn tiny_yolo_v2_voc() -> YoloDecResult<Self> {
        Self::new(
            GridLayout::tiny_yolo_v2_voc(),
            AnchorPrior::tiny_yolo_v2_voc(),
            LabelTable::pascal_voc(),
        )
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    pub fn anchors(&self) -> &[AnchorPrior] {
        &self.anchors
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Fails with `ShapeMismatch` unless `tensor` matches this layout.
    pub fn check_tensor(&self, tensor: &TensorView<'_>) -> YoloDecResult<()> {
        let expected = self.grid.tensor_shape();
        let got = tensor.shape();
        if expected != got {
            return Err(YoloDecError::ShapeMismatch { expected, got });
        }
        Ok(())
    }
}

/// Thresholds and limits for one detection call.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectConfig {
    /// Minimum objectness (after sigmoid) for an anchor to be decoded.
    pub confidence_threshold: f32,
    /// Minimum `top class probability * objectness`.
    pub class_score_threshold: f32,
    /// IOU above which a lower-confidence box is suppressed.
    pub nms_threshold: f32,
    /// Maximum number of boxes returned.
    pub max_results: usize,
    /// Decode grid rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            class_score_threshold: 0.3,
            nms_threshold: 0.3,
            max_results: 5,
            parallel: false,
        }
    }
}

impl DetectConfig {
    fn validate(&self) -> YoloDecResult<()> {
        if !self.confidence_threshold.is_finite() || !self.class_score_threshold.is_finite() {
            return Err(YoloDecError::InvalidConfig {
                reason: "score thresholds must be finite",
            });
        }
        if !(0.0..=1.0).contains(&self.nms_threshold) {
            return Err(YoloDecError::InvalidConfig {
                reason: "nms_threshold must be in [0, 1]",
            });
        }
        Ok(())
    }
}

/// Decoder for one model layout.
#[derive(Clone, Debug)]
pub struct Detector {
    layout: ModelLayout,
    cfg: DetectConfig,
}

impl Detector {
    /// Creates a detector with default thresholds.
    pub fn new(layout: ModelLayout) -> Self {
        Self {
            layout,
            cfg: DetectConfig::default(),
        }
    }

    /// Replaces the detection thresholds.
    pub fn with_config(mut self, cfg: DetectConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn layout(&self) -> &ModelLayout {
        &self.layout
    }

    pub fn config(&self) -> &DetectConfig {
        &self.cfg
    }

    /// Decodes every anchor that passes both score thresholds.
    ///
    /// Candidates are returned in grid order, before suppression.
    pub fn decode(&self, tensor: TensorView<'_>) -> YoloDecResult<Vec<CandidateBox>> {
        self.cfg.validate()?;
        self.layout.check_tensor(&tensor)?;
        decode_checked(tensor, &self.layout, &self.cfg)
    }

    /// Decodes and suppresses overlapping boxes.
    ///
    /// The result is sorted by descending confidence and holds at most
    /// `max_results` boxes.
    pub fn detect(&self, tensor: TensorView<'_>) -> YoloDecResult<Vec<CandidateBox>> {
        detect(tensor, &self.layout, &self.cfg)
    }
}

/// Decodes `tensor` against `layout` and applies greedy suppression.
pub fn detect(
    tensor: TensorView<'_>,
    layout: &ModelLayout,
    cfg: &DetectConfig,
) -> YoloDecResult<Vec<CandidateBox>> {
    let _span = trace_span!(
        "detect",
        rows = layout.grid().rows,
        cols = layout.grid().cols
    )
    .entered();
    cfg.validate()?;
    layout.check_tensor(&tensor)?;

    let candidates = decode_checked(tensor, layout, cfg)?;
    let decoded = candidates.len();
    let kept = suppress(candidates, cfg.nms_threshold, cfg.max_results);
    trace_event!("detect_done", decoded = decoded, kept = kept.len());
    Ok(kept)
}

fn decode_checked(
    tensor: TensorView<'_>,
    layout: &ModelLayout,
    cfg: &DetectConfig,
) -> YoloDecResult<Vec<CandidateBox>> {
    #[cfg(feature = "rayon")]
    {
        if cfg.parallel {
            return self::rayon::decode_grid_par(tensor, layout, cfg);
        }
    }
    grid::decode_grid(tensor, layout, cfg)
}

#[cfg(test)]
mod tests {
    use super::{AnchorPrior, DetectConfig, GridLayout, ModelLayout};
    use crate::labels::LabelTable;
    use crate::util::YoloDecError;

    fn small_grid() -> GridLayout {
        GridLayout {
            rows: 2,
            cols: 3,
            boxes_per_cell: 2,
            class_count: 3,
            cell_width: 10.0,
            cell_height: 10.0,
        }
    }

    #[test]
    fn channels_follow_box_layout() {
        let grid = GridLayout::tiny_yolo_v2_voc();
        assert_eq!(grid.channels_per_box(), 25);
        assert_eq!(grid.tensor_shape(), [1, 13, 13, 125]);
    }

    #[test]
    fn layout_requires_one_label_per_class() {
        let err = ModelLayout::new(
            small_grid(),
            vec![AnchorPrior::new(1.0, 1.0); 2],
            LabelTable::from_labels(["a", "b"]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            YoloDecError::LabelCountMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn layout_requires_one_anchor_per_slot() {
        let err = ModelLayout::new(
            small_grid(),
            vec![AnchorPrior::new(1.0, 1.0)],
            LabelTable::from_labels(["a", "b", "c"]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            YoloDecError::AnchorCountMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn zero_classes_is_rejected() {
        let grid = GridLayout {
            class_count: 0,
            ..small_grid()
        };
        let err = ModelLayout::new(grid, vec![AnchorPrior::new(1.0, 1.0); 2], LabelTable::default())
            .unwrap_err();
        assert!(matches!(err, YoloDecError::InvalidConfig { .. }));
    }

    #[test]
    fn nms_threshold_out_of_range_is_rejected() {
        let cfg = DetectConfig {
            nms_threshold: 1.5,
            ..DetectConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(DetectConfig::default().validate().is_ok());
    }

    #[test]
    fn reference_layout_is_valid() {
        let layout = ModelLayout::tiny_yolo_v2_voc().unwrap();
        assert_eq!(layout.labels().len(), 20);
        assert_eq!(layout.anchors().len(), 5);
    }
}

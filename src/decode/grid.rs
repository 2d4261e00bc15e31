//! Sequential grid traversal.
//!
//! Every `(row, col, slot)` triple is visited once. Anchors below the
//! objectness threshold are rejected before the class softmax runs.

use crate::activation::{argmax, sigmoid, softmax};
use crate::candidate::CandidateBox;
use crate::decode::{DetectConfig, ModelLayout, BOX_INFO_FEATURE_COUNT};
use crate::geometry::CellDimensions;
use crate::tensor::TensorView;
use crate::trace::{stage_event, stage_span};
use crate::util::{YoloDecError, YoloDecResult};

/// Decodes all grid rows in order. `tensor` must already match `layout`.
pub(crate) fn decode_grid(
    tensor: TensorView<'_>,
    layout: &ModelLayout,
    cfg: &DetectConfig,
) -> YoloDecResult<Vec<CandidateBox>> {
    let _span = stage_span!("decode_grid", parallel = false).entered();
    let mut out = Vec::new();
    for row in 0..layout.grid().rows {
        decode_row(tensor, layout, cfg, row, &mut out)?;
    }
    stage_event!("decode_grid_done", candidates = out.len());
    Ok(out)
}

/// Decodes every cell of one grid row, appending to `out` in column order.
pub(crate) fn decode_row(
    tensor: TensorView<'_>,
    layout: &ModelLayout,
    cfg: &DetectConfig,
    row: usize,
    out: &mut Vec<CandidateBox>,
) -> YoloDecResult<()> {
    let grid = layout.grid();
    for col in 0..grid.cols {
        let cell = tensor
            .cell(row, col)
            .ok_or(YoloDecError::IndexOutOfBounds {
                index: row * grid.cols + col,
                len: grid.rows * grid.cols,
                context: "grid cell",
            })?;
        for slot in 0..grid.boxes_per_cell {
            if let Some(candidate) = decode_anchor(cell, row, col, slot, layout, cfg) {
                out.push(candidate);
            }
        }
    }
    Ok(())
}

fn decode_anchor(
    cell: &[f32],
    row: usize,
    col: usize,
    slot: usize,
    layout: &ModelLayout,
    cfg: &DetectConfig,
) -> Option<CandidateBox> {
    let grid = layout.grid();
    let channel = slot * grid.channels_per_box();
    let block = cell.get(channel..channel + grid.channels_per_box())?;
    let (tx, ty, tw, th) = (block[0], block[1], block[2], block[3]);

    let confidence = sigmoid(block[4]);
    if confidence.is_nan() || confidence < cfg.confidence_threshold {
        return None;
    }

    let classes = softmax(&block[BOX_INFO_FEATURE_COUNT..]);
    let (class_id, class_score) = argmax(&classes)?;
    let combined = class_score * confidence;
    if combined.is_nan() || combined < cfg.class_score_threshold {
        return None;
    }

    // Anchor priors are added after scaling, not multiplied in.
    let anchor = layout.anchors().get(slot)?;
    let mapped = CellDimensions {
        x: (col as f32 + sigmoid(tx)) * grid.cell_width,
        y: (row as f32 + sigmoid(ty)) * grid.cell_height,
        width: tw.exp() * grid.cell_width + anchor.width,
        height: th.exp() * grid.cell_height + anchor.height,
    };

    Some(CandidateBox {
        dimensions: mapped.to_box(),
        label: layout.labels().get(class_id)?.to_owned(),
        class_id,
        class_score,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::decode_grid;
    use crate::decode::{AnchorPrior, DetectConfig, GridLayout, ModelLayout};
    use crate::labels::LabelTable;
    use crate::tensor::OwnedTensor;

    fn layout() -> ModelLayout {
        ModelLayout::new(
            GridLayout {
                rows: 2,
                cols: 2,
                boxes_per_cell: 2,
                class_count: 2,
                cell_width: 32.0,
                cell_height: 16.0,
            },
            vec![AnchorPrior::new(1.0, 2.0), AnchorPrior::new(3.0, 4.0)],
            LabelTable::from_labels(["cat", "dog"]),
        )
        .unwrap()
    }

    #[test]
    fn maps_offsets_with_additive_anchor() {
        let layout = layout();
        let mut tensor = OwnedTensor::zeros(layout.grid().tensor_shape()).unwrap();
        // row 1, col 0, slot 1 starts at channel 7.
        tensor.set(0, 1, 0, 7 + 4, 10.0).unwrap();
        tensor.set(0, 1, 0, 7 + 6, 10.0).unwrap();

        let cfg = DetectConfig {
            confidence_threshold: 0.6,
            class_score_threshold: 0.6,
            ..DetectConfig::default()
        };
        let out = decode_grid(tensor.view(), &layout, &cfg).unwrap();
        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!(c.label, "dog");
        assert_eq!(c.class_id, 1);

        // tx = ty = tw = th = 0: center (0.5 * 32, 1.5 * 16), size (32 + 3, 16 + 4).
        let cx = 16.0f32;
        let cy = 24.0f32;
        let w = 35.0f32;
        let h = 20.0f32;
        assert!((c.dimensions.x - (cx - w) / 2.0).abs() < 1e-5);
        assert!((c.dimensions.y - (cy - h) / 2.0).abs() < 1e-5);
        assert!((c.dimensions.width - w).abs() < 1e-5);
        assert!((c.dimensions.height - h).abs() < 1e-5);
    }

    #[test]
    fn class_score_threshold_uses_product() {
        let layout = layout();
        let mut tensor = OwnedTensor::zeros(layout.grid().tensor_shape()).unwrap();
        // objectness ~0.73, classes tied at 0.5 -> combined ~0.37.
        tensor.set(0, 0, 0, 4, 1.0).unwrap();

        let loose = DetectConfig {
            confidence_threshold: 0.7,
            class_score_threshold: 0.3,
            ..DetectConfig::default()
        };
        let out = decode_grid(tensor.view(), &layout, &loose).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_id, 0);

        let strict = DetectConfig {
            class_score_threshold: 0.4,
            ..loose
        };
        assert!(decode_grid(tensor.view(), &layout, &strict).unwrap().is_empty());
    }
}

//! Rayon-parallel grid decode (feature-gated).
//!
//! Rows are decoded independently and concatenated in row order, so the
//! output matches the sequential decode element for element.

use crate::candidate::CandidateBox;
use crate::decode::grid::decode_row;
use crate::decode::{DetectConfig, ModelLayout};
use crate::tensor::TensorView;
use crate::trace::{stage_event, stage_span};
use crate::util::YoloDecResult;
use rayon::prelude::*;

/// Row-parallel variant of `decode_grid`.
pub(crate) fn decode_grid_par(
    tensor: TensorView<'_>,
    layout: &ModelLayout,
    cfg: &DetectConfig,
) -> YoloDecResult<Vec<CandidateBox>> {
    let _span = stage_span!("decode_grid", parallel = true).entered();
    let rows: Vec<Vec<CandidateBox>> = (0..layout.grid().rows)
        .into_par_iter()
        .map(|row| {
            let mut out = Vec::new();
            decode_row(tensor, layout, cfg, row, &mut out)?;
            Ok(out)
        })
        .collect::<YoloDecResult<_>>()?;

    let out: Vec<CandidateBox> = rows.into_iter().flatten().collect();
    stage_event!("decode_grid_done", candidates = out.len());
    Ok(out)
}

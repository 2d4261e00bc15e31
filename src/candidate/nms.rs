//! Greedy IOU non-maximum suppression.

use crate::candidate::CandidateBox;
use crate::geometry::iou;
use crate::trace::{stage_event, stage_span};

/// Sorts candidates by descending confidence, keeping decode order on ties.
pub(crate) fn sort_candidates_desc(candidates: &mut [CandidateBox]) {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}

/// Applies greedy non-maximum suppression.
///
/// Candidates are visited in descending confidence. Each visited candidate
/// that is still active is kept and deactivates every later active candidate
/// whose IOU with it exceeds `iou_threshold`. Stops as soon as
/// `max_results` boxes are kept or no active candidate remains.
pub fn suppress(
    mut candidates: Vec<CandidateBox>,
    iou_threshold: f32,
    max_results: usize,
) -> Vec<CandidateBox> {
    let _span = stage_span!("suppress", candidates = candidates.len()).entered();
    if max_results == 0 || candidates.is_empty() {
        return Vec::new();
    }

    sort_candidates_desc(&mut candidates);
    let n = candidates.len();
    let mut active = vec![true; n];
    let mut keep = vec![false; n];
    // Candidates that are neither kept nor suppressed yet.
    let mut remaining = n;
    let mut kept = 0usize;

    for i in 0..n {
        if !active[i] {
            continue;
        }
        active[i] = false;
        keep[i] = true;
        remaining -= 1;
        kept += 1;
        if kept >= max_results || remaining == 0 {
            break;
        }

        let a = candidates[i].dimensions;
        for j in (i + 1)..n {
            if active[j] && iou(&a, &candidates[j].dimensions) > iou_threshold {
                active[j] = false;
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        }
        if remaining == 0 {
            break;
        }
    }

    stage_event!("suppress_done", kept = kept, dropped = n - kept);
    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(candidate, keep)| keep.then_some(candidate))
        .collect()
}

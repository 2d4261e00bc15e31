//! Ranking of single-vector classifier outputs.

use crate::labels::LabelTable;
use crate::util::{YoloDecError, YoloDecResult};

/// One ranked class.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub label: String,
    pub class_id: usize,
    pub score: f32,
}

impl Classification {
    /// Score expressed as a percentage.
    pub fn percent(&self) -> f32 {
        self.score * 100.0
    }
}

/// Returns the `k` highest-scoring classes, best first.
///
/// Equal scores keep the lower class id first and NaN scores are skipped.
/// `scores` must have one entry per label.
pub fn rank_classes(
    scores: &[f32],
    labels: &LabelTable,
    k: usize,
) -> YoloDecResult<Vec<Classification>> {
    if scores.len() != labels.len() {
        return Err(YoloDecError::LabelCountMismatch {
            expected: scores.len(),
            got: labels.len(),
        });
    }

    // NaN scores are unranked, matching `argmax`.
    let mut ranked: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .collect();
    // Stable, so equal scores stay in class order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(k);

    ranked
        .into_iter()
        .map(|(class_id, score)| {
            let label = labels.get(class_id).ok_or(YoloDecError::IndexOutOfBounds {
                index: class_id,
                len: labels.len(),
                context: "label",
            })?;
            Ok(Classification {
                label: label.to_owned(),
                class_id,
                score,
            })
        })
        .collect()
}

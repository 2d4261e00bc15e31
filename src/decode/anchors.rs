//! Anchor box priors.

use crate::util::{YoloDecError, YoloDecResult};

/// Width/height prior for one anchor slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPrior {
    pub width: f32,
    pub height: f32,
}

impl AnchorPrior {
    /// Priors of Tiny YOLOv2 trained on Pascal VOC, as flat `w, h` pairs.
    pub const TINY_YOLO_V2_VOC: [f32; 10] = [
        1.08, 1.19, 3.42, 4.41, 6.63, 11.38, 9.42, 5.11, 16.62, 10.52,
    ];

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pairs a flat `[w0, h0, w1, h1, ...]` sequence into priors.
    pub fn from_flat(values: &[f32]) -> YoloDecResult<Vec<Self>> {
        if values.is_empty() {
            return Err(YoloDecError::InvalidAnchors {
                reason: "no anchor values",
            });
        }
        if values.len() % 2 != 0 {
            return Err(YoloDecError::InvalidAnchors {
                reason: "anchor values must come in width/height pairs",
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(YoloDecError::InvalidAnchors {
                reason: "non-finite anchor value",
            });
        }
        Ok(values
            .chunks_exact(2)
            .map(|pair| Self::new(pair[0], pair[1]))
            .collect())
    }

    /// Returns the Tiny YOLOv2 VOC priors.
    pub fn tiny_yolo_v2_voc() -> Vec<Self> {
        Self::TINY_YOLO_V2_VOC
            .chunks_exact(2)
            .map(|pair| Self::new(pair[0], pair[1]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::AnchorPrior;

    #[test]
    fn pairs_flat_values() {
        let anchors = AnchorPrior::from_flat(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(
            anchors,
            vec![AnchorPrior::new(1.0, 2.0), AnchorPrior::new(3.0, 4.0)]
        );
    }

    #[test]
    fn rejects_odd_length() {
        assert!(AnchorPrior::from_flat(&[1.08, 1.19, 3.42]).is_err());
    }

    #[test]
    fn reference_priors_have_five_slots() {
        let anchors = AnchorPrior::tiny_yolo_v2_voc();
        assert_eq!(anchors.len(), 5);
        assert_eq!(anchors[0], AnchorPrior::new(1.08, 1.19));
        assert_eq!(anchors[4], AnchorPrior::new(16.62, 10.52));
    }
}

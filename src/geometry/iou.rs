//! Intersection-over-union for axis-aligned boxes.

use crate::geometry::BoxDimensions;

/// Computes the intersection-over-union of two boxes.
///
/// Returns `0` when either box has a non-positive width or height, or when
/// the union collapses to zero. Identical boxes give exactly `1`.
pub fn iou(a: &BoxDimensions, b: &BoxDimensions) -> f32 {
    if !has_extent(a) || !has_extent(b) {
        return 0.0;
    }
    let overlap_w = overlap(a.x, a.width, b.x, b.width);
    let overlap_h = overlap(a.y, a.height, b.y, b.height);
    let intersection = overlap_w * overlap_h;

    let union = a.area() + b.area() - intersection;
    if union.is_nan() || union <= 0.0 {
        return 0.0;
    }
    (intersection / union).clamp(0.0, 1.0)
}

/// Length shared by `[start_a, start_a + len_a]` and `[start_b, start_b + len_b]`.
///
/// Measured from the later start so equal spans return `len` unchanged,
/// without the rounding of subtracting two far-end coordinates.
fn overlap(start_a: f32, len_a: f32, start_b: f32, len_b: f32) -> f32 {
    let shared = if start_a <= start_b {
        (len_a - (start_b - start_a)).min(len_b)
    } else {
        (len_b - (start_a - start_b)).min(len_a)
    };
    shared.max(0.0)
}

fn has_extent(b: &BoxDimensions) -> bool {
    b.width > 0.0 && b.height > 0.0 && b.area() > 0.0
}

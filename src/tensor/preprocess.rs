//! Conversion of raw RGB pixels into model input tensors.

use crate::tensor::OwnedTensor;
use crate::util::{YoloDecError, YoloDecResult};

/// Channel mean subtracted from every 8-bit sample.
pub const INPUT_MEAN: f32 = 127.0;
/// Divisor applied after mean subtraction.
pub const INPUT_STD: f32 = 127.5;

/// Normalizes a single 8-bit channel value to roughly `[-1, 1]`.
#[inline]
pub fn normalize_channel(value: u8) -> f32 {
    (f32::from(value) - INPUT_MEAN) / INPUT_STD
}

/// Converts interleaved, row-major RGB bytes into a `[1, height, width, 3]`
/// tensor.
pub fn normalize_rgb(pixels: &[u8], width: usize, height: usize) -> YoloDecResult<OwnedTensor> {
    let shape = [1, height, width, 3];
    let needed = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(3))
        .ok_or(YoloDecError::InvalidDimensions { shape })?;
    if pixels.len() != needed {
        return Err(YoloDecError::BufferTooSmall {
            needed,
            got: pixels.len(),
        });
    }
    let data = pixels.iter().copied().map(normalize_channel).collect();
    OwnedTensor::new(data, shape)
}

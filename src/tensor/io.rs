//! Image loading and model-input preparation via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::tensor::preprocess::normalize_rgb;
use crate::tensor::OwnedTensor;
use crate::util::{YoloDecError, YoloDecResult};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Crops the centered square whose side is the image's smaller dimension.
pub fn crop_square(img: &RgbImage) -> RgbImage {
    let side = img.width().min(img.height());
    let x = (img.width() - side) / 2;
    let y = (img.height() - side) / 2;
    imageops::crop_imm(img, x, y, side, side).to_image()
}

/// Crops, resizes to `size x size` and normalizes an RGB image.
pub fn prepare_input(img: &DynamicImage, size: u32) -> YoloDecResult<OwnedTensor> {
    if size == 0 {
        return Err(YoloDecError::InvalidConfig {
            reason: "input size must be > 0",
        });
    }
    let rgb = img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(YoloDecError::InvalidDimensions {
            shape: [1, rgb.height() as usize, rgb.width() as usize, 3],
        });
    }
    let square = crop_square(&rgb);
    let scaled = imageops::resize(&square, size, size, FilterType::Triangle);
    normalize_rgb(scaled.as_raw(), size as usize, size as usize)
}

/// Loads an image from disk and converts it to a normalized input tensor.
pub fn load_input_tensor<P: AsRef<Path>>(path: P, size: u32) -> YoloDecResult<OwnedTensor> {
    let img = image::open(path).map_err(|err| YoloDecError::ImageIo {
        reason: err.to_string(),
    })?;
    prepare_input(&img, size)
}

#[cfg(test)]
mod tests {
    use super::{crop_square, prepare_input};
    use image::{DynamicImage, Rgb, RgbImage};

    #[test]
    fn crop_square_keeps_center() {
        let img = RgbImage::from_fn(6, 2, |x, _| Rgb([x as u8, 0, 0]));
        let square = crop_square(&img);
        assert_eq!(square.dimensions(), (2, 2));
        assert_eq!(square.get_pixel(0, 0)[0], 2);
        assert_eq!(square.get_pixel(1, 1)[0], 3);
    }

    #[test]
    fn prepare_input_produces_model_shape() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([127, 127, 127])));
        let tensor = prepare_input(&img, 16).unwrap();
        assert_eq!(tensor.shape(), [1, 16, 16, 3]);
        assert!(tensor.data().iter().all(|v| v.abs() < 1e-6));
    }
}

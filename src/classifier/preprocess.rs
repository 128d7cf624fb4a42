// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! ViT-base/16 input preparation

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

/// Square input edge expected by the model
pub const INPUT_SIZE: u32 = 224;

/// Per-channel normalization used when the model was exported
pub const IMAGE_MEAN: [f32; 3] = [0.5, 0.5, 0.5];
pub const IMAGE_STD: [f32; 3] = [0.5, 0.5, 0.5];

/// Convert an image into a normalized NCHW tensor of shape `[1, 3, 224, 224]`
pub fn to_tensor(image: &DynamicImage) -> Array4<f32> {
    let rgb = image
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();

    let size = INPUT_SIZE as usize;
    Array4::from_shape_fn((1, 3, size, size), |(_, c, y, x)| {
        let value = rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
        (value - IMAGE_MEAN[c]) / IMAGE_STD[c]
    })
}

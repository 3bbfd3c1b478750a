//! Tensor-to-image conversion.
//!
//! Upstream nodes hand images over as multi-dimensional float arrays; the
//! webhook node attaches them to multipart requests as encoded PNGs.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::{HookflowError, Result};

/// Image pixel data produced by upstream nodes.
///
/// Shape is `[batch, height, width, channels]` or `[height, width, channels]`,
/// with samples in `[0, 1]`. Serializable so it can travel through node vars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl ImageTensor {
    /// Build a tensor, checking that `data` fills `shape` exactly.
    pub fn new(
        shape: Vec<usize>,
        data: Vec<f32>,
    ) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(HookflowError::Image(format!("tensor data length {} does not match shape {:?}", data.len(), shape)));
        }

        Ok(Self {
            shape,
            data,
        })
    }

    /// Encode the tensor as a PNG.
    ///
    /// A batched tensor contributes only its first image. Samples in `[0, 1]`
    /// scale to `[0, 255]`; data already above 1 is truncated per sample.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let (height, width, channels) = match self.shape.as_slice() {
            [batch, height, width, channels] => {
                if *batch == 0 {
                    return Err(HookflowError::Image("empty image batch".to_string()));
                }
                (*height, *width, *channels)
            }
            [height, width, channels] => (*height, *width, *channels),
            other => return Err(HookflowError::Image(format!("unexpected tensor shape: {:?}", other))),
        };

        let expected: usize = self.shape.iter().product();
        if self.data.len() != expected {
            return Err(HookflowError::Image(format!("tensor data length {} does not match shape {:?}", self.data.len(), self.shape)));
        }
        if height == 0 || width == 0 {
            return Err(HookflowError::Image(format!("degenerate image dimensions {}x{}", width, height)));
        }

        // first image of the batch
        let pixels = &self.data[..height * width * channels];

        let max = pixels.iter().cloned().fold(f32::MIN, f32::max);
        let bytes: Vec<u8> = if max <= 1.0 {
            pixels.iter().map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8).collect()
        } else {
            pixels.iter().map(|v| v.clamp(0.0, 255.0) as u8).collect()
        };

        let image = build_image(width as u32, height as u32, channels, bytes)?;

        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, image::ImageFormat::Png)?;

        Ok(out.into_inner())
    }
}

fn build_image(
    width: u32,
    height: u32,
    channels: usize,
    bytes: Vec<u8>,
) -> Result<image::DynamicImage> {
    let image = match channels {
        1 => image::GrayImage::from_raw(width, height, bytes).map(image::DynamicImage::ImageLuma8),
        3 => image::RgbImage::from_raw(width, height, bytes).map(image::DynamicImage::ImageRgb8),
        4 => image::RgbaImage::from_raw(width, height, bytes).map(image::DynamicImage::ImageRgba8),
        other => return Err(HookflowError::Image(format!("unsupported channel count: {}", other))),
    };

    image.ok_or_else(|| HookflowError::Image(format!("pixel buffer does not fill a {}x{} image", width, height)))
}

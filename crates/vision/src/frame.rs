//! Decoded video frames.

use std::cell::OnceCell;

use image::{GrayImage, Luma, RgbImage};

/// One decoded RGB frame, with a grayscale view computed on first use.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub index: u64,
    pub rgb: RgbImage,
    gray: OnceCell<GrayImage>,
}

impl VideoFrame {
    pub fn new(index: u64, rgb: RgbImage) -> Self {
        Self {
            index,
            rgb,
            gray: OnceCell::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    /// Sum of every channel value of every pixel.
    pub fn intensity_sum(&self) -> u64 {
        self.rgb.as_raw().iter().map(|&v| v as u64).sum()
    }

    /// BT.601 grayscale, the weighting reference patterns are captured with.
    pub fn gray(&self) -> &GrayImage {
        self.gray.get_or_init(|| to_gray(&self.rgb))
    }
}

/// Convert RGB to 8-bit luma with `0.299 R + 0.587 G + 0.114 B`.
pub fn to_gray(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000;
        Luma([luma as u8])
    })
}

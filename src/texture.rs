// Texture and image output. Fields are indexed [x][y], texels are y * width + x

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use image::{GrayImage, Luma};

use crate::error::Result;
use crate::field::Field2;

/// Maps a noise sample from `[-1, 1]` to `[0, 1]`, clamping outliers.
#[inline]
pub fn to_unit(v: f64) -> f64 {
    (v * 0.5 + 0.5).clamp(0.0, 1.0)
}

#[inline]
pub fn to_u8(v: f64) -> u8 {
    (to_unit(v) * 255.0) as u8
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub fn gray(v: f64) -> Self {
        let level = to_u8(v);
        Self {
            r: level,
            g: level,
            b: level,
            a: 255,
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Raw bytes of a texel buffer, ready for upload.
pub fn texture_bytes<T: Pod>(texels: &[T]) -> &[u8] {
    bytemuck::cast_slice(texels)
}

impl Field2 {
    pub fn width(&self) -> usize {
        self.shape()[0]
    }

    pub fn height(&self) -> usize {
        self.shape()[1]
    }

    fn texels<T>(&self, map: impl Fn(f64) -> T) -> Vec<T> {
        let (width, height) = (self.width(), self.height());
        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                out.push(map(self[[x, y]]));
            }
        }
        out
    }

    /// Single channel float texture with values in `[0, 1]`.
    pub fn to_texture_data(&self) -> Vec<f32> {
        self.texels(|v| to_unit(v) as f32)
    }

    pub fn to_rgba(&self) -> Vec<Rgba8> {
        self.texels(Rgba8::gray)
    }

    pub fn to_luma_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            Luma([to_u8(self[[x as usize, y as usize]])])
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_luma_image().save(path)?;
        Ok(())
    }
}

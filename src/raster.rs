//! CPU raster drawing surface.
//!
//! [`RasterSurface`] paints into an in-memory RGBA image, for native hosts,
//! snapshots and tests. Discs are anti-aliased with 4×4 supersampling and
//! composited source-over in straight alpha, the same way a 2D canvas
//! composites semi-transparent fills.

use crate::surface::{DrawingSurface, Rgba};
use glam::Vec2;
use image::RgbaImage;
use std::path::Path;

/// Sub-samples per pixel axis for coverage estimation.
const SUBSAMPLES: u32 = 4;

/// Drawing surface backed by an [`RgbaImage`].
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    /// Create a transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The backing image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// RGBA bytes of one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width() && y < self.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    /// Write the current frame as a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
    }

    /// Fraction of pixel `(x, y)` covered by the disc.
    fn coverage(x: u32, y: u32, center: Vec2, radius_sq: f32) -> f32 {
        let step = 1.0 / SUBSAMPLES as f32;
        let mut inside = 0;
        for sy in 0..SUBSAMPLES {
            for sx in 0..SUBSAMPLES {
                let sample = Vec2::new(
                    x as f32 + (sx as f32 + 0.5) * step,
                    y as f32 + (sy as f32 + 0.5) * step,
                );
                if sample.distance_squared(center) <= radius_sq {
                    inside += 1;
                }
            }
        }
        inside as f32 / (SUBSAMPLES * SUBSAMPLES) as f32
    }
}

/// Source-over composite of `color` at `alpha` onto `dst`, straight alpha.
fn blend(dst: &mut [u8; 4], color: Rgba, alpha: f32) {
    let sa = alpha.clamp(0.0, 1.0);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = [0, 0, 0, 0];
        return;
    }

    let mix = |s: u8, d: u8| {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    *dst = [
        mix(color.r, dst[0]),
        mix(color.g, dst[1]),
        mix(color.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ];
}

impl DrawingSurface for RasterSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            p.0 = [0, 0, 0, 0];
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(center.is_finite() && radius.is_finite()) || radius <= 0.0 || color.a <= 0.0 {
            return;
        }
        let (w, h) = (self.width() as f32, self.height() as f32);

        let x0 = (center.x - radius).floor().clamp(0.0, w) as u32;
        let x1 = (center.x + radius).ceil().clamp(0.0, w) as u32;
        let y0 = (center.y - radius).floor().clamp(0.0, h) as u32;
        let y1 = (center.y + radius).ceil().clamp(0.0, h) as u32;
        let radius_sq = radius * radius;

        for y in y0..y1 {
            for x in x0..x1 {
                let cover = Self::coverage(x, y, center, radius_sq);
                if cover > 0.0 {
                    let pixel = self.image.get_pixel_mut(x, y);
                    blend(&mut pixel.0, color, color.a * cover);
                }
            }
        }
    }
}

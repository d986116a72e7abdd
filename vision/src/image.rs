//! Image primitives.
//!
//! The scanner works on a lightweight owned RGB buffer (`OwnedImage`) plus a
//! borrowed view type (`Image<'a>`) for ROI sampling, so repeated region reads
//! never copy pixels.

use anyhow::{Context, Result};

/// A single RGB pixel (no alpha).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hue (degrees, [0, 360)), saturation and value, each in [0, 1] for the
    /// latter two. Achromatic pixels report hue 0 with saturation 0.
    pub fn hsv(&self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta <= f32::EPSILON {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let hue = hue.rem_euclid(360.0);

        let sat = if max <= f32::EPSILON { 0.0 } else { delta / max };

        (hue, sat, max)
    }
}

/// Owned RGB image.
#[derive(Clone, Debug)]
pub struct OwnedImage {
    width: u32,
    height: u32,
    data: Vec<Rgb>,
}

impl OwnedImage {
    /// Build an `OwnedImage` from tightly packed RGBA bytes (alpha discarded).
    pub fn from_rgba(width: u32, bytes: &[u8]) -> Self {
        let height = if width == 0 {
            0
        } else {
            (bytes.len() / 4) as u32 / width
        };
        let data = bytes
            .chunks_exact(4)
            .take((width * height) as usize)
            .map(|v| Rgb::new(v[0], v[1], v[2]))
            .collect::<Vec<_>>();

        Self {
            width,
            height,
            data,
        }
    }

    /// Decode a PNG (or any format the `image` crate recognizes) into RGB.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .context("decode image")?
            .to_rgb8();
        let (width, height) = img.dimensions();
        let data = img
            .pixels()
            .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
            .collect();

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_bytes(&bytes).with_context(|| format!("decode {}", path.display()))
    }

    /// Uniform single-color image. Stand-in buffer for collaborators that only
    /// care that *a* frame exists (e.g. a text-fixture OCR engine).
    pub fn solid(width: u32, height: u32, fill: Rgb) -> Self {
        Self {
            width,
            height,
            data: vec![fill; (width * height) as usize],
        }
    }

    /// Borrowed view of the entire image.
    pub fn as_image(&self) -> Image<'_> {
        Image {
            x1: 0,
            y1: 0,
            x2: self.width,
            y2: self.height,
            true_width: self.width,
            data: &self.data,
        }
    }
}

/// Borrowed view into an [`OwnedImage`].
#[derive(Clone, Copy)]
pub struct Image<'a> {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
    true_width: u32,
    data: &'a [Rgb],
}

impl<'a> Image<'a> {
    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    #[inline(always)]
    fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.data[(x + y * self.true_width) as usize]
    }

    /// Subview with coordinates relative to this view; clamped to its bounds.
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let x = x.min(self.width());
        let y = y.min(self.height());
        let width = width.min(self.width() - x);
        let height = height.min(self.height() - y);

        Self {
            x1: self.x1 + x,
            y1: self.y1 + y,
            x2: self.x1 + x + width,
            y2: self.y1 + y + height,
            true_width: self.true_width,
            data: self.data,
        }
    }

    /// Row-major iteration over the view's pixels.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + 'a {
        let Self {
            x1,
            y1,
            x2,
            y2,
            true_width,
            data,
        } = *self;
        (y1..y2).flat_map(move |y| (x1..x2).map(move |x| data[(x + y * true_width) as usize]))
    }

    pub fn average_color(&self) -> Rgb {
        let count = (self.width() as u64) * (self.height() as u64);
        if count == 0 {
            return Rgb::default();
        }

        let mut r = 0u64;
        let mut g = 0u64;
        let mut b = 0u64;
        for y in self.y1..self.y2 {
            for x in self.x1..self.x2 {
                let clr = self.pixel(x, y);
                r += clr.r as u64;
                g += clr.g as u64;
                b += clr.b as u64;
            }
        }

        Rgb {
            r: (r / count) as u8,
            g: (g / count) as u8,
            b: (b / count) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_roundtrip_drops_alpha() {
        let img = OwnedImage::from_rgba(2, &[1, 2, 3, 255, 4, 5, 6, 0]);
        let view = img.as_image();
        assert_eq!(view.width(), 2);
        assert_eq!(view.height(), 1);
        assert_eq!(view.pixels().collect::<Vec<_>>(), vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]);
    }

    #[test]
    fn sub_image_is_clamped() {
        let img = OwnedImage::solid(4, 4, Rgb::new(9, 9, 9));
        let sub = img.as_image().sub_image(3, 3, 10, 10);
        assert_eq!(sub.width(), 1);
        assert_eq!(sub.height(), 1);
    }

    #[test]
    fn hsv_primaries() {
        let (h, s, v) = Rgb::new(255, 0, 0).hsv();
        assert!(h.abs() < 0.5 && s > 0.99 && v > 0.99);

        let (h, _, _) = Rgb::new(0, 255, 0).hsv();
        assert!((h - 120.0).abs() < 0.5);

        let (h, _, _) = Rgb::new(0, 0, 255).hsv();
        assert!((h - 240.0).abs() < 0.5);

        let (_, s, _) = Rgb::new(128, 128, 128).hsv();
        assert_eq!(s, 0.0);
    }

    #[test]
    fn average_of_uniform_view() {
        let img = OwnedImage::solid(3, 3, Rgb::new(10, 20, 30));
        assert_eq!(img.as_image().average_color(), Rgb::new(10, 20, 30));
    }
}

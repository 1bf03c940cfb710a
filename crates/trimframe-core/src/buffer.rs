//! Decoded pixel buffers and per-pixel channel access.
//!
//! A [`PixelBuffer`] is the input to every analysis in this crate. It is
//! produced by an external decoder (or by [`PixelBuffer::from_dynamic_image`])
//! and never mutated afterwards.
//!
//! # Layouts
//!
//! - `Rgb`: 3 bytes per pixel
//! - `Rgba`: 4 bytes per pixel, straight (non-premultiplied) alpha
//! - `Indexed`: 1 byte per pixel, an index into an RGBA palette

use image::{DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// RGBA color table for indexed buffers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub entries: Vec<[u8; 4]>,
}

impl Palette {
    pub fn new(entries: Vec<[u8; 4]>) -> Self {
        Self { entries }
    }

    /// Build an opaque palette from RGB triples.
    pub fn from_rgb(entries: &[[u8; 3]]) -> Self {
        Self {
            entries: entries.iter().map(|&[r, g, b]| [r, g, b, 255]).collect(),
        }
    }

    /// Build a palette from packed RGBA bytes, 4 per entry.
    ///
    /// # Errors
    /// `InvalidPalette` if the length is not a multiple of 4.
    pub fn from_rgba_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(EngineError::InvalidPalette { len: bytes.len() });
        }
        Ok(Self {
            entries: bytes.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]]).collect(),
        })
    }

    #[inline]
    pub fn get(&self, index: u8) -> Option<[u8; 4]> {
        self.entries.get(index as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Memory layout of the pixels in a [`PixelBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelLayout {
    Rgb,
    Rgba,
    Indexed(Palette),
}

impl PixelLayout {
    /// Bytes per pixel.
    pub fn channels(&self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
            PixelLayout::Indexed(_) => 1,
        }
    }

    /// Whether the layout stores a per-pixel alpha value directly.
    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelLayout::Rgba)
    }
}

/// An immutable, validated pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer, checking that `data` matches the dimensions and layout.
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(layout.channels()))
            .ok_or(EngineError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(EngineError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    pub fn rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, PixelLayout::Rgb, data)
    }

    pub fn rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, PixelLayout::Rgba, data)
    }

    pub fn indexed(width: u32, height: u32, palette: Palette, indices: Vec<u8>) -> Result<Self> {
        Self::new(width, height, PixelLayout::Indexed(palette), indices)
    }

    /// Convert a decoded `image` crate image.
    ///
    /// Images with an alpha channel become `Rgba`, everything else `Rgb`.
    /// High bit depth channels are reduced to 8 bits by the `image` crate.
    pub fn from_dynamic_image(img: &DynamicImage) -> Result<Self> {
        if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            Self::rgba(width, height, rgba.into_raw())
        } else {
            let rgb = img.to_rgb8();
            let (width, height) = rgb.dimensions();
            Self::rgb(width, height, rgb.into_raw())
        }
    }

    /// Copy the pixels into an `image::RgbaImage` for use with `imageops`.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| Rgba(self.rgba_at(x, y)))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> &PixelLayout {
        &self.layout
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn has_alpha(&self) -> bool {
        self.layout.has_alpha()
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.layout, PixelLayout::Indexed(_))
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        // Construction guarantees data.len() == width * height * channels
        self.data.len() / self.channels()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels()
    }

    /// RGB value of the pixel at `(x, y)`.
    ///
    /// Indexed pixels are looked up in the palette. An index with no palette
    /// entry is read as a gray level equal to the index.
    #[inline]
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        match &self.layout {
            PixelLayout::Rgb | PixelLayout::Rgba => [self.data[i], self.data[i + 1], self.data[i + 2]],
            PixelLayout::Indexed(palette) => {
                let index = self.data[i];
                match palette.get(index) {
                    Some([r, g, b, _]) => [r, g, b],
                    None => [index, index, index],
                }
            }
        }
    }

    /// Alpha value of the pixel at `(x, y)`. Opaque layouts return 255.
    #[inline]
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        match &self.layout {
            PixelLayout::Rgb => 255,
            PixelLayout::Rgba => self.data[self.offset(x, y) + 3],
            PixelLayout::Indexed(palette) => {
                palette.get(self.data[self.offset(x, y)]).map_or(255, |c| c[3])
            }
        }
    }

    #[inline]
    pub fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        let [r, g, b] = self.rgb_at(x, y);
        [r, g, b, self.alpha_at(x, y)]
    }

    /// Expand an indexed buffer to full RGBA through its palette.
    ///
    /// Fails with `PaletteExpansion` on the first index that has no palette
    /// entry. Non-indexed buffers are returned as a copy.
    pub fn expand_indexed(&self) -> Result<PixelBuffer> {
        let palette = match &self.layout {
            PixelLayout::Indexed(palette) => palette,
            _ => return Ok(self.clone()),
        };

        let capacity = self.pixel_count().checked_mul(4).ok_or(EngineError::InvalidDimensions {
            width: self.width,
            height: self.height,
        })?;
        let mut expanded = Vec::with_capacity(capacity);
        for &index in &self.data {
            let color = palette.get(index).ok_or(EngineError::PaletteExpansion {
                index,
                palette_len: palette.len(),
            })?;
            expanded.extend_from_slice(&color);
        }

        PixelBuffer::rgba(self.width, self.height, expanded)
    }
}

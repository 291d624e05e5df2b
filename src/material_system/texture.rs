use super::color::{Color, rgb8_to_color};
use crate::error::{RasterError, RasterResult};
use image::RgbaImage;
use log::{info, warn};
use std::path::Path;

/// How texel indices outside the image are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextureAddressing {
    /// Indices are clamped to the edge texel.
    #[default]
    Clamp,
    /// Indices wrap around, tiling the image.
    Repeat,
}

impl TextureAddressing {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clamp" => Some(Self::Clamp),
            "repeat" | "wrap" => Some(Self::Repeat),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Repeat => "repeat",
        }
    }

    #[inline]
    fn resolve(&self, index: i64, size: usize) -> usize {
        let size = size as i64;
        match self {
            Self::Clamp => index.clamp(0, size - 1) as usize,
            Self::Repeat => index.rem_euclid(size) as usize,
        }
    }
}

/// A decoded image: `height` rows of `pitch` bytes, `bytes_per_pixel`
/// bytes per texel with R, G, B in the first three.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pitch: usize,
    pub bytes_per_pixel: usize,
    pub pixels: Vec<u8>,
}

impl Texture {
    pub fn from_raw(
        width: usize,
        height: usize,
        pitch: usize,
        bytes_per_pixel: usize,
        pixels: Vec<u8>,
    ) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidTexture(format!(
                "empty texture {}x{}",
                width, height
            )));
        }
        if bytes_per_pixel < 3 {
            return Err(RasterError::InvalidTexture(format!(
                "{} bytes per pixel cannot hold RGB",
                bytes_per_pixel
            )));
        }
        if pitch < width * bytes_per_pixel {
            return Err(RasterError::InvalidTexture(format!(
                "pitch {} is shorter than a row of {} bytes",
                pitch,
                width * bytes_per_pixel
            )));
        }
        if pixels.len() < pitch * height {
            return Err(RasterError::InvalidTexture(format!(
                "{} bytes supplied, {} required",
                pixels.len(),
                pitch * height
            )));
        }

        Ok(Self {
            width,
            height,
            pitch,
            bytes_per_pixel,
            pixels,
        })
    }

    pub fn from_rgba_image(image: &RgbaImage) -> RasterResult<Self> {
        let (width, height) = image.dimensions();
        let (width, height) = (width as usize, height as usize);
        Self::from_raw(width, height, width * 4, 4, image.as_raw().clone())
    }

    /// Decodes an image file. Decoding lives here, outside the rasterizer.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|e| {
            warn!("Failed to load texture {:?}: {}", path_ref, e);
            format!("failed to load texture '{}': {}", path_ref.display(), e)
        })?;

        let rgba = img.into_rgba8();
        let texture = Self::from_rgba_image(&rgba).map_err(|e| e.to_string())?;
        info!(
            "Loaded texture {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );
        Ok(texture)
    }

    /// Nearest-neighbor lookup at normalized `(u, v)`.
    ///
    /// The texel is `(floor(u * width), floor(v * height))` with no V flip;
    /// `addressing` decides what happens outside [0, 1).
    pub fn sample(&self, u: f32, v: f32, addressing: TextureAddressing) -> Color {
        let tex_x = addressing.resolve(Self::texel_index(u, self.width), self.width);
        let tex_y = addressing.resolve(Self::texel_index(v, self.height), self.height);

        let idx = tex_y * self.pitch + tex_x * self.bytes_per_pixel;
        rgb8_to_color(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2])
    }

    #[inline]
    fn texel_index(coord: f32, size: usize) -> i64 {
        let scaled = (coord * size as f32).floor();
        // NaN and infinities collapse onto the range ends.
        if scaled.is_nan() {
            0
        } else {
            scaled.clamp(i32::MIN as f32, i32::MAX as f32) as i64
        }
    }
}

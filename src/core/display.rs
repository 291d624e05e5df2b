use super::frame_buffer::{CHANNELS, FrameBuffer};
use crate::error::{RasterError, RasterResult};
use image::RgbaImage;

/// A presentation surface that accepts the finished frame.
///
/// The rasterizer hands over its raw 4-byte pixels; how they reach a
/// screen or a file is up to the implementor.
pub trait DisplayTarget {
    fn present(&mut self, frame: &FrameBuffer) -> RasterResult<()>;
}

impl DisplayTarget for RgbaImage {
    /// Copies R, G, B and forces alpha opaque; the reserved byte carries
    /// no coverage information.
    fn present(&mut self, frame: &FrameBuffer) -> RasterResult<()> {
        let found = (self.width() as usize, self.height() as usize);
        if found != (frame.width, frame.height) {
            return Err(RasterError::DisplaySizeMismatch {
                expected: (frame.width, frame.height),
                found,
            });
        }

        let row_bytes = frame.width * CHANNELS;
        for (dst, src) in self
            .chunks_exact_mut(row_bytes)
            .zip(frame.as_bytes().chunks(frame.pitch))
        {
            for (d, s) in dst
                .chunks_exact_mut(CHANNELS)
                .zip(src[..row_bytes].chunks_exact(CHANNELS))
            {
                d[..3].copy_from_slice(&s[..3]);
                d[3] = 255;
            }
        }
        Ok(())
    }
}

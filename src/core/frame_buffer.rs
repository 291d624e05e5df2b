use crate::error::{RasterError, RasterResult};
use rayon::prelude::*;

/// Bytes per framebuffer pixel: R, G, B and one reserved byte.
pub const CHANNELS: usize = 4;

/// Depth value meaning "nothing drawn yet".
pub const DEPTH_FAR: u8 = 255;

/// Allocates a `bytes`-long buffer filled with `fill`, reporting failure
/// instead of aborting.
fn allocate(bytes: usize, fill: u8) -> RasterResult<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(bytes)
        .map_err(|_| RasterError::Allocation { bytes })?;
    data.resize(bytes, fill);
    Ok(data)
}

/// Output image: `height` rows of `pitch` bytes, 4 bytes per pixel.
/// `pitch` may exceed `width * 4`; the padding is cleared but never drawn.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pitch: usize,
    data: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, pitch: Option<usize>) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let row_bytes = width
            .checked_mul(CHANNELS)
            .ok_or(RasterError::InvalidDimensions { width, height })?;
        let pitch = pitch.unwrap_or(row_bytes);
        if pitch < row_bytes {
            return Err(RasterError::InvalidPitch { pitch, row_bytes });
        }
        let bytes = pitch
            .checked_mul(height)
            .ok_or(RasterError::InvalidDimensions { width, height })?;

        Ok(Self {
            width,
            height,
            pitch,
            data: allocate(bytes, 0)?,
        })
    }

    /// Zeroes every byte, padding included.
    pub fn clear(&mut self) {
        self.data
            .par_chunks_mut(self.pitch)
            .for_each(|row| row.fill(0));
    }

    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        y * self.pitch + x * CHANNELS
    }

    /// Writes R, G, B; the fourth byte is left as it is.
    #[inline]
    pub fn write_rgb(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let offset = self.offset(x, y);
        self.data[offset..offset + 3].copy_from_slice(&rgb);
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; CHANNELS] {
        let offset = self.offset(x, y);
        let mut out = [0u8; CHANNELS];
        out.copy_from_slice(&self.data[offset..offset + CHANNELS]);
        out
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, u8> {
        self.data.chunks_mut(self.pitch)
    }
}

/// One byte of depth per pixel; smaller is nearer.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> RasterResult<Self> {
        let bytes = width
            .checked_mul(height)
            .ok_or(RasterError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            data: allocate(bytes, DEPTH_FAR)?,
        })
    }

    pub fn clear(&mut self) {
        self.data.fill(DEPTH_FAR);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Strict less-than test; on success the stored depth is replaced.
    #[inline]
    pub fn test_and_set(&mut self, x: usize, y: usize, depth: u8) -> bool {
        depth_test(&mut self.data[y * self.width + x], depth)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, u8> {
        self.data.chunks_mut(self.width)
    }
}

/// Less-than depth test on one cell. Ties keep the first fragment.
#[inline]
pub(crate) fn depth_test(stored: &mut u8, depth: u8) -> bool {
    if depth < *stored {
        *stored = depth;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_buffer_layout_respects_pitch() {
        let mut fb = FrameBuffer::new(3, 2, Some(16)).unwrap();
        assert_eq!(fb.as_bytes().len(), 32);
        assert_eq!(fb.offset(2, 1), 16 + 8);

        fb.write_rgb(2, 1, [1, 2, 3]);
        assert_eq!(fb.pixel(2, 1), [1, 2, 3, 0]);
        assert_eq!(&fb.as_bytes()[24..28], &[1, 2, 3, 0]);
    }

    #[test]
    fn clear_zeroes_padding_too() {
        let mut fb = FrameBuffer::new(2, 2, Some(12)).unwrap();
        for row in fb.rows_mut() {
            row.fill(9);
        }
        fb.clear();
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn invalid_sizes_are_rejected() {
        assert_eq!(
            FrameBuffer::new(0, 10, None).unwrap_err(),
            RasterError::InvalidDimensions {
                width: 0,
                height: 10
            }
        );
        assert_eq!(
            FrameBuffer::new(4, 4, Some(15)).unwrap_err(),
            RasterError::InvalidPitch {
                pitch: 15,
                row_bytes: 16
            }
        );
        assert!(FrameBuffer::new(usize::MAX, 2, None).is_err());
    }

    #[test]
    fn depth_test_is_strict() {
        let mut depth = DepthBuffer::new(2, 2).unwrap();
        assert_eq!(depth.get(1, 1), DEPTH_FAR);
        assert!(!depth.test_and_set(1, 1, DEPTH_FAR));
        assert!(depth.test_and_set(1, 1, 100));
        assert!(!depth.test_and_set(1, 1, 100));
        assert!(!depth.test_and_set(1, 1, 101));
        assert!(depth.test_and_set(1, 1, 99));
        assert_eq!(depth.get(1, 1), 99);

        depth.clear();
        assert!(depth.as_slice().iter().all(|&d| d == DEPTH_FAR));
    }
}

use std::fmt;

/// Errors raised by the rasterizer core.
///
/// Allocation and dimension failures are fatal for a frame; the binary turns
/// them into a non-zero exit. Index and texture errors are rejected caller
/// input, reported before anything is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    InvalidDimensions { width: usize, height: usize },
    InvalidPitch { pitch: usize, row_bytes: usize },
    Allocation { bytes: usize },
    InvalidTexture(String),
    IndexCount(usize),
    IndexOutOfRange { index: usize, vertex_count: usize },
    DisplaySizeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::InvalidDimensions { width, height } => {
                write!(f, "invalid target size {}x{}", width, height)
            }
            RasterError::InvalidPitch { pitch, row_bytes } => write!(
                f,
                "row pitch {} is smaller than one row of pixels ({} bytes)",
                pitch, row_bytes
            ),
            RasterError::Allocation { bytes } => {
                write!(f, "failed to allocate {} bytes for the target image", bytes)
            }
            RasterError::InvalidTexture(reason) => write!(f, "invalid texture: {}", reason),
            RasterError::IndexCount(count) => {
                write!(f, "{} indices is not a whole number of triangles", count)
            }
            RasterError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "index {} is out of range for {} vertices",
                index, vertex_count
            ),
            RasterError::DisplaySizeMismatch { expected, found } => write!(
                f,
                "display target is {}x{}, rasterizer output is {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
        }
    }
}

impl std::error::Error for RasterError {}

pub type RasterResult<T> = Result<T, RasterError>;

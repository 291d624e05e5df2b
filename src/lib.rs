//! Software triangle rasterizer: edge-function coverage, barycentric
//! interpolation of color and texture coordinates, and a one-byte depth
//! buffer, drawing into a pitched 4-byte-per-pixel image.

pub mod core;
pub mod error;
pub mod geometry;
pub mod io;
pub mod material_system;
pub mod utils;

pub use crate::core::display::DisplayTarget;
pub use crate::core::frame_buffer::{DepthBuffer, FrameBuffer};
pub use crate::core::rasterizer::{Frame, Rasterizer, RasterizerOptions};
pub use error::{RasterError, RasterResult};
pub use geometry::{Mat4, Triangle, Vec2, Vec3, Vec4, Vertex};
pub use material_system::{Color, Texture, TextureAddressing};

// material_system/mod.rs
// Colors and textures consumed by the rasterizer
pub mod color;
pub mod texture;

pub use color::Color;
pub use texture::{Texture, TextureAddressing};

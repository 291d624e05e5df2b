// geometry/mod.rs
// Vector math, triangles and transforms
pub mod math;
pub mod transform;
pub mod triangle;

pub use math::{Mat4, Vec2, Vec3, Vec4};
pub use triangle::{Triangle, Vertex};

//! Software rasterizer
//!
//! Features:
//! - Bresenham lines (wireframe)
//! - Barycentric triangle fill with a z-buffer
//! - Flat shading from face normals, one directional light
//! - Affine texture mapping (no perspective correction)

mod math;
mod types;
mod render;
mod pipeline;

pub use math::*;
pub use types::*;
pub use render::*;
pub use pipeline::*;

/// Default output dimensions
pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 800;

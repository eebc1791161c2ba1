//! softrender: a minimal software rasterizer
//!
//! Turns Wavefront OBJ meshes into images without any GPU API:
//! - Bresenham wireframes
//! - Barycentric triangle fill with a z-buffer
//! - Flat shading from face normals
//! - Affine texture mapping

pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod rasterizer;

pub use error::RenderError;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

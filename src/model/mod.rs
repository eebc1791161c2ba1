//! Mesh module - polygon meshes as the pipeline consumes them
//!
//! - Flat position/texcoord arrays, faces index into them per corner
//! - Faces may have any number of corners; they are fanned from corner 0
//! - Wavefront OBJ loading in `obj`

mod obj;

pub use obj::*;

use crate::error::RenderError;
use crate::rasterizer::{Vec2, Vec3};

/// One face corner: index into positions and (optionally) texcoords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub position: usize,
    pub texcoord: Option<usize>,
}

impl Corner {
    pub fn new(position: usize) -> Self {
        Self { position, texcoord: None }
    }

    pub fn textured(position: usize, texcoord: usize) -> Self {
        Self {
            position,
            texcoord: Some(texcoord),
        }
    }
}

/// A polygon face with three or more corners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub corners: Vec<Corner>,
}

impl Face {
    pub fn new(corners: Vec<Corner>) -> Self {
        Self { corners }
    }

    /// Untextured face from position indices
    pub fn from_positions(indices: &[usize]) -> Self {
        Self {
            corners: indices.iter().map(|&i| Corner::new(i)).collect(),
        }
    }

    /// Fan triangulation: every triangle shares corner 0.
    /// A face with n corners yields n - 2 triangles (none below 3 corners).
    pub fn triangles(&self) -> impl Iterator<Item = [Corner; 3]> + '_ {
        let c = &self.corners;
        (1..c.len().saturating_sub(1)).map(move |i| [c[0], c[i], c[i + 1]])
    }

    /// Consecutive corner pairs, closing back to the first corner
    pub fn edges(&self) -> impl Iterator<Item = (Corner, Corner)> + '_ {
        let c = &self.corners;
        (0..c.len()).map(move |i| (c[i], c[(i + 1) % c.len()]))
    }

    pub fn is_textured(&self) -> bool {
        self.corners.iter().all(|c| c.texcoord.is_some())
    }
}

/// Loaded mesh: read-only input to the renderer
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// x, y, z per vertex
    pub positions: Vec<f32>,
    /// u, v per texture coordinate (empty when untextured)
    pub texcoords: Vec<f32>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new(positions: Vec<f32>, texcoords: Vec<f32>, faces: Vec<Face>) -> Self {
        Self { positions, texcoords, faces }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len() / 2
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Triangles after fan triangulation
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.corners.len().saturating_sub(2)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let p = &self.positions[index * 3..index * 3 + 3];
        Vec3::new(p[0], p[1], p[2])
    }

    pub fn texcoord(&self, index: usize) -> Vec2 {
        let t = &self.texcoords[index * 2..index * 2 + 2];
        Vec2::new(t[0], t[1])
    }

    /// True when there are texcoords and every corner references one
    pub fn is_textured(&self) -> bool {
        !self.texcoords.is_empty() && self.faces.iter().all(Face::is_textured)
    }

    /// Check array shapes and that every corner index is in range
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.positions.len() % 3 != 0 {
            return Err(RenderError::InvalidMesh(format!(
                "position array length {} is not a multiple of 3",
                self.positions.len()
            )));
        }
        if self.texcoords.len() % 2 != 0 {
            return Err(RenderError::InvalidMesh(format!(
                "texcoord array length {} is not a multiple of 2",
                self.texcoords.len()
            )));
        }

        let vertices = self.vertex_count();
        let texcoords = self.texcoord_count();
        for (i, face) in self.faces.iter().enumerate() {
            if face.corners.len() < 3 {
                return Err(RenderError::InvalidMesh(format!(
                    "face {} has {} corners",
                    i,
                    face.corners.len()
                )));
            }
            for corner in &face.corners {
                if corner.position >= vertices {
                    return Err(RenderError::InvalidMesh(format!(
                        "face {} references vertex {} of {}",
                        i, corner.position, vertices
                    )));
                }
                if let Some(t) = corner.texcoord {
                    if t >= texcoords {
                        return Err(RenderError::InvalidMesh(format!(
                            "face {} references texcoord {} of {}",
                            i, t, texcoords
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Axis-aligned bounds of all positions
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.vertex_count() == 0 {
            return (Vec3::ZERO, Vec3::ZERO);
        }

        let mut min = self.position(0);
        let mut max = min;
        for i in 1..self.vertex_count() {
            let p = self.position(i);
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        (min, max)
    }

    /// Rotate all positions about the Y axis, then the X axis (radians)
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        let (sy, cy) = yaw.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        for p in self.positions.chunks_exact_mut(3) {
            let (x, y, z) = (p[0], p[1], p[2]);
            let (x, z) = (x * cy + z * sy, -x * sy + z * cy);
            let (y, z) = (y * cp - z * sp, y * sp + z * cp);
            p.copy_from_slice(&[x, y, z]);
        }
    }

    /// Textured cube of the given half extent, one quad per side,
    /// corners counter-clockwise when seen from outside
    pub fn test_cube(half: f32) -> Self {
        let h = half;
        let positions = vec![
            -h, -h, -h, // 0
            h, -h, -h, // 1
            h, h, -h, // 2
            -h, h, -h, // 3
            -h, -h, h, // 4
            h, -h, h, // 5
            h, h, h, // 6
            -h, h, h, // 7
        ];
        let texcoords = vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];

        let sides: [[usize; 4]; 6] = [
            [4, 5, 6, 7], // Front (+Z)
            [1, 0, 3, 2], // Back (-Z)
            [3, 7, 6, 2], // Top (+Y)
            [0, 1, 5, 4], // Bottom (-Y)
            [5, 1, 2, 6], // Right (+X)
            [0, 4, 7, 3], // Left (-X)
        ];

        let faces = sides
            .iter()
            .map(|side| {
                Face::new(
                    side.iter()
                        .enumerate()
                        .map(|(t, &p)| Corner::textured(p, t))
                        .collect(),
                )
            })
            .collect();

        Self { positions, texcoords, faces }
    }
}

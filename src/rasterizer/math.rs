//! Vector math for 3D rendering

use std::ops::{Add, Index, Mul, Sub};
use serde::{Serialize, Deserialize};

/// Below this screen-space cross product magnitude a triangle counts as flat
const DEGENERATE_EPSILON: f32 = 1e-2;

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    /// Viewing and light direction; the camera looks down -Z
    pub const FORWARD: Vec3 = Vec3 { x: 0.0, y: 0.0, z: -1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector
    pub fn try_normalize(self) -> Option<Vec3> {
        let l = self.len();
        if l == 0.0 || !l.is_finite() {
            return None;
        }
        Some(Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        })
    }

    /// Like `try_normalize`, but a zero vector stays zero
    pub fn normalize(self) -> Vec3 {
        self.try_normalize().unwrap_or(Vec3::ZERO)
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index out of range: {}", i),
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// 2D Vector (for texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Index<usize> for Vec2 {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Vec2 index out of range: {}", i),
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

/// Integer screen point (line endpoints)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Truncate the x/y of a screen-space point to pixel coordinates
    pub fn from_screen(v: Vec3) -> Self {
        Self {
            x: v.x as i32,
            y: v.y as i32,
        }
    }
}

impl Index<usize> for Vec2i {
    type Output = i32;
    fn index(&self, i: usize) -> &i32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Vec2i index out of range: {}", i),
        }
    }
}

impl Add for Vec2i {
    type Output = Vec2i;
    fn add(self, other: Vec2i) -> Vec2i {
        Vec2i::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2i {
    type Output = Vec2i;
    fn sub(self, other: Vec2i) -> Vec2i {
        Vec2i::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<i32> for Vec2i {
    type Output = Vec2i;
    fn mul(self, s: i32) -> Vec2i {
        Vec2i::new(self.x * s, self.y * s)
    }
}

/// Orthographic projection of the [-1, 1] view volume onto the screen.
/// z passes through untouched and is only used for depth comparison.
pub fn project(v: Vec3, width: usize, height: usize) -> Vec3 {
    Vec3 {
        x: (v.x + 1.0) * width as f32 / 2.0,
        y: (v.y + 1.0) * height as f32 / 2.0,
        z: v.z,
    }
}

/// Barycentric weights of `p` with respect to the screen triangle `pts`.
///
/// Only x/y take part. The result is `(w0, w1, w2)` with `w0 + w1 + w2 = 1`,
/// where `wi` belongs to `pts[i]`. A degenerate triangle yields a weight
/// triple with a negative component so callers treat every point as outside.
pub fn barycentric(pts: [Vec3; 3], p: Vec3) -> Vec3 {
    let [a, b, c] = pts;
    let u = Vec3::new(b.x - a.x, c.x - a.x, a.x - p.x)
        .cross(Vec3::new(b.y - a.y, c.y - a.y, a.y - p.y));

    if u.z.abs() < DEGENERATE_EPSILON {
        return Vec3::new(-1.0, 1.0, 1.0); // Degenerate triangle
    }

    Vec3::new(1.0 - (u.x + u.y) / u.z, u.x / u.z, u.y / u.z)
}

/// Screen-space triangle with (near) zero area
pub fn is_degenerate(pts: [Vec3; 3]) -> bool {
    barycentric(pts, pts[0]).x < 0.0
}

/// True when every weight is non-negative (edges count as inside)
pub fn is_inside(bc: Vec3) -> bool {
    bc.x >= 0.0 && bc.y >= 0.0 && bc.z >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn tri() -> [Vec3; 3] {
        [
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(90.0, 10.0, 0.0),
            Vec3::new(50.0, 90.0, 0.0),
        ]
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_index_access() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!((v[0], v[1], v[2]), (1.0, 2.0, 3.0));
        let p = Vec2i::new(4, -5);
        assert_eq!((p[0], p[1]), (4, -5));
        let t = Vec2::new(0.25, 0.75);
        assert_eq!(t[1], 0.75);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(Vec2i::new(3, 4) + Vec2i::new(1, -1), Vec2i::new(4, 3));
        assert_eq!((Vec2i::new(3, 4) - Vec2i::new(1, 1)) * 2, Vec2i::new(4, 6));
        assert_eq!(Vec2::new(0.5, 1.0) * 2.0 - Vec2::new(1.0, 0.0), Vec2::new(0.0, 2.0));
        assert_eq!(Vec3::new(1.0, 2.0, 3.0) + Vec3::new(1.0, 1.0, 1.0) * 2.0, Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(Vec2i::from_screen(Vec3::new(12.9, 3.2, 0.7)), Vec2i::new(12, 3));
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let _ = v[3];
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vec3::ZERO.try_normalize(), None);
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let n = Vec3::new(3.0, 0.0, 4.0).try_normalize().unwrap();
        assert!((n.len() - 1.0).abs() < EPS);
        assert!((n.x - 0.6).abs() < EPS);
    }

    #[test]
    fn test_project_maps_unit_cube_to_screen() {
        let lo = project(Vec3::new(-1.0, -1.0, 0.3), 200, 100);
        let hi = project(Vec3::new(1.0, 1.0, -0.3), 200, 100);
        assert_eq!(lo, Vec3::new(0.0, 0.0, 0.3));
        assert_eq!(hi, Vec3::new(200.0, 100.0, -0.3));
    }

    #[test]
    fn test_barycentric_at_vertices_is_unit_basis() {
        let pts = tri();
        let expected = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        for (p, e) in pts.iter().zip(expected.iter()) {
            let bc = barycentric(pts, *p);
            assert!((bc - *e).len() < EPS, "{:?} vs {:?}", bc, e);
        }
    }

    #[test]
    fn test_barycentric_inside() {
        let pts = tri();
        for p in [Vec3::new(50.0, 40.0, 0.0), Vec3::new(30.0, 15.0, 0.0), Vec3::new(60.0, 60.0, 0.0)] {
            let bc = barycentric(pts, p);
            assert!(bc.x > 0.0 && bc.y > 0.0 && bc.z > 0.0);
            assert!((bc.x + bc.y + bc.z - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_barycentric_reconstructs_point() {
        let pts = tri();
        let p = Vec3::new(47.0, 33.0, 0.0);
        let bc = barycentric(pts, p);
        let x = bc.x * pts[0].x + bc.y * pts[1].x + bc.z * pts[2].x;
        let y = bc.x * pts[0].y + bc.y * pts[1].y + bc.z * pts[2].y;
        assert!((x - p.x).abs() < 1e-3 && (y - p.y).abs() < 1e-3);
    }

    #[test]
    fn test_barycentric_outside() {
        let bc = barycentric(tri(), Vec3::new(5.0, 50.0, 0.0));
        assert!(!is_inside(bc));
    }

    #[test]
    fn test_barycentric_degenerate_is_outside() {
        let flat = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(5.0, 5.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
        ];
        let bc = barycentric(flat, Vec3::new(5.0, 5.0, 0.0));
        assert!(!is_inside(bc));
    }
}

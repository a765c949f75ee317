//! Mesh generation from the cave grid
//!
//! The grid is triangulated with marching squares into a floor mesh, the
//! floor's boundary loops are traced into outlines, and each outline is
//! extruded downward into wall geometry.

pub mod marching;
pub mod outline;
pub mod squares;
pub mod walls;

pub use marching::{FloorMesh, MeshGenerator};
pub use outline::{calculate_outlines, Outline, Triangle};
pub use squares::{ControlNode, Node, NodeKind, NodeRef, Square, SquareGrid};
pub use walls::build_wall_mesh;

use bytemuck::{Pod, Zeroable};
use std::ops::{Add, Mul, Sub};

/// 3D position or direction. `y` is up.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalize_or_zero(self) -> Vec3 {
        let len = self.length();
        if len > f32::EPSILON {
            self * (1.0 / len)
        } else {
            Vec3::ZERO
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Indexed triangle mesh handed to the renderer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    /// Three indices per triangle
    pub triangles: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Per-vertex normals from summed face normals.
    ///
    /// Vertices no triangle references get a zero normal.
    pub fn compute_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.triangles.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            for idx in [a, b, c] {
                normals[idx] = normals[idx] + face;
            }
        }

        normals.into_iter().map(Vec3::normalize_or_zero).collect()
    }

    /// Vertex positions as raw bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Triangle indices as raw bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product() {
        assert_eq!(Vec3::RIGHT.cross(Vec3::UP), Vec3::FORWARD);
        assert_eq!(Vec3::FORWARD.cross(Vec3::RIGHT), Vec3::UP);
    }

    #[test]
    fn test_normals_average_faces() {
        // Clockwise from above, which faces +y
        let mesh = Mesh {
            vertices: vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(5.0, 5.0, 5.0),
            ],
            triangles: vec![0, 1, 2],
        };
        let normals = mesh.compute_normals();
        assert_eq!(normals[0], Vec3::UP);
        assert_eq!(normals[2], Vec3::UP);
        assert_eq!(normals[3], Vec3::ZERO);
    }

    #[test]
    fn test_byte_views() {
        let mesh = Mesh {
            vertices: vec![Vec3::ZERO; 4],
            triangles: vec![0, 1, 2, 2, 3, 0],
        };
        assert_eq!(mesh.vertex_bytes().len(), 4 * 12);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
        assert_eq!(mesh.triangle_count(), 2);
    }
}

//! Wall extrusion
//!
//! Every outline edge becomes a vertical quad hanging below the floor.

use crate::mesh::outline::Outline;
use crate::mesh::{Mesh, Vec3};

/// Build the wall strip for every outline.
///
/// Each edge `(a, b)` emits four fresh vertices `[a, b, a - up*h, b - up*h]`
/// and two triangles `(0, 2, 3)` and `(3, 1, 0)` relative to the first.
/// A zero height produces degenerate quads.
pub fn build_wall_mesh(floor_vertices: &[Vec3], outlines: &[Outline], wall_height: f32) -> Mesh {
    let drop = Vec3::UP * wall_height;
    let quads: usize = outlines.iter().map(|o| o.len().saturating_sub(1)).sum();

    let mut mesh = Mesh {
        vertices: Vec::with_capacity(quads * 4),
        triangles: Vec::with_capacity(quads * 6),
    };

    for outline in outlines {
        for (a, b) in outline.edges() {
            let (left, right) = (floor_vertices[a], floor_vertices[b]);
            let start = mesh.vertices.len() as u32;

            mesh.vertices.extend([left, right, left - drop, right - drop]);
            mesh.triangles.extend([start, start + 2, start + 3, start + 3, start + 1, start]);
        }
    }

    mesh
}

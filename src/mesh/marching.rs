//! Marching-squares triangulation of the wall cells
//!
//! Each square's configuration selects an ordered fan of nodes which is
//! split into triangles around its first point. Alongside the index buffer
//! the mesher records which triangles touch each vertex, the adjacency the
//! outline tracer walks.
//!
//! Vertex numbering: a node receives an index equal to the vertex count the
//! first time a fan references it, but its position is appended on every
//! reference. Later copies are never indexed by a triangle. The duplicates
//! are kept so vertex numbering, and therefore outline order, stays stable.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::grid::Grid;
use crate::mesh::outline::Triangle;
use crate::mesh::squares::{NodeRef, Square, SquareGrid};
use crate::mesh::{Mesh, Vec3};

/// Full-wall squares are the only fans that contribute interior vertices
const FULL_SQUARE: u8 = 15;

/// Floor geometry plus the adjacency needed for outline tracing
#[derive(Clone, Debug, Default)]
pub struct FloorMesh {
    pub mesh: Mesh,
    triangle_index: HashMap<usize, Vec<Triangle>>,
    /// Corners of fully solid squares; never part of an outline
    interior_vertices: HashSet<usize>,
}

impl FloorMesh {
    pub fn vertices(&self) -> &[Vec3] {
        &self.mesh.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len()
    }

    /// Triangles containing `vertex`, in creation order.
    pub fn triangles_containing(&self, vertex: usize) -> &[Triangle] {
        self.triangle_index
            .get(&vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn interior_vertices(&self) -> &HashSet<usize> {
        &self.interior_vertices
    }
}

/// Builds a [`FloorMesh`] from a grid
pub struct MeshGenerator {
    squares: SquareGrid,
    mesh: Mesh,
    triangle_index: HashMap<usize, Vec<Triangle>>,
    interior_vertices: HashSet<usize>,
}

impl MeshGenerator {
    /// Triangulate every square of `grid`, walking squares x-major.
    ///
    /// Grids narrower or shorter than two cells have no squares and produce
    /// an empty mesh.
    pub fn generate(grid: &Grid, square_size: f32) -> FloorMesh {
        let mut generator = Self {
            squares: SquareGrid::new(grid, square_size),
            mesh: Mesh::default(),
            triangle_index: HashMap::new(),
            interior_vertices: HashSet::new(),
        };

        let squares = generator.squares.squares().to_vec();
        for square in &squares {
            generator.triangulate_square(square);
        }

        debug!(
            "Marched {} squares into {} vertices and {} triangles",
            squares.len(),
            generator.mesh.vertices.len(),
            generator.mesh.triangle_count()
        );

        FloorMesh {
            mesh: generator.mesh,
            triangle_index: generator.triangle_index,
            interior_vertices: generator.interior_vertices,
        }
    }

    fn triangulate_square(&mut self, square: &Square) {
        let points = square.points();
        self.mesh_from_points(&points);

        if square.configuration == FULL_SQUARE {
            for corner in square.corners() {
                if let Some(index) = self.squares.node(corner).vertex_index {
                    self.interior_vertices.insert(index);
                }
            }
        }
    }

    fn mesh_from_points(&mut self, points: &[NodeRef]) {
        let indices = self.assign_vertices(points);

        if indices.len() < 3 {
            return;
        }
        for i in 1..indices.len() - 1 {
            self.create_triangle(indices[0], indices[i], indices[i + 1]);
        }
    }

    /// Resolve each point to its vertex index, appending its position.
    fn assign_vertices(&mut self, points: &[NodeRef]) -> Vec<usize> {
        let mut indices = Vec::with_capacity(points.len());
        for &point in points {
            let next_index = self.mesh.vertices.len();
            let node = self.squares.node_mut(point);
            let index = *node.vertex_index.get_or_insert(next_index);
            let position = node.position;

            self.mesh.vertices.push(position);
            indices.push(index);
        }
        indices
    }

    fn create_triangle(&mut self, a: usize, b: usize, c: usize) {
        self.mesh.triangles.extend([a as u32, b as u32, c as u32]);

        let triangle = Triangle::new(a, b, c);
        for vertex in triangle.vertices {
            self.triangle_index.entry(vertex).or_default().push(triangle);
        }
    }
}

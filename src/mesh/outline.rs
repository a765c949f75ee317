//! Boundary loop tracing over the floor mesh
//!
//! An edge lies on the boundary when exactly one triangle contains both of
//! its vertices. Loops are followed edge by edge from the lowest unvisited
//! vertex and closed by repeating their start vertex.

use std::collections::HashSet;

use log::debug;

use crate::mesh::marching::FloorMesh;

/// Ordered vertex indices of one floor triangle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub vertices: [usize; 3],
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Vertex at position `i`, if `i < 3`.
    pub fn get(&self, i: usize) -> Option<usize> {
        self.vertices.get(i).copied()
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.vertices.contains(&vertex)
    }
}

/// A closed boundary loop. The first and last indices are equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outline {
    pub vertices: Vec<usize>,
}

impl Outline {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Consecutive vertex pairs along the loop, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.vertices.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// True when exactly one triangle holds both vertices.
pub fn is_outline_edge(floor: &FloorMesh, a: usize, b: usize) -> bool {
    let mut shared = 0;
    for triangle in floor.triangles_containing(a) {
        if triangle.contains(b) {
            shared += 1;
            if shared > 1 {
                break;
            }
        }
    }
    shared == 1
}

/// First unvisited vertex joined to `vertex` by an outline edge.
fn connected_outline_vertex(floor: &FloorMesh, visited: &HashSet<usize>, vertex: usize) -> Option<usize> {
    floor
        .triangles_containing(vertex)
        .iter()
        .flat_map(|triangle| triangle.vertices)
        .find(|&other| other != vertex && !visited.contains(&other) && is_outline_edge(floor, vertex, other))
}

/// Trace every boundary loop of `floor`.
///
/// Vertices are tried in ascending index order. Corners of fully solid
/// squares start out visited. Loops with fewer than three distinct vertices
/// are discarded.
pub fn calculate_outlines(floor: &FloorMesh) -> Vec<Outline> {
    let mut visited: HashSet<usize> = floor.interior_vertices().clone();
    let mut outlines = Vec::new();
    let mut discarded = 0;

    for start in 0..floor.vertex_count() {
        if visited.contains(&start) {
            continue;
        }
        let Some(mut next) = connected_outline_vertex(floor, &visited, start) else {
            continue;
        };

        visited.insert(start);
        let mut vertices = vec![start];

        loop {
            vertices.push(next);
            visited.insert(next);
            match connected_outline_vertex(floor, &visited, next) {
                Some(vertex) => next = vertex,
                None => break,
            }
        }
        vertices.push(start);

        // start and its successor are distinct, so one more is needed
        if vertices.len() < 4 {
            discarded += 1;
            continue;
        }
        outlines.push(Outline { vertices });
    }

    if discarded > 0 {
        debug!("Discarded {} degenerate outline loops", discarded);
    }
    debug!("Traced {} outlines", outlines.len());

    outlines
}

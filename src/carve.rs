//! Corridor carving
//!
//! Corridors are rasterised with integer line stepping and widened by
//! stamping a disc of open cells at every tile along the line.

use crate::grid::{Cell, Grid};
use crate::regions::Coord;

/// Tiles touched by the straight segment from `from` to `to`, both inclusive.
///
/// Bresenham-style: steps one tile along the longer axis each iteration and
/// accumulates an error term to decide when to step the shorter axis.
pub fn line(from: Coord, to: Coord) -> Vec<Coord> {
    let mut x = from.x;
    let mut y = from.y;

    let dx = to.x - x;
    let dy = to.y - y;

    let mut step = dx.signum();
    let mut gradient_step = dy.signum();
    let mut longest = dx.abs();
    let mut shortest = dy.abs();

    // Walk along y when the segment is steeper than 45 degrees
    let inverted = longest < shortest;
    if inverted {
        std::mem::swap(&mut longest, &mut shortest);
        std::mem::swap(&mut step, &mut gradient_step);
    }

    let mut points = Vec::with_capacity(longest as usize + 1);
    let mut gradient_accumulation = longest / 2;

    for _ in 0..=longest {
        points.push(Coord::new(x, y));

        if inverted {
            y += step;
        } else {
            x += step;
        }

        gradient_accumulation += shortest;
        if gradient_accumulation >= longest {
            if inverted {
                x += gradient_step;
            } else {
                y += gradient_step;
            }
            gradient_accumulation -= longest;
        }
    }

    points
}

/// Open every in-bounds cell of the disc brush centred on `center`.
///
/// Offsets run over `[-radius, radius)` on both axes and are kept when
/// `x² + y² <= radius²`, so the brush leans towards negative offsets.
pub fn carve_circle(grid: &mut Grid, center: Coord, radius: i32) {
    for x in -radius..radius {
        for y in -radius..radius {
            if x * x + y * y <= radius * radius {
                grid.set_checked(center.x + x, center.y + y, Cell::Open);
            }
        }
    }
}

/// Carve a corridor of the given brush radius between two tiles.
pub fn carve_corridor(grid: &mut Grid, from: Coord, to: Coord, radius: i32) {
    for tile in line(from, to) {
        carve_circle(grid, tile, radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(points: &[(i32, i32)]) -> Vec<Coord> {
        points.iter().map(|&p| Coord::from(p)).collect()
    }

    #[test]
    fn test_horizontal_line() {
        let points = line(Coord::new(0, 0), Coord::new(5, 0));
        assert_eq!(points, coords(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]));
    }

    #[test]
    fn test_diagonal_line() {
        let points = line(Coord::new(0, 0), Coord::new(3, 3));
        assert_eq!(points, coords(&[(0, 0), (1, 1), (2, 2), (3, 3)]));
    }

    #[test]
    fn test_steep_line_walks_y() {
        let points = line(Coord::new(2, 0), Coord::new(3, 4));
        assert_eq!(points.len(), 5);
        assert_eq!(points.first(), Some(&Coord::new(2, 0)));
        assert_eq!(points.last(), Some(&Coord::new(3, 4)));
        for pair in points.windows(2) {
            assert_eq!(pair[1].y - pair[0].y, 1);
            assert!((0..=1).contains(&(pair[1].x - pair[0].x)));
        }
    }

    #[test]
    fn test_line_runs_backwards() {
        let points = line(Coord::new(4, 3), Coord::new(-2, 1));
        assert_eq!(points.first(), Some(&Coord::new(4, 3)));
        assert_eq!(points.last(), Some(&Coord::new(-2, 1)));
        assert_eq!(points.len(), 7);
        for pair in points.windows(2) {
            assert_eq!(pair[1].x - pair[0].x, -1);
            assert!((-1..=0).contains(&(pair[1].y - pair[0].y)));
        }
    }

    #[test]
    fn test_single_point_line() {
        assert_eq!(line(Coord::new(7, 7), Coord::new(7, 7)), coords(&[(7, 7)]));
    }

    #[test]
    fn test_carve_circle_radius_one() {
        let mut grid = Grid::new_with(5, 5, Cell::Wall);
        carve_circle(&mut grid, Coord::new(2, 2), 1);

        // Offsets in [-1, 1): (-1,-1) is outside the disc, the other three are in
        let open: Vec<_> = grid
            .iter()
            .filter(|(_, _, c)| **c == Cell::Open)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(open, vec![(2, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_carve_circle_clips_at_edges() {
        let mut grid = Grid::new_with(3, 3, Cell::Wall);
        carve_circle(&mut grid, Coord::new(0, 0), 2);
        assert_eq!(*grid.get(0, 0), Cell::Open);
        assert_eq!(*grid.get(1, 1), Cell::Open);
        assert_eq!(*grid.get(2, 2), Cell::Wall);
    }

    #[test]
    fn test_carve_corridor_opens_path() {
        let mut grid = Grid::new_with(10, 5, Cell::Wall);
        carve_corridor(&mut grid, Coord::new(1, 2), Coord::new(8, 2), 1);
        for x in 1..=8 {
            assert_eq!(*grid.get(x, 2), Cell::Open);
        }
    }
}

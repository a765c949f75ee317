//! Connected region detection and pruning
//!
//! Regions are maximal 4-connected groups of same-valued cells found by BFS
//! flood fill. Pruning opens up small wall clusters and fills in small open
//! pockets; the open regions that survive become rooms.

use log::debug;
use std::collections::VecDeque;

use crate::grid::{Cell, Grid};
use crate::tilemap::Tilemap;

/// Integer grid coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another coordinate.
    pub fn distance_sq(self, other: Coord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A connected set of cells sharing one value
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub cell: Cell,
    /// Tiles in flood-fill discovery order, seed first
    pub tiles: Vec<Coord>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Find every region of `target` cells.
///
/// Cells are scanned x-major; each unvisited matching cell seeds a flood fill.
/// Returned regions partition the matching cells exactly.
pub fn find_regions(grid: &Grid, target: Cell) -> Vec<Region> {
    let mut visited = Tilemap::new_with(grid.width, grid.height, false);
    let mut regions = Vec::new();

    for x in 0..grid.width {
        for y in 0..grid.height {
            if !*visited.get(x, y) && *grid.get(x, y) == target {
                let tiles = flood_fill(grid, &mut visited, Coord::new(x as i32, y as i32));
                regions.push(Region { cell: target, tiles });
            }
        }
    }

    regions
}

/// BFS from `start` over 4-connected cells equal to the start cell.
fn flood_fill(grid: &Grid, visited: &mut Tilemap<bool>, start: Coord) -> Vec<Coord> {
    let target = *grid.get(start.x as usize, start.y as usize);
    let mut tiles = Vec::new();
    let mut queue = VecDeque::new();

    visited.set(start.x as usize, start.y as usize, true);
    queue.push_back(start);

    while let Some(tile) = queue.pop_front() {
        tiles.push(tile);

        for (nx, ny) in Grid::neighbors_4(tile.x, tile.y) {
            if grid.get_checked(nx, ny) == Some(&target) && visited.get_checked(nx, ny) == Some(&false) {
                visited.set(nx as usize, ny as usize, true);
                queue.push_back(Coord::new(nx, ny));
            }
        }
    }

    tiles
}

/// Set every tile of a region to `cell`.
fn paint(grid: &mut Grid, tiles: &[Coord], cell: Cell) {
    for tile in tiles {
        grid.set_checked(tile.x, tile.y, cell);
    }
}

/// Remove noise from the grid and return the surviving open regions.
///
/// Wall regions smaller than `wall_threshold` become Open first, then open
/// regions smaller than `room_threshold` become Wall. The open regions that
/// remain are returned in discovery order.
pub fn prune_regions(grid: &mut Grid, wall_threshold: usize, room_threshold: usize) -> Vec<Region> {
    let mut walls_removed = 0;
    for region in find_regions(grid, Cell::Wall) {
        if region.len() < wall_threshold {
            paint(grid, &region.tiles, Cell::Open);
            walls_removed += 1;
        }
    }

    let mut pockets_filled = 0;
    let mut survivors = Vec::new();
    for region in find_regions(grid, Cell::Open) {
        if region.len() < room_threshold {
            paint(grid, &region.tiles, Cell::Wall);
            pockets_filled += 1;
        } else {
            survivors.push(region);
        }
    }

    debug!(
        "Pruned {} wall regions and {} open pockets; {} rooms survive",
        walls_removed,
        pockets_filled,
        survivors.len()
    );

    survivors
}

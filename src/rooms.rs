//! Room connectivity
//!
//! Surviving open regions become rooms. Rooms form an undirected graph whose
//! edges are added only when a corridor is carved between them. Two passes
//! connect the map:
//! 1. `connect_nearest` joins each room to its closest neighbour
//! 2. `connect_all` joins the closest pair of components until one remains

use log::{debug, info};
use std::collections::{BTreeSet, VecDeque};

use crate::carve::carve_corridor;
use crate::config::{EdgeWindow, NearestScan};
use crate::error::{CaveError, Result};
use crate::grid::Grid;
use crate::regions::{Coord, Region};

/// Index of a room in its [`RoomGraph`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub usize);

/// An open region that survived pruning
#[derive(Clone, Debug)]
pub struct Room {
    pub id: RoomId,
    pub tiles: Vec<Coord>,
    /// Tiles touching a wall, computed once when the room is built
    pub edge_tiles: Vec<Coord>,
    connected: BTreeSet<RoomId>,
}

impl Room {
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_connected(&self, other: RoomId) -> bool {
        self.connected.contains(&other)
    }

    pub fn connected_rooms(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.connected.iter().copied()
    }

    pub fn has_connections(&self) -> bool {
        !self.connected.is_empty()
    }
}

/// Build a room from a region, recording its edge tiles against the current grid.
///
/// Cells outside the grid count as Wall.
pub fn build_room(id: RoomId, region: &Region, grid: &Grid, window: EdgeWindow) -> Room {
    let is_wall = |x: i32, y: i32| grid.get_checked(x, y).map_or(true, |c| c.is_wall());

    let edge_tiles = region
        .tiles
        .iter()
        .copied()
        .filter(|tile| match window {
            EdgeWindow::Cardinal => Grid::neighbors_4(tile.x, tile.y)
                .iter()
                .any(|&(nx, ny)| is_wall(nx, ny)),
            EdgeWindow::SouthOnly => is_wall(tile.x, tile.y - 1),
        })
        .collect();

    Room {
        id,
        tiles: region.tiles.clone(),
        edge_tiles,
        connected: BTreeSet::new(),
    }
}

/// A corridor carved between two rooms
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Passage {
    pub room_a: RoomId,
    pub room_b: RoomId,
    pub tile_a: Coord,
    pub tile_b: Coord,
}

/// Closest edge-tile pairing found so far during a scan
#[derive(Clone, Copy, Debug)]
struct Candidate {
    distance: i64,
    passage: Passage,
}

/// Keep the strictly closer candidate; ties keep the one found first.
fn consider(best: &mut Option<Candidate>, room_a: &Room, room_b: &Room) {
    for &tile_a in &room_a.edge_tiles {
        for &tile_b in &room_b.edge_tiles {
            let distance = tile_a.distance_sq(tile_b);
            if best.map_or(true, |b| distance < b.distance) {
                *best = Some(Candidate {
                    distance,
                    passage: Passage {
                        room_a: room_a.id,
                        room_b: room_b.id,
                        tile_a,
                        tile_b,
                    },
                });
            }
        }
    }
}

/// Rooms plus the symmetric connectivity relation between them
#[derive(Clone, Debug)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    passages: Vec<Passage>,
    passage_radius: i32,
}

impl RoomGraph {
    /// Build rooms from surviving regions, in region order.
    pub fn from_regions(regions: &[Region], grid: &Grid, window: EdgeWindow, passage_radius: i32) -> Self {
        let rooms = regions
            .iter()
            .enumerate()
            .map(|(i, region)| build_room(RoomId(i), region, grid, window))
            .collect();

        Self {
            rooms,
            passages: Vec::new(),
            passage_radius,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.0]
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Every corridor carved so far, in carving order.
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Record a symmetric edge between two rooms. Self-edges are ignored.
    pub fn connect(&mut self, a: RoomId, b: RoomId) {
        if a == b {
            return;
        }
        self.rooms[a.0].connected.insert(b);
        self.rooms[b.0].connected.insert(a);
    }

    /// Connect two rooms and carve the corridor between their chosen tiles.
    pub fn create_passage(&mut self, grid: &mut Grid, passage: Passage) {
        self.connect(passage.room_a, passage.room_b);
        carve_corridor(grid, passage.tile_a, passage.tile_b, self.passage_radius);
        debug!(
            "Passage {:?} -> {:?} from ({}, {}) to ({}, {})",
            passage.room_a, passage.room_b, passage.tile_a.x, passage.tile_a.y, passage.tile_b.x, passage.tile_b.y
        );
        self.passages.push(passage);
    }

    /// Join each room to its nearest other room.
    ///
    /// With [`NearestScan::SkipConnectedRoom`] a room that already has any
    /// connection carves nothing. With [`NearestScan::SkipConnectedPair`] only
    /// candidates it is already connected to are passed over.
    pub fn connect_nearest(&mut self, grid: &mut Grid, scan: NearestScan) -> usize {
        let mut carved = 0;

        for a in 0..self.rooms.len() {
            let mut best: Option<Candidate> = None;
            let room_a = &self.rooms[a];

            if scan == NearestScan::SkipConnectedRoom && room_a.has_connections() {
                continue;
            }

            for room_b in &self.rooms {
                if room_b.id == room_a.id || room_a.is_connected(room_b.id) {
                    continue;
                }
                consider(&mut best, room_a, room_b);
            }

            if let Some(candidate) = best {
                self.create_passage(grid, candidate.passage);
                carved += 1;
            }
        }

        carved
    }

    /// Connected components of the room graph, each in BFS order.
    ///
    /// Components are discovered in room order, so the result is stable.
    pub fn components(&self) -> Vec<Vec<RoomId>> {
        let mut visited = vec![false; self.rooms.len()];
        let mut components = Vec::new();

        for start in 0..self.rooms.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;

            let mut component = Vec::new();
            let mut queue = VecDeque::from([RoomId(start)]);
            while let Some(id) = queue.pop_front() {
                component.push(id);
                for next in self.rooms[id.0].connected_rooms() {
                    if !visited[next.0] {
                        visited[next.0] = true;
                        queue.push_back(next);
                    }
                }
            }
            components.push(component);
        }

        components
    }

    pub fn is_fully_connected(&self) -> bool {
        self.components().len() <= 1
    }

    /// Carve corridors until every room is reachable from every other.
    ///
    /// Each iteration joins the globally closest pair of edge tiles lying in
    /// two different components. Returns the number of corridors carved.
    pub fn connect_all(&mut self, grid: &mut Grid) -> Result<usize> {
        let mut carved = 0;
        let mut components = self.components();

        while components.len() > 1 {
            let mut best: Option<Candidate> = None;

            for (i, component_a) in components.iter().enumerate() {
                for component_b in &components[i + 1..] {
                    for &a in component_a {
                        for &b in component_b {
                            consider(&mut best, &self.rooms[a.0], &self.rooms[b.0]);
                        }
                    }
                }
            }

            let Some(candidate) = best else {
                return Err(CaveError::ConnectivityStalled {
                    components: components.len(),
                });
            };
            self.create_passage(grid, candidate.passage);
            carved += 1;

            let next = self.components();
            assert!(
                next.len() < components.len(),
                "room components did not shrink after carving ({} -> {})",
                components.len(),
                next.len()
            );
            components = next;
        }

        info!("Connected {} rooms with {} extra passages", self.rooms.len(), carved);
        Ok(carved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::regions::{find_regions, prune_regions};

    fn grid_from_rows(rows: &[&str]) -> Grid {
        let height = rows.len();
        let width = rows[0].len();
        let mut grid = Grid::new(width, height);
        for (row, line) in rows.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                grid.set(x, height - 1 - row, if ch == '#' { Cell::Wall } else { Cell::Open });
            }
        }
        grid
    }

    /// Two 3x3 rooms and a narrow 2x3 room, separated by wall columns.
    fn three_rooms() -> Grid {
        grid_from_rows(&[
            "#################",
            "#...##...#####..#",
            "#...##...#####..#",
            "#...##...#####..#",
            "#################",
        ])
    }

    fn graph_for(grid: &Grid) -> RoomGraph {
        let regions = find_regions(grid, Cell::Open);
        RoomGraph::from_regions(&regions, grid, EdgeWindow::Cardinal, 1)
    }

    #[test]
    fn test_edge_tiles_cardinal() {
        let grid = grid_from_rows(&[
            "#####",
            "#...#",
            "#...#",
            "#...#",
            "#####",
        ]);
        let regions = find_regions(&grid, Cell::Open);
        let room = build_room(RoomId(0), &regions[0], &grid, EdgeWindow::Cardinal);
        // Everything except the centre touches a wall
        assert_eq!(room.edge_tiles.len(), 8);
        assert!(!room.edge_tiles.contains(&Coord::new(2, 2)));
    }

    #[test]
    fn test_edge_tiles_south_only() {
        let grid = grid_from_rows(&[
            "#####",
            "#...#",
            "#...#",
            "#...#",
            "#####",
        ]);
        let regions = find_regions(&grid, Cell::Open);
        let room = build_room(RoomId(0), &regions[0], &grid, EdgeWindow::SouthOnly);
        // Only the bottom row has a wall directly below
        assert_eq!(room.edge_tiles.len(), 3);
        assert!(room.edge_tiles.iter().all(|t| t.y == 1));
    }

    #[test]
    fn test_edge_tiles_not_updated_by_carving() {
        let mut grid = three_rooms();
        let graph = graph_for(&grid);
        let before = graph.room(RoomId(0)).edge_tiles.clone();
        carve_corridor(&mut grid, Coord::new(3, 2), Coord::new(6, 2), 1);
        assert_eq!(graph.room(RoomId(0)).edge_tiles, before);
    }

    #[test]
    fn test_connect_is_symmetric_and_idempotent() {
        let grid = three_rooms();
        let mut graph = graph_for(&grid);
        graph.connect(RoomId(0), RoomId(2));
        graph.connect(RoomId(2), RoomId(0));
        graph.connect(RoomId(1), RoomId(1));

        assert!(graph.room(RoomId(0)).is_connected(RoomId(2)));
        assert!(graph.room(RoomId(2)).is_connected(RoomId(0)));
        assert_eq!(graph.room(RoomId(0)).connected_rooms().count(), 1);
        assert!(!graph.room(RoomId(1)).has_connections());
        assert_eq!(graph.components().len(), 2);
    }

    #[test]
    fn test_connect_nearest_picks_closest_room() {
        let mut grid = three_rooms();
        let mut graph = graph_for(&grid);
        assert_eq!(graph.len(), 3);

        graph.connect_nearest(&mut grid, NearestScan::SkipConnectedRoom);

        // Room 0 joins room 1 across the 2-wide gap; room 1 is then already
        // connected; room 2 joins room 1 as its nearest
        let first = graph.passages()[0];
        assert_eq!((first.room_a, first.room_b), (RoomId(0), RoomId(1)));
        assert_eq!(first.tile_a.x, 3);
        assert_eq!(first.tile_b.x, 6);
        assert_eq!(graph.passages().len(), 2);
        assert_eq!(graph.passages()[1].room_a, RoomId(2));
        assert_eq!(graph.passages()[1].room_b, RoomId(1));
        assert!(graph.is_fully_connected());
    }

    #[test]
    fn test_connect_nearest_ties_keep_first_pair() {
        let mut grid = three_rooms();
        let mut graph = graph_for(&grid);
        graph.connect_nearest(&mut grid, NearestScan::SkipConnectedRoom);

        // Every row of facing edge tiles is equally close; the bottom row is
        // scanned first in both rooms
        let passages = graph.passages();
        assert_eq!(passages[0].tile_a, Coord::new(3, 1));
        assert_eq!(passages[0].tile_b, Coord::new(6, 1));
        assert_eq!(passages[1].tile_a, Coord::new(14, 1));
        assert_eq!(passages[1].tile_b, Coord::new(8, 1));
    }

    #[test]
    fn test_connect_all_ties_keep_first_pair() {
        let mut grid = three_rooms();
        let mut graph = graph_for(&grid);
        graph.connect_all(&mut grid).unwrap();

        let passages = graph.passages();
        assert_eq!(passages.len(), 2);
        assert_eq!(
            passages[0],
            Passage {
                room_a: RoomId(0),
                room_b: RoomId(1),
                tile_a: Coord::new(3, 1),
                tile_b: Coord::new(6, 1),
            }
        );
        assert_eq!(
            passages[1],
            Passage {
                room_a: RoomId(1),
                room_b: RoomId(2),
                tile_a: Coord::new(8, 1),
                tile_b: Coord::new(14, 1),
            }
        );
    }

    #[test]
    fn test_connect_nearest_pair_scan_carves_more() {
        let mut grid = three_rooms();
        let mut graph = graph_for(&grid);
        graph.connect_nearest(&mut grid, NearestScan::SkipConnectedPair);

        // Room 1 is visited with an edge to room 0 already, and still joins room 2
        assert_eq!(graph.passages().len(), 3);
        assert_eq!(graph.passages()[1].room_a, RoomId(1));
        assert_eq!(graph.passages()[1].room_b, RoomId(2));
    }

    #[test]
    fn test_connect_all_reaches_every_room() {
        let mut grid = three_rooms();
        let mut graph = graph_for(&grid);

        let carved = graph.connect_all(&mut grid).unwrap();
        assert_eq!(carved, 2);
        assert!(graph.is_fully_connected());

        // BFS from any room reaches all rooms
        let components = graph.components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), 3);

        // The grid really is one open region now
        assert_eq!(find_regions(&grid, Cell::Open).len(), 1);
    }

    #[test]
    fn test_connect_all_single_room_is_noop() {
        let mut grid = grid_from_rows(&[
            "#####",
            "#...#",
            "#...#",
            "#####",
        ]);
        let before = grid.clone();
        let mut graph = graph_for(&grid);
        assert_eq!(graph.connect_all(&mut grid).unwrap(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_connect_all_no_rooms() {
        let mut grid = Grid::new_with(6, 6, Cell::Wall);
        let regions = prune_regions(&mut grid, 50, 50);
        let mut graph = RoomGraph::from_regions(&regions, &grid, EdgeWindow::Cardinal, 1);
        assert!(graph.is_empty());
        assert_eq!(graph.connect_all(&mut grid).unwrap(), 0);
        assert_eq!(graph.connect_nearest(&mut grid, NearestScan::SkipConnectedRoom), 0);
    }

    #[test]
    fn test_connect_all_stalls_without_edge_tiles() {
        let mut grid = three_rooms();
        let mut graph = graph_for(&grid);
        for room in &mut graph.rooms {
            room.edge_tiles.clear();
        }
        assert!(matches!(
            graph.connect_all(&mut grid),
            Err(CaveError::ConnectivityStalled { components: 3 })
        ));
    }

    #[test]
    fn test_corridor_endpoints_are_open() {
        let mut grid = three_rooms();
        let mut graph = graph_for(&grid);
        graph.connect_all(&mut grid).unwrap();
        for passage in graph.passages() {
            assert_eq!(grid.get_checked(passage.tile_a.x, passage.tile_a.y), Some(&Cell::Open));
            assert_eq!(grid.get_checked(passage.tile_b.x, passage.tile_b.y), Some(&Cell::Open));
        }
    }
}

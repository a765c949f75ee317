//! Cave generation pipeline
//!
//! Runs the stages in order: seeded fill, cellular smoothing, region
//! pruning, room connection, border framing, then floor and wall meshing.
//! [`CaveGenerator::generate`] runs everything in one call.
//! [`CaveGenerator::begin`] returns a [`GenerationSession`] that hands
//! control back after every smoothing pass, so a caller can animate or
//! preview the grid while it settles.

use log::info;
use serde::Serialize;
use std::time::Duration;

use crate::config::CaveParams;
use crate::error::Result;
use crate::grid::{self, Cell, Grid, SmoothingRun, SmoothingStep};
use crate::mesh::{self, FloorMesh, Mesh, MeshGenerator, Outline, Vec3};
use crate::regions::{self, Coord};
use crate::rooms::RoomGraph;
use crate::seeds::CaveSeed;

/// A finished cave
#[derive(Clone, Debug)]
pub struct CaveMap {
    pub seed: CaveSeed,
    /// Validated parameters the cave was built from
    pub params: CaveParams,
    /// Final grid including the border frame
    pub grid: Grid,
    /// Rooms and passages, in unbordered grid coordinates
    pub rooms: RoomGraph,
    pub floor: FloorMesh,
    pub outlines: Vec<Outline>,
    pub walls: Mesh,
}

/// Headline numbers for one cave, for printing or JSON output
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaveSummary {
    pub seed: String,
    pub seed_value: u64,
    pub width: usize,
    pub height: usize,
    pub open_cells: usize,
    pub wall_cells: usize,
    pub rooms: usize,
    pub passages: usize,
    pub floor_vertices: usize,
    pub floor_triangles: usize,
    pub outlines: usize,
    pub wall_triangles: usize,
}

impl CaveMap {
    pub fn summary(&self) -> CaveSummary {
        CaveSummary {
            seed: self.seed.text.clone(),
            seed_value: self.seed.value,
            width: self.grid.width,
            height: self.grid.height,
            open_cells: self.grid.count(&Cell::Open),
            wall_cells: self.grid.count(&Cell::Wall),
            rooms: self.rooms.len(),
            passages: self.rooms.passages().len(),
            floor_vertices: self.floor.vertex_count(),
            floor_triangles: self.floor.mesh.triangle_count(),
            outlines: self.outlines.len(),
            wall_triangles: self.walls.triangle_count(),
        }
    }

    /// World-space centre of an unbordered grid tile, raised to `y`.
    pub fn coord_to_world(&self, coord: Coord, y: f32) -> Vec3 {
        coord_to_world(coord, self.params.width, self.params.height, self.params.square_size, y)
    }
}

/// World-space centre of `coord` on a `width` x `height` grid centred on the origin.
///
/// The border frame is symmetric, so the same mapping holds for the bordered grid.
pub fn coord_to_world(coord: Coord, width: usize, height: usize, square_size: f32, y: f32) -> Vec3 {
    Vec3::new(
        -(width as f32) * square_size / 2.0 + coord.x as f32 * square_size + square_size / 2.0,
        y,
        -(height as f32) * square_size / 2.0 + coord.y as f32 * square_size + square_size / 2.0,
    )
}

/// Entry point for building caves from one parameter set
#[derive(Clone, Debug)]
pub struct CaveGenerator {
    params: CaveParams,
}

impl CaveGenerator {
    /// Validate `params` and build a generator.
    pub fn new(params: CaveParams) -> Result<Self> {
        Ok(Self {
            params: params.validate()?,
        })
    }

    pub fn params(&self) -> &CaveParams {
        &self.params
    }

    /// Run the whole pipeline to completion.
    pub fn generate(&self) -> Result<CaveMap> {
        self.begin()?.finish()
    }

    /// Fill the grid and return a session ready for stepwise smoothing.
    ///
    /// The seed is resolved here, so a clock seed is fixed for the session.
    pub fn begin(&self) -> Result<GenerationSession> {
        let params = &self.params;
        let seed = CaveSeed::resolve(params.seed.as_deref(), params.use_random_seed);
        info!("Generating {}x{} cave with seed {}", params.width, params.height, seed);

        let grid = grid::random_fill(params.width, params.height, params.random_fill_percent, &seed)?;
        info!(
            "Random fill: {} of {} cells are wall",
            grid.count(&Cell::Wall),
            grid.len()
        );

        let smoothing = &params.smoothing;
        let run = SmoothingRun::new(
            grid,
            smoothing.iterations,
            smoothing.wall_count_threshold,
            smoothing.mode,
            smoothing.step_delay(),
        );

        Ok(GenerationSession {
            params: params.clone(),
            seed,
            run,
        })
    }
}

/// A generation paused between smoothing passes
#[derive(Clone, Debug)]
pub struct GenerationSession {
    params: CaveParams,
    seed: CaveSeed,
    run: SmoothingRun,
}

impl GenerationSession {
    pub fn seed(&self) -> &CaveSeed {
        &self.seed
    }

    /// Perform one smoothing pass. `None` once smoothing is done.
    pub fn step(&mut self) -> Option<SmoothingStep> {
        self.run.step()
    }

    pub fn is_smoothing_finished(&self) -> bool {
        self.run.is_finished()
    }

    /// The grid as it stands after the passes run so far, without border.
    pub fn grid(&self) -> &Grid {
        self.run.grid()
    }

    /// Pause requested between steps.
    pub fn step_delay(&self) -> Duration {
        self.run.delay()
    }

    /// Mesh the current grid inside its border frame.
    pub fn preview_mesh(&self) -> FloorMesh {
        let framed = grid::with_border(self.run.grid(), self.params.border_size);
        MeshGenerator::generate(&framed, self.params.square_size)
    }

    /// Finish any remaining smoothing passes and run the later stages.
    pub fn finish(self) -> Result<CaveMap> {
        let Self { params, seed, run } = self;
        let mut grid = run.finish();
        info!("Smoothed grid with {} passes ({})", params.smoothing.iterations, params.smoothing.mode);

        let regions = &params.regions;
        let survivors = regions::prune_regions(&mut grid, regions.wall_threshold, regions.room_threshold);
        info!("Found {} rooms after pruning", survivors.len());

        let mut rooms = RoomGraph::from_regions(&survivors, &grid, regions.edge_window, regions.passage_radius);
        let nearest = rooms.connect_nearest(&mut grid, regions.nearest_scan);
        info!("Carved {} nearest-room passages", nearest);
        rooms.connect_all(&mut grid)?;

        let grid = grid::with_border(&grid, params.border_size);
        let floor = MeshGenerator::generate(&grid, params.square_size);
        let outlines = mesh::calculate_outlines(&floor);
        let walls = mesh::build_wall_mesh(floor.vertices(), &outlines, params.wall_height);
        info!(
            "Meshed floor ({} triangles) and {} wall outlines ({} triangles)",
            floor.mesh.triangle_count(),
            outlines.len(),
            walls.triangle_count()
        );

        Ok(CaveMap {
            seed,
            params,
            grid,
            rooms,
            floor,
            outlines,
            walls,
        })
    }
}

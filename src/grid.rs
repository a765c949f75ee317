//! Binary occupancy grid and cellular automaton smoothing
//!
//! The grid starts as seeded noise and is smoothed into cave shapes:
//! 1. `random_fill` walls in the outer ring and scatters walls inside
//! 2. `smooth` applies the wall-count rule a fixed number of times
//! 3. After pruning and connecting, `with_border` frames the result in walls

use rand::Rng;
use rayon::prelude::*;
use std::time::Duration;

use crate::config::SmoothingMode;
use crate::error::{CaveError, Result};
use crate::seeds::CaveSeed;
use crate::tilemap::Tilemap;

/// State of a single grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Open,
    Wall,
}

impl Cell {
    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }
}

/// The cave occupancy grid.
pub type Grid = Tilemap<Cell>;

/// Fill a new grid with seeded noise.
///
/// Border cells are always Wall. Interior cells are Wall with probability
/// `fill_percent / 100`. Cells are drawn in x-major order, so the same seed,
/// size and percentage always give the same grid.
pub fn random_fill(width: usize, height: usize, fill_percent: u32, seed: &CaveSeed) -> Result<Grid> {
    if width == 0 || height == 0 {
        return Err(CaveError::InvalidDimensions { width, height });
    }

    let mut rng = seed.rng();
    let mut grid = Grid::new(width, height);

    for x in 0..width {
        for y in 0..height {
            let on_border = x == 0 || x == width - 1 || y == 0 || y == height - 1;
            let cell = if on_border || rng.gen_range(0..100) < fill_percent {
                Cell::Wall
            } else {
                Cell::Open
            };
            grid.set(x, y, cell);
        }
    }

    Ok(grid)
}

/// Count Wall cells among the 8 neighbours. Outside the grid counts as Wall.
pub fn count_surrounding_walls(grid: &Grid, x: usize, y: usize) -> u32 {
    Grid::neighbors_8(x as i32, y as i32)
        .filter(|&(nx, ny)| grid.get_checked(nx, ny).map_or(true, |c| c.is_wall()))
        .count() as u32
}

/// Apply the wall-count rule to one cell value.
fn next_cell(current: Cell, wall_count: u32, threshold: u32) -> Cell {
    if wall_count > threshold {
        Cell::Wall
    } else if wall_count < threshold {
        Cell::Open
    } else {
        current
    }
}

/// Run one smoothing pass over the whole grid.
pub fn smooth_step(grid: &mut Grid, wall_count_threshold: u32, mode: SmoothingMode) {
    match mode {
        SmoothingMode::InPlace => {
            for x in 0..grid.width {
                for y in 0..grid.height {
                    let walls = count_surrounding_walls(grid, x, y);
                    let next = next_cell(*grid.get(x, y), walls, wall_count_threshold);
                    grid.set(x, y, next);
                }
            }
        }
        SmoothingMode::Buffered => {
            // Every cell reads only the previous generation, so cells are independent
            let source = &*grid;
            let width = source.width;
            let cells: Vec<Cell> = (0..source.len())
                .into_par_iter()
                .map(|idx| {
                    let (x, y) = (idx % width, idx / width);
                    let walls = count_surrounding_walls(source, x, y);
                    next_cell(*source.get(x, y), walls, wall_count_threshold)
                })
                .collect();

            if let Some(next) = Grid::from_vec(grid.width, grid.height, cells) {
                *grid = next;
            }
        }
    }
}

/// Smooth the grid `iterations` times.
pub fn smooth(grid: &mut Grid, iterations: u32, wall_count_threshold: u32, mode: SmoothingMode) {
    for _ in 0..iterations {
        smooth_step(grid, wall_count_threshold, mode);
    }
}

/// Frame the grid in `border_size` cells of Wall.
pub fn with_border(grid: &Grid, border_size: usize) -> Grid {
    grid.framed(border_size, Cell::Wall)
}

/// Progress report from one cooperative smoothing step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmoothingStep {
    /// 1-based index of the pass just completed
    pub iteration: u32,
    pub remaining: u32,
}

/// Smoothing that yields to the caller between passes.
///
/// Each call to [`SmoothingRun::step`] performs exactly one pass. Between
/// steps the caller may inspect the grid, render it, or simply stop calling
/// `step`; there is no other cancellation.
#[derive(Clone, Debug)]
pub struct SmoothingRun {
    grid: Grid,
    completed: u32,
    iterations: u32,
    wall_count_threshold: u32,
    mode: SmoothingMode,
    delay: Duration,
}

impl SmoothingRun {
    pub fn new(
        grid: Grid,
        iterations: u32,
        wall_count_threshold: u32,
        mode: SmoothingMode,
        delay: Duration,
    ) -> Self {
        Self {
            grid,
            completed: 0,
            iterations,
            wall_count_threshold,
            mode,
            delay,
        }
    }

    /// Perform the next pass, or return `None` when all passes are done.
    pub fn step(&mut self) -> Option<SmoothingStep> {
        if self.is_finished() {
            return None;
        }
        smooth_step(&mut self.grid, self.wall_count_threshold, self.mode);
        self.completed += 1;
        Some(SmoothingStep {
            iteration: self.completed,
            remaining: self.iterations - self.completed,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.completed >= self.iterations
    }

    /// Pause the caller is asked to leave between steps.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Run the remaining passes and return the grid.
    pub fn finish(mut self) -> Grid {
        while self.step().is_some() {}
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_from_rows(rows: &[&str]) -> Grid {
        // Rows are written top-down; row 0 of the slice is the highest y
        let height = rows.len();
        let width = rows[0].len();
        let mut grid = Grid::new(width, height);
        for (row, line) in rows.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let y = height - 1 - row;
                grid.set(x, y, if ch == '#' { Cell::Wall } else { Cell::Open });
            }
        }
        grid
    }

    #[test]
    fn test_random_fill_deterministic() {
        let seed = CaveSeed::from_text("test");
        let a = random_fill(30, 20, 45, &seed).unwrap();
        let b = random_fill(30, 20, 45, &seed).unwrap();
        assert_eq!(a, b);

        let other = random_fill(30, 20, 45, &CaveSeed::from_text("other")).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_random_fill_extremes() {
        let seed = CaveSeed::from_text("extremes");
        let full = random_fill(10, 10, 100, &seed).unwrap();
        assert_eq!(full.count(&Cell::Wall), 100);

        let empty = random_fill(10, 10, 0, &seed).unwrap();
        // Only the outer ring is wall
        assert_eq!(empty.count(&Cell::Wall), 36);
    }

    #[test]
    fn test_random_fill_rejects_zero_size() {
        let seed = CaveSeed::from_text("x");
        assert!(random_fill(0, 5, 45, &seed).is_err());
        assert!(random_fill(5, 0, 45, &seed).is_err());
    }

    #[test]
    fn test_out_of_bounds_counts_as_wall() {
        let grid = Grid::new(3, 3);
        assert_eq!(count_surrounding_walls(&grid, 0, 0), 5);
        assert_eq!(count_surrounding_walls(&grid, 1, 0), 3);
        assert_eq!(count_surrounding_walls(&grid, 1, 1), 0);
    }

    #[test]
    fn test_all_wall_is_fixed_point() {
        for threshold in 0..=8 {
            for mode in [SmoothingMode::InPlace, SmoothingMode::Buffered] {
                let mut grid = Grid::new_with(8, 6, Cell::Wall);
                smooth(&mut grid, 3, threshold, mode);
                assert_eq!(grid.count(&Cell::Wall), 48, "threshold {} {:?}", threshold, mode);
            }
        }
    }

    #[test]
    fn test_all_open_is_fixed_point() {
        // Corners see 5 out-of-bounds walls, so the rule must not fire below 5
        for mode in [SmoothingMode::InPlace, SmoothingMode::Buffered] {
            let mut grid = Grid::new(8, 6);
            smooth(&mut grid, 3, 5, mode);
            assert_eq!(grid.count(&Cell::Open), 48);
        }
    }

    #[test]
    fn test_equal_count_leaves_cell_unchanged() {
        let mut grid = grid_from_rows(&[
            "...",
            "#.#",
            "#..",
        ]);
        // Centre (1,1) has 3 wall neighbours
        assert_eq!(count_surrounding_walls(&grid, 1, 1), 3);
        let before = *grid.get(1, 1);
        smooth_step(&mut grid, 3, SmoothingMode::Buffered);
        assert_eq!(*grid.get(1, 1), before);
    }

    #[test]
    fn test_in_place_and_buffered_differ() {
        // In place, (0,0) and (1,0) turn to wall before (1,1) is visited,
        // which lifts its count from 2 to exactly the threshold.
        let rows = [
            "....",
            "#...",
            "##..",
            "....",
        ];
        let mut in_place = grid_from_rows(&rows);
        let mut buffered = grid_from_rows(&rows);

        smooth_step(&mut in_place, 4, SmoothingMode::InPlace);
        smooth_step(&mut buffered, 4, SmoothingMode::Buffered);

        assert_ne!(in_place, buffered);

        // Buffered results depend only on the original grid
        let original = grid_from_rows(&rows);
        for (x, y, &cell) in buffered.iter() {
            let walls = count_surrounding_walls(&original, x, y);
            assert_eq!(cell, next_cell(*original.get(x, y), walls, 4));
        }
    }

    #[test]
    fn test_smoothing_run_steps_one_pass_at_a_time() {
        let seed = CaveSeed::from_text("steps");
        let start = random_fill(24, 16, 45, &seed).unwrap();

        let mut run = SmoothingRun::new(start.clone(), 3, 4, SmoothingMode::InPlace, Duration::ZERO);
        let mut expected = start.clone();

        let first = run.step().unwrap();
        assert_eq!(first, SmoothingStep { iteration: 1, remaining: 2 });
        smooth_step(&mut expected, 4, SmoothingMode::InPlace);
        assert_eq!(run.grid(), &expected);

        assert!(run.step().is_some());
        assert!(run.step().is_some());
        assert!(run.step().is_none());
        assert!(run.is_finished());

        let mut blocking = start;
        smooth(&mut blocking, 3, 4, SmoothingMode::InPlace);
        assert_eq!(run.finish(), blocking);
    }

    #[test]
    fn test_zero_iteration_run_is_finished() {
        let mut run = SmoothingRun::new(Grid::new(4, 4), 0, 4, SmoothingMode::Buffered, Duration::ZERO);
        assert!(run.is_finished());
        assert!(run.step().is_none());
    }

    #[test]
    fn test_with_border() {
        let grid = Grid::new(5, 4);
        let bordered = with_border(&grid, 2);
        assert_eq!((bordered.width, bordered.height), (9, 8));
        assert_eq!(bordered.count(&Cell::Open), 20);
        assert_eq!(*bordered.get(1, 1), Cell::Wall);
        assert_eq!(*bordered.get(2, 2), Cell::Open);
    }

    proptest! {
        #[test]
        fn prop_border_always_wall(
            seed in "[a-z0-9]{1,12}",
            width in 1usize..40,
            height in 1usize..40,
            fill in 0u32..=100,
        ) {
            let grid = random_fill(width, height, fill, &CaveSeed::from_text(seed)).unwrap();
            for x in 0..width {
                prop_assert_eq!(*grid.get(x, 0), Cell::Wall);
                prop_assert_eq!(*grid.get(x, height - 1), Cell::Wall);
            }
            for y in 0..height {
                prop_assert_eq!(*grid.get(0, y), Cell::Wall);
                prop_assert_eq!(*grid.get(width - 1, y), Cell::Wall);
            }
        }
    }
}

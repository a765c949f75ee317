//! Cave generation parameters and configuration
//!
//! Parameters are validated once, at the boundary, by [`CaveParams::validate`].
//! Everything downstream assumes the values are in range.

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{CaveError, Result};

/// How a smoothing pass writes its results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Write each cell immediately; later cells in the same pass see earlier updates
    #[default]
    InPlace,
    /// Compute a whole new grid from the old one, then swap
    Buffered,
}

/// How the smoothing stage is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Run every iteration to completion in one call
    #[default]
    Blocking,
    /// Yield to the caller after every iteration
    Cooperative,
}

/// Which neighbours make a room tile an edge tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeWindow {
    /// Left, right, below and above
    #[default]
    Cardinal,
    /// Only the tile below (`y - 1`), the asymmetric legacy window
    SouthOnly,
}

/// How `connect_nearest` treats rooms that already have connections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NearestScan {
    /// A room with any existing connection carves nothing in this pass
    #[default]
    SkipConnectedRoom,
    /// Only candidate rooms already connected to the current room are skipped
    SkipConnectedPair,
}

impl std::fmt::Display for SmoothingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InPlace => write!(f, "in-place"),
            Self::Buffered => write!(f, "buffered"),
        }
    }
}

/// Cellular automaton smoothing settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    /// Number of smoothing passes (0-10)
    pub iterations: u32,
    /// A cell becomes Wall above this many wall neighbours, Open below it (0-8)
    pub wall_count_threshold: u32,
    pub mode: SmoothingMode,
    pub execution: ExecutionMode,
    /// Delay between cooperative steps, in milliseconds
    pub step_delay_ms: u64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            iterations: 5,
            wall_count_threshold: 4,
            mode: SmoothingMode::InPlace,
            execution: ExecutionMode::Blocking,
            step_delay_ms: 250,
        }
    }
}

impl SmoothingParams {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

/// Region pruning and room connection settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionParams {
    /// Wall regions smaller than this are opened up
    pub wall_threshold: usize,
    /// Open regions smaller than this are filled in
    pub room_threshold: usize,
    pub edge_window: EdgeWindow,
    pub nearest_scan: NearestScan,
    /// Radius of the brush stamped along corridors
    pub passage_radius: i32,
}

impl Default for RegionParams {
    fn default() -> Self {
        Self {
            wall_threshold: 50,
            room_threshold: 50,
            edge_window: EdgeWindow::Cardinal,
            nearest_scan: NearestScan::SkipConnectedRoom,
            passage_radius: 1,
        }
    }
}

/// Full parameter set for one cave generation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveParams {
    /// Grid width in cells, before the border is added
    pub width: usize,
    /// Grid height in cells, before the border is added
    pub height: usize,
    /// Thickness of the Wall frame added around the finished grid
    pub border_size: usize,
    /// How far walls extend below the floor mesh
    pub wall_height: f32,
    /// World-space size of one grid cell
    pub square_size: f32,
    /// Explicit seed text; ignored when `use_random_seed` is set
    pub seed: Option<String>,
    /// Derive the seed from the clock. A missing `seed` falls back to the clock too.
    pub use_random_seed: bool,
    /// Chance (0-100) that an interior cell starts as Wall
    pub random_fill_percent: u32,
    pub smoothing: SmoothingParams,
    pub regions: RegionParams,
}

impl Default for CaveParams {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            border_size: 1,
            wall_height: 5.0,
            square_size: 1.0,
            seed: None,
            use_random_seed: false,
            random_fill_percent: 45,
            smoothing: SmoothingParams::default(),
            regions: RegionParams::default(),
        }
    }
}

impl CaveParams {
    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject fatal values and clamp out-of-range ones.
    pub fn validate(mut self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(CaveError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.regions.passage_radius < 1 {
            return Err(CaveError::InvalidRadius(self.regions.passage_radius));
        }
        if !(self.square_size.is_finite() && self.square_size > 0.0) {
            return Err(CaveError::InvalidSquareSize(self.square_size));
        }

        if self.random_fill_percent > 100 {
            warn!("Fill percent {} clamped to 100", self.random_fill_percent);
            self.random_fill_percent = 100;
        }
        if self.smoothing.iterations > 10 {
            warn!("Smoothing iterations {} clamped to 10", self.smoothing.iterations);
            self.smoothing.iterations = 10;
        }
        if self.smoothing.wall_count_threshold > 8 {
            warn!(
                "Wall count threshold {} clamped to 8",
                self.smoothing.wall_count_threshold
            );
            self.smoothing.wall_count_threshold = 8;
        }
        if !self.wall_height.is_finite() || self.wall_height < 0.0 {
            warn!("Wall height {} reset to 0", self.wall_height);
            self.wall_height = 0.0;
        }

        Ok(self)
    }
}

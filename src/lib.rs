//! Procedural cave generation library
//!
//! Builds a cellular-automaton cave grid, joins its rooms with corridors and
//! turns the result into floor and wall meshes. Re-exports modules for use by
//! binaries and tools.

pub mod ascii;
pub mod carve;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod grid;
pub mod mesh;
pub mod regions;
pub mod rooms;
pub mod seeds;
pub mod tilemap;

pub use config::CaveParams;
pub use error::{CaveError, Result};
pub use generator::{CaveGenerator, CaveMap, CaveSummary, GenerationSession};

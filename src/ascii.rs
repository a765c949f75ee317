//! ASCII rendering and export for cave grids
//!
//! Rows are written top to bottom from the highest `y`, so the text reads
//! the same way the mesh looks from above with +z pointing up the page.

use std::fs::File;
use std::io::Write;

use chrono::Local;

use crate::carve::line;
use crate::error::Result;
use crate::generator::CaveMap;
use crate::grid::{Cell, Grid};
use crate::tilemap::Tilemap;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Walls and open floor only
    Cells,
    /// Rooms labelled by letter, passages traced with `+`
    Rooms,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Cells => "Cells",
            AsciiMode::Rooms => "Rooms",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Cells, AsciiMode::Rooms]
    }
}

pub fn cell_char(cell: Cell) -> char {
    match cell {
        Cell::Wall => '#',
        Cell::Open => '.',
    }
}

/// Letter for a room index, cycling through `a-z` then `A-Z`.
pub fn room_char(index: usize) -> char {
    let slot = (index % 52) as u8;
    if slot < 26 {
        (b'a' + slot) as char
    } else {
        (b'A' + slot - 26) as char
    }
}

fn render_chars(chars: &Tilemap<char>) -> String {
    let mut result = String::with_capacity((chars.width + 1) * chars.height);
    for y in (0..chars.height).rev() {
        for x in 0..chars.width {
            result.push(*chars.get(x, y));
        }
        result.push('\n');
    }
    result
}

/// Render a grid to an ASCII string.
pub fn render_ascii_map(grid: &Grid) -> String {
    let mut chars = Tilemap::new_with(grid.width, grid.height, ' ');
    for (x, y, cell) in grid.iter() {
        chars.set(x, y, cell_char(*cell));
    }
    render_chars(&chars)
}

/// Render a finished cave with rooms and passages marked.
///
/// Room tiles carved over by corridors keep their room letter.
pub fn render_room_map(cave: &CaveMap) -> String {
    let grid = &cave.grid;
    let offset = cave.params.border_size as i32;

    let mut chars = Tilemap::new_with(grid.width, grid.height, ' ');
    for (x, y, cell) in grid.iter() {
        chars.set(x, y, cell_char(*cell));
    }

    for passage in cave.rooms.passages() {
        for tile in line(passage.tile_a, passage.tile_b) {
            chars.set_checked(tile.x + offset, tile.y + offset, '+');
        }
    }

    for (index, room) in cave.rooms.rooms().iter().enumerate() {
        let label = room_char(index);
        for tile in &room.tiles {
            chars.set_checked(tile.x + offset, tile.y + offset, label);
        }
    }

    render_chars(&chars)
}

pub fn render(cave: &CaveMap, mode: AsciiMode) -> String {
    match mode {
        AsciiMode::Cells => render_ascii_map(&cave.grid),
        AsciiMode::Rooms => render_room_map(cave),
    }
}

/// Print a grid to stdout
pub fn print_ascii_map(grid: &Grid) {
    print!("{}", render_ascii_map(grid));
}

/// Write the cave summary and maps to a text file.
pub fn export_cave_file(cave: &CaveMap, path: &str) -> Result<()> {
    let mut file = File::create(path)?;
    let summary = cave.summary();

    writeln!(file, "=== CAVE GENERATOR MAP FILE ===")?;
    writeln!(file, "Seed: {} ({})", summary.seed, summary.seed_value)?;
    writeln!(file, "Size: {}x{} (border {})", summary.width, summary.height, cave.params.border_size)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    let total = summary.width * summary.height;
    writeln!(
        file,
        "Open: {} cells ({:.1}%)",
        summary.open_cells,
        100.0 * summary.open_cells as f64 / total.max(1) as f64
    )?;
    writeln!(file, "Rooms: {}  Passages: {}", summary.rooms, summary.passages)?;
    writeln!(
        file,
        "Floor: {} triangles  Walls: {} triangles over {} outlines",
        summary.floor_triangles, summary.wall_triangles, summary.outlines
    )?;
    writeln!(file)?;

    for &mode in AsciiMode::all() {
        writeln!(file, "=== MAP ({} View) ===", mode.name())?;
        write!(file, "{}", render(cave, mode))?;
        writeln!(file)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaveError;
    use crate::{CaveGenerator, CaveParams};

    #[test]
    fn test_top_row_is_highest_y() {
        let mut grid = Grid::new_with(3, 2, Cell::Wall);
        grid.set(0, 1, Cell::Open);
        grid.set(2, 0, Cell::Open);
        assert_eq!(render_ascii_map(&grid), ".##\n##.\n");
    }

    #[test]
    fn test_room_chars() {
        assert_eq!(room_char(0), 'a');
        assert_eq!(room_char(25), 'z');
        assert_eq!(room_char(26), 'A');
        assert_eq!(room_char(52), 'a');
    }

    #[test]
    fn test_empty_grid_renders_nothing() {
        let grid = Grid::new(0, 0);
        assert!(render_ascii_map(&grid).is_empty());
    }

    #[test]
    fn test_export_to_missing_directory_is_io_error() {
        let cave = CaveGenerator::new(CaveParams {
            width: 12,
            height: 10,
            seed: Some("test".to_string()),
            ..CaveParams::default()
        })
        .unwrap()
        .generate()
        .unwrap();

        let path = std::env::temp_dir().join("cave_generator_no_such_dir").join("cave.txt");
        let err = export_cave_file(&cave, &path.to_string_lossy()).unwrap_err();
        assert!(matches!(err, CaveError::Io(_)));
    }

    #[test]
    fn test_export_writes_header_and_maps() {
        let cave = CaveGenerator::new(CaveParams {
            width: 12,
            height: 10,
            seed: Some("test".to_string()),
            ..CaveParams::default()
        })
        .unwrap()
        .generate()
        .unwrap();

        let path = std::env::temp_dir().join("cave_generator_export_test.txt");
        export_cave_file(&cave, &path.to_string_lossy()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(text.starts_with("=== CAVE GENERATOR MAP FILE ===\nSeed: test"));
        assert!(text.contains("=== MAP (Rooms View) ==="));
    }
}

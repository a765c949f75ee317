//! PNG previews of cave grids
//!
//! Debug visualisation only. Images are drawn with +y up, so pixel row 0
//! holds the highest grid row.

use image::{ImageBuffer, Rgb, RgbImage};

use crate::carve::line;
use crate::error::Result;
use crate::generator::CaveMap;
use crate::grid::{Cell, Grid};
use crate::regions::Coord;

const WALL_COLOR: [u8; 3] = [40, 36, 48];
const OPEN_COLOR: [u8; 3] = [214, 206, 186];
const PASSAGE_COLOR: [u8; 3] = [200, 40, 40];
const EDGE_COLOR: [u8; 3] = [90, 90, 90];

/// Distinct tint per room, cycling through a fixed palette
fn room_color(index: usize) -> [u8; 3] {
    const PALETTE: [[u8; 3]; 8] = [
        [141, 211, 199],
        [255, 255, 179],
        [190, 186, 218],
        [251, 128, 114],
        [128, 177, 211],
        [253, 180, 98],
        [179, 222, 105],
        [252, 205, 229],
    ];
    PALETTE[index % PALETTE.len()]
}

pub fn cell_color(cell: Cell) -> [u8; 3] {
    match cell {
        Cell::Wall => WALL_COLOR,
        Cell::Open => OPEN_COLOR,
    }
}

fn fill_cell(img: &mut RgbImage, grid_height: usize, x: usize, y: usize, scale: u32, color: [u8; 3]) {
    let px = x as u32 * scale;
    let py = (grid_height - 1 - y) as u32 * scale;
    for dy in 0..scale {
        for dx in 0..scale {
            img.put_pixel(px + dx, py + dy, Rgb(color));
        }
    }
}

/// Draw a grid into an image, `scale` pixels per cell.
pub fn grid_image(grid: &Grid, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let mut img: RgbImage = ImageBuffer::new(grid.width as u32 * scale, grid.height as u32 * scale);

    for (x, y, cell) in grid.iter() {
        fill_cell(&mut img, grid.height, x, y, scale, cell_color(*cell));
    }

    img
}

/// Export a grid as a two-colour PNG.
pub fn export_grid_png(grid: &Grid, scale: u32, path: &str) -> Result<()> {
    grid_image(grid, scale).save(path)?;
    Ok(())
}

/// Draw a finished cave with rooms tinted, edge tiles darkened and
/// passages traced over the top.
pub fn cave_image(cave: &CaveMap, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let grid = &cave.grid;
    let border = cave.params.border_size as i32;
    let mut img = grid_image(grid, scale);

    let paint = |img: &mut RgbImage, tile: Coord, color: [u8; 3]| {
        let (x, y) = (tile.x + border, tile.y + border);
        if grid.in_bounds(x, y) {
            fill_cell(img, grid.height, x as usize, y as usize, scale, color);
        }
    };

    for (index, room) in cave.rooms.rooms().iter().enumerate() {
        for &tile in &room.tiles {
            paint(&mut img, tile, room_color(index));
        }
        for &tile in &room.edge_tiles {
            paint(&mut img, tile, EDGE_COLOR);
        }
    }

    for passage in cave.rooms.passages() {
        for tile in line(passage.tile_a, passage.tile_b) {
            paint(&mut img, tile, PASSAGE_COLOR);
        }
    }

    img
}

/// Export the room and passage overlay as a PNG.
pub fn export_cave_preview(cave: &CaveMap, scale: u32, path: &str) -> Result<()> {
    cave_image(cave, scale).save(path)?;
    Ok(())
}

//! Debug tool for comparing smoothing settings visually
//! Renders one seed's random fill through several smoothing variants into a labelled sheet

use cave_generator::config::SmoothingMode;
use cave_generator::export::grid_image;
use cave_generator::grid::{self, Cell};
use cave_generator::seeds::CaveSeed;
use image::{ImageBuffer, Rgb, RgbImage};

const WIDTH: usize = 96;
const HEIGHT: usize = 64;
const FILL_PERCENT: u32 = 45;
const SCALE: u32 = 3;
const SEED: &str = "debug";
const OUTPUT: &str = "smoothing_comparison.png";

fn main() {
    println!("Generating smoothing comparison grid...");

    let seed = CaveSeed::from_text(SEED);
    let base = match grid::random_fill(WIDTH, HEIGHT, FILL_PERCENT, &seed) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Failed to fill grid: {}", e);
            std::process::exit(1);
        }
    };

    // (label, mode, iterations, threshold)
    let variants = [
        ("RAW FILL", SmoothingMode::InPlace, 0, 4),
        ("IN PLACE 1", SmoothingMode::InPlace, 1, 4),
        ("IN PLACE 5", SmoothingMode::InPlace, 5, 4),
        ("BUFFERED 1", SmoothingMode::Buffered, 1, 4),
        ("BUFFERED 5", SmoothingMode::Buffered, 5, 4),
        ("BUFFERED 10", SmoothingMode::Buffered, 10, 4),
        ("IN PLACE T3", SmoothingMode::InPlace, 5, 3),
        ("IN PLACE T5", SmoothingMode::InPlace, 5, 5),
        ("BUFFERED T5", SmoothingMode::Buffered, 5, 5),
    ];

    let mut images: Vec<(String, RgbImage)> = Vec::new();
    for (name, mode, iterations, threshold) in variants {
        let mut smoothed = base.clone();
        grid::smooth(&mut smoothed, iterations, threshold, mode);
        let open = smoothed.count(&Cell::Open);
        println!(
            "  {}: {} open cells ({:.1}%)",
            name,
            open,
            100.0 * open as f64 / smoothed.len() as f64
        );
        images.push((name.to_string(), grid_image(&smoothed, SCALE)));
    }

    let sheet = create_grid(&images, 3, 3);
    if let Err(e) = sheet.save(OUTPUT) {
        eprintln!("Failed to save {}: {}", OUTPUT, e);
        std::process::exit(1);
    }

    println!("Saved {}", OUTPUT);
}

fn create_grid(images: &[(String, RgbImage)], cols: usize, rows: usize) -> RgbImage {
    if images.is_empty() {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images[0].1.width();
    let cell_height = images[0].1.height();
    let label_height = 14u32;
    let gap = 4u32;
    let total_cell_width = cell_width + gap;
    let total_cell_height = cell_height + label_height + gap;

    let sheet_width = total_cell_width * cols as u32;
    let sheet_height = total_cell_height * rows as u32;
    let mut sheet: RgbImage = ImageBuffer::from_pixel(sheet_width, sheet_height, Rgb([20, 20, 24]));

    for (idx, (name, img)) in images.iter().enumerate() {
        let col = idx % cols;
        let row = idx / cols;
        if row >= rows {
            break;
        }

        let x_offset = col as u32 * total_cell_width;
        let y_offset = row as u32 * total_cell_height;

        for (x, y, pixel) in img.enumerate_pixels() {
            sheet.put_pixel(x_offset + x, y_offset + label_height + y, *pixel);
        }
        draw_text(&mut sheet, x_offset + 3, y_offset + 3, name);
    }

    sheet
}

/// 5x7 glyphs for the characters the labels use
fn glyph(c: char) -> [u8; 7] {
    match c {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
        _ => [0; 7],
    }
}

fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str) {
    let color = Rgb([230, 230, 230]);
    for (i, c) in text.chars().enumerate() {
        let cx = x + i as u32 * 6;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..5 {
                if bits & (0b10000 >> col) != 0 {
                    let (px, py) = (cx + col, y + row as u32);
                    if px < img.width() && py < img.height() {
                        img.put_pixel(px, py, color);
                    }
                }
            }
        }
    }
}

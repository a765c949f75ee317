use std::process::ExitCode;

use clap::Parser;

use cave_generator::ascii::{self, AsciiMode};
use cave_generator::config::{ExecutionMode, SmoothingMode};
use cave_generator::export;
use cave_generator::{CaveGenerator, CaveMap, CaveParams, Result};

#[derive(Parser, Debug)]
#[command(name = "cave_generator")]
#[command(about = "Generate procedural caves with cellular automata and marching squares")]
struct Args {
    /// Load parameters from a JSON file; flags below override it
    #[arg(short, long)]
    config: Option<String>,

    /// Width of the grid in cells, before the border
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the grid in cells, before the border
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Thickness of the wall frame around the finished grid
    #[arg(short, long)]
    border: Option<usize>,

    /// Seed text (a clock seed is used if not specified)
    #[arg(short, long)]
    seed: Option<String>,

    /// Ignore any configured seed and derive one from the clock
    #[arg(long)]
    random_seed: bool,

    /// Initial wall fill percentage (0-100)
    #[arg(short, long)]
    fill: Option<u32>,

    /// Number of smoothing passes (0-10)
    #[arg(short, long)]
    iterations: Option<u32>,

    /// Wall-neighbour threshold for smoothing (0-8)
    #[arg(short, long)]
    threshold: Option<u32>,

    /// Smooth from a copy of the grid instead of updating in place
    #[arg(long)]
    buffered: bool,

    /// Print the grid after every smoothing pass
    #[arg(long)]
    animate: bool,

    /// Delay between animation frames in milliseconds
    #[arg(long)]
    step_delay: Option<u64>,

    /// Print the finished grid as ASCII
    #[arg(long)]
    ascii: bool,

    /// Print the finished grid with rooms and passages labelled
    #[arg(long)]
    rooms: bool,

    /// Write a PNG preview with the room overlay (e.g., "cave.png")
    #[arg(long)]
    preview: Option<String>,

    /// Write the bare wall/open grid as a PNG (e.g., "grid.png")
    #[arg(long)]
    grid_png: Option<String>,

    /// Pixels per cell in the PNG images
    #[arg(long, default_value = "8")]
    preview_scale: u32,

    /// Write the summary and ASCII maps to a text file
    #[arg(long)]
    export_text: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Print the resolved parameters as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn resolve_params(args: &Args) -> Result<CaveParams> {
    let mut params = match &args.config {
        Some(path) => CaveParams::from_json_file(path)?,
        None => CaveParams::default(),
    };

    if let Some(width) = args.width {
        params.width = width;
    }
    if let Some(height) = args.height {
        params.height = height;
    }
    if let Some(border) = args.border {
        params.border_size = border;
    }
    if let Some(seed) = &args.seed {
        params.seed = Some(seed.clone());
        params.use_random_seed = false;
    }
    if args.random_seed {
        params.use_random_seed = true;
    }
    if let Some(fill) = args.fill {
        params.random_fill_percent = fill;
    }
    if let Some(iterations) = args.iterations {
        params.smoothing.iterations = iterations;
    }
    if let Some(threshold) = args.threshold {
        params.smoothing.wall_count_threshold = threshold;
    }
    if args.buffered {
        params.smoothing.mode = SmoothingMode::Buffered;
    }
    if args.animate {
        params.smoothing.execution = ExecutionMode::Cooperative;
    }
    if let Some(delay) = args.step_delay {
        params.smoothing.step_delay_ms = delay;
    }

    Ok(params)
}

fn run(args: &Args) -> Result<()> {
    let params = resolve_params(args)?;
    let generator = CaveGenerator::new(params)?;

    if args.dump_config {
        println!("{}", generator.params().to_json()?);
        return Ok(());
    }

    let cave = match generator.params().smoothing.execution {
        ExecutionMode::Blocking => generator.generate()?,
        ExecutionMode::Cooperative => animate(&generator)?,
    };

    print_summary(&cave);

    if args.ascii {
        println!();
        ascii::print_ascii_map(&cave.grid);
    }
    if args.rooms {
        println!();
        print!("{}", ascii::render(&cave, AsciiMode::Rooms));
    }

    if let Some(path) = &args.preview {
        export::export_cave_preview(&cave, args.preview_scale, path)?;
        println!("Preview saved to: {}", path);
    }
    if let Some(path) = &args.grid_png {
        export::export_grid_png(&cave.grid, args.preview_scale, path)?;
        println!("Grid image saved to: {}", path);
    }
    if let Some(path) = &args.export_text {
        ascii::export_cave_file(&cave, path)?;
        println!("Map file saved to: {}", path);
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&cave.summary())?);
    }

    Ok(())
}

/// Step through smoothing, printing each pass.
fn animate(generator: &CaveGenerator) -> Result<CaveMap> {
    let mut session = generator.begin()?;
    println!("Seed: {}", session.seed());
    println!("Initial fill:");
    ascii::print_ascii_map(session.grid());

    while let Some(step) = session.step() {
        std::thread::sleep(session.step_delay());
        println!();
        println!(
            "Smoothing pass {}/{}:",
            step.iteration,
            step.iteration + step.remaining
        );
        ascii::print_ascii_map(session.grid());

        let preview = session.preview_mesh();
        println!(
            "  Preview mesh: {} vertices, {} triangles",
            preview.vertex_count(),
            preview.mesh.triangle_count()
        );
    }

    session.finish()
}

fn print_summary(cave: &CaveMap) {
    let summary = cave.summary();
    let total = (summary.width * summary.height).max(1);

    println!("Generated cave with seed: {}", cave.seed);
    println!("Map size: {}x{} (border {})", summary.width, summary.height, cave.params.border_size);
    println!(
        "Open cells: {} ({:.1}%)",
        summary.open_cells,
        100.0 * summary.open_cells as f64 / total as f64
    );
    println!("Rooms: {} joined by {} passages", summary.rooms, summary.passages);
    println!(
        "Floor mesh: {} vertices, {} triangles",
        summary.floor_vertices, summary.floor_triangles
    );
    println!(
        "Walls: {} outlines, {} triangles",
        summary.outlines, summary.wall_triangles
    );
}

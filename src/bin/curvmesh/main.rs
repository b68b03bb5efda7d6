//! curvmesh CLI - mesh curvature and boundary inspection tool.
//!
//! Usage: curvmesh [OPTIONS] <COMMAND> <INPUT>...
//!
//! Run `curvmesh --help` for available commands.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use curvmesh::prelude::*;

#[derive(Parser)]
#[command(name = "curvmesh")]
#[command(author, version, about = "Mesh curvature and boundary inspection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Curvature magnitude (radians) a vertex must exceed to be an extremum
    #[arg(short, long, global = true, default_value = "0.05")]
    threshold: f64,

    /// Run per-element passes on all cores
    #[arg(long, global = true)]
    parallel: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh files; unreadable ones are skipped
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Show curvature statistics
        #[arg(long)]
        curvature: bool,
    },

    /// List vertices classified as curvature extrema
    Extrema {
        /// Input mesh file
        input: PathBuf,
    },

    /// Print each boundary loop as an ordered list of points
    Loops {
        /// Input mesh file
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::new()
        .parse_filters(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let options = AttributeOptions::default()
        .with_extremum_threshold(cli.threshold)
        .with_parallel(cli.parallel);
    options.validate()?;

    match cli.command {
        Commands::Info { inputs, curvature } => cmd_info(&inputs, curvature, &options),
        Commands::Extrema { input } => cmd_extrema(&input, &options),
        Commands::Loops { input } => cmd_loops(&input, &options),
    }
}

fn cmd_info(inputs: &[PathBuf], show_curvature: bool, options: &AttributeOptions) -> Result<()> {
    let (loaded, last_error) = SurfaceMesh::<u32>::load_all(inputs, options);

    for (i, (path, surface)) in loaded.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_info(path, surface, show_curvature);
    }

    match (loaded.is_empty(), last_error) {
        (true, Some(e)) => Err(e),
        _ => Ok(()),
    }
}

fn print_info(input: &Path, surface: &SurfaceMesh, show_curvature: bool) {
    let mesh = surface.mesh();

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());
    println!("Surface area: {:.6}", mesh.surface_area());

    let bbox = surface.bounding_box();
    let (min, max) = (bbox.min, bbox.max);
    println!(
        "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );
    let center = surface.bounds_center();
    println!("Center: ({:.3}, {:.3}, {:.3})", center.x, center.y, center.z);
    println!("Diagonal: {:.6}", surface.bounds_diagonal());

    let loops = surface.boundary_loops();
    if loops.is_empty() {
        println!("Topology: Closed (no boundary)");
    } else {
        let boundary_edges: usize = loops.iter().map(BoundaryLoop::len).sum();
        println!(
            "Topology: Open ({} boundary loops, {} boundary edges)",
            loops.len(),
            boundary_edges
        );
    }
    println!("Euler characteristic: {}", mesh.euler_characteristic());

    let degenerate = surface.attributes().degenerate_faces();
    if degenerate > 0 {
        println!("Degenerate faces: {}", degenerate);
    }

    if show_curvature {
        let stats = surface.curvature_stats();
        println!("\nCurvature:");
        println!(
            "  Gaussian: min={:.4}, max={:.4}, avg={:.4}",
            stats.min, stats.max, stats.mean
        );
        println!("  Extrema: {} maxima, {} minima", stats.maxima, stats.minima);
        println!(
            "  Gauss-Bonnet Euler characteristic: {:.2}",
            surface.gauss_bonnet_estimate()
        );
    }
}

fn cmd_extrema(input: &Path, options: &AttributeOptions) -> Result<()> {
    let surface: SurfaceMesh = SurfaceMesh::load(input, options)?;

    for v in surface.mesh().vertex_ids() {
        let class = surface.extremum(v);
        if !class.is_extremum() {
            continue;
        }
        let p = surface.position(v);
        println!(
            "{}\t{:+}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
            v.index(),
            class.value(),
            surface.curvature(v),
            p.x,
            p.y,
            p.z
        );
    }
    Ok(())
}

fn cmd_loops(input: &Path, options: &AttributeOptions) -> Result<()> {
    let surface: SurfaceMesh = SurfaceMesh::load(input, options)?;
    let mesh = surface.mesh();

    for (i, boundary) in surface.boundary_loops().iter().enumerate() {
        println!(
            "loop {}: {} edges, perimeter {:.6}",
            i,
            boundary.len(),
            boundary.perimeter(mesh)
        );
        for p in boundary.points(mesh) {
            println!("  {:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
    }
    Ok(())
}

//! msii CLI - per-vertex sphere intersection descriptors.
//!
//! Usage: msii <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `msii --help` for available commands. Log verbosity follows
//! `RUST_LOG` (default `info`).

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use msii::algo::batch::{compute_with_progress, BatchOptions};
use msii::algo::{Descriptor, Progress};
use msii::io;
use msii::mesh::Mesh;

#[derive(Parser)]
#[command(name = "msii")]
#[command(author, version, about = "Multi-scale integral invariants CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Evaluate a descriptor at every vertex
    Compute {
        /// Input mesh file
        input: PathBuf,

        /// Output file: PLY with per-vertex quality, or text for intersections
        output: PathBuf,

        /// Sphere radius
        #[arg(short, long)]
        radius: f64,

        /// Descriptor to evaluate
        #[arg(
            short,
            long,
            value_parser = descriptor_parser(),
            default_value_t = Descriptor::SphereVolume
        )]
        descriptor: Descriptor,

        /// Interpret the radius as a multiple of the mean edge length
        #[arg(long)]
        relative: bool,

        /// Number of worker threads (default: all cores)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Vertices per work chunk
        #[arg(long, default_value = "1024")]
        chunk_size: usize,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

/// Accept exactly the descriptor names the library defines.
fn descriptor_parser() -> impl TypedValueParser<Value = Descriptor> {
    PossibleValuesParser::new(Descriptor::ALL.map(|d| d.name()))
        .try_map(|name| name.parse::<Descriptor>())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Compute {
            input,
            output,
            radius,
            descriptor,
            relative,
            threads,
            chunk_size,
            sequential,
        } => {
            let mesh: Mesh = io::load(&input)?;
            let radius = if relative {
                radius * mesh.mean_edge_length()
            } else {
                radius
            };

            let mut options = BatchOptions::new(radius, descriptor)
                .with_chunk_size(chunk_size)
                .with_parallel(!sequential);
            if let Some(threads) = threads {
                options = options.with_threads(threads);
            }
            cmd_compute(&mesh, &output, &options)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that draws a bar on stderr.
fn create_progress() -> Progress {
    let shown = AtomicUsize::new(0);

    Progress::new(move |done, total, message| {
        if total == 0 {
            return;
        }
        let percent = (done * 100) / total;

        // Redraw only when the percentage grows; chunks finish out of order.
        let previous = shown.fetch_max(percent + 1, Ordering::Relaxed);
        if previous > percent {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            percent,
            message
        );
        let _ = std::io::stderr().flush();

        if done >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: Mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Triangles: {}", mesh.num_triangles());
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    println!("Mean edge length: {:.6}", mesh.mean_edge_length());

    let non_manifold = mesh.num_non_manifold_edges();
    if non_manifold > 0 {
        println!("Topology: Non-manifold ({} edges)", non_manifold);
    } else if mesh.is_closed() {
        println!("Topology: Closed (no boundary)");
    } else {
        let boundary = mesh.edge_ids().filter(|&e| mesh.is_boundary_edge(e)).count();
        println!("Topology: Open ({} boundary edges)", boundary);
    }

    Ok(())
}

fn cmd_compute(
    mesh: &Mesh,
    output: &Path,
    options: &BatchOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "Loaded: {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    let mode = if options.parallel { "parallel" } else { "sequential" };
    println!(
        "Evaluating {} (radius={}, {})...",
        options.descriptor, options.radius, mode
    );

    let progress = create_progress();
    let start = Instant::now();
    let result = compute_with_progress(mesh, options, &progress)?;
    let elapsed = start.elapsed();

    if !result.failures().is_empty() {
        warn!(
            failures = result.failures().len(),
            "some vertices could not be evaluated"
        );
    }

    match result.scalars() {
        Some(values) => io::ply::save_quality(mesh, &values, output)?,
        None => io::save_intersections(output, result.points())?,
    }
    info!(output = %output.display(), "results written");
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

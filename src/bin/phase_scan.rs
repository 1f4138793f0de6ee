// src/bin/phase_scan.rs - (p, K) grid sweep of the spin-glass phase diagram

use std::path::PathBuf;

use clap::Parser;
use csv::WriterBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use mkscan::boundary::{scan_grid_with, GridSpec};
use mkscan::rg::RgMode;
use mkscan::trajectory::TrajectoryConfig;

#[derive(Parser)]
struct Cli {
    /// Probability of a +J bond, lower end of the scan
    #[arg(long, default_value = "0.5")]
    p_min: f64,

    /// Probability of a +J bond, upper end of the scan
    #[arg(long, default_value = "1.0")]
    p_max: f64,

    #[arg(long, default_value = "11")]
    p_steps: usize,

    /// Dimensionless coupling K = J/T, lower end of the scan
    #[arg(long, default_value = "0.02")]
    k_min: f64,

    /// Dimensionless coupling K = J/T, upper end of the scan
    #[arg(long, default_value = "2.0")]
    k_max: f64,

    #[arg(long, default_value = "40")]
    k_steps: usize,

    /// Quenched samples per generation
    #[arg(long, short, default_value = "1000")]
    size: usize,

    /// Operation ordering: bd (bond-move first) or db (decimate first)
    #[arg(long, default_value = "bd")]
    mode: String,

    /// RG iteration budget per trajectory
    #[arg(long, default_value = "30")]
    max_iters: usize,

    /// Master seed; every grid point derives its own stream from it
    #[arg(long, default_value = "19")]
    seed: u64,

    #[arg(long, default_value = "phase_diagram.csv")]
    output: PathBuf,

    #[arg(long, default_value = "phase_boundaries.csv")]
    boundaries: PathBuf,
}

fn parse_mode(mode: &str) -> RgMode {
    match mode {
        "bd" => RgMode::BondFirst,
        "db" => RgMode::DecimateFirst,
        other => {
            eprintln!("unknown mode `{other}` (expected bd or db)");
            std::process::exit(2);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let grid = GridSpec {
        p_min: cli.p_min,
        p_max: cli.p_max,
        p_steps: cli.p_steps,
        k_min: cli.k_min,
        k_max: cli.k_max,
        k_steps: cli.k_steps,
    };
    let base = TrajectoryConfig {
        lattice_size: cli.size,
        mode: parse_mode(&cli.mode),
        max_iterations: cli.max_iters,
        ..TrajectoryConfig::default()
    };

    println!(
        "Scanning {} x {} grid | N = {}, mode = {}, budget = {} iterations",
        cli.p_steps, cli.k_steps, cli.size, cli.mode, cli.max_iters
    );

    // Progress bar counts (p, K) grid points.
    let bar = ProgressBar::new((cli.p_steps * cli.k_steps) as u64);
    bar.set_style(
        ProgressStyle::with_template(" {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]")
            .unwrap(),
    );

    let diagram = scan_grid_with(&grid, &base, cli.seed, |_| bar.inc(1))
        .unwrap_or_else(|err| {
            eprintln!("scan failed: {err}");
            std::process::exit(1);
        });
    bar.finish();

    // ---------------------------------------------------------------------
    // Write CSVs (points already in deterministic p-major order)
    // ---------------------------------------------------------------------
    let mut wtr = WriterBuilder::new()
        .from_path(&cli.output)
        .expect("cannot create the phase-diagram CSV");
    wtr.write_record(["p", "coupling", "phase", "iterations"]).unwrap();
    for point in &diagram.points {
        wtr.write_record(&[
            point.p.to_string(),
            point.coupling.to_string(),
            point.label.as_str().to_string(),
            point.iterations.to_string(),
        ])
        .unwrap();
    }
    wtr.flush().unwrap();

    let edges = diagram.boundaries();
    let mut wtr = WriterBuilder::new()
        .from_path(&cli.boundaries)
        .expect("cannot create the boundary CSV");
    wtr.write_record(["p", "coupling", "from", "to"]).unwrap();
    for edge in &edges {
        wtr.write_record(&[
            edge.p.to_string(),
            edge.coupling.to_string(),
            edge.from.as_str().to_string(),
            edge.to.as_str().to_string(),
        ])
        .unwrap();
    }
    wtr.flush().unwrap();

    println!(
        "Scan complete → {} ({} boundary segments → {})",
        cli.output.display(),
        edges.len(),
        cli.boundaries.display()
    );
}

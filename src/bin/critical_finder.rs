// src/bin/critical_finder.rs - bracket and bisect one phase boundary
//
// Vertical search: walk the temperature down at fixed p until the phase
// stops being disordered, then bisect the coupling inside the bracket.
// Horizontal search: walk p down at fixed temperature until the phase stops
// being ferromagnetic, then bisect p.

use clap::Parser;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64;

use mkscan::boundary::{bisect_coupling, bisect_probability};
use mkscan::rg::RgMode;
use mkscan::trajectory::{run_trajectory, PhaseLabel, TrajectoryConfig};

#[derive(Parser)]
struct Cli {
    /// Search direction: vertical (along T at fixed p) or horizontal
    /// (along p at fixed T)
    #[arg(long, default_value = "vertical")]
    direction: String,

    /// Probability of a +J bond (fixed in a vertical search, the walk
    /// start in a horizontal one)
    #[arg(long, default_value = "1.0")]
    p: f64,

    /// Starting temperature T = 1/K for the vertical walk
    #[arg(long, default_value = "30.0")]
    t_start: f64,

    /// Fixed temperature for the horizontal search
    #[arg(long, default_value = "2.0")]
    t_fixed: f64,

    /// Bisection tolerance (in K for vertical, in p for horizontal)
    #[arg(long, default_value = "1e-3")]
    tol: f64,

    /// Quenched samples per generation
    #[arg(long, short, default_value = "1000")]
    size: usize,

    /// Operation ordering: bd or db
    #[arg(long, default_value = "bd")]
    mode: String,

    /// RG iteration budget per trajectory
    #[arg(long, default_value = "30")]
    max_iters: usize,

    #[arg(long, default_value = "19")]
    seed: u64,
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

fn label_at(base: &TrajectoryConfig, p: f64, k: f64, seed: u64) -> PhaseLabel {
    let mut cfg = base.clone();
    cfg.p = p;
    cfg.coupling = k;
    cfg.seed = seed;
    run_trajectory(&cfg)
        .unwrap_or_else(|err| {
            eprintln!("trajectory at (p = {p}, K = {k}) failed: {err}");
            std::process::exit(1);
        })
        .label
}

fn main() {
    let cli = Cli::parse();
    let base = TrajectoryConfig {
        lattice_size: cli.size,
        mode: parse_mode(&cli.mode),
        max_iterations: cli.max_iters,
        ..TrajectoryConfig::default()
    };
    let mut seeder = Pcg64::seed_from_u64(cli.seed);

    println!("=== CRITICAL POINT FINDER ===");
    println!(
        "direction = {}, N = {}, mode = {}, tol = {}",
        cli.direction, cli.size, cli.mode, cli.tol
    );

    match cli.direction.as_str() {
        "vertical" => {
            // Bracket: step T down until the disordered phase is lost.
            println!("\nInitial search at p = {}:", cli.p);
            let mut t_high = cli.t_start;
            let mut t = cli.t_start;
            let mut label = PhaseLabel::Disordered;
            for _ in 0..100 {
                label = label_at(&base, cli.p, 1.0 / t, seeder.next_u64());
                println!("  T = {t:.4} → {}", label.as_str());
                if label != PhaseLabel::Disordered {
                    break;
                }
                t_high = t;
                t = if t > 1.5 { t - 1.0 } else { t / 2.0 };
            }
            if label == PhaseLabel::Disordered {
                eprintln!(
                    "walk never left the disordered phase; lower --t-start or raise --max-iters"
                );
                std::process::exit(1);
            }
            let t_low = t;
            println!("bracket: T ∈ [{t_low:.4}, {t_high:.4}]");

            // Low T is strong coupling, so the K bracket is reversed.
            let mut fixed = base.clone();
            fixed.p = cli.p;
            let k_c = bisect_coupling(&fixed, 1.0 / t_high, 1.0 / t_low, cli.tol, seeder.next_u64())
                .unwrap_or_else(|err| {
                    eprintln!("bisection failed: {err}");
                    std::process::exit(1);
                });
            println!("\nCritical point: K_c = {:.5}, T_c = {:.4}", k_c, 1.0 / k_c);
        }
        "horizontal" => {
            // Bracket: step p down until the ferromagnet is lost.
            let k = 1.0 / cli.t_fixed;
            println!("\nInitial search at T = {} (K = {k:.4}):", cli.t_fixed);
            let mut p_hi = cli.p;
            let mut p = cli.p;
            let mut label = PhaseLabel::Ferromagnetic;
            for _ in 0..100 {
                label = label_at(&base, p, k, seeder.next_u64());
                println!("  p = {p:.4} → {}", label.as_str());
                if label != PhaseLabel::Ferromagnetic {
                    break;
                }
                p_hi = p;
                if p == 0.0 {
                    break;
                }
                p = (p - 0.1).max(0.0);
            }
            if label == PhaseLabel::Ferromagnetic {
                eprintln!(
                    "walk never left the ferromagnetic phase; lower --t-fixed or start lower in p"
                );
                std::process::exit(1);
            }
            let p_lo = p;
            println!("bracket: p ∈ [{p_lo:.4}, {p_hi:.4}]");

            let mut fixed = base.clone();
            fixed.coupling = k;
            let p_c = bisect_probability(&fixed, p_lo, p_hi, cli.tol, seeder.next_u64())
                .unwrap_or_else(|err| {
                    eprintln!("bisection failed: {err}");
                    std::process::exit(1);
                });
            println!("\nCritical point: p_c = {p_c:.5} at T = {}", cli.t_fixed);
        }
        other => {
            eprintln!("unknown direction `{other}` (expected vertical or horizontal)");
            std::process::exit(2);
        }
    }
}

use std::path::{Path, PathBuf};

use clap::Parser;
use cut_planner::engine::{MaterialReport, PackOutcome, pack_material, plan_quotes};
use cut_planner::model::{Material, PackRequest, PieceRequest, PlanRequest};
use cut_planner::render;
use cut_planner::solver::{DEFAULT_MAX_PIECES, PackOptions};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "cut_planner",
    about = "Sheet and linear stock cutting planner"
)]
struct Cli {
    /// JSON file with `materials` and `quotes`; replaces the flags below
    #[arg(long, conflicts_with_all = ["sheet", "stock_length", "pieces"])]
    input: Option<PathBuf>,

    /// Material name used for bin identifiers
    #[arg(long, default_value = "sheet")]
    material: String,

    /// Sheet size in meters (WxH, e.g. 1.83x2.44)
    #[arg(long, conflicts_with = "stock_length")]
    sheet: Option<String>,

    /// Linear stock length in meters (e.g. 6)
    #[arg(long)]
    stock_length: Option<f64>,

    /// Pieces as id:WxH:qty for sheets or id:L:qty for linear stock
    #[arg(long = "piece", num_args = 1..)]
    pieces: Vec<String>,

    /// Blade kerf in mm (default: 0)
    #[arg(long, default_value_t = 0)]
    kerf: u32,

    /// Disable piece rotation (grained material)
    #[arg(long)]
    no_rotate: bool,

    /// Refuse runs with more expanded pieces than this
    #[arg(long, default_value_t = DEFAULT_MAX_PIECES)]
    max_pieces: usize,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Show ASCII layout of each sheet
    #[arg(long)]
    layout: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_number(s: &str, what: &str, whole: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("invalid {what} in '{whole}'"))
}

fn parse_dimensions(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    Ok((
        parse_number(parts[0], "width", s)?,
        parse_number(parts[1], "height", s)?,
    ))
}

fn parse_piece(s: &str, linear: bool) -> Result<PieceRequest, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("invalid piece '{}', expected id:WxH:qty", s));
    }
    let qty = parts[2]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if linear {
        let length = parse_number(parts[1], "length", s)?;
        Ok(PieceRequest::linear(parts[0], length, qty))
    } else {
        let (w, h) = parse_dimensions(parts[1])?;
        Ok(PieceRequest::new(parts[0], w, h, qty))
    }
}

fn build_request(cli: &Cli) -> Result<PackRequest, String> {
    let material = match (&cli.sheet, cli.stock_length) {
        (Some(sheet), None) => {
            let (w, h) = parse_dimensions(sheet)?;
            Material::sheet(&cli.material, w, h).with_rotation(!cli.no_rotate)
        }
        (None, Some(length)) => Material::linear(&cli.material, length),
        _ => return Err("one of --sheet, --stock-length or --input is required".to_string()),
    };
    let linear = cli.stock_length.is_some();
    let pieces = cli
        .pieces
        .iter()
        .map(|p| parse_piece(p, linear))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PackRequest { material, pieces })
}

fn load_plan(path: &Path) -> Result<PlanRequest, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid plan {}: {}", path.display(), e))
}

fn print_outcome(material: &str, outcome: &PackOutcome, layout: bool) {
    match outcome {
        PackOutcome::Sheet(result) => {
            for bin in &result.bins {
                println!("Sheet {} ({}m x {}m):", bin.bin_id, bin.width, bin.height);
                for p in &bin.placements {
                    let rot = if p.rotated { " [rotated]" } else { "" };
                    println!(
                        "  {} {}x{} @ ({}, {}){}",
                        p.piece_id, p.width, p.height, p.x, p.y, rot
                    );
                }
                if layout {
                    print!("{}", render::render_bin(bin));
                }
                println!();
            }
            for r in &result.rejected_pieces {
                println!("  rejected {} {}x{}: {}", r.piece_id, r.width, r.height, r.reason);
            }
            println!(
                "Summary {}: {} sheet{} used, {:.1}% waste",
                material,
                result.bin_count,
                if result.bin_count == 1 { "" } else { "s" },
                result.waste_percent,
            );
        }
        PackOutcome::Linear(result) => {
            for b in &result.breakdown {
                println!(
                    "  {} {}m x {} = {}m",
                    b.piece_id, b.unit_length, b.quantity, b.subtotal_length
                );
            }
            println!(
                "Summary {}: {}m required, {} unit{} of {}m",
                material,
                result.total_length,
                result.units_needed,
                if result.units_needed == 1 { "" } else { "s" },
                result.stock_length,
            );
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let options = PackOptions {
        kerf: cli.kerf,
        max_pieces: Some(cli.max_pieces),
        time_limit: None,
    };

    let reports: Vec<MaterialReport> = match &cli.input {
        Some(path) => {
            let plan = load_plan(path).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            plan_quotes(&plan, &options)
        }
        None => {
            let request = build_request(&cli).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            vec![MaterialReport {
                material: request.material.name.clone(),
                outcome: pack_material(&request, &options),
            }]
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        for report in &reports {
            match &report.outcome {
                Ok(outcome) => print_outcome(&report.material, outcome, cli.layout),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
    }

    if reports.iter().any(|r| r.outcome.is_err()) {
        std::process::exit(1);
    }
}

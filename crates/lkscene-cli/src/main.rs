//! lkscene CLI - LK shading scene exporter
//!
//! Reads a scene `.json` file and produces the script the shading tool loads.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lkscene::{export_scene, validate_inputs, ExportRequest, LkConfig};
use lkscene_geom::Geometry;
use lkscene_ir::{SceneFile, SceneGeometry};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lkscene")]
#[command(about = "Export panels, buildings and trees to an LK scene script", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the scene script, optionally writing it to disk
    Generate(GenerateArgs),
    /// Validate a scene file without generating anything
    Check {
        /// Input scene .json file
        input: PathBuf,
    },
    /// Display information about a scene file
    Info {
        /// Input scene .json file
        input: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Input scene .json file
    input: PathBuf,
    /// Output file (default: 3DShading.lk)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Write the output file
    #[arg(long)]
    write: bool,
    /// TOML config file with an [output] section
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the generated script to stdout
    #[arg(long)]
    print: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut stdout = std::io::stdout().lock();
    let ok = match cli.command {
        Commands::Generate(args) => generate(&args, &mut stdout)?,
        Commands::Check { input } => check(&input, &mut stdout)?,
        Commands::Info { input } => {
            show_info(&input, &mut stdout)?;
            true
        }
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scene_file(path: &Path) -> Result<SceneFile> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    SceneFile::from_json(&json)
        .with_context(|| format!("failed to parse scene file {}", path.display()))
}

fn load_scene(path: &Path) -> Result<SceneGeometry> {
    Ok(load_scene_file(path)?.to_geometry())
}

/// Run one export. Prints the written path or the sentinel; on invalid
/// input prints the placeholder and returns `false`.
fn generate(args: &GenerateArgs, out: &mut impl Write) -> Result<bool> {
    let config = match &args.config {
        Some(path) => LkConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LkConfig::default(),
    }
    .with_overrides(args.output.clone(), args.write);
    debug!(?config, "resolved configuration");

    let scene = load_scene(&args.input)?;
    let request = ExportRequest::new(&scene.trees, &scene.arrays, &scene.buildings, &config);
    let report = export_scene(&request).context("failed to write scene script")?;

    if args.print {
        write!(out, "{}", report.script)?;
    }

    match &report.validation {
        Ok(stats) => {
            eprintln!("Generated {stats}");
            writeln!(out, "{}", report.output)?;
            Ok(true)
        }
        Err(e) => {
            if !args.print {
                writeln!(out, "{}", report.script)?;
            }
            eprintln!("Error: {e}");
            Ok(false)
        }
    }
}

fn check(input: &Path, out: &mut impl Write) -> Result<bool> {
    let scene = load_scene(input)?;
    match validate_inputs(&scene.trees, &scene.arrays, &scene.buildings) {
        Ok(valid) => {
            writeln!(
                out,
                "OK: {} trees, {} arrays, {} buildings",
                valid.trees.len(),
                valid.arrays.len(),
                valid.buildings.len()
            )?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "Invalid: {e}")?;
            Ok(false)
        }
    }
}

fn show_info(input: &Path, out: &mut impl Write) -> Result<()> {
    let file = load_scene_file(input)?;
    let scene = file.to_geometry();

    writeln!(out, "lkscene file: {}", input.display())?;
    writeln!(out, "  Version: {}", file.version)?;
    for (label, items) in [
        ("Trees", &scene.trees),
        ("Arrays", &scene.arrays),
        ("Buildings", &scene.buildings),
    ] {
        writeln!(out, "  {}: {}", label, items.len())?;
        for (kind, count) in count_types(items) {
            writeln!(out, "    {kind}: {count}")?;
        }
    }

    let boxes: Vec<_> = scene.buildings.iter().filter_map(Geometry::as_box).collect();
    if let Some((first, rest)) = boxes.split_first() {
        let (mut min, mut max) = first.bounding_box();
        for b in rest {
            let (lo, hi) = b.bounding_box();
            min = min.inf(&lo);
            max = max.sup(&hi);
        }
        writeln!(out, "\nBuilding extents:")?;
        writeln!(out, "  Min: ({:.3}, {:.3}, {:.3})", min.x, min.y, min.z)?;
        writeln!(out, "  Max: ({:.3}, {:.3}, {:.3})", max.x, max.y, max.z)?;
    }

    Ok(())
}

fn count_types(items: &[Geometry]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for g in items {
        *counts.entry(g.type_name()).or_insert(0) += 1;
    }
    counts
}

// Copyright 2026 The Gradgen Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use gradgen_engine::{Parameters, Solution, SolverConfig, generate_with_config, solve};

/// Lay out microfluidic concentration gradient generators.
#[derive(Parser)]
#[command(name = "gradgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about, long_about = None)]
struct Cli {
    /// Log filter (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a parameter file without solving it
    Validate(InputArgs),
    /// Solve flows and meander lengths and print them per layer
    Solve(SolveArgs),
    /// Generate the device outline as SVG
    Generate(GenerateArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Parameter file (JSON)
    params: PathBuf,
}

#[derive(Args)]
struct SolveArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Print the full solution as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Where to write the SVG; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write only the path data instead of a full SVG document
    #[arg(long)]
    path_only: bool,

    /// Also rasterize the outline to this PNG file
    #[arg(long)]
    png: Option<PathBuf>,

    /// Width of the PNG in pixels
    #[arg(long, requires = "png")]
    png_width: Option<u32>,
}

fn load_params(path: &Path) -> Result<Parameters> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read parameters from {}", path.display()))?;
    Parameters::from_json(&contents)
        .with_context(|| format!("failed to parse parameters in {}", path.display()))
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

fn validate(args: InputArgs) -> Result<()> {
    let params = load_params(&args.params)?;
    params.validate()?;
    println!("ok");
    Ok(())
}

fn solution_table(solution: &Solution) -> String {
    let mut out = String::new();
    let network = &solution.network;
    for (k, (channels, dims)) in network
        .meanders
        .iter()
        .zip(solution.meanders.iter())
        .enumerate()
    {
        out.push_str(&format!("layer {k}\n"));
        out.push_str("  meander  length_mm  flow_nl_s  concentration  width_mm  height_mm  turns\n");
        for (m, (channel, dim)) in channels.iter().zip(dims.iter()).enumerate() {
            out.push_str(&format!(
                "  {:>7}  {:>9.4}  {:>9.4}  {:>13.4}  {:>8.4}  {:>9.4}  {:>5}\n",
                m,
                channel.length * 1e3,
                channel.flow_rate * 1e12,
                channel.concentration,
                dim.width * 1e3,
                dim.height * 1e3,
                dim.turns
            ));
        }
    }
    out.push_str("outlets\n");
    for (o, outlet) in network.outlets.iter().enumerate() {
        out.push_str(&format!(
            "  {:>7}  flow_nl_s {:.4}  concentration {:.4}\n",
            o,
            outlet.flow_rate * 1e12,
            outlet.concentration
        ));
    }
    out
}

fn run_solve(args: SolveArgs) -> Result<()> {
    let params = load_params(&args.input.params)?;
    let solution = solve(&params, &SolverConfig::default())?;
    let report = if args.json {
        serde_json::to_string_pretty(&solution)?
    } else {
        solution_table(&solution)
    };
    write_output(None, report.trim_end())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let params = load_params(&args.input.params)?;
    let design = generate_with_config(&params, &SolverConfig::default())?;

    let svg = if args.path_only {
        gradgen_engine::svg_path_data(&design.paths)
    } else {
        design.to_svg()
    };
    write_output(args.output.as_deref(), &svg)?;
    if let Some(path) = args.output.as_deref() {
        info!("wrote {}", path.display());
    }

    if let Some(png) = args.png.as_deref() {
        write_png(&design, png, args.png_width)?;
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(design: &gradgen_engine::Design, path: &Path, width: Option<u32>) -> Result<()> {
    use gradgen_engine::render::png::{PngRenderOpts, render_png};

    let opts = PngRenderOpts {
        width,
        ..PngRenderOpts::default()
    };
    let bytes = render_png(design, &opts).map_err(anyhow::Error::msg)?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(not(feature = "png"))]
fn write_png(_design: &gradgen_engine::Design, _path: &Path, _width: Option<u32>) -> Result<()> {
    anyhow::bail!("PNG output requires building gradgen with the `png` feature")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env = env_logger::Env::default().default_filter_or(cli.log_level.as_str());
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Validate(args) => validate(args),
        Commands::Solve(args) => run_solve(args),
        Commands::Generate(args) => run_generate(args),
    }
}

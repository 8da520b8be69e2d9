//! Compile a shape recipe and inspect or export the result.
//!
//! Usage:
//! - `csg-recipe check <FILE|->`
//! - `csg-recipe export <FILE|-> [--format stl|stl-binary|obj] [--out DIR] [--json]`
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use csg_recipe::{
    CompileOptions, ExportEnvelope, ExportFormat, MeshKernel, Pipeline, Recipe, UnitPolicy,
    export_geometry,
};
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "csg-recipe", version)]
#[command(about = "Compile JSON shape recipes into solid meshes")]
struct Cli {
    #[command(flatten)]
    limits: Limits,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug, Clone)]
struct Limits {
    /// refuse recipes with more nodes than this
    #[arg(long, global = true, env = "CSG_RECIPE_MAX_NODES", default_value_t = csg_recipe::recipe::pipeline::MAX_NODES)]
    max_nodes: usize,

    /// refuse spheres and cylinders requesting more segments than this
    #[arg(long, global = true, env = "CSG_RECIPE_MAX_SEGMENTS")]
    max_segments: Option<u32>,

    /// scale coordinates from the recipe's `units` to millimeters
    #[arg(long, global = true, env = "CSG_RECIPE_SCALE_UNITS")]
    scale_units: bool,
}

impl Limits {
    fn options(&self) -> CompileOptions {
        CompileOptions {
            max_nodes: self.max_nodes,
            max_segments: self.max_segments,
            units: if self.scale_units {
                UnitPolicy::ScaleToMillimeters
            } else {
                UnitPolicy::Informational
            },
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate and compile a recipe, then print its statistics
    Check {
        /// recipe file, or `-` for stdin
        input: String,
    },
    /// compile a recipe and write it as a mesh file
    Export {
        /// recipe file, or `-` for stdin
        input: String,

        #[arg(long, default_value_t = ExportFormat::Stl)]
        format: ExportFormat,

        /// directory the file is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// print a JSON envelope with base64 contents instead of writing a file
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport<'a> {
    name: Option<&'a str>,
    units: &'static str,
    node_count: usize,
    bounding_box: [[f64; 3]; 2],
    polygons: usize,
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read recipe from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
    }
}

fn write_file(dir: &Path, filename: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(filename);
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let pipeline = Pipeline::new(MeshKernel).with_options(cli.limits.options());

    match cli.cmd {
        Command::Check { input } => {
            let recipe: Recipe = read_input(&input)?.parse()?;
            let result = pipeline.compile(&recipe)?;
            let report = CheckReport {
                name: recipe.name.as_deref(),
                units: recipe.units.as_str(),
                node_count: result.node_count,
                bounding_box: result.bounding_box.to_array(),
                polygons: result.geometry.polygons.len(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        },
        Command::Export { input, format, out, json } => {
            let recipe: Recipe = read_input(&input)?.parse()?;
            let result = pipeline.compile(&recipe)?;
            let file = export_geometry(&result.geometry, format, recipe.name.as_deref())?;
            if json {
                let envelope = ExportEnvelope::new(format, &file, result.stats());
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else {
                let path = write_file(&out, &file.filename, &file.bytes)?;
                info!(path = %path.display(), bytes = file.bytes.len(), "wrote {}", file.mime);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};
use walkdir::WalkDir;

use glam::Vec3;

use apotheneum::{
    synth::{self, SynthOptions},
    FixtureNode, Geometry, Shape, Side, Topology,
};

/// Shape selector on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ShapeArg {
    Cube,
    Cylinder,
}

impl From<ShapeArg> for Shape {
    fn from(s: ShapeArg) -> Self {
        match s {
            ShapeArg::Cube => Shape::Cube,
            ShapeArg::Cylinder => Shape::Cylinder,
        }
    }
}

impl std::fmt::Display for ShapeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Shape::from(*self))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideArg {
    Exterior,
    Interior,
}

impl From<SideArg> for Side {
    fn from(s: SideArg) -> Self {
        match s {
            SideArg::Exterior => Side::Exterior,
            SideArg::Interior => Side::Interior,
        }
    }
}

impl std::fmt::Display for SideArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Side::from(*self))
    }
}

#[derive(Parser, Debug)]
#[command(name = "apothectl", version, about = "Generate, inspect and validate Apotheneum fixture files")]
struct Args {
    /// JSON file with geometry overrides; missing fields keep the built-in values
    #[arg(long, global = true, env = "APOTHENEUM_GEOMETRY")]
    geometry: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a synthetic installation fixture.
    Generate {
        #[arg(long)]
        out: PathBuf,

        /// Leave out the interior layer of both shapes
        #[arg(long, default_value_t = false)]
        no_interior: bool,

        /// Leave out one shape (the result will not build; useful for testing integrations)
        #[arg(long, value_enum)]
        without: Option<ShapeArg>,

        /// Installation origin as x,y,z
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
        origin: Vec3,

        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },

    /// Build the topology of a fixture and print a summary.
    Inspect {
        fixture: PathBuf,

        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Resolve one ring address to its point.
    Probe {
        fixture: PathBuf,

        #[arg(long, value_enum)]
        shape: ShapeArg,

        #[arg(long, value_enum, default_value_t = SideArg::Exterior)]
        side: SideArg,

        /// Ring index, 0 at the top
        #[arg(long, allow_negative_numbers = true)]
        ring: i64,

        /// Circumferential position; wraps around the ring
        #[arg(long, allow_negative_numbers = true)]
        pos: i64,
    },

    /// Validate every *.json fixture under the given files and directories.
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn parse_vec3(s: &str) -> std::result::Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got '{s}'"));
    };
    let f = |v: &str| v.parse::<f32>().map_err(|e| format!("'{v}': {e}"));
    Ok(Vec3::new(f(x)?, f(y)?, f(z)?))
}

fn load_geometry(path: Option<&Path>) -> Result<Geometry> {
    let Some(path) = path else {
        return Ok(Geometry::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read geometry {}", path.display()))?;
    let geometry = Geometry::from_json_str(&text)
        .with_context(|| format!("Invalid geometry JSON in {}", path.display()))?;
    geometry
        .validate()
        .with_context(|| format!("Geometry in {} is inconsistent", path.display()))?;
    info!("Geometry overrides loaded from {}", path.display());
    Ok(geometry)
}

/// Read a fixture and build its topology. `Ok(None)` when the file holds no
/// installation.
fn load_topology(geometry: &Geometry, path: &Path) -> Result<Option<Topology>> {
    let model = FixtureNode::read_file(path)
        .with_context(|| format!("Failed to read fixture {}", path.display()))?;
    let point_count = model.point_count();
    debug!("{}: {} points", path.display(), point_count);

    Topology::build(geometry, &model, point_count)
        .with_context(|| format!("Apotheneum detected in {} but contains errors", path.display()))
}

fn generate(
    geometry: &Geometry,
    out: &Path,
    no_interior: bool,
    without: Option<ShapeArg>,
    origin: Vec3,
    overwrite: bool,
) -> Result<()> {
    if out.exists() && !overwrite {
        bail!("{} already exists (pass --overwrite to replace it)", out.display());
    }
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let options = SynthOptions {
        cube: without != Some(ShapeArg::Cube),
        cylinder: without != Some(ShapeArg::Cylinder),
        interior: !no_interior,
        origin,
    };
    let model = synth::installation(geometry, &options);
    model
        .write_file(out)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    info!(
        "Wrote {} ({} points, interior: {})",
        out.display(),
        model.point_count(),
        options.interior
    );
    if let Some(shape) = without {
        warn!("{} omitted; this fixture will not build", shape);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct SurfaceSummary {
    shape: Shape,
    side: Side,
    width: usize,
    height: usize,
    points: usize,
    faces: usize,
    contiguous: bool,
    door_columns: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    fixture: String,
    installed: bool,
    point_count: usize,
    has_interior: bool,
    surfaces: Vec<SurfaceSummary>,
}

fn summarize(path: &Path, topology: Option<&Topology>) -> Summary {
    let Some(topology) = topology else {
        return Summary {
            fixture: path.display().to_string(),
            installed: false,
            point_count: 0,
            has_interior: false,
            surfaces: Vec::new(),
        };
    };

    let surfaces = topology
        .orientations()
        .map(|o| SurfaceSummary {
            shape: o.shape(),
            side: o.side(),
            width: o.width(),
            height: o.height(),
            points: o.size(),
            faces: o.faces().len(),
            contiguous: o.span().is_some(),
            door_columns: (0..o.width()).filter(|&x| o.available(x) < o.height()).count(),
        })
        .collect();

    Summary {
        fixture: path.display().to_string(),
        installed: true,
        point_count: topology.point_count(),
        has_interior: topology.has_interior(),
        surfaces,
    }
}

fn inspect(geometry: &Geometry, fixture: &Path, json: bool) -> Result<()> {
    let topology = load_topology(geometry, fixture)?;
    let summary = summarize(fixture, topology.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if !summary.installed {
        println!("{}: no Apotheneum installation", summary.fixture);
        return Ok(());
    }
    println!(
        "{}: {} points, interior: {}",
        summary.fixture, summary.point_count, summary.has_interior
    );
    for s in &summary.surfaces {
        println!(
            "  {:<8} {:<8} {:>3} x {:<3} {:>6} points  faces: {}  contiguous: {}  door columns: {}",
            s.shape.to_string(),
            s.side.to_string(),
            s.width,
            s.height,
            s.points,
            s.faces,
            s.contiguous,
            s.door_columns
        );
    }
    Ok(())
}

fn probe(geometry: &Geometry, fixture: &Path, shape: ShapeArg, side: SideArg, ring: i64, pos: i64) -> Result<()> {
    let topology = load_topology(geometry, fixture)?
        .with_context(|| format!("{} holds no Apotheneum installation", fixture.display()))?;
    let (shape, side) = (Shape::from(shape), Side::from(side));

    let shape_geometry = topology.shape_geometry(shape);
    let column = shape_geometry.wrap(pos);
    let point = topology
        .resolve(shape, side, ring, pos)
        .with_context(|| format!("No point at {shape} {side} ring {ring} position {pos}"))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "shape": shape,
            "side": side,
            "ring": ring,
            "column": column,
            "index": point.index,
            "position": point.position,
            "door": topology.is_door(shape, ring, pos),
            "available": shape_geometry.available(column),
        }))?
    );
    Ok(())
}

/// Every `*.json` file under `paths`, in walk order.
fn collect_fixtures(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for root in paths {
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            let is_json = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            if is_json {
                found.push(path);
            }
        }
    }
    found
}

fn check(geometry: &Geometry, paths: &[PathBuf]) -> Result<()> {
    let fixtures = collect_fixtures(paths);
    if fixtures.is_empty() {
        bail!("No *.json fixtures found");
    }

    info!("Checking {} fixtures...", fixtures.len());
    let started = Instant::now();

    let failed = fixtures
        .par_iter()
        .filter(|path| match load_topology(geometry, path) {
            Ok(Some(topology)) => {
                info!(
                    "{}: ok, {} points, interior: {}",
                    path.display(),
                    topology.point_count(),
                    topology.has_interior()
                );
                false
            }
            Ok(None) => {
                info!("{}: no installation", path.display());
                false
            }
            Err(err) => {
                warn!("{:#}", err);
                true
            }
        })
        .count();

    info!(
        "Checked {} fixtures in {:.2?}, {} failed",
        fixtures.len(),
        started.elapsed(),
        failed
    );
    if failed > 0 {
        bail!("{failed} of {} fixtures failed validation", fixtures.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let geometry = load_geometry(args.geometry.as_deref())?;

    match args.command {
        Command::Generate {
            out,
            no_interior,
            without,
            origin,
            overwrite,
        } => generate(&geometry, &out, no_interior, without, origin, overwrite),
        Command::Inspect { fixture, json } => inspect(&geometry, &fixture, json),
        Command::Probe {
            fixture,
            shape,
            side,
            ring,
            pos,
        } => probe(&geometry, &fixture, shape, side, ring, pos),
        Command::Check { paths } => check(&geometry, &paths),
    }
}

//! Converts CUBE, APBS DX and JVXL volumetric files to JVXL surfaces.
//!
//! Reads the input, extracts an isosurface (or a contoured slice when a plane is
//! given), optionally colors it from a second file, and writes the JVXL text.

use anyhow::{bail, Context, Result};
use clap::Parser;
use jvxl::export::{write_ply, SurfaceSummary};
use jvxl::{generate_surface, ColorPhase, ColorScheme, DataSource, Plane, SurfaceParams, TruncatedDataPolicy};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input CUBE, APBS DX or JVXL file
    input: PathBuf,

    /// Output JVXL file (default: <input stem>[_<file index>].jvxl)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Isosurface cutoff; a leading '+' keeps only the positive surface
    #[arg(long, allow_hyphen_values = true)]
    cutoff: Option<String>,

    /// Keep only the surface at the positive cutoff
    #[arg(long)]
    positive: bool,

    /// Color the two lobes of a signed field by sign
    #[arg(long)]
    sign: bool,

    /// Color by orbital phase along an axis expression (x, y, z, xy, yz, xz, x2-y2, z2)
    #[arg(long)]
    phase: Option<String>,

    /// Slice plane: xy, xz, yz, x=v, y=v, z=v or "a b c d"
    #[arg(long, allow_hyphen_values = true)]
    plane: Option<String>,

    /// Number of contour levels
    #[arg(long)]
    contours: Option<usize>,

    /// File whose values color the surface
    #[arg(long)]
    map: Option<PathBuf>,

    /// Color scheme (roygb, bgyor, rwb, bwr, low, high, bw, wb)
    #[arg(long)]
    scheme: Option<String>,

    /// Reverse the color scale
    #[arg(long)]
    reverse: bool,

    /// Surface to read from files holding several (1-based)
    #[arg(long)]
    file_index: Option<usize>,

    /// JSON file with surface parameters; flags override it
    #[arg(long)]
    params: Option<PathBuf>,

    /// Also write the mesh as ASCII PLY
    #[arg(long)]
    ply: Option<PathBuf>,

    /// Also write a JSON summary of the surface
    #[arg(long)]
    json: Option<PathBuf>,

    /// Fail on truncated data instead of zero-filling
    #[arg(long)]
    strict: bool,
}

/// Parses the `--plane` shorthands and the general `a b c d` form.
fn parse_plane(text: &str) -> Result<Plane> {
    let text = text.trim();
    let plane = match text.to_ascii_lowercase().as_str() {
        "xy" => Plane::new(0.0, 0.0, 1.0, 0.0),
        "xz" => Plane::new(0.0, 1.0, 0.0, 0.0),
        "yz" => Plane::new(1.0, 0.0, 0.0, 0.0),
        other => match other.split_once('=') {
            Some((axis, value)) => {
                let value: f32 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid plane offset: {text}"))?;
                match axis.trim() {
                    "x" => Plane::new(1.0, 0.0, 0.0, -value),
                    "y" => Plane::new(0.0, 1.0, 0.0, -value),
                    "z" => Plane::new(0.0, 0.0, 1.0, -value),
                    _ => bail!("Invalid plane axis: {text}"),
                }
            }
            None => text.parse()?,
        },
    };
    Ok(plane)
}

/// Parses `--cutoff`, returning the value and whether it was marked positive-only.
fn parse_cutoff(text: &str) -> Result<(f32, bool)> {
    let text = text.trim();
    let (positive, number) = match text.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let cutoff = number
        .parse()
        .with_context(|| format!("Invalid cutoff: {text}"))?;
    Ok((cutoff, positive))
}

fn default_output(input: &Path, file_index: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("surface");
    let suffix = if file_index > 1 {
        format!("_{file_index}")
    } else {
        String::new()
    };
    let path = input.with_file_name(format!("{stem}{suffix}.jvxl"));
    if path == input {
        input.with_file_name(format!("{stem}{suffix}_surface.jvxl"))
    } else {
        path
    }
}

fn build_params(cli: &Cli) -> Result<SurfaceParams> {
    let mut params = match &cli.params {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read parameter file: {}", path.display()))?;
            SurfaceParams::from_json(&json)
                .with_context(|| format!("Failed to parse parameter file: {}", path.display()))?
        }
        None => SurfaceParams::default(),
    };
    if let Some(text) = &cli.cutoff {
        let (cutoff, positive) = parse_cutoff(text)?;
        params.cutoff = Some(cutoff);
        params.is_positive_only = positive;
    }
    if cli.positive {
        params.is_positive_only = true;
    }
    if cli.sign {
        params.is_cutoff_absolute = true;
        params.color_by_sign = true;
    }
    if let Some(name) = &cli.phase {
        params.is_cutoff_absolute = true;
        params.color_by_sign = true;
        params.color_phase = Some(ColorPhase::from_name_lossy(name));
    }
    if let Some(text) = &cli.plane {
        params.plane = Some(parse_plane(text)?);
        params.is_contoured = true;
    }
    if let Some(n) = cli.contours {
        params.is_contoured = true;
        params.n_contours = n;
    }
    if let Some(name) = &cli.scheme {
        params.color_scheme = name.parse::<ColorScheme>()?;
    }
    if cli.reverse {
        params.is_color_reversed = true;
    }
    if let Some(index) = cli.file_index {
        params.file_index = index.max(1);
    }
    if cli.strict {
        params.truncated_data = TruncatedDataPolicy::Error;
    }
    Ok(params)
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();
    let cli = Cli::parse();
    let params = build_params(&cli)?;

    let mut map = cli.map.clone();
    if params.color_by_sign && map.is_some() {
        log::warn!("sign coloring replaces the color map; ignoring --map");
        map = None;
    }
    if params.plane.is_some() && map.is_none() {
        map = Some(cli.input.clone());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input, params.file_index));

    let generator = generate_surface(
        DataSource::Path(cli.input.clone()),
        map.map(DataSource::Path),
        params,
    )
    .with_context(|| format!("Failed to generate a surface from {}", cli.input.display()))?;

    let Some(jvxl) = generator.jvxl_file() else {
        bail!("No surface was generated from {}", cli.input.display());
    };
    std::fs::write(&output, &jvxl)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    let mesh = generator.mesh();
    if let Some(path) = &cli.ply {
        let file = File::create(path)
            .with_context(|| format!("Failed to create PLY file: {}", path.display()))?;
        write_ply(mesh, &mut BufWriter::new(file))
            .with_context(|| format!("Failed to write PLY file: {}", path.display()))?;
    }
    if let Some(path) = &cli.json {
        let summary = SurfaceSummary::new(mesh, generator.jvxl_data());
        std::fs::write(path, summary.to_json()?)
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
    }

    println!(
        "Wrote {} ({} vertices, {} triangles)",
        output.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_shorthands() {
        assert_eq!(parse_plane("xy").unwrap(), Plane::new(0.0, 0.0, 1.0, 0.0));
        assert_eq!(parse_plane("YZ").unwrap(), Plane::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(parse_plane("z=1.5").unwrap(), Plane::new(0.0, 0.0, 1.0, -1.5));
        assert_eq!(parse_plane("{0, 1, 0, -2}").unwrap(), Plane::new(0.0, 1.0, 0.0, -2.0));
        assert!(parse_plane("w=1").is_err());
        assert!(parse_plane("z=abc").is_err());
    }

    #[test]
    fn test_cutoff_prefix() {
        assert_eq!(parse_cutoff("+0.05").unwrap(), (0.05, true));
        assert_eq!(parse_cutoff("-0.1").unwrap(), (-0.1, false));
        assert!(parse_cutoff("high").is_err());
    }

    #[test]
    fn test_default_output() {
        let input = Path::new("data/orbital.cube");
        assert_eq!(default_output(input, 1), PathBuf::from("data/orbital.jvxl"));
        assert_eq!(default_output(input, 3), PathBuf::from("data/orbital_3.jvxl"));
        let jvxl = Path::new("surface.jvxl");
        assert_eq!(default_output(jvxl, 1), PathBuf::from("surface_surface.jvxl"));
    }

    #[test]
    fn test_flags_override_params() {
        let cli = Cli::parse_from([
            "jvxl", "in.cube", "--cutoff", "+0.2", "--plane", "x=1", "--scheme", "bwr", "--strict",
        ]);
        let params = build_params(&cli).unwrap();
        assert_eq!(params.cutoff, Some(0.2));
        assert!(params.is_positive_only);
        assert!(params.is_contoured);
        assert_eq!(params.plane, Some(Plane::new(1.0, 0.0, 0.0, -1.0)));
        assert_eq!(params.color_scheme, ColorScheme::Bwr);
        assert_eq!(params.truncated_data, TruncatedDataPolicy::Error);
    }
}

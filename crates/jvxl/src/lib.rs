//! jvxl-rs: isosurface extraction and JVXL encoding for volumetric data.
//!
//! Reads Gaussian CUBE, APBS OpenDX and JVXL files, extracts an isosurface or a
//! contoured planar slice, colors it, and writes the result as compact JVXL text.
//!
//! # Quick Start
//!
//! ```no_run
//! use jvxl::{generate_surface, DataSource, SurfaceParams};
//!
//! fn main() -> jvxl::Result<()> {
//!     jvxl::init_logging();
//!
//!     let params = SurfaceParams {
//!         cutoff: Some(0.05),
//!         ..SurfaceParams::default()
//!     };
//!     let generator = generate_surface(DataSource::Path("orbital.cube".into()), None, params)?;
//!     println!("{} triangles", generator.mesh().triangle_count());
//!     if let Some(jvxl) = generator.jvxl_file() {
//!         std::fs::write("orbital.jvxl", jvxl)?;
//!     }
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_errors_doc)]
// Export math converts indices and colors between integer widths
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

pub mod export;

pub use jvxl_core::{
    compress, decompress, ColorPhase, ColorScheme, FractionCodec, Grid3D, JvxlError, LineReader,
    MeshData, Palette, Plane, Result, Rgba, SurfaceParams, Triangle, TruncatedDataPolicy,
    VolumeData,
};
pub use jvxl_surface::{
    read_header, ContourGrid, DataSource, GeneratorState, JvxlData, MarchingCubes, Property,
    PropertyOutput, PropertyQuery, PropertyValue, SourceFormat, SurfaceGenerator, VolumeHeader,
    END_OF_DATA,
};

pub use export::{write_ply, SurfaceSummary};

// Re-export glam types for convenience
pub use glam::{Vec3, Vec4};

/// Initializes `env_logger` once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Runs a complete generation cycle.
///
/// Without a plane `input` supplies the surface and `map`, if given, the values
/// to color it with. With a plane in `params` the slice is taken through the
/// grid of `map`, falling back to `input`, and colored from the same data.
pub fn generate_surface(
    input: DataSource,
    map: Option<DataSource>,
    params: SurfaceParams,
) -> Result<SurfaceGenerator> {
    let mut generator = SurfaceGenerator::with_params(params);
    if let Some(plane) = generator.params().plane {
        generator.set_property(Property::Plane(plane))?;
        generator.set_property(Property::MapColor(map.unwrap_or(input)))?;
    } else {
        generator.set_property(Property::ReadData(input))?;
        if let Some(map) = map {
            generator.set_property(Property::MapColor(map))?;
        }
    }
    log::info!(
        "generated {} vertices and {} triangles",
        generator.mesh().vertex_count(),
        generator.mesh().triangle_count()
    );
    Ok(generator)
}

//! Surface generation for jvxl-rs.
//!
//! This crate turns volumetric data into triangle meshes and JVXL text:
//! - [`read_header`] recognizes CUBE, APBS DX and JVXL sources
//! - [`read_voxel_data`] loads voxel values or rebuilds them from JVXL runs
//! - [`MarchingCubes`] extracts isosurfaces and planar slices
//! - [`ContourGrid`] fills contour bands on slices with marching squares
//! - [`ColorMapper`] colors vertices and encodes the color stream
//! - [`SurfaceGenerator`] drives a whole load, color and encode cycle

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Grid, pixel and codec math converts between indices, counts and floats throughout
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
// Marching loops mirror the lookup tables and read better unsplit
#![allow(clippy::too_many_lines)]
#![allow(clippy::similar_names)]
// Module names like marching_cubes::MarchingCubes are intentional
#![allow(clippy::module_name_repetitions)]

mod apbs;
pub mod color_mapper;
pub mod definition;
pub mod generator;
pub mod header;
pub mod jvxl_file;
pub mod marching_cubes;
pub mod marching_squares;
pub mod tables;
pub mod text;
pub mod voxel_reader;

pub use color_mapper::{ColorData, ColorMapper, ValueSource};
pub use definition::SurfaceDefinition;
pub use generator::{
    DataSource, GeneratorState, Property, PropertyOutput, PropertyQuery, PropertyValue,
    SurfaceGenerator,
};
pub use header::{read_header, SourceFormat, VolumeHeader};
pub use jvxl_file::{JvxlData, END_OF_DATA};
pub use marching_cubes::{MarchingCubes, SurfaceOutput};
pub use marching_squares::{contour_levels, ContourGrid, ContourVertex};
pub use voxel_reader::{read_jvxl_color_data, read_voxel_data, SurfaceRuns, VoxelLoad};

// Re-export glam types for convenience
pub use glam::{Vec3, Vec4};

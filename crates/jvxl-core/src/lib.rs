//! Core types for jvxl-rs.
//!
//! This crate provides the building blocks shared by the surface generator:
//! - [`FractionCodec`] and run-length [`compress`]/[`decompress`] for JVXL text streams
//! - [`VolumeData`] voxel grids and the [`MeshData`] triangle mesh
//! - [`Plane`], [`ColorScheme`] palettes and per-surface [`SurfaceParams`]
//! - [`LineReader`] line-oriented input with lookahead

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Surface parameter structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Grid and codec math converts between indices, counts and floats throughout
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod codec;
pub mod color_scheme;
pub mod compress;
pub mod error;
pub mod line_reader;
pub mod mesh;
pub mod options;
pub mod plane;
pub mod volume;

pub use codec::FractionCodec;
pub use color_scheme::{quantize, ColorScheme, Palette};
pub use compress::{compress, decompress};
pub use error::{JvxlError, Result};
pub use line_reader::{BufReadSource, LineReader, LineSource};
pub use mesh::{MeshData, Rgba, Triangle};
pub use options::{ColorPhase, SurfaceParams, TruncatedDataPolicy};
pub use plane::Plane;
pub use volume::{Grid3D, VolumeData};

// Re-export glam types for convenience
pub use glam::{Vec3, Vec4};

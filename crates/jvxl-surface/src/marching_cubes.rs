//! Marching cubes over a voxel grid, with JVXL edge-fraction encoding.
//!
//! Cells are visited from high x, y and z to low so that the crossings found for a
//! cell can be handed to its lower neighbors through a cache keyed by `(y, z)`. Every
//! newly found crossing appends one fraction character to the edge stream; a JVXL
//! surface replays that stream instead of interpolating.

#![allow(clippy::too_many_lines)]


use jvxl_core::codec::FractionCodec;
use jvxl_core::{JvxlError, MeshData, Result, VolumeData};

use crate::marching_squares::ContourVertex;
use crate::tables::{CUBE_VERTEX_OFFSETS, EDGE_TYPES, EDGE_VERTICES, INSIDE_MASK_TABLE, TRIANGLE_TABLE};

/// Inside test shared by the loader and the extractor.
///
/// Positive cutoffs select values at or above the cutoff (magnitudes when
/// `absolute`), other cutoffs select values at or below it.
pub fn is_inside(value: f32, cutoff: f32, absolute: bool) -> bool {
    if cutoff > 0.0 {
        let v = if absolute { value.abs() } else { value };
        v >= cutoff
    } else {
        value <= cutoff
    }
}

/// State of one cube edge in the propagation cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crossing {
    /// Not yet examined for this cell.
    #[default]
    Unknown,
    /// The surface crosses here at this mesh vertex.
    At(u32),
    /// A crossing that contour mode does not keep.
    Uncollected,
}

impl Crossing {
    fn vertex(self) -> Option<u32> {
        match self {
            Crossing::At(v) => Some(v),
            _ => None,
        }
    }
}

/// What one pass of [`MarchingCubes::generate`] produced besides mesh geometry.
#[derive(Debug, Clone, Default)]
pub struct SurfaceOutput {
    /// One fraction character per crossing, newline terminated.
    pub edge_data: String,
    /// Number of crossings visited.
    pub edge_count: usize,
    /// Crossings collected in contour mode.
    pub contour_vertices: Vec<ContourVertex>,
}

/// Marching cubes configuration for one voxel grid.
#[derive(Debug, Clone)]
pub struct MarchingCubes<'a> {
    volume: &'a VolumeData,
    cutoff: f32,
    is_cutoff_absolute: bool,
    inside_out: bool,
    contour_type: Option<usize>,
    edge_codec: FractionCodec,
    jvxl_edges: Option<&'a str>,
}

impl<'a> MarchingCubes<'a> {
    pub fn new(volume: &'a VolumeData, cutoff: f32) -> Self {
        Self {
            volume,
            cutoff,
            is_cutoff_absolute: false,
            inside_out: false,
            contour_type: None,
            edge_codec: FractionCodec::default(),
            jvxl_edges: None,
        }
    }

    pub fn cutoff_absolute(mut self, absolute: bool) -> Self {
        self.is_cutoff_absolute = absolute;
        self
    }

    /// Reverses the winding of every triangle.
    pub fn inside_out(mut self, inside_out: bool) -> Self {
        self.inside_out = inside_out;
        self
    }

    /// Collects crossings on edges along this axis as contour vertices instead of
    /// building triangles.
    pub fn contour_type(mut self, contour_type: Option<usize>) -> Self {
        self.contour_type = contour_type;
        self
    }

    pub fn edge_codec(mut self, codec: FractionCodec) -> Self {
        self.edge_codec = codec;
        self
    }

    /// Takes crossing fractions from a decompressed JVXL edge stream. An empty
    /// stream falls back to interpolation.
    pub fn jvxl_edges(mut self, edges: &'a str) -> Self {
        self.jvxl_edges = Some(edges);
        self
    }

    /// Extracts the surface into `mesh`.
    pub fn generate(&self, mesh: &mut MeshData) -> Result<SurfaceOutput> {
        let voxels = self
            .volume
            .voxels()
            .ok_or_else(|| JvxlError::State("no voxel data to extract a surface from".into()))?;
        let counts = voxels.counts();
        if counts.iter().any(|&n| n < 2) {
            return Err(JvxlError::Geometry {
                counts,
                message: "marching cubes needs at least two points along each axis".into(),
            });
        }
        let [ccx, ccy, ccz] = counts.map(|n| n - 1);

        let mut decoded = self.jvxl_edges.filter(|s| !s.is_empty()).map(str::chars);
        let mut edge_data = String::new();
        let mut output = SurfaceOutput::default();
        let mut cache = vec![[Crossing::Unknown; 12]; ccy * ccz];
        let mut values = [0.0_f32; 8];
        let (mut inside_count, mut outside_count, mut surface_count) = (0, 0, 0);
        let mut end_of_edges = false;

        for x in (0..ccx).rev() {
            for y in (0..ccy).rev() {
                for z in (0..ccz).rev() {
                    let cell = y * ccz + z;
                    propagate(&mut cache, cell, x == ccx - 1, y == ccy - 1, z == ccz - 1, ccz);

                    let mut inside_mask = 0usize;
                    for i in (0..8).rev() {
                        let [ox, oy, oz] = CUBE_VERTEX_OFFSETS[i];
                        values[i] = voxels.get(x + ox, y + oy, z + oz);
                        if is_inside(values[i], self.cutoff, self.is_cutoff_absolute) {
                            inside_mask |= 1 << i;
                        }
                    }
                    if inside_mask == 0 {
                        outside_count += 1;
                        continue;
                    }
                    if inside_mask == 0xFF {
                        inside_count += 1;
                        continue;
                    }
                    surface_count += 1;

                    let edge_mask = INSIDE_MASK_TABLE[inside_mask];
                    let mut has_nan = false;
                    for edge in (0..12).rev() {
                        if edge_mask & (1 << edge) == 0 || cache[cell][edge] != Crossing::Unknown {
                            continue;
                        }
                        output.edge_count += 1;
                        let [a, b] = EDGE_VERTICES[edge];
                        let (value_a, value_b) = (values[a], values[b]);
                        has_nan |= value_a.is_nan() || value_b.is_nan();
                        let corner_a = offset_point(x, y, z, a);
                        let corner_b = offset_point(x, y, z, b);
                        let point_a = self.volume.voxel_point_to_xyz(corner_a[0], corner_a[1], corner_a[2]);
                        let point_b = self.volume.voxel_point_to_xyz(corner_b[0], corner_b[1], corner_b[2]);

                        let (fraction, value) = match decoded.as_mut() {
                            Some(chars) => {
                                let ch = chars.next().unwrap_or_else(|| {
                                    if !end_of_edges {
                                        log::error!(
                                            "end of JVXL edge data after {} crossings",
                                            output.edge_count - 1
                                        );
                                        end_of_edges = true;
                                    }
                                    char::from(self.edge_codec.base())
                                });
                                let fraction = self.edge_codec.decode_fraction(ch);
                                (fraction, fraction)
                            }
                            None => {
                                let fraction = self.crossing_fraction(value_a, value_b);
                                edge_data.push(self.edge_codec.encode(fraction));
                                (fraction, value_a + fraction * (value_b - value_a))
                            }
                        };
                        let point = point_a + (point_b - point_a) * fraction;

                        cache[cell][edge] = match self.contour_type {
                            Some(axis) if usize::from(EDGE_TYPES[edge]) == axis => {
                                let index = mesh.add_vertex(point, self.cutoff);
                                output
                                    .contour_vertices
                                    .push(ContourVertex::new(corner_a, point, index));
                                Crossing::At(index)
                            }
                            Some(_) => Crossing::Uncollected,
                            None => Crossing::At(mesh.add_vertex(point, value)),
                        };
                    }
                    if has_nan || self.contour_type.is_some() {
                        continue;
                    }
                    self.add_triangles(mesh, &cache[cell], inside_mask);
                }
            }
        }

        log::info!(
            "marching cubes: {surface_count} surface cells, {inside_count} inside, {outside_count} outside, {} crossings",
            output.edge_count
        );
        output.edge_data = match self.jvxl_edges {
            Some(edges) => edges.to_string(),
            None => edge_data,
        };
        output.edge_data.push('\n');
        Ok(output)
    }

    /// Where the cutoff crosses the edge from `a` to `b`, or NaN if it does not.
    fn crossing_fraction(&self, a: f32, b: f32) -> f32 {
        let diff = b - a;
        let mut fraction = (self.cutoff - a) / diff;
        if self.is_cutoff_absolute && !(0.0..=1.0).contains(&fraction) {
            fraction = (-self.cutoff - a) / diff;
        }
        if (0.0..=1.0).contains(&fraction) {
            fraction
        } else {
            f32::NAN
        }
    }

    fn add_triangles(&self, mesh: &mut MeshData, crossings: &[Crossing; 12], inside_mask: usize) {
        for tri in TRIANGLE_TABLE[inside_mask].chunks_exact(4).rev() {
            let (Some(a), Some(b), Some(c)) = (
                crossings[usize::from(tri[0])].vertex(),
                crossings[usize::from(tri[1])].vertex(),
                crossings[usize::from(tri[2])].vertex(),
            ) else {
                continue;
            };
            if self.is_cutoff_absolute && !same_sign(mesh, a, b, c) {
                continue;
            }
            if self.inside_out {
                mesh.add_triangle_checked(a, c, b, reverse_edge_mask(tri[3]));
            } else {
                mesh.add_triangle_checked(a, b, c, tri[3]);
            }
        }
    }
}

/// Hands the crossings of already visited neighbors to the cell at `cell`.
///
/// The cache entry still holds the cell at `x + 1`; entries at `y + 1` and `z + 1`
/// were filled earlier in this slice.
fn propagate(
    cache: &mut [[Crossing; 12]],
    cell: usize,
    no_x: bool,
    no_y: bool,
    no_z: bool,
    ccz: usize,
) {
    let y_neighbor = if no_y { None } else { Some(cache[cell + ccz]) };
    let z_neighbor = if no_z { None } else { Some(cache[cell + 1]) };
    let c = &mut cache[cell];
    if no_x {
        for edge in [1, 9, 5, 10] {
            c[edge] = Crossing::Unknown;
        }
    } else {
        c[1] = c[3];
        c[5] = c[7];
        c[9] = c[8];
        c[10] = c[11];
    }

    let yn = y_neighbor.unwrap_or_default();
    c[4] = yn[0];
    c[6] = yn[2];
    c[7] = yn[3];
    if no_x {
        c[5] = yn[1];
    }

    let zn = z_neighbor.unwrap_or_default();
    c[2] = zn[0];
    if no_y {
        c[6] = zn[4];
    }
    if no_x {
        c[10] = zn[9];
    }
    c[11] = zn[8];

    c[0] = Crossing::Unknown;
    c[3] = Crossing::Unknown;
    c[8] = Crossing::Unknown;
}

fn offset_point(x: usize, y: usize, z: usize, corner: usize) -> [usize; 3] {
    let [ox, oy, oz] = CUBE_VERTEX_OFFSETS[corner];
    [x + ox, y + oy, z + oz]
}

/// Vertex values do not straddle zero.
fn same_sign(mesh: &MeshData, a: u32, b: u32, c: u32) -> bool {
    let value = |i: u32| mesh.values[i as usize];
    value(a) * value(b) >= 0.0 && value(b) * value(c) >= 0.0
}

/// Edge mask of a triangle after swapping its second and third vertices.
fn reverse_edge_mask(mask: u8) -> u8 {
    ((mask & 1) << 2) | (mask & 2) | ((mask & 4) >> 2)
}

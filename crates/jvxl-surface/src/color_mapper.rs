//! Vertex coloring and the JVXL color stream.
//!
//! Colored surfaces store one value per vertex for the first `last_vertex`
//! vertices. Precision streams hold two characters per value over the data
//! range, written as every coarse character followed by every remainder
//! character; single streams hold one character over the red..blue range.

use jvxl_core::codec::FractionCodec;
use jvxl_core::{MeshData, Palette, Rgba, SurfaceParams, VolumeData};

use crate::marching_squares::ContourGrid;

/// Encoded value used for the two colors of a bicolor surface.
const TWO_COLOR_DATUM: f32 = 0.999;

/// Where vertex values come from when coloring.
#[derive(Debug, Clone, Copy)]
pub enum ValueSource<'a> {
    /// The values already stored with the mesh.
    Mesh,
    /// Interpolated from mapped voxel data.
    Volume(&'a VolumeData),
    /// Interpolated from the pixels of a contoured slice.
    Contours(&'a ContourGrid),
}

/// Result of coloring one surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorData {
    /// Encoded values, uncompressed.
    pub data: String,
    pub is_precision: bool,
    pub data_range: (f32, f32),
    pub red_blue: (f32, f32),
}

impl ColorData {
    pub fn char_count(&self) -> usize {
        self.data.chars().count()
    }
}

/// Colors meshes with a palette and encodes their values.
pub struct ColorMapper<'a> {
    palette: &'a dyn Palette,
    codec: FractionCodec,
}

impl<'a> ColorMapper<'a> {
    pub fn new(palette: &'a dyn Palette, codec: FractionCodec) -> Self {
        Self { palette, codec }
    }

    /// Values every vertex, settles the map ranges, colors the mesh and encodes
    /// the first `last_vertex` values.
    pub fn color_isosurface(
        &self,
        mesh: &mut MeshData,
        source: ValueSource<'_>,
        params: &mut SurfaceParams,
        last_vertex: usize,
        is_precision: bool,
    ) -> ColorData {
        let n = last_vertex.min(mesh.vertex_count());
        let values: Vec<f32> = (0..mesh.vertex_count())
            .map(|i| vertex_value(mesh, i, source, params))
            .collect();
        let (min, max) = params.set_map_ranges(|| finite_range(&values[..n]));
        let red_blue = (params.value_mapped_to_red, params.value_mapped_to_blue);
        log::info!(
            "coloring {} vertices: data range {min}..{max}, red {} blue {}",
            values.len(),
            red_blue.0,
            red_blue.1
        );

        let colors = self.apply_color_scale(&values, params);
        mesh.set_colors(colors);

        // contoured two-color surfaces keep their actual values in the stream
        let two_color = is_two_color(params) && !params.is_contoured;
        let encoded = values[..n].iter().map(|&v| {
            if two_color {
                two_color_datum(v)
            } else {
                v
            }
        });
        let data = if is_precision {
            let (coarse, remainder): (String, String) = encoded
                .map(|v| self.codec.encode_value_precise(v, min, max))
                .unzip();
            coarse + &remainder
        } else {
            encoded
                .map(|v| self.codec.encode_value(v, red_blue.0, red_blue.1))
                .collect()
        };
        ColorData {
            data,
            is_precision,
            data_range: (min, max),
            red_blue,
        }
    }

    /// One color per value.
    pub fn apply_color_scale(&self, values: &[f32], params: &SurfaceParams) -> Vec<Rgba> {
        let (red, blue) = (params.value_mapped_to_red, params.value_mapped_to_blue);
        let (lo, hi) = (red.min(blue), red.max(blue));
        let levels = params.is_contoured.then(|| params.contour_count());
        values
            .iter()
            .map(|&value| {
                if is_two_color(params) {
                    return if value <= 0.0 {
                        params.min_color()
                    } else {
                        params.max_color()
                    };
                }
                let mut value = value.clamp(lo, hi);
                if let Some(n) = levels {
                    value = contour_level_value(value, red, blue, n);
                }
                if params.is_color_reversed {
                    value = red + blue - value;
                }
                self.palette.color_from_palette(value, red, blue)
            })
            .collect()
    }

    /// Decodes `count` values from a decompressed color stream.
    ///
    /// Missing characters decode as NaN.
    pub fn read_color_data(
        &self,
        data: &str,
        count: usize,
        params: &SurfaceParams,
        is_precision: bool,
    ) -> Vec<f32> {
        let chars: Vec<char> = data.chars().filter(|c| !c.is_whitespace()).collect();
        let needed = if is_precision { count * 2 } else { count };
        if chars.len() < needed {
            log::warn!("JVXL color data has {} of {needed} characters", chars.len());
        }
        let nan = self.codec.nan_char();
        let at = |i: usize| chars.get(i).copied().unwrap_or(nan);
        if is_precision {
            let (min, max) = params.mapped_data_range.unwrap_or((-1.0, 1.0));
            (0..count)
                .map(|i| self.codec.decode_value_precise(at(i), at(count + i), min, max))
                .collect()
        } else {
            let (red, blue) = (params.value_mapped_to_red, params.value_mapped_to_blue);
            (0..count)
                .map(|i| red + self.codec.decode_fraction(at(i)) * (blue - red))
                .collect()
        }
    }
}

fn is_two_color(params: &SurfaceParams) -> bool {
    params.is_two_color() || params.color_by_phase()
}

fn two_color_datum(value: f32) -> f32 {
    if value > 0.0 {
        TWO_COLOR_DATUM
    } else {
        -TWO_COLOR_DATUM
    }
}

fn vertex_value(mesh: &MeshData, i: usize, source: ValueSource<'_>, params: &SurfaceParams) -> f32 {
    let position = mesh.vertices[i];
    if let Some(phase) = params.color_phase {
        return phase.evaluate(position);
    }
    let stored = mesh.values.get(i).copied().unwrap_or(f32::NAN);
    match source {
        ValueSource::Mesh => stored,
        ValueSource::Volume(volume) => volume.interpolated_value(position, false).unwrap_or(stored),
        ValueSource::Contours(grid) => grid.interpolated_value(position),
    }
}

/// Min/max of the finite values, or 0/0 when there are none.
fn finite_range(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |range: Option<(f32, f32)>, v| {
            Some(range.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        })
        .unwrap_or((0.0, 0.0))
}

/// The contour level at or below `value` among `n` levels from `red` to `blue`.
#[allow(clippy::float_cmp)]
fn contour_level_value(value: f32, red: f32, blue: f32, n: usize) -> f32 {
    if red == blue || n == 0 {
        return value;
    }
    let step = (blue - red) / n as f32;
    let i = ((value - red) / step + 0.0001).floor().clamp(0.0, (n - 1) as f32);
    red + i * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use jvxl_core::{ColorPhase, ColorScheme};

    fn line_mesh(values: &[f32]) -> MeshData {
        let mut mesh = MeshData::new();
        for (i, &v) in values.iter().enumerate() {
            mesh.add_vertex(Vec3::new(i as f32, 0.0, 0.0), v);
        }
        mesh
    }

    #[test]
    fn test_bicolor_split_at_zero() {
        let mut mesh = line_mesh(&[-2.0, -0.5, 0.0, 0.5, 3.0]);
        let mut params = SurfaceParams {
            is_bicolor_map: true,
            ..SurfaceParams::default()
        };
        let palette = ColorScheme::default();
        let mapper = ColorMapper::new(&palette, FractionCodec::default());
        let colors = mapper.color_isosurface(&mut mesh, ValueSource::Mesh, &mut params, 5, false);
        assert_eq!(params.mapped_data_range, Some((-1.0, 1.0)));
        assert_eq!(colors.red_blue, (-1.0, 1.0));
        let negative = params.min_color();
        let positive = params.max_color();
        assert_eq!(mesh.colors, vec![negative, negative, negative, positive, positive]);

        let decoded = mapper.read_color_data(&colors.data, 5, &params, false);
        assert!(decoded[..3].iter().all(|&v| v < 0.0));
        assert!(decoded[3..].iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_reversed_bicolor() {
        let mut params = SurfaceParams {
            color_by_sign: true,
            is_color_reversed: true,
            ..SurfaceParams::default()
        };
        let palette = ColorScheme::default();
        let mapper = ColorMapper::new(&palette, FractionCodec::default());
        let mut mesh = line_mesh(&[-1.0, 1.0]);
        mapper.color_isosurface(&mut mesh, ValueSource::Mesh, &mut params, 2, false);
        assert_eq!(mesh.colors, vec![params.color_positive, params.color_negative]);
    }

    #[test]
    fn test_precision_layout_and_readback() {
        let values = [0.0, 2.5, 5.0, 10.0];
        let mut mesh = line_mesh(&values);
        let mut params = SurfaceParams::default();
        let palette = ColorScheme::default();
        let mapper = ColorMapper::new(&palette, FractionCodec::default());
        let colors = mapper.color_isosurface(&mut mesh, ValueSource::Mesh, &mut params, 4, true);
        assert_eq!(colors.data_range, (0.0, 10.0));
        assert_eq!(colors.char_count(), 8);
        let codec = FractionCodec::default();
        let coarse: String = values
            .iter()
            .map(|&v| codec.encode_value_precise(v, 0.0, 10.0).0)
            .collect();
        assert!(colors.data.starts_with(&coarse));

        let decoded = mapper.read_color_data(&colors.data, 4, &params, true);
        for (d, v) in decoded.iter().zip(values) {
            assert!((d - v).abs() < 10.0 / 90.0 / 90.0 * 2.0, "{d} vs {v}");
        }
    }

    #[test]
    fn test_single_chars_over_red_blue() {
        let mut mesh = line_mesh(&[-4.0, 0.0, 4.0]);
        let mut params = SurfaceParams {
            range_defined: true,
            value_mapped_to_red: -2.0,
            value_mapped_to_blue: 2.0,
            ..SurfaceParams::default()
        };
        let palette = ColorScheme::default();
        let mapper = ColorMapper::new(&palette, FractionCodec::default());
        let colors = mapper.color_isosurface(&mut mesh, ValueSource::Mesh, &mut params, 3, false);
        assert_eq!(colors.red_blue, (-2.0, 2.0));
        assert_eq!(colors.data_range, (-4.0, 4.0));
        assert_eq!(colors.char_count(), 3);
        // clamped into the red..blue range
        assert_eq!(mesh.colors[0], palette.color_from_palette(-2.0, -2.0, 2.0));
        assert_eq!(mesh.colors[2], palette.color_from_palette(2.0, -2.0, 2.0));
    }

    #[test]
    fn test_only_first_vertices_encoded() {
        let mut mesh = line_mesh(&[1.0, 2.0, 3.0, 100.0]);
        let mut params = SurfaceParams::default();
        let palette = ColorScheme::default();
        let mapper = ColorMapper::new(&palette, FractionCodec::default());
        let colors = mapper.color_isosurface(&mut mesh, ValueSource::Mesh, &mut params, 3, false);
        assert_eq!(colors.data_range, (1.0, 3.0));
        assert_eq!(colors.char_count(), 3);
        assert_eq!(mesh.colors.len(), 4);
    }

    #[test]
    fn test_phase_coloring() {
        let mut mesh = MeshData::new();
        mesh.add_vertex(Vec3::new(-1.0, 0.0, 0.0), 0.0);
        mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0), 0.0);
        let mut params = SurfaceParams {
            color_phase: Some(ColorPhase::X),
            ..SurfaceParams::default()
        };
        let palette = ColorScheme::default();
        let mapper = ColorMapper::new(&palette, FractionCodec::default());
        mapper.color_isosurface(&mut mesh, ValueSource::Mesh, &mut params, 2, false);
        assert_eq!(mesh.colors, vec![params.color_negative, params.color_positive]);
    }

    #[test]
    fn test_contour_level_snapping() {
        assert!((contour_level_value(0.35, 0.0, 1.0, 10) - 0.3).abs() < 1e-6);
        assert_eq!(contour_level_value(1.0, 0.0, 1.0, 4), 0.75);
        assert_eq!(contour_level_value(0.5, 1.0, 1.0, 4), 0.5);
    }

    #[test]
    fn test_short_stream_is_nan() {
        let palette = ColorScheme::default();
        let mapper = ColorMapper::new(&palette, FractionCodec::default());
        let values = mapper.read_color_data("##", 3, &SurfaceParams::default(), false);
        assert!(!values[0].is_nan());
        assert!(values[2].is_nan());
    }
}

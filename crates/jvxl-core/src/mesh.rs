//! Triangle mesh produced by surface extraction.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An opaque 8-bit-per-channel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpacks a `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Packs into `0xAARRGGBB`.
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Linear RGB in `[0, 1]`.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

/// A triangle referencing three mesh vertices.
///
/// Bit `i` of `edge_mask` is set when the edge from vertex `i` to vertex `i + 1`
/// is a true polygon edge rather than an internal fan edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [u32; 3],
    pub edge_mask: u8,
}

/// Vertices, per-vertex values and triangles of an extracted surface.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    /// Scalar value at each vertex (the cutoff for crossing vertices).
    pub values: Vec<f32>,
    pub triangles: Vec<Triangle>,
    /// Per-vertex colors, filled by the color mapper.
    pub colors: Vec<Rgba>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(&mut self, position: Vec3, value: f32) -> u32 {
        self.vertices.push(position);
        self.values.push(value);
        (self.vertices.len() - 1) as u32
    }

    /// Appends a triangle unless an index is out of range or repeated, or a
    /// referenced vertex has a NaN position or value.
    ///
    /// Returns whether the triangle was added.
    pub fn add_triangle_checked(&mut self, a: u32, b: u32, c: u32, edge_mask: u8) -> bool {
        let n = self.vertices.len() as u32;
        if a >= n || b >= n || c >= n || a == b || b == c || a == c {
            return false;
        }
        if [a, b, c].iter().any(|&i| self.is_nan_vertex(i as usize)) {
            return false;
        }
        self.triangles.push(Triangle {
            vertices: [a, b, c],
            edge_mask,
        });
        true
    }

    fn is_nan_vertex(&self, index: usize) -> bool {
        self.vertices[index].is_nan() || self.values.get(index).is_some_and(|v| v.is_nan())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Replaces the vertex colors; length mismatches are padded with the last color.
    pub fn set_colors(&mut self, mut colors: Vec<Rgba>) {
        let fill = colors.last().copied().unwrap_or_default();
        colors.resize(self.vertices.len(), fill);
        self.colors = colors;
    }

    /// Drops triangles, keeping vertices and values.
    pub fn clear_triangles(&mut self) {
        self.triangles.clear();
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.values.clear();
        self.triangles.clear();
        self.colors.clear();
    }

    /// Axis-aligned bounds of all vertices, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_round_trip() {
        let c = Rgba::from_argb(0xFF50_20A0);
        assert_eq!(c, Rgba::new(0x50, 0x20, 0xA0, 0xFF));
        assert_eq!(c.to_argb(), 0xFF50_20A0);
    }

    #[test]
    fn test_add_triangle_checked() {
        let mut mesh = MeshData::new();
        for i in 0..3 {
            mesh.add_vertex(Vec3::splat(i as f32), 0.0);
        }
        assert!(mesh.add_triangle_checked(0, 1, 2, 7));
        assert!(!mesh.add_triangle_checked(0, 1, 3, 7));
        assert!(!mesh.add_triangle_checked(0, 0, 2, 7));
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_nan_vertices_are_rejected() {
        let mut mesh = MeshData::new();
        mesh.add_vertex(Vec3::ZERO, 0.0);
        mesh.add_vertex(Vec3::X, f32::NAN);
        mesh.add_vertex(Vec3::Y, 0.0);
        mesh.add_vertex(Vec3::new(f32::NAN, 0.0, 0.0), 0.0);
        mesh.add_vertex(Vec3::Z, 0.0);
        assert!(!mesh.add_triangle_checked(0, 1, 2, 7));
        assert!(!mesh.add_triangle_checked(0, 3, 2, 7));
        assert!(mesh.add_triangle_checked(0, 2, 4, 7));
    }

    #[test]
    fn test_bounds_and_clear() {
        let mut mesh = MeshData::new();
        assert!(mesh.bounds().is_none());
        mesh.add_vertex(Vec3::new(1.0, -2.0, 0.0), 0.0);
        mesh.add_vertex(Vec3::new(-1.0, 3.0, 5.0), 0.0);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(hi, Vec3::new(1.0, 3.0, 5.0));
        mesh.set_colors(vec![Rgba::from_argb(0xFF00_00FF)]);
        assert_eq!(mesh.colors.len(), 2);
        mesh.clear();
        assert!(mesh.is_empty());
    }
}

//! Mesh and summary export.

use std::io::Write;

use jvxl_core::color_scheme::GRAY;
use jvxl_core::{MeshData, Result};
use jvxl_surface::JvxlData;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use serde::Serialize;

/// Writes `mesh` as ASCII PLY with a value and an RGB color per vertex.
///
/// Uncolored vertices are written gray. Returns the number of bytes written.
pub fn write_ply<W: Write>(mesh: &MeshData, out: &mut W) -> Result<usize> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;
    ply.header.comments.push("jvxl-rs surface".to_string());

    let mut vertex = ElementDef::new("vertex".to_string());
    for name in ["x", "y", "z", "value"] {
        vertex.properties.add(PropertyDef::new(
            name.to_string(),
            PropertyType::Scalar(ScalarType::Float),
        ));
    }
    for name in ["red", "green", "blue"] {
        vertex.properties.add(PropertyDef::new(
            name.to_string(),
            PropertyType::Scalar(ScalarType::UChar),
        ));
    }
    vertex.count = mesh.vertex_count();
    ply.header.elements.add(vertex);

    let mut face = ElementDef::new("face".to_string());
    face.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UChar, ScalarType::Int),
    ));
    face.count = mesh.triangle_count();
    ply.header.elements.add(face);

    let vertices = mesh
        .vertices
        .iter()
        .enumerate()
        .map(|(i, position)| {
            let value = mesh.values.get(i).copied().unwrap_or(f32::NAN);
            let color = mesh.colors.get(i).copied().unwrap_or(GRAY);
            let mut element = DefaultElement::new();
            element.insert("x".to_string(), Property::Float(position.x));
            element.insert("y".to_string(), Property::Float(position.y));
            element.insert("z".to_string(), Property::Float(position.z));
            element.insert("value".to_string(), Property::Float(value));
            element.insert("red".to_string(), Property::UChar(color.r));
            element.insert("green".to_string(), Property::UChar(color.g));
            element.insert("blue".to_string(), Property::UChar(color.b));
            element
        })
        .collect();
    let faces = mesh
        .triangles
        .iter()
        .map(|triangle| {
            let mut element = DefaultElement::new();
            element.insert(
                "vertex_indices".to_string(),
                Property::ListInt(triangle.vertices.iter().map(|&v| v as i32).collect()),
            );
            element
        })
        .collect();
    ply.payload.insert("vertex".to_string(), vertices);
    ply.payload.insert("face".to_string(), faces);

    let writer = Writer::new();
    let written = writer.write_ply(out, &mut ply)?;
    log::info!(
        "wrote PLY with {} vertices and {} faces",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(written)
}

/// A JSON-friendly description of a generated surface.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceSummary {
    pub title: Vec<String>,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub edge_count: usize,
    pub cutoff: f32,
    pub is_contoured: bool,
    pub n_contours: usize,
    pub is_color_mapped: bool,
    pub is_precision_color: bool,
    pub data_range: Option<(f32, f32)>,
    pub red_blue: Option<(f32, f32)>,
    pub bounds: Option<[[f32; 3]; 2]>,
    pub compression_ratio: usize,
    pub message: String,
    pub definition_line: String,
}

impl SurfaceSummary {
    pub fn new(mesh: &MeshData, jvxl: &JvxlData) -> Self {
        let mapped = jvxl.is_color_mapped;
        Self {
            title: jvxl.title.clone(),
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            edge_count: jvxl.n_edges,
            cutoff: jvxl.cutoff,
            is_contoured: jvxl.is_contoured,
            n_contours: jvxl.n_contours,
            is_color_mapped: mapped,
            is_precision_color: jvxl.is_precision_color,
            data_range: mapped.then_some(jvxl.mapped_data_range),
            red_blue: mapped.then_some((jvxl.value_mapped_to_red, jvxl.value_mapped_to_blue)),
            bounds: mesh
                .bounds()
                .map(|(lo, hi)| [lo.to_array(), hi.to_array()]),
            compression_ratio: jvxl.compression_ratio,
            message: jvxl.message.clone(),
            definition_line: jvxl.definition_line.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use jvxl_core::Rgba;

    fn triangle_mesh() -> MeshData {
        let mut mesh = MeshData::new();
        let a = mesh.add_vertex(Vec3::ZERO, 0.5);
        let b = mesh.add_vertex(Vec3::X, 1.5);
        let c = mesh.add_vertex(Vec3::Y, 2.5);
        assert!(mesh.add_triangle_checked(a, b, c, 7));
        mesh
    }

    #[test]
    fn test_ply_layout() {
        let mut mesh = triangle_mesh();
        mesh.colors = vec![Rgba::new(255, 0, 0, 255)];
        let mut buf = Vec::new();
        let written = write_ply(&mesh, &mut buf).unwrap();
        assert_eq!(written, buf.len());
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("ply\nformat ascii 1.0\n"));
        assert!(text.contains("element vertex 3"));
        assert!(text.contains("element face 1"));
        assert!(text.contains("property list uchar int vertex_indices"));
        assert!(text.contains("3 0 1 2"));
        assert!(text.contains("255 0 0"));
        // vertices past the color list are gray
        assert!(text.contains("128 128 128"));
    }

    #[test]
    fn test_summary_json() {
        let mesh = triangle_mesh();
        let jvxl = JvxlData {
            title: vec!["unit".to_string()],
            cutoff: 0.5,
            ..JvxlData::default()
        };
        let summary = SurfaceSummary::new(&mesh, &jvxl);
        assert_eq!(summary.bounds, Some([[0.0, 0.0, 0.0], [1.0, 1.0, 0.0]]));
        assert!(summary.data_range.is_none());
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["triangle_count"], 1);
        assert_eq!(json["title"][0], "unit");
    }
}

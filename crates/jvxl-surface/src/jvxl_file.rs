//! Assembly of JVXL files from a generated surface.
//!
//! ```text
//! JVXL <title lines, comments, atom count, vectors, atoms>
//! -nSurfaces edgeBase edgeRange colorBase colorRange JVXL voxel format version 1.0
//! # message
//! # title lines
//! cutoff p1 p2 p3 [a b c d] [nContours] dataMin dataMax red blue
//! <surface runs><compressed edge and color data>
//! #-------end of jvxl file data-------
//! # info lines
//! ```

use jvxl_core::codec::FractionCodec;
use jvxl_core::{compress, Plane};

use crate::text::format_float;

/// Closes the data section of every JVXL file.
pub const END_OF_DATA: &str = "#-------end of jvxl file data-------";

const FORMAT_NAME: &str = "JVXL voxel format version 1.0";

/// Everything needed to write one surface as JVXL.
#[derive(Debug, Clone, PartialEq)]
pub struct JvxlData {
    /// Header lines of the source, with the atom count made negative.
    pub file_header: String,
    pub message: String,
    pub title: Vec<String>,
    pub definition_line: String,
    pub info_line: String,
    /// Run-length inside/outside stream; `None` before a surface exists.
    pub surface_data: Option<String>,
    /// Edge fractions, newline terminated.
    pub edge_data: String,
    /// Color characters, newline terminated; empty when uncolored.
    pub color_data: String,
    pub cutoff: f32,
    pub plane: Option<Plane>,
    pub is_contoured: bool,
    pub n_contours: usize,
    pub is_bicolor_map: bool,
    pub is_precision_color: bool,
    pub is_color_mapped: bool,
    pub mapped_data_range: (f32, f32),
    pub value_mapped_to_red: f32,
    pub value_mapped_to_blue: f32,
    pub edge_codec: FractionCodec,
    pub color_codec: FractionCodec,
    /// Source bytes over JVXL bytes, when the source size is known.
    pub compression_ratio: usize,
    /// Bytes of voxel text read from the source.
    pub n_bytes: usize,
    pub n_edges: usize,
}

impl Default for JvxlData {
    fn default() -> Self {
        Self {
            file_header: String::new(),
            message: String::new(),
            title: Vec::new(),
            definition_line: String::new(),
            info_line: String::new(),
            surface_data: None,
            edge_data: String::new(),
            color_data: String::new(),
            cutoff: 0.0,
            plane: None,
            is_contoured: false,
            n_contours: 0,
            is_bicolor_map: false,
            is_precision_color: false,
            is_color_mapped: false,
            mapped_data_range: (0.0, 0.0),
            value_mapped_to_red: 0.0,
            value_mapped_to_blue: 1.0,
            edge_codec: FractionCodec::default(),
            color_codec: FractionCodec::default(),
            compression_ratio: 0,
            n_bytes: 0,
            n_edges: 0,
        }
    }
}

/// Stream length as written in the definition line: the newline is not counted,
/// and an absent stream is -1.
fn data_count(data: &str) -> i64 {
    data.chars().count() as i64 - 1
}

impl JvxlData {
    /// The line after the atoms announcing `n_surfaces` JVXL surfaces and the codecs.
    pub fn extra_line(&self, n_surfaces: usize) -> String {
        format!(
            "-{n_surfaces} {} {} {} {} {FORMAT_NAME}\n",
            self.edge_codec.base(),
            self.edge_codec.range(),
            self.color_codec.base(),
            self.color_codec.range()
        )
    }

    /// The per-surface definition line, or an empty string before a surface exists.
    pub fn definition_line(&self) -> String {
        self.definition_and_info().map(|(line, _)| line).unwrap_or_default()
    }

    /// The `#` lines describing the surface in words.
    pub fn info_line(&self) -> String {
        self.definition_and_info().map(|(_, info)| info).unwrap_or_default()
    }

    fn definition_and_info(&self) -> Option<(String, String)> {
        let surface_data = self.surface_data.as_deref()?;
        let n_surface = surface_data.chars().count() as i64;
        let n_edge = data_count(&self.edge_data);
        let n_color = data_count(&self.color_data);
        let is_colored = n_color != -1;

        let mut line = format_float(self.cutoff);
        let mut info = format!("# nSurfaceData = {n_surface}; nEdgeData = {n_edge}");
        match &self.plane {
            None => {
                if self.is_contoured {
                    line.push_str(&format!(" -{n_surface} {n_edge}"));
                    info.push_str("; contoured");
                } else if self.is_bicolor_map {
                    line.push_str(&format!(" {n_surface} -{n_edge}"));
                    info.push_str("; bicolor map");
                } else {
                    line.push_str(&format!(" {n_surface} {n_edge}"));
                    if self.is_precision_color && is_colored {
                        info.push_str("; precision colored");
                    } else if n_color > 0 {
                        info.push_str("; colormapped");
                    }
                }
                let p3 = if self.is_precision_color && is_colored {
                    -n_color
                } else {
                    n_color
                };
                line.push_str(&format!(" {p3}"));
            }
            Some(plane) => {
                let p3 = if is_colored { -n_color } else { -1 };
                let coefficients = format!(
                    " {} {} {} {}",
                    format_float(plane.a),
                    format_float(plane.b),
                    format_float(plane.c),
                    format_float(plane.d)
                );
                line.push_str(&format!(" -1 -2 {p3}{coefficients}"));
                info.push_str(&format!(
                    "; {}plane: {{{coefficients} }}",
                    if n_color > 0 { "color mapped " } else { "" }
                ));
            }
        }
        if self.is_contoured {
            line.push_str(&format!(" {}", self.n_contours));
            info.push_str(&format!("; {} contours", self.n_contours));
        }
        let (min, max) = self.mapped_data_range;
        line.push_str(&format!(
            " {} {} {} {}",
            format_float(min),
            format_float(max),
            format_float(self.value_mapped_to_red),
            format_float(self.value_mapped_to_blue)
        ));
        info.push_str(&format!(
            "\n# data minimum = {}; data maximum = {}\n# value mapped to red = {}; value mapped to blue = {}",
            format_float(min),
            format_float(max),
            format_float(self.value_mapped_to_red),
            format_float(self.value_mapped_to_blue)
        ));
        if self.compression_ratio > 0 {
            info.push_str(&format!(
                "; approximate compressionRatio={}:1",
                self.compression_ratio
            ));
        }
        info.push_str("\n# created using jvxl-rs");
        Some((line, info))
    }

    /// Refreshes the definition and info lines after the surface changed.
    pub fn update_info(&mut self, title: &[String], n_bytes: usize) {
        self.title = title.to_vec();
        self.n_bytes = n_bytes;
        self.compression_ratio = 0;
        self.definition_line = self.definition_line();
        if n_bytes > 0 {
            let written = self.jvxl_file(true, 1).len().max(1);
            self.compression_ratio = (n_bytes + self.file_header.len()) / written;
        }
        self.info_line = self.info_line();
    }

    /// The JVXL text of this surface. `include_header` prepends the source header
    /// and the extra line for `n_surfaces` surfaces.
    pub fn jvxl_file(&self, include_header: bool, n_surfaces: usize) -> String {
        let mut data = String::new();
        if include_header {
            data.push_str(&self.file_header);
            data.push_str(&self.extra_line(n_surfaces.max(1)));
            if !data.starts_with("JVXL") {
                let prefix = if data.starts_with('#') { "#JVXL " } else { "JVXL " };
                data.insert_str(0, prefix);
            }
        }
        data.push_str(&format!("# {}\n", self.message));
        for title in &self.title {
            data.push_str(&format!("# {title}\n"));
        }
        data.push_str(&self.definition_line);
        data.push('\n');
        if self.plane.is_none() {
            data.push_str(self.surface_data.as_deref().unwrap_or_default());
            data.push_str(&compress(&format!("{}{}", self.edge_data, self.color_data)));
        } else {
            data.push_str(&compress(&self.color_data));
        }
        data.push_str(END_OF_DATA);
        data.push('\n');
        data.push_str(&self.info_line);
        data.push('\n');
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::SurfaceDefinition;

    fn surface() -> JvxlData {
        JvxlData {
            file_header: "title\nsecond\n-2 0.0 0.0 0.0 ANGSTROMS\n".into(),
            surface_data: Some(" 4 4\n".into()),
            edge_data: "PPPP\n".into(),
            cutoff: 0.5,
            ..JvxlData::default()
        }
    }

    #[test]
    fn test_plain_definition() {
        let data = surface();
        assert_eq!(data.definition_line(), "0.5 5 4 -1 0.0 0.0 0.0 1.0");
        let def = SurfaceDefinition::parse(&data.definition_line(), 1).unwrap();
        assert_eq!(def.surface_count, 5);
        assert_eq!(def.edge_count, 4);
        assert!(!def.is_color_mapped);
    }

    #[test]
    fn test_no_surface_no_definition() {
        assert_eq!(JvxlData::default().definition_line(), "");
        assert_eq!(JvxlData::default().info_line(), "");
    }

    #[test]
    fn test_bicolor_definition() {
        let data = JvxlData {
            is_bicolor_map: true,
            color_data: "####\n".into(),
            mapped_data_range: (-1.0, 1.0),
            value_mapped_to_red: -1.0,
            ..surface()
        };
        let def = SurfaceDefinition::parse(&data.definition_line(), 1).unwrap();
        assert!(def.is_bicolor);
        assert_eq!(def.edge_count, 4);
        assert_eq!(def.color_count, 4);
        assert!(data.info_line().contains("bicolor map"));
    }

    #[test]
    fn test_precision_definition() {
        let data = JvxlData {
            is_precision_color: true,
            color_data: "ab\n".into(),
            ..surface()
        };
        assert!(data.definition_line().starts_with("0.5 5 4 -2 "));
        let def = SurfaceDefinition::parse(&data.definition_line(), 1).unwrap();
        assert!(def.is_precision_color);
        assert_eq!(def.color_count, 2);
        assert!(data.info_line().contains("precision colored"));
    }

    #[test]
    fn test_plane_definition() {
        let data = JvxlData {
            plane: Some(Plane::new(0.0, 0.0, 1.0, -0.5)),
            surface_data: Some(String::new()),
            is_contoured: true,
            n_contours: 9,
            is_precision_color: true,
            color_data: "abcdef\n".into(),
            mapped_data_range: (-2.0, 3.0),
            value_mapped_to_red: -2.0,
            value_mapped_to_blue: 3.0,
            ..surface()
        };
        assert_eq!(
            data.definition_line(),
            "0.5 -1 -2 -6 0.0 0.0 1.0 -0.5 9 -2.0 3.0 -2.0 3.0"
        );
        let def = SurfaceDefinition::parse(&data.definition_line(), 1).unwrap();
        assert_eq!(def.plane, data.plane);
        assert_eq!(def.n_contours, Some(9));
        assert_eq!(def.color_count, 6);
        assert!(def.is_2d_contour());
    }

    #[test]
    fn test_contoured_function_definition() {
        let data = JvxlData {
            is_contoured: true,
            n_contours: 5,
            is_precision_color: true,
            color_data: "abcd\n".into(),
            ..surface()
        };
        let def = SurfaceDefinition::parse(&data.definition_line(), 1).unwrap();
        assert!(def.is_contoured);
        assert_eq!(def.surface_count, 5);
        assert_eq!(def.n_contours, Some(5));
    }

    #[test]
    fn test_file_layout() {
        let mut data = JvxlData {
            message: "mapped".into(),
            edge_data: "PPPPPPPP\n".into(),
            ..surface()
        };
        data.update_info(&["first".to_string()], 0);
        let file = data.jvxl_file(true, 1);
        assert!(file.starts_with("JVXL title\nsecond\n-2 0.0 0.0 0.0 ANGSTROMS\n"));
        assert!(file.contains("\n-1 35 90 35 90 JVXL voxel format version 1.0\n# mapped\n# first\n"));
        assert!(file.contains("\n 4 4\nP~8 \n#-------end of jvxl file data-------\n# nSurfaceData"));
        assert!(file.ends_with("# created using jvxl-rs\n"));

        let body = data.jvxl_file(false, 1);
        assert!(body.starts_with("# mapped\n"));
    }

    #[test]
    fn test_compression_ratio() {
        let mut data = surface();
        data.update_info(&[], 100_000);
        assert!(data.compression_ratio > 1);
        assert!(data.info_line.contains("compressionRatio"));
    }
}

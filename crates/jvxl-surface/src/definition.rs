//! The per-surface definition line of a JVXL file.
//!
//! ```text
//! cutoff p1 p2 p3 [a b c d] [nContours] [dataMin dataMax red blue]
//! ```
//!
//! | p1      | p2    | p3    | meaning                               |
//! |---------|-------|-------|---------------------------------------|
//! | `-1`    | `-2`  |       | plane, precision color follows        |
//! | `< -1`  | `> 0` |       | contoured function                    |
//! | `> 0`   | `< 0` |       | bicolor map                           |
//! |         |       | `> 0` | one-character color data              |
//! |         |       | `-1`  | not colored                           |
//! |         |       | `< -1`| two-character (precision) color data  |

use jvxl_core::options::MAX_CONTOUR_COUNT;
use jvxl_core::{JvxlError, Plane, Result, SurfaceParams};

use crate::text::Tokens;

/// Decoded definition line of one JVXL surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDefinition {
    pub cutoff: f32,
    pub plane: Option<Plane>,
    pub is_contoured: bool,
    /// Contour count stored with a contoured surface.
    pub n_contours: Option<usize>,
    pub is_precision_color: bool,
    pub is_bicolor: bool,
    pub is_color_mapped: bool,
    /// Length of the surface run-length text; zero for planes.
    pub surface_count: usize,
    /// Number of edge fraction characters.
    pub edge_count: usize,
    /// Number of color characters.
    pub color_count: usize,
    /// Data range of color-mapped surfaces, with 0/0 read as -1/1.
    pub data_range: Option<(f32, f32)>,
    /// Values mapped to red and blue, with 0/0 read as -1/1.
    pub red_blue: Option<(f32, f32)>,
}

/// `|p|` when `p` lies beyond `-1`, `p` when positive, else 0.
fn data_count(p: i32) -> usize {
    if p < -1 || p > 0 {
        p.unsigned_abs() as usize
    } else {
        0
    }
}

#[allow(clippy::float_cmp)]
fn default_zero_range(pair: (f32, f32)) -> (f32, f32) {
    if pair.0 == 0.0 && pair.1 == 0.0 {
        (-1.0, 1.0)
    } else {
        pair
    }
}

impl SurfaceDefinition {
    pub fn parse(line: &str, line_number: usize) -> Result<Self> {
        let mut tokens = Tokens::new(line);
        let cutoff = tokens.next_float().ok_or_else(|| {
            JvxlError::header(line_number, format!("JVXL definition line has no cutoff: '{line}'"))
        })?;
        let p1 = tokens.next_int().unwrap_or(0);
        let p2 = tokens.next_int().unwrap_or(0);
        let p3 = match tokens.next_int() {
            None | Some(-1) => 0,
            Some(p) => p,
        };

        let plane = if p1 == -1 {
            let parsed = (|| {
                Some(Plane::new(
                    tokens.next_float()?,
                    tokens.next_float()?,
                    tokens.next_float()?,
                    tokens.next_float()?,
                ))
            })();
            Some(parsed.unwrap_or_else(|| {
                log::error!("could not read 4 floats for the plane definition; using z = 0");
                Plane::default()
            }))
        } else {
            None
        };

        let mut is_contoured = false;
        let mut n_contours = None;
        if p1 < 0 && p2 != -1 {
            is_contoured = p3 != 0;
            n_contours = tokens
                .next_int()
                .and_then(|n| usize::try_from(n).ok())
                .filter(|&n| n > 0 && n <= MAX_CONTOUR_COUNT);
        }

        let is_bicolor = p1 > 0 && p2 < 0;
        let is_color_mapped = p3 != 0;
        let edge_count = if p1 == -1 { 0 } else { data_count(p2) };
        let color_count = if is_bicolor {
            p2.unsigned_abs() as usize
        } else {
            data_count(p3)
        };

        let (mut data_range, mut red_blue) = (None, None);
        if is_color_mapped {
            let values: Vec<f32> = (0..4).map(|_| tokens.next_float().unwrap_or(f32::NAN)).collect();
            if !values[0].is_nan() && !values[1].is_nan() {
                data_range = Some(default_zero_range((values[0], values[1])));
            }
            if !values[2].is_nan() && !values[3].is_nan() {
                red_blue = Some(default_zero_range((values[2], values[3])));
            }
        }

        Ok(Self {
            cutoff,
            plane,
            is_contoured,
            n_contours,
            is_precision_color: (p1 == -1 && p2 == -2) || p3 < 0,
            is_bicolor,
            is_color_mapped,
            surface_count: data_count(p1),
            edge_count,
            color_count,
            data_range,
            red_blue,
        })
    }

    /// Color data belongs to contour vertices rather than surface vertices.
    pub fn is_2d_contour(&self) -> bool {
        self.is_color_mapped && self.is_contoured
    }

    /// Cutoff to report for the surface; bicolor and sign surfaces are split at zero.
    pub fn effective_cutoff(&self, params: &SurfaceParams) -> f32 {
        if self.is_bicolor || params.color_by_sign {
            0.0
        } else {
            self.cutoff
        }
    }

    /// Carries the stored surface settings over to the generation parameters.
    pub fn apply_to(&self, params: &mut SurfaceParams) {
        params.plane = self.plane;
        params.is_contoured = self.is_contoured;
        if params.n_contours == 0 {
            if let Some(n) = self.n_contours {
                params.n_contours = n;
                log::info!("JVXL read: contours {n}");
            }
        }
        params.is_bicolor_map = self.is_bicolor || params.color_by_sign;
        if !self.is_color_mapped {
            return;
        }
        if let Some(range) = self.data_range {
            params.mapped_data_range = Some(range);
            log::info!("JVXL read: data min/max: {}/{}", range.0, range.1);
        }
        if !params.range_defined {
            let (red, blue) = self.red_blue.unwrap_or((0.0, 1.0));
            params.value_mapped_to_red = red;
            params.value_mapped_to_blue = blue;
            params.range_defined = true;
            log::info!("JVXL read: color red/blue: {red} {blue}");
        }
    }
}

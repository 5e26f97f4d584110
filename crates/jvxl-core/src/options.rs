//! Per-surface generation parameters.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color_scheme::{ColorScheme, DEFAULT_NEGATIVE_COLOR, DEFAULT_POSITIVE_COLOR};
use crate::error::JvxlError;
use crate::mesh::Rgba;
use crate::plane::Plane;

/// Cutoff used when none is given.
pub const DEFAULT_CUTOFF: f32 = 0.02;
/// Contour count used when none (or too many) is requested.
pub const DEFAULT_CONTOUR_COUNT: usize = 11;
/// Largest accepted contour count.
pub const MAX_CONTOUR_COUNT: usize = 100;

/// What to do when a volume file ends before all voxel values are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncatedDataPolicy {
    /// Fill the missing values with zero and log a warning.
    #[default]
    ZeroFill,
    /// Fail with [`JvxlError::UnexpectedEof`].
    Error,
}

/// Orbital-style phase used to color a surface by the sign of a coordinate expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPhase {
    #[default]
    X,
    Y,
    Z,
    Xy,
    Yz,
    Xz,
    #[serde(rename = "x2-y2")]
    X2Y2,
    Z2,
}

impl ColorPhase {
    pub const ALL: [ColorPhase; 8] = [
        Self::X,
        Self::Y,
        Self::Z,
        Self::Xy,
        Self::Yz,
        Self::Xz,
        Self::X2Y2,
        Self::Z2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::Xy => "xy",
            Self::Yz => "yz",
            Self::Xz => "xz",
            Self::X2Y2 => "x2-y2",
            Self::Z2 => "z2",
        }
    }

    /// Parses a phase name, falling back to `x` with a warning.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("invalid color phase: {name}");
            Self::X
        })
    }

    /// `+1` where the phase expression is positive at `p`, `-1` elsewhere.
    pub fn evaluate(self, p: Vec3) -> f32 {
        let positive = match self {
            Self::X => p.x > 0.0,
            Self::Y => p.y > 0.0,
            Self::Z => p.z > 0.0,
            Self::Xy => p.x * p.y > 0.0,
            Self::Yz => p.y * p.z > 0.0,
            Self::Xz => p.x * p.z > 0.0,
            Self::X2Y2 => p.x * p.x - p.y * p.y > 0.0,
            Self::Z2 => p.z * p.z * 2.0 - p.x * p.x - p.y * p.y > 0.0,
        };
        if positive {
            1.0
        } else {
            -1.0
        }
    }
}

impl fmt::Display for ColorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorPhase {
    type Err = JvxlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| JvxlError::InvalidProperty {
                name: "phase".into(),
                message: format!("unknown color phase '{s}'"),
            })
    }
}

/// Every option that shapes one generated surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceParams {
    /// Title lines written as `#` comments into the JVXL output.
    pub title: Vec<String>,
    /// 1-based index of the surface to read from a multi-surface file.
    pub file_index: usize,
    /// Multi-surface cube data is stored as whole blocks rather than interleaved.
    pub block_data: bool,
    /// Isosurface cutoff; `None` selects [`DEFAULT_CUTOFF`].
    pub cutoff: Option<f32>,
    pub is_positive_only: bool,
    pub is_cutoff_absolute: bool,
    /// Reverses triangle winding.
    pub inside_out: bool,
    pub plane: Option<Plane>,
    pub is_contoured: bool,
    /// Number of contour levels; 0 selects [`DEFAULT_CONTOUR_COUNT`].
    pub n_contours: usize,
    /// Restricts contour output to one 1-based level.
    pub this_contour: Option<usize>,
    pub is_bicolor_map: bool,
    pub color_by_sign: bool,
    /// Set when coloring by orbital phase.
    pub color_phase: Option<ColorPhase>,
    pub is_color_reversed: bool,
    pub color_scheme: ColorScheme,
    pub color_positive: Rgba,
    pub color_negative: Rgba,
    pub value_mapped_to_red: f32,
    pub value_mapped_to_blue: f32,
    /// Red and blue values were given explicitly.
    pub range_defined: bool,
    /// Data range found by the last coloring pass.
    #[serde(skip)]
    pub mapped_data_range: Option<(f32, f32)>,
    pub truncated_data: TruncatedDataPolicy,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            title: Vec::new(),
            file_index: 1,
            block_data: false,
            cutoff: None,
            is_positive_only: false,
            is_cutoff_absolute: false,
            inside_out: false,
            plane: None,
            is_contoured: false,
            n_contours: 0,
            this_contour: None,
            is_bicolor_map: false,
            color_by_sign: false,
            color_phase: None,
            is_color_reversed: false,
            color_scheme: ColorScheme::default(),
            color_positive: DEFAULT_POSITIVE_COLOR,
            color_negative: DEFAULT_NEGATIVE_COLOR,
            value_mapped_to_red: 0.0,
            value_mapped_to_blue: 1.0,
            range_defined: false,
            mapped_data_range: None,
            truncated_data: TruncatedDataPolicy::default(),
        }
    }
}

impl SurfaceParams {
    /// Loads parameters from a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The effective cutoff.
    pub fn cutoff_or_default(&self) -> f32 {
        self.cutoff.unwrap_or(DEFAULT_CUTOFF)
    }

    pub fn color_by_phase(&self) -> bool {
        self.color_phase.is_some()
    }

    /// Effective contour count, replacing 0 and out-of-range requests with the default.
    pub fn contour_count(&self) -> usize {
        if self.n_contours == 0 || self.n_contours > MAX_CONTOUR_COUNT {
            DEFAULT_CONTOUR_COUNT
        } else {
            self.n_contours
        }
    }

    /// Colors are two-valued rather than taken from the palette.
    pub fn is_two_color(&self) -> bool {
        (self.is_bicolor_map && !self.is_contoured) || self.color_by_sign
    }

    /// Color for values at or below zero.
    pub fn min_color(&self) -> Rgba {
        if self.is_color_reversed {
            self.color_positive
        } else {
            self.color_negative
        }
    }

    /// Color for values above zero.
    pub fn max_color(&self) -> Rgba {
        if self.is_color_reversed {
            self.color_negative
        } else {
            self.color_positive
        }
    }

    /// Settles the data range and the red/blue values before coloring.
    ///
    /// `data_range` supplies the min/max of the values to be colored and is only
    /// called when no usable range is known.
    #[allow(clippy::float_cmp)]
    pub fn set_map_ranges(&mut self, data_range: impl FnOnce() -> (f32, f32)) -> (f32, f32) {
        if self.color_by_phase() || self.color_by_sign || (self.is_bicolor_map && !self.is_contoured)
        {
            self.mapped_data_range = Some((-1.0, 1.0));
        }
        let (mut min, mut max) = match self.mapped_data_range {
            Some((min, max)) if min != max => (min, max),
            _ => data_range(),
        };
        if min == 0.0 && max == 0.0 {
            min = -1.0;
            max = 1.0;
        }
        self.mapped_data_range = Some((min, max));
        if !self.range_defined {
            self.value_mapped_to_red = min;
            self.value_mapped_to_blue = max;
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_evaluation() {
        let p = Vec3::new(1.0, -2.0, 0.5);
        assert_eq!(ColorPhase::X.evaluate(p), 1.0);
        assert_eq!(ColorPhase::Y.evaluate(p), -1.0);
        assert_eq!(ColorPhase::Xy.evaluate(p), -1.0);
        assert_eq!(ColorPhase::X2Y2.evaluate(p), -1.0);
        assert_eq!(ColorPhase::Z2.evaluate(Vec3::new(0.0, 0.0, 1.0)), 1.0);
    }

    #[test]
    fn test_invalid_phase_falls_back_to_x() {
        assert_eq!(ColorPhase::from_name_lossy("_orb"), ColorPhase::X);
        assert_eq!(ColorPhase::from_name_lossy("X2-Y2"), ColorPhase::X2Y2);
    }

    #[test]
    fn test_contour_count() {
        let mut params = SurfaceParams::default();
        assert_eq!(params.contour_count(), 11);
        params.n_contours = 5;
        assert_eq!(params.contour_count(), 5);
        params.n_contours = 101;
        assert_eq!(params.contour_count(), 11);
    }

    #[test]
    fn test_map_ranges() {
        let mut params = SurfaceParams::default();
        assert_eq!(params.set_map_ranges(|| (2.0, 5.0)), (2.0, 5.0));
        assert_eq!(params.value_mapped_to_red, 2.0);
        assert_eq!(params.value_mapped_to_blue, 5.0);

        let mut params = SurfaceParams::default();
        assert_eq!(params.set_map_ranges(|| (0.0, 0.0)), (-1.0, 1.0));

        let mut params = SurfaceParams {
            color_by_sign: true,
            range_defined: true,
            value_mapped_to_red: -0.5,
            value_mapped_to_blue: 0.5,
            ..SurfaceParams::default()
        };
        assert_eq!(params.set_map_ranges(|| unreachable!()), (-1.0, 1.0));
        assert_eq!(params.value_mapped_to_red, -0.5);
    }

    #[test]
    fn test_reversed_sign_colors() {
        let mut params = SurfaceParams::default();
        assert_eq!(params.max_color(), DEFAULT_POSITIVE_COLOR);
        params.is_color_reversed = true;
        assert_eq!(params.max_color(), DEFAULT_NEGATIVE_COLOR);
        assert_eq!(params.min_color(), DEFAULT_POSITIVE_COLOR);
    }

    #[test]
    fn test_json_defaults() {
        let params = SurfaceParams::from_json(r#"{"cutoff": 0.05, "color_scheme": "bwr"}"#).unwrap();
        assert_eq!(params.cutoff, Some(0.05));
        assert_eq!(params.color_scheme, ColorScheme::Bwr);
        assert_eq!(params.file_index, 1);
        let back = SurfaceParams::from_json(&params.to_json().unwrap()).unwrap();
        assert_eq!(back, params);
    }
}

//! Named color scales and the scalar-to-color palette.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JvxlError;
use crate::mesh::Rgba;

/// Color used for NaN values.
pub const GRAY: Rgba = Rgba::from_argb(0xFF80_8080);
/// Default color of positive lobes in sign/bicolor mode.
pub const DEFAULT_POSITIVE_COLOR: Rgba = Rgba::from_argb(0xFF50_20A0);
/// Default color of negative lobes in sign/bicolor mode.
pub const DEFAULT_NEGATIVE_COLOR: Rgba = Rgba::from_argb(0xFFA0_2050);

/// Red, orange, yellow, green, blue in 35 steps.
pub const ROYGB_SCALE: [u32; 35] = [
    0xFFFF_0000, 0xFFFF_2000, 0xFFFF_4000, 0xFFFF_6000, 0xFFFF_8000, 0xFFFF_A000, 0xFFFF_C000,
    0xFFFF_E000, 0xFFFF_F000, 0xFFFF_FF00, 0xFFF0_F000, 0xFFE0_FF00, 0xFFC0_FF00, 0xFFA0_FF00,
    0xFF80_FF00, 0xFF60_FF00, 0xFF40_FF00, 0xFF20_FF00, 0xFF00_FF00, 0xFF00_FF20, 0xFF00_FF40,
    0xFF00_FF60, 0xFF00_FF80, 0xFF00_FFA0, 0xFF00_FFC0, 0xFF00_FFE0, 0xFF00_FFFF, 0xFF00_E0FF,
    0xFF00_C0FF, 0xFF00_A0FF, 0xFF00_80FF, 0xFF00_60FF, 0xFF00_40FF, 0xFF00_20FF, 0xFF00_00FF,
];

/// Red, white, blue in 31 steps.
pub const RWB_SCALE: [u32; 31] = [
    0xFFFF_0000, 0xFFFF_1010, 0xFFFF_2020, 0xFFFF_3030, 0xFFFF_4040, 0xFFFF_5050, 0xFFFF_6060,
    0xFFFF_7070, 0xFFFF_8080, 0xFFFF_9090, 0xFFFF_A0A0, 0xFFFF_B0B0, 0xFFFF_C0C0, 0xFFFF_D0D0,
    0xFFFF_E0E0, 0xFFFF_FFFF, 0xFFE0_E0FF, 0xFFD0_D0FF, 0xFFC0_C0FF, 0xFFB0_B0FF, 0xFFA0_A0FF,
    0xFF90_90FF, 0xFF80_80FF, 0xFF70_70FF, 0xFF60_60FF, 0xFF50_50FF, 0xFF40_40FF, 0xFF30_30FF,
    0xFF20_20FF, 0xFF10_10FF, 0xFF00_00FF,
];

/// Segments of the roygb scale used by the `low` and `high` schemes.
const HALF_SEGMENTS: usize = ROYGB_SCALE.len() / 3;

/// Maps `value` in `[lo, hi]` onto one of `segments` evenly sized bins.
///
/// An empty or inverted range, or a NaN value, selects the middle bin.
pub fn quantize(value: f32, lo: f32, hi: f32, segments: usize) -> usize {
    let range = hi - lo;
    if range <= 0.0 || value.is_nan() {
        return segments / 2;
    }
    let t = value - lo;
    if t <= 0.0 {
        return 0;
    }
    let quanta = range / segments as f32;
    let q = (t / quanta + 0.0001) as usize;
    q.min(segments.saturating_sub(1))
}

/// Source of colors for scalar values.
pub trait Palette {
    /// Color for `value` mapped across `[lo, hi]`.
    fn color_from_palette(&self, value: f32, lo: f32, hi: f32) -> Rgba;
}

/// The built-in color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Red at the low end, blue at the high end.
    #[default]
    Roygb,
    /// Roygb reversed.
    Bgyor,
    /// Red, white, blue.
    Rwb,
    /// Rwb reversed.
    Bwr,
    /// The red-to-yellow third of roygb.
    Low,
    /// The green-to-blue part of roygb, every second step.
    High,
    /// Black to white.
    Bw,
    /// White to black.
    Wb,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 8] = [
        Self::Roygb,
        Self::Bgyor,
        Self::Rwb,
        Self::Bwr,
        Self::Low,
        Self::High,
        Self::Bw,
        Self::Wb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Roygb => "roygb",
            Self::Bgyor => "bgyor",
            Self::Rwb => "rwb",
            Self::Bwr => "bwr",
            Self::Low => "low",
            Self::High => "high",
            Self::Bw => "bw",
            Self::Wb => "wb",
        }
    }

    /// Number of distinct colors the scheme produces.
    pub fn segment_count(self) -> usize {
        match self {
            Self::Roygb | Self::Bgyor | Self::Bw | Self::Wb => ROYGB_SCALE.len(),
            Self::Rwb | Self::Bwr => RWB_SCALE.len(),
            Self::Low | Self::High => HALF_SEGMENTS,
        }
    }

    /// Color for `value` mapped across `[lo, hi]`; NaN is gray.
    pub fn color(self, value: f32, lo: f32, hi: f32) -> Rgba {
        if value.is_nan() {
            return GRAY;
        }
        let n = self.segment_count();
        let argb = match self {
            Self::Roygb => ROYGB_SCALE[quantize(value, lo, hi, n)],
            Self::Bgyor => ROYGB_SCALE[quantize(-value, -hi, -lo, n)],
            Self::Rwb => RWB_SCALE[quantize(value, lo, hi, n)],
            Self::Bwr => RWB_SCALE[quantize(-value, -hi, -lo, n)],
            Self::Low => ROYGB_SCALE[quantize(value, lo, hi, n)],
            Self::High => ROYGB_SCALE[HALF_SEGMENTS + quantize(value, lo, hi, n) * 2],
            Self::Bw => return gray_level(quantize(value, lo, hi, n), n),
            Self::Wb => return gray_level(n - 1 - quantize(value, lo, hi, n), n),
        };
        Rgba::from_argb(argb)
    }
}

fn gray_level(step: usize, segments: usize) -> Rgba {
    let level = (step as f32 / segments as f32 * 255.0) as u8;
    Rgba::new(level, level, level, 0xFF)
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = JvxlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| JvxlError::InvalidProperty {
                name: "setColorScheme".into(),
                message: format!("unknown color scheme '{s}'"),
            })
    }
}

impl Palette for ColorScheme {
    fn color_from_palette(&self, value: f32, lo: f32, hi: f32) -> Rgba {
        self.color(value, lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(0.0, 0.0, 10.0, 10), 0);
        assert_eq!(quantize(0.5, 0.0, 10.0, 10), 0);
        assert_eq!(quantize(1.0, 0.0, 10.0, 10), 1);
        assert_eq!(quantize(9.5, 0.0, 10.0, 10), 9);
        assert_eq!(quantize(42.0, 0.0, 10.0, 10), 9);
        assert_eq!(quantize(-1.0, 0.0, 10.0, 10), 0);
        assert_eq!(quantize(3.0, 1.0, 1.0, 10), 5);
        assert_eq!(quantize(f32::NAN, 0.0, 1.0, 10), 5);
    }

    #[test]
    fn test_scheme_endpoints() {
        let red = Rgba::from_argb(0xFFFF_0000);
        let blue = Rgba::from_argb(0xFF00_00FF);
        assert_eq!(ColorScheme::Roygb.color(0.0, 0.0, 1.0), red);
        assert_eq!(ColorScheme::Roygb.color(1.0, 0.0, 1.0), blue);
        assert_eq!(ColorScheme::Bgyor.color(0.0, 0.0, 1.0), blue);
        assert_eq!(ColorScheme::Rwb.color(0.5, 0.0, 1.0), Rgba::from_argb(0xFFFF_FFFF));
        assert_eq!(ColorScheme::Bwr.color(1.0, 0.0, 1.0), red);
        assert_eq!(ColorScheme::Roygb.color(f32::NAN, 0.0, 1.0), GRAY);
    }

    #[test]
    fn test_low_and_high_stay_in_range() {
        for i in 0..=20 {
            let v = i as f32 / 20.0;
            let _ = ColorScheme::Low.color(v, 0.0, 1.0);
            let _ = ColorScheme::High.color(v, 0.0, 1.0);
        }
        assert_eq!(
            ColorScheme::High.color(0.0, 0.0, 1.0),
            Rgba::from_argb(ROYGB_SCALE[HALF_SEGMENTS])
        );
    }

    #[test]
    fn test_palette_reversal_by_negation() {
        let palette: &dyn Palette = &ColorScheme::Roygb;
        // negating value and range reverses any scheme
        assert_eq!(
            palette.color_from_palette(-1.0, -1.0, 1.0),
            ColorScheme::Bgyor.color(1.0, -1.0, 1.0)
        );
        assert_eq!(
            palette.color_from_palette(1.0, -1.0, 1.0),
            ColorScheme::Bgyor.color(-1.0, -1.0, 1.0)
        );
    }

    #[test]
    fn test_parse_scheme() {
        assert_eq!("BWR".parse::<ColorScheme>().unwrap(), ColorScheme::Bwr);
        assert!("rainbow".parse::<ColorScheme>().is_err());
        for scheme in ColorScheme::ALL {
            assert_eq!(scheme.to_string().parse::<ColorScheme>().unwrap(), scheme);
        }
    }
}

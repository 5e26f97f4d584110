//! Fraction to printable-character codec used by JVXL edge and color streams.
//!
//! A fraction in `[0, 1)` is written as one character `base + trunc(f * range)` and
//! read back at the centre of its bin. Precision mode appends a second character that
//! encodes the residual, giving `range * range` distinct levels.

use crate::error::{JvxlError, Result};

/// Default first character of the encoding (`#`).
pub const DEFAULT_FRACTION_BASE: u8 = 35;
/// Default number of encoding levels.
pub const DEFAULT_FRACTION_RANGE: u8 = 90;
/// Decode offset that places a single character at the centre of its bin.
pub const BIN_CENTER_OFFSET: f32 = 0.5;

const BACKSLASH: u32 = 92;
const BANG: u32 = 33;

/// Bidirectional mapping between fractions and printable ASCII characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FractionCodec {
    base: u8,
    range: u8,
}

impl Default for FractionCodec {
    fn default() -> Self {
        Self {
            base: DEFAULT_FRACTION_BASE,
            range: DEFAULT_FRACTION_RANGE,
        }
    }
}

impl FractionCodec {
    /// Creates a codec; `base + range` must stay printable and below `~`.
    pub fn new(base: u8, range: u8) -> Result<Self> {
        if range == 0 {
            return Err(JvxlError::Codec("fraction range must be positive".into()));
        }
        if base < BANG as u8 || u32::from(base) + u32::from(range) >= u32::from(b'~') {
            return Err(JvxlError::Codec(format!(
                "base {base} with range {range} leaves the printable range"
            )));
        }
        Ok(Self { base, range })
    }

    pub fn base(&self) -> u8 {
        self.base
    }

    pub fn range(&self) -> u8 {
        self.range
    }

    /// The character reserved for NaN.
    pub fn nan_char(&self) -> char {
        char::from(self.base + self.range)
    }

    /// True when `!` stands in for a backslash with this base.
    fn substitutes_backslash(&self) -> bool {
        u32::from(self.base) > BANG
    }

    /// Encodes a fraction as one character.
    pub fn encode(&self, fraction: f32) -> char {
        let fraction = if fraction.is_nan() {
            1.0001
        } else if fraction > 0.9999 {
            0.9999
        } else {
            fraction
        };
        let base = i64::from(self.base);
        let ich = (fraction * f32::from(self.range) + f32::from(self.base)) as i64;
        if ich < base {
            return char::from(self.base);
        }
        let ich = ich.min(base + i64::from(self.range)) as u32;
        if ich == BACKSLASH && self.substitutes_backslash() {
            return char::from(BANG as u8);
        }
        char::from_u32(ich).unwrap_or_else(|| self.nan_char())
    }

    /// Decodes one character; `offset` is 0 for the bin floor and 0.5 for its centre.
    pub fn decode(&self, ch: char, offset: f32) -> f32 {
        let mut ich = ch as u32;
        if ich == u32::from(self.base) + u32::from(self.range) {
            return f32::NAN;
        }
        if ich == BANG && self.substitutes_backslash() {
            ich = BACKSLASH;
        }
        let fraction =
            (ich as f32 - f32::from(self.base) + offset) / f32::from(self.range);
        if fraction < 0.0 {
            0.0
        } else if fraction > 1.0 {
            0.999_999
        } else {
            fraction
        }
    }

    /// Decodes a single-character fraction at its bin centre.
    pub fn decode_fraction(&self, ch: char) -> f32 {
        self.decode(ch, BIN_CENTER_OFFSET)
    }

    /// Encodes a fraction as a coarse character plus a remainder character.
    pub fn encode_precise(&self, fraction: f32) -> (char, char) {
        let coarse = self.encode(fraction);
        let remainder = fraction - self.decode(coarse, 0.0);
        (coarse, self.encode(remainder * f32::from(self.range)))
    }

    /// Inverse of [`encode_precise`](Self::encode_precise).
    pub fn decode_precise(&self, coarse: char, remainder: char) -> f32 {
        self.decode(coarse, 0.0)
            + self.decode(remainder, BIN_CENTER_OFFSET) / f32::from(self.range)
    }

    /// Encodes `value` relative to `[min, max]`; a zero-width range encodes `value` itself.
    pub fn encode_value(&self, value: f32, min: f32, max: f32) -> char {
        self.encode(value_fraction(value, min, max))
    }

    /// Two-character encoding of `value` relative to `[min, max]`.
    pub fn encode_value_precise(&self, value: f32, min: f32, max: f32) -> (char, char) {
        self.encode_precise(value_fraction(value, min, max))
    }

    /// Inverse of [`encode_value_precise`](Self::encode_value_precise).
    #[allow(clippy::float_cmp)]
    pub fn decode_value_precise(&self, coarse: char, remainder: char, min: f32, max: f32) -> f32 {
        let fraction = self.decode_precise(coarse, remainder);
        if min == max {
            fraction
        } else {
            min + fraction * (max - min)
        }
    }
}

#[allow(clippy::float_cmp)]
fn value_fraction(value: f32, min: f32, max: f32) -> f32 {
    if min == max {
        value
    } else {
        (value - min) / (max - min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_codec_bounds() {
        let codec = FractionCodec::default();
        assert_eq!(codec.encode(0.0), '#');
        assert_eq!(codec.encode(-3.0), '#');
        assert_eq!(codec.encode(1.0), '|');
        assert_eq!(codec.nan_char(), '}');
        assert_eq!(codec.encode(f32::NAN), '}');
        assert!(codec.decode_fraction('}').is_nan());
    }

    #[test]
    fn test_backslash_is_substituted() {
        let codec = FractionCodec::default();
        // 57 / 90 lands on character 92
        let fraction = 57.2 / 90.0;
        let ch = codec.encode(fraction);
        assert_eq!(ch, '!');
        let decoded = codec.decode_fraction(ch);
        assert!((decoded - 57.5 / 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(FractionCodec::new(35, 0).is_err());
        assert!(FractionCodec::new(35, 91).is_err());
        assert!(FractionCodec::new(10, 20).is_err());
        assert!(FractionCodec::new(40, 80).is_ok());
    }

    #[test]
    fn test_value_encoding() {
        let codec = FractionCodec::default();
        let (c1, c2) = codec.encode_value_precise(2.5, -5.0, 5.0);
        let value = codec.decode_value_precise(c1, c2, -5.0, 5.0);
        assert!((value - 2.5).abs() < 10.0 / 8100.0);
    }

    #[test]
    fn test_nan_survives_precision() {
        let codec = FractionCodec::default();
        let (c1, c2) = codec.encode_precise(f32::NAN);
        assert!(codec.decode_precise(c1, c2).is_nan());
    }

    proptest! {
        #[test]
        fn single_char_round_trip(f in 0.0f32..=1.0) {
            let codec = FractionCodec::default();
            let decoded = codec.decode_fraction(codec.encode(f));
            prop_assert!((decoded - f).abs() <= 1.0 / 90.0);
        }

        #[test]
        fn precise_round_trip(f in 0.0f32..=1.0) {
            let codec = FractionCodec::default();
            let (c1, c2) = codec.encode_precise(f);
            let decoded = codec.decode_precise(c1, c2);
            prop_assert!((decoded - f).abs() <= 1.0 / 8100.0 + 1e-6);
        }

        #[test]
        fn encoded_chars_are_printable(f in -2.0f32..3.0) {
            let codec = FractionCodec::default();
            let ch = codec.encode(f);
            prop_assert!(ch.is_ascii_graphic());
            prop_assert!(ch != '\\' && ch != '~');
        }
    }
}

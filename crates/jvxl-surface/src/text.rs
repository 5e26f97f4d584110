//! Number formatting and whitespace tokenizing for the line-oriented formats.

use std::str::SplitWhitespace;

/// Formats a float the way JVXL files write them: integral values keep a
/// trailing `.0`, everything else uses the shortest round-tripping form.
#[allow(clippy::float_cmp)]
pub fn format_float(value: f32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1.0e7 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Sequential reader over the whitespace-separated tokens of one line.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            inner: line.split_whitespace(),
        }
    }

    pub fn next_token(&mut self) -> Option<&'a str> {
        self.inner.next()
    }

    /// Consumes the next token and parses it as an integer.
    pub fn next_int(&mut self) -> Option<i32> {
        self.inner.next().and_then(|t| t.parse().ok())
    }

    /// Consumes the next token and parses it as a float.
    pub fn next_float(&mut self) -> Option<f32> {
        self.inner.next().and_then(parse_float)
    }

    /// Remaining tokens as floats; stops at the first token that does not parse.
    pub fn floats(self) -> impl Iterator<Item = f32> + 'a {
        self.inner.map_while(parse_float)
    }
}

/// Parses a float token, accepting Fortran-style `D` exponents.
pub fn parse_float(token: &str) -> Option<f32> {
    token
        .parse()
        .ok()
        .or_else(|| token.replace(['D', 'd'], "E").parse().ok())
}

/// Number of whitespace-separated tokens in `line`.
pub fn count_tokens(line: &str) -> usize {
    line.split_whitespace().count()
}

/// Sum of the leading integer tokens in `line`.
pub fn sum_ints(line: &str) -> usize {
    line.split_whitespace()
        .map_while(|t| t.parse::<i64>().ok())
        .map(|n| n.max(0) as usize)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-2.0), "-2.0");
        assert_eq!(format_float(0.02), "0.02");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(f32::NAN), "NaN");
    }

    #[test]
    fn test_tokens() {
        let mut tokens = Tokens::new("  -3  0.5 abc 1.0D-2 ");
        assert_eq!(tokens.next_int(), Some(-3));
        assert_eq!(tokens.next_float(), Some(0.5));
        assert_eq!(tokens.next_int(), None);
        assert!((tokens.next_float().unwrap() - 0.01).abs() < 1e-7);
        assert_eq!(tokens.next_token(), None);
    }

    #[test]
    fn test_counting() {
        assert_eq!(count_tokens(" 1 2\t3 "), 3);
        assert_eq!(sum_ints(" 4 5 6\n"), 15);
        assert_eq!(sum_ints("7 x 2"), 7);
    }
}

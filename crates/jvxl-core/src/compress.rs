//! Run-length compression for JVXL character streams.
//!
//! A run of four or more identical characters `X` is written as `X~n ` where `n` is
//! the full run length, so `##########` becomes `#~10 `. The escape character is
//! always doubled. Whitespace is never run-compressed, which keeps line structure
//! intact for readers that consume the stream line by line.

use std::fmt::Write;

const ESCAPE: char = '~';
const MIN_RUN: usize = 4;

fn is_plain_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// Compresses `data`; the result always decompresses back to `data`.
pub fn compress(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    let mut chars = data.chars().peekable();
    while let Some(ch) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&ch) {
            chars.next();
            run += 1;
        }
        if ch == ESCAPE {
            for _ in 0..run {
                out.push_str("~~");
            }
        } else if run >= MIN_RUN && !is_plain_whitespace(ch) {
            out.push(ch);
            out.push(ESCAPE);
            let _ = write!(out, "{run} ");
        } else {
            out.extend(std::iter::repeat(ch).take(run));
        }
    }
    out
}

/// Expands a compressed stream.
///
/// Malformed escapes are logged and copied through literally rather than rejected.
pub fn decompress(data: &str) -> String {
    if !data.contains(ESCAPE) {
        return data.to_string();
    }
    let mut out = String::with_capacity(data.len() * 2);
    let mut last: Option<char> = None;
    let mut chars = data.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != ESCAPE {
            out.push(ch);
            last = Some(ch);
            continue;
        }
        if chars.peek() == Some(&ESCAPE) {
            chars.next();
            out.push(ESCAPE);
            last = None;
            continue;
        }
        let mut digits = String::new();
        while let Some(&d) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits.push(d);
            chars.next();
        }
        match (last, digits.parse::<usize>()) {
            (Some(prev), Ok(run)) => {
                if chars.peek() == Some(&' ') {
                    chars.next();
                }
                out.extend(std::iter::repeat(prev).take(run.saturating_sub(1)));
            }
            _ => {
                log::warn!(
                    "unmatched '~' in compressed data after {} characters",
                    out.len()
                );
                out.push(ESCAPE);
                out.push_str(&digits);
                last = digits.chars().last();
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ten_chars() {
        assert_eq!(compress("aaaaaaaaaa"), "a~10 ");
        assert_eq!(decompress("a~10 "), "aaaaaaaaaa");
    }

    #[test]
    fn test_short_runs_untouched() {
        assert_eq!(compress("aaabbbc"), "aaabbbc");
        assert_eq!(compress("    \n\n\n\n"), "    \n\n\n\n");
    }

    #[test]
    fn test_escape_doubled() {
        assert_eq!(compress("a~b"), "a~~b");
        assert_eq!(compress("~~~~~"), "~~~~~~~~~~");
        assert_eq!(decompress("~~~~~~~~~~"), "~~~~~");
    }

    #[test]
    fn test_digits_after_run() {
        let data = "xxxx12345";
        let packed = compress(data);
        assert_eq!(packed, "x~4 12345");
        assert_eq!(decompress(&packed), data);
    }

    #[test]
    fn test_unmatched_escape_is_literal() {
        assert_eq!(decompress("~abc"), "~abc");
        assert_eq!(decompress("ab~"), "ab~");
    }

    #[test]
    fn test_multiline_stream() {
        let data = "####$$$$$$%\n&&&&&&&&&&\n";
        let packed = compress(data);
        assert_eq!(packed.lines().count(), 2);
        assert_eq!(decompress(&packed), data);
    }

    proptest! {
        #[test]
        fn round_trip_printable(s in "[ -~\\n]{0,200}") {
            prop_assert_eq!(decompress(&compress(&s)), s);
        }

        #[test]
        fn round_trip_long_runs(ch in "[!-~]", n in 0usize..1000, tail in "[ -~]{0,8}") {
            let s = format!("{}{}", ch.repeat(n), tail);
            prop_assert_eq!(decompress(&compress(&s)), s);
        }
    }
}

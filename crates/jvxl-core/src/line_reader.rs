//! Line-oriented input with lookahead.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::error::Result;

/// Anything that yields text lines without their terminators.
pub trait LineSource {
    /// Returns the next line, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<String>>;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> Result<Option<String>> {
        (**self).next_line()
    }
}

/// Adapts a [`BufRead`] into a [`LineSource`], accepting `\n` and `\r\n` endings.
#[derive(Debug)]
pub struct BufReadSource<R> {
    inner: R,
}

impl<R: BufRead> BufReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> LineSource for BufReadSource<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// Forward-only reader that can peek ahead without consuming.
#[derive(Debug)]
pub struct LineReader<S> {
    source: S,
    lookahead: VecDeque<String>,
    line_number: usize,
}

impl<'a> LineReader<BufReadSource<&'a [u8]>> {
    /// Reads from an in-memory string.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(BufReadSource::new(text.as_bytes()))
    }
}

impl<R: BufRead> LineReader<BufReadSource<R>> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(BufReadSource::new(reader))
    }
}

impl<S: LineSource> LineReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookahead: VecDeque::new(),
            line_number: 0,
        }
    }

    /// 1-based number of the most recently consumed line.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Consumes and returns the next line.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let line = match self.lookahead.pop_front() {
            Some(line) => Some(line),
            None => self.source.next_line()?,
        };
        if line.is_some() {
            self.line_number += 1;
        }
        Ok(line)
    }

    /// Returns the next line without consuming it.
    pub fn peek_line(&mut self) -> Result<Option<&str>> {
        if self.lookahead.is_empty() {
            match self.source.next_line()? {
                Some(line) => self.lookahead.push_back(line),
                None => return Ok(None),
            }
        }
        Ok(self.lookahead.front().map(String::as_str))
    }

    /// Consumes lines until one that is neither empty nor a `#` comment.
    pub fn next_data_line(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.next_line()? {
            let trimmed = line.trim_start();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}

impl<S: LineSource> LineSource for LineReader<S> {
    fn next_line(&mut self) -> Result<Option<String>> {
        LineReader::next_line(self)
    }
}

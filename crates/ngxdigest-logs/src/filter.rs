//! Coarse candidate line filter
//!
//! Streams a log file and yields only lines matching the coarse pattern,
//! so the structured parse only runs on plausible error lines.

use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// An unparsed candidate line and the file it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: String,
    /// 1-based line number in the source file
    pub line_number: usize,
    pub source: Arc<Path>,
}

/// Lazy, single-pass iterator over the candidate lines of one file.
///
/// A read error ends the sequence early; it is logged, never raised.
pub struct CandidateLines {
    reader: BufReader<File>,
    pattern: Regex,
    source: Arc<Path>,
    line_number: usize,
    buf: Vec<u8>,
    done: bool,
}

impl CandidateLines {
    /// Open a file for filtering
    pub fn open(path: &Path, pattern: &Regex) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            pattern: pattern.clone(),
            source: Arc::from(path),
            line_number: 0,
            buf: Vec::new(),
            done: false,
        })
    }

    /// Next physical line, decoded lossily and stripped of its line ending
    fn next_line(&mut self) -> Option<String> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                Some(String::from_utf8_lossy(&self.buf).into_owned())
            }
            Err(e) => {
                warn!(
                    "Stopped reading {} after line {}: {}",
                    self.source.display(),
                    self.line_number,
                    e
                );
                None
            }
        }
    }
}

impl Iterator for CandidateLines {
    type Item = RawLine;

    fn next(&mut self) -> Option<RawLine> {
        if self.done {
            return None;
        }

        while let Some(text) = self.next_line() {
            if self.pattern.is_match(&text) {
                return Some(RawLine {
                    text,
                    line_number: self.line_number,
                    source: Arc::clone(&self.source),
                });
            }
        }

        self.done = true;
        None
    }
}

impl std::iter::FusedIterator for CandidateLines {}

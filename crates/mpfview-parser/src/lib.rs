//! # mpfview Parser
//!
//! HK MPF program parsing for mpfview.
//! Includes the line tokenizer, the geometry builder and the program
//! reconstructor with its contour state machine.

pub mod builder;
pub mod contour;
pub mod reconstruct;
pub mod tokenizer;

pub use builder::build_segment;
pub use contour::{step, OpenContour, ScanState, Step};
pub use reconstruct::reconstruct;
pub use tokenizer::{lenient_number, tokenize, tokenize_line};

use std::path::Path;

use mpfview_core::{ParseError, Program};
use tracing::debug;

/// MPF program parser
///
/// Stateless between calls: parsing the same text twice yields equal
/// programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MpfParser {
    keep_raw_commands: bool,
}

impl MpfParser {
    /// Create a parser that keeps the tokenized commands on the program
    pub fn new() -> Self {
        Self {
            keep_raw_commands: true,
        }
    }

    /// Drop the tokenized commands once the program is built
    pub fn without_raw_commands(mut self) -> Self {
        self.keep_raw_commands = false;
        self
    }

    /// Parse program text into a [`Program`]
    pub fn parse(&self, text: &str) -> Result<Program, ParseError> {
        debug!("Starting MPF parse, input size: {} bytes", text.len());
        let commands = tokenize(text);
        reconstruct(commands, self.keep_raw_commands)
    }

    /// Read and parse a program file
    pub fn parse_file(&self, path: &Path) -> mpfview_core::Result<Program> {
        let text = std::fs::read_to_string(path)?;
        debug!("Read {}", path.display());
        Ok(self.parse(&text)?)
    }
}

impl Default for MpfParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse program text with the default parser
pub fn parse_mpf(text: &str) -> Result<Program, ParseError> {
    MpfParser::new().parse(text)
}

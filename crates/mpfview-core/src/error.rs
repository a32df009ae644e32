//! Error handling for mpfview
//!
//! Provides the error taxonomy for both pipeline stages:
//! - Parse errors (missing header sections, dangling part references)
//! - Segmentation errors (caller contract violations)
//!
//! All error types use `thiserror` for ergonomic error handling.
//! Malformed individual lines are never errors: the tokenizer drops them
//! or reads their numeric fields as zero.

use thiserror::Error;

/// Program reconstruction error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A mandatory header macro is absent. Fatal to the whole parse.
    #[error("Missing mandatory section: {section}")]
    MissingSection {
        /// The macro name of the missing section (e.g. `HKLDB`).
        section: String,
    },

    /// A nesting entry references a block number that is never marked.
    ///
    /// Local failure: only the affected part is skipped.
    #[error("Part {part_id}: code block N{part_code_block} not found")]
    PartCodeNotFound {
        /// Identifier of the part that could not be built.
        part_id: String,
        /// The block number the nesting entry points at.
        part_code_block: u32,
    },
}

impl ParseError {
    /// Create a missing-section error for the given macro name
    pub fn missing_section(section: impl Into<String>) -> Self {
        ParseError::MissingSection {
            section: section.into(),
        }
    }

    /// Check if this error aborts the whole parse
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::MissingSection { .. })
    }
}

/// Segmentation engine error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentationError {
    /// Step size is zero, negative or not a finite number.
    #[error("Invalid step size: {step_size} (must be a positive number of millimeters)")]
    InvalidStepSize {
        /// The rejected step size.
        step_size: f64,
    },

    /// The step is too small for the segment: `ceil(length / step)` exceeds
    /// [`MAX_STEPS_PER_SEGMENT`](crate::constants::MAX_STEPS_PER_SEGMENT).
    #[error("Step size {step_size} mm is too small for a {length} mm segment (more than {limit} steps)")]
    TooManySteps {
        /// Length of the segment being sampled.
        length: f64,
        /// The requested step size.
        step_size: f64,
        /// The per-segment step limit.
        limit: usize,
    },
}

/// Main error type for mpfview
///
/// A unified error type for calls that read, parse and sample in one go.
#[derive(Error, Debug)]
pub enum Error {
    /// Parse error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Segmentation error
    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a parse error
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// Check if this is a segmentation error
    pub fn is_segmentation_error(&self) -> bool {
        matches!(self, Error::Segmentation(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

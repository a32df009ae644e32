//! # mpfview Core
//!
//! Core types shared by the mpfview crates.
//! Provides the command and program model, 2D geometry primitives,
//! code tables and the error taxonomy.

pub mod codes;
pub mod command;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod program;

pub use codes::{AssistGas, CuttingType, MaterialType, PiercingType};

pub use command::{Command, MacroCall, MotionCommand};

pub use error::{Error, ParseError, Result, SegmentationError};

pub use geometry::{arc_sweep, Bounds, PathSegment, Point2D};

pub use program::{
    Contour, Dimensions, LeadIn, MaterialDescriptor, NestingEntry, Part, Program, SheetSetup,
    SkippedPart,
};

//! # mpfview Visualizer
//!
//! Playback data for mpfview: fixed-step path segmentation, program-level
//! sampling with part placement, and program statistics.

pub mod playback;
pub mod segmentation;
pub mod stats;

pub use playback::{sample_contour, sample_program};
pub use segmentation::{path_length, segment_path, PathLabel, PathPoint, PathSampler, PathType};
pub use stats::{sheet_bounds, ProgramStats};

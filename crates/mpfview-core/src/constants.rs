//! Shared constants for the MPF dialect and the geometry engine.

/// Prefix of the comment that carries the program version (e.g. `;!V3.2`).
pub const VERSION_PREFIX: &str = "!V";

/// Version reported when no version comment is present.
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Tolerance used for coordinate equality checks.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Default playback step size in millimeters.
pub const DEFAULT_STEP_SIZE_MM: f64 = 1.0;

/// Smallest step size the viewer accepts from a user.
pub const MIN_STEP_SIZE_MM: f64 = 0.5;

/// Largest step size the viewer accepts from a user.
pub const MAX_STEP_SIZE_MM: f64 = 100.0;

/// Most parameter steps one segment may be cut into.
pub const MAX_STEPS_PER_SEGMENT: usize = 1_000_000;

/// Single-argument remnant-cut phase that switches the laser to cutting.
pub const REMNANT_PHASE_CUT: i32 = 1;

/// Single-argument remnant-cut phase that closes the remnant contour.
pub const REMNANT_PHASE_END: i32 = 2;

//! # mpfview
//!
//! Parser, geometry reconstruction and playback sampling for HK
//! laser-cutting MPF programs.
//!
//! ## Architecture
//!
//! mpfview is organized as a workspace with multiple crates:
//!
//! 1. **mpfview-core** - Program model, geometry primitives, code tables, errors
//! 2. **mpfview-parser** - Tokenizer, geometry builder, program reconstruction
//! 3. **mpfview-visualizer** - Path segmentation, playback sampling, statistics
//! 4. **mpfview-settings** - Configuration files
//! 5. **mpfview** - `init_logging` and the `mpfview` command line tool

pub use mpfview_core::{
    codes, constants, AssistGas, Bounds, Command, Contour, CuttingType, Dimensions, Error,
    LeadIn, MacroCall, MaterialDescriptor, MaterialType, MotionCommand, NestingEntry, ParseError,
    Part, PathSegment, PiercingType, Point2D, Program, Result, SegmentationError, SheetSetup,
    SkippedPart,
};

pub use mpfview_parser::{build_segment, parse_mpf, tokenize, MpfParser};

pub use mpfview_visualizer::{
    path_length, sample_contour, sample_program, segment_path, sheet_bounds, PathLabel, PathPoint,
    PathSampler, PathType, ProgramStats,
};

pub use mpfview_settings::{
    Config, ConfigFormat, LoggingSettings, SegmentationSettings, SettingsError,
};

/// Read an MPF file and sample its playback points at `step_size` mm
pub fn sample_file(path: &std::path::Path, step_size: f64) -> Result<Vec<PathPoint>> {
    let sampler = PathSampler::new(step_size)?;
    let program = MpfParser::new().without_raw_commands().parse_file(path)?;
    Ok(sample_program(&program, &sampler)?)
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging from the logging settings
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout stays clean for program data
/// - RUST_LOG environment variable support, falling back to `settings.level`
/// - Pretty or JSON formatting
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use anyhow::Context;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("Invalid log level '{}'", settings.level))?,
    };

    if settings.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

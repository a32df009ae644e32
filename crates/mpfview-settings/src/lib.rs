//! mpfview Settings Crate
//!
//! Loads, validates and saves the viewer configuration: the playback step
//! size range and the logging options.

pub mod config;
pub mod error;

pub use config::{Config, ConfigFormat, LoggingSettings, SegmentationSettings};
pub use error::{SettingsError, SettingsResult};

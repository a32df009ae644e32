use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(name = "mpfview")]
#[command(bin_name = "mpfview")]
#[command(version, about, long_about = None)]
pub(crate) struct Opts {
    #[command(subcommand)]
    pub(crate) command: ModeCommand,

    /// Config file (.toml or .json), instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum ModeCommand {
    /// Print the program header, placements and statistics
    Info {
        /// MPF program file
        file: PathBuf,

        /// Print the program tree and statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the sampled playback points
    Sample {
        /// MPF program file
        file: PathBuf,

        /// Sampling distance in mm, clamped to the configured range
        #[arg(long, value_name = "MM")]
        step_size: Option<f64>,

        /// Print the points as a JSON array
        #[arg(long)]
        json: bool,
    },
}

impl Opts {
    /// Log filter requested on the command line, if any
    pub(crate) fn log_level_override(&self) -> Option<String> {
        self.verbose
            .is_present()
            .then(|| self.verbose.log_level_filter().as_str().to_lowercase())
    }
}

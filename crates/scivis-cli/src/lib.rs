//! Command-line drivers for the scivis filters.
//!
//! Each driver is a clap argument struct plus a `run` function, so the
//! binaries in `src/bin/` stay thin and the whole pipeline (load, filter,
//! write) is testable without spawning processes.
//!
//! - [`isocontour`]: `isocontour <input> <output> <iso-value>`
//! - [`streamline`]: `streamline <input> <output> <x> <y> <z>`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use scivis_filters::{ConfigError, FilterError};
use scivis_grid::GridError;
use scivis_io::VtkError;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

pub mod isocontour;
pub mod streamline;

/// Errors surfaced by the command-line drivers.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input path does not name an existing file.
    #[error("input file {path:?} does not exist")]
    MissingInput {
        /// The path as given.
        path: PathBuf,
    },
    /// Reading the grid or writing the result failed.
    #[error(transparent)]
    Vtk(#[from] VtkError),
    /// The requested array is missing or has the wrong kind.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The filter rejected its input.
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// A filter parameter is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Install the stderr log subscriber.
///
/// Use the `RUST_LOG` environment variable to override the default filter.
/// Default is `info` for scivis crates and `warn` for others.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,scivis_cli=info,scivis_io=info,scivis_filters=info,scivis_grid=info")
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Fail with [`CliError::MissingInput`] unless `path` is an existing file.
pub fn ensure_input_exists(path: &Path) -> Result<(), CliError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::MissingInput {
            path: path.to_path_buf(),
        })
    }
}

/// Shared `main` body: parse arguments, run, and map the outcome to an
/// exit code.
///
/// Usage errors print clap's message and exit 1 (`--help` and
/// `--version` exit 0). Run errors log one `error!` line, print the usage
/// line, and exit 1.
pub fn drive<A, T>(
    run: impl FnOnce(&A) -> Result<T, CliError>,
    report: impl FnOnce(&A, T),
) -> ExitCode
where
    A: Parser,
{
    let args = match A::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Nothing useful to do if stderr itself is gone.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging();
    match run(&args) {
        Ok(outcome) => {
            report(&args, outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("{}", A::command().render_usage());
            ExitCode::from(1)
        }
    }
}

//! # Mura
//!
//! Command line front-ends for `mura-core`.
//!
//! - `mura_extract` is installed setuid root. It takes no path argument and
//!   always writes to [`MURA_BLOB_PATH`](mura_core::util::MURA_BLOB_PATH),
//!   since a root process writing to a caller-chosen path could overwrite
//!   anything.
//! - `mura_extract_to` takes the output path as its only argument and is meant
//!   to be run directly by root, e.g. from a provisioning script.
//!
//! Both log to stderr (`RUST_LOG` overrides the default `info` level) and
//! print the report to stdout. Any failure, including a usage error, exits
//! with status 1.

use std::process::ExitCode;

use clap::Parser;
use mura_core::ExtractionReport;

/// Parses the command line.
///
/// On a usage error the message goes to stderr and the returned exit code is
/// a failure; `--help` and `--version` print to stdout and succeed.
pub fn parse_args<T: Parser>() -> Result<T, ExitCode> {
    T::try_parse().map_err(|e| {
        let _ = e.print();
        if e.use_stderr() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    })
}

/// Maps the outcome of a run to the process exit code, reporting errors and
/// their causes on stderr.
pub fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes `env_logger` with `info` as the default level.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Prints `report` to stdout, as JSON if requested.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized.
pub fn print_report(report: &ExtractionReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::info;
use mura_bin::{exit_code, init_logging, parse_args, print_report};
use mura_core::{Credentials, MuraExtractor, Ownership, PlatformConfig};

/// Extract the Galileo mura calibration blob to a given file.
#[derive(Debug, Parser)]
#[command(version)]
struct CliArgs {
    /// Where to write the blob.
    output: PathBuf,
}

fn run(args: CliArgs) -> Result<()> {
    let creds = Credentials::current();
    // only a setuid launch has someone else to hand the file to
    let ownership = if creds.is_elevated() {
        creds.ownership()
    } else {
        Ownership::Keep
    };
    info!("Writing mura blob to {}", args.output.display());

    let report = MuraExtractor::new(PlatformConfig::galileo())
        .ownership(ownership)
        .run(&args.output)?;
    print_report(&report, false)
}

fn main() -> ExitCode {
    let args = match parse_args::<CliArgs>() {
        Ok(args) => args,
        Err(code) => return code,
    };
    init_logging();
    exit_code(run(args))
}

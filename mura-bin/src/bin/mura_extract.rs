use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::info;
use mura_bin::{exit_code, init_logging, parse_args, print_report};
use mura_core::util::MURA_BLOB_PATH;
use mura_core::{Credentials, MuraExtractor, PlatformConfig};

/// Extract the Galileo mura calibration blob to /tmp/mura/blob.tar.
///
/// Must run as root via suid. The output file is handed to the invoking user.
#[derive(Debug, Parser)]
#[command(version)]
struct CliArgs {
    /// Print the report as JSON.
    #[clap(long = "json")]
    json: bool,
}

fn run(args: CliArgs) -> Result<()> {
    let creds = Credentials::current();
    creds.require_root()?;
    info!("Running as uid {} (real {}:{})", creds.euid, creds.uid, creds.gid);

    let report = MuraExtractor::new(PlatformConfig::galileo())
        .ownership(creds.ownership())
        .run(Path::new(MURA_BLOB_PATH))?;

    print_report(&report, args.json)
}

fn main() -> ExitCode {
    let args = match parse_args::<CliArgs>() {
        Ok(args) => args,
        Err(code) => return code,
    };
    init_logging();
    exit_code(run(args))
}

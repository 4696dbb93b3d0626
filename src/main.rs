use std::process::ExitCode;

use clap::Parser;
use izverify::cli::{Arguments, ExitStatus};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_tracing(args.verbose());

    match izverify::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}

/// `IZVERIFY_LOG` takes precedence; otherwise `-v` turns on debug output.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("IZVERIFY_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "izverify=debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

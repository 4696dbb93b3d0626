//! Command-line interface layer.
//!
//! Parses arguments, dispatches to a command and maps its outcome to an
//! [`ExitStatus`].

use std::process::ExitCode;

use anyhow::Result;

pub mod actions;
pub mod args;
pub mod commands;
mod exit_status;
pub mod report;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

use commands::{check::check, fix::fix, init::init, list::list, refs::refs};

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let Some(Arguments { command }) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success.into());
    };

    let status = match command {
        Some(Command::Check(cmd)) => check(cmd)?,
        Some(Command::Refs(cmd)) => refs(cmd)?,
        Some(Command::List(cmd)) => list(cmd)?,
        Some(Command::Fix(cmd)) => fix(cmd)?,
        Some(Command::Init) => init()?,
        None => ExitStatus::Success,
    };

    Ok(status.into())
}

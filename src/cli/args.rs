//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Verify references, definitions and condition chains
//! - `refs`: List every reference to one id
//! - `list`: List the definitions of one entity kind
//! - `fix`: Insert stub definitions for undefined strings and variables
//! - `init`: Create a `.izverifyrc.json` configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use super::commands::check::CheckRule;
use crate::core::EntityKind;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.args.common.verbose,
            Some(Command::Refs(cmd)) => cmd.common.verbose,
            Some(Command::List(cmd)) => cmd.common.verbose,
            Some(Command::Fix(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Installer root directory (where .izverifyrc.json is searched from)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Directory holding install.xml (overrides config file)
    #[arg(long)]
    pub specs_path: Option<String>,

    /// Base directory of <res src> paths (overrides config file)
    #[arg(long)]
    pub resources_path: Option<String>,

    /// Maven pom or IzPack properties file for ${...} substitution
    #[arg(long)]
    pub pom: Option<String>,

    /// Java source root, may be repeated (overrides config file)
    #[arg(long = "source", value_name = "DIR")]
    pub source: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Checks to run (default: all)
    #[arg(value_enum)]
    pub checks: Vec<CheckRule>,
    #[command(flatten)]
    pub args: CheckArgs,
}

#[derive(Debug, Args)]
pub struct RefsCommand {
    /// Condition id, string key, variable name or class name
    pub id: String,

    /// Only look for references of this kind
    #[arg(long, value_enum)]
    pub kind: Option<EntityKind>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ListCommand {
    #[arg(value_enum)]
    pub kind: EntityKind,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Parser)]
pub struct FixArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually insert definitions (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Args)]
pub struct FixCommand {
    #[command(flatten)]
    pub args: FixArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check for undefined and unused entities and broken condition chains
    Check(CheckCommand),
    /// Show every spec and source reference to an id
    Refs(RefsCommand),
    /// List defined conditions, strings, variables or classes
    List(ListCommand),
    /// Insert stub definitions for undefined strings and variables
    Fix(FixCommand),
    /// Initialize a new .izverifyrc.json configuration file
    Init,
}

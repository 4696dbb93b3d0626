use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;

use super::super::{args::ListCommand, exit_status::ExitStatus, report};
use crate::core::{CheckContext, Definition, EntityKind, containers::IzContainer};

pub fn list(cmd: ListCommand) -> Result<ExitStatus> {
    let ctx = CheckContext::new(&cmd.common)?;
    let container = ctx.containers().get(cmd.kind);

    print_definitions_to(
        cmd.kind,
        container.definitions().values(),
        &mut io::stdout().lock(),
    );

    let parse_errors = ctx.parse_errors();
    report::print_parse_warning(parse_errors.len(), cmd.common.verbose);
    if cmd.common.verbose {
        for error in &parse_errors {
            eprintln!("{}: {}", error.file_path, error.error);
        }
    }

    Ok(if parse_errors.is_empty() {
        ExitStatus::Success
    } else {
        ExitStatus::Error
    })
}

/// One line per definition (`key  file:line`), then the count.
pub fn print_definitions_to<'a, W: Write>(
    kind: EntityKind,
    definitions: impl ExactSizeIterator<Item = &'a Definition>,
    writer: &mut W,
) {
    let count = definitions.len();
    let definitions: Vec<&Definition> = definitions.collect();
    let width = definitions
        .iter()
        .map(|def| def.key.chars().count())
        .max()
        .unwrap_or(0);

    for def in &definitions {
        let _ = writeln!(
            writer,
            "{:<width$}  {}",
            def.key,
            format!("{}:{}", def.context.file_path(), def.context.line()).dimmed(),
            width = width
        );
    }

    let noun = if count == 1 {
        kind.to_string()
    } else {
        kind.name().to_string()
    };
    let _ = writeln!(writer, "{}", format!("{} {} defined", count, noun).bold());
}

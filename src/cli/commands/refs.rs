//! Refs command - show where an id is defined and referenced.
//!
//! Searches the reference specs and the Java sources of every entity kind
//! (or only `--kind`) for references whose key is exactly the given id.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;

use super::super::{args::RefsCommand, exit_status::ExitStatus, report};
use crate::core::{
    CheckContext, Definition, EntityKind, Reference, containers::IzContainer,
    seeker::find_id_references,
};

/// Definition and references of an id for one entity kind.
pub struct KindRefs<'a> {
    pub kind: EntityKind,
    pub definition: Option<&'a Definition>,
    pub white_listed: bool,
    pub references: Vec<Reference>,
}

impl KindRefs<'_> {
    fn is_known(&self) -> bool {
        self.definition.is_some() || self.white_listed || !self.references.is_empty()
    }
}

pub fn refs(cmd: RefsCommand) -> Result<ExitStatus> {
    let ctx = CheckContext::new(&cmd.common)?;
    let kinds: Vec<EntityKind> = match cmd.kind {
        Some(kind) => vec![kind],
        None => EntityKind::all().to_vec(),
    };

    let containers = ctx.containers();
    let sources = &ctx.sources().files;
    let found: Vec<KindRefs> = kinds
        .into_iter()
        .map(|kind| {
            let container = containers.get(kind);
            KindRefs {
                kind,
                definition: container.definition(&cmd.id),
                white_listed: container.white_list().contains(&cmd.id),
                references: find_id_references(
                    &cmd.id,
                    &ctx.reference_docs(container),
                    sources,
                    container,
                ),
            }
        })
        .collect();

    print_refs_to(&cmd.id, &found, &mut io::stdout().lock());
    report::print_parse_warning(ctx.parse_errors().len(), cmd.common.verbose);

    let total: usize = found.iter().map(|k| k.references.len()).sum();
    Ok(if total > 0 {
        ExitStatus::Success
    } else {
        ExitStatus::Failure
    })
}

pub fn print_refs_to<W: Write>(id: &str, found: &[KindRefs], writer: &mut W) {
    let total: usize = found.iter().map(|k| k.references.len()).sum();

    for kind_refs in found.iter().filter(|k| k.is_known()) {
        let status = match (kind_refs.definition, kind_refs.white_listed) {
            (Some(def), _) => format!(
                "defined at {}:{}",
                def.context.file_path(),
                def.context.line()
            )
            .green(),
            (None, true) => "white-listed".green(),
            (None, false) => "undefined".red(),
        };
        let _ = writeln!(
            writer,
            "{} \"{}\" ({})",
            kind_refs.kind.to_string().bold(),
            id,
            status
        );

        for reference in &kind_refs.references {
            let ctx = &reference.context;
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}  {}",
                "-->".blue(),
                ctx.file_path(),
                ctx.line(),
                ctx.col(),
                format!("[{}]", ctx.origin).dimmed().cyan()
            );
        }
        let _ = writeln!(writer);
    }

    if total == 0 {
        let _ = writeln!(
            writer,
            "{} No references to \"{}\" found",
            report::FAILURE_MARK.red(),
            id
        );
    } else {
        let _ = writeln!(
            writer,
            "Found {} {} to \"{}\"",
            total,
            if total == 1 { "reference" } else { "references" },
            id
        );
    }
}

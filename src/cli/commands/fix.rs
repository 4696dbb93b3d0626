//! Fix command - Insert stub definitions for undefined strings and variables.
//!
//! Undefined strings get `<str id="key" txt="key"/>` in the selected langpack,
//! undefined variables get `<variable name="key" value=""/>` in the variables
//! spec, both just before the closing tag of the root element.
//!
//! Use `--apply` to actually modify the specs (default is dry-run mode).

use std::collections::BTreeSet;

use anyhow::Result;
use colored::Colorize;

use super::super::{
    actions::{Action, InsertStubDefinition},
    args::FixCommand,
    exit_status::ExitStatus,
    report,
};
use crate::{
    core::{CheckContext, EntityKind},
    issues::{Issue, UndefinedIssue},
    rules::undefined::check_undefined_issues,
};

pub fn fix(cmd: FixCommand) -> Result<ExitStatus> {
    let args = &cmd.args;
    let ctx = CheckContext::new(&args.common)?;
    let apply = args.apply;

    // Never edit specs that did not parse.
    let parse_errors = ctx.parse_errors();
    if !parse_errors.is_empty() {
        let issues: Vec<Issue> = parse_errors.into_iter().map(Issue::ParseError).collect();
        report::report(&issues);
        return Ok(ExitStatus::Error);
    }

    let action = InsertStubDefinition::for_context(&ctx);
    let mut issues: Vec<UndefinedIssue> = check_undefined_issues(&ctx, EntityKind::Strings);
    issues.extend(check_undefined_issues(&ctx, EntityKind::Variables));

    if issues.is_empty() {
        println!(
            "{} {}",
            report::SUCCESS_MARK.green(),
            "No undefined strings or variables".green()
        );
        return Ok(ExitStatus::Success);
    }

    let (fixable, unfixable): (Vec<UndefinedIssue>, Vec<UndefinedIssue>) =
        issues.into_iter().partition(|issue| action.can_fix(issue));
    print_unfixable(&unfixable);

    if fixable.is_empty() {
        return Ok(ExitStatus::Failure);
    }

    let ops = action.to_operations(&fixable);
    let file_count = ops
        .iter()
        .map(|op| op.file())
        .collect::<BTreeSet<_>>()
        .len();

    if apply {
        let stats = action.run(&fixable)?;
        println!(
            "{} {} definition(s) in {} file(s) (processed {} issue(s)).",
            "Inserted".green().bold(),
            stats.changes_applied,
            stats.files_modified,
            fixable.len()
        );
        if unfixable.is_empty() {
            Ok(ExitStatus::Success)
        } else {
            Ok(ExitStatus::Failure)
        }
    } else {
        action.preview(&fixable);
        println!(
            "{} {} definition(s) in {} file(s).",
            "Would insert".yellow().bold(),
            ops.len(),
            file_count
        );
        println!("Run with {} to insert these definitions.", "--apply".cyan());
        // Dry run with work left to do.
        Ok(ExitStatus::Failure)
    }
}

fn print_unfixable(issues: &[UndefinedIssue]) {
    let kinds: BTreeSet<EntityKind> = issues.iter().map(|issue| issue.kind).collect();
    for kind in kinds {
        let count = issues.iter().filter(|issue| issue.kind == kind).count();
        println!(
            "{} Cannot fix {} undefined {}: no {} spec found",
            report::FAILURE_MARK.red(),
            count,
            report::plural(count, &kind.to_string()),
            match kind {
                EntityKind::Strings => "langpack",
                _ => "variables",
            }
        );
    }
}

use anyhow::Result;
use clap::ValueEnum;

use super::super::{args::CheckCommand, exit_status::ExitStatus, report};
use crate::{
    core::{CheckContext, EntityKind},
    issues::{Issue, Severity},
    rules::{
        dependencies::check_dependency_issues, undefined::check_undefined_issues,
        unresolved::check_unresolved_issues, unused::check_unused_issues,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum CheckRule {
    /// Referenced conditions must be defined
    Conditions,
    /// Referenced strings must be in the langpack
    Strings,
    /// Referenced variables must be defined
    Variables,
    /// Referenced classes must exist under a source root
    Classes,
    /// Condition chains must reach defined conditions and variables
    Dependencies,
    /// Defined conditions and variables must be referenced
    Unused,
    /// Lookup keys must be string literals
    Unresolved,
}

impl CheckRule {
    pub fn all() -> Vec<CheckRule> {
        vec![
            CheckRule::Conditions,
            CheckRule::Strings,
            CheckRule::Variables,
            CheckRule::Classes,
            CheckRule::Dependencies,
            CheckRule::Unused,
            CheckRule::Unresolved,
        ]
    }
}

pub fn check(cmd: CheckCommand) -> Result<ExitStatus> {
    let common = &cmd.args.common;
    let ctx = CheckContext::new(common)?;

    let checks = if cmd.checks.is_empty() {
        CheckRule::all()
    } else {
        cmd.checks.clone()
    };

    let mut all_issues = collect_issues(&ctx, &checks);
    let parse_errors = ctx.parse_errors();
    let parse_error_count = parse_errors.len();
    all_issues.extend(parse_errors.into_iter().map(Issue::ParseError));
    all_issues.sort();

    if all_issues.is_empty() {
        report::print_success(ctx.documents().len(), ctx.sources().files.len());
    } else {
        report::report(&all_issues);
    }
    report::print_parse_warning(parse_error_count, common.verbose);

    let has_errors = all_issues
        .iter()
        .any(|issue| issue.severity() == Severity::Error);
    Ok(if has_errors {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    })
}

/// Run the selected rules, each once, in the order given.
pub fn collect_issues(ctx: &CheckContext, checks: &[CheckRule]) -> Vec<Issue> {
    let mut seen = Vec::new();
    let mut all_issues: Vec<Issue> = Vec::new();

    for &check in checks {
        if seen.contains(&check) {
            continue;
        }
        seen.push(check);

        match check {
            CheckRule::Conditions => undefined(ctx, EntityKind::Conditions, &mut all_issues),
            CheckRule::Strings => undefined(ctx, EntityKind::Strings, &mut all_issues),
            CheckRule::Variables => undefined(ctx, EntityKind::Variables, &mut all_issues),
            CheckRule::Classes => undefined(ctx, EntityKind::Classes, &mut all_issues),
            CheckRule::Dependencies => {
                all_issues.extend(check_dependency_issues(ctx));
            }
            CheckRule::Unused => {
                let issues = check_unused_issues(ctx);
                all_issues.extend(issues.into_iter().map(Issue::Unused));
            }
            CheckRule::Unresolved => {
                let issues = check_unresolved_issues(ctx);
                all_issues.extend(issues.into_iter().map(Issue::UnresolvedReference));
            }
        }
        tracing::debug!(check = ?check, total = all_issues.len(), "check finished");
    }

    all_issues
}

fn undefined(ctx: &CheckContext, kind: EntityKind, all_issues: &mut Vec<Issue>) {
    let issues = check_undefined_issues(ctx, kind);
    all_issues.extend(issues.into_iter().map(Issue::Undefined));
}

//! Unused definition detection rule.
//!
//! Detects conditions and variables that are defined but never referenced.
//! A condition also counts as used when another condition combines it, and
//! a variable when a condition tests it.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    core::{CheckContext, Definition, EntityKind, containers::IzContainer, seeker::unused},
    issues::UnusedIssue,
};

pub fn check_unused_issues(ctx: &CheckContext) -> Vec<UnusedIssue> {
    let containers = ctx.containers();
    let mut issues = Vec::new();

    let conditions = &containers.conditions;
    let mut referenced = ctx.references(EntityKind::Conditions).keys();
    referenced.extend(conditions.referenced_by_conditions());
    issues.extend(check_unused(
        EntityKind::Conditions,
        conditions.definitions(),
        &referenced,
    ));

    let tested = conditions.referenced_variables();
    let mut referenced = ctx.references(EntityKind::Variables).keys();
    referenced.extend(tested.iter().map(|(variable, _)| variable.as_str()));
    issues.extend(check_unused(
        EntityKind::Variables,
        containers.variables.definitions(),
        &referenced,
    ));

    issues
}

/// Definitions whose key is not in `referenced`, ordered by key.
pub fn check_unused(
    kind: EntityKind,
    definitions: &BTreeMap<String, Definition>,
    referenced: &BTreeSet<&str>,
) -> Vec<UnusedIssue> {
    unused(definitions, referenced)
        .into_iter()
        .map(|definition| UnusedIssue {
            kind,
            definition: definition.clone(),
        })
        .collect()
}

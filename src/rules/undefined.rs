//! Undefined reference detection rule.
//!
//! Detects conditions, strings, variables and classes that are referenced in
//! a spec file or in source code but have no definition.

use std::collections::BTreeSet;

use crate::{
    core::{CheckContext, EntityKind, Reference, containers::IzContainer},
    issues::UndefinedIssue,
};

pub fn check_undefined_issues(ctx: &CheckContext, kind: EntityKind) -> Vec<UndefinedIssue> {
    let container = ctx.containers().get(kind);
    check_undefined(container, ctx.references(kind).all())
}

/// One issue per reference whose key the container does not define.
///
/// The same key at the same position is reported once even when several
/// lookup patterns match it.
pub fn check_undefined<'a>(
    container: &dyn IzContainer,
    references: impl IntoIterator<Item = &'a Reference>,
) -> Vec<UndefinedIssue> {
    let mut seen = BTreeSet::new();
    references
        .into_iter()
        .filter(|reference| !container.is_defined(&reference.key))
        .filter(|reference| {
            seen.insert((reference.key.clone(), reference.context.location.clone()))
        })
        .map(|reference| UndefinedIssue {
            kind: container.kind(),
            key: reference.key.clone(),
            context: reference.context.clone(),
        })
        .collect()
}

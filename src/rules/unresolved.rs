//! Unresolved reference detection rule.
//!
//! Reports lookup calls whose key cannot be determined statically:
//! - Runtime variables: `getVariable(name)` with no literal assigned to `name`
//! - Compound keys: `getString(prefix + ".title")`
//! - Field access: `getString(Keys.TITLE)`

use crate::{
    core::{CheckContext, EntityKind, UnresolvedReference},
    issues::UnresolvedReferenceIssue,
};

pub fn check_unresolved_issues(ctx: &CheckContext) -> Vec<UnresolvedReferenceIssue> {
    EntityKind::all()
        .into_iter()
        .flat_map(|kind| check_unresolved(kind, &ctx.references(kind).code.unresolved))
        .collect()
}

pub fn check_unresolved(
    kind: EntityKind,
    unresolved: &[UnresolvedReference],
) -> Vec<UnresolvedReferenceIssue> {
    unresolved
        .iter()
        .map(|reference| UnresolvedReferenceIssue {
            kind,
            context: reference.context.clone(),
            expression: reference.expression.clone(),
            reason: reference.reason.clone(),
        })
        .collect()
}

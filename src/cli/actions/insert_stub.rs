//! InsertStubDefinition action.
//!
//! Inserts placeholder definitions for undefined strings and variables.
//! Used by the `izverify fix` command.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;

use super::operation::{Operation, escape_attr};
use super::traits::{Action, ActionStats, execute_operations};
use crate::core::{CheckContext, EntityKind};
use crate::issues::UndefinedIssue;

/// Spec file that receives the stubs of one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubTarget {
    pub file: PathBuf,
    pub display_path: String,
}

/// Action to insert `<str id txt>` and `<variable name value>` stubs.
///
/// Strings go into the selected langpack, variables into the variables
/// spec. Issues of other kinds, or of a kind without a target file, are
/// skipped.
#[derive(Debug, Default)]
pub struct InsertStubDefinition {
    pub strings: Option<StubTarget>,
    pub variables: Option<StubTarget>,
}

impl InsertStubDefinition {
    pub fn for_context(ctx: &CheckContext) -> Self {
        let target = |file: PathBuf| StubTarget {
            display_path: ctx.display_path(&file),
            file,
        };
        Self {
            strings: ctx.langpack_path().map(&target),
            variables: ctx.paths.get_path("variables").map(&target),
        }
    }

    fn target(&self, kind: EntityKind) -> Option<&StubTarget> {
        match kind {
            EntityKind::Strings => self.strings.as_ref(),
            EntityKind::Variables => self.variables.as_ref(),
            EntityKind::Conditions | EntityKind::Classes => None,
        }
    }

    /// Whether an issue of this kind can be fixed by this action.
    pub fn can_fix(&self, issue: &UndefinedIssue) -> bool {
        self.target(issue.kind).is_some()
    }

    fn format_stub(kind: EntityKind, key: &str) -> Option<String> {
        let key = escape_attr(key);
        match kind {
            EntityKind::Strings => Some(format!("<str id=\"{0}\" txt=\"{0}\"/>", key)),
            EntityKind::Variables => Some(format!("<variable name=\"{}\" value=\"\"/>", key)),
            EntityKind::Conditions | EntityKind::Classes => None,
        }
    }
}

impl Action<UndefinedIssue> for InsertStubDefinition {
    /// One operation per distinct key and target file.
    fn to_operations(&self, issues: &[UndefinedIssue]) -> Vec<Operation> {
        let mut seen: BTreeSet<(EntityKind, &str)> = BTreeSet::new();
        issues
            .iter()
            .filter_map(|issue| {
                let target = self.target(issue.kind)?;
                if !seen.insert((issue.kind, issue.key.as_str())) {
                    return None;
                }
                Some(Operation::InsertDefinition {
                    file: target.file.clone(),
                    display_path: target.display_path.clone(),
                    key: issue.key.clone(),
                    element: Self::format_stub(issue.kind, &issue.key)?,
                })
            })
            .collect()
    }

    /// Override run to count issues without a target file as skipped.
    fn run(&self, issues: &[UndefinedIssue]) -> Result<ActionStats> {
        let ops = self.to_operations(issues);
        let mut stats = execute_operations(&ops)?;
        stats.skipped = issues.iter().filter(|issue| !self.can_fix(issue)).count();
        Ok(stats)
    }
}

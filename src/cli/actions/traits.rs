//! Action trait definition.
//!
//! Actions convert Issues into Operations. An action carries the files it
//! writes to, so the same issue list can be previewed or applied.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::Result;

use super::operation::Operation;

/// Statistics from running an action.
#[derive(Debug, Clone, Default)]
pub struct ActionStats {
    /// Number of issues processed.
    pub processed: usize,
    /// Number of issues skipped (no target file for their kind).
    pub skipped: usize,
    /// Number of changes actually applied to files.
    pub changes_applied: usize,
    /// Number of files modified.
    pub files_modified: usize,
}

impl std::ops::AddAssign for ActionStats {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.changes_applied += other.changes_applied;
        self.files_modified += other.files_modified;
    }
}

/// Action trait - converts Issues into Operations and executes them.
///
/// # Example
///
/// ```ignore
/// let action = InsertStubDefinition::for_context(&ctx);
/// if apply {
///     action.run(&issues)?;
/// } else {
///     action.preview(&issues);
/// }
/// ```
pub trait Action<I> {
    /// Convert issues to low-level operations.
    ///
    /// This is the only method that must be implemented.
    fn to_operations(&self, issues: &[I]) -> Vec<Operation>;

    /// Execute the action (modify files).
    fn run(&self, issues: &[I]) -> Result<ActionStats> {
        let ops = self.to_operations(issues);
        execute_operations(&ops)
    }

    /// Preview the action (dry-run mode).
    fn preview(&self, issues: &[I]) {
        let ops = self.to_operations(issues);
        for op in &ops {
            op.preview();
        }
    }
}

/// Apply operations file by file; each file is read and written once.
pub(crate) fn execute_operations(ops: &[Operation]) -> Result<ActionStats> {
    let mut by_file: BTreeMap<PathBuf, Vec<&Operation>> = BTreeMap::new();
    for op in ops {
        by_file.entry(op.file().to_path_buf()).or_default().push(op);
    }

    let mut files_modified: BTreeSet<PathBuf> = BTreeSet::new();
    let mut changes_applied = 0;

    for (file, file_ops) in by_file {
        let applied = Operation::apply_insert_ops(&file, &file_ops)?;
        if applied > 0 {
            changes_applied += applied;
            files_modified.insert(file);
        }
    }

    Ok(ActionStats {
        processed: ops.len(),
        skipped: 0,
        changes_applied,
        files_modified: files_modified.len(),
    })
}

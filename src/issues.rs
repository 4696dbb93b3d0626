//! Issue types for installer verification results.
//!
//! Each issue is self-contained with all information needed by:
//! - Reporter: to display the issue to users
//! - Action: to fix the issue (insert stub definitions)

use enum_dispatch::enum_dispatch;

use crate::core::{
    Definition, EntityKind, SourceContext, UnresolvedReason,
    dependencies::{DependencyNode, NodeKind, render_path, render_tree},
};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    Undefined(EntityKind),
    Unused(EntityKind),
    BrokenDependency,
    CyclicDependency,
    UnresolvedReference,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Undefined(kind) => write!(f, "undefined-{}", kind),
            Rule::Unused(kind) => write!(f, "unused-{}", kind),
            Rule::BrokenDependency => write!(f, "broken-dependency"),
            Rule::CyclicDependency => write!(f, "cyclic-dependency"),
            Rule::UnresolvedReference => write!(f, "unresolved-reference"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Issue Types - References
// ============================================================

/// Key referenced in a spec or in source code but never defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndefinedIssue {
    pub kind: EntityKind,
    pub key: String,
    pub context: SourceContext,
}

impl UndefinedIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule(&self) -> Rule {
        Rule::Undefined(self.kind)
    }
}

/// Key defined in a spec but never referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedIssue {
    pub kind: EntityKind,
    pub definition: Definition,
}

impl UnusedIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule(&self) -> Rule {
        Rule::Unused(self.kind)
    }
}

/// Key passed to a lookup call that can only be known at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReferenceIssue {
    pub kind: EntityKind,
    pub context: SourceContext,
    /// The argument as written.
    pub expression: String,
    pub reason: UnresolvedReason,
}

impl UnresolvedReferenceIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnresolvedReference
    }
}

// ============================================================
// Issue Types - Condition Dependencies
// ============================================================

/// Condition chain reaching an undefined condition or variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenDependencyIssue {
    /// Definition of the condition holding the broken link.
    pub context: SourceContext,
    /// From the root condition to the undefined node.
    pub path: Vec<DependencyNode>,
}

impl BrokenDependencyIssue {
    /// An undefined variable only makes the condition false at runtime; an
    /// undefined condition fails the installer.
    pub fn severity(&self) -> Severity {
        match self.missing().map(|node| node.kind) {
            Some(NodeKind::Variable) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn rule() -> Rule {
        Rule::BrokenDependency
    }

    pub fn missing(&self) -> Option<&DependencyNode> {
        self.path.last()
    }
}

/// Condition chain that refers back to a condition already on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicDependencyIssue {
    pub context: SourceContext,
    /// Ends with the repeated condition.
    pub path: Vec<DependencyNode>,
}

impl CyclicDependencyIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::CyclicDependency
    }
}

// ============================================================
// Special Issue Types
// ============================================================

/// Spec or source file could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A problem found while verifying an installer.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    Undefined(UndefinedIssue),
    Unused(UnusedIssue),
    UnresolvedReference(UnresolvedReferenceIssue),
    BrokenDependency(BrokenDependencyIssue),
    CyclicDependency(CyclicDependencyIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::Undefined(_) => UndefinedIssue::severity(),
            Issue::Unused(_) => UnusedIssue::severity(),
            Issue::UnresolvedReference(_) => UnresolvedReferenceIssue::severity(),
            Issue::BrokenDependency(issue) => issue.severity(),
            Issue::CyclicDependency(_) => CyclicDependencyIssue::severity(),
            Issue::ParseError(_) => ParseErrorIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::Undefined(issue) => issue.rule(),
            Issue::Unused(issue) => issue.rule(),
            Issue::UnresolvedReference(_) => UnresolvedReferenceIssue::rule(),
            Issue::BrokenDependency(_) => BrokenDependencyIssue::rule(),
            Issue::CyclicDependency(_) => CyclicDependencyIssue::rule(),
            Issue::ParseError(_) => ParseErrorIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Spec or source location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only (for ParseError - no line context).
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
///
/// Implemented by all issue types; `enum_dispatch` forwards the calls on
/// the `Issue` enum.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display (key, error, ...).
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }

    /// Extra lines printed below the note (dependency trees).
    fn trace(&self) -> Vec<String> {
        Vec::new()
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for UndefinedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.key.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        self.rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!(
            "{} referenced in {} but not defined",
            self.kind, self.context.origin
        ))
    }

    fn hint(&self) -> Option<&str> {
        match self.kind {
            EntityKind::Strings | EntityKind::Variables => {
                Some("run `izverify fix --apply` to insert a stub definition")
            }
            _ => None,
        }
    }
}

impl Report for UnusedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.definition.context)
    }

    fn message(&self) -> String {
        self.definition.key.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        self.rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("{} is defined but never referenced", self.kind))
    }
}

impl Report for UnresolvedReferenceIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.expression.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("{} key from {}", self.kind, self.reason))
    }

    fn hint(&self) -> Option<&str> {
        Some("pass the key as a string literal so it can be verified")
    }
}

impl Report for BrokenDependencyIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.missing()
            .map(|node| node.id.clone())
            .unwrap_or_default()
    }

    fn report_severity(&self) -> Severity {
        self.severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(render_path(&self.path))
    }

    fn trace(&self) -> Vec<String> {
        render_tree(&self.path)
    }
}

impl Report for CyclicDependencyIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.path
            .last()
            .map(|node| node.id.clone())
            .unwrap_or_default()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(render_path(&self.path))
    }

    fn trace(&self) -> Vec<String> {
        render_tree(&self.path)
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    fn sort_file_path(&self) -> &str {
        match self.location() {
            ReportLocation::Source(ctx) => &ctx.location.file_path,
            ReportLocation::File { path } => path,
        }
    }

    fn sort_line(&self) -> usize {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.location.line,
            ReportLocation::File { .. } => 0,
        }
    }

    fn sort_col(&self) -> usize {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.location.col,
            ReportLocation::File { .. } => 0,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: file_path, line, col, rule, message
        self.sort_file_path()
            .cmp(other.sort_file_path())
            .then_with(|| self.sort_line().cmp(&other.sort_line()))
            .then_with(|| self.sort_col().cmp(&other.sort_col()))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================

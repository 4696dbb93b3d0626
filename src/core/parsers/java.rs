//! Java sources scanned as plain text.
//!
//! Installer code is never compiled; references are found line by line with
//! regular expressions, so broken syntax (a missing semicolon, an unbalanced
//! call) only affects the line it is on.

use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::LazyLock,
};

use regex::Regex;

use crate::core::IzError;

static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(//|/\*|\*)").unwrap());

static STRING_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bString\s+([A-Za-z_$][\w$]*)\s*=\s*"([^"]*)""#).unwrap()
});

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").unwrap());

static FIELD_ACCESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*(\.[A-Za-z_$][\w$]*)+$").unwrap());

/// Shape of a captured call argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument<'a> {
    /// `"some.key"`, quotes removed.
    Literal(&'a str),
    /// `key1`
    Identifier(&'a str),
    /// `prefix + ".title"`
    Compound,
    /// `Keys.TITLE`
    FieldAccess,
    /// Nested calls, empty arguments and anything else.
    Other,
}

pub fn classify_argument(raw: &str) -> Argument<'_> {
    let arg = raw.trim();
    if arg.is_empty() {
        return Argument::Other;
    }
    if let Some(inner) = string_literal(arg) {
        return Argument::Literal(inner);
    }
    // Nested calls are matched by their own patterns.
    if arg.contains('(') {
        return Argument::Other;
    }
    if arg.contains('+') {
        return Argument::Compound;
    }
    if IDENTIFIER.is_match(arg) {
        return Argument::Identifier(arg);
    }
    if FIELD_ACCESS.is_match(arg) {
        return Argument::FieldAccess;
    }
    Argument::Other
}

fn string_literal(arg: &str) -> Option<&str> {
    let inner = arg.strip_prefix('"')?.strip_suffix('"')?;
    (!inner.contains('"')).then_some(inner)
}

pub fn is_comment_line(line: &str) -> bool {
    COMMENT_LINE.is_match(line)
}

/// A Java file loaded for scanning.
#[derive(Debug, Clone)]
pub struct JavaSource {
    /// Display path used in reports.
    pub path: String,
    pub content: String,
    /// `String name = "value"` bindings, first assignment wins.
    assignments: HashMap<String, String>,
}

impl JavaSource {
    pub fn read(path: &Path, display_path: impl Into<String>) -> Result<Self, IzError> {
        let bytes = fs::read(path).map_err(|e| IzError::io(path, e))?;
        Ok(Self::new(
            display_path,
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    }

    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let mut assignments = HashMap::new();
        for caps in STRING_ASSIGNMENT.captures_iter(&content) {
            assignments
                .entry(caps[1].to_string())
                .or_insert_with(|| caps[2].to_string());
        }
        Self {
            path: path.into(),
            content,
            assignments,
        }
    }

    /// Lines with their 1-indexed numbers.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.content.lines().enumerate().map(|(idx, line)| (idx + 1, line))
    }

    /// Value of the string literal assigned to `identifier` in this file.
    pub fn resolve(&self, identifier: &str) -> Option<&str> {
        self.assignments.get(identifier).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_literal() {
        assert_eq!(
            classify_argument("\"some.string.3\""),
            Argument::Literal("some.string.3")
        );
        assert_eq!(classify_argument(" \"a\" "), Argument::Literal("a"));
    }

    #[test]
    fn test_classify_identifier() {
        assert_eq!(classify_argument("key1"), Argument::Identifier("key1"));
        assert_eq!(classify_argument("$tmp"), Argument::Identifier("$tmp"));
    }

    #[test]
    fn test_classify_compound() {
        assert_eq!(classify_argument("prefix + \".title\""), Argument::Compound);
        assert_eq!(classify_argument("\"a\" + \"b\""), Argument::Compound);
    }

    #[test]
    fn test_classify_nested_call_is_ignored() {
        assert_eq!(
            classify_argument("idata.langpack.getString(key2"),
            Argument::Other
        );
        assert_eq!(
            classify_argument("String.format(idata.langpack.getString(\"some.string.5\""),
            Argument::Other
        );
    }

    #[test]
    fn test_classify_field_access() {
        assert_eq!(classify_argument("Keys.TITLE"), Argument::FieldAccess);
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify_argument(""), Argument::Other);
        assert_eq!(classify_argument("42"), Argument::Other);
    }

    #[test]
    fn test_comment_lines() {
        assert!(is_comment_line("  // getString(\"x\")"));
        assert!(is_comment_line("/* block */"));
        assert!(is_comment_line("   * continued"));
        assert!(!is_comment_line("String a = \"x\"; // trailing"));
    }

    #[test]
    fn test_resolve_assignments() {
        let source = JavaSource::new(
            "Foo.java",
            "String key1 = \"some.string.1\";\n\
             String key3 = \"some.string.6\"\n\
             String key1 = \"shadowed\";\n",
        );
        assert_eq!(source.resolve("key1"), Some("some.string.1"));
        // missing semicolon still binds
        assert_eq!(source.resolve("key3"), Some("some.string.6"));
        assert_eq!(source.resolve("key2"), None);
    }

    #[test]
    fn test_lines_are_one_indexed() {
        let source = JavaSource::new("Foo.java", "\nclass Foo {}\n");
        let lines: Vec<(usize, &str)> = source.lines().collect();
        assert_eq!(lines, vec![(1, ""), (2, "class Foo {}")]);
    }
}

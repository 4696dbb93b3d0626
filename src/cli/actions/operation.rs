//! Low-level file operations produced by actions.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;

/// A single edit to a spec file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert a definition element before the closing tag of the root element.
    InsertDefinition {
        file: PathBuf,
        display_path: String,
        key: String,
        element: String,
    },
}

impl Operation {
    pub fn file(&self) -> &Path {
        match self {
            Operation::InsertDefinition { file, .. } => file,
        }
    }

    pub fn preview(&self) {
        match self {
            Operation::InsertDefinition {
                display_path,
                element,
                ..
            } => {
                println!("  {} {}", "-->".blue(), display_path);
                println!("   {} {}", "+".green(), element.green());
            }
        }
    }

    /// Insert every element of `ops` into `file`, in order.
    ///
    /// Returns the number of elements inserted.
    pub(crate) fn apply_insert_ops(file: &Path, ops: &[&Operation]) -> Result<usize> {
        let elements: Vec<&str> = ops
            .iter()
            .map(|op| match op {
                Operation::InsertDefinition { element, .. } => element.as_str(),
            })
            .collect();
        if elements.is_empty() {
            return Ok(0);
        }

        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let updated = insert_before_root_close(&content, &elements)
            .with_context(|| format!("Cannot insert definitions into {}", file.display()))?;
        fs::write(file, updated).with_context(|| format!("Failed to write {}", file.display()))?;

        tracing::debug!(file = %file.display(), count = elements.len(), "inserted definitions");
        Ok(elements.len())
    }
}

/// Insert `elements` as the last children of the root element.
///
/// When the closing tag sits on its own line the elements get their own
/// lines, indented like the last child (or one level deeper than the tag).
pub(crate) fn insert_before_root_close(content: &str, elements: &[&str]) -> Result<String> {
    let Some(close) = content.rfind("</") else {
        bail!("root element has no closing tag");
    };

    let line_start = content[..close].rfind('\n').map_or(0, |i| i + 1);
    let close_indent = &content[line_start..close];

    let mut updated = String::with_capacity(content.len() + elements.len() * 48);
    if close_indent.trim().is_empty() {
        let indent = child_indent(&content[..line_start], close_indent);
        updated.push_str(&content[..line_start]);
        for element in elements {
            updated.push_str(&indent);
            updated.push_str(element);
            updated.push('\n');
        }
        updated.push_str(&content[line_start..]);
    } else {
        updated.push_str(&content[..close]);
        for element in elements {
            updated.push_str("\n  ");
            updated.push_str(element);
        }
        updated.push('\n');
        updated.push_str(&content[close..]);
    }
    Ok(updated)
}

fn child_indent(before: &str, close_indent: &str) -> String {
    let previous = before
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");
    let indent_len = previous.len() - previous.trim_start().len();
    if indent_len > close_indent.len() {
        previous[..indent_len].to_string()
    } else {
        format!("{}  ", close_indent)
    }
}

/// Escape a value for use inside a double-quoted XML attribute.
pub(crate) fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_insert_follows_child_indent() {
        let content = "<langpack>\n    <str id=\"a\" txt=\"A\"/>\n</langpack>\n";
        let updated = insert_before_root_close(content, &["<str id=\"b\" txt=\"b\"/>"]).unwrap();
        assert_eq!(
            updated,
            "<langpack>\n    <str id=\"a\" txt=\"A\"/>\n    <str id=\"b\" txt=\"b\"/>\n</langpack>\n"
        );
    }

    #[test]
    fn test_insert_empty_root() {
        let content = "<variables>\n</variables>";
        let updated =
            insert_before_root_close(content, &["<variable name=\"v\" value=\"\"/>"]).unwrap();
        assert_eq!(
            updated,
            "<variables>\n  <variable name=\"v\" value=\"\"/>\n</variables>"
        );
    }

    #[test]
    fn test_insert_inline_closing_tag() {
        let content = "<langpack><str id=\"a\" txt=\"A\"/></langpack>";
        let updated = insert_before_root_close(content, &["<str id=\"b\" txt=\"b\"/>"]).unwrap();
        assert_eq!(
            updated,
            "<langpack><str id=\"a\" txt=\"A\"/>\n  <str id=\"b\" txt=\"b\"/>\n</langpack>"
        );
    }

    #[test]
    fn test_insert_self_closing_root_fails() {
        assert!(insert_before_root_close("<langpack/>", &["<str/>"]).is_err());
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a&b \"c\" <d>"), "a&amp;b &quot;c&quot; &lt;d&gt;");
        assert_eq!(escape_attr("plain.key"), "plain.key");
    }
}

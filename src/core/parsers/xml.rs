//! Positional XML document model.
//!
//! IzPack spec files are small, so they are read into a tree that keeps the
//! line and column of every element. The tree is built from `xml-rs` pull
//! events; element and attribute names keep their namespace prefix
//! (`xi:include`) so queries can use the names as they appear in the file.

use std::{fs, path::Path};

use xml::{
    common::Position,
    name::OwnedName,
    reader::{ParserConfig, XmlEvent},
};

use crate::core::{IzError, Origin, SourceContext, SourceLocation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified name (`prefix:local` when a prefix is present).
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Concatenated character data directly inside this element.
    pub text: String,
    /// Name of the enclosing element, `None` for the root.
    pub parent: Option<String>,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
}

impl XmlElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Trimmed text content.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All elements below this one, depth-first, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First descendant with the given name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|element| element.name == name)
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.descendants().filter(move |element| element.name == name)
    }
}

/// Depth-first pre-order iterator over an element tree.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// A parsed spec file.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    pub path: String,
    pub root: XmlElement,
    lines: Vec<String>,
}

impl XmlDocument {
    pub fn parse(path: &Path) -> Result<Self, IzError> {
        Self::read_as(path, path.to_string_lossy())
    }

    /// Parse the file at `path`, reporting it as `display_path`.
    ///
    /// The raw bytes go to the parser, which honours the encoding named in
    /// the XML declaration (langpacks are often ISO-8859-1).
    pub fn read_as(path: &Path, display_path: impl Into<String>) -> Result<Self, IzError> {
        let bytes = fs::read(path).map_err(|e| IzError::io(path, e))?;
        Self::parse_bytes(display_path, &bytes)
    }

    pub fn parse_str(path: impl Into<String>, content: &str) -> Result<Self, IzError> {
        Self::parse_bytes(path, content.as_bytes())
    }

    pub fn parse_bytes(path: impl Into<String>, bytes: &[u8]) -> Result<Self, IzError> {
        let path = path.into();
        let mut reader = ParserConfig::new()
            .cdata_to_characters(true)
            .create_reader(bytes);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader.next();
            let position = reader.position();
            match event {
                Ok(XmlEvent::StartElement {
                    name, attributes, ..
                }) => {
                    let element = XmlElement {
                        name: qualified_name(&name),
                        attributes: attributes
                            .into_iter()
                            .map(|attr| (qualified_name(&attr.name), attr.value))
                            .collect(),
                        children: Vec::new(),
                        text: String::new(),
                        parent: stack.last().map(|parent| parent.name.clone()),
                        line: position.row as usize + 1,
                        col: position.column as usize + 1,
                    };
                    stack.push(element);
                }
                Ok(XmlEvent::EndElement { .. }) => {
                    if let Some(element) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(element),
                            None => root = Some(element),
                        }
                    }
                }
                Ok(XmlEvent::Characters(text)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(XmlEvent::EndDocument) => break,
                Ok(_) => {}
                Err(err) => {
                    return Err(IzError::Xml {
                        path: path.into(),
                        message: err.to_string(),
                    });
                }
            }
        }

        let root = root.ok_or_else(|| IzError::Xml {
            path: path.clone().into(),
            message: "document has no root element".to_string(),
        })?;

        Ok(Self {
            path,
            root,
            lines: String::from_utf8_lossy(bytes).lines().map(String::from).collect(),
        })
    }

    /// Every element of the document, root first.
    pub fn elements(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![&self.root],
        }
    }

    /// First element in the document with the given name (root included).
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |element| element.name == name)
    }

    /// Text of a 1-indexed line, empty when out of range.
    pub fn line(&self, line: usize) -> &str {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Report context pointing at an element.
    pub fn context(&self, element: &XmlElement) -> SourceContext {
        SourceContext::new(
            SourceLocation::new(&self.path, element.line, element.col),
            self.line(element.line),
            Origin::Spec,
        )
    }
}

fn qualified_name(name: &OwnedName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local_name),
        None => name.local_name.clone(),
    }
}

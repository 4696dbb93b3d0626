use std::fmt;

/// Where a reference or definition was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Origin {
    /// An XML spec file (install.xml, userInputSpec.xml, a langpack, ...).
    Spec,
    /// A Java source file.
    Code,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Spec => write!(f, "spec"),
            Origin::Code => write!(f, "code"),
        }
    }
}

/// Pure position information in a spec or source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file_path: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

/// Position with context information.
///
/// Contains everything the reporter needs to display the location
/// together with the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceContext {
    pub location: SourceLocation,
    /// The line content for display.
    pub source_line: String,
    pub origin: Origin,
}

impl SourceContext {
    pub fn new(location: SourceLocation, source_line: impl Into<String>, origin: Origin) -> Self {
        Self {
            location,
            source_line: source_line.into(),
            origin,
        }
    }

    // Convenience accessors
    pub fn file_path(&self) -> &str {
        &self.location.file_path
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn col(&self) -> usize {
        self.location.col
    }
}

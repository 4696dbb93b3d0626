use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::source::SourceContext;

/// The kinds of IzPack entities that can be defined and referenced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Conditions,
    Strings,
    Variables,
    Classes,
}

impl EntityKind {
    pub fn all() -> [EntityKind; 4] {
        [
            EntityKind::Conditions,
            EntityKind::Strings,
            EntityKind::Variables,
            EntityKind::Classes,
        ]
    }

    /// Plural name, as used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Conditions => "conditions",
            EntityKind::Strings => "strings",
            EntityKind::Variables => "variables",
            EntityKind::Classes => "classes",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Conditions => write!(f, "condition"),
            EntityKind::Strings => write!(f, "string"),
            EntityKind::Variables => write!(f, "variable"),
            EntityKind::Classes => write!(f, "class"),
        }
    }
}

/// A defined entity: a `<condition id>`, `<str id txt>`, `<variable name>`
/// or a custom Java class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub key: String,
    pub context: SourceContext,
    /// The main value of the definition (string text, variable value,
    /// condition type or class file path).
    pub value: Option<String>,
}

impl Definition {
    pub fn new(key: impl Into<String>, context: SourceContext, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            context,
            value,
        }
    }
}

/// A single reference to an entity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub key: String,
    pub context: SourceContext,
}

impl Reference {
    pub fn new(key: impl Into<String>, context: SourceContext) -> Self {
        Self {
            key: key.into(),
            context,
        }
    }
}

/// Why a reference in source code cannot be resolved statically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnresolvedReason {
    /// `getVariable(name)` where `name` is never assigned a string literal.
    RuntimeVariable { name: String },
    /// `getString(prefix + ".title")`
    CompoundExpression,
    /// `getString(Keys.TITLE)`
    FieldAccess,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::RuntimeVariable { name } => {
                write!(f, "runtime variable '{}'", name)
            }
            UnresolvedReason::CompoundExpression => write!(f, "compound key expression"),
            UnresolvedReason::FieldAccess => write!(f, "field access"),
        }
    }
}

/// A reference whose key is only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnresolvedReference {
    /// The raw argument expression as written in code.
    pub expression: String,
    pub reason: UnresolvedReason,
    pub context: SourceContext,
}

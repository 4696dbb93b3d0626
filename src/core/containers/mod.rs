//! Containers of defined IzPack entities.
//!
//! Each container knows where its entities are defined, which spec files and
//! attributes reference them, and which source code calls look them up.
//!
//! - `conditions`: `<condition id>` from the conditions spec
//! - `strings`: `<str id txt>` from the selected langpack
//! - `variables`: `<variable name>` from the variables and dynamic variables specs
//! - `classes`: custom Java classes found under the source roots

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::core::{Definition, EntityKind, parsers::xml::XmlElement};

pub mod classes;
pub mod conditions;
pub mod strings;
pub mod variables;

pub use classes::IzClasses;
pub use conditions::{ConditionSpec, IzConditions};
pub use strings::IzStrings;
pub use variables::IzVariables;

/// A source code call that takes an entity key as its argument.
#[derive(Debug)]
pub struct SourcePattern {
    /// Must capture the raw argument in group 1.
    pub regex: Regex,
    /// Strict patterns only match calls that always take a key, so arguments
    /// that cannot be resolved are worth reporting.
    pub strict: bool,
}

impl SourcePattern {
    pub fn strict(pattern: &str) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap(),
            strict: true,
        }
    }

    pub fn loose(pattern: &str) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap(),
            strict: false,
        }
    }
}

pub trait IzContainer: Send + Sync {
    fn kind(&self) -> EntityKind;

    /// Definitions keyed by id.
    fn definitions(&self) -> &BTreeMap<String, Definition>;

    /// Keys that are always defined (IzPack built-ins and configured extras).
    fn white_list(&self) -> &BTreeSet<String>;

    /// Logical names of the specs scanned for references.
    fn reference_specs(&self) -> &'static [&'static str];

    /// Attributes holding references on elements accepted by `has_reference`.
    fn attributes(&self) -> &'static [&'static str];

    fn has_reference(&self, element: &XmlElement) -> bool;

    /// Split an attribute value into the keys it refers to.
    fn transform_reference(&self, value: &str) -> Vec<String> {
        vec![value.to_string()]
    }

    fn source_patterns(&self) -> &[SourcePattern] {
        &[]
    }

    /// Patterns for source lines and keys that are never references.
    fn white_list_patterns(&self) -> &[Regex] {
        &[]
    }

    fn is_white_listed(&self, text: &str) -> bool {
        self.white_list_patterns()
            .iter()
            .any(|pattern| pattern.is_match(text))
    }

    fn is_defined(&self, key: &str) -> bool {
        self.definitions().contains_key(key) || self.white_list().contains(key)
    }

    fn definition(&self, key: &str) -> Option<&Definition> {
        self.definitions().get(key)
    }

    /// Defined keys plus the white list.
    fn keys(&self) -> BTreeSet<String> {
        self.definitions()
            .keys()
            .chain(self.white_list())
            .cloned()
            .collect()
    }

    /// Number of definitions (white list excluded).
    fn count(&self) -> usize {
        self.definitions().len()
    }
}

/// All four containers of an installer.
pub struct Containers {
    pub conditions: IzConditions,
    pub strings: IzStrings,
    pub variables: IzVariables,
    pub classes: IzClasses,
}

impl Containers {
    pub fn get(&self, kind: EntityKind) -> &dyn IzContainer {
        match kind {
            EntityKind::Conditions => &self.conditions,
            EntityKind::Strings => &self.strings,
            EntityKind::Variables => &self.variables,
            EntityKind::Classes => &self.classes,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn IzContainer> {
        EntityKind::all().into_iter().map(|kind| self.get(kind))
    }
}

/// Logical names of every spec some container scans for references.
pub fn all_reference_specs() -> BTreeSet<&'static str> {
    [
        conditions::REFERENCE_SPECS,
        strings::REFERENCE_SPECS,
        variables::REFERENCE_SPECS,
        classes::REFERENCE_SPECS,
    ]
    .into_iter()
    .flatten()
    .copied()
    .collect()
}

/// White list from built-in names plus configured extras.
pub(crate) fn white_list_of(built_in: &[&str], extra: &[String]) -> BTreeSet<String> {
    built_in
        .iter()
        .map(|key| key.to_string())
        .chain(extra.iter().cloned())
        .collect()
}

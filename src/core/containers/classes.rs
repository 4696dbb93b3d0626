use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use super::{IzContainer, white_list_of};
use crate::core::{
    Definition, EntityKind, Origin, SourceContext, SourceLocation, parsers::xml::XmlElement,
};

pub(crate) const REFERENCE_SPECS: &[&str] = &[
    "install",
    "panels",
    "packs",
    "userInputSpec",
    "ProcessPanel.Spec",
    "core-packs",
];

const ATTRIBUTES: &[&str] = &["class", "name", "classname", "installer"];

static WHITE_LIST_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![Regex::new(r"^com.izforge.izpack.*$").unwrap()]);

/// Custom installer classes. They have no XML definition; every Java file
/// under a source root defines one.
#[derive(Debug, Default)]
pub struct IzClasses {
    definitions: BTreeMap<String, Definition>,
    white_list: BTreeSet<String>,
}

impl IzClasses {
    pub fn from_files(roots: &[PathBuf], files: &[PathBuf], extra_white_list: &[String]) -> Self {
        let mut classes = Self {
            white_list: white_list_of(&[], extra_white_list),
            ..Self::default()
        };

        for file in files {
            let Some(id) = roots.iter().find_map(|root| class_id(root, file)) else {
                continue;
            };
            let context = SourceContext::new(
                SourceLocation::new(file.to_string_lossy(), 1, 1),
                "",
                Origin::Code,
            );
            let value = Some(file.to_string_lossy().into_owned());
            classes
                .definitions
                .entry(id.clone())
                .or_insert_with(|| Definition::new(id, context, value));
        }
        classes
    }
}

/// `src/com/sample/Foo.java` under `src` -> `com.sample.Foo`
pub fn class_id(root: &Path, file: &Path) -> Option<String> {
    if file.extension().is_none_or(|ext| ext != "java") {
        return None;
    }
    let relative = file.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<String> = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("."))
}

/// IzPack's own classes are referenced by simple name.
fn is_built_in(class_name: &str) -> bool {
    !class_name.contains('.')
}

impl IzContainer for IzClasses {
    fn kind(&self) -> EntityKind {
        EntityKind::Classes
    }

    fn definitions(&self) -> &BTreeMap<String, Definition> {
        &self.definitions
    }

    fn white_list(&self) -> &BTreeSet<String> {
        &self.white_list
    }

    fn reference_specs(&self) -> &'static [&'static str] {
        REFERENCE_SPECS
    }

    fn attributes(&self) -> &'static [&'static str] {
        ATTRIBUTES
    }

    fn has_reference(&self, element: &XmlElement) -> bool {
        if element.name == "executeclass"
            && let Some(name) = element.attr("name")
        {
            return !is_built_in(name);
        }
        if let Some(class) = element.attr("class") {
            return !is_built_in(class);
        }
        if let Some(class) = element.attr("classname") {
            return !is_built_in(class);
        }
        if element.name == "listener"
            && let Some(installer) = element.attr("installer")
        {
            return !is_built_in(installer);
        }
        false
    }

    fn white_list_patterns(&self) -> &[Regex] {
        &WHITE_LIST_PATTERNS
    }
}

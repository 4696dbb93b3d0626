use std::{
    collections::{BTreeMap, BTreeSet},
    sync::LazyLock,
};

use regex::Regex;

use super::{IzContainer, SourcePattern, white_list_of};
use crate::core::{
    Definition, EntityKind,
    parsers::xml::{XmlDocument, XmlElement},
};

pub(crate) const REFERENCE_SPECS: &[&str] = &[
    "install",
    "panels",
    "packs",
    "userInputSpec",
    "ProcessPanel.Spec",
    "core-packs",
];

const ATTRIBUTES: &[&str] = &["id", "tooltip", "variable"];

static PATTERNS: LazyLock<Vec<SourcePattern>> = LazyLock::new(|| {
    vec![
        SourcePattern::strict(r"langpack\.getString\((.*?)\)"),
        SourcePattern::strict(r"setError\((.*?)\)"),
        SourcePattern::strict(r"setMessage\((.*?)\)"),
        SourcePattern::loose(r"System\..*?println\((.*?)\)"),
        SourcePattern::strict(r"setErrorMessageId\((.*?)\)"),
    ]
});

static WHITE_LIST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^.*\(\(String\) conn\);.*$").unwrap(),
        Regex::new(r"^UserInputPanel.*$").unwrap(),
    ]
});

/// Localized strings from langpacks.
#[derive(Debug, Default)]
pub struct IzStrings {
    definitions: BTreeMap<String, Definition>,
    white_list: BTreeSet<String>,
}

impl IzStrings {
    /// Collect `<str id txt>` entries. Earlier documents take precedence, so
    /// the installer's langpack comes before IzPack's built-in one.
    pub fn from_documents(docs: &[&XmlDocument], extra_white_list: &[String]) -> Self {
        let mut strings = Self {
            white_list: white_list_of(&[], extra_white_list),
            ..Self::default()
        };

        for doc in docs {
            for element in doc.find_all("str") {
                let (Some(id), Some(txt)) = (element.attr("id"), element.attr("txt")) else {
                    continue;
                };
                strings.definitions.entry(id.to_string()).or_insert_with(|| {
                    Definition::new(id, doc.context(element), Some(txt.to_string()))
                });
            }
        }
        strings
    }
}

impl IzContainer for IzStrings {
    fn kind(&self) -> EntityKind {
        EntityKind::Strings
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
        let name = element.name.as_str();

        // A panel's id names the panel, not a string.
        if name == "panel" {
            return false;
        }
        if name == "validator" && element.parent.as_deref() == Some("panel") {
            return false;
        }
        if let Some(id) = element.attr("id")
            && (id.starts_with("port") || name.contains("maximum.offset.variable"))
        {
            return false;
        }

        // Fields shown on the summary panel need a string for their variable.
        if name == "field" && element.has_attr("variable") && element.attr("type") != Some("rule") {
            if element
                .attr("summarize")
                .is_some_and(|value| value.contains("false"))
            {
                return false;
            }
            if element
                .attr("autoPrompt")
                .is_some_and(|value| value.contains("true"))
            {
                return false;
            }
            return true;
        }

        if element.attr("type").is_some_and(|kind| kind.contains("rule")) {
            return false;
        }
        if name.contains("executeForPack") && element.has_attr("id") {
            return false;
        }

        ATTRIBUTES.iter().any(|attr| element.has_attr(attr))
    }

    fn source_patterns(&self) -> &[SourcePattern] {
        &PATTERNS
    }

    fn white_list_patterns(&self) -> &[Regex] {
        &WHITE_LIST_PATTERNS
    }
}

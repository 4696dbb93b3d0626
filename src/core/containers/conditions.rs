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

const WHITE_LIST: &[&str] = &["izpack.linuxinstall"];

pub(crate) const REFERENCE_SPECS: &[&str] = &[
    "install",
    "panels",
    "packs",
    "userInputSpec",
    "ProcessPanel.Spec",
    "core-packs",
    "dynamic_variables",
];

const ATTRIBUTES: &[&str] = &["condition", "conditionid", "refid"];

/// Placeholder recorded when a variable condition has no `<name>`.
pub const NO_VARIABLE: &str = "no_var_defined";

static COMPOUND_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[+|^\\]").unwrap());

/// Ids reserved for IzPack's own conditions.
static IGNORED_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^izpack.*").unwrap());

static PATTERNS: LazyLock<Vec<SourcePattern>> = LazyLock::new(|| {
    vec![
        SourcePattern::strict(r"isConditionTrue\(([^,)]*)"),
        SourcePattern::strict(r"getCondition\(([^,)]*)"),
    ]
});

/// What a condition definition depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSpec {
    /// The `type` attribute (`variable`, `exists`, `and`, `java`, ...).
    pub kind: String,
    /// Variable tested by `variable` and `exists` conditions.
    pub variable: Option<String>,
    /// Conditions combined by `and`/`or`/`not`/`xor` conditions.
    pub refids: Vec<String>,
}

impl ConditionSpec {
    fn from_element(element: &XmlElement) -> Self {
        let kind = element.attr("type").unwrap_or_default().to_string();

        let variable_tag = match variable_test(&kind) {
            Some(VariableTest::Value) => Some("name"),
            Some(VariableTest::Exists) => Some("variable"),
            None => None,
        };
        let variable = variable_tag
            .and_then(|tag| element.find(tag))
            .map(|child| child.text().to_string());

        let refids = if is_compound(&kind) {
            element
                .find_all("condition")
                .filter_map(|child| child.attr("refid"))
                .map(String::from)
                .collect()
        } else {
            Vec::new()
        };

        Self {
            kind,
            variable,
            refids,
        }
    }

    /// `variable` and `exists` conditions test a variable, whether the type is
    /// the short name or the IzPack class name.
    pub fn tests_variable(&self) -> bool {
        variable_test(&self.kind).is_some()
    }

    /// `and`, `or`, `not` and `xor` conditions are built from other conditions.
    pub fn is_compound(&self) -> bool {
        is_compound(&self.kind)
    }
}

enum VariableTest {
    /// Compares the variable in `<name>` with a value.
    Value,
    /// Checks that the variable in `<variable>` is set.
    Exists,
}

fn variable_test(kind: &str) -> Option<VariableTest> {
    let kind = kind.to_ascii_lowercase();
    if kind.contains("variable") {
        Some(VariableTest::Value)
    } else if kind.contains("exists") {
        Some(VariableTest::Exists)
    } else {
        None
    }
}

fn is_compound(kind: &str) -> bool {
    ["and", "or", "not", "xor"]
        .iter()
        .any(|compound| kind.contains(compound))
}

#[derive(Debug, Default)]
pub struct IzConditions {
    definitions: BTreeMap<String, Definition>,
    specs: BTreeMap<String, ConditionSpec>,
    white_list: BTreeSet<String>,
}

impl IzConditions {
    pub fn from_document(doc: Option<&XmlDocument>, extra_white_list: &[String]) -> Self {
        let mut conditions = Self {
            white_list: white_list_of(WHITE_LIST, extra_white_list),
            ..Self::default()
        };
        let Some(doc) = doc else {
            return conditions;
        };

        for element in doc.find_all("condition") {
            let Some(id) = element.attr("id") else {
                continue;
            };
            if conditions.definitions.contains_key(id) {
                tracing::debug!(id, "duplicate condition definition");
                continue;
            }
            let spec = ConditionSpec::from_element(element);
            let value = (!spec.kind.is_empty()).then(|| spec.kind.clone());
            conditions
                .definitions
                .insert(id.to_string(), Definition::new(id, doc.context(element), value));
            conditions.specs.insert(id.to_string(), spec);
        }
        conditions
    }

    pub fn spec(&self, id: &str) -> Option<&ConditionSpec> {
        self.specs.get(id)
    }

    /// `(variable, condition id)` for every condition that tests a variable.
    pub fn referenced_variables(&self) -> BTreeSet<(String, String)> {
        self.specs
            .iter()
            .filter(|(_, spec)| spec.tests_variable())
            .map(|(id, spec)| {
                let variable = spec.variable.as_deref().unwrap_or(NO_VARIABLE);
                (variable.to_string(), id.clone())
            })
            .collect()
    }

    /// Every condition id used as a `refid` inside a compound condition.
    pub fn referenced_by_conditions(&self) -> BTreeSet<&str> {
        self.specs
            .values()
            .flat_map(|spec| spec.refids.iter().map(String::as_str))
            .collect()
    }
}

impl IzContainer for IzConditions {
    fn kind(&self) -> EntityKind {
        EntityKind::Conditions
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
        ATTRIBUTES.iter().any(|attr| element.has_attr(attr))
    }

    /// `"cond1+cond2+!cond3"` -> `[cond1, cond2, cond3]`
    fn transform_reference(&self, value: &str) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for part in COMPOUND_SEPARATOR.split(value) {
            let id = part.replace('!', "");
            let id = id.trim();
            if id.is_empty() || IGNORED_KEY.is_match(id) || ids.iter().any(|seen| seen == id) {
                continue;
            }
            ids.push(id.to_string());
        }
        ids
    }

    fn source_patterns(&self) -> &[SourcePattern] {
        &PATTERNS
    }
}

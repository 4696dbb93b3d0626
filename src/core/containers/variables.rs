use std::{
    collections::{BTreeMap, BTreeSet},
    sync::LazyLock,
};

use super::{IzContainer, SourcePattern, white_list_of};
use crate::core::{
    Definition, EntityKind,
    parsers::xml::{XmlDocument, XmlElement},
};

/// Variables IzPack sets on its own.
const WHITE_LIST: &[&str] = &[
    "izpack.linuxinstall",
    "JAVA_HOME",
    "INSTALL_PATH",
    "IzPanel.LayoutType",
    "APP_NAME",
    "APP_URL",
    "APP_VER",
    "INSTALL_GROUP",
    "UNINSTALLER_CONDITION",
    "USER_NAME",
    "USER_HOME",
    "ISO3_LANG",
    "IP_ADDRESS",
    "HOST_NAME",
    "FILE_SEPARATOR",
    "DesktopShortcutCheckboxEnabled",
    "InstallerFrame.logfilePath",
];

pub(crate) const REFERENCE_SPECS: &[&str] = &[
    "install",
    "panels",
    "packs",
    "userInputSpec",
    "ProcessPanel.Spec",
    "core-packs",
    "conditions",
    "variables",
    "dynamic_variables",
];

const ATTRIBUTES: &[&str] = &["variable"];

static PATTERNS: LazyLock<Vec<SourcePattern>> = LazyLock::new(|| {
    vec![
        SourcePattern::strict(r"getVariable\((.*?)\)"),
        SourcePattern::strict(r"setVariable\(([^,]*?),"),
    ]
});

/// Installer variables, static and dynamic.
#[derive(Debug, Default)]
pub struct IzVariables {
    definitions: BTreeMap<String, Definition>,
    white_list: BTreeSet<String>,
}

impl IzVariables {
    /// Collect `<variable name>` entries from the variables spec and the
    /// dynamic variables spec. A dynamic variable may be declared several
    /// times under different conditions; the first declaration is kept.
    pub fn from_documents(docs: &[&XmlDocument], extra_white_list: &[String]) -> Self {
        let mut variables = Self {
            white_list: white_list_of(WHITE_LIST, extra_white_list),
            ..Self::default()
        };

        for doc in docs {
            for element in doc.find_all("variable") {
                let Some(name) = element.attr("name") else {
                    continue;
                };
                let value = element.attr("value").map(String::from);
                variables
                    .definitions
                    .entry(name.to_string())
                    .or_insert_with(|| Definition::new(name, doc.context(element), value));
            }
        }
        variables
    }
}

impl IzContainer for IzVariables {
    fn kind(&self) -> EntityKind {
        EntityKind::Variables
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
        element.has_attr("variable")
    }

    fn source_patterns(&self) -> &[SourcePattern] {
        &PATTERNS
    }
}

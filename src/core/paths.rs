//! Locations of an installer's spec files.
//!
//! `install.xml` is the entry point: each known section pulls its spec in with
//! `<xi:include href="..."/>`, and the resources spec maps resource ids
//! (`userInputSpec.xml`, `CustomLangPack.xml_eng`, ...) to files under the
//! resources directory.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::core::{IzError, IzProperties, parsers::xml::XmlDocument};

/// Sections of `install.xml` that may include a separate spec file.
pub const SPEC_SECTIONS: [&str; 6] = [
    "variables",
    "conditions",
    "dynamicvariables",
    "resources",
    "panels",
    "packs",
];

pub const INSTALL_SPEC: &str = "install.xml";

const LANGPACK_RESOURCE_PREFIX: &str = "CustomLangPack.xml_";

static MULTI_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/{2,}").unwrap());

/// Collapse repeated slashes; paths without a file extension are treated as
/// directories and end with `/`.
pub fn path_format(path: &str) -> String {
    let collapsed = MULTI_SLASH.replace_all(path, "/");
    let has_extension = Path::new(collapsed.as_ref()).extension().is_some();
    if has_extension || collapsed.ends_with('/') {
        collapsed.into_owned()
    } else {
        format!("{}/", collapsed)
    }
}

#[derive(Debug, Clone)]
pub struct IzPaths {
    specs_path: PathBuf,
    resources_path: PathBuf,
    properties: IzProperties,
    /// Section name -> included href (properties substituted).
    sections: BTreeMap<String, String>,
    /// Resource id -> file.
    resources: BTreeMap<String, PathBuf>,
    /// ISO3 code -> langpack file.
    langpacks: BTreeMap<String, PathBuf>,
}

impl IzPaths {
    /// Parse `install.xml` under `specs_path` and the resources spec it
    /// includes. A missing or malformed `install.xml` is fatal.
    pub fn load(
        specs_path: impl Into<PathBuf>,
        resources_path: impl Into<PathBuf>,
        properties: IzProperties,
    ) -> Result<Self, IzError> {
        let specs_path = specs_path.into();
        let install = XmlDocument::parse(&specs_path.join(INSTALL_SPEC))?;

        let mut paths = Self {
            specs_path,
            resources_path: resources_path.into(),
            properties,
            sections: BTreeMap::new(),
            resources: BTreeMap::new(),
            langpacks: BTreeMap::new(),
        };

        for section in SPEC_SECTIONS {
            let href = install
                .find(section)
                .and_then(|element| element.find("xi:include"))
                .and_then(|include| include.attr("href"));
            if let Some(href) = href {
                let href = paths.properties.substitute(href);
                tracing::debug!(section, href = %href, "found spec include");
                paths.sections.insert(section.to_string(), href);
            }
        }

        paths.load_resources();
        Ok(paths)
    }

    fn load_resources(&mut self) {
        let Some(path) = self.get_path("resources") else {
            return;
        };
        let doc = match XmlDocument::parse(&path) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!("cannot read resources spec: {}", err);
                return;
            }
        };

        for res in doc.find_all("res") {
            let (Some(id), Some(src)) = (res.attr("id"), res.attr("src")) else {
                continue;
            };
            let src = self.properties.substitute(src);
            let file = self.resources_path.join(&src);

            if let Some(iso3) = id.strip_prefix(LANGPACK_RESOURCE_PREFIX) {
                self.langpacks.insert(iso3.to_string(), file.clone());
            } else if let Some(iso3) = langpack_code(&src) {
                self.langpacks.entry(iso3).or_insert_with(|| file.clone());
            }
            self.resources.insert(id.to_string(), file);
        }
    }

    pub fn install_path(&self) -> PathBuf {
        self.specs_path.join(INSTALL_SPEC)
    }

    /// Path to the spec included by a section of `install.xml`.
    pub fn get_path(&self, section: &str) -> Option<PathBuf> {
        let href = self.sections.get(section)?;
        let joined = format!("{}/{}", self.specs_path.display(), href);
        Some(PathBuf::from(path_format(&joined)))
    }

    pub fn resource(&self, id: &str) -> Option<&Path> {
        self.resources.get(id).map(PathBuf::as_path)
    }

    /// Langpack for an ISO3 code; `default` means English.
    pub fn langpack_path(&self, iso3: &str) -> Option<&Path> {
        let iso3 = if iso3 == "default" { "eng" } else { iso3 };
        self.langpacks.get(iso3).map(PathBuf::as_path)
    }

    /// Locate a spec by logical name (`install`, `userInputSpec`,
    /// `dynamic_variables`, ...).
    pub fn find_spec(&self, name: &str) -> Option<PathBuf> {
        if name == "install" {
            return Some(self.install_path());
        }
        if let Some(section) = section_for(name)
            && let Some(path) = self.get_path(section)
        {
            return Some(path);
        }

        let file_name = format!("{}.xml", name);
        if let Some(path) = self.resource(&file_name) {
            return Some(path.to_path_buf());
        }

        [&self.specs_path, &self.resources_path]
            .into_iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
    }
}

fn section_for(name: &str) -> Option<&'static str> {
    match name {
        "variables" => Some("variables"),
        "conditions" => Some("conditions"),
        "dynamic_variables" | "dynamicvariables" => Some("dynamicvariables"),
        "resources" => Some("resources"),
        "panels" => Some("panels"),
        "packs" => Some("packs"),
        _ => None,
    }
}

/// `langpacks/fra.xml` -> `fra`
fn langpack_code(src: &str) -> Option<String> {
    let path = Path::new(src);
    let in_langpacks = path
        .parent()
        .and_then(Path::file_name)
        .is_some_and(|dir| dir == "langpacks");
    if !in_langpacks || path.extension().is_none_or(|ext| ext != "xml") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    (stem.len() == 3 && stem.chars().all(|c| c.is_ascii_lowercase())).then(|| stem.to_string())
}

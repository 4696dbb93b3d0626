//! Build properties used in `${...}` placeholders of spec files.

use std::{borrow::Cow, collections::BTreeMap, path::Path, sync::LazyLock};

use regex::{Captures, Regex};

use crate::core::{IzError, parsers::xml::XmlDocument};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Properties may refer to other properties; give up after this many passes.
const MAX_SUBSTITUTION_DEPTH: usize = 10;

/// Named values available for `${name}` substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IzProperties {
    values: BTreeMap<String, String>,
}

impl IzProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `<properties>` block and project coordinates of a maven pom.
    pub fn from_pom(path: &Path) -> Result<Self, IzError> {
        let doc = XmlDocument::parse(path)?;
        let project = &doc.root;
        let mut props = Self::new();

        let basedir = path
            .parent()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();
        props.insert("basedir", basedir);

        let parent = project.child("parent");
        for field in ["version", "groupId", "artifactId", "name"] {
            let value = project.child(field).or_else(|| match field {
                "version" | "groupId" => parent.and_then(|p| p.child(field)),
                _ => None,
            });
            if let Some(value) = value {
                props.insert(format!("project.{}", field), value.text());
            }
        }

        if let Some(properties) = project.child("properties") {
            for prop in &properties.children {
                props.insert(prop.name.clone(), prop.text());
            }
        }

        tracing::debug!(path = %path.display(), count = props.len(), "loaded pom properties");
        Ok(props)
    }

    /// Read an IzPack `<properties><property name=".." value=".."/></properties>` spec.
    pub fn from_properties_spec(path: &Path) -> Result<Self, IzError> {
        let doc = XmlDocument::parse(path)?;
        let mut props = Self::new();
        for properties in doc.find_all("properties") {
            for prop in properties.find_all("property") {
                if let (Some(name), Some(value)) = (prop.attr("name"), prop.attr("value")) {
                    props.insert(name, value);
                }
            }
        }
        Ok(props)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace known `${name}` placeholders. Unknown or unterminated
    /// placeholders are kept as written.
    pub fn substitute(&self, text: &str) -> String {
        let mut current = text.to_string();
        for _ in 0..MAX_SUBSTITUTION_DEPTH {
            let replaced = PLACEHOLDER.replace_all(&current, |caps: &Captures| {
                match self.values.get(&caps[1]) {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                }
            });
            match replaced {
                Cow::Borrowed(_) => break,
                Cow::Owned(next) if next == current => break,
                Cow::Owned(next) => current = next,
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn fixture_pom() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_installer/pom.xml")
    }

    #[test]
    fn test_pom_properties() {
        let props = IzProperties::from_pom(&fixture_pom()).unwrap();
        assert_eq!(props.get("izpack.version"), Some("5.0.0-rc2"));
        assert_eq!(props.get("project.build.sourceEncoding"), Some("UTF-8"));
        assert_eq!(props.get("project.groupId"), Some("com.sample"));
        assert_eq!(props.get("project.name"), Some("Sample Installer"));
        assert!(props.get("basedir").is_some());
    }

    #[test]
    fn test_substitute_known_property() {
        let props = IzProperties::from_pom(&fixture_pom()).unwrap();
        assert_eq!(props.substitute("${izpack.version}-A.B.C"), "5.0.0-rc2-A.B.C");
    }

    #[test]
    fn test_substitute_is_recursive() {
        let props = IzProperties::from_pom(&fixture_pom()).unwrap();
        assert_eq!(props.substitute("${project.version}"), "5.0.0-rc2-SNAPSHOT");
    }

    #[test]
    fn test_substitute_unknown_and_unterminated() {
        let props = IzProperties::from_pom(&fixture_pom()).unwrap();
        assert_eq!(
            props.substitute("${undefined.prop}-A.B.C"),
            "${undefined.prop}-A.B.C"
        );
        assert_eq!(
            props.substitute("${mistyped.prop-A.B.C"),
            "${mistyped.prop-A.B.C"
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let mut props = IzProperties::new();
        props.insert("a", "x${a}");
        let result = props.substitute("${a}");
        assert!(result.starts_with("xxx"));
    }

    #[test]
    fn test_parent_version_fallback() {
        let dir = TempDir::new().unwrap();
        let pom = dir.path().join("pom.xml");
        fs::write(
            &pom,
            r#"<project>
  <parent>
    <groupId>org.parent</groupId>
    <version>1.2.3</version>
  </parent>
  <artifactId>child</artifactId>
</project>"#,
        )
        .unwrap();

        let props = IzProperties::from_pom(&pom).unwrap();
        assert_eq!(props.get("project.version"), Some("1.2.3"));
        assert_eq!(props.get("project.groupId"), Some("org.parent"));
        assert_eq!(props.get("project.artifactId"), Some("child"));
    }

    #[test]
    fn test_properties_spec() {
        let dir = TempDir::new().unwrap();
        let spec = dir.path().join("properties.xml");
        fs::write(
            &spec,
            r#"<izpack>
  <properties>
    <property name="app.version" value="2.0"/>
    <property name="broken"/>
  </properties>
</izpack>"#,
        )
        .unwrap();

        let props = IzProperties::from_properties_spec(&spec).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props.substitute("v${app.version}"), "v2.0");
    }
}

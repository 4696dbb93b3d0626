use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::EntityKind;

pub const CONFIG_FILE_NAME: &str = ".izverifyrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding `install.xml`.
    #[serde(default = "default_specs_path")]
    pub specs_path: String,
    /// Base directory for `<res src>` paths.
    #[serde(default = "default_resources_path")]
    pub resources_path: String,
    #[serde(default = "default_pom")]
    pub pom: String,
    /// Java source roots.
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    /// ISO3 code of the langpack that defines strings.
    #[serde(default = "default_langpack")]
    pub langpack: String,
    /// IzPack's built-in langpack; its strings count as defined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub izpack_langpack: Option<String>,
    #[serde(default)]
    pub white_list: WhiteList,
}

/// Extra keys that are always considered defined.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteList {
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub strings: Vec<String>,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub classes: Vec<String>,
}

impl WhiteList {
    pub fn get(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Conditions => &self.conditions,
            EntityKind::Strings => &self.strings,
            EntityKind::Variables => &self.variables,
            EntityKind::Classes => &self.classes,
        }
    }
}

fn default_specs_path() -> String {
    "izpack".to_string()
}

fn default_resources_path() -> String {
    "resources".to_string()
}

fn default_pom() -> String {
    "pom.xml".to_string()
}

fn default_langpack() -> String {
    "eng".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            specs_path: default_specs_path(),
            resources_path: default_resources_path(),
            pom: default_pom(),
            sources: Vec::new(),
            ignores: Vec::new(),
            langpack: default_langpack(),
            izpack_langpack: None,
            white_list: WhiteList::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores` or `sources` is invalid.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Only sources with wildcards are globs; others are literal directories.
        for pattern in &self.sources {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'sources': \"{}\"", pattern)
                })?;
            }
        }

        if self.langpack.trim().is_empty() {
            bail!("'langpack' must name a langpack, e.g. \"eng\"");
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

/// Search `start_dir` and its ancestors for the config file, stopping at the
/// repository root. A relative `start_dir` such as `.` is made absolute first
/// so that the walk can reach its parents.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = absolute_dir(start_dir);

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

fn absolute_dir(dir: &Path) -> PathBuf {
    fs::canonicalize(dir)
        .or_else(|_| std::env::current_dir().map(|cwd| cwd.join(dir)))
        .unwrap_or_else(|_| dir.to_path_buf())
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory holding the config file when it lies above the start
    /// directory. Relative config paths are anchored there.
    pub ancestor_dir: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "loaded config");
            let ancestor_dir = path
                .parent()
                .filter(|dir| *dir != absolute_dir(start_dir).as_path())
                .map(Path::to_path_buf);
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                ancestor_dir,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            ancestor_dir: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.specs_path, "izpack");
        assert_eq!(config.resources_path, "resources");
        assert_eq!(config.pom, "pom.xml");
        assert_eq!(config.langpack, "eng");
        assert!(config.sources.is_empty());
        assert!(config.izpack_langpack.is_none());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "specsPath": "installer/izpack",
              "sources": ["src/main/java"],
              "ignores": ["**/generated/**"],
              "whiteList": { "variables": ["MY_ENV"] }
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.specs_path, "installer/izpack");
        assert_eq!(config.sources, vec!["src/main/java"]);
        assert_eq!(config.ignores, vec!["**/generated/**"]);
        assert_eq!(config.white_list.get(EntityKind::Variables), ["MY_ENV"]);
        assert!(config.white_list.get(EntityKind::Strings).is_empty());
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "langpack": "fra" }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.langpack, "fra");
        assert_eq!(config.specs_path, default_specs_path());
        assert_eq!(config.resources_path, default_resources_path());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("izpack").join("panels");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert!(found.is_some());
        assert_eq!(found.unwrap(), config_path.canonicalize().unwrap());
    }

    #[test]
    fn test_load_config_reports_ancestor_dir() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("izpack");
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "sources": ["src"] }"#).unwrap();

        let result = load_config(&sub_dir).unwrap();
        assert!(result.from_file);
        assert_eq!(result.ancestor_dir, Some(dir.path().canonicalize().unwrap()));

        let result = load_config(dir.path()).unwrap();
        assert!(result.ancestor_dir.is_none());
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let found = find_config_file(dir.path());
        assert!(found.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "sources": ["src"] }"#).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file);
        assert_eq!(result.config.sources, vec!["src"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.config.specs_path, "izpack");
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_invalid_source_pattern() {
        let config = Config {
            sources: vec!["modules/*/[src".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("sources"));
    }

    #[test]
    fn test_validate_empty_langpack() {
        let config = Config {
            langpack: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "ignores": ["[invalid"] }"#,
        )
        .unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_default_config_json() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"specsPath\": \"izpack\""));
        assert!(json.contains("\"whiteList\""));
        assert!(!json.contains("izpackLangpack"));
    }
}

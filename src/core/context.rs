use std::{
    cell::OnceCell,
    collections::{BTreeMap, BTreeSet},
    path::{Component, Path, PathBuf},
};

use anyhow::{Context as _, Result};
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{
        EntityKind, IzError, IzPaths, IzProperties, Reference,
        containers::{
            Containers, IzClasses, IzConditions, IzContainer, IzStrings, IzVariables,
            all_reference_specs,
        },
        file_scanner::{ScanResult, scan_source_files},
        parsers::{java::JavaSource, xml::XmlDocument},
        paths::SPEC_SECTIONS,
        seeker::{SourceHits, find_references_in_source, search_specs_for_attributes},
    },
    issues::ParseErrorIssue,
};

/// Java sources read from the scanned roots.
pub struct SourceFiles {
    pub files: Vec<JavaSource>,
    /// Files that could not be read.
    pub errors: Vec<ParseErrorIssue>,
}

/// Every spec file the checks need, parsed once.
pub struct SpecDocuments {
    docs: BTreeMap<PathBuf, XmlDocument>,
    /// Required specs that are missing or malformed.
    pub errors: Vec<ParseErrorIssue>,
}

impl SpecDocuments {
    pub fn get(&self, path: &Path) -> Option<&XmlDocument> {
        self.docs.get(path)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// References to one entity kind.
#[derive(Default)]
pub struct KindReferences {
    /// From attributes of the reference specs.
    pub spec: Vec<Reference>,
    /// From lookup calls in Java sources.
    pub code: SourceHits,
}

impl KindReferences {
    /// Spec references first, then code references.
    pub fn all(&self) -> impl Iterator<Item = &Reference> {
        self.spec.iter().chain(self.code.references.iter())
    }

    pub fn keys(&self) -> BTreeSet<&str> {
        self.all().map(|reference| reference.key.as_str()).collect()
    }
}

/// Verification context of one installer.
///
/// Configuration, spec locations and the list of source files are resolved
/// eagerly so that a broken setup fails before any check runs. Everything
/// else is computed on first access:
///
/// 1. `documents()` parses every spec file the checks need (in parallel)
/// 2. `sources()` reads the Java files (in parallel)
/// 3. `containers()` builds the four containers from the documents
/// 4. `references(kind)` seeks references in specs and sources
///
/// # Configuration Priority
///
/// 1. CLI arguments (e.g., `--specs-path installer/izpack`)
/// 2. `.izverifyrc.json` config file
/// 3. Built-in defaults
pub struct CheckContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Installer root directory; relative config paths start here.
    pub root_dir: PathBuf,

    /// Locations of install.xml, the included specs and the resources.
    pub paths: IzPaths,

    /// Java files under the configured source roots.
    pub scan: ScanResult,

    pub verbose: bool,

    documents: OnceCell<SpecDocuments>,
    sources: OnceCell<SourceFiles>,
    containers: OnceCell<Containers>,
    references: OnceCell<BTreeMap<EntityKind, KindReferences>>,
}

impl CheckContext {
    /// Create a new `CheckContext` from command line arguments.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - An override argument is blank
    /// - Config file is invalid
    /// - `install.xml` is missing or malformed
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        validate_args(common_args)?;

        let verbose = common_args.verbose;
        let mut root_dir = common_args
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&root_dir)?;
        if verbose && !config_result.from_file {
            eprintln!("Note: No .izverifyrc.json found, using default configuration");
        }
        if common_args.root.is_none()
            && let Some(dir) = config_result.ancestor_dir
        {
            tracing::debug!(root = %dir.display(), "using config directory as installer root");
            root_dir = dir;
        }

        let mut config = config_result.config;
        if let Some(ref specs_path) = common_args.specs_path {
            config.specs_path = specs_path.clone();
        }
        if let Some(ref resources_path) = common_args.resources_path {
            config.resources_path = resources_path.clone();
        }
        if let Some(ref pom) = common_args.pom {
            config.pom = pom.clone();
        }
        if !common_args.source.is_empty() {
            config.sources = common_args.source.clone();
        }
        config.validate()?;

        let properties = load_properties(&resolve_path(&root_dir, &config.pom));
        let paths = IzPaths::load(
            resolve_path(&root_dir, &config.specs_path),
            resolve_path(&root_dir, &config.resources_path),
            properties,
        )
        .context("Failed to load installer specs")?;

        let scan = scan_source_files(&root_dir, &config.sources, &config.ignores);
        if scan.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped due to access errors{}",
                scan.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            root_dir,
            paths,
            scan,
            verbose,
            documents: OnceCell::new(),
            sources: OnceCell::new(),
            containers: OnceCell::new(),
            references: OnceCell::new(),
        })
    }

    /// Path as shown in reports: relative to the installer root when inside it.
    pub fn display_path(&self, path: &Path) -> String {
        display_path(&self.root_dir, path)
    }

    /// Langpack file of the configured ISO3 code.
    pub fn langpack_path(&self) -> Option<PathBuf> {
        self.paths
            .langpack_path(&self.config.langpack)
            .map(Path::to_path_buf)
    }

    fn izpack_langpack_path(&self) -> Option<PathBuf> {
        self.config
            .izpack_langpack
            .as_deref()
            .map(|path| resolve_path(&self.root_dir, path))
    }

    /// Parse every spec file the checks need (lazy initialization).
    ///
    /// Included sections, install.xml and the selected langpacks are required:
    /// missing or malformed files become parse errors. Other reference specs
    /// are optional and skipped when absent.
    pub fn documents(&self) -> &SpecDocuments {
        self.documents.get_or_init(|| {
            let mut wanted: BTreeMap<PathBuf, bool> = BTreeMap::new();
            let mut errors = Vec::new();

            wanted.insert(self.paths.install_path(), true);
            for section in SPEC_SECTIONS {
                if let Some(path) = self.paths.get_path(section) {
                    wanted.insert(path, true);
                }
            }
            match self.langpack_path() {
                Some(path) => {
                    wanted.insert(path, true);
                }
                None => errors.push(ParseErrorIssue {
                    file_path: self.display_path(&self.paths.install_path()),
                    error: format!(
                        "langpack '{}' is not declared in resources",
                        self.config.langpack
                    ),
                }),
            }
            if let Some(path) = self.izpack_langpack_path() {
                wanted.insert(path, true);
            }
            for name in all_reference_specs() {
                if let Some(path) = self.paths.find_spec(name) {
                    wanted.entry(path).or_insert(false);
                }
            }

            let root_dir = &self.root_dir;
            let parsed: Vec<_> = wanted
                .into_par_iter()
                .map(|(path, required)| {
                    let result = parse_spec(&path, display_path(root_dir, &path));
                    (path, required, result)
                })
                .collect();

            let mut docs = BTreeMap::new();
            for (path, required, result) in parsed {
                match result {
                    Ok(doc) => {
                        docs.insert(path, doc);
                    }
                    Err(IzError::MissingFile { .. }) if !required => {
                        tracing::debug!(path = %path.display(), "optional spec not present");
                    }
                    Err(err) => {
                        if self.verbose {
                            eprintln!("Warning: {}", err);
                        }
                        errors.push(ParseErrorIssue {
                            file_path: self.display_path(&path),
                            error: err.to_string(),
                        });
                    }
                }
            }

            tracing::debug!(count = docs.len(), errors = errors.len(), "parsed specs");
            SpecDocuments { docs, errors }
        })
    }

    /// Parsed spec by logical name (`conditions`, `userInputSpec`, ...).
    pub fn spec(&self, name: &str) -> Option<&XmlDocument> {
        let path = self.paths.find_spec(name)?;
        self.documents().get(&path)
    }

    /// Parsed reference specs of a container, each file once.
    pub fn reference_docs(&self, container: &dyn IzContainer) -> Vec<&XmlDocument> {
        let mut seen = BTreeSet::new();
        container
            .reference_specs()
            .iter()
            .filter_map(|name| self.spec(name))
            .filter(|doc| seen.insert(doc.path.clone()))
            .collect()
    }

    /// Read all Java sources (lazy initialization).
    pub fn sources(&self) -> &SourceFiles {
        self.sources.get_or_init(|| {
            let root_dir = &self.root_dir;
            let results: Vec<_> = self
                .scan
                .files
                .par_iter()
                .map(|path| JavaSource::read(path, display_path(root_dir, path)))
                .collect();

            let mut files = Vec::new();
            let mut errors = Vec::new();
            for (path, result) in self.scan.files.iter().zip(results) {
                match result {
                    Ok(source) => files.push(source),
                    Err(err) => {
                        if self.verbose {
                            eprintln!("Warning: {}", err);
                        }
                        errors.push(ParseErrorIssue {
                            file_path: self.display_path(path),
                            error: err.to_string(),
                        });
                    }
                }
            }
            SourceFiles { files, errors }
        })
    }

    /// Build the containers from the parsed specs (lazy initialization).
    pub fn containers(&self) -> &Containers {
        self.containers.get_or_init(|| {
            let white_list = &self.config.white_list;

            let conditions = IzConditions::from_document(
                self.spec("conditions"),
                white_list.get(EntityKind::Conditions),
            );

            let variable_docs: Vec<&XmlDocument> = ["variables", "dynamic_variables"]
                .into_iter()
                .filter_map(|name| self.spec(name))
                .collect();
            let variables =
                IzVariables::from_documents(&variable_docs, white_list.get(EntityKind::Variables));

            let langpack_docs: Vec<&XmlDocument> = [self.langpack_path(), self.izpack_langpack_path()]
                .into_iter()
                .flatten()
                .filter_map(|path| self.documents().get(&path))
                .collect();
            let strings =
                IzStrings::from_documents(&langpack_docs, white_list.get(EntityKind::Strings));

            let relative = |path: &PathBuf| PathBuf::from(self.display_path(path));
            let roots: Vec<PathBuf> = self.scan.roots.iter().map(relative).collect();
            let files: Vec<PathBuf> = self.scan.files.iter().map(relative).collect();
            let classes =
                IzClasses::from_files(&roots, &files, white_list.get(EntityKind::Classes));

            Containers {
                conditions,
                strings,
                variables,
                classes,
            }
        })
    }

    /// References to one entity kind (lazy initialization, all kinds at once).
    pub fn references(&self, kind: EntityKind) -> &KindReferences {
        let all = self.references.get_or_init(|| {
            let containers = self.containers();
            let sources = &self.sources().files;
            EntityKind::all()
                .into_iter()
                .map(|kind| {
                    let container = containers.get(kind);
                    let refs = KindReferences {
                        spec: search_specs_for_attributes(&self.reference_docs(container), container),
                        code: find_references_in_source(sources, container),
                    };
                    tracing::debug!(
                        kind = kind.name(),
                        spec = refs.spec.len(),
                        code = refs.code.references.len(),
                        "sought references"
                    );
                    (kind, refs)
                })
                .collect()
        });
        // every kind is inserted above
        &all[&kind]
    }

    /// Spec and source files that could not be read.
    pub fn parse_errors(&self) -> Vec<ParseErrorIssue> {
        self.documents()
            .errors
            .iter()
            .chain(self.sources().errors.iter())
            .cloned()
            .collect()
    }
}

/// Reject override arguments that were given but left blank.
fn validate_args(common_args: &CommonArgs) -> Result<(), IzError> {
    let blank = |value: &str| value.trim().is_empty();
    if common_args.source.iter().any(|source| blank(source.as_str())) {
        return Err(IzError::InvalidArguments(
            "--source must name a directory".to_string(),
        ));
    }
    let overrides = [
        ("--specs-path", &common_args.specs_path),
        ("--resources-path", &common_args.resources_path),
        ("--pom", &common_args.pom),
    ];
    for (flag, value) in overrides {
        if value.as_deref().is_some_and(blank) {
            return Err(IzError::InvalidArguments(format!("{} must not be empty", flag)));
        }
    }
    Ok(())
}

fn display_path(root_dir: &Path, path: &Path) -> String {
    path.strip_prefix(root_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Join a configured path onto the root; keep it as written when the root is `.`
/// so output does not read `././izpack`.
fn resolve_path(root_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    let is_cur_dir = root_dir
        .components()
        .all(|c| matches!(c, Component::CurDir));
    if p.is_absolute() || is_cur_dir {
        p.to_path_buf()
    } else {
        root_dir.join(p.strip_prefix(".").unwrap_or(p))
    }
}

/// Pom properties, or IzPack properties when the file is not a pom. A missing
/// file only means `${...}` placeholders stay as written.
fn load_properties(path: &Path) -> IzProperties {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no properties file");
        return IzProperties::new();
    }
    let is_pom = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with("pom.xml"));
    let result = if is_pom {
        IzProperties::from_pom(path)
    } else {
        IzProperties::from_properties_spec(path)
    };
    result.unwrap_or_else(|err| {
        tracing::warn!("cannot read properties: {}", err);
        IzProperties::new()
    })
}

fn parse_spec(path: &Path, display_path: String) -> Result<XmlDocument, IzError> {
    XmlDocument::read_as(path, display_path)
}

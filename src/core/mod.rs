//! Core verification engine.
//!
//! ## Module Structure
//!
//! - `context`: CheckContext, lazily parsed specs, sources and references
//! - `paths`: Spec file discovery from install.xml and resources.xml
//! - `properties`: `${...}` substitution from pom.xml
//! - `parsers`: Positional XML tree and line-oriented Java scanning
//! - `containers`: Defined conditions, strings, variables and classes
//! - `seeker`: References in spec attributes and source code
//! - `dependencies`: Condition dependency chains
//! - `data`: Shared data types (definitions, references, locations)

pub mod containers;
pub mod context;
pub mod data;
pub mod dependencies;
pub mod error;
pub mod file_scanner;
pub mod parsers;
pub mod paths;
pub mod properties;
pub mod seeker;

pub use context::CheckContext;
pub use data::{
    Definition, EntityKind, Origin, Reference, SourceContext, SourceLocation, UnresolvedReason,
    UnresolvedReference,
};
pub use error::IzError;
pub use paths::IzPaths;
pub use properties::IzProperties;

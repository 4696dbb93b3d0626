//! Core data types shared by the containers, the seeker and the rules.
//!
//! ## Module Structure
//!
//! - `entity`: Entity kinds, definitions and references
//! - `source`: Location types (SourceContext, SourceLocation, Origin)

pub mod entity;
pub mod source;

pub use entity::{Definition, EntityKind, Reference, UnresolvedReason, UnresolvedReference};
pub use source::{Origin, SourceContext, SourceLocation};

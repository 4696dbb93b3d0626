//! File parsers for spec and source files.
//!
//! - `xml`: positional XML model for IzPack spec files (uses xml-rs)
//! - `java`: line-oriented text model for installer Java sources

pub mod java;
pub mod xml;

//! izverify - static verification for IzPack installer specifications
//!
//! izverify is a CLI tool and library that cross-checks an IzPack installer:
//! every condition, string, variable and class referenced from the XML specs
//! or from custom Java panels and listeners must be defined, definitions
//! should be used, and condition chains must not break or loop.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands and actions)
//! - `config`: Configuration file loading and parsing
//! - `core`: Verification engine (spec discovery, containers, seeker)
//! - `issues`: Issue type definitions and reporting
//! - `rules`: Detection rules built on the engine

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod rules;

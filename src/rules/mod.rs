//! Rule implementations for izverify.
//!
//! Each rule has a `check_*_issues(ctx)` entry point that pulls what it needs
//! from the `CheckContext`, and a pure function over containers and
//! references that does the work.
//!
//! ## Module Structure
//!
//! - `undefined`: References without a definition (all four entity kinds)
//! - `unused`: Conditions and variables nobody references
//! - `dependencies`: Broken and cyclic condition chains
//! - `unresolved`: Lookup calls whose key is only known at runtime

pub mod dependencies;
pub mod undefined;
pub mod unresolved;
pub mod unused;

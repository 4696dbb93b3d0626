//! Actions for fixing verification issues.
//!
//! Actions convert Issues into Operations and execute them.
//!
//! ## Architecture
//!
//! ```text
//! Issue (problem detected)
//!     ↓
//! Action (Issue → Operation conversion)
//!     ↓
//! Operation (low-level file edit)
//!     ↓
//! execute_operations (file modification)
//! ```
//!
//! ## Actions
//!
//! - [`InsertStubDefinition`]: Insert `<str>` / `<variable>` stubs for undefined keys (fix)

mod insert_stub;
mod operation;
mod traits;

pub use insert_stub::{InsertStubDefinition, StubTarget};
pub use operation::Operation;
pub(crate) use traits::execute_operations;
pub use traits::{Action, ActionStats};

//! Type Synthesis
//!
//! Builds forwarding types from remote interfaces.
//!
//! A synthesis pass moves through a fixed sequence of states:
//!
//! | State               | Effect                                            |
//! |---------------------|---------------------------------------------------|
//! | `ShellResolved`     | shell taken from the pool, or created empty       |
//! | `FieldsAdded`       | delegate field with an injection tag              |
//! | `ClassTagsAttached` | interface tags cloned and merged onto the shell   |
//! | `MethodsGenerated`  | one forwarding method per interface method        |
//! | `MethodTagsAttached`| method and parameter tags cloned and merged       |
//! | `Finalized`         | shell loaded as an immutable type                 |
//!
//! The pass works on a copy of the shell. Only a pass that reaches
//! `Finalized` writes back to the pool and the loader.

mod loader;
mod pool;
mod shell;
mod synthesizer;

pub use crate::reflect::{MethodSignature, SignatureKey};
pub use loader::{ProxyInstance, SynthesizedType, TypeLoader};
pub use pool::{ShellPool, ShellState};
pub use shell::{FieldShell, MethodBody, MethodShell, TypeShell};
pub use synthesizer::{SynthesisContext, SynthesisOptions, SynthesisState};
